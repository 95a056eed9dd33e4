//! Site configuration management for `sitekit.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                        |
//! |-------------|------------------------------------------------|
//! | `[build]`   | Project paths and generator invocation         |
//! | `[serve]`   | Development server (port, interface, watch)    |
//! | `[publish]` | Hosting branch publication                     |
//!
//! # Example
//!
//! ```toml
//! [build]
//! content = "content"
//! output = "output"
//! generator = ["pelican"]
//! settings = "pelicanconf.py"
//!
//! [serve]
//! port = 8000
//! live_reload = true
//!
//! [publish]
//! branch = "gh-pages"
//! ```
//!
//! The configuration is an explicit value: loaded once in `main`, adjusted
//! with CLI overrides, validated, then passed by reference to every
//! subsystem. No global mutable state.

mod build;
pub mod defaults;
mod error;
mod publish;
mod serve;

use build::BuildConfig;
use error::ConfigError;
use publish::PublishConfig;
use serve::ServeConfig;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Lowest non-privileged port accepted for the development server.
const MIN_PORT: u16 = 1024;

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing sitekit.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project paths and generator settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Publication settings
    #[serde(default)]
    pub publish: PublishConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Output directory holding the built site
    pub fn output_dir(&self) -> PathBuf {
        self.root().join(&self.build.output)
    }

    /// Content source directory
    pub fn content_dir(&self) -> PathBuf {
        self.root().join(&self.build.content)
    }

    /// Theme directory
    pub fn theme_dir(&self) -> PathBuf {
        self.root().join(&self.build.theme)
    }

    /// Apply CLI overrides on top of the loaded file values
    pub fn update_with_cli(&mut self, cli: &Cli) {
        if let Some(root) = &cli.root {
            self.build.root = Some(root.clone());
        }
        if let Some(output) = &cli.output {
            self.build.output = output.clone();
        }
        if let Some(content) = &cli.content {
            self.build.content = content.clone();
        }

        if let Commands::Serve {
            interface,
            port,
            watch,
            live_reload,
            debug,
            ..
        } = &cli.command
        {
            if let Some(interface) = interface {
                self.serve.interface = interface.clone();
            }
            if let Some(port) = port {
                self.serve.port = *port;
            }
            if let Some(watch) = watch {
                self.serve.watch = *watch;
            }
            if let Some(live_reload) = live_reload {
                self.serve.live_reload = *live_reload;
            }
            if *debug {
                self.serve.debug = true;
            }
        }
    }

    /// Validate configuration before any resource is acquired.
    ///
    /// Failures here are fatal: the process reports the error and exits
    /// without partial startup.
    pub fn validate(&self) -> Result<()> {
        if self.serve.port < MIN_PORT {
            bail!(ConfigError::Validation(format!(
                "Port must be between {MIN_PORT} and 65535, got {}",
                self.serve.port
            )));
        }

        // The reload channel listens on port + 1
        if self.serve.live_reload && self.serve.port == u16::MAX {
            bail!(ConfigError::Validation(
                "Port 65535 leaves no room for the live reload channel".into()
            ));
        }

        if self.build.generator.is_empty() {
            bail!(ConfigError::Validation(
                "`build.generator` must not be empty".into()
            ));
        }

        if self.publish.import_command.is_empty() {
            bail!(ConfigError::Validation(
                "`publish.import_command` must not be empty".into()
            ));
        }

        Ok(())
    }
}
