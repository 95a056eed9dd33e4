//! Sitekit - build, preview and publish toolchain for a generator-based
//! static blog.

mod build;
mod cli;
mod config;
mod post;
mod publish;
mod reload;
mod resolve;
mod serve;
mod utils;
mod watch;

use anyhow::{Result, bail};
use build::{build_site, clean};
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use post::new_post;
use publish::publish_site;
use serve::serve_site;
use std::path::Path;

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    let config: &'static SiteConfig = Box::leak(Box::new(load_config(cli)?));

    match &cli.command {
        Commands::Clean => clean(config),
        Commands::Build { clean: wipe } => {
            if *wipe {
                clean(config)?;
            }
            build_site(config)
        }
        Commands::Serve { .. } => {
            // Output is created fresh so the first request sees a clean build
            clean(config)?;
            build_site(config)?;
            serve_site(config)
        }
        Commands::New { title } => new_post(config, title).map(|_| ()),
        Commands::Publish => {
            build_site(config)?;
            publish_site(config)
        }
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &'static Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    if !config_path.exists() {
        bail!("Config file `{}` not found.", config_path.display());
    }

    let mut config = SiteConfig::from_path(&config_path)?;
    config.update_with_cli(cli);
    config.validate()?;

    Ok(config)
}
