//! `[build]` section configuration.
//!
//! Project layout paths and the external generator invocation.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in sitekit.toml - project layout and generator settings.
///
/// All paths are relative to the project root unless absolute.
///
/// # Example
/// ```toml
/// [build]
/// content = "content"
/// theme = "theme"
/// output = "output"
/// generator = ["pelican"]
/// settings = "pelicanconf.py"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory. Defaults to the current directory.
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Content source directory (watched in serve mode).
    #[serde(default = "defaults::build::content")]
    #[educe(Default = defaults::build::content())]
    pub content: PathBuf,

    /// Theme directory (watched in serve mode when present).
    #[serde(default = "defaults::build::theme")]
    #[educe(Default = defaults::build::theme())]
    pub theme: PathBuf,

    /// Output directory holding the built site. Recreated by `clean`,
    /// read-only from the server's perspective.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Generator command. The first element is the executable, the rest are
    /// leading arguments. The settings file is appended as `-s <settings>`.
    #[serde(default = "defaults::build::generator")]
    #[educe(Default = defaults::build::generator())]
    pub generator: Vec<String>,

    /// Generator settings file passed via `-s`.
    #[serde(default = "defaults::build::settings")]
    #[educe(Default = defaults::build::settings())]
    pub settings: PathBuf,
}
