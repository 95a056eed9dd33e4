//! `[publish]` section configuration.
//!
//! Settings for pushing the built site to a hosting branch.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[publish]` section in sitekit.toml - hosting branch publication.
///
/// Publishing runs two external commands in sequence and aborts on the first
/// failure: the import command snapshots the output directory onto the
/// hosting branch, then `git push` sends it to the remote.
///
/// # Example
/// ```toml
/// [publish]
/// import_command = ["ghp-import"]
/// remote = "origin"
/// branch = "gh-pages"
/// target_branch = "master"
/// force = true
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PublishConfig {
    /// Command that imports the output directory onto the hosting branch.
    /// Receives the output directory path as its final argument.
    #[serde(default = "defaults::publish::import_command")]
    #[educe(Default = defaults::publish::import_command())]
    pub import_command: Vec<String>,

    /// Git remote to push to.
    #[serde(default = "defaults::publish::remote")]
    #[educe(Default = defaults::publish::remote())]
    pub remote: String,

    /// Local hosting branch created by the import command.
    #[serde(default = "defaults::publish::branch")]
    #[educe(Default = defaults::publish::branch())]
    pub branch: String,

    /// Remote branch the hosting branch is pushed onto.
    #[serde(default = "defaults::publish::target_branch")]
    #[educe(Default = defaults::publish::target_branch())]
    pub target_branch: String,

    /// Force push (overwrites remote history).
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub force: bool,
}

impl PublishConfig {
    /// The `branch:target_branch` refspec passed to `git push`.
    pub fn refspec(&self) -> String {
        format!("{}:{}", self.branch, self.target_branch)
    }
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_publish_config() {
        let config = r#"
            [publish]
            import_command = ["ghp-import", "-m", "publish"]
            remote = "upstream"
            branch = "pages"
            target_branch = "main"
            force = false
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.publish.import_command, ["ghp-import", "-m", "publish"]);
        assert_eq!(config.publish.remote, "upstream");
        assert_eq!(config.publish.refspec(), "pages:main");
        assert!(!config.publish.force);
    }

    #[test]
    fn test_publish_config_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.publish.import_command, ["ghp-import"]);
        assert_eq!(config.publish.remote, "origin");
        assert_eq!(config.publish.refspec(), "gh-pages:master");
        assert!(config.publish.force);
    }

    #[test]
    fn test_publish_config_unknown_field_rejection() {
        let config = r#"
            [publish]
            unknown = "field"
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);
        assert!(result.is_err());
    }
}
