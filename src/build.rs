//! Output cleanup and site generation.
//!
//! The generator is an external collaborator: a one-shot command (Pelican by
//! default) invoked with a settings file, judged solely by its exit code.
//! A non-zero exit bubbles up as an error; in watch mode the caller logs it
//! and keeps serving the previous output.

use crate::{config::SiteConfig, exec, log};
use anyhow::{Context, Result};
use std::fs;

/// Delete and recreate the output directory.
pub fn clean(config: &SiteConfig) -> Result<()> {
    let output = config.output_dir();

    if output.is_dir() {
        fs::remove_dir_all(&output)
            .with_context(|| format!("Failed to remove {}", output.display()))?;
    }
    fs::create_dir_all(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    log!("clean"; "{}", output.display());
    Ok(())
}

/// Run the site generator once: `<generator> -s <settings>`.
///
/// # Errors
/// Fails when the generator executable cannot be found or exits non-zero.
pub fn build_site(config: &SiteConfig) -> Result<()> {
    let generator = &config.build.generator;

    // Fail with a clear message before spawning anything
    let name = generator.first().context("Empty generator command")?;
    which::which(name).with_context(|| format!("Generator `{name}` not found in PATH"))?;

    exec!(config.root(); generator; "-s", &config.build.settings)?;

    log!("build"; "done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config_in(root: &std::path::Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.build.root = Some(root.to_path_buf());
        config
    }

    #[test]
    fn test_clean_creates_missing_output() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());

        clean(&config).unwrap();
        assert!(config.output_dir().is_dir());
    }

    #[test]
    fn test_clean_empties_existing_output() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let output = config.output_dir();

        fs::create_dir_all(output.join("stale")).unwrap();
        fs::write(output.join("stale/page.html"), "old").unwrap();

        clean(&config).unwrap();
        assert!(output.is_dir());
        assert_eq!(fs::read_dir(&output).unwrap().count(), 0);
    }

    #[test]
    #[cfg(unix)]
    fn test_build_site_success() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = config_in(tmp.path());
        // `true` ignores its arguments and exits zero
        config.build.generator = vec!["true".into()];

        assert!(build_site(&config).is_ok());
    }

    #[test]
    #[cfg(unix)]
    fn test_build_site_nonzero_exit_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = config_in(tmp.path());
        config.build.generator = vec!["false".into()];

        assert!(build_site(&config).is_err());
    }

    #[test]
    fn test_build_site_missing_generator_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = config_in(tmp.path());
        config.build.generator = vec!["definitely-not-a-real-generator".into()];

        let err = build_site(&config).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    #[cfg(unix)]
    fn test_failed_build_leaves_output_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = config_in(tmp.path());
        config.build.generator = vec!["false".into()];

        let output = config.output_dir();
        fs::create_dir_all(&output).unwrap();
        fs::write(output.join("page.html"), "served").unwrap();

        assert!(build_site(&config).is_err());
        // Previous output remains authoritative after a failed build
        assert_eq!(fs::read_to_string(output.join("page.html")).unwrap(), "served");
    }
}
