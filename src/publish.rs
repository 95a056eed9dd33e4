//! Publication to the hosting branch.
//!
//! Two external commands run in sequence, aborting on the first failure:
//! the import command snapshots the output directory onto the hosting
//! branch, then `git push` sends it to the remote. The site is built by the
//! caller before this runs.

use crate::{config::SiteConfig, exec, log};
use anyhow::Result;

/// Push the built output directory to the configured hosting branch.
pub fn publish_site(config: &SiteConfig) -> Result<()> {
    let root = config.root();
    let publish = &config.publish;

    exec!(root; &publish.import_command; &config.build.output)?;
    exec!(
        root; ["git"];
        "push",
        &publish.remote,
        if publish.force { "-f" } else { "" },
        publish.refspec(),
    )?;

    log!("publish"; "pushed {} to {}/{}", publish.branch, publish.remote, publish.target_branch);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn test_publish_aborts_on_failing_import() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = SiteConfig::default();
        config.build.root = Some(tmp.path().to_path_buf());
        // Failing import must abort before the push runs. A push reaching
        // `git` would fail differently (no repository); assert the error is
        // the import command's.
        config.publish.import_command = vec!["false".into()];

        let err = publish_site(&config).unwrap_err();
        assert!(err.to_string().contains("false"));
    }
}
