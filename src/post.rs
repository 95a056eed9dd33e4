//! Post scaffolding.
//!
//! `sitekit new <title>` renders the embedded post template to a dated
//! markdown file under the content directory: `YYYY-MM-DD.<slug>.md`.

use crate::{config::SiteConfig, log, utils::slug::slugify};
use anyhow::{Context, Result, bail};
use chrono::Local;
use std::{fs, path::PathBuf};

/// Post template (embedded at compile time)
const POST_TEMPLATE: &str = include_str!("embed/new_post.md");

/// Create a new dated post file under the content directory.
///
/// Returns the path of the created file. Refuses to overwrite an existing
/// post with the same date and slug.
pub fn new_post(config: &SiteConfig, title: &str) -> Result<PathBuf> {
    let title = title.trim();
    if title.is_empty() {
        bail!("Post title must not be empty");
    }

    let slug = slugify(title);
    if slug.is_empty() {
        bail!("Title `{title}` produces an empty slug");
    }

    let date = Local::now().format("%Y-%m-%d").to_string();
    let content_dir = config.content_dir();
    if !content_dir.is_dir() {
        bail!(
            "Content directory `{}` does not exist",
            content_dir.display()
        );
    }

    let path = content_dir.join(format!("{date}.{slug}.md"));
    if path.exists() {
        bail!("Post `{}` already exists", path.display());
    }

    let rendered = POST_TEMPLATE
        .replace("{title}", title)
        .replace("{date}", &date);
    fs::write(&path, rendered).with_context(|| format!("Failed to write {}", path.display()))?;

    log!("new"; "created {}", path.display());
    Ok(path)
}
