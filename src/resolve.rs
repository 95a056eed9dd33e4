//! Request path resolution against the output directory.
//!
//! This is the routing core of the development server, kept free of any HTTP
//! concern so it can be tested directly against a filesystem tree. A request
//! path maps to exactly one [`ResolvedTarget`]:
//!
//! 1. Nothing at the path → [`ResolvedTarget::NotFound`]
//! 2. Regular file → [`ResolvedTarget::File`] with its MIME type
//! 3. Directory containing `index.html` → [`ResolvedTarget::Index`]
//! 4. Any other directory → [`ResolvedTarget::Listing`] of its children
//!
//! A missing path is a routine outcome, not an error. Directory entries are
//! sorted lexicographically by name so listings are deterministic across
//! filesystems.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

/// Fallback MIME type for unknown extensions.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Outcome of resolving a request path against the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTarget {
    /// Nothing exists at the requested path.
    NotFound,

    /// A regular file, served with the given content type.
    File {
        path: PathBuf,
        mime: &'static str,
    },

    /// A directory's implicit `index.html`.
    Index {
        path: PathBuf,
    },

    /// A directory without an index, listed entry by entry.
    /// `entries` holds the names of all direct children, sorted.
    Listing {
        dir: PathBuf,
        entries: Vec<String>,
    },
}

impl ResolvedTarget {
    /// HTTP status code this target maps to.
    pub const fn status(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            _ => 200,
        }
    }
}

/// Resolve a slash-separated request path against the output root.
///
/// The request path is relative (leading/trailing slashes already trimmed by
/// the caller). Any `..` component resolves to `NotFound` so a request can
/// never escape the output root.
pub fn resolve(request_path: &str, output_root: &Path) -> ResolvedTarget {
    let Some(relative) = sanitize(request_path) else {
        return ResolvedTarget::NotFound;
    };
    let full_path = output_root.join(relative);

    if full_path.is_file() {
        let mime = guess_content_type(&full_path);
        return ResolvedTarget::File { path: full_path, mime };
    }

    if full_path.is_dir() {
        let index_path = full_path.join("index.html");
        if index_path.is_file() {
            return ResolvedTarget::Index { path: index_path };
        }

        return match list_entries(&full_path) {
            Ok(entries) => ResolvedTarget::Listing { dir: full_path, entries },
            Err(_) => ResolvedTarget::NotFound,
        };
    }

    ResolvedTarget::NotFound
}

/// Normalize a request path into a safe relative path.
///
/// Returns `None` when the path contains a parent-directory or otherwise
/// non-normal component. `.` components are dropped.
fn sanitize(request_path: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();
    for component in Path::new(request_path).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(relative)
}

/// Enumerate the direct children of a directory, sorted by name.
fn list_entries(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut entries: Vec<String> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    entries.sort_unstable();
    Ok(entries)
}

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
pub fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        // Web content
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",

        // Images
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("ico") => "image/x-icon",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Documents
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain; charset=utf-8",
        Some("md") => "text/markdown; charset=utf-8",

        // Default binary
        _ => OCTET_STREAM,
    }
}
