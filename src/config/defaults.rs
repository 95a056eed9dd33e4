//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn content() -> PathBuf {
        "content".into()
    }

    pub fn theme() -> PathBuf {
        "theme".into()
    }

    pub fn output() -> PathBuf {
        "output".into()
    }

    pub fn generator() -> Vec<String> {
        vec!["pelican".into()]
    }

    pub fn settings() -> PathBuf {
        "pelicanconf.py".into()
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        8000
    }
}

// ============================================================================
// [publish] Section Defaults
// ============================================================================

pub mod publish {
    pub fn import_command() -> Vec<String> {
        vec!["ghp-import".into()]
    }

    pub fn remote() -> String {
        "origin".into()
    }

    pub fn branch() -> String {
        "gh-pages".into()
    }

    pub fn target_branch() -> String {
        "master".into()
    }
}
