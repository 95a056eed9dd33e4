//! Title slugification for post file names.
//!
//! Converts an arbitrary post title into a lowercase ASCII slug suitable for
//! a file name: unicode is transliterated via `deunicode`, anything that is
//! not alphanumeric collapses into a single hyphen.

use deunicode::deunicode;

/// Convert a post title to a URL- and filename-safe slug.
///
/// ```ignore
/// slugify("Hello, World!")  // → "hello-world"
/// slugify("Caffè élite")    // → "caffe-elite"
/// ```
pub fn slugify(title: &str) -> String {
    let ascii = deunicode(title).to_lowercase();

    let mut slug = String::with_capacity(ascii.len());
    let mut pending_hyphen = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
    }

    #[test]
    fn test_slugify_punctuation_collapses() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("a -- b"), "a-b");
    }

    #[test]
    fn test_slugify_unicode_transliteration() {
        assert_eq!(slugify("Caffè élite"), "caffe-elite");
    }

    #[test]
    fn test_slugify_trims_edges() {
        assert_eq!(slugify("  spaced out  "), "spaced-out");
        assert_eq!(slugify("!leading and trailing?"), "leading-and-trailing");
    }

    #[test]
    fn test_slugify_empty_and_symbols_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }
}
