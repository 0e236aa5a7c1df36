//! Key normalization.
//!
//! Keys are opaque strings resolved relative to the store root:
//! - Segments are separated by `/` (or the platform separator)
//! - Empty segments and `.` are dropped, so `"/a//b/./c"` is `a/b/c`
//! - A leading separator never makes a key absolute
//! - `..` is applied lexically; climbing above the root is rejected when the
//!   store confines keys

use std::path::{PathBuf, MAIN_SEPARATOR};

use crate::error::{StoreError, StoreResult};

fn is_separator(ch: char) -> bool {
    ch == '/' || ch == MAIN_SEPARATOR
}

/// Split a key into its normalized segments.
///
/// With `confine` set, a `..` that would leave the root is an
/// [`StoreError::InvalidArgument`]. Without it, such segments are kept
/// verbatim and the filesystem resolves them.
///
/// # Examples
///
/// ```
/// use lfs_store::key::normalize_key;
///
/// assert_eq!(normalize_key("/a/b/../c.txt", true).unwrap(), vec!["a", "c.txt"]);
/// assert!(normalize_key("../outside", true).is_err());
/// ```
pub fn normalize_key(key: &str, confine: bool) -> StoreResult<Vec<&str>> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in key.split(is_separator) {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if confine => {
                    return Err(StoreError::InvalidArgument(format!(
                        "key escapes the store root: {key:?}"
                    )));
                }
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }
    Ok(segments)
}

/// Normalize a key into a relative path. The empty path denotes the root.
pub fn relative_path(key: &str, confine: bool) -> StoreResult<PathBuf> {
    Ok(normalize_key(key, confine)?.iter().collect())
}

/// Normalize a key into its canonical `/`-joined form.
pub fn canonical_key(key: &str, confine: bool) -> StoreResult<String> {
    Ok(normalize_key(key, confine)?.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn plain_keys_pass_through() {
        assert_eq!(normalize_key("hello/bar.tgz", true).unwrap(), vec!["hello", "bar.tgz"]);
        assert_eq!(normalize_key("test.txt", true).unwrap(), vec!["test.txt"]);
    }

    #[test]
    fn leading_separator_stays_relative() {
        assert_eq!(
            relative_path("/a/b/c/d/e/f/g.txt", true).unwrap(),
            Path::new("a/b/c/d/e/f/g.txt")
        );
        assert_eq!(canonical_key("/foo/-/foo-1.3.2.txt", true).unwrap(), "foo/-/foo-1.3.2.txt");
    }

    #[test]
    fn empty_and_dot_segments_dropped() {
        assert_eq!(canonical_key("a//b/./c/", true).unwrap(), "a/b/c");
        assert_eq!(canonical_key("", true).unwrap(), "");
        assert_eq!(canonical_key("/", true).unwrap(), "");
        assert!(relative_path("./", true).unwrap().as_os_str().is_empty());
    }

    #[test]
    fn inner_parent_segments_resolve() {
        assert_eq!(canonical_key("a/b/../c", true).unwrap(), "a/c");
        assert_eq!(canonical_key("a/..", true).unwrap(), "");
    }

    #[test]
    fn escaping_parent_rejected_when_confined() {
        assert!(matches!(
            normalize_key("..", true),
            Err(StoreError::InvalidArgument(_))
        ));
        assert!(normalize_key("../etc/passwd", true).is_err());
        assert!(normalize_key("a/../../b", true).is_err());
        assert!(normalize_key("/../b", true).is_err());
    }

    #[test]
    fn escaping_parent_kept_when_unconfined() {
        assert_eq!(canonical_key("../b", false).unwrap(), "../b");
        assert_eq!(canonical_key("a/../../b", false).unwrap(), "../b");
        assert_eq!(canonical_key("../../b", false).unwrap(), "../../b");
    }
}
