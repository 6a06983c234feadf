//! Request path normalization.

use std::path::PathBuf;

use crate::CacheError;

/// Turn a request path into a path relative to the template directory.
///
/// Empty and `.` segments are dropped. A path that is empty or ends with `/`
/// names the `index` document of that directory. Leading slashes are
/// insignificant: `/a.html` and `a.html` are the same document.
pub(crate) fn normalize(request_path: &str, index: &str) -> Result<PathBuf, CacheError> {
    let mut relative = PathBuf::new();
    for segment in request_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => return Err(CacheError::InvalidPath(request_path.to_owned())),
            _ if segment.contains(['\\', '\0']) => {
                return Err(CacheError::InvalidPath(request_path.to_owned()));
            }
            _ => relative.push(segment),
        }
    }
    if request_path.is_empty() || request_path.ends_with('/') {
        relative.push(index);
    }
    Ok(relative)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_root_maps_to_index() {
        assert_eq!(normalize("/", "index.html").unwrap(), Path::new("index.html"));
        assert_eq!(normalize("", "index.html").unwrap(), Path::new("index.html"));
    }

    #[test]
    fn test_directory_maps_to_its_index() {
        assert_eq!(
            normalize("/blog/", "home.html").unwrap(),
            Path::new("blog/home.html")
        );
    }

    #[test]
    fn test_redundant_segments_dropped() {
        assert_eq!(
            normalize("//a/./b//c.html", "index.html").unwrap(),
            Path::new("a/b/c.html")
        );
    }

    #[test]
    fn test_parent_segment_rejected() {
        let err = normalize("/a/../../etc/passwd", "index.html").unwrap_err();

        assert!(matches!(err, CacheError::InvalidPath(ref p) if p == "/a/../../etc/passwd"));
    }

    #[test]
    fn test_backslash_rejected() {
        assert!(normalize("/a\\b.html", "index.html").is_err());
    }
}
