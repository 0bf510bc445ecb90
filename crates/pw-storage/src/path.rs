//! Helpers for slash-separated storage paths.
//!
//! Storage paths are relative to the storage root and never start or end
//! with a slash. The root itself is the empty string.

/// Join two storage paths with a single `/`.
///
/// Empty components are skipped, so joining onto the root yields the child
/// unchanged.
///
/// # Examples
///
/// ```
/// use pw_storage::join_path;
///
/// assert_eq!(join_path("", "guide"), "guide");
/// assert_eq!(join_path("guide", "setup"), "guide/setup");
/// assert_eq!(join_path("guide", ""), "guide");
/// ```
#[must_use]
pub fn join_path(base: &str, child: &str) -> String {
    let base = base.trim_matches('/');
    let child = child.trim_matches('/');
    match (base.is_empty(), child.is_empty()) {
        (true, _) => child.to_owned(),
        (false, true) => base.to_owned(),
        (false, false) => format!("{base}/{child}"),
    }
}

/// Parent of a storage path (`""` for top-level entries and the root).
#[must_use]
pub fn parent_path(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(parent, _)| parent)
}

/// Last segment of a storage path.
#[must_use]
pub fn file_name(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path_root() {
        assert_eq!(join_path("", "about"), "about");
    }

    #[test]
    fn test_join_path_nested() {
        assert_eq!(join_path("blog/2024", "post"), "blog/2024/post");
    }

    #[test]
    fn test_join_path_trims_slashes() {
        assert_eq!(join_path("blog/", "/post/"), "blog/post");
    }

    #[test]
    fn test_parent_path() {
        assert_eq!(parent_path("blog/2024/post"), "blog/2024");
        assert_eq!(parent_path("blog"), "");
        assert_eq!(parent_path(""), "");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("blog/2024/post"), "post");
        assert_eq!(file_name("blog"), "blog");
        assert_eq!(file_name(""), "");
    }
}
