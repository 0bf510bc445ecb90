//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use crate::path::{join_path, parent_path};
use crate::storage::{Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// Mock storage for testing.
///
/// Stores files and directories in memory. Adding a file registers all of
/// its ancestor directories, mirroring `mkdir -p` semantics.
///
/// # Example
///
/// ```ignore
/// use pw_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("page.md", "---\ntitle: Home\n---\nWelcome")
///     .with_file("about/page.md", "About us");
///
/// assert_eq!(storage.list_dirs("").unwrap(), vec!["about"]);
/// ```
#[derive(Debug)]
pub struct MockStorage {
    files: RwLock<BTreeMap<String, Vec<u8>>>,
    dirs: RwLock<BTreeSet<String>>,
}

impl Default for MockStorage {
    fn default() -> Self {
        Self {
            files: RwLock::new(BTreeMap::new()),
            dirs: RwLock::new(BTreeSet::from([String::new()])),
        }
    }
}

impl MockStorage {
    /// Create a new empty mock storage containing only the root directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text file, creating its ancestor directories.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: &str, content: impl Into<String>) -> Self {
        self.register_ancestors(path);
        self.files
            .write()
            .unwrap()
            .insert(path.to_owned(), content.into().into_bytes());
        self
    }

    /// Add an empty directory, creating its ancestors.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_dir(self, path: &str) -> Self {
        self.register_ancestors(path);
        self.dirs.write().unwrap().insert(path.to_owned());
        self
    }

    /// Number of files currently stored.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.read().unwrap().len()
    }

    fn register_ancestors(&self, path: &str) {
        let mut dirs = self.dirs.write().unwrap();
        let mut current = parent_path(path);
        loop {
            dirs.insert(current.to_owned());
            if current.is_empty() {
                break;
            }
            current = parent_path(current);
        }
    }

    fn is_below(candidate: &str, dir: &str) -> bool {
        dir.is_empty()
            || candidate
                .strip_prefix(dir)
                .is_some_and(|rest| rest.starts_with('/'))
    }

    fn not_found(path: &str) -> StorageError {
        StorageError::not_found(path).with_backend(BACKEND)
    }
}

impl Storage for MockStorage {
    fn list_dirs(&self, path: &str) -> Result<Vec<String>, StorageError> {
        let dirs = self.dirs.read().unwrap();
        if !dirs.contains(path) {
            return Err(Self::not_found(path));
        }
        Ok(dirs
            .iter()
            .filter(|d| !d.is_empty() && parent_path(d) == path)
            .map(|d| crate::path::file_name(d).to_owned())
            .collect())
    }

    fn list_files(&self, path: &str) -> Result<Vec<String>, StorageError> {
        if !self.dirs.read().unwrap().contains(path) {
            return Err(Self::not_found(path));
        }
        let prefix_len = if path.is_empty() { 0 } else { path.len() + 1 };
        Ok(self
            .files
            .read()
            .unwrap()
            .keys()
            .filter(|f| Self::is_below(f, path))
            .map(|f| f[prefix_len..].to_owned())
            .collect())
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        let bytes = self.read_bytes(path)?;
        String::from_utf8(bytes).map_err(|e| {
            StorageError::new(StorageErrorKind::Other)
                .with_backend(BACKEND)
                .with_path(path)
                .with_source(e)
        })
    }

    fn read_bytes(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| Self::not_found(path))
    }

    fn write(&self, path: &str, content: &str) -> Result<(), StorageError> {
        if !self.dirs.read().unwrap().contains(parent_path(path)) {
            return Err(Self::not_found(parent_path(path)));
        }
        self.files
            .write()
            .unwrap()
            .insert(path.to_owned(), content.as_bytes().to_vec());
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.dirs.read().unwrap().contains(path) || self.files.read().unwrap().contains_key(path)
    }

    fn is_dir(&self, path: &str) -> bool {
        self.dirs.read().unwrap().contains(path)
    }

    fn create_dir_all(&self, path: &str) -> Result<(), StorageError> {
        if self.files.read().unwrap().contains_key(path) {
            return Err(StorageError::new(StorageErrorKind::AlreadyExists)
                .with_backend(BACKEND)
                .with_path(path));
        }
        self.register_ancestors(&join_path(path, "_"));
        Ok(())
    }

    fn remove_dir_all(&self, path: &str) -> Result<(), StorageError> {
        let mut dirs = self.dirs.write().unwrap();
        if !dirs.contains(path) {
            return Err(Self::not_found(path));
        }
        dirs.retain(|d| d != path && !Self::is_below(d, path));
        if path.is_empty() {
            dirs.insert(String::new());
        }
        self.files
            .write()
            .unwrap()
            .retain(|f, _| !Self::is_below(f, path));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> MockStorage {
        MockStorage::new()
            .with_file("page.md", "home")
            .with_file("blog/page.md", "blog")
            .with_file("blog/post/page.md", "post")
            .with_file("blog/assets/img/a.png", "png")
            .with_file("blog/assets/b.txt", "txt")
            .with_dir("about")
    }

    #[test]
    fn test_list_dirs_root() {
        let storage = sample();

        assert_eq!(storage.list_dirs("").unwrap(), vec!["about", "blog"]);
    }

    #[test]
    fn test_list_dirs_nested() {
        let storage = sample();

        assert_eq!(storage.list_dirs("blog").unwrap(), vec!["assets", "post"]);
    }

    #[test]
    fn test_list_dirs_missing() {
        let storage = sample();

        let err = storage.list_dirs("missing").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_list_files_relative_and_flattened() {
        let storage = sample();

        assert_eq!(
            storage.list_files("blog/assets").unwrap(),
            vec!["b.txt", "img/a.png"]
        );
    }

    #[test]
    fn test_list_files_prefix_is_segment_aware() {
        let storage = MockStorage::new()
            .with_file("blog/page.md", "")
            .with_file("blogroll/page.md", "");

        assert_eq!(storage.list_files("blog").unwrap(), vec!["page.md"]);
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let storage = sample();

        assert!(storage.read("nope.md").unwrap_err().is_not_found());
    }

    #[test]
    fn test_write_requires_parent_dir() {
        let storage = sample();

        assert!(storage.write("ghost/page.md", "x").is_err());
        storage.write("about/page.md", "About").unwrap();
        assert_eq!(storage.read("about/page.md").unwrap(), "About");
    }

    #[test]
    fn test_create_dir_all_registers_ancestors() {
        let storage = MockStorage::new();

        storage.create_dir_all("a/b/c").unwrap();

        assert!(storage.is_dir("a"));
        assert!(storage.is_dir("a/b"));
        assert!(storage.is_dir("a/b/c"));
        assert!(!storage.is_dir("a/b/c/_"));
    }

    #[test]
    fn test_remove_dir_all_removes_subtree() {
        let storage = sample();

        storage.remove_dir_all("blog").unwrap();

        assert!(!storage.exists("blog"));
        assert!(!storage.exists("blog/post/page.md"));
        assert!(storage.exists("page.md"));
        assert_eq!(storage.file_count(), 1);
    }
}
