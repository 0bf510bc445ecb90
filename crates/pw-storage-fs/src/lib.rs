//! Filesystem storage implementation for the pagewright site generator.
//!
//! This crate provides [`FsStorage`], a filesystem-based implementation of the
//! [`Storage`](pw_storage::Storage) trait rooted at one content tree
//! directory (e.g. `content/en`).
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use pw_storage::Storage;
//! use pw_storage_fs::FsStorage;
//!
//! let storage = FsStorage::new(PathBuf::from("content/en"));
//! for name in storage.list_dirs("")? {
//!     println!("{name}");
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use pw_storage::{Storage, StorageError};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage implementation.
///
/// Maps slash-separated storage paths onto `root`. Paths containing `..`
/// segments or a leading slash are rejected so nothing outside the root can
/// be reached.
#[derive(Debug, Clone)]
pub struct FsStorage {
    /// Root directory of the content tree.
    root: PathBuf,
}

impl FsStorage {
    /// Create a new filesystem storage rooted at `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Root directory of this storage.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate that a storage path doesn't escape the root.
    fn validate_path(path: &str) -> Result<(), StorageError> {
        if path.starts_with('/') || path.split('/').any(|segment| segment == "..") {
            return Err(StorageError::invalid_path(path).with_backend(BACKEND));
        }
        Ok(())
    }

    /// Resolve a storage path to an absolute filesystem path.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        Self::validate_path(path)?;
        if path.is_empty() {
            return Ok(self.root.clone());
        }
        Ok(self.root.join(path))
    }

    fn io_error(err: io::Error, path: &Path) -> StorageError {
        StorageError::io(err, Some(path.to_path_buf())).with_backend(BACKEND)
    }
}

/// Recursively collect files below `current`, relative to `base`.
fn walk_dir(base: &Path, current: &Path, files: &mut Vec<String>) -> Result<(), io::Error> {
    for entry in fs::read_dir(current)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk_dir(base, &path, files)?;
        } else if let Ok(relative) = path.strip_prefix(base) {
            files.push(relative.to_string_lossy().replace('\\', "/"));
        }
    }
    Ok(())
}

impl Storage for FsStorage {
    fn list_dirs(&self, path: &str) -> Result<Vec<String>, StorageError> {
        let dir = self.resolve(path)?;
        let entries = fs::read_dir(&dir).map_err(|e| Self::io_error(e, &dir))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Self::io_error(e, &dir))?;
            if entry.path().is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn list_files(&self, path: &str) -> Result<Vec<String>, StorageError> {
        let dir = self.resolve(path)?;
        if !dir.is_dir() {
            return Err(StorageError::not_found(&dir).with_backend(BACKEND));
        }

        let mut files = Vec::new();
        walk_dir(&dir, &dir, &mut files).map_err(|e| Self::io_error(e, &dir))?;
        files.sort();
        Ok(files)
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        let file = self.resolve(path)?;
        fs::read_to_string(&file).map_err(|e| Self::io_error(e, &file))
    }

    fn read_bytes(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let file = self.resolve(path)?;
        fs::read(&file).map_err(|e| Self::io_error(e, &file))
    }

    fn write(&self, path: &str, content: &str) -> Result<(), StorageError> {
        let file = self.resolve(path)?;
        tracing::debug!(path = %file.display(), "Writing file");
        fs::write(&file, content).map_err(|e| Self::io_error(e, &file))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok_and(|p| p.exists())
    }

    fn is_dir(&self, path: &str) -> bool {
        self.resolve(path).is_ok_and(|p| p.is_dir())
    }

    fn create_dir_all(&self, path: &str) -> Result<(), StorageError> {
        let dir = self.resolve(path)?;
        fs::create_dir_all(&dir).map_err(|e| Self::io_error(e, &dir))
    }

    fn remove_dir_all(&self, path: &str) -> Result<(), StorageError> {
        let dir = self.resolve(path)?;
        tracing::debug!(path = %dir.display(), "Removing directory");
        fs::remove_dir_all(&dir).map_err(|e| Self::io_error(e, &dir))
    }
}
