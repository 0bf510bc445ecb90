//! Storage trait and error types.
//!
//! Provides the core [`Storage`] trait for the directory tree that backs a
//! content tree, along with [`StorageError`] for unified error handling
//! across backends.
//!
//! # Path Convention
//!
//! All path parameters are **storage paths**, relative to the storage root:
//! - `""` - the root directory (home page)
//! - `"guide"` - a page directory
//! - `"guide/page.md"` - the primary document of that page
//! - `"guide/assets/img/a.png"` - an attachment
//!
//! Implementations map storage paths to their internal representation and
//! must reject paths that escape the root.

use std::path::PathBuf;

/// What went wrong, independent of the backend.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// No file or directory at the path.
    NotFound,
    /// The backend refused access.
    PermissionDenied,
    /// Something is already at the path.
    AlreadyExists,
    /// Path is malformed or escapes the storage root.
    InvalidPath,
    /// Anything else.
    Other,
}

impl std::fmt::Display for StorageErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::NotFound => "not found",
            Self::PermissionDenied => "permission denied",
            Self::AlreadyExists => "already exists",
            Self::InvalidPath => "invalid path",
            Self::Other => "storage error",
        })
    }
}

/// Error returned by a [`Storage`] backend.
///
/// Displays as `[Backend] path: kind (cause)`, omitting the parts that are
/// not set.
#[derive(Debug)]
pub struct StorageError {
    /// Category, used by callers to tell a missing page from a failure.
    pub kind: StorageErrorKind,
    /// Storage path the operation was about.
    pub path: Option<PathBuf>,
    /// Short backend name such as `Fs` or `Mock`.
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    #[must_use]
    pub fn kind(&self) -> StorageErrorKind {
        self.kind
    }

    /// Whether nothing exists at the path.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == StorageErrorKind::NotFound
    }

    /// Nothing exists at `path`.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// `path` is malformed or escapes the root.
    #[must_use]
    pub fn invalid_path(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::InvalidPath).with_path(path)
    }

    /// Wrap an I/O failure, keeping its category.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        use std::io::ErrorKind;

        let kind = match err.kind() {
            ErrorKind::NotFound => StorageErrorKind::NotFound,
            ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            ErrorKind::AlreadyExists => StorageErrorKind::AlreadyExists,
            ErrorKind::InvalidInput => StorageErrorKind::InvalidPath,
            _ => StorageErrorKind::Other,
        };
        Self {
            kind,
            path,
            backend: None,
            source: Some(Box::new(err)),
        }
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }
        if let Some(path) = &self.path {
            write!(f, "{}: ", path.display())?;
        }
        write!(f, "{}", self.kind)?;
        if let Some(source) = &self.source {
            write!(f, " ({source})")?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn std::error::Error + 'static))
    }
}

/// Storage abstraction over the directory tree of one content tree.
///
/// All operations are synchronous. Every method that can fail reports a
/// missing resource as [`StorageErrorKind::NotFound`], distinct from other
/// failures, so callers can turn it into a domain error.
pub trait Storage: Send + Sync {
    /// List the names of the immediate subdirectories of `path`.
    ///
    /// Names are returned sorted, so two listings of unchanged storage agree.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if `path` is not a directory or can't be read.
    fn list_dirs(&self, path: &str) -> Result<Vec<String>, StorageError>;

    /// Recursively list every file below `path`.
    ///
    /// Returned paths are relative to `path` (not to the storage root),
    /// slash-separated and sorted. Nested directories are flattened.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if `path` does not exist or can't be read.
    fn list_files(&self, path: &str) -> Result<Vec<String>, StorageError>;

    /// Read a text file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file doesn't exist or can't be read.
    fn read(&self, path: &str) -> Result<String, StorageError>;

    /// Read a file as raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file doesn't exist or can't be read.
    fn read_bytes(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Create or replace a text file. The parent directory must exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file can't be written.
    fn write(&self, path: &str, content: &str) -> Result<(), StorageError>;

    /// Check if a file or directory exists at `path`.
    ///
    /// Returns `false` on errors (treats errors as "doesn't exist").
    fn exists(&self, path: &str) -> bool;

    /// Check if `path` is a directory.
    fn is_dir(&self, path: &str) -> bool;

    /// Create a directory and all missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the directory can't be created.
    fn create_dir_all(&self, path: &str) -> Result<(), StorageError>;

    /// Remove a directory and everything below it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the directory doesn't exist or can't be removed.
    fn remove_dir_all(&self, path: &str) -> Result<(), StorageError>;
}
