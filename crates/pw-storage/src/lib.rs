//! Storage abstraction for the pagewright site generator.
//!
//! This crate provides a [`Storage`] trait over the directory tree that backs
//! a content tree. The page-tree core never touches `std::fs` directly, which
//! allows:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Backend flexibility** (filesystem today, anything tree-shaped later)
//! - **Distinct "not found" signalling** via [`StorageErrorKind::NotFound`]
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with enumeration, read/write, existence and
//!   recursive create/remove operations
//! - [`join_path`] and friends for slash-separated storage paths
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! The filesystem backend lives in `pw-storage-fs`.
//!
//! # Example
//!
//! ```ignore
//! use pw_storage::{Storage, join_path};
//!
//! for name in storage.list_dirs("guide")? {
//!     let doc = storage.read(&join_path(&join_path("guide", &name), "page.md"))?;
//! }
//! ```

#[cfg(feature = "mock")]
mod mock;
mod path;
mod storage;

#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use path::{file_name, join_path, parent_path};
pub use storage::{Storage, StorageError, StorageErrorKind};
