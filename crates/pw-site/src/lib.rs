//! Page tree, routing and tree mutations for pagewright.
//!
//! This crate provides:
//! - [`TreeLoader`]: builds a [`SiteTree`] from a [`Storage`](pw_storage::Storage)
//!   backend, one [`Page`] per directory
//! - [`SiteTree`]: arena of pages with parent links, name lookups and a
//!   path index
//! - [`Router`]: ordered glob rules mapping page paths to templates
//! - [`Site`]: a loaded tree with `create`, `save` and `delete` operations
//!   that keep tree, links and index consistent
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::{Path, PathBuf};
//! use std::sync::Arc;
//! use pw_renderer::MarkdownConverter;
//! use pw_site::{Router, Site};
//! use pw_storage_fs::FsStorage;
//!
//! let storage = Arc::new(FsStorage::new(PathBuf::from("content/en")));
//! let site = Site::load(storage, Arc::new(MarkdownConverter::new()))?;
//! let router = Router::from_file(Path::new("themes/default/routes.conf"))?;
//!
//! for id in site.tree().walk() {
//!     let page = &site.tree()[id];
//!     let template = router.require(page.path())?;
//! }
//! # Ok(())
//! # }
//! ```

mod loader;
pub mod metadata;
mod page;
mod router;
mod site;
mod tree;

pub use loader::{ASSETS_DIR, DOCUMENT_NAME, LoadError, TreeLoader};
pub use page::{Metadata, Page, PageId, SUMMARY_LENGTH, SYSTEM_FIELDS, root_path, summary};
pub use router::{ROUTES_FILE, RouteError, Router, Rule};
pub use site::{Site, SiteError};
pub use tree::SiteTree;
