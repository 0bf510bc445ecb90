//! Content tree loading from storage.
//!
//! Provides [`TreeLoader`] for building a [`SiteTree`] from a [`Storage`]
//! backend. Every page directory holds a `page.md` document and an optional
//! `assets` folder:
//!
//! ```text
//! content/en/
//! ├── page.md          # root page
//! ├── assets/
//! └── blog/
//!     ├── page.md
//!     └── post/
//!         └── page.md
//! ```
//!
//! Pages are read depth-first in pre-order. Subdirectories are visited in
//! name order; hidden directories and `assets` are skipped. A page whose
//! metadata sets `enabled: false` is dropped together with its subtree.

use std::collections::HashMap;
use std::sync::Arc;

use pw_renderer::ContentConverter;
use pw_storage::{Storage, StorageError, join_path};

use crate::metadata;
use crate::page::{Page, PageId};
use crate::tree::SiteTree;

/// Primary document file of a page directory.
pub const DOCUMENT_NAME: &str = "page.md";

/// Reserved attachment folder of a page directory.
pub const ASSETS_DIR: &str = "assets";

/// Error returned when loading a content tree.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Page directory without its primary document.
    #[error("Missing index document: {path}")]
    MissingDocument {
        /// Storage path of the expected document.
        path: String,
    },
    /// Storage failure while reading the tree.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Builds page trees from storage.
pub struct TreeLoader {
    storage: Arc<dyn Storage>,
    converter: Arc<dyn ContentConverter>,
}

impl TreeLoader {
    /// Create a loader over one content tree.
    ///
    /// # Arguments
    ///
    /// * `storage` - Storage rooted at the content tree
    /// * `converter` - Converter producing HTML and metadata blocks
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, converter: Arc<dyn ContentConverter>) -> Self {
        Self { storage, converter }
    }

    /// Storage backing this loader.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Converter used for page documents.
    #[must_use]
    pub fn converter(&self) -> &Arc<dyn ContentConverter> {
        &self.converter
    }

    /// Load the whole tree, with links built and the path index filled.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::MissingDocument`] if any visited page directory
    /// lacks its document, or [`LoadError::Storage`] on other storage failures.
    pub fn load(&self) -> Result<SiteTree, LoadError> {
        let root = self.read_page("", "")?;
        let mut tree = SiteTree::new(root);
        let root_id = tree.root();
        self.load_children(&mut tree, root_id, &mut HashMap::new())?;
        tree.build_links();
        tree.index();
        tracing::info!(pages = tree.len(), "Loaded content tree");
        Ok(tree)
    }

    /// Re-read the page at `id` and its whole subtree from storage.
    ///
    /// The page keeps its id and its place under its parent, and every
    /// descendant still present at the same path keeps its id. If it is no
    /// longer enabled, it is detached and released (the root is always kept).
    /// Returns whether the page is still part of the tree.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the page or a descendant can't be read. The
    /// page's document is read before the tree is touched.
    pub fn reload_subtree(&self, tree: &mut SiteTree, id: PageId) -> Result<bool, LoadError> {
        let Some(page) = tree.get(id) else {
            return Ok(false);
        };
        let mut fresh = self.read_page(&page.name, &page.path)?;
        fresh.parent = page.parent;

        // Descendants that come back under the same path keep their ids.
        let mut reusable: HashMap<String, PageId> = tree
            .walk_from(id)
            .into_iter()
            .skip(1)
            .map(|descendant| (tree[descendant].path.clone(), descendant))
            .collect();
        tree.release_descendants(id);
        tree.reserve(reusable.values().copied());
        if let Some(slot) = tree.get_mut(id) {
            *slot = fresh;
        }
        let loaded = self.load_children(tree, id, &mut reusable);
        tree.unreserve(reusable.into_values());
        loaded?;

        let attached = id == tree.root() || tree[id].enabled;
        if !attached {
            tracing::info!(path = %tree[id].path, "Page disabled, removing from tree");
            tree.detach(id);
            tree.release_subtree(id);
        }

        tree.build_links();
        tree.index();
        Ok(attached)
    }

    /// Read one page directory into a detached [`Page`].
    fn read_page(&self, name: &str, path: &str) -> Result<Page, LoadError> {
        let document = join_path(path, DOCUMENT_NAME);
        let source = match self.storage.read(&document) {
            Ok(source) => source,
            Err(e) if e.is_not_found() => {
                return Err(LoadError::MissingDocument { path: document });
            }
            Err(e) => return Err(e.into()),
        };

        let content = self.converter.to_html(&source);
        let metadata = metadata::parse_block(self.converter.metadata_block(&source), path);

        Ok(Page::new(
            name.to_owned(),
            path.to_owned(),
            source,
            content,
            metadata,
        ))
    }

    /// Recursively load and attach the enabled children of `parent`.
    ///
    /// Pages whose path is in `reusable` are stored back under that id.
    fn load_children(
        &self,
        tree: &mut SiteTree,
        parent: PageId,
        reusable: &mut HashMap<String, PageId>,
    ) -> Result<(), LoadError> {
        let parent_path = tree[parent].path.clone();

        for name in self.storage.list_dirs(&parent_path)? {
            if name == ASSETS_DIR || name.starts_with('.') {
                continue;
            }

            let path = join_path(&parent_path, &name);
            let page = self.read_page(&name, &path)?;
            let id = match reusable.remove(&path) {
                Some(previous) => tree.insert_at(previous, page),
                None => tree.insert(page),
            };
            self.load_children(tree, id, reusable)?;

            if tree[id].enabled {
                if let Some(parent_page) = tree.get_mut(parent) {
                    parent_page.children.push(id);
                }
            } else {
                tracing::warn!(path = %path, "Skipping disabled page");
                tree.release_subtree(id);
            }
        }

        Ok(())
    }
}
