//! Loaded site with tree mutations.
//!
//! [`Site`] owns one content tree together with the loader and storage it
//! came from. Mutations write to storage first and then bring the tree,
//! its links and its path index back in line:
//!
//! - [`Site::create`] writes a new page and reloads the parent subtree
//! - [`Site::save`] rewrites a page's document and reloads that page
//! - [`Site::delete`] removes a page directory and evicts its whole subtree
//!
//! Mutations are not meant to run concurrently with each other or with a
//! build; callers serialize them.

use std::sync::Arc;

use pw_renderer::ContentConverter;
use pw_storage::{Storage, StorageError, join_path};

use crate::loader::{ASSETS_DIR, DOCUMENT_NAME, LoadError, TreeLoader};
use crate::metadata;
use crate::page::{Metadata, Page, PageId};
use crate::tree::SiteTree;

/// Error returned by site operations.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// No page is indexed at this path.
    #[error("Page not found: '{0}'")]
    PageNotFound(String),
    /// A page with this path already exists.
    #[error("Page already exists: '{0}'")]
    AlreadyExists(String),
    /// Name can't be used for a page directory.
    #[error("Invalid page name: '{0}'")]
    InvalidName(String),
    /// Operation not allowed on this path.
    #[error("Invalid page path: '{0}'")]
    InvalidPath(String),
    /// Tree loading failed.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// Storage operation failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Metadata couldn't be serialized.
    #[error("Failed to serialize metadata: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// One loaded content tree and its backing storage.
pub struct Site {
    loader: TreeLoader,
    tree: SiteTree,
}

impl Site {
    /// Load a site from storage.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Load`] if the tree can't be loaded.
    pub fn load(
        storage: Arc<dyn Storage>,
        converter: Arc<dyn ContentConverter>,
    ) -> Result<Self, SiteError> {
        let loader = TreeLoader::new(storage, converter);
        let tree = loader.load()?;
        Ok(Self { loader, tree })
    }

    /// The loaded page tree.
    #[must_use]
    pub fn tree(&self) -> &SiteTree {
        &self.tree
    }

    /// Storage backing this site.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn Storage> {
        self.loader.storage()
    }

    /// Look up a page by path.
    #[must_use]
    pub fn find_by_path(&self, path: &str) -> Option<&Page> {
        self.tree.get(self.tree.find_by_path(path)?)
    }

    /// Look up a page id by path.
    #[must_use]
    pub fn page_id(&self, path: &str) -> Option<PageId> {
        self.tree.find_by_path(path)
    }

    /// Mutable metadata of a page, to be persisted with [`Site::save`].
    pub fn metadata_mut(&mut self, id: PageId) -> Option<&mut Metadata> {
        self.tree.get_mut(id).map(|page| &mut page.metadata)
    }

    /// Create a page under `parent_path`.
    ///
    /// Writes `<parent>/<name>/page.md` with `metadata` and an empty body,
    /// plus an empty assets folder, then reloads the parent subtree.
    /// Returns the new page's id, or `None` when the metadata disables it
    /// and it is therefore not part of the tree.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::PageNotFound`] if the parent isn't indexed,
    /// [`SiteError::InvalidName`] or [`SiteError::AlreadyExists`] for an
    /// unusable name. No storage writes happen in these cases.
    pub fn create(
        &mut self,
        parent_path: &str,
        name: &str,
        metadata: Metadata,
    ) -> Result<Option<PageId>, SiteError> {
        let parent = self
            .tree
            .find_by_path(parent_path)
            .ok_or_else(|| SiteError::PageNotFound(parent_path.to_owned()))?;
        validate_name(name)?;

        let path = join_path(parent_path, name);
        if self.storage().exists(&path) {
            return Err(SiteError::AlreadyExists(path));
        }
        let document = metadata::render_document(&metadata, "")?;

        self.storage().create_dir_all(&join_path(&path, ASSETS_DIR))?;
        self.storage()
            .write(&join_path(&path, DOCUMENT_NAME), &document)?;
        tracing::info!(path = %path, "Created page");

        self.loader.reload_subtree(&mut self.tree, parent)?;
        Ok(self.tree.find_by_path(&path))
    }

    /// Delete the page at `path` and its backing directory.
    ///
    /// Every descendant leaves the index along with the page.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::PageNotFound`] if `path` isn't indexed,
    /// [`SiteError::InvalidPath`] for the root, or [`SiteError::Storage`]
    /// if the directory can't be removed (the tree is left untouched).
    pub fn delete(&mut self, path: &str) -> Result<(), SiteError> {
        let id = self
            .tree
            .find_by_path(path)
            .ok_or_else(|| SiteError::PageNotFound(path.to_owned()))?;
        if id == self.tree.root() {
            return Err(SiteError::InvalidPath(path.to_owned()));
        }

        self.storage().remove_dir_all(path)?;

        self.tree.detach(id);
        self.tree.release_subtree(id);
        self.tree.build_links();
        tracing::info!(path, "Deleted page");
        Ok(())
    }

    /// Persist a page's metadata and reload it.
    ///
    /// The metadata block is rewritten from the page's current metadata
    /// (reserved keys excluded); the body is kept as is. The page and its
    /// children are then re-read. Returns whether the page is still part of
    /// the tree: saving `enabled: false` removes it.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::PageNotFound`] for a released page, or storage
    /// and load errors from writing and re-reading.
    pub fn save(&mut self, id: PageId) -> Result<bool, SiteError> {
        let page = self
            .tree
            .get(id)
            .ok_or_else(|| SiteError::PageNotFound(format!("{id:?}")))?;
        let body = self.loader.converter().body(&page.source);
        let document = metadata::render_document(&page.metadata, body)?;
        let path = page.path.clone();

        self.storage()
            .write(&join_path(&path, DOCUMENT_NAME), &document)?;
        tracing::info!(path = %path, "Saved page");

        Ok(self.loader.reload_subtree(&mut self.tree, id)?)
    }

    /// Files in a page's assets folder, relative to the page directory.
    ///
    /// Nested folders are flattened: `assets/img/a.png`, `assets/b.txt`.
    /// Paths keep the `assets/` prefix so they can be joined onto the page
    /// directory directly; strip it to get paths relative to the folder
    /// itself (`img/a.png`).
    /// A page without an assets folder has no assets.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::PageNotFound`] if `path` isn't indexed, or
    /// [`SiteError::Storage`] if the folder can't be listed.
    pub fn list_assets(&self, path: &str) -> Result<Vec<String>, SiteError> {
        if self.tree.find_by_path(path).is_none() {
            return Err(SiteError::PageNotFound(path.to_owned()));
        }

        let assets = join_path(path, ASSETS_DIR);
        if !self.storage().is_dir(&assets) {
            return Ok(Vec::new());
        }
        Ok(self
            .storage()
            .list_files(&assets)?
            .into_iter()
            .map(|file| join_path(ASSETS_DIR, &file))
            .collect())
    }
}

/// A page name is one visible directory name other than `assets`.
fn validate_name(name: &str) -> Result<(), SiteError> {
    let invalid = name.is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\'])
        || name == ASSETS_DIR;
    if invalid {
        return Err(SiteError::InvalidName(name.to_owned()));
    }
    Ok(())
}
