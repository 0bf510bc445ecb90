//! Arena-backed page tree.
//!
//! Pages live in a flat slot vector and refer to each other by [`PageId`].
//! Ownership runs one way only, parent to children; the parent link and the
//! name-keyed child lookup are derived by [`SiteTree::build_links`], and the
//! path lookup by [`SiteTree::index`].
//!
//! # Architecture
//!
//! - O(1) path lookups via the `path_index` `HashMap`
//! - Released slots are recycled by later inserts
//! - Pre-order walks follow each page's `children` order

use std::collections::{BTreeMap, HashMap, HashSet};

use serde_json::{Map, Value};

use crate::page::{Page, PageId};

/// Content tree with path index.
#[derive(Clone, Debug)]
pub struct SiteTree {
    slots: Vec<Option<Page>>,
    free: Vec<usize>,
    root: PageId,
    path_index: HashMap<String, PageId>,
}

impl SiteTree {
    /// Create a tree holding only `root`.
    pub(crate) fn new(root: Page) -> Self {
        let mut path_index = HashMap::new();
        path_index.insert(root.path.clone(), PageId(0));
        Self {
            slots: vec![Some(root)],
            free: Vec::new(),
            root: PageId(0),
            path_index,
        }
    }

    /// The root page.
    #[must_use]
    pub fn root(&self) -> PageId {
        self.root
    }

    /// Get a page by id. `None` if the page has been released.
    #[must_use]
    pub fn get(&self, id: PageId) -> Option<&Page> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, id: PageId) -> Option<&mut Page> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Number of indexed pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.path_index.len()
    }

    /// Always false: a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path_index.is_empty()
    }

    /// Look up a page by path.
    ///
    /// # Arguments
    ///
    /// * `path` - Slash-separated page path (`""` for the root)
    #[must_use]
    pub fn find_by_path(&self, path: &str) -> Option<PageId> {
        self.path_index.get(path).copied()
    }

    /// Page ids in pre-order, starting at the root.
    #[must_use]
    pub fn walk(&self) -> Vec<PageId> {
        self.walk_from(self.root)
    }

    /// Page ids of the subtree rooted at `id`, in pre-order, `id` first.
    #[must_use]
    pub fn walk_from(&self, id: PageId) -> Vec<PageId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(page) = self.get(current) else {
                continue;
            };
            order.push(current);
            stack.extend(page.children.iter().rev().copied());
        }
        order
    }

    /// Set parent back-references and per-page name lookups.
    ///
    /// Re-derives every link from the `children` sequences, so calling it
    /// again on an unchanged tree produces the same links.
    pub fn build_links(&mut self) {
        if let Some(root) = self.get_mut(self.root) {
            root.parent = None;
        }
        for id in self.walk() {
            let children = self[id].children.clone();
            let mut by_name = BTreeMap::new();
            for child_id in children {
                if let Some(child) = self.get_mut(child_id) {
                    child.parent = Some(id);
                    by_name.insert(child.name.clone(), child_id);
                }
            }
            if let Some(page) = self.get_mut(id) {
                page.by_name = by_name;
            }
        }
        tracing::debug!(pages = self.slots.len() - self.free.len(), "Built page links");
    }

    /// Rebuild the path index from the pages reachable from the root.
    pub fn index(&mut self) {
        let index = self
            .walk()
            .into_iter()
            .map(|id| (self[id].path.clone(), id))
            .collect();
        self.path_index = index;
        tracing::debug!(pages = self.path_index.len(), "Indexed page tree");
    }

    /// Store a detached page and return its id.
    pub(crate) fn insert(&mut self, page: Page) -> PageId {
        if let Some(slot) = self.free.pop() {
            self.slots[slot] = Some(page);
            PageId(slot)
        } else {
            self.slots.push(Some(page));
            PageId(self.slots.len() - 1)
        }
    }

    /// Take released slots out of reuse so [`SiteTree::insert_at`] can
    /// refill them.
    pub(crate) fn reserve(&mut self, ids: impl IntoIterator<Item = PageId>) {
        let reserved: HashSet<usize> = ids.into_iter().map(|id| id.0).collect();
        self.free.retain(|slot| !reserved.contains(slot));
    }

    /// Store a page in the empty slot `id`, or in any free slot if `id` is
    /// taken.
    pub(crate) fn insert_at(&mut self, id: PageId, page: Page) -> PageId {
        if self.slots.get(id.0).is_some_and(Option::is_none) {
            self.slots[id.0] = Some(page);
            id
        } else {
            self.insert(page)
        }
    }

    /// Return reserved slots that were not refilled to the free list.
    pub(crate) fn unreserve(&mut self, ids: impl IntoIterator<Item = PageId>) {
        for id in ids {
            if self.slots.get(id.0).is_some_and(Option::is_none) && !self.free.contains(&id.0) {
                self.free.push(id.0);
            }
        }
    }

    /// Remove `id` from its parent's children and name lookup.
    pub(crate) fn detach(&mut self, id: PageId) {
        let Some(page) = self.get(id) else {
            return;
        };
        let (parent_id, name) = (page.parent, page.name.clone());
        if let Some(parent) = parent_id.and_then(|p| self.get_mut(p)) {
            parent.children.retain(|&child| child != id);
            if parent.by_name.get(&name) == Some(&id) {
                parent.by_name.remove(&name);
            }
        }
        if let Some(page) = self.get_mut(id) {
            page.parent = None;
        }
    }

    /// Release `id` and all its descendants, dropping their index entries.
    pub(crate) fn release_subtree(&mut self, id: PageId) {
        for released in self.walk_from(id) {
            self.release(released);
        }
    }

    /// Release every descendant of `id`, leaving `id` with no children.
    pub(crate) fn release_descendants(&mut self, id: PageId) {
        let children = self
            .get_mut(id)
            .map(|page| {
                page.by_name.clear();
                std::mem::take(&mut page.children)
            })
            .unwrap_or_default();
        for child in children {
            self.release_subtree(child);
        }
    }

    fn release(&mut self, id: PageId) {
        if let Some(page) = self.slots.get_mut(id.0).and_then(Option::take) {
            if self.path_index.get(&page.path) == Some(&id) {
                self.path_index.remove(&page.path);
            }
            self.free.push(id.0);
        }
    }

    /// Nested dump of the subtree at `id`.
    ///
    /// Each page is its overlaid field view plus a `pages` array of its
    /// children.
    #[must_use]
    pub fn to_json(&self, id: PageId) -> Value {
        let Some(page) = self.get(id) else {
            return Value::Null;
        };
        let mut map: Map<String, Value> = page.to_value();
        let pages = page.children.iter().map(|&child| self.to_json(child)).collect();
        map.insert("pages".to_owned(), Value::Array(pages));
        Value::Object(map)
    }
}

impl std::ops::Index<PageId> for SiteTree {
    type Output = Page;

    /// # Panics
    ///
    /// Panics if the page has been released.
    fn index(&self, id: PageId) -> &Page {
        match self.get(id) {
            Some(page) => page,
            None => panic!("page {id:?} has been released"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::page::Metadata;

    fn page(path: &str) -> Page {
        let name = path.rsplit('/').next().unwrap_or_default().to_owned();
        Page::new(
            name,
            path.to_owned(),
            String::new(),
            String::new(),
            Metadata::new(),
        )
    }

    /// Build root -> {blog -> {post}, about} with links and index.
    fn sample() -> SiteTree {
        let mut tree = SiteTree::new(page(""));
        let about = tree.insert(page("about"));
        let blog = tree.insert(page("blog"));
        let post = tree.insert(page("blog/post"));
        tree.get_mut(blog).unwrap().children.push(post);
        let root = tree.root();
        tree.get_mut(root).unwrap().children.extend([about, blog]);
        tree.build_links();
        tree.index();
        tree
    }

    fn links(tree: &SiteTree) -> Vec<(PageId, Option<PageId>, Vec<(String, PageId)>)> {
        tree.walk()
            .into_iter()
            .map(|id| {
                let page = &tree[id];
                let by_name = page.by_name.iter().map(|(k, v)| (k.clone(), *v)).collect();
                (id, page.parent, by_name)
            })
            .collect()
    }

    #[test]
    fn test_walk_is_pre_order() {
        let tree = sample();

        let paths: Vec<&str> = tree.walk().into_iter().map(|id| tree[id].path()).collect();

        assert_eq!(paths, vec!["", "about", "blog", "blog/post"]);
    }

    #[test]
    fn test_build_links_sets_parents_and_names() {
        let tree = sample();
        let blog = tree.find_by_path("blog").unwrap();
        let post = tree.find_by_path("blog/post").unwrap();

        assert_eq!(tree[post].parent(), Some(blog));
        assert_eq!(tree[blog].parent(), Some(tree.root()));
        assert_eq!(tree[tree.root()].parent(), None);
        assert_eq!(tree[blog].child("post"), Some(post));
        assert_eq!(tree[tree.root()].child("post"), None);
    }

    #[test]
    fn test_build_links_is_idempotent() {
        let mut tree = sample();
        let before = links(&tree);

        tree.build_links();
        tree.build_links();

        assert_eq!(links(&tree), before);
    }

    #[test]
    fn test_paths_join_parent_and_name() {
        let tree = sample();

        for id in tree.walk() {
            let page = &tree[id];
            if let Some(parent) = page.parent() {
                let expected = pw_storage::join_path(tree[parent].path(), page.name());
                assert_eq!(page.path(), expected);
            }
        }
    }

    #[test]
    fn test_index_matches_reachable_pages() {
        let tree = sample();

        assert_eq!(tree.len(), 4);
        for id in tree.walk() {
            assert_eq!(tree.find_by_path(tree[id].path()), Some(id));
        }
        assert_eq!(tree.find_by_path("missing"), None);
    }

    #[test]
    fn test_reserved_slot_is_refilled_by_id() {
        let mut tree = sample();
        let about = tree.find_by_path("about").unwrap();
        let blog = tree.find_by_path("blog").unwrap();
        tree.detach(about);
        tree.release_subtree(about);

        tree.reserve([about]);
        let other = tree.insert(page("other"));
        let refilled = tree.insert_at(about, page("about"));

        assert_ne!(other, about);
        assert_eq!(refilled, about);
        assert_eq!(tree[about].path(), "about");
        assert_eq!(tree[blog].path(), "blog");
    }

    #[test]
    fn test_unreserve_frees_unused_slots() {
        let mut tree = sample();
        let about = tree.find_by_path("about").unwrap();
        tree.detach(about);
        tree.release_subtree(about);
        tree.reserve([about]);

        tree.unreserve([about]);

        assert_eq!(tree.insert(page("other")), about);
    }

    #[test]
    fn test_detach_and_release_subtree() {
        let mut tree = sample();
        let blog = tree.find_by_path("blog").unwrap();

        tree.detach(blog);
        tree.release_subtree(blog);

        assert_eq!(tree.find_by_path("blog"), None);
        assert_eq!(tree.find_by_path("blog/post"), None);
        assert!(tree.get(blog).is_none());
        assert_eq!(tree[tree.root()].child("blog"), None);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_release_descendants_keeps_page() {
        let mut tree = sample();
        let blog = tree.find_by_path("blog").unwrap();

        tree.release_descendants(blog);

        assert!(tree[blog].children().is_empty());
        assert_eq!(tree.find_by_path("blog"), Some(blog));
        assert_eq!(tree.find_by_path("blog/post"), None);
    }

    #[test]
    fn test_insert_reuses_released_slots() {
        let mut tree = sample();
        let about = tree.find_by_path("about").unwrap();
        tree.detach(about);
        tree.release_subtree(about);

        let id = tree.insert(page("contact"));

        assert_eq!(id, about);
    }

    #[test]
    fn test_to_json_nests_pages() {
        let tree = sample();
        let blog = tree.find_by_path("blog").unwrap();

        let dump = tree.to_json(blog);

        assert_eq!(dump["name"], json!("blog"));
        assert_eq!(dump["pages"][0]["path"], json!("blog/post"));
        assert_eq!(dump["pages"][0]["pages"], json!([]));
    }
}
