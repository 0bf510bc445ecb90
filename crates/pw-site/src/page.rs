//! Page node of the content tree.
//!
//! A [`Page`] is a fixed set of system fields plus an open metadata map.
//! Metadata keys overlay the system fields when a page is viewed
//! ([`Page::field`], [`Page::to_value`]), except `name` and `path` which
//! always come from the tree.

use std::collections::BTreeMap;

use pw_renderer::DELIMITER;
use serde_json::{Map, Value};

/// Author-supplied metadata of a page.
pub type Metadata = Map<String, Value>;

/// Number of characters kept in a page summary.
pub const SUMMARY_LENGTH: usize = 200;

/// System fields exposed on every page view, in dump order.
pub const SYSTEM_FIELDS: [&str; 7] = [
    "name",
    "path",
    "root_path",
    "source",
    "content",
    "summary",
    "enabled",
];

/// Stable handle of a page inside a [`SiteTree`](crate::SiteTree).
///
/// A page keeps its id across reloads for as long as its path exists. Ids
/// of removed pages may be handed out again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub(crate) usize);

/// One node of the content tree, backed by one storage directory.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub(crate) name: String,
    pub(crate) path: String,
    pub(crate) root_path: String,
    pub(crate) source: String,
    pub(crate) content: String,
    pub(crate) summary: String,
    pub(crate) metadata: Metadata,
    pub(crate) enabled: bool,
    pub(crate) children: Vec<PageId>,
    pub(crate) parent: Option<PageId>,
    pub(crate) by_name: BTreeMap<String, PageId>,
}

impl Page {
    /// Create a detached page from its loaded parts.
    ///
    /// `enabled` and `summary` are derived here; links are filled in later by
    /// [`SiteTree::build_links`](crate::SiteTree::build_links).
    pub(crate) fn new(
        name: String,
        path: String,
        source: String,
        content: String,
        metadata: Metadata,
    ) -> Self {
        Self {
            root_path: root_path(&path),
            summary: summary(&source),
            enabled: crate::metadata::is_enabled(&metadata),
            name,
            path,
            source,
            content,
            metadata,
            children: Vec::new(),
            parent: None,
            by_name: BTreeMap::new(),
        }
    }

    /// Directory name of the page. Empty for the root.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Slash-separated path from the tree root. Empty for the root.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Relative path from this page back to the tree root.
    #[must_use]
    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    /// Raw document text as read from storage.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Rendered HTML of the document body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Excerpt of the source following the metadata block.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Author-supplied metadata.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Whether the page takes part in the tree.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Ordered child pages.
    #[must_use]
    pub fn children(&self) -> &[PageId] {
        &self.children
    }

    /// Parent page, `None` for the root or before links are built.
    #[must_use]
    pub fn parent(&self) -> Option<PageId> {
        self.parent
    }

    /// Child lookup by name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<PageId> {
        self.by_name.get(name).copied()
    }

    /// Whether this is the tree root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Value of a system field, ignoring metadata.
    #[must_use]
    pub fn system_field(&self, key: &str) -> Option<Value> {
        let value = match key {
            "name" => Value::from(self.name.as_str()),
            "path" => Value::from(self.path.as_str()),
            "root_path" => Value::from(self.root_path.as_str()),
            "source" => Value::from(self.source.as_str()),
            "content" => Value::from(self.content.as_str()),
            "summary" => Value::from(self.summary.as_str()),
            "enabled" => Value::Bool(self.enabled),
            _ => return None,
        };
        Some(value)
    }

    /// Value of a field with the metadata overlay applied.
    ///
    /// Metadata wins over system fields, except for `name` and `path`.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<Value> {
        if !is_protected(key)
            && let Some(value) = self.metadata.get(key)
        {
            return Some(value.clone());
        }
        self.system_field(key)
    }

    /// Whether `key` currently resolves to metadata rather than a system field.
    #[must_use]
    pub fn is_overridden(&self, key: &str) -> bool {
        !is_protected(key) && self.metadata.contains_key(key)
    }

    /// Flat view of the page: system fields overlaid with metadata.
    #[must_use]
    pub fn to_value(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for key in SYSTEM_FIELDS {
            if let Some(value) = self.system_field(key) {
                map.insert(key.to_owned(), value);
            }
        }
        for (key, value) in &self.metadata {
            if !is_protected(key) {
                map.insert(key.clone(), value.clone());
            }
        }
        map
    }
}

/// Fields the tree owns and metadata can never shadow.
fn is_protected(key: &str) -> bool {
    key == "name" || key == "path"
}

/// Relative path back to the root: `"."` for the root, one `..` per segment otherwise.
///
/// # Examples
///
/// ```
/// use pw_site::root_path;
///
/// assert_eq!(root_path(""), ".");
/// assert_eq!(root_path("blog/post"), "../..");
/// ```
#[must_use]
pub fn root_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_owned();
    }
    vec![".."; path.split('/').count()].join("/")
}

/// Summary window of a document source.
///
/// Takes [`SUMMARY_LENGTH`] characters starting right after the last
/// metadata delimiter, or from the start when there is none.
#[must_use]
pub fn summary(source: &str) -> String {
    let start = source.rfind(DELIMITER).map_or(0, |i| i + DELIMITER.len());
    source[start..].chars().take(SUMMARY_LENGTH).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn page_with(metadata: Value) -> Page {
        let Value::Object(metadata) = metadata else {
            panic!("metadata must be an object");
        };
        Page::new(
            "post".to_owned(),
            "blog/post".to_owned(),
            "---\ntitle: Post\n---\nHello".to_owned(),
            "<p>Hello</p>\n".to_owned(),
            metadata,
        )
    }

    #[test]
    fn test_root_path() {
        assert_eq!(root_path(""), ".");
        assert_eq!(root_path("about"), "..");
        assert_eq!(root_path("a/b/c"), "../../..");
    }

    #[test]
    fn test_summary_after_last_delimiter() {
        assert_eq!(summary("---\ntitle: x\n---\nBody text"), "\nBody text");
    }

    #[test]
    fn test_summary_without_delimiter_starts_at_zero() {
        assert_eq!(summary("Plain body"), "Plain body");
    }

    #[test]
    fn test_summary_window_counts_chars() {
        let body = "é".repeat(300);
        let source = format!("---\n---\n{body}");

        let result = summary(&source);

        assert_eq!(result.chars().count(), SUMMARY_LENGTH);
        assert!(result.starts_with('\n'));
    }

    #[test]
    fn test_new_derives_fields() {
        let page = page_with(json!({"title": "Post"}));

        assert_eq!(page.root_path(), "../..");
        assert_eq!(page.summary(), "\nHello");
        assert!(page.is_enabled());
        assert!(!page.is_root());
    }

    #[test]
    fn test_disabled_from_metadata() {
        let page = page_with(json!({"enabled": false}));

        assert!(!page.is_enabled());
    }

    #[test]
    fn test_field_metadata_overlay() {
        let page = page_with(json!({"summary": "Custom", "title": "Post"}));

        assert_eq!(page.field("summary"), Some(json!("Custom")));
        assert_eq!(page.field("title"), Some(json!("Post")));
        assert_eq!(page.field("missing"), None);
        assert!(page.is_overridden("summary"));
    }

    #[test]
    fn test_field_name_and_path_are_protected() {
        let page = page_with(json!({"name": "other", "path": "elsewhere"}));

        assert_eq!(page.field("name"), Some(json!("post")));
        assert_eq!(page.field("path"), Some(json!("blog/post")));
        assert!(!page.is_overridden("name"));
    }

    #[test]
    fn test_to_value() {
        let page = page_with(json!({"title": "Post", "name": "ignored"}));

        let value = Value::Object(page.to_value());

        assert_eq!(
            value,
            json!({
                "name": "post",
                "path": "blog/post",
                "root_path": "../..",
                "source": "---\ntitle: Post\n---\nHello",
                "content": "<p>Hello</p>\n",
                "summary": "\nHello",
                "enabled": true,
                "title": "Post",
            })
        );
    }
}
