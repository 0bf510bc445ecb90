//! Template-facing page view.
//!
//! Templates see each page as a lazy [`PageObject`]: fields are resolved on
//! access, so walking `page.parent.pages` never serializes the whole tree.
//!
//! Available attributes: `name`, `path`, `root_path` (safe, for `href`s),
//! `source`, `content` (safe HTML), `summary`, `enabled`, `pages` (ordered children), `parent`
//! and `children` (name to child). Metadata keys are overlaid and may shadow
//! any of these except `name` and `path`.

use std::collections::BTreeMap;
use std::sync::Arc;

use minijinja::Value;
use minijinja::value::{Enumerator, Object};
use pw_site::{PageId, SYSTEM_FIELDS, SiteTree};

/// Navigation attributes derived from the tree.
const LINK_FIELDS: [&str; 3] = ["pages", "parent", "children"];

/// One page of a shared tree, exposed to templates.
#[derive(Debug)]
pub(crate) struct PageObject {
    tree: Arc<SiteTree>,
    id: PageId,
}

impl PageObject {
    /// Template value for page `id`.
    pub(crate) fn value(tree: &Arc<SiteTree>, id: PageId) -> Value {
        Value::from_object(Self {
            tree: Arc::clone(tree),
            id,
        })
    }

    fn link(&self, key: &str) -> Option<Value> {
        let page = self.tree.get(self.id)?;
        let value = match key {
            "pages" => Value::from(
                page.children()
                    .iter()
                    .map(|&child| Self::value(&self.tree, child))
                    .collect::<Vec<_>>(),
            ),
            "parent" => page
                .parent()
                .map_or(Value::from(()), |parent| Self::value(&self.tree, parent)),
            "children" => Value::from(
                page.children()
                    .iter()
                    .map(|&child| (self.tree[child].name().to_owned(), Self::value(&self.tree, child)))
                    .collect::<BTreeMap<_, _>>(),
            ),
            _ => return None,
        };
        Some(value)
    }
}

impl Object for PageObject {
    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        let key = key.as_str()?;
        let page = self.tree.get(self.id)?;

        if page.is_overridden(key) {
            return page.field(key).map(Value::from_serialize);
        }
        match key {
            "content" => Some(Value::from_safe_string(page.content().to_owned())),
            "root_path" => Some(Value::from_safe_string(page.root_path().to_owned())),
            "pages" | "parent" | "children" => self.link(key),
            _ => page.field(key).map(Value::from_serialize),
        }
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        let Some(page) = self.tree.get(self.id) else {
            return Enumerator::Empty;
        };
        let mut keys: Vec<Value> = SYSTEM_FIELDS
            .iter()
            .chain(LINK_FIELDS.iter())
            .map(|&key| Value::from(key))
            .collect();
        keys.extend(
            page.metadata()
                .keys()
                .filter(|key| {
                    !SYSTEM_FIELDS.contains(&key.as_str()) && !LINK_FIELDS.contains(&key.as_str())
                })
                .map(|key| Value::from(key.as_str())),
        );
        Enumerator::Values(keys)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use pw_renderer::MarkdownConverter;
    use pw_site::Site;
    use pw_storage::MockStorage;

    use super::*;

    fn tree() -> Arc<SiteTree> {
        let storage = MockStorage::new()
            .with_file("page.md", "---\ntitle: Home\n---\n# Home")
            .with_file("blog/page.md", "---\ntitle: Blog\nsummary: Custom\n---\n*Posts*")
            .with_file("blog/post/page.md", "---\ntitle: Post\nname: ignored\n---\nHello")
            .with_file("about/page.md", "About");
        let site = Site::load(Arc::new(storage), Arc::new(MarkdownConverter::new())).unwrap();
        Arc::new(site.tree().clone())
    }

    fn render(tree: &Arc<SiteTree>, path: &str, source: &str) -> String {
        let id = tree.find_by_path(path).unwrap();
        let mut env = minijinja::Environment::new();
        env.add_template("test", source).unwrap();
        env.get_template("test")
            .unwrap()
            .render(minijinja::context! { page => PageObject::value(tree, id) })
            .unwrap()
    }

    #[test]
    fn test_system_fields() {
        let tree = tree();

        assert_eq!(
            render(&tree, "blog/post", "{{ page.name }}|{{ page.path }}|{{ page.root_path }}"),
            "post|blog/post|../.."
        );
    }

    #[test]
    fn test_root_path_is_not_escaped() {
        let tree = tree();
        let id = tree.find_by_path("blog/post").unwrap();
        let mut env = minijinja::Environment::new();
        env.add_template("link.html", "<a href=\"{{ page.root_path }}/about\">")
            .unwrap();

        let html = env
            .get_template("link.html")
            .unwrap()
            .render(minijinja::context! { page => PageObject::value(&tree, id) })
            .unwrap();

        assert_eq!(html, "<a href=\"../../about\">");
    }

    #[test]
    fn test_content_is_safe_html() {
        let tree = tree();

        assert_eq!(render(&tree, "blog", "{{ page.content }}"), "<p><em>Posts</em></p>\n");
    }

    #[test]
    fn test_metadata_overlay() {
        let tree = tree();

        assert_eq!(
            render(&tree, "blog", "{{ page.title }}|{{ page.summary }}"),
            "Blog|Custom"
        );
        assert_eq!(render(&tree, "blog/post", "{{ page.name }}"), "post");
    }

    #[test]
    fn test_navigation() {
        let tree = tree();

        assert_eq!(
            render(&tree, "", "{% for p in page.pages %}{{ p.title or p.name }};{% endfor %}"),
            "about;Blog;"
        );
        assert_eq!(render(&tree, "blog/post", "{{ page.parent.title }}"), "Blog");
        assert_eq!(render(&tree, "", "{{ page.children.blog.children.post.title }}"), "Post");
        assert_eq!(
            render(&tree, "", "{% if page.parent is none %}root{% endif %}"),
            "root"
        );
    }

    #[test]
    fn test_missing_attribute_is_undefined() {
        let tree = tree();

        assert_eq!(
            render(
                &tree,
                "about",
                "{% if page.title is defined %}titled{% else %}untitled{% endif %}"
            ),
            "untitled"
        );
    }
}
