//! `pw page` subcommand group.

use std::path::Path;

use clap::{Args, Subcommand};
use pw_config::Config;
use pw_site::{Metadata, Site, SiteError};
use serde_json::Value;

use super::{load_site, normalize_path, parse_key_value};
use crate::error::CliError;
use crate::output::Output;

/// Page management commands.
#[derive(Subcommand)]
pub(crate) enum PageCommand {
    /// Create a page with optional metadata.
    New(NewArgs),
    /// Delete a page and everything below it.
    Delete(PathArgs),
    /// Update page metadata.
    Set(SetArgs),
    /// List a page's asset files.
    Assets(PathArgs),
    /// Print the page tree of a language.
    List(ListArgs),
}

impl PageCommand {
    /// Execute the page subcommand.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let config = Config::load(config_path, None)?;
        let output = Output::new();
        match self {
            Self::New(args) => args.execute(&config, &output),
            Self::Delete(args) => args.delete(&config, &output),
            Self::Set(args) => args.execute(&config, &output),
            Self::Assets(args) => args.assets(&config, &output),
            Self::List(args) => args.execute(&config, &output),
        }
    }
}

/// Arguments for `page new`.
#[derive(Args)]
pub(crate) struct NewArgs {
    /// Content language.
    lang: String,

    /// Path of the parent page (`/` for the root).
    parent: String,

    /// Directory name of the new page.
    name: String,

    /// Metadata entry, repeatable.
    #[arg(long = "meta", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    meta: Vec<(String, Value)>,
}

impl NewArgs {
    fn execute(self, config: &Config, output: &Output) -> Result<(), CliError> {
        let mut site = load_site(config, &self.lang)?;
        let parent = normalize_path(&self.parent);
        let metadata: Metadata = self.meta.into_iter().collect();

        match site.create(&parent, &self.name, metadata)? {
            Some(id) => output.success(&format!("Created page '{}'", site.tree()[id].path())),
            None => output.warning(&format!(
                "Created page '{}', disabled so not part of the site",
                self.name
            )),
        }
        Ok(())
    }
}

/// Arguments naming a single page.
#[derive(Args)]
pub(crate) struct PathArgs {
    /// Content language.
    lang: String,

    /// Page path (`/` for the root).
    path: String,
}

impl PathArgs {
    fn delete(self, config: &Config, output: &Output) -> Result<(), CliError> {
        let mut site = load_site(config, &self.lang)?;
        let path = normalize_path(&self.path);

        site.delete(&path)?;
        output.success(&format!("Deleted page '{path}'"));
        Ok(())
    }

    fn assets(self, config: &Config, output: &Output) -> Result<(), CliError> {
        let site = load_site(config, &self.lang)?;
        let path = normalize_path(&self.path);

        for asset in site.list_assets(&path)? {
            output.result(&asset);
        }
        Ok(())
    }
}

/// Arguments for `page set`.
#[derive(Args)]
pub(crate) struct SetArgs {
    /// Content language.
    lang: String,

    /// Page path (`/` for the root).
    path: String,

    /// Metadata entries to set.
    #[arg(required = true, value_name = "KEY=VALUE", value_parser = parse_key_value)]
    fields: Vec<(String, Value)>,
}

impl SetArgs {
    fn execute(self, config: &Config, output: &Output) -> Result<(), CliError> {
        let mut site = load_site(config, &self.lang)?;
        let path = normalize_path(&self.path);

        if set_metadata(&mut site, &path, self.fields)? {
            output.success(&format!("Updated page '{path}'"));
        } else {
            output.warning(&format!(
                "Updated page '{path}', now disabled and removed from the site"
            ));
        }
        Ok(())
    }
}

/// Merge entries into a page's metadata and save it.
///
/// Returns whether the page is still part of the tree.
fn set_metadata(
    site: &mut Site,
    path: &str,
    fields: Vec<(String, Value)>,
) -> Result<bool, SiteError> {
    let id = site
        .page_id(path)
        .ok_or_else(|| SiteError::PageNotFound(path.to_owned()))?;
    if let Some(metadata) = site.metadata_mut(id) {
        metadata.extend(fields);
    }
    site.save(id)
}

/// Arguments for `page list`.
#[derive(Args)]
pub(crate) struct ListArgs {
    /// Content language.
    lang: String,
}

impl ListArgs {
    fn execute(self, config: &Config, output: &Output) -> Result<(), CliError> {
        let site = load_site(config, &self.lang)?;
        for (line, title) in tree_lines(&site) {
            match title {
                Some(title) => output.result_with_note(&line, &format!("({title})")),
                None => output.result(&line),
            }
        }
        Ok(())
    }
}

/// One line per page in pre-order, indented by depth, with its title.
fn tree_lines(site: &Site) -> Vec<(String, Option<String>)> {
    let tree = site.tree();
    tree.walk()
        .into_iter()
        .map(|id| {
            let page = &tree[id];
            let line = if page.is_root() {
                "/".to_owned()
            } else {
                let depth = page.path().split('/').count();
                format!("{}{}", "  ".repeat(depth), page.name())
            };
            let title = match page.field("title") {
                Some(Value::String(title)) => Some(title),
                Some(Value::Null) | None => None,
                Some(other) => Some(other.to_string()),
            };
            (line, title)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use pw_renderer::MarkdownConverter;
    use pw_storage_fs::FsStorage;
    use serde_json::json;

    use super::*;

    fn site(files: &[(&str, &str)]) -> (tempfile::TempDir, Site) {
        let temp_dir = tempfile::tempdir().unwrap();
        for (path, content) in files {
            let file = temp_dir.path().join(path);
            fs::create_dir_all(file.parent().unwrap()).unwrap();
            fs::write(file, content).unwrap();
        }
        let storage = Arc::new(FsStorage::new(temp_dir.path().to_path_buf()));
        let site = Site::load(storage, Arc::new(MarkdownConverter::new())).unwrap();
        (temp_dir, site)
    }

    #[test]
    fn test_tree_lines() {
        let (_temp_dir, site) = site(&[
            ("page.md", "---\ntitle: Home\n---\n"),
            ("blog/page.md", "---\ntitle: Blog\n---\n"),
            ("blog/post/page.md", "Post"),
            ("about/page.md", "---\ntitle: 42\n---\n"),
        ]);

        assert_eq!(
            tree_lines(&site),
            vec![
                ("/".to_owned(), Some("Home".to_owned())),
                ("  about".to_owned(), Some("42".to_owned())),
                ("  blog".to_owned(), Some("Blog".to_owned())),
                ("    post".to_owned(), None),
            ]
        );
    }

    #[test]
    fn test_set_metadata_persists() {
        let (temp_dir, mut site) = site(&[
            ("page.md", "Home"),
            ("blog/page.md", "---\ntitle: Blog\n---\nPosts"),
        ]);

        let kept = set_metadata(
            &mut site,
            "blog",
            vec![("order".to_owned(), json!(2)), ("title".to_owned(), json!("News"))],
        )
        .unwrap();

        assert!(kept);
        let page = site.find_by_path("blog").unwrap();
        assert_eq!(page.metadata().get("title"), Some(&json!("News")));
        assert_eq!(page.metadata().get("order"), Some(&json!(2)));
        let document = fs::read_to_string(temp_dir.path().join("blog/page.md")).unwrap();
        assert!(document.ends_with("---\nPosts"));
        assert!(document.contains("title: News"));
    }

    #[test]
    fn test_set_metadata_disable_removes_page() {
        let (_temp_dir, mut site) = site(&[("page.md", "Home"), ("blog/page.md", "Posts")]);

        let kept =
            set_metadata(&mut site, "blog", vec![("enabled".to_owned(), json!(false))]).unwrap();

        assert!(!kept);
        assert!(site.find_by_path("blog").is_none());
    }

    #[test]
    fn test_set_metadata_unknown_page() {
        let (_temp_dir, mut site) = site(&[("page.md", "Home")]);

        let result = set_metadata(&mut site, "missing", vec![("a".to_owned(), json!(1))]);

        assert!(matches!(result, Err(SiteError::PageNotFound(_))));
    }
}
