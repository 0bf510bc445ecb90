//! CLI command implementations.

mod build;
mod page;
mod route;

use std::sync::Arc;

use pw_config::Config;
use pw_renderer::MarkdownConverter;
use pw_site::{Site, metadata};
use pw_storage_fs::FsStorage;
use serde_json::Value;

pub(crate) use build::BuildArgs;
pub(crate) use page::PageCommand;
pub(crate) use route::RouteArgs;

use crate::error::CliError;

/// Load the content tree of one language.
pub(crate) fn load_site(config: &Config, lang: &str) -> Result<Site, CliError> {
    let dir = config.language_dir(lang);
    if lang.starts_with('.') || lang.contains(['/', '\\']) || !dir.is_dir() {
        return Err(CliError::Validation(format!(
            "language '{lang}' not found in {}",
            config.paths_resolved.content_dir.display()
        )));
    }

    let storage = Arc::new(FsStorage::new(dir));
    Ok(Site::load(storage, Arc::new(MarkdownConverter::new()))?)
}

/// Page path as typed by a user, in index form.
///
/// Surrounding slashes are dropped; `/` and `.` name the root.
pub(crate) fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed == "." {
        return String::new();
    }
    trimmed.to_owned()
}

/// Parse a `key=value` argument into a metadata entry.
///
/// The value is read as a YAML scalar, so `true` and `3` keep their types.
pub(crate) fn parse_key_value(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    if metadata::is_reserved(key) {
        return Err(format!("'{key}' is reserved and can't be set"));
    }
    Ok((key.to_owned(), metadata::parse_value(value)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/blog/post/"), "blog/post");
        assert_eq!(normalize_path("blog"), "blog");
        assert_eq!(normalize_path("/"), "");
        assert_eq!(normalize_path("."), "");
        assert_eq!(normalize_path(""), "");
    }

    #[test]
    fn test_parse_key_value_scalars() {
        assert_eq!(
            parse_key_value("enabled=false").unwrap(),
            ("enabled".to_owned(), json!(false))
        );
        assert_eq!(
            parse_key_value("order=3").unwrap(),
            ("order".to_owned(), json!(3))
        );
        assert_eq!(
            parse_key_value("title=Hello world").unwrap(),
            ("title".to_owned(), json!("Hello world"))
        );
    }

    #[test]
    fn test_parse_key_value_splits_on_first_equals() {
        assert_eq!(
            parse_key_value("query=a=b").unwrap(),
            ("query".to_owned(), json!("a=b"))
        );
    }

    #[test]
    fn test_parse_key_value_empty_value_is_string() {
        assert_eq!(
            parse_key_value("title=").unwrap(),
            ("title".to_owned(), json!(""))
        );
    }

    #[test]
    fn test_parse_key_value_rejects_malformed() {
        assert!(parse_key_value("title").is_err());
        assert!(parse_key_value("=value").is_err());
    }

    #[test]
    fn test_parse_key_value_rejects_reserved() {
        assert!(parse_key_value("name=other").is_err());
        assert!(parse_key_value("path=x").is_err());
        assert!(parse_key_value("$id=1").is_err());
    }

    #[test]
    fn test_load_site_unknown_language() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("content/en")).unwrap();
        std::fs::write(temp_dir.path().join("content/en/page.md"), "Home").unwrap();
        let config_path = temp_dir.path().join("pw.toml");
        std::fs::write(&config_path, "[site]\ntitle = \"Test\"\n").unwrap();
        let config = Config::load(Some(config_path.as_path()), None).unwrap();

        assert!(load_site(&config, "en").is_ok());
        assert!(matches!(
            load_site(&config, "fr"),
            Err(CliError::Validation(_))
        ));
        assert!(matches!(
            load_site(&config, "../content"),
            Err(CliError::Validation(_))
        ));
    }
}
