//! Metadata block parsing and serialization.
//!
//! The metadata block of a page document is YAML. Parsing never fails: an
//! absent, empty or malformed block yields an empty [`Metadata`] map.
//!
//! # Reserved Keys
//!
//! `name`, `path` and any key starting with `$` are owned by the system and
//! are never written back to storage.

use pw_renderer::DELIMITER;
use serde_json::Value;

use crate::page::Metadata;

/// Whether a metadata key is reserved for system use.
#[must_use]
pub fn is_reserved(key: &str) -> bool {
    key == "name" || key == "path" || key.starts_with('$')
}

/// Whether the metadata leaves the page enabled.
///
/// Only an explicit boolean `enabled: false` disables a page.
#[must_use]
pub fn is_enabled(metadata: &Metadata) -> bool {
    !matches!(metadata.get("enabled"), Some(Value::Bool(false)))
}

/// Parse a raw metadata block into a mapping.
///
/// `path` is only used for diagnostics.
#[must_use]
pub fn parse_block(block: Option<&str>, path: &str) -> Metadata {
    let Some(block) = block else {
        return Metadata::new();
    };
    if block.trim().is_empty() {
        return Metadata::new();
    }

    match serde_yaml::from_str::<Value>(block) {
        Ok(Value::Object(map)) => map,
        Ok(Value::Null) => Metadata::new(),
        Ok(_) => {
            tracing::warn!(path, "Metadata block is not a mapping, ignoring");
            Metadata::new()
        }
        Err(e) => {
            tracing::warn!(path, error = %e, "Invalid metadata block, ignoring");
            Metadata::new()
        }
    }
}

/// Keys of `metadata` that get persisted.
#[must_use]
pub fn persisted(metadata: &Metadata) -> Metadata {
    metadata
        .iter()
        .filter(|(key, _)| !is_reserved(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Build a page document from metadata and a body.
///
/// Reserved keys are dropped. An empty mapping still produces an empty
/// delimited block so the document keeps its shape.
///
/// # Errors
///
/// Returns an error if a value can't be represented as YAML.
pub fn render_document(metadata: &Metadata, body: &str) -> Result<String, serde_yaml::Error> {
    let persisted = persisted(metadata);
    let yaml = if persisted.is_empty() {
        String::new()
    } else {
        serde_yaml::to_string(&persisted)?
    };
    Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n{body}"))
}

/// Parse a single value the way it would read inside a metadata block.
///
/// `true` becomes a boolean, `3` a number, anything that isn't a YAML
/// scalar stays a string.
#[must_use]
pub fn parse_value(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::from(raw);
    }
    match serde_yaml::from_str::<Value>(raw) {
        Ok(value @ (Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Null)) => value,
        _ => Value::from(raw),
    }
}
