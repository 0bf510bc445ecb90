//! Content converter for pagewright.
//!
//! A page's primary document is markdown with an optional metadata block at
//! the top, delimited by `---` lines:
//!
//! ```text
//! ---
//! title: About
//! enabled: true
//! ---
//! # About us
//! ```
//!
//! This crate provides:
//! - [`ContentConverter`]: the interface the page-tree loader consumes
//! - [`MarkdownConverter`]: pulldown-cmark implementation with GFM extensions
//! - [`split_front_matter`]: the metadata-block splitter shared by both
//!
//! The metadata block is returned as raw text; parsing it is the caller's
//! concern.
//!
//! # Example
//!
//! ```
//! use pw_renderer::{ContentConverter, MarkdownConverter};
//!
//! let converter = MarkdownConverter::new();
//! let source = "---\ntitle: Hi\n---\n**Bold** text";
//!
//! assert_eq!(converter.metadata_block(source), Some("title: Hi"));
//! assert_eq!(converter.to_html(source), "<p><strong>Bold</strong> text</p>\n");
//! ```

mod converter;
mod front_matter;

pub use converter::{ContentConverter, MarkdownConverter};
pub use front_matter::{DELIMITER, split_front_matter};
