//! Markdown to HTML conversion.

use pulldown_cmark::{Options, Parser, html};

use crate::front_matter::split_front_matter;

/// Converts a page's primary document into HTML and exposes its metadata block.
///
/// Implementations must strip the metadata block from the rendered body and
/// return it separately, untouched.
pub trait ContentConverter: Send + Sync {
    /// Render the document body (metadata block excluded) to HTML.
    fn to_html(&self, source: &str) -> String;

    /// Raw text of the metadata block, if the document has one.
    fn metadata_block<'a>(&self, source: &'a str) -> Option<&'a str>;

    /// Document body with the metadata block removed.
    fn body<'a>(&self, source: &'a str) -> &'a str;
}

/// pulldown-cmark based converter.
///
/// GFM extensions (tables, strikethrough, task lists, footnotes) are enabled
/// by default.
#[derive(Clone, Debug)]
pub struct MarkdownConverter {
    gfm: bool,
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self { gfm: true }
    }
}

impl MarkdownConverter {
    /// Create a converter with GFM extensions enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable GFM extensions.
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Get pulldown-cmark options for this converter.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.gfm {
            options.insert(Options::ENABLE_TABLES);
            options.insert(Options::ENABLE_STRIKETHROUGH);
            options.insert(Options::ENABLE_TASKLISTS);
            options.insert(Options::ENABLE_FOOTNOTES);
        }
        options
    }
}

impl ContentConverter for MarkdownConverter {
    fn to_html(&self, source: &str) -> String {
        let body = self.body(source);
        let parser = Parser::new_ext(body, self.parser_options());
        let mut output = String::with_capacity(body.len() * 3 / 2);
        html::push_html(&mut output, parser);
        output
    }

    fn metadata_block<'a>(&self, source: &'a str) -> Option<&'a str> {
        split_front_matter(source).0
    }

    fn body<'a>(&self, source: &'a str) -> &'a str {
        split_front_matter(source).1
    }
}
