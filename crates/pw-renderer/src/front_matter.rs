//! Metadata block splitting.

/// Marker line that opens and closes a metadata block.
pub const DELIMITER: &str = "---";

/// A delimiter line is three or more dashes and nothing else.
fn is_delimiter(line: &str) -> bool {
    let line = line.trim_end();
    line.len() >= DELIMITER.len() && line.bytes().all(|b| b == b'-')
}

/// Split a document into its metadata block and body.
///
/// The block must open on the first non-blank line. Returns `(None, source)`
/// when there is no block or it is never closed. The returned block excludes
/// both delimiter lines and its trailing newline; the body starts right after
/// the closing delimiter line.
///
/// # Examples
///
/// ```
/// use pw_renderer::split_front_matter;
///
/// let (meta, body) = split_front_matter("---\ntitle: Home\n---\nWelcome");
/// assert_eq!(meta, Some("title: Home"));
/// assert_eq!(body, "Welcome");
///
/// assert_eq!(split_front_matter("Just text"), (None, "Just text"));
/// ```
#[must_use]
pub fn split_front_matter(source: &str) -> (Option<&str>, &str) {
    let trimmed = source.trim_start();
    let Some((first, rest)) = trimmed.split_once('\n') else {
        return (None, source);
    };
    if !is_delimiter(first) {
        return (None, source);
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if is_delimiter(line) {
            let block = rest[..offset].trim_end_matches(['\n', '\r']);
            let body = &rest[offset + line.len()..];
            return (Some(block), body);
        }
        offset += line.len();
    }

    (None, source)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_split_simple_block() {
        let (meta, body) = split_front_matter("---\ntitle: Home\nenabled: true\n---\n# Hi\n");

        assert_eq!(meta, Some("title: Home\nenabled: true"));
        assert_eq!(body, "# Hi\n");
    }

    #[test]
    fn test_split_empty_block() {
        let (meta, body) = split_front_matter("---\n---\nBody");

        assert_eq!(meta, Some(""));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_split_no_block() {
        assert_eq!(split_front_matter("# Title\n---\n"), (None, "# Title\n---\n"));
    }

    #[test]
    fn test_split_unclosed_block_is_body() {
        let source = "---\ntitle: Home\nno end";

        assert_eq!(split_front_matter(source), (None, source));
    }

    #[test]
    fn test_split_leading_blank_lines() {
        let (meta, body) = split_front_matter("\n\n---\na: 1\n---\nrest");

        assert_eq!(meta, Some("a: 1"));
        assert_eq!(body, "rest");
    }

    #[test]
    fn test_split_crlf_line_endings() {
        let (meta, body) = split_front_matter("---\r\ntitle: Home\r\n---\r\nBody");

        assert_eq!(meta, Some("title: Home"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_split_closing_at_eof() {
        let (meta, body) = split_front_matter("---\ntitle: Home\n---");

        assert_eq!(meta, Some("title: Home"));
        assert_eq!(body, "");
    }

    #[test]
    fn test_split_longer_dash_runs() {
        let (meta, _) = split_front_matter("-----\nx: y\n-----\n");

        assert_eq!(meta, Some("x: y"));
    }

    #[test]
    fn test_split_keeps_horizontal_rules_in_body() {
        let (_, body) = split_front_matter("---\nx: y\n---\nabove\n\n---\n\nbelow");

        assert_eq!(body, "above\n\n---\n\nbelow");
    }
}
