//! Markup pretty-printer.
//!
//! Re-indents flat markup (`<a><b/></a>`) one line per tag. This is a
//! streaming classifier over tag tokens with a depth counter, not a parser.
//! Only boundaries between two tags split the input, so an element holding
//! text stays on one line. Comments and one-character element names are
//! misindented in well-known ways, and that output is kept stable.

use std::sync::OnceLock;

use regex::Regex;

/// Boundary between two adjacent tags.
static TAG_BOUNDARY_REGEX: OnceLock<Regex> = OnceLock::new();

/// Token that closes an element.
static CLOSING_TAG_REGEX: OnceLock<Regex> = OnceLock::new();

/// Token that opens an element and leaves it open.
static OPENING_TAG_REGEX: OnceLock<Regex> = OnceLock::new();

const LINE_BREAK: &str = "\r\n";

#[allow(clippy::expect_used)]
fn tag_boundary_regex() -> &'static Regex {
    TAG_BOUNDARY_REGEX
        .get_or_init(|| Regex::new(r">\s*<").expect("Failed to compile tag boundary regex"))
}

#[allow(clippy::expect_used)]
fn closing_tag_regex() -> &'static Regex {
    CLOSING_TAG_REGEX
        .get_or_init(|| Regex::new(r"^/\w").expect("Failed to compile closing tag regex"))
}

// A leading `<` is optional because the first token keeps its bracket.
#[allow(clippy::expect_used)]
fn opening_tag_regex() -> &'static Regex {
    OPENING_TAG_REGEX.get_or_init(|| {
        Regex::new(r"^<?\w[^>]*[^/]$").expect("Failed to compile opening tag regex")
    })
}

/// Indents flat markup using `indent_unit` per nesting level.
///
/// Lines are joined with `\r\n`.
#[must_use]
pub fn format_markup(markup: &str, indent_unit: &str) -> String {
    let mut formatted = String::with_capacity(markup.len() * 2);
    let mut depth: usize = 0;

    for token in tag_boundary_regex().split(markup) {
        if closing_tag_regex().is_match(token) {
            depth = depth.saturating_sub(1);
        }

        formatted.push_str(&indent_unit.repeat(depth));
        formatted.push('<');
        formatted.push_str(token);
        formatted.push('>');
        formatted.push_str(LINE_BREAK);

        if opening_tag_regex().is_match(token) {
            depth += 1;
        }
    }

    // Every token was wrapped in `<...>`, so the first and last tokens carry
    // a doubled bracket. The first line is never indented.
    let end = formatted.len().saturating_sub(1 + LINE_BREAK.len());
    formatted.get(1..end).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_golden_text_content() {
        assert_eq!(
            format_markup("<a><b>x</b></a>", "\t"),
            "<a>\r\n<b>x</b>\r\n</a>"
        );
    }

    #[test]
    fn test_nested_elements() {
        let flat = "<cache><indexing><enabled>true</enabled></indexing></cache>";
        assert_eq!(
            format_markup(flat, "\t"),
            "<cache>\r\n\t<indexing>\r\n\t\t<enabled>true</enabled>\r\n\t</indexing>\r\n</cache>"
        );
    }

    #[test]
    fn test_self_terminating_does_not_indent() {
        let flat = "<cache><locking/><memory><storage>HEAP</storage></memory></cache>";
        assert_eq!(
            format_markup(flat, "  "),
            "<cache>\r\n  <locking/>\r\n  <memory>\r\n    <storage>HEAP</storage>\r\n  </memory>\r\n</cache>"
        );
    }

    #[test]
    fn test_single_tag() {
        assert_eq!(format_markup("<cache/>", "\t"), "<cache/>");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(format_markup("", "\t"), "");
    }

    #[test]
    fn test_whitespace_between_tags_is_dropped() {
        assert_eq!(
            format_markup("<root>  <item/>\n</root>", "\t"),
            "<root>\r\n\t<item/>\r\n</root>"
        );
    }

    #[test]
    fn test_unbalanced_close_never_underflows() {
        assert_eq!(format_markup("<x/></y></z>", "\t"), "<x/>\r\n</y>\r\n</z>");
    }
}
