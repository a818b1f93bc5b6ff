//! String Utilities
//!
//! Small helpers shared by the Markdown preprocessors and the HTML assembler:
//! HTML escaping, UTF-8 safe stepping through a string, and indentation
//! measurement for block-level syntax.
//!
//! # Example
//! ```ignore
//! use crate::string_utils::{escape_html, indent_width};
//!
//! assert_eq!(escape_html("<b>"), "&lt;b&gt;");
//! assert_eq!(indent_width("\t  x"), 6);
//! ```

/// Columns a tab advances to when measuring indentation.
pub const TAB_WIDTH: usize = 4;

// ─────────────────────────────────────────────────────────────────────────────
// Escaping
// ─────────────────────────────────────────────────────────────────────────────

/// HTML-escape a string for use in text content or a quoted attribute value.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Escape only the characters that would change the meaning of text content.
///
/// Quotes are left alone so that text restored into raw HTML (for example a
/// `<script>` block written by the author) keeps its exact characters.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundaries
// ─────────────────────────────────────────────────────────────────────────────

/// Byte length of the character starting at `index`, or 0 past the end.
///
/// `index` must be on a character boundary.
#[inline]
pub fn char_len_at(s: &str, index: usize) -> usize {
    s.get(index..)
        .and_then(|rest| rest.chars().next())
        .map_or(0, char::len_utf8)
}

// ─────────────────────────────────────────────────────────────────────────────
// Indentation
// ─────────────────────────────────────────────────────────────────────────────

/// Width in columns of the leading whitespace of `line`.
pub fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += TAB_WIDTH - (width % TAB_WIDTH),
            _ => break,
        }
    }
    width
}

/// The leading whitespace of `line`, as written.
pub fn leading_whitespace(line: &str) -> &str {
    let end = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..end]
}

/// Remove up to `columns` columns of leading whitespace from `line`.
///
/// A tab that straddles the limit is consumed whole.
pub fn strip_indent(line: &str, columns: usize) -> &str {
    let mut width = 0;
    let mut offset = 0;
    for c in line.chars() {
        if width >= columns {
            break;
        }
        match c {
            ' ' => width += 1,
            '\t' => width += TAB_WIDTH - (width % TAB_WIDTH),
            _ => break,
        }
        offset += 1;
    }
    &line[offset..]
}

/// Whether a line contains only whitespace.
#[inline]
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("Hello"), "Hello");
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("\"quoted\""), "&quot;quoted&quot;");
        assert_eq!(escape_html("it's"), "it&#39;s");
    }

    #[test]
    fn test_escape_text_keeps_quotes() {
        assert_eq!(escape_text("a < b && \"c\""), "a &lt; b &amp;&amp; \"c\"");
    }

    #[test]
    fn test_char_len_at() {
        let s = "aø中🎉";
        assert_eq!(char_len_at(s, 0), 1);
        assert_eq!(char_len_at(s, 1), 2);
        assert_eq!(char_len_at(s, 3), 3);
        assert_eq!(char_len_at(s, 6), 4);
        assert_eq!(char_len_at(s, s.len()), 0);
    }

    #[test]
    fn test_indent_width() {
        assert_eq!(indent_width("text"), 0);
        assert_eq!(indent_width("    text"), 4);
        assert_eq!(indent_width("\ttext"), 4);
        assert_eq!(indent_width("  \ttext"), 4);
        assert_eq!(indent_width("\t  text"), 6);
        assert_eq!(indent_width("      "), 6);
    }

    #[test]
    fn test_leading_whitespace() {
        assert_eq!(leading_whitespace("  \t!!! note"), "  \t");
        assert_eq!(leading_whitespace("x"), "");
    }

    #[test]
    fn test_strip_indent() {
        assert_eq!(strip_indent("        code", 4), "    code");
        assert_eq!(strip_indent("\tbody", 4), "body");
        assert_eq!(strip_indent("  short", 4), "short");
        assert_eq!(strip_indent("", 4), "");
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("  \t "));
        assert!(!is_blank(" a "));
    }
}
