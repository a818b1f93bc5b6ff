//! Admonition blocks
//!
//! Expands the `!!!` callout syntax into raw HTML containers before the
//! Markdown parser runs:
//!
//! ```text
//! !!! warning "Careful"
//!     Body text, **Markdown** allowed.
//! ```
//!
//! becomes
//!
//! ```html
//! <div class="admonition adm-warning">
//! <div class="adm-title">Careful</div>
//! <div class="adm-body">
//!
//! Body text, **Markdown** allowed.
//!
//! </div>
//! </div>
//! ```
//!
//! The blank lines around the body end the raw HTML blocks so that the body
//! is parsed as ordinary Markdown. The body is every following line that is
//! blank or indented four columns deeper than the marker; admonitions nest.
//!
//! Fenced code and indented code blocks are copied unchanged. A line indented
//! four or more columns starts indented code when it follows a blank line or
//! opens the block, unless it continues a list item.

use std::sync::OnceLock;

use regex::Regex;

use super::fence::Fence;
use crate::string_utils::{escape_html, indent_width, is_blank, leading_whitespace, strip_indent};

/// Extra indentation the body needs relative to the marker line.
const BODY_INDENT: usize = 4;

fn list_item_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[ ]{0,3}(?:[-+*]|[0-9]{1,9}[.)])(?:[ \t]|$)")
            .expect("list item pattern is valid")
    })
}

fn marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^[ \t]*!!![ \t]*([A-Za-z][\w-]*)(?:[ \t]+"([^"]*)")?[ \t]*$"#)
            .expect("admonition marker pattern is valid")
    })
}

/// A parsed `!!! kind "title"` marker line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Lower-cased admonition kind, e.g. `warning`.
    pub kind: String,
    /// Title to display; `None` when the author wrote an empty `""`.
    pub title: Option<String>,
}

impl Marker {
    /// Parse a marker line, or `None` if the line is not one.
    pub fn parse(line: &str) -> Option<Self> {
        let caps = marker_regex().captures(line)?;
        let kind = caps[1].to_lowercase();
        let title = match caps.get(2) {
            Some(explicit) if explicit.as_str().is_empty() => None,
            Some(explicit) => Some(explicit.as_str().to_string()),
            None => Some(default_title(&kind)),
        };
        Some(Self { kind, title })
    }

    /// CSS class for this kind.
    pub fn css_class(&self) -> String {
        format!("adm-{}", self.kind)
    }
}

/// `warning` → `Warning`.
fn default_title(kind: &str) -> String {
    let mut chars = kind.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Expand every admonition in `source`, leaving code untouched.
pub fn expand(source: &str) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut fence: Option<Fence> = None;
    let mut after_blank = true;
    let mut indented_code = false;
    let mut in_list = false;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if let Some(open) = fence {
            if open.closes(line) {
                fence = None;
            }
            out.push(line.to_string());
            i += 1;
            continue;
        }

        if is_blank(line) {
            after_blank = true;
            out.push(line.to_string());
            i += 1;
            continue;
        }

        let indent = indent_width(line);
        if indent >= BODY_INDENT && !in_list && (indented_code || after_blank) {
            indented_code = true;
            after_blank = false;
            out.push(line.to_string());
            i += 1;
            continue;
        }

        if list_item_regex().is_match(line) {
            in_list = true;
        } else if indent == 0 && after_blank {
            in_list = false;
        }
        indented_code = false;
        after_blank = false;

        if let Some(open) = Fence::open(line) {
            fence = Some(open);
            out.push(line.to_string());
            i += 1;
            continue;
        }

        let Some(marker) = Marker::parse(line) else {
            out.push(line.to_string());
            i += 1;
            continue;
        };

        let body_indent = indent_width(line) + BODY_INDENT;
        let body_start = i + 1;
        let mut body_end = body_start;
        while body_end < lines.len()
            && (is_blank(lines[body_end]) || indent_width(lines[body_end]) >= body_indent)
        {
            body_end += 1;
        }
        // Trailing blank lines belong to the surrounding document
        while body_end > body_start && is_blank(lines[body_end - 1]) {
            body_end -= 1;
        }

        let body: Vec<&str> = lines[body_start..body_end]
            .iter()
            .map(|l| strip_indent(l, body_indent))
            .collect();
        let body = expand(&body.join("\n"));

        emit(&mut out, leading_whitespace(line), &marker, &body);
        after_blank = true;
        i = body_end;
    }

    let mut result = out.join("\n");
    if source.ends_with('\n') {
        result.push('\n');
    }
    result
}

fn emit(out: &mut Vec<String>, indent: &str, marker: &Marker, body: &str) {
    out.push(format!(
        "{indent}<div class=\"admonition {}\">",
        escape_html(&marker.css_class())
    ));
    if let Some(title) = &marker.title {
        out.push(format!(
            "{indent}<div class=\"adm-title\">{}</div>",
            escape_html(title)
        ));
    }
    out.push(format!("{indent}<div class=\"adm-body\">"));
    out.push(String::new());
    for line in body.lines() {
        if is_blank(line) {
            out.push(String::new());
        } else {
            out.push(format!("{indent}{line}"));
        }
    }
    out.push(String::new());
    out.push(format!("{indent}</div>"));
    out.push(format!("{indent}</div>"));
    out.push(String::new());
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_marker_with_title() {
        let marker = Marker::parse("!!! warning \"Careful\"").unwrap();
        assert_eq!(marker.kind, "warning");
        assert_eq!(marker.title.as_deref(), Some("Careful"));
        assert_eq!(marker.css_class(), "adm-warning");
    }

    #[test]
    fn test_parse_marker_default_title() {
        let marker = Marker::parse("!!! Note").unwrap();
        assert_eq!(marker.kind, "note");
        assert_eq!(marker.title.as_deref(), Some("Note"));
    }

    #[test]
    fn test_parse_marker_empty_title() {
        let marker = Marker::parse("!!! tip \"\"").unwrap();
        assert_eq!(marker.title, None);
    }

    #[test]
    fn test_parse_rejects_other_lines() {
        assert!(Marker::parse("!!!").is_none());
        assert!(Marker::parse("Wow!!! amazing").is_none());
        assert!(Marker::parse("!!! note \"unterminated").is_none());
    }

    #[test]
    fn test_expand_basic() {
        let out = expand("!!! warning \"Careful\"\n    body text\n");
        assert_eq!(
            out,
            "<div class=\"admonition adm-warning\">\n\
             <div class=\"adm-title\">Careful</div>\n\
             <div class=\"adm-body\">\n\
             \n\
             body text\n\
             \n\
             </div>\n\
             </div>\n\
             \n"
        );
    }

    #[test]
    fn test_body_stops_at_dedent() {
        let out = expand("!!! note\n    inside\n\n    still inside\n\noutside\n");
        let body_close = out.find("</div>\n</div>").unwrap();
        assert!(out[..body_close].contains("still inside"));
        assert!(out[body_close..].contains("outside"));
    }

    #[test]
    fn test_title_is_escaped() {
        let out = expand("!!! danger \"<b>&</b>\"\n    x\n");
        assert!(out.contains("<div class=\"adm-title\">&lt;b&gt;&amp;&lt;/b&gt;</div>"));
    }

    #[test]
    fn test_nested_admonitions() {
        let out = expand("!!! note\n    outer\n\n    !!! tip\n        inner\n");
        assert!(out.contains("adm-note"));
        assert!(out.contains("adm-tip"));
        assert!(out.find("adm-note").unwrap() < out.find("adm-tip").unwrap());
    }

    #[test]
    fn test_marker_inside_fence_is_ignored() {
        let source = "```\n!!! note\n    not an admonition\n```\n";
        assert_eq!(expand(source), source);
    }

    #[test]
    fn test_marker_inside_indented_code_is_ignored() {
        let source = "Example:\n\n    !!! note\n    text\n";
        assert_eq!(expand(source), source);

        let source = "    !!! tip\n        body\n";
        assert_eq!(expand(source), source);
    }

    #[test]
    fn test_indented_code_ends_at_dedent() {
        let out = expand("    code\n\n!!! note\n    body\n");
        assert!(out.starts_with("    code\n"));
        assert!(out.contains("adm-note"));
    }

    #[test]
    fn test_marker_in_list_item_is_expanded() {
        let out = expand("- item\n\n    !!! note\n        body\n");
        assert!(out.contains("    <div class=\"admonition adm-note\">"));
    }

    #[test]
    fn test_no_admonition_is_identity() {
        let source = "# Title\n\nparagraph\n";
        assert_eq!(expand(source), source);
    }
}
