//! Code block highlighting
//!
//! Integrates syntect for fenced code blocks in the HTML output. Colors are
//! written as inline `style` attributes so the exported document needs no
//! extra stylesheet.
//!
//! Diagram languages (`mermaid`, `echarts`) are never highlighted: their text
//! must reach the page unchanged so the browser-side libraries can read it.
//!
//! # Example
//! ```ignore
//! use crate::markdown::syntax::SyntaxHighlighter;
//!
//! let highlighter = SyntaxHighlighter::new("InspiredGitHub");
//! let html = highlighter.highlight_html("fn main() {}", "rust");
//! ```

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::{self, Write};

use comrak::adapters::SyntaxHighlighterAdapter;
use log::{debug, warn};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::string_utils::{escape_html, escape_text};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Theme used for exported documents (light, matches the page style)
pub const DEFAULT_THEME: &str = "InspiredGitHub";

/// Fallback theme if the requested theme is not bundled
pub const FALLBACK_THEME: &str = "base16-ocean.light";

// ─────────────────────────────────────────────────────────────────────────────
// Syntax Highlighter
// ─────────────────────────────────────────────────────────────────────────────

/// Syntax highlighter holding the loaded syntect definitions and one theme.
///
/// Loading the syntax set is relatively expensive, so a renderer builds one
/// highlighter and shares it. Highlighting itself keeps its state on the
/// stack, which makes the highlighter safe to use from several threads.
pub struct SyntaxHighlighter {
    /// Loaded syntax definitions
    syntax_set: SyntaxSet,
    /// Theme used for every code block
    theme: Theme,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new(DEFAULT_THEME)
    }
}

impl SyntaxHighlighter {
    /// Load the bundled syntaxes and pick `theme_name`.
    pub fn new(theme_name: &str) -> Self {
        debug!("Loading syntect syntax and theme sets");
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let mut theme_set = ThemeSet::load_defaults();

        let theme = match theme_set.themes.remove(theme_name) {
            Some(theme) => theme,
            None => {
                warn!(
                    "Highlight theme '{}' not found, using '{}'",
                    theme_name, FALLBACK_THEME
                );
                theme_set.themes.remove(FALLBACK_THEME).unwrap_or_default()
            }
        };

        debug!("Loaded {} syntaxes", syntax_set.syntaxes().len());
        Self { syntax_set, theme }
    }

    /// Get a reference to the syntax set.
    pub fn syntax_set(&self) -> &SyntaxSet {
        &self.syntax_set
    }

    /// Highlight `code` as HTML spans with inline colors.
    ///
    /// Returns `None` when the language is not recognized or syntect fails,
    /// in which case the caller emits escaped plain text.
    pub fn highlight_html(&self, code: &str, language: &str) -> Option<String> {
        let syntax = self.find_syntax_for_language(language)?;
        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let mut html = String::with_capacity(code.len() * 4);

        for line in LinesWithEndings::from(code) {
            let ranges = match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => ranges,
                Err(e) => {
                    warn!("Failed to highlight {} code: {}", language, e);
                    return None;
                }
            };
            match styled_line_to_highlighted_html(&ranges, IncludeBackground::No) {
                Ok(line_html) => html.push_str(&line_html),
                Err(e) => {
                    warn!("Failed to write highlighted {} code: {}", language, e);
                    return None;
                }
            }
        }

        Some(html)
    }

    /// Find syntax definition for a language identifier.
    ///
    /// Tries multiple strategies:
    /// 1. By extension, after mapping common aliases (e.g. "rust" -> "rs")
    /// 2. By name (e.g. "Rust")
    /// 3. By name, case-insensitively
    pub fn find_syntax_for_language(&self, language: &str) -> Option<&SyntaxReference> {
        if language.is_empty() {
            return None;
        }

        let lang_lower = language.to_lowercase();

        let extension = match lang_lower.as_str() {
            "rust" | "rs" => "rs",
            "python" | "py" => "py",
            "javascript" | "js" => "js",
            "typescript" | "ts" => "ts",
            "tsx" => "tsx",
            "jsx" => "jsx",
            "c" => "c",
            "cpp" | "c++" | "cxx" => "cpp",
            "csharp" | "c#" | "cs" => "cs",
            "java" => "java",
            "go" | "golang" => "go",
            "ruby" | "rb" => "rb",
            "php" => "php",
            "scala" => "scala",
            "html" | "htm" => "html",
            "css" => "css",
            "json" => "json",
            "yaml" | "yml" => "yaml",
            "xml" => "xml",
            "markdown" | "md" => "md",
            "sql" => "sql",
            "shell" | "sh" | "bash" | "zsh" => "sh",
            "makefile" | "make" => "Makefile",
            "lua" => "lua",
            "perl" | "pl" => "pl",
            "r" => "r",
            "haskell" | "hs" => "hs",
            "erlang" | "erl" => "erl",
            "clojure" | "clj" => "clj",
            "diff" | "patch" => "diff",
            other => other,
        };

        if let Some(syntax) = self.syntax_set.find_syntax_by_extension(extension) {
            return Some(syntax);
        }

        if let Some(syntax) = self.syntax_set.find_syntax_by_name(language) {
            return Some(syntax);
        }

        self.syntax_set
            .syntaxes()
            .iter()
            .find(|syntax| syntax.name.to_lowercase() == lang_lower)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// comrak Adapter
// ─────────────────────────────────────────────────────────────────────────────

/// Code block writer plugged into comrak's HTML formatter.
///
/// Highlights recognized languages, passes diagram languages through as
/// escaped text and writes the `<pre>`/`<code>` tags with their attributes in
/// a stable order.
pub struct CodeFenceHighlighter<'a> {
    highlighter: &'a SyntaxHighlighter,
    passthrough: &'a [String],
}

impl<'a> CodeFenceHighlighter<'a> {
    pub fn new(highlighter: &'a SyntaxHighlighter, passthrough: &'a [String]) -> Self {
        Self {
            highlighter,
            passthrough,
        }
    }

    /// Whether `language` must be left untouched for client-side rendering.
    pub fn is_passthrough(&self, language: &str) -> bool {
        self.passthrough
            .iter()
            .any(|p| p.eq_ignore_ascii_case(language))
    }
}

impl SyntaxHighlighterAdapter for CodeFenceHighlighter<'_> {
    fn write_highlighted(
        &self,
        output: &mut dyn Write,
        lang: Option<&str>,
        code: &str,
    ) -> fmt::Result {
        let highlighted = lang
            .filter(|l| !self.is_passthrough(l))
            .and_then(|l| self.highlighter.highlight_html(code, l));

        match highlighted {
            Some(html) => output.write_str(&html),
            None => output.write_str(&escape_text(code)),
        }
    }

    fn write_pre_tag<'s>(
        &self,
        output: &mut dyn Write,
        attributes: HashMap<&'static str, Cow<'s, str>>,
    ) -> fmt::Result {
        write_opening_tag(output, "pre", &attributes)
    }

    fn write_code_tag<'s>(
        &self,
        output: &mut dyn Write,
        attributes: HashMap<&'static str, Cow<'s, str>>,
    ) -> fmt::Result {
        write_opening_tag(output, "code", &attributes)
    }
}

/// Write `<tag a="…" b="…">` with attributes sorted by name.
fn write_opening_tag(
    output: &mut dyn Write,
    tag: &str,
    attributes: &HashMap<&'static str, Cow<'_, str>>,
) -> fmt::Result {
    let mut names: Vec<&&'static str> = attributes.keys().collect();
    names.sort();

    write!(output, "<{}", tag)?;
    for name in names {
        write!(output, " {}=\"{}\"", name, escape_html(&attributes[*name]))?;
    }
    output.write_str(">")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn passthrough() -> Vec<String> {
        vec!["mermaid".to_string(), "echarts".to_string()]
    }

    #[test]
    fn test_default_theme_loads() {
        let highlighter = SyntaxHighlighter::default();
        assert!(!highlighter.syntax_set().syntaxes().is_empty());
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let highlighter = SyntaxHighlighter::new("no-such-theme");
        assert!(highlighter.highlight_html("let x = 1;", "rust").is_some());
    }

    #[test]
    fn test_rust_gets_inline_styles() {
        let highlighter = SyntaxHighlighter::default();
        let html = highlighter
            .highlight_html("fn main() {\n    println!(\"Hello\");\n}\n", "rust")
            .unwrap();
        assert!(html.contains("<span style=\"color:"));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_highlighted_code_is_escaped() {
        let highlighter = SyntaxHighlighter::default();
        let html = highlighter.highlight_html("if a < b && c {}\n", "rust").unwrap();
        assert!(html.contains("&lt;"));
        assert!(html.contains("&amp;&amp;"));
        assert!(!html.contains(" < "));
    }

    #[test]
    fn test_unknown_language_is_not_highlighted() {
        let highlighter = SyntaxHighlighter::default();
        assert!(highlighter.highlight_html("text", "unknownlang123").is_none());
        assert!(highlighter.highlight_html("text", "").is_none());
    }

    #[test]
    fn test_fence_aliases_resolve() {
        let highlighter = SyntaxHighlighter::default();
        for (alias, name) in [("rs", "rust"), ("py", "python"), ("sh", "bash")] {
            let by_alias = highlighter.find_syntax_for_language(alias).map(|s| &s.name);
            let by_name = highlighter.find_syntax_for_language(name).map(|s| &s.name);
            assert!(by_alias.is_some(), "{alias} not resolved");
            assert_eq!(by_alias, by_name, "{alias} vs {name}");
        }
    }

    #[test]
    fn test_passthrough_is_case_insensitive() {
        let highlighter = SyntaxHighlighter::default();
        let languages = passthrough();
        let adapter = CodeFenceHighlighter::new(&highlighter, &languages);
        assert!(adapter.is_passthrough("mermaid"));
        assert!(adapter.is_passthrough("ECharts"));
        assert!(!adapter.is_passthrough("rust"));
    }

    #[test]
    fn test_adapter_leaves_diagrams_unhighlighted() {
        let highlighter = SyntaxHighlighter::default();
        let languages = passthrough();
        let adapter = CodeFenceHighlighter::new(&highlighter, &languages);

        let mut out = String::new();
        adapter
            .write_highlighted(&mut out, Some("mermaid"), "graph TD\n  A-->B\n")
            .unwrap();
        assert_eq!(out, "graph TD\n  A--&gt;B\n");
    }

    #[test]
    fn test_adapter_plain_without_language() {
        let highlighter = SyntaxHighlighter::default();
        let languages = passthrough();
        let adapter = CodeFenceHighlighter::new(&highlighter, &languages);

        let mut out = String::new();
        adapter.write_highlighted(&mut out, None, "<x>\n").unwrap();
        assert_eq!(out, "&lt;x&gt;\n");
    }

    #[test]
    fn test_opening_tag_attributes_sorted() {
        let mut attributes = HashMap::new();
        attributes.insert("data-x", Cow::Borrowed("1\"2"));
        attributes.insert("class", Cow::Borrowed("language-rust"));

        let mut out = String::new();
        write_opening_tag(&mut out, "code", &attributes).unwrap();
        assert_eq!(
            out,
            "<code class=\"language-rust\" data-x=\"1&quot;2\">"
        );
    }
}
