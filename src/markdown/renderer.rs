//! Markdown to HTML fragment renderer
//!
//! One `MarkdownRenderer` is built from a [`RendererConfig`] and can then be
//! shared freely: `render` keeps all of its working state (arena, slug
//! registry, math table, output buffer) local to the call.
//!
//! The renderer passes raw HTML through unescaped. It is meant for the
//! author's own documents and is not safe for untrusted input.

use std::sync::Arc;

use comrak::options::Plugins;
use comrak::{format_html_with_plugins, parse_document, Arena, Options};
use log::debug;

use super::admonition;
use super::math::MathSpans;
use super::slug::HeadingAnchors;
use super::syntax::{CodeFenceHighlighter, SyntaxHighlighter, DEFAULT_THEME};
use crate::error::Result;

// ─────────────────────────────────────────────────────────────────────────────
// Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// A syntax extension on top of CommonMark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extension {
    /// Bare URLs become links
    Autolink,
    /// GitHub pipe tables
    Table,
    /// `- [ ]` / `- [x]` list items
    TaskList,
    /// `[^note]` references and definitions
    Footnote,
    /// TeX spans passed through for client-side rendering
    Math,
    /// `!!! kind "title"` callout blocks
    Admonition,
    /// Subscript, superscript and strikethrough
    Extras,
    /// Fenced code highlighting
    Highlighting,
}

impl Extension {
    /// Every extension, in registration order.
    pub const CANONICAL: [Extension; 8] = [
        Extension::Autolink,
        Extension::Table,
        Extension::TaskList,
        Extension::Footnote,
        Extension::Math,
        Extension::Admonition,
        Extension::Extras,
        Extension::Highlighting,
    ];

    /// Short lower-case name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Extension::Autolink => "autolink",
            Extension::Table => "table",
            Extension::TaskList => "tasklist",
            Extension::Footnote => "footnote",
            Extension::Math => "math",
            Extension::Admonition => "admonition",
            Extension::Extras => "extras",
            Extension::Highlighting => "highlighting",
        }
    }

    /// Switch on the comrak options this extension maps to.
    ///
    /// Math, admonitions and highlighting are not parser options; they are
    /// handled by the source preprocessors and the render plugins.
    fn configure(&self, options: &mut Options<'_>) {
        match self {
            Extension::Autolink => options.extension.autolink = true,
            Extension::Table => options.extension.table = true,
            Extension::TaskList => {
                options.extension.tasklist = true;
                options.render.tasklist_classes = true;
            }
            Extension::Footnote => options.extension.footnotes = true,
            Extension::Extras => {
                options.extension.subscript = true;
                options.extension.superscript = true;
                options.extension.strikethrough = true;
            }
            Extension::Math | Extension::Admonition | Extension::Highlighting => {}
        }
    }
}

/// The ordered set of extensions a renderer applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSet(Vec<Extension>);

impl Default for ExtensionSet {
    fn default() -> Self {
        Self::canonical()
    }
}

impl ExtensionSet {
    /// All extensions in canonical order.
    pub fn canonical() -> Self {
        Self(Extension::CANONICAL.to_vec())
    }

    pub fn contains(&self, extension: Extension) -> bool {
        self.0.contains(&extension)
    }

    pub fn iter(&self) -> impl Iterator<Item = Extension> + '_ {
        self.0.iter().copied()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Output switches for the HTML writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// `id` attributes on headings
    pub heading_anchors: bool,
    /// A single newline inside a paragraph becomes `<br />`
    pub hard_breaks: bool,
    /// Void elements are self-closed (comrak always does this)
    pub xhtml: bool,
    /// Raw HTML in the source is emitted unescaped
    pub raw_html: bool,
}

impl RenderOptions {
    pub const STANDARD: RenderOptions = RenderOptions {
        heading_anchors: true,
        hard_breaks: true,
        xhtml: true,
        raw_html: true,
    };
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Everything that determines how Markdown is turned into HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    extensions: ExtensionSet,
    options: RenderOptions,
    highlight_theme: String,
    passthrough_languages: Vec<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl RendererConfig {
    /// The export dialect: every extension, every render option, the
    /// `InspiredGitHub` theme, and `mermaid`/`echarts` left for the browser.
    pub fn standard() -> Self {
        Self {
            extensions: ExtensionSet::canonical(),
            options: RenderOptions::STANDARD,
            highlight_theme: DEFAULT_THEME.to_string(),
            passthrough_languages: vec!["mermaid".to_string(), "echarts".to_string()],
        }
    }

    pub fn extensions(&self) -> &ExtensionSet {
        &self.extensions
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    pub fn highlight_theme(&self) -> &str {
        &self.highlight_theme
    }

    /// Fence languages emitted verbatim for client-side rendering.
    pub fn passthrough_languages(&self) -> &[String] {
        &self.passthrough_languages
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Renderer
// ─────────────────────────────────────────────────────────────────────────────

/// Converts Markdown source into an HTML fragment.
pub struct MarkdownRenderer {
    config: RendererConfig,
    highlighter: Arc<SyntaxHighlighter>,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(RendererConfig::standard())
    }
}

impl MarkdownRenderer {
    /// Build a renderer. Loads the syntax definitions once.
    pub fn new(config: RendererConfig) -> Self {
        let highlighter = Arc::new(SyntaxHighlighter::new(config.highlight_theme()));
        Self {
            config,
            highlighter,
        }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Render raw bytes, which must be valid UTF-8.
    pub fn render_bytes(&self, source: &[u8]) -> Result<String> {
        let text = std::str::from_utf8(source)?;
        self.render(text)
    }

    /// Render Markdown to an HTML fragment.
    pub fn render(&self, source: &str) -> Result<String> {
        let mut options = self.base_options();
        let mut math = MathSpans::default();
        let mut prepared = source.to_string();

        for extension in self.config.extensions().iter() {
            match extension {
                Extension::Math => {
                    let (text, spans) = MathSpans::protect(&prepared);
                    prepared = text;
                    math = spans;
                }
                Extension::Admonition => prepared = admonition::expand(&prepared),
                other => other.configure(&mut options),
            }
        }

        let anchors = HeadingAnchors::new(&math);
        let fences =
            CodeFenceHighlighter::new(&self.highlighter, self.config.passthrough_languages());

        let mut plugins = Plugins::default();
        if self.config.options().heading_anchors {
            plugins.render.heading_adapter = Some(&anchors);
        }
        if self.config.extensions().contains(Extension::Highlighting) {
            plugins.render.codefence_syntax_highlighter = Some(&fences);
        }

        let arena = Arena::new();
        let root = parse_document(&arena, &prepared, &options);

        let mut html = String::with_capacity(prepared.len() * 2);
        format_html_with_plugins(root, &options, &mut html, &plugins)?;

        debug!(
            "Rendered {} bytes of Markdown into {} bytes of HTML ({} math spans)",
            source.len(),
            html.len(),
            math.len()
        );

        Ok(math.restore(&html))
    }

    fn base_options(&self) -> Options<'static> {
        let render = self.config.options();
        let mut options = Options::default();
        options.render.hardbreaks = render.hard_breaks;
        options.render.r#unsafe = render.raw_html;
        options
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
