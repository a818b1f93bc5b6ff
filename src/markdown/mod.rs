//! Markdown rendering module
//!
//! Turns Markdown source into an HTML fragment using comrak, a CommonMark +
//! GFM compatible parser, plus a few source preprocessors for the syntax
//! comrak does not know about.
//!
//! # Features
//! - Tables, task lists, footnotes, autolinks
//! - Subscript, superscript and strikethrough
//! - Math spans passed through literally for KaTeX
//! - `!!!` admonition blocks
//! - Heading anchors with collision-free slugs
//! - Syntax highlighting for code blocks using syntect
//!
//! # Example
//! ```ignore
//! use crate::markdown::{MarkdownRenderer, RendererConfig};
//!
//! let renderer = MarkdownRenderer::new(RendererConfig::standard());
//! let html = renderer.render("# Hello\n\nThis is **bold** text.")?;
//! ```

mod admonition;
mod fence;
mod math;
mod renderer;
mod slug;
pub mod syntax;

pub use renderer::{Extension, ExtensionSet, MarkdownRenderer, RenderOptions, RendererConfig};
pub use slug::slugify;
