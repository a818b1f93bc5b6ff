//! mdforge
//!
//! Markdown to standalone HTML. The renderer turns Markdown into an HTML
//! fragment; the exporter wraps it in a page that draws Mermaid diagrams and
//! ECharts charts and typesets math with KaTeX once loaded in a browser.
//!
//! # Example
//! ```ignore
//! use mdforge::export::{generate_html_document, DocumentShell};
//! use mdforge::markdown::MarkdownRenderer;
//!
//! let renderer = MarkdownRenderer::default();
//! let page = generate_html_document(&renderer, "# Hello", &DocumentShell::default())?;
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod export;
pub mod files;
pub mod i18n;
pub mod markdown;
mod string_utils;

pub use app::{App, OpenedFile};
pub use error::{Error, Result};
