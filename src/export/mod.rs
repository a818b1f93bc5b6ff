//! Document Export Module
//!
//! Turns Markdown into a standalone HTML page.
//!
//! # Architecture
//!
//! - `options.rs` - Export configuration and options
//! - `html.rs` - Page shell, stylesheet and post-load script

pub mod html;
pub mod options;

pub use html::{assemble, assemble_with, export_to_html_file, generate_html_document, DocumentShell};
pub use options::{ExportFormat, ExportOptions};
