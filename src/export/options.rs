//! Export preferences
//!
//! Stored in the user settings and used as the defaults for every export.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::html::DocumentShell;
use crate::files::HTML_EXTENSION;
use crate::i18n::Language;

/// Output kinds. Only standalone HTML pages exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    HtmlFile,
}

impl ExportFormat {
    /// Extension enforced on the output path.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::HtmlFile => HTML_EXTENSION,
        }
    }

    /// Name proposed by the save dialog.
    pub fn default_file_name(self) -> &'static str {
        match self {
            ExportFormat::HtmlFile => "export.html",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Page title; `None` uses the language's default title
    pub title: Option<String>,
    /// Page language; `None` follows the interface language
    pub language: Option<Language>,
    pub open_after_export: bool,
    /// Where the export dialog starts next time
    pub last_export_directory: Option<PathBuf>,
}

impl ExportOptions {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// The page shell these options describe. A blank title counts as unset.
    pub fn shell(&self, interface_language: Language) -> DocumentShell {
        let shell = DocumentShell::for_language(self.language.unwrap_or(interface_language));
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => shell.with_title(title),
            _ => shell,
        }
    }
}
