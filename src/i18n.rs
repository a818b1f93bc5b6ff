//! Localized user-facing texts
//!
//! Dialog titles, dialog filter labels, the "nothing selected" messages and
//! the `lang`/`<title>` of exported documents, for each supported language.
//!
//! # Example
//! ```ignore
//! use crate::i18n::Language;
//!
//! let texts = Language::from_code("zh-CN").texts();
//! assert_eq!(texts.html_lang, "zh-CN");
//! ```

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Language
// ─────────────────────────────────────────────────────────────────────────────

/// Supported interface languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    /// English (United States)
    #[default]
    #[serde(rename = "en-US", alias = "en")]
    EnUs,
    /// Simplified Chinese
    #[serde(rename = "zh-CN", alias = "zh")]
    ZhCn,
}

impl Language {
    /// BCP 47 code of this language.
    pub fn code(&self) -> &'static str {
        match self {
            Language::EnUs => "en-US",
            Language::ZhCn => "zh-CN",
        }
    }

    /// Name of the language, written in that language.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::EnUs => "English",
            Language::ZhCn => "简体中文",
        }
    }

    /// Parse a language code. Every Chinese locale (`zh`, `zh-TW`,
    /// `zh_Hant`, ...) maps to simplified Chinese; anything else is English.
    pub fn from_code(code: &str) -> Self {
        if code.trim().to_ascii_lowercase().starts_with("zh") {
            Language::ZhCn
        } else {
            Language::EnUs
        }
    }

    /// The text table for this language.
    pub fn texts(&self) -> &'static TextResources {
        match self {
            Language::EnUs => &EN_US,
            Language::ZhCn => &ZH_CN,
        }
    }

    /// Get all supported languages.
    pub fn all() -> &'static [Language] {
        &[Language::EnUs, Language::ZhCn]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text Tables
// ─────────────────────────────────────────────────────────────────────────────

/// Every localized string the application shows or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextResources {
    pub open_file_title: &'static str,
    pub no_file_selected: &'static str,
    pub save_file_title: &'static str,
    pub no_save_path: &'static str,
    pub export_html_title: &'static str,
    pub markdown_files_filter: &'static str,
    pub html_files_filter: &'static str,
    pub all_files_filter: &'static str,
    /// `lang` attribute of exported documents
    pub html_lang: &'static str,
    /// `<title>` of exported documents
    pub html_title: &'static str,
}

static EN_US: TextResources = TextResources {
    open_file_title: "Open Markdown File",
    no_file_selected: "No file selected",
    save_file_title: "Save Markdown File",
    no_save_path: "No save location selected",
    export_html_title: "Export to HTML",
    markdown_files_filter: "Markdown Files (*.md)",
    html_files_filter: "HTML Files (*.html)",
    all_files_filter: "All Files (*.*)",
    html_lang: "en",
    html_title: "Markdown Export",
};

static ZH_CN: TextResources = TextResources {
    open_file_title: "打开Markdown文件",
    no_file_selected: "未选择文件",
    save_file_title: "保存Markdown文件",
    no_save_path: "未选择保存位置",
    export_html_title: "导出为HTML",
    markdown_files_filter: "Markdown Files (*.md)",
    html_files_filter: "HTML Files (*.html)",
    all_files_filter: "All Files (*.*)",
    html_lang: "zh-CN",
    html_title: "Markdown 导出",
};

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
