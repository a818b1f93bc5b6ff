//! User settings for mdforge
//!
//! Everything the application remembers between runs. All fields have
//! defaults through `Default` and `#[serde(default)]`, so older or partial
//! config files still load.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::export::ExportOptions;
use crate::i18n::Language;

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Persisted user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Interface language (dialog titles, messages, exported page shell)
    pub language: Language,

    /// Directory the last dialog ended up in
    pub last_directory: Option<PathBuf>,

    /// Recently opened or saved files, most recent first
    pub recent_files: Vec<PathBuf>,

    /// How many recent files to remember
    pub max_recent_files: usize,

    /// Defaults for new exports
    pub export: ExportOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            last_directory: None,
            recent_files: Vec::new(),
            max_recent_files: Self::DEFAULT_RECENT_FILES,
            export: ExportOptions::default(),
        }
    }
}

impl Settings {
    /// Default number of recent files
    pub const DEFAULT_RECENT_FILES: usize = 10;
    /// Upper bound for `max_recent_files`
    pub const MAX_RECENT_FILES: usize = 100;

    /// Fix up values that are out of range or inconsistent.
    pub fn sanitize(&mut self) {
        // Ensure max_recent_files is reasonable
        if self.max_recent_files == 0 {
            self.max_recent_files = Self::DEFAULT_RECENT_FILES;
        } else if self.max_recent_files > Self::MAX_RECENT_FILES {
            self.max_recent_files = Self::MAX_RECENT_FILES;
        }

        // Drop empty and duplicate entries, then trim to max
        let mut seen = Vec::with_capacity(self.recent_files.len());
        self.recent_files.retain(|path| {
            if path.as_os_str().is_empty() || seen.contains(path) {
                false
            } else {
                seen.push(path.clone());
                true
            }
        });
        self.recent_files.truncate(self.max_recent_files);

        if self
            .last_directory
            .as_ref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            self.last_directory = None;
        }

        if self
            .export
            .title
            .as_ref()
            .is_some_and(|title| title.trim().is_empty())
        {
            self.export.title = None;
        }
    }

    /// Parse settings from JSON and sanitize them.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Remember `path` as the most recent file and its directory as the last
    /// directory.
    pub fn add_recent_file(&mut self, path: &Path) {
        self.recent_files.retain(|p| p != path);
        self.recent_files.insert(0, path.to_path_buf());
        self.recent_files.truncate(self.max_recent_files);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.last_directory = Some(parent.to_path_buf());
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
