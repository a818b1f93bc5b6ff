//! File dialog abstraction
//!
//! `App` asks a [`FilePicker`] for paths instead of calling a dialog library
//! directly. The native implementation uses the rfd crate and is only built
//! with the `native-dialogs` feature; [`PresetPicker`] answers with a fixed
//! path and serves the command line and the tests.

use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::export::ExportFormat;
use crate::i18n::TextResources;

// ─────────────────────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────────────────────

/// One filter entry of a file dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    /// Label shown to the user, e.g. `Markdown Files (*.md)`
    pub display_name: String,
    /// Extensions without the dot; `*` matches everything
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn new(display_name: &str, extensions: &[&str]) -> Self {
        Self {
            display_name: display_name.to_string(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Everything a dialog needs to know to show itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogRequest {
    pub title: String,
    pub default_directory: Option<PathBuf>,
    pub default_file_name: Option<String>,
    pub filters: Vec<FileFilter>,
}

impl DialogRequest {
    /// Pick a Markdown file to open.
    pub fn open_markdown(texts: &TextResources, directory: Option<PathBuf>) -> Self {
        Self {
            title: texts.open_file_title.to_string(),
            default_directory: directory,
            default_file_name: None,
            filters: vec![
                FileFilter::new(texts.markdown_files_filter, &["md"]),
                FileFilter::new(texts.all_files_filter, &["*"]),
            ],
        }
    }

    /// Pick where to save a Markdown file.
    pub fn save_markdown(texts: &TextResources, directory: Option<PathBuf>) -> Self {
        Self {
            title: texts.save_file_title.to_string(),
            default_directory: directory,
            default_file_name: Some("untitled.md".to_string()),
            filters: vec![
                FileFilter::new(texts.markdown_files_filter, &["md"]),
                FileFilter::new(texts.all_files_filter, &["*"]),
            ],
        }
    }

    /// Pick where to write an HTML export.
    pub fn export_html(texts: &TextResources, directory: Option<PathBuf>) -> Self {
        let format = ExportFormat::HtmlFile;
        Self {
            title: texts.export_html_title.to_string(),
            default_directory: directory,
            default_file_name: Some(format.default_file_name().to_string()),
            filters: vec![
                FileFilter::new(texts.html_files_filter, &[format.extension()]),
                FileFilter::new(texts.all_files_filter, &["*"]),
            ],
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pickers
// ─────────────────────────────────────────────────────────────────────────────

/// Something that can ask the user for a path.
///
/// `Ok(None)` means the user cancelled; `Err` means the dialog itself failed.
pub trait FilePicker: Send + Sync {
    fn pick_open(&self, request: &DialogRequest) -> io::Result<Option<PathBuf>>;
    fn pick_save(&self, request: &DialogRequest) -> io::Result<Option<PathBuf>>;
}

/// Answers every dialog with the same path (or with a cancellation).
#[derive(Debug, Default)]
pub struct PresetPicker {
    path: Option<PathBuf>,
    requests: Mutex<Vec<DialogRequest>>,
}

impl PresetPicker {
    /// Always pick `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Behave like a dialog the user always dismisses.
    pub fn cancelled() -> Self {
        Self::default()
    }

    /// The requests received so far, oldest first.
    pub fn requests(&self) -> Vec<DialogRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn answer(&self, request: &DialogRequest) -> io::Result<Option<PathBuf>> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        Ok(self.path.clone())
    }
}

impl FilePicker for PresetPicker {
    fn pick_open(&self, request: &DialogRequest) -> io::Result<Option<PathBuf>> {
        self.answer(request)
    }

    fn pick_save(&self, request: &DialogRequest) -> io::Result<Option<PathBuf>> {
        self.answer(request)
    }
}

/// Native system dialogs.
#[cfg(feature = "native-dialogs")]
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeDialogs;

#[cfg(feature = "native-dialogs")]
impl NativeDialogs {
    fn dialog(request: &DialogRequest) -> rfd::FileDialog {
        let mut dialog = rfd::FileDialog::new().set_title(request.title.as_str());

        for filter in &request.filters {
            dialog = dialog.add_filter(filter.display_name.as_str(), filter.extensions.as_slice());
        }

        if let Some(dir) = &request.default_directory {
            dialog = dialog.set_directory(dir);
        }

        if let Some(name) = &request.default_file_name {
            dialog = dialog.set_file_name(name.as_str());
        }

        dialog
    }
}

#[cfg(feature = "native-dialogs")]
impl FilePicker for NativeDialogs {
    fn pick_open(&self, request: &DialogRequest) -> io::Result<Option<PathBuf>> {
        Ok(Self::dialog(request).pick_file())
    }

    fn pick_save(&self, request: &DialogRequest) -> io::Result<Option<PathBuf>> {
        Ok(Self::dialog(request).save_file())
    }
}
