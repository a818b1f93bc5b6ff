//! Main application module for mdforge
//!
//! `App` is the backend a front end talks to: open, save and export
//! documents, with file locations chosen through a [`FilePicker`]. It owns
//! the shared renderer and the user settings, and remembers recent files and
//! the last used directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{info, warn};
use serde::Serialize;

use crate::config::{save_config_to, Settings};
use crate::error::{Error, Result};
use crate::export::{export_to_html_file, DocumentShell};
use crate::files::dialogs::{DialogRequest, FilePicker};
use crate::files::{ensure_extension, read_text, write_text, MARKDOWN_EXTENSION};
use crate::i18n::{Language, TextResources};
use crate::markdown::{MarkdownRenderer, RendererConfig};

/// A document loaded through [`App::open_file`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenedFile {
    pub content: String,
    pub path: PathBuf,
}

/// The application backend.
pub struct App {
    renderer: MarkdownRenderer,
    picker: Arc<dyn FilePicker>,
    settings: Settings,
    /// Where settings are written after they change; `None` keeps them in memory
    config_path: Option<PathBuf>,
}

impl App {
    /// Create the backend with the standard renderer.
    pub fn new(settings: Settings, picker: Arc<dyn FilePicker>) -> Self {
        Self {
            renderer: MarkdownRenderer::new(RendererConfig::standard()),
            picker,
            settings,
            config_path: None,
        }
    }

    /// Persist settings to `path` whenever they change.
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Application version.
    pub fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    pub fn language(&self) -> Language {
        self.settings.language
    }

    /// Localized texts for the interface language.
    pub fn texts(&self) -> &'static TextResources {
        self.settings.language.texts()
    }

    /// Page shell used for exports.
    pub fn document_shell(&self) -> DocumentShell {
        self.settings.export.shell(self.settings.language)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Ask for a Markdown file and read it.
    pub fn open_file(&mut self) -> Result<OpenedFile> {
        let request = DialogRequest::open_markdown(self.texts(), self.dialog_directory());
        let path = self
            .picker
            .pick_open(&request)?
            .ok_or_else(|| Error::NoSelection(self.texts().no_file_selected.to_string()))?;

        let content = read_text(&path)?;
        info!("Opened {} ({} bytes)", path.display(), content.len());

        self.remember(&path);
        Ok(OpenedFile { content, path })
    }

    /// Write `content` to `path` as-is.
    pub fn save_file(&mut self, content: &str, path: &Path) -> Result<()> {
        write_text(path, content)?;
        info!("Saved {}", path.display());
        self.remember(path);
        Ok(())
    }

    /// Ask where to save, enforce the `.md` extension and write `content`.
    pub fn save_file_as(&mut self, content: &str) -> Result<PathBuf> {
        let request = DialogRequest::save_markdown(self.texts(), self.dialog_directory());
        let path = self.pick_save(&request, MARKDOWN_EXTENSION)?;

        self.save_file(content, &path)?;
        Ok(path)
    }

    /// Render `content` and write the HTML page to `path`.
    pub fn export_to_html(&self, content: &str, path: &Path) -> Result<()> {
        export_to_html_file(&self.renderer, content, path, &self.document_shell())
    }

    /// Ask where to export, enforce the `.html` extension and write the page.
    pub fn export_to_html_as(&mut self, content: &str) -> Result<PathBuf> {
        let shell = self.document_shell();
        self.export_to_html_as_with(content, &shell)
    }

    /// Like [`App::export_to_html_as`], with an explicit page shell that is
    /// not stored in the settings.
    pub fn export_to_html_as_with(
        &mut self,
        content: &str,
        shell: &DocumentShell,
    ) -> Result<PathBuf> {
        let directory = self
            .settings
            .export
            .last_export_directory
            .clone()
            .or_else(|| self.dialog_directory());
        let request = DialogRequest::export_html(self.texts(), directory);
        let path = self.pick_save(&request, self.settings.export.format.extension())?;

        export_to_html_file(&self.renderer, content, &path, shell)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.settings.export.last_export_directory = Some(parent.to_path_buf());
        }
        self.persist();
        Ok(path)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn pick_save(&self, request: &DialogRequest, extension: &str) -> Result<PathBuf> {
        let path = self
            .picker
            .pick_save(request)?
            .ok_or_else(|| Error::NoSelection(self.texts().no_save_path.to_string()))?;
        Ok(ensure_extension(&path, extension))
    }

    /// Last used directory, else the working directory.
    fn dialog_directory(&self) -> Option<PathBuf> {
        self.settings
            .last_directory
            .clone()
            .or_else(|| std::env::current_dir().ok())
    }

    fn remember(&mut self, path: &Path) {
        self.settings.add_recent_file(path);
        self.persist();
    }

    fn persist(&self) {
        if let Some(config_path) = &self.config_path {
            if let Err(e) = save_config_to(&self.settings, config_path) {
                warn!("Failed to save configuration: {}", e);
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from;
    use crate::files::dialogs::PresetPicker;
    use std::fs;
    use tempfile::TempDir;

    fn app_with(picker: Arc<PresetPicker>) -> App {
        App::new(Settings::default(), picker)
    }

    #[test]
    fn test_version() {
        assert_eq!(App::version(), "1.0.2");
    }

    #[test]
    fn test_open_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.md");
        fs::write(&path, "# Notes\n").unwrap();

        let mut app = app_with(Arc::new(PresetPicker::new(&path)));
        let opened = app.open_file().unwrap();

        assert_eq!(opened.content, "# Notes\n");
        assert_eq!(opened.path, path);
        assert_eq!(app.settings().recent_files, vec![path]);
        assert_eq!(app.settings().last_directory.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_open_cancelled_is_no_selection() {
        let mut app = app_with(Arc::new(PresetPicker::cancelled()));
        let err = app.open_file().unwrap_err();

        assert!(err.is_no_selection());
        assert_eq!(err.to_string(), "No file selected");
    }

    #[test]
    fn test_cancel_message_is_localized() {
        let settings = Settings {
            language: Language::ZhCn,
            ..Settings::default()
        };
        let mut app = App::new(settings, Arc::new(PresetPicker::cancelled()));

        let err = app.save_file_as("x").unwrap_err();
        assert_eq!(err.to_string(), "未选择保存位置");
    }

    #[test]
    fn test_open_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let picker = PresetPicker::new(dir.path().join("gone.md"));
        let mut app = app_with(Arc::new(picker));

        let err = app.open_file().unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }

    #[test]
    fn test_save_file_as_enforces_md() {
        let dir = TempDir::new().unwrap();
        let picker = Arc::new(PresetPicker::new(dir.path().join("draft")));
        let mut app = app_with(Arc::clone(&picker));

        let saved = app.save_file_as("hello").unwrap();
        assert_eq!(saved, dir.path().join("draft.md"));
        assert_eq!(fs::read_to_string(&saved).unwrap(), "hello");

        let requests = picker.requests();
        assert_eq!(requests[0].default_file_name.as_deref(), Some("untitled.md"));
    }

    #[test]
    fn test_save_file_as_keeps_uppercase_extension() {
        let dir = TempDir::new().unwrap();
        let picker = PresetPicker::new(dir.path().join("README.MD"));
        let mut app = app_with(Arc::new(picker));

        let saved = app.save_file_as("x").unwrap();
        assert_eq!(saved, dir.path().join("README.MD"));
    }

    #[test]
    fn test_export_to_html_as_enforces_html() {
        let dir = TempDir::new().unwrap();
        let picker = Arc::new(PresetPicker::new(dir.path().join("page.htm")));
        let mut app = app_with(Arc::clone(&picker));

        let exported = app.export_to_html_as("# Title\n").unwrap();
        assert_eq!(exported, dir.path().join("page.htm.html"));

        let html = fs::read_to_string(&exported).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1 id=\"title\">Title</h1>"));

        assert_eq!(
            picker.requests()[0].default_file_name.as_deref(),
            Some("export.html")
        );
        assert_eq!(
            app.settings().export.last_export_directory.as_deref(),
            Some(dir.path())
        );
    }

    #[test]
    fn test_export_uses_language_shell() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.html");
        let settings = Settings {
            language: Language::ZhCn,
            ..Settings::default()
        };
        let app = App::new(settings, Arc::new(PresetPicker::cancelled()));

        app.export_to_html("text", &path).unwrap();
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("<html lang=\"zh-CN\">"));
        assert!(html.contains("<title>Markdown 导出</title>"));
    }

    #[test]
    fn test_export_shell_override_is_not_stored() {
        let dir = TempDir::new().unwrap();
        let picker = PresetPicker::new(dir.path().join("custom"));
        let mut app = app_with(Arc::new(picker));
        let shell = DocumentShell::for_language(Language::ZhCn).with_title("Custom");

        let exported = app.export_to_html_as_with("x", &shell).unwrap();
        let html = fs::read_to_string(exported).unwrap();
        assert!(html.contains("<title>Custom</title>"));
        assert!(app.settings().export.title.is_none());
        assert!(app.settings().export.language.is_none());
    }

    #[test]
    fn test_dialog_starts_in_last_directory() {
        let picker = Arc::new(PresetPicker::cancelled());
        let settings = Settings {
            last_directory: Some(PathBuf::from("/projects/docs")),
            ..Settings::default()
        };
        let mut app = App::new(settings, Arc::clone(&picker) as Arc<dyn FilePicker>);

        let _ = app.open_file();
        assert_eq!(
            picker.requests()[0].default_directory,
            Some(PathBuf::from("/projects/docs"))
        );
    }

    #[test]
    fn test_settings_are_persisted() {
        let dir = TempDir::new().unwrap();
        let doc = dir.path().join("doc.md");
        let config = dir.path().join("config").join("config.json");

        let mut app =
            app_with(Arc::new(PresetPicker::cancelled())).with_config_path(config.clone());
        app.save_file("body", &doc).unwrap();

        let stored = load_config_from(&config).unwrap();
        assert_eq!(stored.recent_files, vec![doc]);
    }
}
