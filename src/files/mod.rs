//! File operations module for mdforge
//!
//! Reading and writing documents, file name normalization, and the file
//! dialogs used to choose where documents come from and go to.

pub mod dialogs;

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};

/// Extension enforced when saving Markdown.
pub const MARKDOWN_EXTENSION: &str = "md";

/// Extension enforced when exporting HTML.
pub const HTML_EXTENSION: &str = "html";

/// Append `.ext` unless the file name already ends with it (any case).
///
/// `notes` → `notes.md`, `notes.MD` stays, `notes.txt` → `notes.txt.md`.
pub fn ensure_extension(path: &Path, ext: &str) -> PathBuf {
    let suffix = format!(".{}", ext.to_lowercase());
    let has_suffix = path
        .file_name()
        .map(|name| name.to_string_lossy().to_lowercase().ends_with(&suffix))
        .unwrap_or(false);

    if has_suffix {
        path.to_path_buf()
    } else {
        let mut with_ext = path.as_os_str().to_os_string();
        with_ext.push(&suffix);
        PathBuf::from(with_ext)
    }
}

/// Read a whole text file.
pub fn read_text(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!("Read {} bytes from {}", content.len(), path.display());
    Ok(content)
}

/// Write a whole text file, replacing any previous content.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_extension_appends() {
        assert_eq!(
            ensure_extension(Path::new("/tmp/notes"), "md"),
            PathBuf::from("/tmp/notes.md")
        );
        assert_eq!(
            ensure_extension(Path::new("notes.txt"), "md"),
            PathBuf::from("notes.txt.md")
        );
    }

    #[test]
    fn test_ensure_extension_is_case_insensitive() {
        assert_eq!(
            ensure_extension(Path::new("Report.HTML"), "html"),
            PathBuf::from("Report.HTML")
        );
        assert_eq!(
            ensure_extension(Path::new("readme.Md"), "md"),
            PathBuf::from("readme.Md")
        );
    }

    #[test]
    fn test_ensure_extension_needs_dot() {
        assert_eq!(
            ensure_extension(Path::new("nohtml"), "html"),
            PathBuf::from("nohtml.html")
        );
    }

    #[test]
    fn test_read_write_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.md");

        write_text(&path, "# Title\n").unwrap();
        assert_eq!(read_text(&path).unwrap(), "# Title\n");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_text(&dir.path().join("missing.md")).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
