//! Reading and writing `config.json`
//!
//! Settings live in the platform config directory:
//!
//! - **Windows**: `%APPDATA%\mdforge\config.json`
//! - **macOS**: `~/Library/Application Support/mdforge/config.json`
//! - **Linux**: `~/.config/mdforge/config.json`
//!
//! A missing or empty file means defaults. Writes go to a sibling temp file
//! that is then renamed over the real one, so a crash never leaves half a
//! file behind.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};

const APP_NAME: &str = "mdforge";
const CONFIG_FILE_NAME: &str = "config.json";
const PENDING_FILE_NAME: &str = "config.json.tmp";

pub fn get_config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or(Error::ConfigDirNotFound)?;
    Ok(base.join(APP_NAME))
}

pub fn get_config_file_path() -> Result<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

// ─────────────────────────────────────────────────────────────────────────────
// Loading
// ─────────────────────────────────────────────────────────────────────────────

/// Settings from the default location. Never fails: problems are logged and
/// defaults are used instead.
pub fn load_config() -> Settings {
    get_config_file_path()
        .and_then(|path| load_config_from(&path))
        .unwrap_or_warn_default(Settings::default(), "Settings unavailable")
}

/// Settings from `path`, sanitized. A missing or blank file yields defaults.
pub fn load_config_from(path: &Path) -> Result<Settings> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No settings at {}, using defaults", path.display());
            return Ok(Settings::default());
        }
        Err(source) => {
            return Err(Error::ConfigLoad {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if contents.trim().is_empty() {
        debug!("Settings file {} is blank", path.display());
        return Ok(Settings::default());
    }

    let settings =
        Settings::from_json_sanitized(&contents).map_err(|source| Error::ConfigParse {
            path: Some(path.to_path_buf()),
            source,
        })?;

    debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Saving
// ─────────────────────────────────────────────────────────────────────────────

/// Write `settings` to `path` as pretty JSON, creating the directory if needed.
pub fn save_config_to(settings: &Settings, path: &Path) -> Result<()> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .ok_or(Error::ConfigDirNotFound)?;

    let save_error = |source: std::io::Error| Error::ConfigSave {
        path: path.to_path_buf(),
        source,
    };

    fs::create_dir_all(dir).map_err(save_error)?;

    let json = serde_json::to_string_pretty(settings).map_err(|source| Error::ConfigParse {
        path: Some(path.to_path_buf()),
        source,
    })?;

    let pending = dir.join(PENDING_FILE_NAME);
    fs::write(&pending, json).map_err(save_error)?;
    fs::rename(&pending, path).map_err(save_error)?;

    info!("Saved settings to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use tempfile::TempDir;

    /// A config path inside a fresh temp dir; the directory itself does not
    /// exist yet.
    fn scratch() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(APP_NAME).join(CONFIG_FILE_NAME);
        (dir, path)
    }

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_default_location() {
        if let Ok(path) = get_config_file_path() {
            assert!(path.ends_with(Path::new("mdforge").join("config.json")));
        }
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let (_dir, path) = scratch();
        assert_eq!(load_config_from(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_blank_file_gives_defaults() {
        let (_dir, path) = scratch();
        write(&path, "  \n");
        assert_eq!(load_config_from(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_broken_json_is_parse_error() {
        let (_dir, path) = scratch();
        write(&path, "{ not json");

        match load_config_from(&path).unwrap_err() {
            Error::ConfigParse { path: Some(p), .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_loaded_values_are_sanitized() {
        let (_dir, path) = scratch();
        write(&path, r#"{"max_recent_files": 0, "something_else": 1}"#);

        let settings = load_config_from(&path).unwrap();
        assert_eq!(settings.max_recent_files, Settings::DEFAULT_RECENT_FILES);
    }

    #[test]
    fn test_save_then_load() {
        let (_dir, path) = scratch();
        let mut settings = Settings {
            language: Language::ZhCn,
            ..Settings::default()
        };
        settings.add_recent_file(Path::new("/docs/readme.md"));
        settings.export.open_after_export = true;

        save_config_to(&settings, &path).unwrap();

        assert_eq!(load_config_from(&path).unwrap(), settings);
        assert!(!path.with_file_name(PENDING_FILE_NAME).exists());
    }

    #[test]
    fn test_save_replaces_old_file() {
        let (_dir, path) = scratch();
        write(&path, r#"{"language": "en-US"}"#);

        let settings = Settings {
            language: Language::ZhCn,
            ..Settings::default()
        };
        save_config_to(&settings, &path).unwrap();

        assert!(fs::read_to_string(&path).unwrap().contains("\"zh-CN\""));
    }
}
