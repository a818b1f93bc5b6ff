//! Error type for mdforge
//!
//! Everything fallible in the crate returns [`Result`]. A cancelled file
//! dialog is reported as [`Error::NoSelection`] so callers can tell "the user
//! changed their mind" apart from real failures.

use log::warn;
use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    // ── Rendering ───────────────────────────────────────────────────────────
    /// Markdown could not be turned into HTML at all (bad UTF-8, formatter
    /// failure). Malformed Markdown syntax never ends up here.
    Render { message: String },

    // ── Documents ───────────────────────────────────────────────────────────
    /// I/O failure without a known path, e.g. from a dialog backend
    Io(io::Error),
    FileRead { path: PathBuf, source: io::Error },
    FileWrite { path: PathBuf, source: io::Error },
    /// Dialog dismissed; holds the localized message for the user
    NoSelection(String),

    // ── Settings ────────────────────────────────────────────────────────────
    ConfigLoad { path: PathBuf, source: io::Error },
    ConfigSave { path: PathBuf, source: io::Error },
    /// Settings JSON that does not match [`crate::config::Settings`]
    ConfigParse {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
    /// The platform has no config directory (no `HOME`, ...)
    ConfigDirNotFound,

    /// Anything else worth a message
    Application(String),
}

impl Error {
    pub fn render(message: impl Into<String>) -> Self {
        Error::Render {
            message: message.into(),
        }
    }

    /// `true` for a dismissed dialog.
    pub fn is_no_selection(&self) -> bool {
        matches!(self, Error::NoSelection(_))
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::ConfigParse { path: None, source }
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::render(format!("input is not UTF-8 ({})", err))
    }
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Error::render("writing HTML output failed")
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Render { message } => write!(f, "Cannot render Markdown: {}", message),
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::FileRead { path, source } => {
                write!(f, "Cannot read {}: {}", path.display(), source)
            }
            Error::FileWrite { path, source } => {
                write!(f, "Cannot write {}: {}", path.display(), source)
            }
            Error::NoSelection(message) | Error::Application(message) => f.write_str(message),
            Error::ConfigLoad { path, source } => {
                write!(f, "Cannot load settings from {}: {}", path.display(), source)
            }
            Error::ConfigSave { path, source } => {
                write!(f, "Cannot save settings to {}: {}", path.display(), source)
            }
            Error::ConfigParse {
                path: Some(path),
                source,
            } => write!(f, "Invalid settings in {}: {}", path.display(), source),
            Error::ConfigParse { path: None, source } => write!(f, "Invalid settings: {}", source),
            Error::ConfigDirNotFound => f.write_str("No configuration directory on this system"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(source)
            | Error::FileRead { source, .. }
            | Error::FileWrite { source, .. }
            | Error::ConfigLoad { source, .. }
            | Error::ConfigSave { source, .. } => Some(source),
            Error::ConfigParse { source, .. } => Some(source),
            Error::Render { .. }
            | Error::NoSelection(_)
            | Error::ConfigDirNotFound
            | Error::Application(_) => None,
        }
    }
}

/// Fall back to a default value instead of failing, leaving a warning in
/// the log.
pub trait ResultExt<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        self.unwrap_or_else(|err| {
            warn!("{}: {}; falling back to defaults", context, err);
            default
        })
    }
}
