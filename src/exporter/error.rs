//! Error types for export operations.
//!
//! [`Error`] is the low-level error carried by every exporter component.
//! Stage-level classification (tool acquisition vs. export vs. publish)
//! happens one layer up in [`crate::error::StepError`].

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for exporter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while acquiring bundletool or exporting a bundle.
#[derive(Error, Debug)]
pub enum Error {
    /// Free-form failure, usually produced by [`bail!`](crate::bail)
    #[error("{0}")]
    GenericError(String),

    /// Raw IO error without path context
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Filesystem operation failed on a known path
    #[error("{context} ({}): {source}", .path.display())]
    Fs {
        /// What was being attempted
        context: String,
        /// Path the operation targeted
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// HTTP transport or status error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed JSON from a release listing
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// APK set archive could not be read
    #[error("APK set archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Location string was not a valid URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// External tool exited unsuccessfully
    #[error("{tool} failed with exit code {code:?}: {stderr}")]
    ToolFailed {
        /// Tool name
        tool: String,
        /// Exit code, `None` when killed by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// The APK set carried no universal variant
    #[error("APK set {} does not contain a universal APK", .0.display())]
    MissingUniversalApk(PathBuf),
}

/// Attaches path context to filesystem results.
pub trait ErrorExt<T> {
    /// Wraps an IO error with a description of the operation and its path.
    fn fs_context(self, context: &str, path: &Path) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &str, path: &Path) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context: context.to_string(),
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Attaches a message to results and options.
pub trait Context<T> {
    /// Converts the failure into a [`Error::GenericError`] prefixed by `msg`.
    fn context(self, msg: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> Context<T> for std::result::Result<T, E> {
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{msg}: {e}")))
    }
}

impl<T> Context<T> for Option<T> {
    fn context(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(msg.to_string()))
    }
}

/// Returns early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::exporter::Error::GenericError(format!($($arg)*)))
    };
}
