//! Error types for StreamCopy
//!
//! Copy failures are reported as [`StreamCopyError::Io`] with the path that
//! failed. The parallel runner adds [`StreamCopyError::InterruptedWait`] for a
//! wait that ended before every task reported back.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for StreamCopy operations
#[derive(Error, Debug)]
pub enum StreamCopyError {
    /// I/O error while opening, reading or writing a file
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// Path of the file that failed
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// Waiting for pool results stopped before every task reported
    #[error("Wait interrupted after {received} of {expected} task results")]
    InterruptedWait {
        /// Outcomes received before the interruption
        received: usize,
        /// Outcomes that were expected
        expected: usize,
    },

    /// Thread pool error
    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Report rendering error
    #[error("Report error: {0}")]
    Report(String),
}

impl StreamCopyError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Check if this error is a missing file
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Result type alias for StreamCopy operations
pub type Result<T> = std::result::Result<T, StreamCopyError>;

impl From<serde_json::Error> for StreamCopyError {
    fn from(err: serde_json::Error) -> Self {
        StreamCopyError::Report(err.to_string())
    }
}

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| StreamCopyError::io(path, e))
    }
}
