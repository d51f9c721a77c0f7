//! Typed error handling for modsweep.
//!
//! Fatal errors (missing directory, unresolvable entry) abort a run before any
//! analysis. Per-file errors (unreadable metadata, failed deletion) are
//! recoverable: callers log or count them and keep going.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for modsweep operations.
#[derive(Error, Debug)]
pub enum SweepError {
    /// I/O error when reading/writing files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The scan root does not exist or is not a directory
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// No entry module matched the given hint
    #[error("Entry module '{hint}' not found in {dir}")]
    EntryNotFound { hint: String, dir: PathBuf },

    /// A file could not be read as a binary module
    #[error("Unreadable module {path}: {message}")]
    Metadata { path: PathBuf, message: String },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// A file was refused or failed to delete
    #[error("Cannot delete {path}: {message}")]
    Cleanup { path: PathBuf, message: String },

    /// Prompt or terminal interaction failed
    #[error("Interaction error: {message}")]
    Interaction { message: String },
}

impl SweepError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a metadata read error.
    pub fn metadata(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Metadata {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a cleanup error.
    pub fn cleanup(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Cleanup {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn interaction(message: impl Into<String>) -> Self {
        Self::Interaction {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error (the batch can continue).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Metadata { .. } | Self::Cleanup { .. } | Self::Config { .. }
        )
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::DirectoryNotFound { path } => Some(path),
            Self::EntryNotFound { dir, .. } => Some(dir),
            Self::Metadata { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            Self::Cleanup { path, .. } => Some(path),
            Self::Interaction { .. } => None,
        }
    }
}

/// Convenience type alias for modsweep results.
pub type SweepResult<T> = Result<T, SweepError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> SweepResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> SweepResult<T> {
        self.map_err(|e| SweepError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error() {
        let err = SweepError::io(
            PathBuf::from("/publish/App.exe"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        assert!(matches!(err, SweepError::Io { .. }));
        assert_eq!(err.path(), Some(&PathBuf::from("/publish/App.exe")));
        assert!(err.to_string().contains("/publish/App.exe"));
    }

    #[test]
    fn test_entry_not_found_message() {
        let err = SweepError::EntryNotFound {
            hint: "App".into(),
            dir: PathBuf::from("/publish"),
        };
        assert_eq!(err.to_string(), "Entry module 'App' not found in /publish");
    }

    #[test]
    fn test_is_recoverable() {
        assert!(SweepError::metadata("/a.dll", "not a PE file").is_recoverable());
        assert!(SweepError::cleanup("/a.dll", "read-only").is_recoverable());
        assert!(!SweepError::DirectoryNotFound { path: "/missing".into() }.is_recoverable());
        assert!(!SweepError::interaction("no tty").is_recoverable());
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let swept = result.with_path("/missing/file.dll");
        assert!(matches!(swept, Err(SweepError::Io { .. })));
    }
}
