//! Defines the custom error type for the `core` module.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for the `core` module.
///
/// This enum encapsulates all possible errors that can occur during
/// core operations like path resolution, tree walks, file mutations and searches.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A client path resolved to a location outside the workspace root.
    #[error("Invalid path traversal attempt: {0}")]
    PathTraversal(String),

    /// The target of an operation does not exist (or is not a regular file).
    #[error("File not found: {0}")]
    NotFound(String),

    /// The target of a create operation already exists.
    #[error("File already exists: {0}")]
    Conflict(String),

    /// The file exists but its content is not valid UTF-8 text.
    #[error("File is not valid UTF-8 text: {0}")]
    NotText(String),

    /// Represents an I/O error, typically from file system operations.
    #[error("I/O error for path {1}: {0}")]
    Io(#[source] std::io::Error, PathBuf),

    /// Represents an error during the parsing or building of a glob pattern.
    #[error("Invalid glob pattern: {0}")]
    GlobPattern(#[from] globset::Error),

    /// A search pattern that is not a valid regular expression.
    #[error("Invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The external version-control tool failed; carries its diagnostic output.
    #[error("Commit failed: {0}")]
    Commit(String),

    /// Represents an error that occurred when a Tokio task was joined.
    /// This is often due to a task panicking or being cancelled.
    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl CoreError {
    /// Shorthand for wrapping an `io::Error` together with the path it concerns.
    pub fn io(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        CoreError::Io(err, path.into())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::PathTraversal("../etc/passwd".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid path traversal attempt: ../etc/passwd"
        );

        let err = CoreError::Conflict("notes.txt".to_string());
        assert_eq!(err.to_string(), "File already exists: notes.txt");
    }

    #[test]
    fn test_error_from_conversions() {
        let regex_err = regex::Regex::new("(unclosed").unwrap_err();
        let err: CoreError = regex_err.into();
        assert!(matches!(err, CoreError::Pattern(_)));

        let glob_err = globset::Glob::new("[unclosed").unwrap_err();
        let err: CoreError = glob_err.into();
        assert!(matches!(err, CoreError::GlobPattern(_)));

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = CoreError::io(io_err, "a/b.txt");
        assert!(err.to_string().contains("a/b.txt"));
    }
}
