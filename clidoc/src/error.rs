//! Error types for documentation generation and post-processing.

use std::path::PathBuf;

use serde::Serialize;

/// A fatal failure: aborts the pipeline and is surfaced to the caller.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DocsError {
    /// The output directory could not be created or is not a directory.
    #[error("invalid output directory {}: {reason}", path.display())]
    InvalidOutDir { path: PathBuf, reason: String },

    /// Writing a generated page failed.
    #[error("failed to generate {}: {source}", path.display())]
    Generate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An I/O error on a specific path.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Renaming a file failed.
    #[error("failed to rename {} to {}: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The root page was not found after the walk.
    #[error("root page not found: {}", path.display())]
    RootPageMissing { path: PathBuf },
}

/// The kind of per-file failure recorded in a report.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum FileErrorKind {
    /// Reading or rewriting the file failed.
    Io,
    /// The file content is not valid UTF-8.
    InvalidEncoding,
    /// A directory traversal error (permission denied, loop detected, etc.).
    Walk,
}

/// A reported-but-continues failure tied to one path.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct FileError {
    /// The path that failed.
    pub file: PathBuf,
    /// The kind of failure.
    pub kind: FileErrorKind,
    /// Human-readable description of the failure.
    pub message: String,
}

impl FileError {
    pub(crate) fn new(file: impl Into<PathBuf>, kind: FileErrorKind, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            kind,
            message: message.into(),
        }
    }

    /// Format the error for human-readable output.
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        format!("Error processing {}: {}", self.file.display(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_error() {
        let err = FileError::new("pages/cli/morty_fn.md", FileErrorKind::Io, "permission denied");
        let formatted = err.format_human_readable();
        assert!(formatted.contains("pages/cli/morty_fn.md"));
        assert!(formatted.contains("permission denied"));
    }

    #[test]
    fn test_rename_error_message_names_both_paths() {
        let err = DocsError::Rename {
            from: PathBuf::from("a_b.md"),
            to: PathBuf::from("a-b.md"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let msg = err.to_string();
        assert!(msg.contains("a_b.md"), "got: {msg}");
        assert!(msg.contains("a-b.md"), "got: {msg}");
    }

    #[test]
    fn test_file_error_kind_serializes_snake_case() {
        let json = serde_json::to_string(&FileErrorKind::InvalidEncoding).unwrap();
        assert_eq!(json, "\"invalid_encoding\"");
    }
}
