//! Error types for input parsing operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading the links input file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input file could not be read (missing, unreadable, not UTF-8).
    #[error("failed to read links file '{path}': {source}\n  Suggestion: {suggestion}")]
    Io {
        /// The input file path
        path: PathBuf,
        /// The underlying IO error
        #[source]
        source: std::io::Error,
        /// How to fix the issue
        suggestion: &'static str,
    },
}

impl ParseError {
    /// Creates an `Io` error with a suggestion matching the failure kind.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let suggestion = match source.kind() {
            std::io::ErrorKind::NotFound => "Check the input file path and try again",
            std::io::ErrorKind::InvalidData => "Save the links file as UTF-8 text",
            std::io::ErrorKind::PermissionDenied => "Check the file permissions",
            _ => "Check that the input file is a readable text file",
        };
        Self::Io {
            path: path.into(),
            source,
            suggestion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_not_found_message() {
        let err = ParseError::io(
            "links.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        let msg = err.to_string();
        assert!(msg.contains("links.txt"), "should contain path");
        assert!(msg.contains("input file path"), "should have suggestion");
    }

    #[test]
    fn test_parse_error_invalid_data_suggests_utf8() {
        let err = ParseError::io(
            "links.txt",
            std::io::Error::new(std::io::ErrorKind::InvalidData, "stream did not contain valid UTF-8"),
        );
        assert!(err.to_string().contains("UTF-8"));
    }
}
