//! Error types for reconciliation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a reconciliation pass over the output root.
///
/// Per-playlist problems are logged and skipped instead.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The output root or metadata directory is not accessible.
    #[error("cannot access '{path}': {source}\n  Suggestion: Check that the output directory exists and is writable")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReconcileError {
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
