//! Per-playlist JSON document merged from downloader sidecar files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors produced while loading or saving a playlist document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document could not be read or written.
    #[error("IO error on playlist document {path}: {source}")]
    Io {
        /// Document path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not a JSON object matching the expected schema.
    #[error(
        "invalid playlist document {path}: {source}\n  Suggestion: Delete the file and re-run the download to regenerate it"
    )]
    Invalid {
        /// Document path.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Playlist-level metadata plus the folded per-track sidecar documents.
///
/// Only the fields the reconciler reads are typed; every other upstream
/// field is preserved verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaylistDocument {
    /// Number of entries the downloader reported for the playlist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_count: Option<usize>,
    /// Canonical playlist URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webpage_url: Option<String>,
    /// Raw per-track sidecar documents.
    #[serde(default)]
    pub songs: Vec<Value>,
    /// Remaining upstream fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlaylistDocument {
    /// Loads and validates a document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Io`] when the file cannot be read and
    /// [`DocumentError::Invalid`] when it does not match the schema.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let raw = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| DocumentError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes the document as pretty-printed UTF-8 JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] on serialization or IO failure.
    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| DocumentError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
