//! Error types for Spotify metadata fetching.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching or persisting Spotify metadata.
///
/// None of these abort a run; the caller logs them and downloads without a name.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// `CLIENTID` / `CLIENTSECRET` are not configured.
    #[error(
        "Spotify credentials are not configured\n  Suggestion: Set CLIENTID and CLIENTSECRET in the environment or the .env file"
    )]
    MissingCredentials,

    /// The URL names a known entity kind but carries no entity id.
    #[error("no Spotify entity id in '{url}'")]
    InvalidUrl { url: String },

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never produced a response.
    #[error("request to {url} failed: {source}\n  Suggestion: Check your network connection")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status.
    #[error("Spotify API returned HTTP {status} for {url}: {reason}")]
    Http {
        url: String,
        status: u16,
        reason: String,
    },

    /// The response body was not the expected JSON.
    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },

    /// Track listing pagination did not terminate.
    #[error("track listing for {url} exceeded {pages} pages")]
    TooManyPages { url: String, pages: usize },

    /// The metadata document or cover image could not be written.
    #[error("failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MetadataError {
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn decode(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Maps an HTTP status to an error with a readable reason.
    #[must_use]
    pub fn http(url: impl Into<String>, status: u16) -> Self {
        let reason = match status {
            400 | 401 => "credentials were rejected".to_string(),
            404 => "entity not found (private or deleted?)".to_string(),
            429 => "rate limit exceeded, try again later".to_string(),
            s if s >= 500 => "Spotify API unavailable, try again later".to_string(),
            s => format!("HTTP {s}"),
        };
        Self::Http {
            url: url.into(),
            status,
            reason,
        }
    }
}
