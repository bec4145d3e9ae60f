//! Run configuration: tool paths, per-phase timeouts, Spotify endpoints and credentials.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::parser::SourceKind;

/// Default `spotdl` timeout per link (1 hour).
pub const DEFAULT_SPOTIFY_TIMEOUT_SECS: u64 = 3600;
/// Default `scdl` timeout per link (1 hour).
pub const DEFAULT_SOUNDCLOUD_TIMEOUT_SECS: u64 = 3600;
/// Default `yt-dlp` timeout per link (2 hours).
pub const DEFAULT_YOUTUBE_TIMEOUT_SECS: u64 = 7200;
/// Upper bound accepted for any phase timeout (24 hours).
pub const MAX_TIMEOUT_SECS: u64 = 86_400;

pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/api/token";

/// Environment variable holding the Spotify client id.
pub const CLIENT_ID_VAR: &str = "CLIENTID";
/// Environment variable holding the Spotify client secret.
pub const CLIENT_SECRET_VAR: &str = "CLIENTSECRET";

/// Errors produced while validating a run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A phase timeout is outside the accepted range.
    #[error(
        "invalid {phase} timeout: {secs}s\n  Suggestion: Use a value between 1 and 86400 seconds"
    )]
    TimeoutOutOfRange {
        /// Phase the timeout belongs to
        phase: SourceKind,
        /// Rejected value
        secs: u64,
    },

    /// A downloader executable name is empty.
    #[error("empty executable name for the {phase} downloader\n  Suggestion: Pass a program name or path")]
    EmptyToolPath {
        /// Phase the executable belongs to
        phase: SourceKind,
    },

    /// A Spotify endpoint is not an absolute http(s) URL.
    #[error("invalid Spotify endpoint '{url}'\n  Suggestion: Use an absolute http(s) URL")]
    InvalidEndpoint {
        /// Rejected URL
        url: String,
    },
}

/// Spotify API client credentials.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Credentials {
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: Some(client_id.into()),
            client_secret: Some(client_secret.into()),
        }
    }

    /// Returns `(id, secret)` when both are present and non-empty.
    #[must_use]
    pub fn pair(&self) -> Option<(&str, &str)> {
        match (self.client_id.as_deref(), self.client_secret.as_deref()) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => Some((id, secret)),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.pair().is_some()
    }

    /// Loads credentials from a dotenv file, with process variables taking precedence.
    ///
    /// The process environment is never modified. A missing file falls back to
    /// the process environment; a malformed file is logged and ignored.
    #[must_use]
    pub fn load(env_file: &Path) -> Self {
        let file_vars = read_env_file(env_file);
        Self::from_sources(&file_vars, |key| std::env::var(key).ok())
    }

    fn from_sources(
        file_vars: &HashMap<String, String>,
        process_var: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let lookup = |key: &str| {
            process_var(key)
                .or_else(|| file_vars.get(key).cloned())
                .filter(|value| !value.is_empty())
        };
        Self {
            client_id: lookup(CLIENT_ID_VAR),
            client_secret: lookup(CLIENT_SECRET_VAR),
        }
    }
}

fn read_env_file(path: &Path) -> HashMap<String, String> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(err) if err.not_found() => {
            debug!(path = %path.display(), "env file not found, using process environment");
            return HashMap::new();
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to open env file");
            return HashMap::new();
        }
    };

    let mut vars = HashMap::new();
    for item in iter {
        match item {
            Ok((key, value)) => {
                vars.insert(key, value);
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "malformed env file, ignoring the rest");
                break;
            }
        }
    }
    vars
}

/// Executable names or paths of the external downloaders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub spotdl: String,
    pub scdl: String,
    pub ytdlp: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            spotdl: "spotdl".to_string(),
            scdl: "scdl".to_string(),
            ytdlp: "yt-dlp".to_string(),
        }
    }
}

impl ToolPaths {
    #[must_use]
    pub fn for_kind(&self, kind: SourceKind) -> &str {
        match kind {
            SourceKind::Spotify => &self.spotdl,
            SourceKind::SoundCloud => &self.scdl,
            SourceKind::YouTube => &self.ytdlp,
        }
    }
}

/// Wall-clock timeout per downloader invocation, by phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTimeouts {
    pub spotify_secs: u64,
    pub soundcloud_secs: u64,
    pub youtube_secs: u64,
}

impl Default for PhaseTimeouts {
    fn default() -> Self {
        Self {
            spotify_secs: DEFAULT_SPOTIFY_TIMEOUT_SECS,
            soundcloud_secs: DEFAULT_SOUNDCLOUD_TIMEOUT_SECS,
            youtube_secs: DEFAULT_YOUTUBE_TIMEOUT_SECS,
        }
    }
}

impl PhaseTimeouts {
    #[must_use]
    pub fn secs_for(&self, kind: SourceKind) -> u64 {
        match kind {
            SourceKind::Spotify => self.spotify_secs,
            SourceKind::SoundCloud => self.soundcloud_secs,
            SourceKind::YouTube => self.youtube_secs,
        }
    }

    #[must_use]
    pub fn for_kind(&self, kind: SourceKind) -> Duration {
        Duration::from_secs(self.secs_for(kind))
    }
}

/// Spotify Web API endpoints, overridable for tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifyEndpoints {
    /// Base URL of the Web API (`.../v1`)
    pub api_url: String,
    /// Client-credentials token endpoint
    pub auth_url: String,
}

impl Default for SpotifyEndpoints {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_SPOTIFY_API_URL.to_string(),
            auth_url: DEFAULT_SPOTIFY_AUTH_URL.to_string(),
        }
    }
}

/// Complete configuration of one sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    pub tools: ToolPaths,
    pub timeouts: PhaseTimeouts,
    pub spotify: SpotifyEndpoints,
    pub credentials: Credentials,
    /// Parse the `spotdl` error artifact after each Spotify link.
    pub parse_error_logs: bool,
}

impl SyncConfig {
    /// Checks timeouts, executable names and endpoint URLs.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in [SourceKind::SoundCloud, SourceKind::YouTube, SourceKind::Spotify] {
            let secs = self.timeouts.secs_for(kind);
            if !(1..=MAX_TIMEOUT_SECS).contains(&secs) {
                return Err(ConfigError::TimeoutOutOfRange { phase: kind, secs });
            }
            if self.tools.for_kind(kind).trim().is_empty() {
                return Err(ConfigError::EmptyToolPath { phase: kind });
            }
        }
        for endpoint in [&self.spotify.api_url, &self.spotify.auth_url] {
            let valid = url::Url::parse(endpoint)
                .is_ok_and(|parsed| matches!(parsed.scheme(), "http" | "https"));
            if !valid {
                return Err(ConfigError::InvalidEndpoint {
                    url: endpoint.clone(),
                });
            }
        }
        Ok(())
    }
}
