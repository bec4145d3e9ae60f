//! Downloader error-log parsing into per-track failure records.
//!
//! `spotdl --save-errors` writes one line per failed track:
//!
//! ```text
//! https://open.spotify.com/track/6bFe... - LookupError: No results found for song: NOTION - Dreams
//! https://open.spotify.com/track/2ZXs... - KeyError: 'webCommandMetadata'
//! https://open.spotify.com/track/0PBQ... - AudioProviderError: YT-DLP download error - https://music.youtube.com/watch?v=...
//! ```
//!
//! Matching is plain substring splitting on ` - `, so titles or artist names
//! containing that delimiter are split incorrectly.

use std::fmt;
use std::path::Path;

use tracing::{error, info};

use crate::model::TrackRecord;

/// Prefix every parsed line must start with.
pub const TRACK_URL_PREFIX: &str = "https://open.spotify.com/track/";

const LOOKUP_MARKER: &str = " - LookupError: No results found for song:";
const KEY_ERROR_MARKER: &str = " - KeyError: 'webCommandMetadata'";
const AUDIO_PROVIDER_MARKER: &str = " - AudioProviderError: YT-DLP download error - ";
const FIELD_DELIMITER: &str = " - ";

/// Known failure kinds reported by `spotdl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// No matching audio source was found.
    LookupNoResults,
    /// YouTube page metadata could not be read.
    WebCommandMetadata,
    /// The audio provider download failed.
    AudioProviderDownload,
}

impl FailureKind {
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::LookupNoResults => "🔍",
            Self::WebCommandMetadata => "🧩",
            Self::AudioProviderDownload => "🌐",
        }
    }

    /// Error text stored on the failed track record.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::LookupNoResults => "LookupError: No results found",
            Self::WebCommandMetadata => "KeyError: 'webCommandMetadata'",
            Self::AudioProviderDownload => "AudioProviderError: YT-DLP download error",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One failed track parsed from an error artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackFailure {
    pub kind: FailureKind,
    /// Track record with `error` set to the kind label.
    pub track: TrackRecord,
}

impl fmt::Display for TrackFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} - {}",
            self.kind.icon(),
            self.track.song_url.as_deref().unwrap_or_default(),
            self.track.error
        )?;
        if let Some(title) = &self.track.title {
            write!(f, " - {title}")?;
        }
        if !self.track.artists.is_empty() {
            write!(f, " - {}", self.track.artists.join(", "))?;
        }
        Ok(())
    }
}

/// Converts a downloader's error artifact into failure records.
///
/// Implementations never fail: an unreadable artifact is logged and yields
/// an empty list.
pub trait FailureLogParser: Send + Sync {
    /// Parses the artifact produced while downloading `playlist_url`.
    fn parse(&self, artifact: &Path, playlist_url: &str) -> Vec<TrackFailure>;
}

/// Parser for `spotdl --save-errors` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpotdlErrorLogParser;

impl SpotdlErrorLogParser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parses artifact text; lines not matching a known pattern are ignored.
    #[must_use]
    pub fn parse_text(&self, text: &str, playlist_url: &str) -> Vec<TrackFailure> {
        text.lines()
            .filter_map(|line| parse_line(line.trim(), playlist_url))
            .collect()
    }
}

impl FailureLogParser for SpotdlErrorLogParser {
    fn parse(&self, artifact: &Path, playlist_url: &str) -> Vec<TrackFailure> {
        let text = match std::fs::read_to_string(artifact) {
            Ok(text) => text,
            Err(err) => {
                error!(artifact = %artifact.display(), error = %err, "Failed to read error log");
                return Vec::new();
            }
        };
        let failures = self.parse_text(&text, playlist_url);
        info!(artifact = %artifact.display(), failures = failures.len(), "Parsed error log");
        failures
    }
}

fn parse_line(line: &str, playlist_url: &str) -> Option<TrackFailure> {
    if !line.starts_with(TRACK_URL_PREFIX) {
        return None;
    }

    if let Some((song_url, rest)) = line.split_once(LOOKUP_MARKER) {
        let mut fields = rest.split(FIELD_DELIMITER);
        let artists = fields
            .next()
            .unwrap_or_default()
            .split(',')
            .map(|artist| artist.trim().to_string())
            .collect();
        let title = fields.next().unwrap_or_default().trim().to_string();
        return Some(failure(FailureKind::LookupNoResults, song_url, playlist_url).with_details(title, artists));
    }

    if let Some((song_url, _)) = line.split_once(KEY_ERROR_MARKER) {
        return Some(failure(FailureKind::WebCommandMetadata, song_url, playlist_url));
    }

    if let Some((song_url, _)) = line.split_once(AUDIO_PROVIDER_MARKER) {
        return Some(failure(FailureKind::AudioProviderDownload, song_url, playlist_url));
    }

    None
}

fn failure(kind: FailureKind, song_url: &str, playlist_url: &str) -> TrackFailure {
    TrackFailure {
        kind,
        track: TrackRecord::failed(song_url.trim(), playlist_url, kind.label()),
    }
}

impl TrackFailure {
    fn with_details(mut self, title: String, artists: Vec<String>) -> Self {
        let song_url = self.track.song_url.take();
        self.track = self.track.with_details(Some(title), artists, song_url);
        self
    }
}
