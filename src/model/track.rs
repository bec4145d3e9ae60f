//! Playlist and track records.

use std::fmt;

use serde::Serialize;

/// Parent playlist reference carried by every [`TrackRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlaylistRef {
    /// Playlist display name (directory name for filesystem playlists).
    pub name: String,
    /// Source URL of the playlist, empty when unknown.
    pub source_url: String,
    /// Number of tracks the playlist is expected to contain.
    pub expected_count: usize,
}

/// A single track, either downloaded or reported missing/failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackRecord {
    /// Track title, when known.
    pub title: Option<String>,
    /// Artist names in credit order.
    pub artists: Vec<String>,
    /// Track URL at the source service, when known.
    pub song_url: Option<String>,
    /// Owning playlist.
    pub playlist: PlaylistRef,
    /// Free-text error (`"Missing 04"`, `"LookupError: No results found"`, ...).
    pub error: String,
    /// Zero-padded ordinal position in the playlist, empty when unknown.
    pub list_position: String,
}

impl TrackRecord {
    /// Creates a placeholder for a track absent from the playlist directory.
    ///
    /// `list_position` must already be padded to the playlist's observed width.
    #[must_use]
    pub fn missing(playlist: PlaylistRef, list_position: impl Into<String>) -> Self {
        let list_position = list_position.into();
        Self {
            title: None,
            artists: Vec::new(),
            song_url: None,
            playlist,
            error: format!("Missing {list_position}"),
            list_position,
        }
    }

    /// Creates a record for a track the downloader reported as failed.
    #[must_use]
    pub fn failed(
        song_url: impl Into<String>,
        playlist_url: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            title: None,
            artists: Vec::new(),
            song_url: Some(song_url.into()),
            playlist: PlaylistRef {
                source_url: playlist_url.into(),
                ..PlaylistRef::default()
            },
            error: error.into(),
            list_position: String::new(),
        }
    }

    /// Fills in title/artists/URL, ignoring empty values.
    #[must_use]
    pub fn with_details(
        mut self,
        title: Option<String>,
        artists: Vec<String>,
        song_url: Option<String>,
    ) -> Self {
        self.title = title.filter(|t| !t.is_empty());
        self.artists = artists.into_iter().filter(|a| !a.is_empty()).collect();
        self.song_url = song_url.filter(|u| !u.is_empty());
        self
    }
}

impl fmt::Display for TrackRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(title) = &self.title {
            write!(f, " {title}")?;
        }
        if !self.artists.is_empty() {
            write!(f, " - {}", self.artists.join(", "))?;
        }
        Ok(())
    }
}

/// A playlist and the track records attached to it during reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlaylistRecord {
    pub name: String,
    pub source_url: String,
    pub expected_count: usize,
    pub tracks: Vec<TrackRecord>,
}

impl PlaylistRecord {
    #[must_use]
    pub fn new(name: impl Into<String>, source_url: impl Into<String>, expected_count: usize) -> Self {
        Self {
            name: name.into(),
            source_url: source_url.into(),
            expected_count,
            tracks: Vec::new(),
        }
    }

    /// Returns the parent reference to attach to this playlist's tracks.
    #[must_use]
    pub fn reference(&self) -> PlaylistRef {
        PlaylistRef {
            name: self.name.clone(),
            source_url: self.source_url.clone(),
            expected_count: self.expected_count,
        }
    }

    /// Appends a missing-track placeholder and returns it for further filling.
    pub fn push_missing(&mut self, list_position: impl Into<String>) -> &mut TrackRecord {
        let record = TrackRecord::missing(self.reference(), list_position);
        self.tracks.push(record);
        let last = self.tracks.len() - 1;
        &mut self.tracks[last]
    }

    #[must_use]
    pub fn into_tracks(self) -> Vec<TrackRecord> {
        self.tracks
    }
}
