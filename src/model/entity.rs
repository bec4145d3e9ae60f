//! Typed view over a persisted Spotify Web API entity response.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::DocumentError;

/// Accepts `null` wherever the Web API may omit a value, mapping it to the default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Album, playlist, artist or track as returned by the Spotify Web API.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyEntity {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<CoverImage>,
    /// Present for albums and playlists.
    #[serde(default)]
    pub tracks: Option<TrackListing>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoverImage {
    pub url: String,
}

/// Paging object holding the track listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackListing {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<ListingItem>,
    #[serde(default)]
    pub next: Option<String>,
}

/// Album listings hold bare track objects, playlist listings wrap them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListingItem {
    Bare(SpotifyTrack),
    Wrapped {
        #[serde(default)]
        track: Option<SpotifyTrack>,
    },
}

impl ListingItem {
    #[must_use]
    pub fn track(&self) -> Option<&SpotifyTrack> {
        match self {
            Self::Bare(track) => Some(track),
            Self::Wrapped { track } => track.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrack {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub artists: Vec<SpotifyArtist>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub external_urls: ExternalUrls,
}

impl SpotifyTrack {
    #[must_use]
    pub fn artist_names(&self) -> Vec<String> {
        self.artists.iter().map(|a| a.name.clone()).collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyArtist {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

impl SpotifyEntity {
    /// Loads the typed view from a persisted raw response.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] when the file is unreadable or is not an entity.
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

    /// Track listing items, empty for artists and single tracks.
    #[must_use]
    pub fn listing(&self) -> &[ListingItem] {
        self.tracks
            .as_ref()
            .map(|t| t.items.as_slice())
            .unwrap_or_default()
    }
}
