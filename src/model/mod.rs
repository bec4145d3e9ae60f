//! Playlist/track records and the on-disk JSON document schemas.
//!
//! - [`PlaylistRecord`] / [`TrackRecord`] - reconciliation and failure results
//! - [`PlaylistDocument`] - per-playlist document merged from downloader sidecars
//! - [`SpotifyEntity`] - typed view over a persisted Spotify API response

mod document;
mod entity;
mod track;

pub use document::{DocumentError, PlaylistDocument};
pub use entity::{CoverImage, ExternalUrls, ListingItem, SpotifyArtist, SpotifyEntity, SpotifyTrack, TrackListing};
pub use track::{PlaylistRecord, PlaylistRef, TrackRecord};
