//! Spotify Web API metadata for Spotify links.
//!
//! For each Spotify link the fetcher resolves the entity kind from the URL,
//! authenticates with the client-credentials flow, downloads the full entity
//! document (all track listing pages for albums and playlists), and writes it
//! to `<output_dir>/.metadata/<name>.json`. The first cover image is saved to
//! `<output_dir>/.icons/<name>.jpg` on a best-effort basis.

mod client;
mod entity;
mod error;
mod fetcher;

pub use client::{MAX_LISTING_PAGES, SpotifyClient};
pub use entity::EntityKind;
pub use error::MetadataError;
pub use fetcher::{MetadataFetcher, document_stem, sanitize_name};
