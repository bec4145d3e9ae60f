//! Metadata-authoritative reconciliation for Spotify playlists and albums.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use super::scan::{SPOTIFY_AUDIO_EXTENSIONS, scan_numbered_tracks};
use crate::layout;
use crate::model::{PlaylistRecord, SpotifyEntity, TrackRecord};
use crate::spotify::document_stem;

/// Compares a Spotify playlist directory against its persisted entity document.
///
/// The expected count is the length of the document's track listing, even
/// when fewer files were ever downloaded. Missing tracks are described by the
/// listing item at their 1-indexed position.
///
/// Any missing prerequisite (document, playlist directory, numbered files)
/// or an unreadable document is logged and yields an empty result.
#[tracing::instrument(skip_all, fields(playlist = %playlist_name))]
pub fn reconcile_with_metadata(
    playlist_url: &str,
    playlist_name: &str,
    output_dir: &Path,
) -> Vec<TrackRecord> {
    let stem = document_stem(playlist_name);
    let document_path = layout::playlist_document_path(output_dir, &stem);
    if !document_path.is_file() {
        info!("📄 No metadata document for playlist");
        return Vec::new();
    }

    let Some(playlist_dir) = find_playlist_dir(output_dir, playlist_name, &stem) else {
        info!("📁 No playlist directory");
        return Vec::new();
    };

    let entity = match SpotifyEntity::load(&document_path) {
        Ok(entity) => entity,
        Err(err) => {
            error!(error = %err, "❌ Failed to load metadata document");
            return Vec::new();
        }
    };
    let listing = entity.listing();
    let expected = listing.len();
    info!(expected, "📊 Metadata lists tracks");

    let scan = match scan_numbered_tracks(&playlist_dir, SPOTIFY_AUDIO_EXTENSIONS) {
        Ok(scan) => scan,
        Err(err) => {
            warn!(dir = %playlist_dir.display(), error = %err, "cannot scan playlist directory");
            return Vec::new();
        }
    };
    if scan.is_empty() {
        info!("ℹ️ No numbered files in playlist directory");
        return Vec::new();
    }

    let mut playlist = PlaylistRecord::new(playlist_name, playlist_url, expected);
    for ordinal in scan.missing(expected) {
        let record = playlist.push_missing(scan.format_ordinal(ordinal));
        if let Some(track) = listing.get(ordinal - 1).and_then(|item| item.track()) {
            *record = record.clone().with_details(
                Some(track.name.trim().to_string()),
                track.artist_names(),
                track.external_urls.spotify.clone(),
            );
        }
    }

    if playlist.tracks.is_empty() {
        info!(expected, "✅ All tracks present");
    } else {
        info!(
            missing = playlist.tracks.len(),
            expected,
            padding = scan.padding(),
            "⚠️ Missing tracks"
        );
        for track in &playlist.tracks {
            info!("  🚫 {track}");
            if let Some(url) = &track.song_url {
                info!("     {url}");
            }
        }
    }
    playlist.into_tracks()
}

fn find_playlist_dir(output_dir: &Path, name: &str, stem: &str) -> Option<PathBuf> {
    [name, stem]
        .into_iter()
        .filter(|candidate| !candidate.is_empty())
        .map(|candidate| output_dir.join(candidate))
        .find(|path| path.is_dir())
}
