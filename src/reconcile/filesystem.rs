//! Filesystem-count reconciliation for `scdl` and `yt-dlp` runs.
//!
//! Sidecars (`*.info.json`) written next to the audio files are merged into
//! one `.metadata/<playlist>.json` document per playlist directory, and the
//! numbered audio files are compared against the expected playlist length.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use super::ReconcileError;
use super::scan::{MP3_EXTENSIONS, TrackScan, scan_numbered_tracks};
use crate::layout::{self, DESCRIPTION_SUFFIX, SIDECAR_SUFFIX};
use crate::model::{DocumentError, PlaylistDocument, PlaylistRecord, TrackRecord};
use crate::parser::SourceKind;

/// Result of checking one playlist directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistCheck {
    /// Playlist with its missing-track records (empty when complete).
    pub playlist: PlaylistRecord,
    /// True when new sidecars were merged during this pass; false for a
    /// read-only re-check against an existing document.
    pub merged: bool,
}

/// Reconciler for downloaders that leave per-track sidecar files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilesystemReconciler {
    source: SourceKind,
    remove_root_sidecars: bool,
}

impl FilesystemReconciler {
    /// SoundCloud pass; stray sidecars in the output root are deleted first.
    #[must_use]
    pub fn for_soundcloud() -> Self {
        Self {
            source: SourceKind::SoundCloud,
            remove_root_sidecars: true,
        }
    }

    #[must_use]
    pub fn for_youtube() -> Self {
        Self {
            source: SourceKind::YouTube,
            remove_root_sidecars: false,
        }
    }

    #[must_use]
    pub fn source(&self) -> SourceKind {
        self.source
    }

    /// Reconciles every playlist directory under `output_dir` and returns the
    /// missing-track records of all of them.
    ///
    /// # Errors
    ///
    /// See [`FilesystemReconciler::reconcile_playlists`].
    pub fn reconcile(&self, output_dir: &Path) -> Result<Vec<TrackRecord>, ReconcileError> {
        Ok(self
            .reconcile_playlists(output_dir)?
            .into_iter()
            .flat_map(|check| check.playlist.into_tracks())
            .collect())
    }

    /// Reconciles every playlist directory under `output_dir`, one
    /// [`PlaylistCheck`] per directory that was merged or re-checked.
    ///
    /// Directories holding sidecars are merged into their playlist document.
    /// Directories without sidecars whose document already exists are checked
    /// read-only against it, so a re-run on an unchanged tree reports the same
    /// missing set.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError`] when the output root cannot be listed or the
    /// metadata directory cannot be created. Per-playlist failures are logged.
    #[tracing::instrument(skip_all, fields(source = %self.source, output = %output_dir.display()))]
    pub fn reconcile_playlists(&self, output_dir: &Path) -> Result<Vec<PlaylistCheck>, ReconcileError> {
        if self.remove_root_sidecars {
            remove_root_sidecars(output_dir)?;
        }

        let mut playlist_dirs = Vec::new();
        for entry in fs::read_dir(output_dir).map_err(|e| ReconcileError::io(output_dir, e))? {
            let path = entry.map_err(|e| ReconcileError::io(output_dir, e))?.path();
            if path.is_dir() && !is_hidden(&path) {
                playlist_dirs.push(path);
            }
        }
        playlist_dirs.sort();

        let metadata_dir = layout::metadata_dir(output_dir);
        fs::create_dir_all(&metadata_dir).map_err(|e| ReconcileError::io(&metadata_dir, e))?;

        let checks: Vec<PlaylistCheck> = playlist_dirs
            .iter()
            .filter_map(|dir| reconcile_playlist_dir(output_dir, dir))
            .collect();

        let total_missing: usize = checks.iter().map(|check| check.playlist.tracks.len()).sum();
        info!(playlists = checks.len(), total_missing, "🧹 Reconciliation done");
        Ok(checks)
    }
}

fn remove_root_sidecars(output_dir: &Path) -> Result<(), ReconcileError> {
    for entry in fs::read_dir(output_dir).map_err(|e| ReconcileError::io(output_dir, e))? {
        let path = entry.map_err(|e| ReconcileError::io(output_dir, e))?.path();
        if layout::is_sidecar_file(&path) {
            info!(file = %file_name(&path), "🗑️ Deleting root sidecar");
            if let Err(err) = fs::remove_file(&path) {
                warn!(file = %path.display(), error = %err, "failed to delete root sidecar");
            }
        }
    }
    Ok(())
}

fn reconcile_playlist_dir(output_dir: &Path, dir: &Path) -> Option<PlaylistCheck> {
    let name = file_name(dir);
    let document_path = layout::playlist_document_path(output_dir, &name);

    let mut sidecars = match list_sidecars(dir) {
        Ok(sidecars) => sidecars,
        Err(err) => {
            warn!(playlist = %name, error = %err, "cannot list playlist directory");
            return None;
        }
    };

    if sidecars.is_empty() {
        if document_path.is_file() {
            debug!(playlist = %name, "no new sidecars, checking against existing document");
            return check_existing(dir, &name, &document_path).map(|playlist| PlaylistCheck {
                playlist,
                merged: false,
            });
        }
        return None;
    }

    let sidecar_count = sidecars.len();
    let canonical = sidecars.remove(canonical_sidecar_index(&sidecars, &name));
    if let Err(err) = fs::rename(&canonical, &document_path) {
        warn!(playlist = %name, error = %err, "failed to move playlist sidecar");
        return None;
    }

    let mut document = load_or_empty(&document_path, &name);
    let expected = match document.playlist_count {
        Some(count) => count,
        None => {
            document.playlist_count = Some(sidecar_count);
            sidecar_count
        }
    };
    info!(playlist = %name, expected, "📊 tracks expected");

    let playlist = missing_tracks(dir, &name, &document, expected);

    let mut folded = 0;
    for sidecar in &sidecars {
        match read_sidecar(sidecar) {
            Ok(value) => {
                document.songs.push(value);
                folded += 1;
            }
            Err(reason) => warn!(file = %sidecar.display(), %reason, "skipping unreadable sidecar"),
        }
        if let Err(err) = fs::remove_file(sidecar) {
            warn!(file = %sidecar.display(), error = %err, "failed to delete sidecar");
        }
    }

    let description = dir.join(format!("{name}{DESCRIPTION_SUFFIX}"));
    if description.is_file() {
        let target = layout::metadata_dir(output_dir).join(format!("{name}.txt"));
        if let Err(err) = fs::rename(&description, &target) {
            warn!(playlist = %name, error = %err, "failed to move description");
        }
    }

    match document.save(&document_path) {
        Ok(()) => info!(playlist = %name, songs = folded, "✅ playlist document written"),
        Err(err) => warn!(playlist = %name, error = %err, "failed to write playlist document"),
    }

    Some(PlaylistCheck {
        playlist,
        merged: true,
    })
}

fn check_existing(dir: &Path, name: &str, document_path: &Path) -> Option<PlaylistRecord> {
    match PlaylistDocument::load(document_path) {
        Ok(document) => {
            let expected = document.playlist_count.unwrap_or(0);
            Some(missing_tracks(dir, name, &document, expected))
        }
        Err(err) => {
            warn!(playlist = %name, error = %err, "existing playlist document unusable");
            None
        }
    }
}

fn missing_tracks(
    dir: &Path,
    name: &str,
    document: &PlaylistDocument,
    expected: usize,
) -> PlaylistRecord {
    let scan = match scan_numbered_tracks(dir, MP3_EXTENSIONS) {
        Ok(scan) => scan,
        Err(err) => {
            warn!(playlist = %name, error = %err, "cannot scan playlist directory");
            TrackScan::default()
        }
    };

    let source_url = document.webpage_url.clone().unwrap_or_default();
    let mut playlist = PlaylistRecord::new(name, source_url, expected);
    for ordinal in scan.missing(expected) {
        playlist.push_missing(scan.format_ordinal(ordinal));
    }

    if playlist.tracks.is_empty() {
        info!(playlist = %name, expected, "✅ all tracks present");
    } else {
        info!(playlist = %name, missing = playlist.tracks.len(), expected, "⚠️ missing tracks");
        for track in &playlist.tracks {
            info!("  🚫 {track}");
        }
    }
    playlist
}

fn load_or_empty(path: &Path, name: &str) -> PlaylistDocument {
    match PlaylistDocument::load(path) {
        Ok(document) => document,
        Err(err @ DocumentError::Invalid { .. }) => {
            warn!(playlist = %name, error = %err, "invalid playlist sidecar, starting from an empty document");
            PlaylistDocument::default()
        }
        Err(err) => {
            warn!(playlist = %name, error = %err, "cannot read playlist sidecar");
            PlaylistDocument::default()
        }
    }
}

fn read_sidecar(path: &Path) -> Result<Value, String> {
    let raw = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&raw).map_err(|e| e.to_string())
}

fn list_sidecars(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut sidecars = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if layout::is_sidecar_file(&path) {
            sidecars.push(path);
        }
    }
    sidecars.sort();
    Ok(sidecars)
}

/// Playlist-level sidecar: named after the directory, else the first one not
/// starting with a digit, else the first by name.
fn canonical_sidecar_index(sidecars: &[PathBuf], playlist_name: &str) -> usize {
    let exact = format!("{playlist_name}{SIDECAR_SUFFIX}");
    sidecars
        .iter()
        .position(|path| file_name(path) == exact)
        .or_else(|| {
            sidecars
                .iter()
                .position(|path| !file_name(path).starts_with(|c: char| c.is_ascii_digit()))
        })
        .unwrap_or(0)
}

fn is_hidden(path: &Path) -> bool {
    file_name(path).starts_with('.')
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
