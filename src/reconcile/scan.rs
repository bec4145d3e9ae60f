//! Ordinal scanning of numbered audio files in a playlist directory.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

/// Audio extension written by `scdl` and `yt-dlp` runs.
pub const MP3_EXTENSIONS: &[&str] = &["mp3"];

/// Audio extensions `spotdl` may produce.
pub const SPOTIFY_AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "m4a"];

/// Upper bound on the expected track count of one playlist.
pub const MAX_EXPECTED_TRACKS: usize = 10_000;

/// Leading integer of a file stem, optional leading whitespace.
#[allow(clippy::expect_used)]
static LEADING_ORDINAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+)").expect("leading ordinal regex is valid") // Static pattern, safe to panic
});

/// Ordinals present in a playlist directory plus the observed padding width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackScan {
    ordinals: BTreeSet<usize>,
    padding: usize,
}

impl TrackScan {
    /// Builds a scan from file stems; stems without a leading integer are ignored.
    #[must_use]
    pub fn from_stems<'a>(stems: impl IntoIterator<Item = &'a str>) -> Self {
        let mut scan = Self::default();
        for stem in stems {
            scan.record(stem);
        }
        scan
    }

    fn record(&mut self, stem: &str) {
        let Some(digits) = LEADING_ORDINAL.captures(stem).and_then(|caps| caps.get(1)) else {
            return;
        };
        let digits = digits.as_str();
        if let Ok(ordinal) = digits.parse::<usize>() {
            self.ordinals.insert(ordinal);
            self.padding = self.padding.max(digits.len());
        }
    }

    /// Present ordinals in ascending order.
    #[must_use]
    pub fn present(&self) -> &BTreeSet<usize> {
        &self.ordinals
    }

    /// Maximum digit count among the present files.
    #[must_use]
    pub fn padding(&self) -> usize {
        self.padding
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordinals.is_empty()
    }

    /// `{1..=expected} \ present`, ascending. `expected` is clamped to
    /// [`MAX_EXPECTED_TRACKS`].
    #[must_use]
    pub fn missing(&self, expected: usize) -> Vec<usize> {
        if expected > MAX_EXPECTED_TRACKS {
            warn!(expected, limit = MAX_EXPECTED_TRACKS, "expected track count clamped");
        }
        (1..=expected.min(MAX_EXPECTED_TRACKS))
            .filter(|n| !self.ordinals.contains(n))
            .collect()
    }

    /// Zero-pads an ordinal to the observed width.
    #[must_use]
    pub fn format_ordinal(&self, ordinal: usize) -> String {
        format!("{ordinal:0width$}", width = self.padding)
    }
}

/// Scans the regular files of `dir` whose extension is in `extensions`
/// (case-insensitive) for leading ordinals.
///
/// # Errors
///
/// Returns the IO error when the directory cannot be listed.
pub fn scan_numbered_tracks(dir: &Path, extensions: &[&str]) -> std::io::Result<TrackScan> {
    let mut scan = TrackScan::default();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)));
        if !matches_extension {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            scan.record(stem);
        }
    }
    Ok(scan)
}
