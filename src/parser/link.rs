//! Per-line link extraction and source classification.

use std::sync::LazyLock;

use regex::Regex;

use super::input::SourceKind;

/// Literal prefix of a bare Spotify share link line.
pub const SPOTIFY_PREFIX: &str = "https://open.spotify.com/";

/// YouTube URL wrapped in markdown parentheses: `[text](url)`.
#[allow(clippy::expect_used)]
static YOUTUBE_MARKDOWN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\((https?://(?:www\.)?(?:youtube\.com|youtu\.be)/[^\s)\]]+)\)")
        .expect("YouTube markdown regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static YOUTUBE_PLAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://(?:www\.)?(?:youtube\.com|youtu\.be)/[^\s)\]]+")
        .expect("YouTube regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static SOUNDCLOUD_PLAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://(?:www\.)?soundcloud\.com/[^\s)\]]+")
        .expect("SoundCloud regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static SPOTIFY_MARKDOWN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\((https?://(?:open\.)?spotify\.com/[^\s)\]]+)\)")
        .expect("Spotify markdown regex is valid") // Static pattern, safe to panic
});

/// Extracts the link from one input line, or `None` when the line carries none.
///
/// Rules are tried in order and the first match wins:
/// 1. markdown-wrapped YouTube URL
/// 2. bare YouTube URL
/// 3. bare SoundCloud URL
/// 4. markdown-wrapped Spotify URL
/// 5. line starting with [`SPOTIFY_PREFIX`] (returned verbatim)
///
/// Blank lines and `#` comments yield `None`.
///
/// # Examples
///
/// ```
/// use playlist_core::parser::extract_link;
///
/// assert_eq!(
///     extract_link("[Mix](https://youtu.be/abc123)"),
///     Some("https://youtu.be/abc123")
/// );
/// assert_eq!(extract_link("# https://soundcloud.com/u/sets/old"), None);
/// ```
#[must_use]
pub fn extract_link(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    if let Some(caps) = YOUTUBE_MARKDOWN.captures(line) {
        return caps.get(1).map(|m| m.as_str());
    }
    if let Some(m) = YOUTUBE_PLAIN.find(line) {
        return Some(m.as_str());
    }
    if let Some(m) = SOUNDCLOUD_PLAIN.find(line) {
        return Some(m.as_str());
    }
    if let Some(caps) = SPOTIFY_MARKDOWN.captures(line) {
        return caps.get(1).map(|m| m.as_str());
    }
    if line.starts_with(SPOTIFY_PREFIX) {
        return Some(line);
    }

    None
}

/// Classifies a URL by domain substring, in extraction priority order.
#[must_use]
pub fn classify(url: &str) -> Option<SourceKind> {
    if url.contains("youtube.com") || url.contains("youtu.be") {
        Some(SourceKind::YouTube)
    } else if url.contains("soundcloud.com") {
        Some(SourceKind::SoundCloud)
    } else if url.contains("spotify.com") {
        Some(SourceKind::Spotify)
    } else {
        None
    }
}
