//! Input parsing module for extracting music-sharing links.
//!
//! Reads a newline-delimited links file and classifies every accepted line
//! as a Spotify, SoundCloud or YouTube link.
//!
//! # Current Support
//!
//! - Markdown `[text](url)` links (YouTube, Spotify)
//! - Bare YouTube and SoundCloud URLs anywhere in a line
//! - Lines starting with `https://open.spotify.com/`
//! - `#` comment lines and blank lines (ignored)
//!
//! # Example
//!
//! ```
//! use playlist_core::parser::{SourceKind, extract_links};
//!
//! let links = extract_links(
//!     "# weekend\nhttps://soundcloud.com/dj/sets/mix\n[Talk](https://youtu.be/x1)\n",
//! );
//! assert_eq!(links.len(), 2);
//! assert_eq!(links.all[0].kind, SourceKind::SoundCloud);
//! assert_eq!(links.youtube, vec!["https://youtu.be/x1".to_string()]);
//! ```

mod error;
mod input;
mod link;

pub use error::ParseError;
pub use input::{Link, LinkSet, SourceKind, strip_query};
pub use link::{SPOTIFY_PREFIX, classify, extract_link};

use std::path::Path;

use tracing::{debug, info};

/// Extracts and classifies links from raw input text.
///
/// Lines are processed in order and no deduplication is performed. Lines
/// that carry no recognized link are skipped and logged at debug level.
#[must_use]
pub fn extract_links(text: &str) -> LinkSet {
    let mut links = LinkSet::new();

    for (index, line) in text.lines().enumerate() {
        let Some(url) = extract_link(line) else {
            if !line.trim().is_empty() && !line.trim_start().starts_with('#') {
                debug!(line = index + 1, "no recognized link on line");
            }
            continue;
        };
        match classify(url) {
            Some(kind) => links.push(Link::new(url, kind)),
            None => debug!(line = index + 1, url = strip_query(url), "unclassified link"),
        }
    }

    links
}

/// Reads the links file and extracts every link, logging per-kind totals.
///
/// # Errors
///
/// Returns [`ParseError::Io`] when the file is missing, unreadable or not UTF-8.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn read_links(path: &Path) -> Result<LinkSet, ParseError> {
    let text = std::fs::read_to_string(path).map_err(|source| ParseError::io(path, source))?;
    let links = extract_links(&text);

    info!(
        total = links.len(),
        spotify = links.spotify.len(),
        soundcloud = links.soundcloud.len(),
        youtube = links.youtube.len(),
        "Links extracted"
    );
    for link in &links.all {
        info!("{link}");
    }

    Ok(links)
}
