//! Types representing extracted links and their source classification.

use std::fmt;

/// Music service a link belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Spotify,
    SoundCloud,
    YouTube,
}

impl SourceKind {
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Spotify => "📀",
            Self::SoundCloud => "🔊",
            Self::YouTube => "📺",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Spotify => "Spotify",
            Self::SoundCloud => "SoundCloud",
            Self::YouTube => "YouTube",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single extracted link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Extracted URL
    pub url: String,
    /// Detected source service
    pub kind: SourceKind,
}

impl Link {
    #[must_use]
    pub fn new(url: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }

    /// URL without its query string, for logging.
    #[must_use]
    pub fn display_url(&self) -> &str {
        strip_query(&self.url)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.kind.icon(), self.kind, self.display_url())
    }
}

/// Strips the `?query` part of a URL (share links carry tracking parameters).
#[must_use]
pub fn strip_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}

/// All links from an input file, in input order, plus per-kind subsequences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet {
    pub all: Vec<Link>,
    pub spotify: Vec<String>,
    pub soundcloud: Vec<String>,
    pub youtube: Vec<String>,
}

impl LinkSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a link to `all` and to its kind's subsequence.
    pub fn push(&mut self, link: Link) {
        match link.kind {
            SourceKind::Spotify => self.spotify.push(link.url.clone()),
            SourceKind::SoundCloud => self.soundcloud.push(link.url.clone()),
            SourceKind::YouTube => self.youtube.push(link.url.clone()),
        }
        self.all.push(link);
    }

    /// Returns the links of one source kind, in input order.
    #[must_use]
    pub fn for_kind(&self, kind: SourceKind) -> &[String] {
        match kind {
            SourceKind::Spotify => &self.spotify,
            SourceKind::SoundCloud => &self.soundcloud,
            SourceKind::YouTube => &self.youtube,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.all.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_set_push_keeps_order_per_kind() {
        let mut set = LinkSet::new();
        set.push(Link::new("https://open.spotify.com/playlist/A", SourceKind::Spotify));
        set.push(Link::new("https://soundcloud.com/u/sets/b", SourceKind::SoundCloud));
        set.push(Link::new("https://open.spotify.com/album/C", SourceKind::Spotify));

        assert_eq!(set.len(), 3);
        assert_eq!(
            set.for_kind(SourceKind::Spotify),
            ["https://open.spotify.com/playlist/A", "https://open.spotify.com/album/C"]
        );
        assert_eq!(set.for_kind(SourceKind::SoundCloud).len(), 1);
        assert!(set.for_kind(SourceKind::YouTube).is_empty());
    }

    #[test]
    fn test_display_url_strips_query() {
        let link = Link::new("https://open.spotify.com/playlist/A?si=xyz", SourceKind::Spotify);
        assert_eq!(link.display_url(), "https://open.spotify.com/playlist/A");
        assert_eq!(link.to_string(), "📀 Spotify https://open.spotify.com/playlist/A");
    }

    #[test]
    fn test_source_kind_display() {
        assert_eq!(SourceKind::SoundCloud.to_string(), "SoundCloud");
        assert_eq!(SourceKind::YouTube.label(), "YouTube");
    }
}
