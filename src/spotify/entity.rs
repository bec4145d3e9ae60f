//! Spotify entity kind detection from share URLs.

use std::fmt;

use url::Url;

/// Kind of Spotify entity a share link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Album,
    Playlist,
    Artist,
    Track,
}

impl EntityKind {
    /// Detection order; a URL matching several keywords takes the first.
    pub const ALL: [Self; 4] = [Self::Album, Self::Playlist, Self::Artist, Self::Track];

    /// Detects the kind by substring match on the URL.
    #[must_use]
    pub fn detect(url: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| url.contains(kind.keyword()))
    }

    /// Path segment naming this kind in share URLs.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Album => "album",
            Self::Playlist => "playlist",
            Self::Artist => "artist",
            Self::Track => "track",
        }
    }

    /// Web API collection path (`/v1/<collection>/<id>`).
    #[must_use]
    pub fn collection(self) -> &'static str {
        match self {
            Self::Album => "albums",
            Self::Playlist => "playlists",
            Self::Artist => "artists",
            Self::Track => "tracks",
        }
    }

    /// Albums and playlists carry a paginated track listing.
    #[must_use]
    pub fn has_track_listing(self) -> bool {
        matches!(self, Self::Album | Self::Playlist)
    }

    /// Entity id: the path segment after the kind segment, query ignored.
    ///
    /// Handles locale prefixes such as `/intl-de/album/<id>`.
    #[must_use]
    pub fn entity_id(self, url: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;
        let mut segments = parsed.path_segments()?;
        segments.find(|segment| *segment == self.keyword())?;
        segments
            .next()
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
