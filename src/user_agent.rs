//! Shared User-Agent string for Spotify API and cover-art requests.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/playlist-downloader";

/// Default User-Agent for metadata requests (identifies the tool).
#[must_use]
pub(crate) fn default_metadata_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("playlist-downloader/{version} (+{PROJECT_UA_URL})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_user_agent_identifies_tool_and_version() {
        let ua = default_metadata_user_agent();
        assert!(ua.starts_with("playlist-downloader/"));
        assert!(ua.contains(env!("CARGO_PKG_VERSION")));
        assert!(ua.contains(PROJECT_UA_URL));
    }
}
