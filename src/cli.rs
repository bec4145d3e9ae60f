//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use playlist_core::config::{
    DEFAULT_SOUNDCLOUD_TIMEOUT_SECS, DEFAULT_SPOTIFY_API_URL, DEFAULT_SPOTIFY_AUTH_URL,
    DEFAULT_SPOTIFY_TIMEOUT_SECS, DEFAULT_YOUTUBE_TIMEOUT_SECS, MAX_TIMEOUT_SECS,
};

/// Download music playlists and reconcile them on disk.
///
/// Reads Spotify, SoundCloud and YouTube links from a text file, downloads each
/// playlist with spotdl, scdl or yt-dlp, and reports which numbered tracks are
/// missing from every playlist folder.
#[derive(Parser, Debug)]
#[command(name = "playlist-downloader")]
#[command(author, version, about)]
pub struct Args {
    /// Text file with one link per line (plain URLs or markdown links)
    pub input_file: PathBuf,

    /// Directory receiving playlists, metadata, error logs and spotdl.log
    pub output_dir: PathBuf,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored terminal output
    #[arg(long)]
    pub no_color: bool,

    /// Dotenv file holding CLIENTID and CLIENTSECRET
    #[arg(long, default_value = ".env")]
    pub env_file: PathBuf,

    /// spotdl executable
    #[arg(long, default_value = "spotdl")]
    pub spotdl_bin: String,

    /// scdl executable
    #[arg(long, default_value = "scdl")]
    pub scdl_bin: String,

    /// yt-dlp executable
    #[arg(long, default_value = "yt-dlp")]
    pub ytdlp_bin: String,

    /// Per-link spotdl timeout in seconds (1-86400)
    #[arg(long, default_value_t = DEFAULT_SPOTIFY_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=MAX_TIMEOUT_SECS))]
    pub spotify_timeout_secs: u64,

    /// Per-link scdl timeout in seconds (1-86400)
    #[arg(long, default_value_t = DEFAULT_SOUNDCLOUD_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=MAX_TIMEOUT_SECS))]
    pub soundcloud_timeout_secs: u64,

    /// Per-link yt-dlp timeout in seconds (1-86400)
    #[arg(long, default_value_t = DEFAULT_YOUTUBE_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=MAX_TIMEOUT_SECS))]
    pub youtube_timeout_secs: u64,

    /// Parse the spotdl error log after each Spotify link and report failed tracks
    #[arg(long)]
    pub parse_error_logs: bool,

    /// Spotify Web API base URL
    #[arg(long, hide = true, default_value = DEFAULT_SPOTIFY_API_URL)]
    pub spotify_api_url: String,

    /// Spotify token endpoint
    #[arg(long, hide = true, default_value = DEFAULT_SPOTIFY_AUTH_URL)]
    pub spotify_auth_url: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const BIN: &str = "playlist-downloader";

    #[test]
    fn test_cli_positional_args_and_defaults() {
        let args = Args::try_parse_from([BIN, "links.txt", "music"]).unwrap();
        assert_eq!(args.input_file, PathBuf::from("links.txt"));
        assert_eq!(args.output_dir, PathBuf::from("music"));
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert!(!args.no_color);
        assert!(!args.parse_error_logs);
        assert_eq!(args.env_file, PathBuf::from(".env"));
        assert_eq!(args.spotdl_bin, "spotdl");
        assert_eq!(args.scdl_bin, "scdl");
        assert_eq!(args.ytdlp_bin, "yt-dlp");
        assert_eq!(args.spotify_timeout_secs, 3600);
        assert_eq!(args.soundcloud_timeout_secs, 3600);
        assert_eq!(args.youtube_timeout_secs, 7200);
        assert_eq!(args.spotify_api_url, DEFAULT_SPOTIFY_API_URL);
        assert_eq!(args.spotify_auth_url, DEFAULT_SPOTIFY_AUTH_URL);
    }

    #[test]
    fn test_cli_missing_positionals_rejected() {
        let err = Args::try_parse_from([BIN, "links.txt"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from([BIN, "a", "b", "-v"]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from([BIN, "a", "b", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_conflicts_with_verbose() {
        let args = Args::try_parse_from([BIN, "a", "b", "--quiet"]).unwrap();
        assert!(args.quiet);

        let err = Args::try_parse_from([BIN, "a", "b", "-q", "-v"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from([BIN, "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = Args::try_parse_from([BIN, "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    // ==================== Tool and Timeout Tests ====================

    #[test]
    fn test_cli_tool_overrides() {
        let args = Args::try_parse_from([
            BIN,
            "a",
            "b",
            "--spotdl-bin",
            "/opt/spotdl",
            "--scdl-bin",
            "./scdl.sh",
            "--ytdlp-bin",
            "yt",
            "--parse-error-logs",
            "--env-file",
            "secrets.env",
        ])
        .unwrap();
        assert_eq!(args.spotdl_bin, "/opt/spotdl");
        assert_eq!(args.scdl_bin, "./scdl.sh");
        assert_eq!(args.ytdlp_bin, "yt");
        assert!(args.parse_error_logs);
        assert_eq!(args.env_file, PathBuf::from("secrets.env"));
    }

    #[test]
    fn test_cli_timeout_bounds() {
        let args = Args::try_parse_from([BIN, "a", "b", "--youtube-timeout-secs", "86400"]).unwrap();
        assert_eq!(args.youtube_timeout_secs, 86_400);

        for value in ["0", "86401"] {
            let err = Args::try_parse_from([BIN, "a", "b", "--spotify-timeout-secs", value])
                .unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation, "value {value}");
        }
    }

    #[test]
    fn test_cli_hidden_endpoint_overrides() {
        let args = Args::try_parse_from([
            BIN,
            "a",
            "b",
            "--spotify-api-url",
            "http://127.0.0.1:9/v1",
            "--spotify-auth-url",
            "http://127.0.0.1:9/token",
        ])
        .unwrap();
        assert_eq!(args.spotify_api_url, "http://127.0.0.1:9/v1");
        assert_eq!(args.spotify_auth_url, "http://127.0.0.1:9/token");
    }
}
