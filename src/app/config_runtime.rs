use playlist_core::{Credentials, PhaseTimeouts, SpotifyEndpoints, SyncConfig, ToolPaths};

use crate::cli::Args;

pub(crate) fn resolve_default_log_level(args: &Args) -> &'static str {
    if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// `-v`/`-q` on the command line override `RUST_LOG`.
pub(crate) fn should_force_cli_log_level(args: &Args) -> bool {
    args.verbose > 0 || args.quiet
}

/// Folds parsed arguments and loaded credentials into the library configuration.
pub(crate) fn build_sync_config(args: &Args, credentials: Credentials) -> SyncConfig {
    SyncConfig {
        tools: ToolPaths {
            spotdl: args.spotdl_bin.clone(),
            scdl: args.scdl_bin.clone(),
            ytdlp: args.ytdlp_bin.clone(),
        },
        timeouts: PhaseTimeouts {
            spotify_secs: args.spotify_timeout_secs,
            soundcloud_secs: args.soundcloud_timeout_secs,
            youtube_secs: args.youtube_timeout_secs,
        },
        spotify: SpotifyEndpoints {
            api_url: args.spotify_api_url.clone(),
            auth_url: args.spotify_auth_url.clone(),
        },
        credentials,
        parse_error_logs: args.parse_error_logs,
    }
}
