//! `scdl` invocation for SoundCloud links.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use super::{Downloader, InvocationOutcome, ToolCommand, invoke};
use crate::parser::SourceKind;

const ARTIFACT_PREFIX: &str = "scdl";

/// Playlist file naming: `<playlist>/<NNNN> <uploader> - <title>.<ext>`.
pub const PLAYLIST_NAME_FORMAT: &str = "%(playlist)s/%(playlist_index)04d %(uploader)s - %(title)s.%(ext)s";

/// Extra arguments forwarded to the embedded `yt-dlp`.
pub const YT_DLP_ARGS: &str = "--write-info-json --ignore-errors --no-abort-on-error";

/// Downloads SoundCloud sets, users and tracks with `scdl`.
///
/// stderr of the child is redirected into the artifact.
#[derive(Debug, Clone)]
pub struct ScdlDownloader {
    program: String,
    timeout: Duration,
}

impl ScdlDownloader {
    #[must_use]
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    #[must_use]
    pub fn command(&self, url: &str, output_dir: &Path, artifact: &Path) -> ToolCommand {
        ToolCommand::new(&self.program, output_dir, self.timeout)
            .args(["-l", url, "--path"])
            .arg(output_dir.to_string_lossy())
            .args([
                "--no-playlist-folder",
                "--playlist-name-format",
                PLAYLIST_NAME_FORMAT,
                "--onlymp3",
                "--original-art",
                "-c",
                "--debug",
                "--yt-dlp-args",
                YT_DLP_ARGS,
            ])
            .stderr_to(artifact)
    }
}

#[async_trait]
impl Downloader for ScdlDownloader {
    fn name(&self) -> &str {
        "scdl"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::SoundCloud
    }

    async fn download(&self, url: &str, output_dir: &Path) -> InvocationOutcome {
        invoke(self.name(), url, output_dir, ARTIFACT_PREFIX, |artifact| {
            self.command(url, output_dir, artifact)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_arguments() {
        let downloader = ScdlDownloader::new("scdl", Duration::from_secs(3600));
        let command = downloader.command(
            "https://soundcloud.com/dj/sets/mix",
            Path::new("/music"),
            Path::new("/music/.errors/scdl-1.txt"),
        );

        assert_eq!(
            command.get_args(),
            [
                "-l",
                "https://soundcloud.com/dj/sets/mix",
                "--path",
                "/music",
                "--no-playlist-folder",
                "--playlist-name-format",
                PLAYLIST_NAME_FORMAT,
                "--onlymp3",
                "--original-art",
                "-c",
                "--debug",
                "--yt-dlp-args",
                YT_DLP_ARGS,
            ]
        );
        assert_eq!(command.stderr_path(), Some(Path::new("/music/.errors/scdl-1.txt")));
        assert_eq!(command.timeout(), Duration::from_secs(3600));
    }
}
