//! `yt-dlp` invocation for YouTube links.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use super::{Downloader, InvocationOutcome, ToolCommand, invoke};
use crate::parser::SourceKind;

const ARTIFACT_PREFIX: &str = "ytdlp";

/// Output template: `<playlist title>/<NN> <uploader> - <title>.<ext>`.
pub const OUTPUT_TEMPLATE: &str = "%(playlist_title)s/%(playlist_index)02d %(uploader)s - %(title)s.%(ext)s";

/// Downloads YouTube playlists and videos as MP3 with `yt-dlp`.
#[derive(Debug, Clone)]
pub struct YtDlpDownloader {
    program: String,
    timeout: Duration,
}

impl YtDlpDownloader {
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
            .args([
                "-t",
                "mp3",
                "--yes-playlist",
                "--ignore-errors",
                "--no-abort-on-error",
                "--embed-thumbnail",
                "--write-info-json",
                "--add-metadata",
                "--audio-quality",
                "1",
                "--output",
                OUTPUT_TEMPLATE,
                url,
            ])
            .stderr_to(artifact)
    }
}

#[async_trait]
impl Downloader for YtDlpDownloader {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::YouTube
    }

    async fn download(&self, url: &str, output_dir: &Path) -> InvocationOutcome {
        invoke(self.name(), url, output_dir, ARTIFACT_PREFIX, |artifact| {
            self.command(url, output_dir, artifact)
        })
        .await
    }
}
