//! `spotdl` invocation for Spotify links.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use super::{Downloader, InvocationOutcome, ToolCommand, invoke};
use crate::config::Credentials;
use crate::parser::SourceKind;

const ARTIFACT_PREFIX: &str = "errors";

/// Output template: `<list name>/<position> <artists> - <title>.<ext>`.
pub const OUTPUT_TEMPLATE: &str = "{list-name}/{list-position} {artists} - {title}.{output-ext}";

/// Downloads Spotify playlists, albums and tracks with `spotdl`.
///
/// `spotdl` writes its own error artifact via `--save-errors`.
#[derive(Debug, Clone)]
pub struct SpotdlDownloader {
    program: String,
    timeout: Duration,
    credentials: Credentials,
}

impl SpotdlDownloader {
    #[must_use]
    pub fn new(program: impl Into<String>, timeout: Duration, credentials: Credentials) -> Self {
        Self {
            program: program.into(),
            timeout,
            credentials,
        }
    }

    /// Builds the `spotdl` command line; credentials are passed only when configured.
    #[must_use]
    pub fn command(&self, url: &str, output_dir: &Path, artifact: &Path) -> ToolCommand {
        let mut command = ToolCommand::new(&self.program, output_dir, self.timeout)
            .arg("--save-errors")
            .arg(artifact.to_string_lossy());

        if let Some((id, secret)) = self.credentials.pair() {
            command = command
                .args(["--client-id", id, "--client-secret"])
                .secret_arg(secret);
        }

        command.args(["download", url, "--output", OUTPUT_TEMPLATE])
    }
}

#[async_trait]
impl Downloader for SpotdlDownloader {
    fn name(&self) -> &str {
        "spotdl"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Spotify
    }

    async fn download(&self, url: &str, output_dir: &Path) -> InvocationOutcome {
        invoke(self.name(), url, output_dir, ARTIFACT_PREFIX, |artifact| {
            self.command(url, output_dir, artifact)
        })
        .await
    }
}
