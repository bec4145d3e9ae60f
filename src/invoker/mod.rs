//! External downloader invocation.
//!
//! Each [`Downloader`] wraps one command-line tool (`spotdl`, `scdl`,
//! `yt-dlp`). An invocation prepares `<target>/.errors/`, names a timestamped
//! artifact there, runs the tool in the target directory under a wall-clock
//! timeout, and reports the exit code together with the artifact path.
//!
//! Launch failures, timeouts and signal terminations are reported as exit
//! code 1; they never abort the caller.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::time::Duration;
//! use playlist_core::invoker::{Downloader, YtDlpDownloader};
//!
//! # async fn example() {
//! let downloader = YtDlpDownloader::new("yt-dlp", Duration::from_secs(7200));
//! let outcome = downloader
//!     .download("https://www.youtube.com/playlist?list=PL1", Path::new("music"))
//!     .await;
//! println!("exit {} -> {}", outcome.exit_code, outcome.artifact.display());
//! # }
//! ```

mod command;
mod error;
mod scdl;
mod spotdl;
mod ytdlp;

pub use command::ToolCommand;
pub use error::InvokeError;
pub use scdl::ScdlDownloader;
pub use spotdl::SpotdlDownloader;
pub use ytdlp::YtDlpDownloader;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::layout;
use crate::parser::{SourceKind, strip_query};

/// Result of one downloader invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOutcome {
    /// Process exit code; 1 for launch failure, timeout or signal.
    pub exit_code: i32,
    /// Error/log artifact path (may not exist if the tool never wrote it).
    pub artifact: PathBuf,
}

impl InvocationOutcome {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// One external downloader tool.
///
/// This trait uses `async_trait` so pipelines can hold `Box<dyn Downloader>`.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Tool name used in logs.
    fn name(&self) -> &str;

    /// Source kind this tool downloads.
    fn kind(&self) -> SourceKind;

    /// Downloads `url` into `output_dir`.
    async fn download(&self, url: &str, output_dir: &Path) -> InvocationOutcome;
}

/// Creates `output_dir` and its `.errors` directory and returns the absolute
/// artifact path `<output_dir>/.errors/<prefix>-<YYYYmmddHHMMSS>.txt`.
///
/// # Errors
///
/// Returns [`InvokeError::Prepare`] when a directory cannot be created.
pub fn prepare_artifact(output_dir: &Path, prefix: &str) -> Result<PathBuf, InvokeError> {
    let errors_dir = layout::errors_dir(output_dir);
    std::fs::create_dir_all(&errors_dir).map_err(|source| InvokeError::Prepare {
        path: errors_dir.clone(),
        source,
    })?;
    let errors_dir = std::path::absolute(&errors_dir).map_err(|source| InvokeError::Prepare {
        path: errors_dir.clone(),
        source,
    })?;

    let stamp = chrono::Local::now().format("%Y%m%d%H%M%S");
    Ok(errors_dir.join(format!("{prefix}-{stamp}.txt")))
}

/// Shared invocation flow: prepare the artifact, build the command, run it.
async fn invoke(
    name: &str,
    url: &str,
    output_dir: &Path,
    artifact_prefix: &str,
    build: impl FnOnce(&Path) -> ToolCommand,
) -> InvocationOutcome {
    let artifact = match prepare_artifact(output_dir, artifact_prefix) {
        Ok(path) => path,
        Err(err) => {
            error!(tool = name, error = %err, "cannot prepare download");
            return InvocationOutcome {
                exit_code: InvokeError::EXIT_CODE,
                artifact: layout::errors_dir(output_dir),
            };
        }
    };

    let command = build(&artifact);
    info!(tool = name, url = strip_query(url), output = %output_dir.display(), "Downloading");
    info!(tool = name, "Command: {command}");

    let exit_code = match command.run().await {
        Ok(0) => {
            info!(tool = name, "✅ download complete");
            0
        }
        Ok(code) => {
            warn!(tool = name, code, "⚠️ downloader finished with nonzero exit code");
            code
        }
        Err(err @ InvokeError::Timeout { .. }) => {
            error!(tool = name, error = %err, "⏰ download timed out");
            InvokeError::EXIT_CODE
        }
        Err(err) => {
            error!(tool = name, error = %err, "💥 downloader failed");
            InvokeError::EXIT_CODE
        }
    };

    InvocationOutcome { exit_code, artifact }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_artifact_creates_errors_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("music");

        let artifact = prepare_artifact(&out, "scdl").unwrap();

        assert!(out.join(".errors").is_dir());
        assert!(artifact.is_absolute());
        let name = artifact.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("scdl-"));
        assert!(name.ends_with(".txt"));
        // scdl-YYYYmmddHHMMSS.txt
        assert_eq!(name.len(), "scdl-".len() + 14 + ".txt".len());
    }

    #[tokio::test]
    async fn test_invoke_missing_tool_reports_exit_one() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = invoke("ghost", "https://x", dir.path(), "ghost", |_| {
            ToolCommand::new(
                "definitely-not-a-real-downloader-binary",
                dir.path(),
                std::time::Duration::from_secs(5),
            )
        })
        .await;
        assert_eq!(outcome.exit_code, 1);
        assert!(!outcome.succeeded());
    }
}
