//! CLI entry point for the playlist downloader.

use std::process::ExitCode;

use clap::Parser;

mod app;
mod cli;

use cli::Args;

/// Process exit outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    Success,
    /// Missing input, bad configuration or any internal failure.
    Failure,
    /// Nonzero exit code of an external downloader, passed through.
    Tool(u8),
}

impl From<ProcessExit> for u8 {
    fn from(exit: ProcessExit) -> Self {
        match exit {
            ProcessExit::Success => 0,
            ProcessExit::Failure => 1,
            ProcessExit::Tool(code) => code,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    match app::runtime::run_playlist_sync(args).await {
        Ok(exit) => ExitCode::from(u8::from(exit)),
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "Run aborted");
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}
