use std::fs;

use anyhow::{Context, Result};
use playlist_core::{Credentials, SyncPipeline, layout};
use tracing::{debug, error, info};

use crate::ProcessExit;
use crate::app::{config_runtime, exit_handler, terminal};
use crate::cli::Args;

pub(crate) async fn run_playlist_sync(args: Args) -> Result<ProcessExit> {
    fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("Failed to create output directory {}", args.output_dir.display())
    })?;
    let output_dir = fs::canonicalize(&args.output_dir).with_context(|| {
        format!("Failed to resolve output directory {}", args.output_dir.display())
    })?;

    let log_file = terminal::open_log_file(&layout::log_file_path(&output_dir))?;
    terminal::init_tracing(
        config_runtime::resolve_default_log_level(&args),
        config_runtime::should_force_cli_log_level(&args),
        terminal::is_no_color_requested(&args),
        Some(log_file),
    );

    debug!(?args, "CLI arguments parsed");
    info!(output = %output_dir.display(), "Playlist downloader starting");

    if !args.input_file.is_file() {
        error!(input = %args.input_file.display(), "❌ Input file not found");
        return Ok(ProcessExit::Failure);
    }

    let credentials = Credentials::load(&args.env_file);
    let config = config_runtime::build_sync_config(&args, credentials);
    config.validate().context("Invalid configuration")?;

    let pipeline = SyncPipeline::from_config(&config);
    let report = pipeline.run(&args.input_file, &output_dir).await;

    Ok(exit_handler::determine_exit_outcome(&report))
}
