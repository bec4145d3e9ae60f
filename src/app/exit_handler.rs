//! Exit code logic for the playlist downloader process.
//!
//! Single responsibility: map a run report to the process exit outcome.

use playlist_core::RunReport;

use crate::ProcessExit;

/// Determines the process exit outcome from a finished run.
pub(crate) fn determine_exit_outcome(report: &RunReport) -> ProcessExit {
    match report.process_exit_code() {
        0 => ProcessExit::Success,
        1 => ProcessExit::Failure,
        code => ProcessExit::Tool(code),
    }
}
