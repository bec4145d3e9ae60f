//! Per-phase and per-run outcome reports.

use crate::failure::TrackFailure;
use crate::model::TrackRecord;
use crate::parser::SourceKind;

/// Outcome of one source-kind phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseReport {
    pub kind: SourceKind,
    /// Links of this kind found in the input.
    pub links_total: usize,
    /// Links handed to the downloader before the phase ended.
    pub links_attempted: usize,
    /// First nonzero downloader exit code, or 0.
    pub exit_code: i32,
    /// Link whose download produced `exit_code`.
    pub failed_link: Option<String>,
    /// Missing-track records from reconciliation.
    pub missing: Vec<TrackRecord>,
    /// Playlists whose reconciliation result this phase holds, including
    /// complete ones.
    pub playlists: Vec<String>,
    /// Failures parsed from downloader error logs.
    pub failures: Vec<TrackFailure>,
}

impl PhaseReport {
    #[must_use]
    pub fn new(kind: SourceKind, links_total: usize) -> Self {
        Self {
            kind,
            links_total,
            links_attempted: 0,
            exit_code: 0,
            failed_link: None,
            missing: Vec::new(),
            playlists: Vec::new(),
            failures: Vec::new(),
        }
    }

    #[must_use]
    pub fn holds_playlist(&self, name: &str) -> bool {
        self.playlists.iter().any(|held| held == name)
    }

    /// Drops the playlist and its missing records from this phase.
    pub fn remove_playlist(&mut self, name: &str) {
        self.playlists.retain(|held| held != name);
        self.missing.retain(|track| track.playlist.name != name);
    }

    /// Stores the latest result for `name`, replacing any earlier one.
    pub fn replace_playlist(&mut self, name: &str, missing: Vec<TrackRecord>) {
        self.remove_playlist(name);
        self.playlists.push(name.to_string());
        self.missing.extend(missing);
    }

    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    /// True when the input held no links of this kind.
    #[must_use]
    pub fn skipped(&self) -> bool {
        self.links_total == 0
    }
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Phases that ran, in execution order.
    pub phases: Vec<PhaseReport>,
    /// 0 on success, 1 for input failures, else the failing tool's exit code.
    pub exit_code: i32,
}

impl RunReport {
    /// Report for a run that could not read its input.
    #[must_use]
    pub fn input_failure() -> Self {
        Self {
            phases: Vec::new(),
            exit_code: 1,
        }
    }

    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    #[must_use]
    pub fn phase(&self, kind: SourceKind) -> Option<&PhaseReport> {
        self.phases.iter().find(|phase| phase.kind == kind)
    }

    #[must_use]
    pub fn total_missing(&self) -> usize {
        self.phases.iter().map(|phase| phase.missing.len()).sum()
    }

    #[must_use]
    pub fn total_failures(&self) -> usize {
        self.phases.iter().map(|phase| phase.failures.len()).sum()
    }

    /// Exit status for the process; codes outside `1..=255` collapse to 1.
    #[must_use]
    pub fn process_exit_code(&self) -> u8 {
        match self.exit_code {
            0 => 0,
            code => u8::try_from(code).ok().filter(|c| *c != 0).unwrap_or(1),
        }
    }
}
