//! Sequential sync pipeline: SoundCloud, then YouTube, then Spotify.

use std::path::Path;

use tracing::{debug, error, info, warn};

use super::report::{PhaseReport, RunReport};
use crate::config::SyncConfig;
use crate::failure::{FailureLogParser, SpotdlErrorLogParser, TrackFailure};
use crate::invoker::{Downloader, ScdlDownloader, SpotdlDownloader, YtDlpDownloader};
use crate::model::PlaylistRecord;
use crate::parser::{self, LinkSet, SourceKind, strip_query};
use crate::reconcile::{FilesystemReconciler, PlaylistCheck, reconcile_with_metadata};
use crate::spotify::MetadataFetcher;

/// Fixed phase order.
pub const PHASE_ORDER: [SourceKind; 3] = [SourceKind::SoundCloud, SourceKind::YouTube, SourceKind::Spotify];

const SEPARATOR: &str = "============================================================";

/// Runs every link of an input file through download and reconciliation.
///
/// Phases run one link at a time. The first nonzero downloader exit code
/// ends its phase after that link is reconciled, and no later phase runs.
///
/// Each playlist's missing tracks are held by exactly one phase of a run: a
/// fresh reconciliation replaces any earlier result for the same playlist,
/// and a read-only re-check never duplicates one already held.
pub struct SyncPipeline {
    spotify: Box<dyn Downloader>,
    soundcloud: Box<dyn Downloader>,
    youtube: Box<dyn Downloader>,
    metadata: Option<MetadataFetcher>,
    failure_parser: Option<Box<dyn FailureLogParser>>,
}

impl std::fmt::Debug for SyncPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncPipeline")
            .field("spotify", &self.spotify.name())
            .field("soundcloud", &self.soundcloud.name())
            .field("youtube", &self.youtube.name())
            .field("metadata", &self.metadata.is_some())
            .field("failure_parser", &self.failure_parser.is_some())
            .finish()
    }
}

impl SyncPipeline {
    /// Builds the pipeline with the real downloaders described by `config`.
    ///
    /// When the metadata HTTP client cannot be built, Spotify links are still
    /// downloaded but not reconciled.
    #[must_use]
    pub fn from_config(config: &SyncConfig) -> Self {
        let timeouts = &config.timeouts;
        let metadata = match MetadataFetcher::new(config.spotify.clone(), config.credentials.clone()) {
            Ok(fetcher) => Some(fetcher),
            Err(err) => {
                warn!(error = %err, "Spotify metadata disabled");
                None
            }
        };
        if !config.credentials.is_configured() {
            warn!("🔑 Spotify credentials missing; Spotify metadata and reconciliation will be skipped");
        }

        let pipeline = Self {
            spotify: Box::new(SpotdlDownloader::new(
                &config.tools.spotdl,
                timeouts.for_kind(SourceKind::Spotify),
                config.credentials.clone(),
            )),
            soundcloud: Box::new(ScdlDownloader::new(
                &config.tools.scdl,
                timeouts.for_kind(SourceKind::SoundCloud),
            )),
            youtube: Box::new(YtDlpDownloader::new(
                &config.tools.ytdlp,
                timeouts.for_kind(SourceKind::YouTube),
            )),
            metadata,
            failure_parser: None,
        };

        if config.parse_error_logs {
            pipeline.with_failure_parser(Box::new(SpotdlErrorLogParser::new()))
        } else {
            pipeline
        }
    }

    /// Replaces the downloader for its [`Downloader::kind`].
    #[must_use]
    pub fn with_downloader(mut self, downloader: Box<dyn Downloader>) -> Self {
        match downloader.kind() {
            SourceKind::Spotify => self.spotify = downloader,
            SourceKind::SoundCloud => self.soundcloud = downloader,
            SourceKind::YouTube => self.youtube = downloader,
        }
        self
    }

    #[must_use]
    pub fn with_metadata_fetcher(mut self, fetcher: Option<MetadataFetcher>) -> Self {
        self.metadata = fetcher;
        self
    }

    /// Enables error-log parsing after each Spotify download.
    #[must_use]
    pub fn with_failure_parser(mut self, parser: Box<dyn FailureLogParser>) -> Self {
        self.failure_parser = Some(parser);
        self
    }

    fn downloader(&self, kind: SourceKind) -> &dyn Downloader {
        match kind {
            SourceKind::Spotify => self.spotify.as_ref(),
            SourceKind::SoundCloud => self.soundcloud.as_ref(),
            SourceKind::YouTube => self.youtube.as_ref(),
        }
    }

    /// Reads `input_file` once and runs the phases in [`PHASE_ORDER`].
    ///
    /// An unreadable input file yields a report with exit code 1.
    #[tracing::instrument(skip_all, fields(input = %input_file.display(), output = %output_dir.display()))]
    pub async fn run(&self, input_file: &Path, output_dir: &Path) -> RunReport {
        let links = match parser::read_links(input_file) {
            Ok(links) => links,
            Err(err) => {
                error!(error = %err, "❌ Failed to read links");
                return RunReport::input_failure();
            }
        };
        self.run_links(&links, output_dir).await
    }

    /// Runs the phases over already extracted links.
    pub async fn run_links(&self, links: &LinkSet, output_dir: &Path) -> RunReport {
        let mut report = RunReport::default();

        for kind in PHASE_ORDER {
            let phase = self
                .run_phase_after(kind, links.for_kind(kind), output_dir, &mut report.phases)
                .await;
            let exit_code = phase.exit_code;
            report.phases.push(phase);
            if exit_code != 0 {
                error!(phase = %kind, code = exit_code, "❌ Phase failed, skipping remaining phases");
                report.exit_code = exit_code;
                break;
            }
        }

        log_summary(&report, output_dir);
        report
    }

    /// Runs one phase; halts at the first link whose download exits nonzero.
    pub async fn run_phase(&self, kind: SourceKind, links: &[String], output_dir: &Path) -> PhaseReport {
        self.run_phase_after(kind, links, output_dir, &mut []).await
    }

    async fn run_phase_after(
        &self,
        kind: SourceKind,
        links: &[String],
        output_dir: &Path,
        earlier: &mut [PhaseReport],
    ) -> PhaseReport {
        let mut report = PhaseReport::new(kind, links.len());
        if links.is_empty() {
            info!(phase = %kind, "ℹ️ No {kind} links found");
            return report;
        }

        let total = links.len();
        info!(phase = %kind, "🎯 Starting {total} {kind} links...");
        let downloader = self.downloader(kind);

        for (index, link) in links.iter().enumerate() {
            info!("{SEPARATOR}");
            let display_name = match kind {
                SourceKind::Spotify => self.fetch_metadata(link, output_dir).await,
                SourceKind::SoundCloud | SourceKind::YouTube => None,
            };
            info!(
                "{} [{}/{total}] Processing {} {}",
                kind.icon(),
                index + 1,
                strip_query(link),
                display_name.as_deref().unwrap_or_default()
            );

            let outcome = downloader.download(link, output_dir).await;
            report.links_attempted += 1;

            for check in reconcile(kind, link, display_name.as_deref(), output_dir) {
                record_check(&mut report, earlier, check);
            }

            if kind == SourceKind::Spotify
                && let Some(parser) = &self.failure_parser
            {
                let failures = parser.parse(&outcome.artifact, link);
                log_failures(link, &failures);
                report.failures.extend(failures);
            }

            if !outcome.succeeded() {
                warn!(phase = %kind, link = %strip_query(link), code = outcome.exit_code, "Playlist {} failed", index + 1);
                report.exit_code = outcome.exit_code;
                report.failed_link = Some(link.clone());
                break;
            }
        }

        info!(
            phase = %kind,
            attempted = report.links_attempted,
            missing = report.missing.len(),
            code = report.exit_code,
            "🎉 {kind} phase complete"
        );
        report
    }

    async fn fetch_metadata(&self, link: &str, output_dir: &Path) -> Option<String> {
        let fetcher = self.metadata.as_ref()?;
        match fetcher.fetch(link, output_dir).await {
            Ok(name) => name,
            Err(err) => {
                warn!(error = %err, "Spotify metadata unavailable, downloading without reconciliation");
                None
            }
        }
    }
}

fn reconcile(
    kind: SourceKind,
    link: &str,
    display_name: Option<&str>,
    output_dir: &Path,
) -> Vec<PlaylistCheck> {
    let reconciler = match kind {
        SourceKind::Spotify => {
            return display_name
                .map(|name| {
                    let missing = reconcile_with_metadata(link, name, output_dir);
                    let mut playlist = PlaylistRecord::new(name, link, 0);
                    playlist.tracks = missing;
                    PlaylistCheck {
                        playlist,
                        merged: true,
                    }
                })
                .into_iter()
                .collect();
        }
        SourceKind::SoundCloud => FilesystemReconciler::for_soundcloud(),
        SourceKind::YouTube => FilesystemReconciler::for_youtube(),
    };
    match reconciler.reconcile_playlists(output_dir) {
        Ok(checks) => checks,
        Err(err) => {
            warn!(error = %err, "Reconciliation skipped");
            Vec::new()
        }
    }
}

/// Files one playlist result under the current phase.
///
/// Merged results replace whatever this run recorded before for the playlist.
/// Re-checks are dropped when an earlier phase already holds the playlist.
fn record_check(report: &mut PhaseReport, earlier: &mut [PhaseReport], check: PlaylistCheck) {
    let PlaylistCheck { playlist, merged } = check;
    if merged {
        for phase in earlier.iter_mut() {
            phase.remove_playlist(&playlist.name);
        }
    } else if let Some(holder) = earlier.iter().find(|phase| phase.holds_playlist(&playlist.name)) {
        debug!(playlist = %playlist.name, holder = %holder.kind, "already reported this run");
        return;
    }
    let name = playlist.name.clone();
    report.replace_playlist(&name, playlist.into_tracks());
}

fn log_failures(link: &str, failures: &[TrackFailure]) {
    if failures.is_empty() {
        info!("✅ No lookup errors found");
        return;
    }
    info!("🔍 {} errors found in playlist - {}", failures.len(), strip_query(link));
    for failure in failures {
        info!("  ❌ {failure}");
    }
}

fn log_summary(report: &RunReport, output_dir: &Path) {
    info!("{SEPARATOR}");
    for phase in &report.phases {
        if phase.skipped() {
            info!("{} {}: no links", phase.kind.icon(), phase.kind);
            continue;
        }
        info!(
            "{} {}: {}/{} links, {} missing, {} failed, exit {}",
            phase.kind.icon(),
            phase.kind,
            phase.links_attempted,
            phase.links_total,
            phase.missing.len(),
            phase.failures.len(),
            phase.exit_code
        );
    }
    info!(
        exit_code = report.exit_code,
        missing = report.total_missing(),
        failures = report.total_failures(),
        "🎉 Complete! Files in {}",
        output_dir.display()
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::invoker::InvocationOutcome;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Records calls and returns scripted exit codes.
    struct ScriptedDownloader {
        kind: SourceKind,
        codes: Mutex<Vec<i32>>,
        calls: std::sync::Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedDownloader {
        fn new(kind: SourceKind, codes: Vec<i32>, calls: std::sync::Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                kind,
                codes: Mutex::new(codes),
                calls,
            }
        }
    }

    #[async_trait]
    impl Downloader for ScriptedDownloader {
        fn name(&self) -> &str {
            "scripted"
        }

        fn kind(&self) -> SourceKind {
            self.kind
        }

        async fn download(&self, url: &str, _output_dir: &Path) -> InvocationOutcome {
            self.calls.lock().unwrap().push(format!("{}:{url}", self.kind));
            let mut codes = self.codes.lock().unwrap();
            let exit_code = if codes.is_empty() { 0 } else { codes.remove(0) };
            InvocationOutcome {
                exit_code,
                artifact: PathBuf::from("/nonexistent/errors.txt"),
            }
        }
    }

    fn pipeline(codes: [Vec<i32>; 3], calls: &std::sync::Arc<Mutex<Vec<String>>>) -> SyncPipeline {
        let [spotify, soundcloud, youtube] = codes;
        SyncPipeline::from_config(&SyncConfig::default())
            .with_metadata_fetcher(None)
            .with_downloader(Box::new(ScriptedDownloader::new(SourceKind::Spotify, spotify, calls.clone())))
            .with_downloader(Box::new(ScriptedDownloader::new(SourceKind::SoundCloud, soundcloud, calls.clone())))
            .with_downloader(Box::new(ScriptedDownloader::new(SourceKind::YouTube, youtube, calls.clone())))
    }

    fn links() -> LinkSet {
        parser::extract_links(
            "https://open.spotify.com/playlist/A\nhttps://soundcloud.com/u/sets/b\nhttps://youtu.be/c\nhttps://youtu.be/d\n",
        )
    }

    #[tokio::test]
    async fn test_phases_run_in_fixed_order() {
        let out = tempfile::tempdir().unwrap();
        let calls = std::sync::Arc::new(Mutex::new(Vec::new()));
        let report = pipeline([vec![], vec![], vec![]], &calls)
            .run_links(&links(), out.path())
            .await;

        assert!(report.succeeded());
        assert_eq!(
            *calls.lock().unwrap(),
            vec![
                "SoundCloud:https://soundcloud.com/u/sets/b",
                "YouTube:https://youtu.be/c",
                "YouTube:https://youtu.be/d",
                "Spotify:https://open.spotify.com/playlist/A",
            ]
        );
        let kinds: Vec<_> = report.phases.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, PHASE_ORDER.to_vec());
    }

    #[tokio::test]
    async fn test_first_failure_halts_phase_and_run() {
        let out = tempfile::tempdir().unwrap();
        let calls = std::sync::Arc::new(Mutex::new(Vec::new()));
        let report = pipeline([vec![], vec![], vec![2]], &calls)
            .run_links(&links(), out.path())
            .await;

        assert_eq!(report.exit_code, 2);
        assert_eq!(report.process_exit_code(), 2);
        assert_eq!(report.phases.len(), 2, "Spotify phase must not run");
        let youtube = report.phase(SourceKind::YouTube).unwrap();
        assert_eq!(youtube.links_attempted, 1);
        assert_eq!(youtube.failed_link.as_deref(), Some("https://youtu.be/c"));
        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_phase_succeeds_without_download() {
        let out = tempfile::tempdir().unwrap();
        let calls = std::sync::Arc::new(Mutex::new(Vec::new()));
        let report = pipeline([vec![], vec![], vec![]], &calls)
            .run_phase(SourceKind::SoundCloud, &[], out.path())
            .await;

        assert!(report.succeeded());
        assert!(report.skipped());
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_input_exits_one() {
        let out = tempfile::tempdir().unwrap();
        let calls = std::sync::Arc::new(Mutex::new(Vec::new()));
        let report = pipeline([vec![], vec![], vec![]], &calls)
            .run(&out.path().join("missing.txt"), out.path())
            .await;

        assert_eq!(report.exit_code, 1);
        assert!(report.phases.is_empty());
        assert!(calls.lock().unwrap().is_empty());
    }

    fn check(name: &str, missing: &[&str], merged: bool) -> PlaylistCheck {
        let mut playlist = PlaylistRecord::new(name, "", 3);
        for position in missing {
            playlist.push_missing(*position);
        }
        PlaylistCheck { playlist, merged }
    }

    #[test]
    fn test_recheck_skips_playlist_held_by_earlier_phase() {
        let mut soundcloud = PhaseReport::new(SourceKind::SoundCloud, 1);
        record_check(&mut soundcloud, &mut [], check("Mix", &["02", "03"], true));

        let mut earlier = [soundcloud];
        let mut youtube = PhaseReport::new(SourceKind::YouTube, 2);
        record_check(&mut youtube, &mut earlier, check("Mix", &["02", "03"], false));
        record_check(&mut youtube, &mut earlier, check("Vids", &["01"], false));
        record_check(&mut youtube, &mut earlier, check("Vids", &["01"], false));

        assert_eq!(earlier[0].missing.len(), 2);
        assert!(!youtube.holds_playlist("Mix"));
        assert_eq!(youtube.missing.len(), 1, "repeat re-checks replace each other");
    }

    #[test]
    fn test_merge_takes_playlist_from_earlier_phase() {
        let mut soundcloud = PhaseReport::new(SourceKind::SoundCloud, 1);
        record_check(&mut soundcloud, &mut [], check("Mix", &["02", "03"], false));

        let mut earlier = [soundcloud];
        let mut youtube = PhaseReport::new(SourceKind::YouTube, 1);
        record_check(&mut youtube, &mut earlier, check("Mix", &["03"], true));

        assert!(earlier[0].missing.is_empty());
        assert!(!earlier[0].holds_playlist("Mix"));
        assert_eq!(youtube.missing.len(), 1);
        assert_eq!(youtube.missing[0].list_position, "03");
    }
}
