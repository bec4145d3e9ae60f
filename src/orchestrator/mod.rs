//! Phase sequencing and exit-code aggregation.
//!
//! A run reads the links file once, then processes SoundCloud, YouTube and
//! Spotify links in that order. Per link: (Spotify only) fetch metadata,
//! download, reconcile, and (Spotify, when enabled) parse the error log.

mod pipeline;
mod report;

pub use pipeline::{PHASE_ORDER, SyncPipeline};
pub use report::{PhaseReport, RunReport};
