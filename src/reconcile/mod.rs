//! Expected-versus-present track reconciliation.
//!
//! Two variants share the ordinal scan in [`scan`]:
//! - [`FilesystemReconciler`] for `scdl` / `yt-dlp` runs: expected count from
//!   the merged sidecar document, sidecars folded into `.metadata/<dir>.json`.
//! - [`reconcile_with_metadata`] for `spotdl` runs: expected count from the
//!   persisted Spotify track listing, which also names the missing tracks.

mod error;
mod filesystem;
mod metadata;
pub mod scan;

pub use error::ReconcileError;
pub use filesystem::{FilesystemReconciler, PlaylistCheck};
pub use metadata::reconcile_with_metadata;
pub use scan::{TrackScan, scan_numbered_tracks};
