//! Playlist Downloader Core Library
//!
//! This library provides the core functionality for the playlist downloader,
//! which turns a text file of Spotify, SoundCloud and YouTube links into a
//! reconciled per-playlist music library on disk.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`parser`] - Link extraction and source classification from input files
//! - [`invoker`] - External downloader invocation (`spotdl`, `scdl`, `yt-dlp`)
//! - [`spotify`] - Spotify Web API metadata fetcher (name, cover art, track listing)
//! - [`reconcile`] - Expected-vs-present track reconciliation and sidecar merging
//! - [`failure`] - Downloader error-log parsing into failure records
//! - [`orchestrator`] - Phase sequencing and exit-code aggregation
//! - [`model`] - Playlist/track records and on-disk document schemas
//! - [`layout`] - Output directory layout conventions
//! - [`config`] - Run configuration and credentials

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod failure;
pub mod invoker;
pub mod layout;
pub mod model;
pub mod orchestrator;
pub mod parser;
pub mod reconcile;
pub mod spotify;
mod user_agent;

// Re-export commonly used types
pub use config::{ConfigError, Credentials, PhaseTimeouts, SpotifyEndpoints, SyncConfig, ToolPaths};
pub use failure::{FailureKind, FailureLogParser, SpotdlErrorLogParser, TrackFailure};
pub use invoker::{Downloader, InvocationOutcome, InvokeError};
pub use model::{PlaylistDocument, PlaylistRecord, PlaylistRef, SpotifyEntity, TrackRecord};
pub use orchestrator::{PHASE_ORDER, PhaseReport, RunReport, SyncPipeline};
pub use parser::{Link, LinkSet, ParseError, SourceKind, extract_links, read_links};
pub use reconcile::{FilesystemReconciler, PlaylistCheck, ReconcileError, reconcile_with_metadata};
pub use spotify::{EntityKind, MetadataError, MetadataFetcher, sanitize_name};
