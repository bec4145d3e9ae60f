//! Output directory layout shared by the invokers, fetcher and reconcilers.
//!
//! ```text
//! <output_dir>/<playlist>/<NN> <artist> - <title>.<ext>
//! <output_dir>/.metadata/<playlist>.json
//! <output_dir>/.metadata/<playlist>.txt
//! <output_dir>/.icons/<entity>.jpg
//! <output_dir>/.errors/<kind>-<timestamp>.txt
//! <output_dir>/spotdl.log
//! ```

use std::path::{Path, PathBuf};

/// Directory holding per-playlist JSON documents and descriptions.
pub const METADATA_DIR: &str = ".metadata";

/// Directory holding downloaded cover art.
pub const ICONS_DIR: &str = ".icons";

/// Directory holding per-invocation error/log artifacts.
pub const ERRORS_DIR: &str = ".errors";

/// Combined run log written next to the downloaded playlists.
pub const LOG_FILE_NAME: &str = "spotdl.log";

/// Suffix of the per-track / per-playlist sidecar files written by `yt-dlp`.
pub const SIDECAR_SUFFIX: &str = ".info.json";

/// Suffix of the playlist description file written by `yt-dlp`.
pub const DESCRIPTION_SUFFIX: &str = ".description";

#[must_use]
pub fn metadata_dir(output_dir: &Path) -> PathBuf {
    output_dir.join(METADATA_DIR)
}

#[must_use]
pub fn icons_dir(output_dir: &Path) -> PathBuf {
    output_dir.join(ICONS_DIR)
}

#[must_use]
pub fn errors_dir(output_dir: &Path) -> PathBuf {
    output_dir.join(ERRORS_DIR)
}

#[must_use]
pub fn log_file_path(output_dir: &Path) -> PathBuf {
    output_dir.join(LOG_FILE_NAME)
}

/// Canonical per-playlist document path: `<output_dir>/.metadata/<name>.json`.
#[must_use]
pub fn playlist_document_path(output_dir: &Path, playlist_name: &str) -> PathBuf {
    metadata_dir(output_dir).join(format!("{playlist_name}.json"))
}

/// Returns true when `path` names a sidecar metadata file (`*.info.json`).
#[must_use]
pub fn is_sidecar_file(path: &Path) -> bool {
    path.is_file()
        && path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(SIDECAR_SUFFIX))
}
