//! Metadata fetcher: persists the raw entity document and its cover art.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use serde_json::Value;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};

use super::{EntityKind, MetadataError, SpotifyClient};
use crate::config::{Credentials, SpotifyEndpoints};
use crate::layout;
use crate::model::SpotifyEntity;
use crate::parser::strip_query;

/// Stem used when a display name sanitizes to nothing.
const UNTITLED_STEM: &str = "untitled";

/// Keeps alphanumerics, spaces, `-` and `_`, then trims trailing whitespace.
///
/// Different names can sanitize to the same string; the later document wins.
///
/// # Examples
///
/// ```
/// use playlist_core::sanitize_name;
///
/// assert_eq!(sanitize_name("Road Trip: 2024!  "), "Road Trip 2024");
/// assert_eq!(sanitize_name("Café_del-Mar"), "Café_del-Mar");
/// ```
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// File stem of the persisted document and cover image for a display name.
#[must_use]
pub fn document_stem(name: &str) -> String {
    let stem = sanitize_name(name);
    if stem.is_empty() {
        UNTITLED_STEM.to_string()
    } else {
        stem
    }
}

/// Fetches Spotify entity metadata and persists it under the output root.
#[derive(Debug, Clone)]
pub struct MetadataFetcher {
    client: SpotifyClient,
}

impl MetadataFetcher {
    /// Creates a fetcher for the given endpoints and credentials.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Client`] when the HTTP client cannot be built.
    pub fn new(endpoints: SpotifyEndpoints, credentials: Credentials) -> Result<Self, MetadataError> {
        Ok(Self {
            client: SpotifyClient::new(endpoints, credentials)?,
        })
    }

    /// Fetches the entity behind `url`, writes `.metadata/<stem>.json`,
    /// best-effort downloads `.icons/<stem>.jpg`, and returns the display name.
    ///
    /// Returns `Ok(None)` when the URL names no known entity kind.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError`] for missing credentials, API failures and
    /// document write failures. Cover-art failures are logged only.
    #[tracing::instrument(skip_all, fields(url = strip_query(url)))]
    pub async fn fetch(&self, url: &str, output_dir: &Path) -> Result<Option<String>, MetadataError> {
        let Some(kind) = EntityKind::detect(url) else {
            info!("❌ Unknown Spotify link type, skipping metadata");
            return Ok(None);
        };
        let id = kind.entity_id(url).ok_or_else(|| MetadataError::InvalidUrl {
            url: url.to_string(),
        })?;

        let raw = self.client.fetch_entity(kind, &id).await?;
        let name = raw
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let stem = document_stem(&name);

        let metadata_dir = layout::metadata_dir(output_dir);
        tokio::fs::create_dir_all(&metadata_dir)
            .await
            .map_err(|e| MetadataError::io(&metadata_dir, e))?;
        let document_path = metadata_dir.join(format!("{stem}.json"));
        let json = serde_json::to_string_pretty(&raw).map_err(|e| MetadataError::decode(url, e))?;
        tokio::fs::write(&document_path, json)
            .await
            .map_err(|e| MetadataError::io(&document_path, e))?;

        // The raw document is kept even when the typed view cannot be read.
        let entity = match serde_json::from_value::<SpotifyEntity>(raw) {
            Ok(entity) => entity,
            Err(err) => {
                warn!(path = %document_path.display(), error = %err, "Metadata JSON saved but not understood, skipping cover art");
                return Ok(Some(name));
            }
        };
        info!(path = %document_path.display(), tracks = entity.listing().len(), "📄 Metadata JSON saved");

        match entity.images.first() {
            Some(image) => {
                let icon_path = layout::icons_dir(output_dir).join(format!("{stem}.jpg"));
                match self.download_cover(&image.url, &icon_path).await {
                    Ok(bytes) => info!(path = %icon_path.display(), bytes, "🖼️ Cover art saved"),
                    Err(err) => warn!(error = %err, "❌ Cover art download failed"),
                }
            }
            None => debug!("entity has no cover art"),
        }

        Ok(Some(name))
    }

    /// Streams an image to `path`, removing the partial file on failure.
    async fn download_cover(&self, image_url: &str, path: &Path) -> Result<u64, MetadataError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| MetadataError::io(parent, e))?;
        }

        let response = self
            .client
            .http()
            .get(image_url)
            .send()
            .await
            .map_err(|source| MetadataError::Request {
                url: image_url.to_string(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(MetadataError::http(image_url, status.as_u16()));
        }

        let mut file = File::create(path)
            .await
            .map_err(|e| MetadataError::io(path, e))?;
        let result = stream_to_file(&mut file, response, image_url, path).await;
        if result.is_err() {
            debug!(path = %path.display(), "cleaning up partial cover image");
            let _ = tokio::fs::remove_file(path).await;
        }
        result
    }
}

async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    path: &Path,
) -> Result<u64, MetadataError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|source| MetadataError::Request {
            url: url.to_string(),
            source,
        })?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| MetadataError::io(PathBuf::from(path), e))?;
        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| MetadataError::io(PathBuf::from(path), e))?;
    Ok(bytes_written)
}
