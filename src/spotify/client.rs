//! Minimal Spotify Web API client: client-credentials token plus entity lookup.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{EntityKind, MetadataError};
use crate::config::{Credentials, SpotifyEndpoints};
use crate::user_agent;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 30;

/// Upper bound on followed `tracks.next` pages (100 items each for playlists).
pub const MAX_LISTING_PAGES: usize = 500;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Spotify Web API client.
#[derive(Clone)]
pub struct SpotifyClient {
    client: Client,
    endpoints: SpotifyEndpoints,
    credentials: Credentials,
}

impl std::fmt::Debug for SpotifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyClient")
            .field("endpoints", &self.endpoints)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl SpotifyClient {
    /// Creates a client for the given endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Client`] when the HTTP client cannot be built.
    pub fn new(endpoints: SpotifyEndpoints, credentials: Credentials) -> Result<Self, MetadataError> {
        let client = Client::builder()
            .user_agent(user_agent::default_metadata_user_agent())
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .build()
            .map_err(MetadataError::Client)?;
        Ok(Self {
            client,
            endpoints,
            credentials,
        })
    }

    /// Underlying HTTP client, shared with the cover-art download.
    #[must_use]
    pub fn http(&self) -> &Client {
        &self.client
    }

    /// Requests an access token with the client-credentials flow.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::MissingCredentials`] before any request when
    /// credentials are absent, otherwise request/HTTP/decode errors.
    pub async fn access_token(&self) -> Result<String, MetadataError> {
        let (id, secret) = self
            .credentials
            .pair()
            .ok_or(MetadataError::MissingCredentials)?;
        let url = &self.endpoints.auth_url;

        debug!(auth_url = %url, "Requesting Spotify access token");
        let response = self
            .client
            .post(url)
            .basic_auth(id, Some(secret))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(format!(
                "grant_type={}",
                urlencoding::encode("client_credentials")
            ))
            .send()
            .await
            .map_err(|source| MetadataError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MetadataError::http(url, status.as_u16()));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| MetadataError::decode(url, e))?;
        Ok(token.access_token)
    }

    /// Fetches the raw entity document; for albums and playlists every
    /// `tracks.next` page is followed and appended to `tracks.items`.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError`] on any auth, request, HTTP or decode failure.
    #[tracing::instrument(skip_all, fields(kind = %kind, id = %id))]
    pub async fn fetch_entity(&self, kind: EntityKind, id: &str) -> Result<Value, MetadataError> {
        let token = self.access_token().await?;
        let url = format!(
            "{}/{}/{}",
            self.endpoints.api_url.trim_end_matches('/'),
            kind.collection(),
            urlencoding::encode(id)
        );

        let mut document = self.get_json(&url, &token).await?;
        if !document.is_object() {
            return Err(MetadataError::decode(&url, "entity is not a JSON object"));
        }
        if kind.has_track_listing() {
            self.complete_listing(&url, &mut document, &token).await?;
        }
        Ok(document)
    }

    async fn complete_listing(
        &self,
        entity_url: &str,
        document: &mut Value,
        token: &str,
    ) -> Result<(), MetadataError> {
        let Some(tracks) = document.get_mut("tracks").and_then(Value::as_object_mut) else {
            return Ok(());
        };

        let mut pages = 0;
        while let Some(next) = tracks.get("next").and_then(Value::as_str).map(str::to_string) {
            pages += 1;
            if pages > MAX_LISTING_PAGES {
                return Err(MetadataError::TooManyPages {
                    url: entity_url.to_string(),
                    pages: MAX_LISTING_PAGES,
                });
            }

            debug!(page = pages, next = %next, "Following track listing page");
            let page = self.get_json(&next, token).await?;
            let items = page
                .get("items")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();

            match tracks.get_mut("items").and_then(Value::as_array_mut) {
                Some(existing) => existing.extend(items),
                None => {
                    tracks.insert("items".to_string(), Value::Array(items));
                }
            }
            tracks.insert(
                "next".to_string(),
                page.get("next").cloned().unwrap_or(Value::Null),
            );
        }
        Ok(())
    }

    async fn get_json(&self, url: &str, token: &str) -> Result<Value, MetadataError> {
        debug!(api_url = %url, "Calling Spotify API");
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|source| MetadataError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MetadataError::http(url, status.as_u16()));
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| MetadataError::decode(url, e))
    }
}
