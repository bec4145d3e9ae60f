//! Integration tests for the Spotify metadata fetcher against a mocked Web API.

use std::path::Path;

use playlist_core::config::SpotifyEndpoints;
use playlist_core::{Credentials, MetadataError, MetadataFetcher, reconcile_with_metadata};
use serde_json::{Value, json};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

const PLAYLIST_URL: &str = "https://open.spotify.com/playlist/PL1?si=abc123";

fn endpoints(server: &MockServer) -> SpotifyEndpoints {
    SpotifyEndpoints {
        api_url: format!("{}/v1", server.uri()),
        auth_url: format!("{}/token", server.uri()),
    }
}

fn fetcher(server: &MockServer) -> MetadataFetcher {
    MetadataFetcher::new(endpoints(server), Credentials::new("id", "secret")).unwrap()
}

fn item(n: usize) -> Value {
    json!({
        "added_at": "2024-01-01T00:00:00Z",
        "track": {
            "name": format!("Song {n}"),
            "artists": [{"name": format!("Artist {n}")}, {"name": "Guest"}],
            "external_urls": {"spotify": format!("https://open.spotify.com/track/T{n}")}
        }
    })
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(header("authorization", "Basic aWQ6c2VjcmV0"))
        .and(body_string("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// Playlist "Road Trip!" with five tracks split over two listing pages.
async fn mount_paged_playlist(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/playlists/PL1"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Road Trip!",
            "images": [{"url": format!("{}/cover.jpg", server.uri()), "height": 640}],
            "tracks": {
                "items": [item(1), item(2)],
                "next": format!("{}/v1/playlists/PL1/tracks?offset=2&limit=2", server.uri()),
                "total": 5
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/playlists/PL1/tracks"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [item(3), item(4), item(5)],
            "next": null
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cover.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\xFF\xD8\xFFjpeg".to_vec()))
        .mount(server)
        .await;
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_fetch_writes_document_with_complete_listing_and_cover() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_token(&server).await;
    mount_paged_playlist(&server).await;
    let out = tempfile::tempdir().unwrap();

    let name = fetcher(&server).fetch(PLAYLIST_URL, out.path()).await.unwrap();

    assert_eq!(name.as_deref(), Some("Road Trip!"));
    let document = read_json(&out.path().join(".metadata/Road Trip.json"));
    let items = document["tracks"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 5);
    assert_eq!(items[4]["track"]["name"], "Song 5");
    assert!(document["tracks"]["next"].is_null());
    assert_eq!(
        std::fs::read(out.path().join(".icons/Road Trip.jpg")).unwrap(),
        b"\xFF\xD8\xFFjpeg"
    );
}

#[tokio::test]
async fn test_fetched_listing_names_missing_tracks() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_token(&server).await;
    mount_paged_playlist(&server).await;
    let out = tempfile::tempdir().unwrap();
    let name = fetcher(&server)
        .fetch(PLAYLIST_URL, out.path())
        .await
        .unwrap()
        .unwrap();

    let dir = out.path().join(&name);
    std::fs::create_dir_all(&dir).unwrap();
    for n in 1..=3 {
        std::fs::write(dir.join(format!("0{n} Artist {n} - Song {n}.mp3")), b"").unwrap();
    }

    let missing = reconcile_with_metadata(PLAYLIST_URL, &name, out.path());

    let positions: Vec<_> = missing.iter().map(|t| t.list_position.as_str()).collect();
    assert_eq!(positions, ["04", "05"]);
    assert_eq!(missing[0].title.as_deref(), Some("Song 4"));
    assert_eq!(missing[0].artists, ["Artist 4", "Guest"]);
    assert_eq!(
        missing[1].song_url.as_deref(),
        Some("https://open.spotify.com/track/T5")
    );
    assert_eq!(missing[1].error, "Missing 05");
    assert_eq!(missing[1].playlist.expected_count, 5);
}

#[tokio::test]
async fn test_cover_failure_does_not_fail_fetch() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/albums/AL1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Debut",
            "images": [{"url": format!("{}/missing.jpg", server.uri())}],
            "tracks": {"items": [], "next": null}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let out = tempfile::tempdir().unwrap();

    let name = fetcher(&server)
        .fetch("https://open.spotify.com/album/AL1", out.path())
        .await
        .unwrap();

    assert_eq!(name.as_deref(), Some("Debut"));
    assert!(out.path().join(".metadata/Debut.json").is_file());
    assert!(!out.path().join(".icons/Debut.jpg").exists());
}

// ==================== Partial API Payloads ====================

/// Playlist without a cover whose listing holds a song, an episode without
/// artists, and a removed track.
async fn mount_coverless_playlist(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/playlists/FRESH"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Fresh",
            "images": null,
            "tracks": {
                "items": [
                    item(1),
                    {"track": {
                        "name": "Episode 7",
                        "type": "episode",
                        "external_urls": {"spotify": "https://open.spotify.com/episode/E7"}
                    }},
                    {"added_at": "2024-01-01T00:00:00Z", "track": null}
                ],
                "next": null
            }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_null_images_still_saves_document_and_returns_name() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_token(&server).await;
    mount_coverless_playlist(&server).await;
    let out = tempfile::tempdir().unwrap();

    let name = fetcher(&server)
        .fetch("https://open.spotify.com/playlist/FRESH", out.path())
        .await
        .unwrap();

    assert_eq!(name.as_deref(), Some("Fresh"));
    let document = read_json(&out.path().join(".metadata/Fresh.json"));
    assert!(document["images"].is_null());
    assert_eq!(document["tracks"]["items"].as_array().unwrap().len(), 3);
    assert!(!out.path().join(".icons").exists());
}

#[tokio::test]
async fn test_episode_and_removed_items_reconcile_with_partial_details() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_token(&server).await;
    mount_coverless_playlist(&server).await;
    let out = tempfile::tempdir().unwrap();
    let url = "https://open.spotify.com/playlist/FRESH";
    let name = fetcher(&server).fetch(url, out.path()).await.unwrap().unwrap();

    let dir = out.path().join(&name);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("01 Artist 1 - Song 1.mp3"), b"").unwrap();

    let missing = reconcile_with_metadata(url, &name, out.path());

    assert_eq!(missing.len(), 2);
    assert_eq!(missing[0].list_position, "02");
    assert_eq!(missing[0].title.as_deref(), Some("Episode 7"));
    assert!(missing[0].artists.is_empty());
    assert_eq!(
        missing[0].song_url.as_deref(),
        Some("https://open.spotify.com/episode/E7")
    );
    assert_eq!(missing[1].list_position, "03");
    assert!(missing[1].title.is_none());
    assert_eq!(missing[1].error, "Missing 03");
}

#[tokio::test]
async fn test_unreadable_entity_shape_keeps_raw_document() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/albums/ODD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Odd",
            "images": "not-a-list",
            "tracks": {"items": [], "next": null}
        })))
        .mount(&server)
        .await;
    let out = tempfile::tempdir().unwrap();

    let name = fetcher(&server)
        .fetch("https://open.spotify.com/album/ODD", out.path())
        .await
        .unwrap();

    assert_eq!(name.as_deref(), Some("Odd"));
    assert!(out.path().join(".metadata/Odd.json").is_file());
}

// ==================== Error Paths ====================

#[tokio::test]
async fn test_entity_http_error_is_reported() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/playlists/GONE"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let out = tempfile::tempdir().unwrap();

    let err = fetcher(&server)
        .fetch("https://open.spotify.com/playlist/GONE", out.path())
        .await
        .unwrap_err();

    assert!(matches!(err, MetadataError::Http { status: 404, .. }), "{err}");
    assert!(!out.path().join(".metadata").exists());
}

#[tokio::test]
async fn test_rejected_token_is_reported() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let out = tempfile::tempdir().unwrap();

    let err = fetcher(&server)
        .fetch("https://open.spotify.com/playlist/PL1", out.path())
        .await
        .unwrap_err();

    assert!(matches!(err, MetadataError::Http { status: 401, .. }), "{err}");
}

#[tokio::test]
async fn test_missing_credentials_fail_before_any_request() {
    let out = tempfile::tempdir().unwrap();
    let fetcher = MetadataFetcher::new(SpotifyEndpoints::default(), Credentials::default()).unwrap();

    let err = fetcher
        .fetch("https://open.spotify.com/playlist/PL1", out.path())
        .await
        .unwrap_err();

    assert!(matches!(err, MetadataError::MissingCredentials));
}

#[tokio::test]
async fn test_unknown_link_type_is_skipped() {
    let out = tempfile::tempdir().unwrap();
    let fetcher = MetadataFetcher::new(SpotifyEndpoints::default(), Credentials::default()).unwrap();

    let name = fetcher
        .fetch("https://open.spotify.com/show/SHOW1", out.path())
        .await
        .unwrap();

    assert!(name.is_none());
}
