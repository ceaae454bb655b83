//! End-to-end tests of the overlay server against a mock Spotify.

use futures_util::StreamExt;
use std::time::{Duration, Instant};
use tokio_tungstenite::tungstenite::Message;

use song_overlay::http::handlers::HealthStatus;
use song_overlay::http::response::ApiResponse;
use song_overlay::playback::{TrackChange, TrackUpdate};
use song_overlay::spotify::Token;

mod common;
use common::{client, start_mock_spotify, start_overlay, test_config, MockPlayback};

fn playing_song() -> MockPlayback {
    MockPlayback::Playing {
        name: "Around the World",
        artists: vec!["Daft Punk"],
        album: "Homework",
    }
}

fn seed_token(overlay: &common::RunningOverlay) {
    overlay.state.spotify.auth().set_token(Token {
        access_token: common::MOCK_ACCESS_TOKEN.into(),
        token_type: "Bearer".into(),
        scope: String::new(),
        refresh_token: Some("mock-refresh".into()),
        expires_at: std::time::Instant::now() + Duration::from_secs(3600),
    });
}

#[tokio::test]
async fn test_health_lists_routes() {
    let mock = start_mock_spotify(MockPlayback::Nothing).await;
    let overlay = start_overlay(test_config(&mock)).await;

    let res = client()
        .get(format!("http://{}/api/health", overlay.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let health: HealthStatus = res.json().await.unwrap();
    assert_eq!(health.routes, vec!["current_song"]);
    assert!(!health.authenticated);
    assert!(health.now_playing.is_none());
}

#[tokio::test]
async fn test_root_serves_current_song_view() {
    let mock = start_mock_spotify(MockPlayback::Nothing).await;
    let overlay = start_overlay(test_config(&mock)).await;

    let res = client()
        .get(format!("http://{}/", overlay.addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));
    let body = res.text().await.unwrap();
    assert!(body.contains("<title>Current Song</title>"));
    assert!(body.contains("/api/ws/spotify-current-playing"));
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let mock = start_mock_spotify(MockPlayback::Nothing).await;
    let overlay = start_overlay(test_config(&mock)).await;

    let res = client()
        .get(format!("http://{}/settings", overlay.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    let body: ApiResponse = res.json().await.unwrap();
    assert_eq!(body.error.as_deref(), Some("not_found"));
}

#[tokio::test]
async fn test_base_url_prefix() {
    let mock = start_mock_spotify(MockPlayback::Nothing).await;
    let mut config = test_config(&mock);
    config.app.base_url = "/overlay".into();
    let overlay = start_overlay(config).await;
    let client = client();

    let inside = client
        .get(format!("http://{}/overlay/", overlay.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(inside.status(), 200);

    let outside = client
        .get(format!("http://{}/", overlay.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(outside.status(), 404);
}

#[tokio::test]
async fn test_current_playing_requires_token() {
    let mock = start_mock_spotify(playing_song()).await;
    let overlay = start_overlay(test_config(&mock)).await;

    let res = client()
        .get(format!("http://{}/api/spotify-current-playing", overlay.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);

    let body: ApiResponse = res.json().await.unwrap();
    assert_eq!(body.status, "error");
    assert_eq!(body.error.as_deref(), Some("no_token"));
}

#[tokio::test]
async fn test_login_and_callback_flow() {
    let mock = start_mock_spotify(playing_song()).await;
    let overlay = start_overlay(test_config(&mock)).await;
    let client = client();

    let login = client
        .get(format!("http://{}/api/login", overlay.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(login.status(), 302);

    let location = login.headers()["location"].to_str().unwrap().to_string();
    let location = url::Url::parse(&location).unwrap();
    assert_eq!(location.path(), "/authorize");
    let state = location
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .unwrap();

    // Missing code
    let res = client
        .get(format!("http://{}/api/spotify-callback?state={}", overlay.addr, state))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: ApiResponse = res.json().await.unwrap();
    assert_eq!(body.error.as_deref(), Some("invalid_request"));

    // Forged state
    let res = client
        .get(format!("http://{}/api/spotify-callback?state=forged&code=abc", overlay.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 500);
    let body: ApiResponse = res.json().await.unwrap();
    assert_eq!(body.error.as_deref(), Some("token_exchange_failed"));
    assert_eq!(mock.token_requests(), 0);

    let res = client
        .get(format!("http://{}/api/spotify-callback?state={}&code=abc", overlay.addr, state))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: ApiResponse = res.json().await.unwrap();
    assert_eq!(body.status, "success");
    assert_eq!(body.access_token.as_deref(), Some(common::MOCK_ACCESS_TOKEN));
    assert!(body.expires_in.unwrap() > 3500);

    let res = client
        .get(format!("http://{}/api/spotify-current-playing", overlay.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let track: TrackUpdate = res.json().await.unwrap();
    assert_eq!(track.name, "Around the World");
    assert_eq!(track.artists, vec!["Daft Punk"]);
    assert_eq!(track.album, "Homework");
    assert!(track.playing);
}

#[tokio::test]
async fn test_nothing_playing_and_upstream_errors() {
    let mock = start_mock_spotify(MockPlayback::Nothing).await;
    let overlay = start_overlay(test_config(&mock)).await;
    seed_token(&overlay);
    let client = client();
    let url = format!("http://{}/api/spotify-current-playing", overlay.addr);

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: ApiResponse = res.json().await.unwrap();
    assert_eq!(body.error.as_deref(), Some("no_track_playing"));

    mock.set_playback(MockPlayback::Status(502));
    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), 500);
    let body: ApiResponse = res.json().await.unwrap();
    assert_eq!(body.error.as_deref(), Some("track_fetch_failed"));
}

#[tokio::test]
async fn test_expired_token_is_refreshed() {
    let mock = start_mock_spotify(playing_song()).await;
    let overlay = start_overlay(test_config(&mock)).await;
    overlay.state.spotify.auth().set_token(Token {
        access_token: "stale".into(),
        token_type: "Bearer".into(),
        scope: String::new(),
        refresh_token: Some("mock-refresh".into()),
        expires_at: std::time::Instant::now() + Duration::from_secs(3600),
    });

    let res = client()
        .get(format!("http://{}/api/spotify-current-playing", overlay.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert!(mock.token_requests() >= 1);
    assert_eq!(
        overlay.state.spotify.auth().token().unwrap().access_token,
        common::MOCK_ACCESS_TOKEN
    );
}

#[tokio::test]
async fn test_feed_rejects_plain_requests() {
    let mock = start_mock_spotify(MockPlayback::Nothing).await;
    let overlay = start_overlay(test_config(&mock)).await;

    let res = client()
        .get(format!("http://{}/api/ws/spotify-current-playing", overlay.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    assert_eq!(res.text().await.unwrap(), "Not a websocket request");
}

#[tokio::test]
async fn test_feed_pushes_track_changes() {
    let mock = start_mock_spotify(playing_song()).await;
    let overlay = start_overlay(test_config(&mock)).await;

    let (mut socket, _) = tokio_tungstenite::connect_async(format!(
        "ws://{}/api/ws/spotify-current-playing",
        overlay.addr
    ))
    .await
    .unwrap();

    let first = next_change(&mut socket).await;
    assert_eq!(first.event, "track_change");
    assert!(first.track.is_none());
    assert_eq!(overlay.state.feed.client_count(), 1);

    seed_token(&overlay);

    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        assert!(Instant::now() < deadline, "no track update received");
        let change = next_change(&mut socket).await;
        if let Some(track) = change.track {
            assert_eq!(track, "Around the World");
            assert_eq!(change.artists, vec!["Daft Punk"]);
            assert_eq!(change.album.as_deref(), Some("Homework"));
            break;
        }
    }

    let health: HealthStatus = client()
        .get(format!("http://{}/api/health", overlay.addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health.now_playing.as_deref(), Some("Around the World"));

    mock.set_playback(MockPlayback::Nothing);
    let stopped = next_change(&mut socket).await;
    assert!(stopped.track.is_none());

    drop(socket);
    let deadline = Instant::now() + Duration::from_secs(2);
    while overlay.state.feed.client_count() > 0 && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(overlay.state.feed.client_count(), 0);
}

async fn next_change<S>(socket: &mut S) -> TrackChange
where
    S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let message = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("timed out waiting for feed message")
            .expect("feed closed")
            .unwrap();
        if let Message::Text(text) = message {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}
