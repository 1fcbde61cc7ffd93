use axum::{
    Router,
    routing::{get, post},
};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    api::{self, AppState},
    config::ServerConfig,
    spotify::{HttpMusicApi, MusicApi},
};

/// Builds the proxy router on top of an upstream API implementation.
pub fn router(config: ServerConfig, music_api: Arc<dyn MusicApi>) -> Router {
    let state = Arc::new(AppState {
        config,
        api: music_api,
    });

    Router::new()
        .route("/health", get(api::health))
        .route("/callback", post(api::callback))
        .route("/playlist", post(api::playlist_tracks))
        .route("/playlists", get(api::user_playlists))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `addr` and serves the proxy until the process is stopped.
pub async fn start_api_server(config: ServerConfig, addr: &str) -> crate::Res<()> {
    let addr = SocketAddr::from_str(addr)?;
    tracing::info!(%addr, credentials = ?config.credentials, "starting playlist proxy");

    let music_api = Arc::new(HttpMusicApi::from_config(&config));
    let app = router(config, music_api);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        config::Credentials,
        spotify::{MockMusicApi, UpstreamReply},
    };

    fn config(credentials: Credentials) -> ServerConfig {
        ServerConfig {
            credentials,
            api_url: "http://upstream.invalid/v1".to_string(),
            token_url: "http://upstream.invalid/api/token".to_string(),
        }
    }

    fn configured() -> ServerConfig {
        config(Credentials {
            client_id: Some("client".to_string()),
            client_secret: Some("secret".to_string()),
            redirect_uri: Some("http://localhost:3000/".to_string()),
        })
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_status_and_version_only() {
        let (status, body) = send(
            router(configured(), Arc::new(MockMusicApi::new())),
            Request::get("/health").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") })
        );
    }

    #[tokio::test]
    async fn playlist_returns_reshaped_tracks() {
        let mut api = MockMusicApi::new();
        api.expect_request_token().times(1).returning(|_, _| {
            Ok(UpstreamReply::new(StatusCode::OK, json!({ "access_token": "app" })))
        });
        api.expect_get().times(1).returning(|_, _| {
            Ok(UpstreamReply::new(
                StatusCode::OK,
                json!({ "items": [{ "track": {
                    "name": "Song",
                    "artists": [{ "name": "A" }, { "name": "B" }],
                    "album": { "images": [{ "url": "https://img/first" }, { "url": "https://img/second" }] }
                }}]}),
            ))
        });

        let (status, body) = send(
            router(configured(), Arc::new(api)),
            post_json(
                "/playlist",
                json!({ "playlistUrl": "https://open.music.example/playlist/37i9dQZF1" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "tracks": [{
                "name": "Song",
                "artists": "A, B",
                "albumCoverUrl": "https://img/first"
            }]})
        );
    }

    #[tokio::test]
    async fn playlist_rejects_invalid_url() {
        let mut api = MockMusicApi::new();
        api.expect_request_token().times(0);
        api.expect_get().times(0);

        let (status, body) = send(
            router(configured(), Arc::new(api)),
            post_json("/playlist", json!({ "playlistUrl": "not-a-url" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid Spotify playlist URL" }));
    }

    #[tokio::test]
    async fn playlist_requires_a_url() {
        let api = MockMusicApi::new();

        let (status, body) = send(
            router(configured(), Arc::new(api)),
            post_json("/playlist", json!({})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Playlist URL is required" }));
    }

    #[tokio::test]
    async fn playlist_without_credentials_is_a_server_error() {
        let mut api = MockMusicApi::new();
        api.expect_request_token().times(0);
        api.expect_get().times(0);

        let (status, body) = send(
            router(config(Credentials::default()), Arc::new(api)),
            post_json(
                "/playlist",
                json!({ "playlistUrl": "https://open.spotify.com/playlist/abc" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Spotify API credentials not set" }));
    }

    #[tokio::test]
    async fn playlists_without_authorization_is_401() {
        let mut api = MockMusicApi::new();
        api.expect_get().times(0);

        let (status, body) = send(
            router(configured(), Arc::new(api)),
            Request::get("/playlists").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Authorization header missing or invalid" }));
    }

    #[tokio::test]
    async fn playlists_forwards_the_bearer_token() {
        let mut api = MockMusicApi::new();
        api.expect_get()
            .withf(|path, bearer| path.to_string() == "/me/playlists" && bearer.to_string() == "user")
            .times(1)
            .returning(|_, _| {
                Ok(UpstreamReply::new(
                    StatusCode::OK,
                    json!({ "items": [{
                        "id": "p1",
                        "name": "Mix",
                        "images": [{ "url": "https://img/p1" }],
                        "tracks": { "total": 7 }
                    }]}),
                ))
            });

        let (status, body) = send(
            router(configured(), Arc::new(api)),
            Request::get("/playlists")
                .header(header::AUTHORIZATION, "Bearer user")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "playlists": [{
                "id": "p1",
                "name": "Mix",
                "imageUrl": "https://img/p1",
                "trackCount": 7
            }]})
        );
    }

    #[tokio::test]
    async fn callback_passes_upstream_rejection_through() {
        let mut api = MockMusicApi::new();
        api.expect_request_token().times(1).returning(|_, _| {
            Ok(UpstreamReply::new(
                StatusCode::FORBIDDEN,
                json!({ "error": "invalid_client", "error_description": "Invalid client" }),
            ))
        });

        let (status, body) = send(
            router(configured(), Arc::new(api)),
            post_json("/callback", json!({ "code": "abc" })),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            body,
            json!({
                "error": "Failed to exchange code for tokens",
                "details": { "error": "invalid_client", "error_description": "Invalid client" }
            })
        );
    }

    #[tokio::test]
    async fn callback_returns_token_pair() {
        let mut api = MockMusicApi::new();
        api.expect_request_token().times(1).returning(|_, _| {
            Ok(UpstreamReply::new(
                StatusCode::OK,
                json!({ "access_token": "at", "refresh_token": "rt", "token_type": "Bearer" }),
            ))
        });

        let (status, body) = send(
            router(configured(), Arc::new(api)),
            post_json("/callback", json!({ "code": "abc" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "accessToken": "at", "refreshToken": "rt" }));
    }

    #[tokio::test]
    async fn callback_without_code_is_400() {
        let mut api = MockMusicApi::new();
        api.expect_request_token().times(0);

        let (status, body) = send(
            router(configured(), Arc::new(api)),
            post_json("/callback", json!({})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Authorization code is missing" }));
    }

    #[tokio::test]
    async fn malformed_body_is_400() {
        let api = MockMusicApi::new();

        let request = Request::post("/callback")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(router(configured(), Arc::new(api)), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid request body" }));
    }

    #[tokio::test]
    async fn transport_failure_is_500_with_details() {
        let mut api = MockMusicApi::new();
        api.expect_get()
            .times(1)
            .returning(|_, _| Err(crate::error::ProxyError::Transport("connection refused".to_string())));

        let (status, body) = send(
            router(configured(), Arc::new(api)),
            Request::get("/playlists")
                .header(header::AUTHORIZATION, "Bearer user")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "error": "Internal Server Error", "details": "connection refused" })
        );
    }
}
