use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, header},
};

use crate::{
    api::{AppState, invalid_body},
    error::ProxyError,
    spotify::playlists::{fetch_playlist_tracks, fetch_user_playlists},
    types::{PlaylistRequest, PlaylistsResponse, TracksResponse},
};

/// `POST /playlist` - tracks of a public playlist, read with an app token.
pub async fn playlist_tracks(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PlaylistRequest>, JsonRejection>,
) -> Result<Json<TracksResponse>, ProxyError> {
    let Json(request) = payload.map_err(invalid_body)?;
    let playlist_url = request.playlist_url.unwrap_or_default();

    let tracks = fetch_playlist_tracks(
        state.api.as_ref(),
        &state.config.credentials,
        &playlist_url,
    )
    .await?;

    Ok(Json(TracksResponse { tracks }))
}

/// `GET /playlists` - playlists of the user owning the bearer token.
pub async fn user_playlists(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<PlaylistsResponse>, ProxyError> {
    let bearer = bearer_token(&headers).ok_or_else(|| {
        ProxyError::Authentication("Authorization header missing or invalid".to_string())
    })?;

    let playlists = fetch_user_playlists(state.api.as_ref(), bearer).await?;

    Ok(Json(PlaylistsResponse { playlists }))
}

/// Returns the token of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
