use axum::http::StatusCode;
use serde::de::DeserializeOwned;

use crate::{
    config::Credentials,
    error::ProxyError,
    spotify::{
        MusicApi, UpstreamReply,
        auth::{TokenGrant, exchange_token},
    },
    types::{
        GetUserPlaylistsResponse, Playlist, PlaylistSummary, PlaylistTracksResponse, Track,
        TrackView,
    },
    utils,
};

impl TrackView {
    /// Reshapes an upstream track: artist names joined with `", "`, cover taken
    /// from the first album image.
    pub fn from_track(track: &Track) -> Self {
        TrackView {
            name: track.name.clone(),
            artists: track
                .artists
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            album_cover_url: track.album.images.first().map(|i| i.url.clone()),
        }
    }
}

impl PlaylistSummary {
    pub fn from_playlist(playlist: &Playlist) -> Self {
        PlaylistSummary {
            id: playlist.id.clone(),
            name: playlist.name.clone(),
            image_url: playlist
                .images
                .as_ref()
                .and_then(|images| images.first())
                .map(|i| i.url.clone()),
            track_count: playlist.tracks.as_ref().map_or(0, |t| t.total),
        }
    }
}

/// Maps a tracks page to views, skipping unavailable (null) tracks.
pub fn track_views(page: &PlaylistTracksResponse) -> Vec<TrackView> {
    page.items
        .iter()
        .filter_map(|item| item.track.as_ref())
        .map(TrackView::from_track)
        .collect()
}

/// Maps a playlists page to summaries, skipping null entries.
pub fn playlist_summaries(page: &GetUserPlaylistsResponse) -> Vec<PlaylistSummary> {
    page.items
        .iter()
        .flatten()
        .map(PlaylistSummary::from_playlist)
        .collect()
}

/// Fetches the tracks of a public playlist.
///
/// The playlist id is taken from the `/playlist/{id}` segment of `playlist_url`.
/// An app-level token is obtained with a fresh client-credentials exchange
/// before the tracks endpoint is called; nothing is cached between calls.
///
/// # Errors
///
/// - [`ProxyError::Validation`] - the URL is empty or has no playlist segment
/// - [`ProxyError::Configuration`] - client credentials are not configured
/// - [`ProxyError::UpstreamAuth`] - the client-credentials exchange was rejected
/// - [`ProxyError::UpstreamResource`] - the tracks endpoint answered non-2xx
/// - [`ProxyError::Transport`] - Spotify could not be reached
pub async fn fetch_playlist_tracks(
    api: &dyn MusicApi,
    credentials: &Credentials,
    playlist_url: &str,
) -> Result<Vec<TrackView>, ProxyError> {
    if playlist_url.trim().is_empty() {
        return Err(ProxyError::Validation("Playlist URL is required".to_string()));
    }

    let Some(playlist_id) = utils::playlist_id_from_url(playlist_url) else {
        return Err(ProxyError::Validation(
            "Invalid Spotify playlist URL".to_string(),
        ));
    };

    let token = exchange_token(api, credentials, TokenGrant::ClientCredentials).await?;

    let reply = api
        .get(&format!("/playlists/{playlist_id}/tracks"), &token.access_token)
        .await?;
    let page: PlaylistTracksResponse = parse_resource(reply, "Failed to fetch playlist tracks")?;

    tracing::debug!(%playlist_id, items = page.items.len(), "fetched playlist tracks");
    Ok(track_views(&page))
}

/// Fetches the playlists of the user owning `bearer`.
///
/// # Errors
///
/// - [`ProxyError::UpstreamResource`] - the playlists endpoint answered non-2xx,
///   which includes an expired or revoked token
/// - [`ProxyError::Transport`] - Spotify could not be reached
pub async fn fetch_user_playlists(
    api: &dyn MusicApi,
    bearer: &str,
) -> Result<Vec<PlaylistSummary>, ProxyError> {
    let reply = api.get("/me/playlists", bearer).await?;
    let page: GetUserPlaylistsResponse = parse_resource(reply, "Failed to fetch user playlists")?;

    Ok(playlist_summaries(&page))
}

fn parse_resource<T: DeserializeOwned>(
    reply: UpstreamReply,
    failure: &str,
) -> Result<T, ProxyError> {
    if !reply.is_success() {
        return Err(ProxyError::UpstreamResource {
            message: failure.to_string(),
            status: reply.status,
            details: reply.body,
        });
    }

    serde_json::from_value(reply.body.clone()).map_err(|e| {
        tracing::warn!(error = %e, "unexpected upstream payload");
        ProxyError::UpstreamResource {
            message: failure.to_string(),
            status: StatusCode::BAD_GATEWAY,
            details: reply.body,
        }
    })
}
