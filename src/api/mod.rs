//! # API Module
//!
//! HTTP endpoints of the playlist proxy. Each handler forwards one request
//! sequence to the Spotify Web API through [`crate::spotify`], reshapes the
//! answer and returns it as JSON.
//!
//! ## Endpoints
//!
//! - `POST /callback` - [`callback`] exchanges an authorization code for an
//!   access/refresh token pair
//! - `POST /playlist` - [`playlist_tracks`] returns the tracks of a public
//!   playlist, authenticated with the app's client credentials
//! - `GET /playlists` - [`user_playlists`] returns the playlists of the user
//!   whose bearer token is in the `Authorization` header
//! - `GET /health` - [`health`] reports status and version
//!
//! ## Errors
//!
//! Handlers return [`crate::error::ProxyError`], which renders as
//! `{ "error": ..., "details": ... }` with the matching status. Upstream
//! rejections keep Spotify's status code and body.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;

use crate::{config::ServerConfig, error::ProxyError, spotify::MusicApi};

mod callback;
mod health;
mod playlist;

pub use callback::callback;
pub use health::health;
pub use playlist::{bearer_token, playlist_tracks, user_playlists};

/// State shared by all handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub api: Arc<dyn MusicApi>,
}

fn invalid_body(rejection: JsonRejection) -> ProxyError {
    tracing::debug!(%rejection, "rejected request body");
    ProxyError::Validation("Invalid request body".to_string())
}
