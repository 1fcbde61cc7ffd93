//! # Spotify Integration Module
//!
//! This module is the only place that talks to the Spotify Web API. It exposes
//! the upstream as a small [`MusicApi`] port with two calls, a form-encoded POST
//! to the token endpoint and an authenticated GET against the resource API, and
//! builds the proxy's operations on top of it.
//!
//! ```text
//! api handlers (axum)
//!          ↓
//! auth (token exchange)  /  playlists (tracks, user playlists)
//!          ↓
//! MusicApi  ──  HttpMusicApi (reqwest)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! - [`auth`] - Exchanges an authorization code or the client credentials for an
//!   access token. Every call performs a fresh exchange.
//! - [`playlists`] - Fetches a playlist's tracks or the current user's playlists
//!   and reshapes them into view models.
//!
//! ## Error Handling
//!
//! The port itself only fails on transport errors. A non-2xx answer is returned
//! as an [`UpstreamReply`] so the caller can decide which error kind it maps to.
//! Nothing is retried.

use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::Client;
use serde_json::Value;

use crate::{config::ServerConfig, error::ProxyError};

pub mod auth;
pub mod playlists;

/// Status and JSON body of an upstream answer.
///
/// Bodies that are not valid JSON are kept as a JSON string so they can still
/// be forwarded under `details`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Value,
}

impl UpstreamReply {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Port over the upstream Spotify API.
///
/// [`HttpMusicApi`] is the production implementation; tests use the generated mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MusicApi: Send + Sync {
    /// POSTs `form` to the token endpoint with the given `Authorization` header value.
    async fn request_token(
        &self,
        authorization: &str,
        form: Vec<(&'static str, String)>,
    ) -> Result<UpstreamReply, ProxyError>;

    /// GETs `path` (relative to the API base URL) with a bearer token.
    async fn get(&self, path: &str, bearer: &str) -> Result<UpstreamReply, ProxyError>;
}

/// [`MusicApi`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpMusicApi {
    client: Client,
    api_url: String,
    token_url: String,
}

impl HttpMusicApi {
    pub fn new(api_url: impl Into<String>, token_url: impl Into<String>) -> Self {
        let api_url: String = api_url.into();
        Self {
            client: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            token_url: token_url.into(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.api_url.clone(), config.token_url.clone())
    }

    async fn into_reply(response: reqwest::Response) -> Result<UpstreamReply, ProxyError> {
        let status = response.status();
        let text = response.text().await?;
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(UpstreamReply::new(status, body))
    }
}

#[async_trait]
impl MusicApi for HttpMusicApi {
    async fn request_token(
        &self,
        authorization: &str,
        form: Vec<(&'static str, String)>,
    ) -> Result<UpstreamReply, ProxyError> {
        let response = self
            .client
            .post(&self.token_url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .form(&form)
            .send()
            .await?;

        Self::into_reply(response).await
    }

    async fn get(&self, path: &str, bearer: &str) -> Result<UpstreamReply, ProxyError> {
        let response = self
            .client
            .get(format!("{}{}", self.api_url, path))
            .bearer_auth(bearer)
            .send()
            .await?;

        Self::into_reply(response).await
    }
}
