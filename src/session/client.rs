use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    session::ClientError,
    types::{
        CallbackRequest, PlaylistRequest, PlaylistSummary, PlaylistsResponse, TokenPair,
        TrackView, TracksResponse,
    },
};

/// The proxy endpoints as seen by the session controller.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    async fn exchange_code(&self, code: &str) -> Result<TokenPair, ClientError>;
    async fn user_playlists(&self, access_token: &str)
    -> Result<Vec<PlaylistSummary>, ClientError>;
    async fn playlist_tracks(&self, playlist_url: &str) -> Result<Vec<TrackView>, ClientError>;
}

#[async_trait]
impl<T: SessionBackend + ?Sized> SessionBackend for Arc<T> {
    async fn exchange_code(&self, code: &str) -> Result<TokenPair, ClientError> {
        (**self).exchange_code(code).await
    }

    async fn user_playlists(
        &self,
        access_token: &str,
    ) -> Result<Vec<PlaylistSummary>, ClientError> {
        (**self).user_playlists(access_token).await
    }

    async fn playlist_tracks(&self, playlist_url: &str) -> Result<Vec<TrackView>, ClientError> {
        (**self).playlist_tracks(playlist_url).await
    }
}

/// [`SessionBackend`] talking to a running proxy over HTTP.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ClientError::Decode(e.to_string()));
        }

        // The proxy answers `{ "error": ... }`; anything else gets a generic message.
        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("error")?.as_str().map(str::to_string))
            .unwrap_or_else(|| "An unknown error occurred".to_string());

        Err(ClientError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl SessionBackend for ProxyClient {
    async fn exchange_code(&self, code: &str) -> Result<TokenPair, ClientError> {
        let response = self
            .client
            .post(self.url("/callback"))
            .json(&CallbackRequest {
                code: Some(code.to_string()),
            })
            .send()
            .await?;

        Self::read(response).await
    }

    async fn user_playlists(
        &self,
        access_token: &str,
    ) -> Result<Vec<PlaylistSummary>, ClientError> {
        let response = self
            .client
            .get(self.url("/playlists"))
            .bearer_auth(access_token)
            .send()
            .await?;

        Ok(Self::read::<PlaylistsResponse>(response).await?.playlists)
    }

    async fn playlist_tracks(&self, playlist_url: &str) -> Result<Vec<TrackView>, ClientError> {
        let response = self
            .client
            .post(self.url("/playlist"))
            .json(&PlaylistRequest {
                playlist_url: Some(playlist_url.to_string()),
            })
            .send()
            .await?;

        Ok(Self::read::<TracksResponse>(response).await?.tracks)
    }
}
