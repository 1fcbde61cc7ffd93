//! Configuration management for the Spotify Playlist Viewer.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage the Spotify
//! credentials, upstream endpoints and server settings.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the current working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)
//!
//! The server-side credentials are read exactly once into a [`ServerConfig`] when the
//! proxy starts. Missing credentials do not stop the server; each request that needs
//! them reports a configuration error instead.

use std::{env, fmt, path::PathBuf};

/// Scopes requested by the browser-side login redirect.
pub const LOGIN_SCOPES: &[&str] = &["playlist-read-private", "playlist-read-collaborative"];

const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:3000";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_API_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_AUTH_URL: &str = "https://accounts.spotify.com/authorize";

/// Loads environment variables from `.env` files.
///
/// A `.env` in the working directory is loaded first, then the one located in the
/// platform-specific local data directory under `playlist-viewer/.env`. Values that
/// are already present in the process environment are never overwritten, so the
/// first source to define a variable wins.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/playlist-viewer/.env`
/// - macOS: `~/Library/Application Support/playlist-viewer/.env`
/// - Windows: `%LOCALAPPDATA%/playlist-viewer/.env`
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or if an existing
/// `.env` file cannot be parsed. A missing file is not an error.
pub async fn load_env() -> Result<(), String> {
    if let Err(e) = dotenv::dotenv() {
        if !e.not_found() {
            return Err(e.to_string());
        }
    }

    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    match dotenv::from_path(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}

/// Returns the directory where the application keeps its local files.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("playlist-viewer");
    path
}

/// Returns the address the proxy server binds to.
///
/// Reads `SERVER_ADDRESS`, defaulting to `127.0.0.1:3000`.
pub fn server_addr() -> String {
    var("SERVER_ADDRESS").unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string())
}

/// Returns the base URL the client-side commands use to reach the proxy.
///
/// Reads `PROXY_URL`, defaulting to `http://` followed by [`server_addr`].
pub fn proxy_url() -> String {
    var("PROXY_URL").unwrap_or_else(|| format!("http://{}", server_addr()))
}

/// Returns the Spotify Web API base URL (`SPOTIFY_API_URL`).
pub fn spotify_apiurl() -> String {
    var("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Returns the Spotify OAuth token exchange URL (`SPOTIFY_API_TOKEN_URL`).
pub fn spotify_apitoken_url() -> String {
    var("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|| DEFAULT_API_TOKEN_URL.to_string())
}

/// Returns the Spotify OAuth authorization URL (`SPOTIFY_API_AUTH_URL`).
///
/// This is where the login action navigates the browser to.
pub fn spotify_apiauth_url() -> String {
    var("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_API_AUTH_URL.to_string())
}

/// Returns the public client id used by the browser-side login redirect.
///
/// Reads `SPOTIFY_PUBLIC_CLIENT_ID` and falls back to `SPOTIFY_CLIENT_ID`, which
/// holds the same identifier in most setups. The client secret is never part of
/// the public pair.
pub fn public_client_id() -> Option<String> {
    var("SPOTIFY_PUBLIC_CLIENT_ID").or_else(|| var("SPOTIFY_CLIENT_ID"))
}

/// Returns the public redirect URI used by the browser-side login redirect.
///
/// Reads `SPOTIFY_PUBLIC_REDIRECT_URI` and falls back to `SPOTIFY_REDIRECT_URI`.
pub fn public_redirect_uri() -> Option<String> {
    var("SPOTIFY_PUBLIC_REDIRECT_URI").or_else(|| var("SPOTIFY_REDIRECT_URI"))
}

/// Reads an environment variable, treating an empty value as unset.
fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

/// The server-side credential set used for token exchange.
///
/// Every field is optional at load time. Operations that need a field check for it
/// and fail with a configuration error. The secret is redacted from `Debug` output.
#[derive(Clone, Default)]
pub struct Credentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
}

impl Credentials {
    /// Reads `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET` and `SPOTIFY_REDIRECT_URI`.
    pub fn from_env() -> Self {
        Self {
            client_id: var("SPOTIFY_CLIENT_ID"),
            client_secret: var("SPOTIFY_CLIENT_SECRET"),
            redirect_uri: var("SPOTIFY_REDIRECT_URI"),
        }
    }

    /// Returns the id/secret pair when both are configured.
    pub fn client_pair(&self) -> Option<(&str, &str)> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => Some((id, secret)),
            _ => None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

/// Process-wide configuration of the proxy server, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub credentials: Credentials,
    pub api_url: String,
    pub token_url: String,
}

impl ServerConfig {
    /// Builds the configuration from the current environment.
    pub fn from_env() -> Self {
        Self {
            credentials: Credentials::from_env(),
            api_url: spotify_apiurl(),
            token_url: spotify_apitoken_url(),
        }
    }
}
