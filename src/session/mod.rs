//! # Session Module
//!
//! Client-side counterpart of the proxy: a small state machine that owns the
//! user's token pair, decides whether to exchange an authorization code or
//! fetch playlists, and keeps a view of what should be displayed.
//!
//! ```text
//! LoggedOut ──(code in URL)──> AwaitingCodeExchange ──ok──> LoggedIn(tokens)
//!     ^                               │ err                      │
//!     └───────────────────────────────┴──────────(logout)────────┘
//! ```
//!
//! Persistence goes through an injected [`SessionStore`] and the proxy is
//! reached through a [`SessionBackend`], so the controller runs the same way
//! against a file and a live server as against in-memory fakes.

mod client;
mod controller;
mod store;

pub use client::{ProxyClient, SessionBackend};
pub use controller::{LoginSettings, SessionController, SessionState, SessionView};
pub use store::{
    ACCESS_TOKEN_KEY, FileSessionStore, MemorySessionStore, REFRESH_TOKEN_KEY, SessionStore,
};

/// Failure to read or write the persisted token pair.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("session store lock poisoned")]
    Poisoned,
}

/// Failure of a call to the proxy. The `Display` text is what the view shows.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Failed to connect to the server.")]
    Connection(#[from] reqwest::Error),
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("Unexpected response from the server: {0}")]
    Decode(String),
    #[error("{0}")]
    Configuration(String),
}
