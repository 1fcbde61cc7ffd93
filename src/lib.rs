//! Spotify Playlist Viewer Library
//!
//! This library provides a thin HTTP proxy in front of the Spotify Web API and a
//! client-side session controller that drives it. The proxy exchanges OAuth codes
//! and client credentials for access tokens, fetches playlists and playlist tracks,
//! and reshapes the upstream payloads into small view models.
//!
//! # Modules
//!
//! - `api` - HTTP handlers exposed by the proxy server
//! - `cli` - Command-line presentation of the session controller
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy shared by the proxy handlers
//! - `logging` - Tracing subscriber setup
//! - `server` - Router construction and the listening loop
//! - `session` - Client session state machine and token persistence
//! - `spotify` - Upstream Spotify API access (token exchange, playlists)
//! - `types` - Data structures and type definitions
//! - `utils` - URL helpers
//!
//! # Example
//!
//! ```
//! use playlist_viewer::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> playlist_viewer::Res<()> {
//!     config::load_env().await?;
//!     server::start_api_server(config::ServerConfig::from_env(), &config::server_addr()).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod server;
pub mod session;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the command-line glue where the concrete error type does not
/// matter beyond being printed. Library layers return their own typed errors.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Fetching playlists...");
/// info!("Found {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only used by the command-line layer for failures that leave nothing
/// sensible to do. The proxy server never calls it.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// The session view's error text is surfaced through this macro, right under
/// the output of the command that triggered it.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
