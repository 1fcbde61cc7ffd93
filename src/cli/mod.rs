//! # CLI Module
//!
//! Terminal presentation of the playlist viewer. Every command builds a
//! [`SessionController`] over the file-backed session store and the proxy
//! client, triggers one action and renders the resulting view: lists as
//! tables, the loading state as a spinner and the view error as a warning
//! right under the command's output.
//!
//! ## Commands
//!
//! - `serve` - run the proxy server ([`serve`])
//! - `login` - open the Spotify authorize page in the browser ([`login`])
//! - `open [--url URL]` - page load: resume the stored session, or exchange the
//!   code carried by the redirect URL, then list playlists ([`open`])
//! - `playlists` - list the logged-in user's playlists ([`playlists`])
//! - `import URL` - list the tracks of a public playlist ([`import`])
//! - `logout` - forget the stored tokens ([`logout`])

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    config,
    session::{FileSessionStore, LoginSettings, ProxyClient, SessionController, SessionView},
    types::{PlaylistTableRow, TrackTableRow},
    warning,
};

mod auth;
mod playlist;
mod serve;

pub use auth::{login, logout, open};
pub use playlist::{import, playlists};
pub use serve::serve;

type Controller = SessionController<FileSessionStore, ProxyClient>;

fn controller() -> Controller {
    SessionController::new(
        FileSessionStore::default(),
        ProxyClient::new(config::proxy_url()),
        LoginSettings::from_env(),
    )
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

/// Prints whatever the view currently holds.
fn render(view: &SessionView) {
    if let Some(playlists) = &view.playlists {
        if playlists.is_empty() {
            warning!("No playlists found.");
        } else {
            let rows: Vec<PlaylistTableRow> = playlists
                .iter()
                .map(|p| PlaylistTableRow {
                    name: p.name.clone(),
                    tracks: p.track_count,
                    id: p.id.clone(),
                })
                .collect();
            println!("Your playlists:\n{}", Table::new(rows));
        }
    }

    if let Some(tracks) = &view.tracks {
        if tracks.is_empty() {
            warning!("The playlist has no tracks.");
        } else {
            let rows: Vec<TrackTableRow> = tracks
                .iter()
                .map(|t| TrackTableRow {
                    name: t.name.clone(),
                    artists: t.artists.clone(),
                    cover: t.album_cover_url.clone().unwrap_or_default(),
                })
                .collect();
            println!("Imported tracks:\n{}", Table::new(rows));
        }
    }

    if let Some(error) = &view.error {
        warning!("{}", error);
    }
}
