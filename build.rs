//! Build script for the Spotify Playlist Viewer.
//!
//! Copies the `.env.example` configuration template into the user's local data
//! directory, next to where the application looks for its `.env` file.

use std::{env, fs, path::PathBuf};

/// Installs `.env.example` into the local data directory.
///
/// # Destination
///
/// - Linux: `~/.local/share/playlist-viewer/.env.example`
/// - macOS: `~/Library/Application Support/playlist-viewer/.env.example`
/// - Windows: `%LOCALAPPDATA%/playlist-viewer/.env.example`
///
/// A missing template or a read-only data directory only produces a cargo
/// warning; the build itself never fails because of this step.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    if !env_example_path.is_file() {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
        return Ok(());
    }

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("playlist-viewer");

    let copied = fs::create_dir_all(&out_dir)
        .and_then(|_| fs::copy(&env_example_path, out_dir.join(".env.example")));
    if let Err(e) = copied {
        println!(
            "cargo:warning=could not install .env.example into {}: {}",
            out_dir.display(),
            e
        );
    }

    Ok(())
}
