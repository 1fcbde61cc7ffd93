use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use playlist_viewer::{cli, config, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default())
        .placeholder(AnsiColor::BrightBlue.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the playlist proxy server
    Serve(ServeOptions),

    /// Open the Spotify login page in the browser
    Login,

    /// Resume the stored session or finish a login from the redirect URL
    Open(OpenOptions),

    /// List your playlists
    Playlists,

    /// Show the tracks of a public playlist
    Import(ImportOptions),

    /// Forget the stored tokens
    Logout,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Address to bind, e.g. 127.0.0.1:3000 (defaults to SERVER_ADDRESS)
    #[clap(long)]
    pub addr: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct OpenOptions {
    /// URL Spotify redirected to after login
    #[clap(long)]
    pub url: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ImportOptions {
    /// Playlist URL, e.g. https://open.spotify.com/playlist/<id>
    pub playlist_url: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(opt) => cli::serve(opt.addr).await,
        Command::Login => cli::login().await,
        Command::Open(opt) => cli::open(opt.url).await,
        Command::Playlists => cli::playlists().await,
        Command::Import(opt) => cli::import(opt.playlist_url).await,
        Command::Logout => cli::logout().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
