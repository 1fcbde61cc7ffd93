use crate::{
    cli::{controller, render, spinner},
    info, warning,
};

/// Lists the playlists of the stored session's user.
pub async fn playlists() {
    let controller = controller();

    let pb = spinner("Fetching playlists...");
    let loaded = controller.load(None).await;
    pb.finish_and_clear();

    if let Err(e) = loaded {
        warning!("Cannot access stored session: {}", e);
    }

    let view = controller.view().await;
    if view.state.tokens().is_none() {
        info!("Not logged in. Run `login` first.");
        return;
    }

    render(&view);
}

/// Lists the tracks of a public playlist. Works without logging in.
pub async fn import(playlist_url: String) {
    let controller = controller();

    let pb = spinner("Importing...");
    controller.import_playlist(&playlist_url).await;
    pb.finish_and_clear();

    render(&controller.view().await);
}
