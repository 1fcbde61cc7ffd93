use crate::{
    cli::{controller, render, spinner},
    error, info,
    session::SessionState,
    success, warning,
};

/// Opens the Spotify authorize page. Spotify redirects back to the configured
/// redirect URI with a `code`, which `open --url` then exchanges.
pub async fn login() {
    let url = match controller().login_url() {
        Ok(url) => url,
        Err(e) => error!("Cannot build login URL: {}", e),
    };

    if webbrowser::open(&url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            url
        );
    } else {
        info!("Continue the login in your browser.");
    }
    info!("Afterwards run `open --url <redirected URL>`.");
}

/// Page load: resumes the stored session or exchanges the code in `url`.
pub async fn open(url: Option<String>) {
    let controller = controller();

    let pb = spinner("Loading session...");
    let loaded = controller.load(url.as_deref()).await;
    pb.finish_and_clear();

    if let Err(e) = loaded {
        warning!("Cannot access stored session: {}", e);
    }

    let view = controller.view().await;
    match &view.state {
        SessionState::LoggedIn(_) => success!("Logged in."),
        _ => info!("Logged out. Run `login` to connect your Spotify account."),
    }
    if let (Some(original), Some(stripped)) = (url, controller.current_url().await) {
        if original != stripped {
            info!("Continue at {}", stripped);
        }
    }

    render(&view);
}

pub async fn logout() {
    match controller().logout().await {
        Ok(()) => success!("Logged out."),
        Err(e) => error!("Failed to clear stored session: {}", e),
    }
}
