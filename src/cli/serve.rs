use crate::{config, error, info, logging, server, warning};

/// Runs the proxy server in the foreground.
pub async fn serve(addr: Option<String>) {
    if let Err(e) = logging::init_tracing("info") {
        error!("Cannot initialise logging: {}", e);
    }

    let addr = addr.unwrap_or_else(config::server_addr);
    let server_config = config::ServerConfig::from_env();
    if server_config.credentials.client_pair().is_none() {
        warning!("SPOTIFY_CLIENT_ID / SPOTIFY_CLIENT_SECRET not set; token exchange will fail.");
    }

    info!("Serving playlist proxy on http://{}", addr);
    if let Err(e) = server::start_api_server(server_config, &addr).await {
        error!("Proxy server stopped: {}", e);
    }
}
