use std::sync::Arc;

use crate::{config::Config, error, info, server::start_api_server, spotify::SpotifyClient};

pub async fn serve(config: &Config, dev: bool) {
    let client = match SpotifyClient::connect(config).await {
        Ok(client) => Arc::new(client),
        Err(e) => error!("Cannot authorize with Spotify. Err: {}", e),
    };

    info!("Serving on http://{}", config.server_address);
    if let Err(e) = start_api_server(config, client, dev).await {
        error!("Server stopped. Err: {}", e);
    }
}
