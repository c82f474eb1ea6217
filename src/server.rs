use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header::ACCESS_CONTROL_ALLOW_ORIGIN},
    routing::get,
};
use tower_http::{
    LatencyUnit,
    cors::CorsLayer,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info};

use crate::{Res, api, config::Config, spotify::SpotifyClient};

/// CORS headers added to every response.
#[derive(Clone)]
pub struct CorsPolicy {
    pub allowed_origin: HeaderValue,
    /// Answer `OPTIONS` preflight requests (dev mode)
    pub preflight: bool,
}

/// Builds the proxy router around a shared client.
///
/// Every response carries `Access-Control-Allow-Origin`. With
/// `cors.preflight` set, `OPTIONS` requests are answered by the CORS layer
/// and never reach a handler; otherwise they get `405`.
pub fn router(client: Arc<SpotifyClient>, cors: CorsPolicy) -> Router {
    let routes = Router::new()
        .route("/health", get(api::health))
        .route("/search/genre", get(api::search::genre))
        .route("/search/artist", get(api::search::artist))
        .route("/search/artist/{id}", get(api::search::artist_by_id))
        .route("/search/track", get(api::search::track))
        .route("/search/track/{id}", get(api::search::track_by_id))
        .layer(Extension(client));

    let routes = if cors.preflight {
        routes.layer(
            CorsLayer::new()
                .allow_origin(cors.allowed_origin)
                .allow_methods([Method::GET, Method::OPTIONS]),
        )
    } else {
        routes.layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            cors.allowed_origin,
        ))
    };

    routes.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

pub async fn start_api_server(config: &Config, client: Arc<SpotifyClient>, dev: bool) -> Res<()> {
    let addr = SocketAddr::from_str(&config.server_address)
        .map_err(|e| format!("invalid server address {:?}: {}", config.server_address, e))?;
    let cors = CorsPolicy {
        allowed_origin: HeaderValue::from_str(&config.allowed_origin)?,
        preflight: dev,
    };

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, dev, "server listening");
    axum::serve(listener, router(client, cors)).await?;
    Ok(())
}
