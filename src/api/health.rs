use std::sync::Arc;

use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::spotify::SpotifyClient;

pub async fn health(Extension(client): Extension<Arc<SpotifyClient>>) -> Json<Value> {
    let authorized = client.credentials().current_token().await.is_ok();
    Json(json!({
        "status": if authorized { "ok" } else { "degraded" },
        "authorized": authorized,
        "version": env!("CARGO_PKG_VERSION")
    }))
}
