use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query},
};
use serde::Deserialize;

use crate::{
    error::SearchError,
    spotify::SpotifyClient,
    types::{Artist, SearchResults, Track},
};

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub partial: Option<String>,
}

impl SearchParams {
    fn is_partial(&self) -> bool {
        self.partial.as_deref() == Some("true")
    }
}

pub async fn genre(
    Extension(client): Extension<Arc<SpotifyClient>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults<Artist>>, SearchError> {
    let results = client.search_genre(&params.q, params.is_partial()).await?;
    Ok(Json(results))
}

pub async fn artist(
    Extension(client): Extension<Arc<SpotifyClient>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults<Artist>>, SearchError> {
    Ok(Json(client.search_artists(&params.q).await?))
}

pub async fn artist_by_id(
    Extension(client): Extension<Arc<SpotifyClient>>,
    Path(id): Path<String>,
) -> Result<Json<Artist>, SearchError> {
    Ok(Json(client.artist_by_id(&id).await?))
}

pub async fn track(
    Extension(client): Extension<Arc<SpotifyClient>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults<Track>>, SearchError> {
    Ok(Json(client.search_tracks(&params.q).await?))
}

pub async fn track_by_id(
    Extension(client): Extension<Arc<SpotifyClient>>,
    Path(id): Path<String>,
) -> Result<Json<Track>, SearchError> {
    Ok(Json(client.track_by_id(&id).await?))
}
