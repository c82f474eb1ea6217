//! # Spotify Integration Module
//!
//! This module implements the search pipeline of the proxy on top of the
//! Spotify Web API. It authenticates with the client credentials flow, builds
//! upstream search requests, fans out over result pages and reshapes the
//! merged results before they are handed to the HTTP layer or the CLI.
//!
//! ## Architecture
//!
//! ```text
//! Inbound request (api handler, CLI)
//!          ↓
//! SpotifyClient
//!     ├── CredentialManager (refresh once per request)
//!     ├── query      (request building)
//!     ├── transport  (single attempt per request, JSON decode)
//!     ├── pagination (plan + concurrent fan-out + merge)
//!     └── postprocess (exact genre filter, popularity sort)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Pagination
//!
//! The search endpoint serves at most 50 items per page and refuses offsets
//! past 1000. The first page is fetched on its own; its `total` decides how
//! many of the remaining 19 pages are requested, all of them at once.
//! Failing pages are dropped and counted, the first page failing fails the
//! search.
//!
//! ## API Coverage
//!
//! - `GET /search?type=artist` - Artist search, also used for genre searches
//! - `GET /search?type=track` - Track search
//! - `GET /artists/{id}` - Single artist
//! - `GET /tracks/{id}` - Single track
//! - `POST /api/token` - Client credentials exchange
//!
//! ## Thread Safety
//!
//! [`SpotifyClient`] is shared behind an `Arc` by every request handler. The
//! only mutable state is the bearer token, guarded inside the
//! [`CredentialManager`].

pub mod pagination;
pub mod postprocess;
pub mod query;
pub mod transport;

use std::sync::Arc;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::{
    config::Config,
    error::Result,
    management::CredentialManager,
    types::{Artist, Page, SearchEnvelope, SearchResults, Track},
    utils,
};

use pagination::{FetchOutcome, fetch_all};
use postprocess::{Ranked, filter_exact, promote_tag, sort_by_popularity_desc};
use query::{SearchKind, build_request};
use transport::{UpstreamPages, send};

/// Search service wrapping the HTTP client and the credentials.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    credentials: CredentialManager,
}

impl SpotifyClient {
    /// Creates the client without talking to upstream.
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        let credentials = CredentialManager::new(
            http.clone(),
            config.token_url.clone(),
            config.client_id.clone(),
            config.client_secret.clone(),
        )?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Creates the client and authorizes right away.
    ///
    /// Fails when the credentials are rejected, so a process never starts
    /// serving without a valid token.
    pub async fn connect(config: &Config) -> Result<Self> {
        let client = Self::new(config)?;
        client.credentials.authorize().await?;
        Ok(client)
    }

    /// The credential manager holding the bearer token.
    pub fn credentials(&self) -> &CredentialManager {
        &self.credentials
    }

    /// Searches artists tagged with a genre.
    ///
    /// Runs a `genre:<term>` artist search over every available page, then
    /// reshapes the merged artists. Without `partial` only artists listing
    /// the genre verbatim are kept. Either way the matching genre is moved to
    /// the front of each artist's genre list.
    ///
    /// # Arguments
    ///
    /// * `raw` - Genre as typed by the caller, e.g. `"  Soft Rock "`
    /// * `partial` - Keep every artist upstream matched, not just exact tags
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing:
    /// - `Ok(SearchResults<Artist>)` - Artists sorted by popularity, most popular first
    /// - `Err(SearchError::Query)` - The genre is empty after formatting
    /// - `Err(SearchError)` - Authorization or the first upstream page failed
    ///
    /// # Example
    ///
    /// ```
    /// let results = client.search_genre("soft rock", false).await?;
    /// for artist in results.items.iter().take(10) {
    ///     println!("{} ({})", artist.name, artist.popularity);
    /// }
    /// ```
    pub async fn search_genre(&self, raw: &str, partial: bool) -> Result<SearchResults<Artist>> {
        let query = utils::format_query_string(raw)?;
        let outcome = self.search::<Artist>(&query.term, SearchKind::Genre).await?;

        let mut items = if partial {
            outcome.items
        } else {
            filter_exact(&query.tag, outcome.items)
        };
        promote_tag(&query.tag, &mut items);

        Ok(finish(items, outcome.total, outcome.failed_pages))
    }

    /// Searches artists by name.
    ///
    /// Same pipeline as [`SpotifyClient::search_genre`] with an
    /// `artist:<term>` query and no tag filtering.
    ///
    /// # Returns
    ///
    /// - `Ok(SearchResults<Artist>)` - Up to 1000 artists sorted by popularity
    /// - `Err(SearchError)` - Invalid query, authorization or first page failure
    pub async fn search_artists(&self, raw: &str) -> Result<SearchResults<Artist>> {
        let query = utils::format_query_string(raw)?;
        let outcome = self.search::<Artist>(&query.term, SearchKind::Artist).await?;
        Ok(finish(outcome.items, outcome.total, outcome.failed_pages))
    }

    /// Searches tracks by title with a `track:<term>` query.
    ///
    /// # Example
    ///
    /// ```
    /// let results = client.search_tracks("hey jude").await?;
    /// println!("{} of {} tracks", results.length, results.total);
    /// ```
    pub async fn search_tracks(&self, raw: &str) -> Result<SearchResults<Track>> {
        let query = utils::format_query_string(raw)?;
        let outcome = self.search::<Track>(&query.term, SearchKind::Track).await?;
        Ok(finish(outcome.items, outcome.total, outcome.failed_pages))
    }

    /// Fetches one artist by Spotify id.
    ///
    /// # Arguments
    ///
    /// * `raw_id` - Catalog id, surrounding whitespace is ignored
    ///
    /// # Returns
    ///
    /// - `Ok(Artist)` - The artist
    /// - `Err(SearchError::Query)` - The id is empty or not alphanumeric
    /// - `Err(SearchError::NotFound)` - Upstream knows no such artist
    pub async fn artist_by_id(&self, raw_id: &str) -> Result<Artist> {
        self.lookup(raw_id, SearchKind::ArtistById).await
    }

    /// Fetches one track by Spotify id, see [`SpotifyClient::artist_by_id`].
    pub async fn track_by_id(&self, raw_id: &str) -> Result<Track> {
        self.lookup(raw_id, SearchKind::TrackById).await
    }

    /// Runs one list search: first page, then fan-out over the rest.
    async fn search<T>(&self, term: &str, kind: SearchKind) -> Result<FetchOutcome<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let token = self.credentials.valid_token().await?;

        let request = build_request(&self.http, &self.api_url, &token, term, kind, 0)?;
        let first: SearchEnvelope<T> = send(&self.http, request).await?;
        let first_page: Page<T> = first.page;

        let source = Arc::new(UpstreamPages::new(
            self.http.clone(),
            self.api_url.clone(),
            token,
            term,
            kind,
        ));
        let outcome = fetch_all(source, first_page).await;

        info!(
            kind = kind.item_type(),
            term,
            merged = outcome.items.len(),
            total = outcome.total,
            failed_pages = outcome.failed_pages,
            "search complete"
        );
        Ok(outcome)
    }

    async fn lookup<T: DeserializeOwned>(&self, raw_id: &str, kind: SearchKind) -> Result<T> {
        let id = utils::normalize_id(raw_id)?;
        let token = self.credentials.valid_token().await?;
        let request = build_request(&self.http, &self.api_url, &token, &id, kind, 0)?;
        send(&self.http, request).await
    }
}

fn finish<T: Ranked>(items: Vec<T>, total: u32, failed_pages: usize) -> SearchResults<T> {
    let items = sort_by_popularity_desc(items);
    SearchResults {
        total,
        length: items.len(),
        failed_pages,
        items,
    }
}
