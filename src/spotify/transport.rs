use async_trait::async_trait;
use reqwest::{Client, Request, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    error::{Result, SearchError},
    spotify::{
        pagination::PageSource,
        query::{SearchKind, build_request},
    },
    types::{Page, SearchEnvelope},
};

/// Sends one upstream request and decodes its JSON body.
///
/// A single attempt is made, there is no retry.
///
/// # Arguments
///
/// * `http` - Client the request was built with
/// * `request` - Request from [`build_request`]
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(T)` - The decoded body
/// - `Err(SearchError::NotFound)` - Upstream answered 404, carries the path
/// - `Err(SearchError::Status)` - Any other non-success status
/// - `Err(SearchError::Http)` - Connection failure or timeout
/// - `Err(SearchError::Decode)` - The body is not the expected JSON
///
/// # Example
///
/// ```
/// let request = build_request(&http, api_url, &token, "abc123", SearchKind::ArtistById, 0)?;
/// let artist: Artist = send(&http, request).await?;
/// ```
pub async fn send<T: DeserializeOwned>(http: &Client, request: Request) -> Result<T> {
    let url = request.url().clone();
    let response = http.execute(request).await?;

    let status = response.status();
    debug!(%url, status = status.as_u16(), "upstream response");
    if status == StatusCode::NOT_FOUND {
        return Err(SearchError::NotFound(url.path().to_string()));
    }
    if !status.is_success() {
        return Err(SearchError::Status {
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Fetches the pages of one list search with a token captured up front.
#[derive(Clone)]
pub struct UpstreamPages {
    http: Client,
    api_url: String,
    token: String,
    term: String,
    kind: SearchKind,
}

impl UpstreamPages {
    pub fn new(
        http: Client,
        api_url: impl Into<String>,
        token: impl Into<String>,
        term: impl Into<String>,
        kind: SearchKind,
    ) -> Self {
        Self {
            http,
            api_url: api_url.into(),
            token: token.into(),
            term: term.into(),
            kind,
        }
    }
}

#[async_trait]
impl<T> PageSource<T> for UpstreamPages
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch_page(&self, offset: u32) -> Result<Page<T>> {
        let request = build_request(
            &self.http,
            &self.api_url,
            &self.token,
            &self.term,
            self.kind,
            offset,
        )?;
        let envelope: SearchEnvelope<T> = send(&self.http, request).await?;
        Ok(envelope.page)
    }
}
