use reqwest::{Client, Request, header::ACCEPT};

use crate::error::Result;

/// Items per upstream page, the maximum the search endpoint accepts.
pub const PAGE_SIZE: u32 = 50;

/// What an upstream request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKind {
    Genre,
    Artist,
    ArtistById,
    Track,
    TrackById,
}

impl SearchKind {
    /// True for kinds answered with a paginated list.
    pub fn is_list(self) -> bool {
        matches!(self, SearchKind::Genre | SearchKind::Artist | SearchKind::Track)
    }

    /// The `type` parameter of the search endpoint.
    pub fn item_type(self) -> &'static str {
        match self {
            SearchKind::Genre | SearchKind::Artist | SearchKind::ArtistById => "artist",
            SearchKind::Track | SearchKind::TrackById => "track",
        }
    }

    /// The field filter prefixed to the query term.
    fn field(self) -> &'static str {
        match self {
            SearchKind::Genre => "genre",
            SearchKind::Artist | SearchKind::ArtistById => "artist",
            SearchKind::Track | SearchKind::TrackById => "track",
        }
    }
}

/// Builds a ready-to-send upstream request carrying the bearer token.
///
/// # Arguments
///
/// * `http` - Client used to build the request
/// * `api_url` - Web API base URL without trailing slash
/// * `token` - Bearer token for the `Authorization` header
/// * `term` - Formatted query term for list kinds, catalog id for by-id kinds
/// * `kind` - Which endpoint to call
/// * `offset` - Page offset for list kinds, ignored for by-id kinds
///
/// # API Endpoint
///
/// - List kinds: `GET {api_url}/search?q={field}:{term}&type={artist|track}&limit=50&offset={offset}`
/// - By-id kinds: `GET {api_url}/artists/{id}` or `GET {api_url}/tracks/{id}`
///
/// # Example
///
/// ```
/// let request = build_request(&http, "https://api.spotify.com/v1", &token, "\"soft rock\"", SearchKind::Genre, 50)?;
/// assert_eq!(request.url().path(), "/v1/search");
/// ```
pub fn build_request(
    http: &Client,
    api_url: &str,
    token: &str,
    term: &str,
    kind: SearchKind,
    offset: u32,
) -> Result<Request> {
    let builder = if kind.is_list() {
        let q = format!("{}:{}", kind.field(), term);
        let limit = PAGE_SIZE.to_string();
        let offset = offset.to_string();
        http.get(format!("{uri}/search", uri = api_url)).query(&[
            ("q", q.as_str()),
            ("type", kind.item_type()),
            ("limit", limit.as_str()),
            ("offset", offset.as_str()),
        ])
    } else {
        http.get(format!(
            "{uri}/{kind}s/{id}",
            uri = api_url,
            kind = kind.item_type(),
            id = term
        ))
    };

    Ok(builder
        .bearer_auth(token)
        .header(ACCEPT, "application/json")
        .build()?)
}
