//! # API Module
//!
//! HTTP endpoints of the genre detector proxy.
//!
//! ## Endpoints
//!
//! ### Search
//!
//! - [`search::genre`] - `GET /search/genre?q=&partial=` artists tagged with a genre
//! - [`search::artist`] - `GET /search/artist?q=` artists by name
//! - [`search::artist_by_id`] - `GET /search/artist/{id}` one artist
//! - [`search::track`] - `GET /search/track?q=` tracks by name
//! - [`search::track_by_id`] - `GET /search/track/{id}` one track
//!
//! List endpoints answer `{ total, length, failed_pages, items }`, sorted by
//! popularity. `total` is an upper bound: pages that failed upstream are
//! left out and counted in `failed_pages`.
//!
//! ### Monitoring
//!
//! - [`health`] - Returns application status and version information.
//!
//! Handlers receive the shared [`crate::spotify::SpotifyClient`] through an
//! axum `Extension`; errors are rendered by
//! [`crate::error::SearchError`]'s `IntoResponse` implementation.

mod health;
pub mod search;

pub use health::health;
