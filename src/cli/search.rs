use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    config::Config,
    error, info,
    spotify::SpotifyClient,
    success,
    types::{ArtistTableRow, SearchResults, TrackTableRow},
    warning,
};

/// List searches available from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SearchTarget {
    Genre,
    Artist,
    Track,
}

/// Single entity lookups available from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LookupTarget {
    Artist,
    Track,
}

pub async fn search(config: &Config, target: SearchTarget, query: &str, partial: bool, top: usize) {
    let client = connect(config).await;
    let pb = spinner(format!("Searching {:?} \"{}\"...", target, query));

    match target {
        SearchTarget::Genre | SearchTarget::Artist => {
            let result = if target == SearchTarget::Genre {
                client.search_genre(query, partial).await
            } else {
                client.search_artists(query).await
            };
            pb.finish_and_clear();

            match result {
                Ok(results) => {
                    report(&results);
                    let rows: Vec<ArtistTableRow> =
                        results.items.iter().take(top).map(ArtistTableRow::from).collect();
                    println!("{}", Table::new(rows));
                }
                Err(e) => error!("Search failed. Err: {}", e),
            }
        }
        SearchTarget::Track => {
            let result = client.search_tracks(query).await;
            pb.finish_and_clear();

            match result {
                Ok(results) => {
                    report(&results);
                    let rows: Vec<TrackTableRow> =
                        results.items.iter().take(top).map(TrackTableRow::from).collect();
                    println!("{}", Table::new(rows));
                }
                Err(e) => error!("Search failed. Err: {}", e),
            }
        }
    }
}

pub async fn lookup(config: &Config, target: LookupTarget, id: &str) {
    let client = connect(config).await;
    let pb = spinner(format!("Fetching {:?} {}...", target, id));

    let json = match target {
        LookupTarget::Artist => client
            .artist_by_id(id)
            .await
            .map(|a| serde_json::to_string_pretty(&a)),
        LookupTarget::Track => client
            .track_by_id(id)
            .await
            .map(|t| serde_json::to_string_pretty(&t)),
    };
    pb.finish_and_clear();

    match json {
        Ok(Ok(body)) => println!("{}", body),
        Ok(Err(e)) => error!("Failed to encode result. Err: {}", e),
        Err(e) => error!("Lookup failed. Err: {}", e),
    }
}

async fn connect(config: &Config) -> SpotifyClient {
    match SpotifyClient::connect(config).await {
        Ok(client) => client,
        Err(e) => error!("Cannot authorize with Spotify. Err: {}", e),
    }
}

fn report<T>(results: &SearchResults<T>) {
    success!("Found {} of {} results", results.length, results.total);
    if results.failed_pages > 0 {
        warning!(
            "{} result page(s) failed upstream and are missing",
            results.failed_pages
        );
    }
    if results.length == 0 {
        info!("Nothing matched. Try --partial for genre searches.");
    }
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
