//! Genre Detector Library
//!
//! This library implements a search proxy for the Spotify catalog. A caller
//! searches by genre, artist or track; the proxy authenticates with the client
//! credentials flow, fetches up to 1000 results concurrently in pages of 50,
//! and returns them filtered and sorted by popularity.
//!
//! # Modules
//!
//! - `api` - HTTP handlers of the proxy
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error type shared by the pipeline and the HTTP surface
//! - `management` - Credential (bearer token) management
//! - `server` - Router, CORS and request logging middleware
//! - `spotify` - Search pipeline: request building, fan-out, post-processing
//! - `types` - Data structures and type definitions
//! - `utils` - Query formatting helpers
//!
//! # Example
//!
//! ```
//! use genredetector::{config, spotify::SpotifyClient};
//!
//! #[tokio::main]
//! async fn main() -> genredetector::Res<()> {
//!     config::load_env().await?;
//!     let config = config::Config::from_env()?;
//!     let client = SpotifyClient::connect(&config).await?;
//!     let results = client.search_genre("soft rock", false).await?;
//!     println!("{} of {}", results.length, results.total);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Result alias for the binary and CLI glue, where any error is reported
/// and ends the command.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints a status line prefixed with a blue `o`.
///
/// ```
/// info!("Serving on http://{}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a status line prefixed with a green check mark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints to stderr prefixed with a red `!` and exits with status 1.
///
/// Only for failures that end the command, code after it never runs:
///
/// ```
/// let client = match SpotifyClient::connect(&config).await {
///     Ok(client) => client,
///     Err(e) => error!("Cannot authorize with Spotify. Err: {}", e),
/// };
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints to stderr prefixed with a yellow `!`, for problems the command
/// can carry on after.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
