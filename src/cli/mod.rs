//! # CLI Module
//!
//! Command implementations behind the `genredetector` binary.
//!
//! - [`serve`] - Authorizes with Spotify and runs the search proxy
//! - [`search`] - Runs one genre, artist or track search and prints a table
//! - [`lookup`] - Fetches a single artist or track by id and prints it as JSON
//!
//! Commands report through the crate's `info!`, `success!`, `warning!` and
//! `error!` macros; `error!` terminates the process.
//!
//! ## Usage Patterns
//!
//! ```bash
//! genredetector serve --dev                   # proxy on SERVER_ADDRESS
//! genredetector search genre "soft rock"      # exact genre matches
//! genredetector search genre rock --partial   # anything upstream matched
//! genredetector lookup artist 0OdUWJ0sBjDrqHygGUXeCF
//! ```

mod search;
mod serve;

pub use search::LookupTarget;
pub use search::SearchTarget;
pub use search::lookup;
pub use search::search;
pub use serve::serve;
