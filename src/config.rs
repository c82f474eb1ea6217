//! Configuration management for the genre detector proxy.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a single [`Config`] value that is built
//! once at startup and handed to the components that need it.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

use crate::error::SearchError;

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://genredetector.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `genredetector/.env`.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/genredetector/.env`
/// - macOS: `~/Library/Application Support/genredetector/.env`
/// - Windows: `%LOCALAPPDATA%/genredetector/.env`
///
/// A missing file is not an error, the process environment is used as is.
///
/// # Errors
///
/// Returns an error string if the parent directory cannot be created or the
/// `.env` file exists but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))
}

fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("genredetector/.env");
    path
}

/// Runtime configuration of the proxy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Spotify application client id (`SPOTIFY_CLIENT_ID`)
    pub client_id: String,
    /// Spotify application client secret (`SPOTIFY_CLIENT_SECRET`)
    pub client_secret: String,
    /// Web API base URL without trailing slash (`SPOTIFY_API_URL`)
    pub api_url: String,
    /// Client credentials token endpoint (`SPOTIFY_API_TOKEN_URL`)
    pub token_url: String,
    /// Address the HTTP server binds to (`SERVER_ADDRESS`)
    pub server_address: String,
    /// Value of `Access-Control-Allow-Origin` (`CORS_ALLOWED_ORIGIN`)
    pub allowed_origin: String,
    /// Per upstream request timeout (`UPSTREAM_TIMEOUT_SECS`)
    pub request_timeout: Duration,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// Missing credentials are reported as [`SearchError::Config`] so the
    /// caller decides whether to exit.
    pub fn from_env() -> Result<Self, SearchError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_source<F>(get: F) -> Result<Self, SearchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, SearchError> {
            get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| SearchError::Config(format!("{} must be set", key)))
        };
        let optional = |key: &str, default: &str| -> String {
            get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let timeout = optional("UPSTREAM_TIMEOUT_SECS", &DEFAULT_TIMEOUT_SECS.to_string());
        let timeout_secs = timeout.parse::<u64>().map_err(|_| {
            SearchError::Config(format!(
                "UPSTREAM_TIMEOUT_SECS must be a number of seconds, got {:?}",
                timeout
            ))
        })?;

        Ok(Self {
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            api_url: optional("SPOTIFY_API_URL", DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
            token_url: optional("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
            server_address: optional("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            allowed_origin: optional("CORS_ALLOWED_ORIGIN", DEFAULT_ALLOWED_ORIGIN),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
