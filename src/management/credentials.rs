use chrono::Utc;
use reqwest::Client;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::{
    error::{Result, SearchError},
    types::{AccessToken, TokenResponse},
};

/// Seconds before expiry at which a token counts as stale.
pub const REFRESH_MARGIN_SECS: u64 = 400;

impl AccessToken {
    pub fn is_stale_at(&self, now: i64) -> bool {
        let lifetime = self.expires_in.saturating_sub(REFRESH_MARGIN_SECS) as i64;
        now >= self.obtained_at + lifetime
    }

    pub fn is_stale(&self) -> bool {
        self.is_stale_at(Utc::now().timestamp())
    }
}

/// Holds the client credentials bearer token and refreshes it before expiry.
///
/// Refresh is serialised behind an internal lock: concurrent callers that
/// all observe a stale token trigger a single exchange.
pub struct CredentialManager {
    http: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    token: RwLock<Option<AccessToken>>,
    refresh: Mutex<()>,
}

impl CredentialManager {
    pub fn new(
        http: Client,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(SearchError::Config(
                "client id and client secret must not be empty".to_string(),
            ));
        }

        Ok(Self {
            http,
            token_url: token_url.into(),
            client_id,
            client_secret,
            token: RwLock::new(None),
            refresh: Mutex::new(()),
        })
    }

    /// Exchanges the client credentials for a fresh token and stores it.
    pub async fn authorize(&self) -> Result<()> {
        let token = self.request_token().await?;
        info!(expires_in = token.expires_in, "authorized with upstream");
        *self.token.write().await = Some(token);
        Ok(())
    }

    /// Re-authorizes when no token is held or the held one is stale.
    pub async fn refresh_if_stale(&self) -> Result<()> {
        if !self.needs_refresh().await {
            return Ok(());
        }

        let _guard = self.refresh.lock().await;
        // another caller may have refreshed while we waited for the lock
        if !self.needs_refresh().await {
            return Ok(());
        }

        debug!("access token stale, refreshing");
        self.authorize().await
    }

    /// Returns the token currently held, stale or not.
    pub async fn current_token(&self) -> Result<String> {
        self.token
            .read()
            .await
            .as_ref()
            .map(|t| t.value.clone())
            .ok_or_else(|| SearchError::Auth("no access token, authorize first".to_string()))
    }

    /// Refreshes if needed, then returns the current token.
    pub async fn valid_token(&self) -> Result<String> {
        self.refresh_if_stale().await?;
        self.current_token().await
    }

    async fn needs_refresh(&self) -> bool {
        self.token
            .read()
            .await
            .as_ref()
            .is_none_or(|t| t.is_stale())
    }

    async fn request_token(&self) -> Result<AccessToken> {
        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Auth(format!(
                "token endpoint returned status {}",
                status.as_u16()
            )));
        }

        let body = response.bytes().await?;
        let token: TokenResponse = serde_json::from_slice(&body)
            .map_err(|e| SearchError::Auth(format!("malformed token response: {}", e)))?;
        if token.access_token.is_empty() {
            return Err(SearchError::Auth(
                "token response has an empty access token".to_string(),
            ));
        }

        Ok(AccessToken {
            value: token.access_token,
            obtained_at: Utc::now().timestamp(),
            expires_in: token.expires_in,
        })
    }
}
