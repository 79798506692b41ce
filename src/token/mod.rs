use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Bearer token and its computed expiration
#[derive(Debug, Clone)]
pub struct Token {
    pub value: String,
    pub expires_at: i64, // UNIX timestamp
}

impl Token {
    pub fn new(value: String, expires_at: i64) -> Self {
        Self { value, expires_at }
    }

    pub fn is_valid(&self) -> bool {
        Utc::now().timestamp() < self.expires_at
    }
}

/// Wire shape of the upstream client-credentials grant response.
#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Owns the single cached bearer token for the upstream circulation API.
///
/// `ensure_token` returns the cached token while it is valid and refreshes
/// it otherwise. Value and expiry are installed as one write, so concurrent
/// readers see either the old pair or the new pair, never a torn state.
/// Concurrent refreshes are allowed to race; each installs a complete pair.
#[derive(Debug, Clone)]
pub struct TokenManager {
    client: Client,
    auth_url: String,
    client_id: String,
    client_secret: String,
    cached: Arc<RwLock<Option<Token>>>,
}

impl TokenManager {
    pub fn new(client: Client, base_url: &str, client_id: String, client_secret: String) -> Self {
        Self {
            client,
            auth_url: format!("{}/auth/accessToken", base_url.trim_end_matches('/')),
            client_id,
            client_secret,
            cached: Arc::new(RwLock::new(None)),
        }
    }

    /// Get a valid token, refreshing when absent or expired.
    ///
    /// A failed refresh surfaces as an error and leaves any previous cache
    /// state untouched.
    pub async fn ensure_token(&self) -> Result<Token> {
        if let Some(token) = self.cached.read().await.as_ref().filter(|t| t.is_valid()) {
            debug!("using cached access token");
            return Ok(token.clone());
        }

        let token = self.fetch_token().await?;
        let mut cached = self.cached.write().await;
        *cached = Some(token.clone());
        info!(expires_at = token.expires_at, "access token refreshed");
        Ok(token)
    }

    /// Issue a client-credentials grant against the upstream auth endpoint.
    async fn fetch_token(&self) -> Result<Token> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];

        let response = self
            .client
            .post(&self.auth_url)
            .form(&form)
            .send()
            .await
            .context("access token request failed")?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "access token request failed: {}",
                response.status()
            ));
        }

        let body: AccessTokenResponse = response
            .json()
            .await
            .context("malformed access token response")?;
        Ok(Token::new(
            body.access_token,
            Utc::now().timestamp() + body.expires_in,
        ))
    }

    /// Current cache contents, without triggering a refresh.
    pub async fn cached(&self) -> Option<Token> {
        self.cached.read().await.clone()
    }
}
