//! OAuth access-token refresh for the Ads API

use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use super::ApiError;
use super::http_client::get_client;
use crate::constants::OAUTH_TOKEN_URL;

// Refresh this long before the reported expiry
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in:   u64,
}

const fn default_expires_in() -> u64 {
    3600
}

struct CachedToken {
    value:      String,
    expires_at: Instant,
}

/// Exchanges the long-lived refresh token for short-lived access tokens
pub struct TokenProvider {
    client_id:     String,
    client_secret: String,
    refresh_token: String,
    cached:        Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(client_id: String, client_secret: String, refresh_token: String) -> Self {
        Self {
            client_id,
            client_secret,
            refresh_token,
            cached: Mutex::new(None),
        }
    }

    /// Current access token, refreshed when missing or about to expire
    pub async fn access_token(&self) -> Result<String, ApiError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() + EXPIRY_MARGIN < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        debug!("Refreshing Google Ads OAuth access token");
        let token = self.refresh().await?;
        let value = token.access_token.clone();
        *cached = Some(CachedToken {
            value:      token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });
        Ok(value)
    }

    async fn refresh(&self) -> Result<TokenResponse, ApiError> {
        let response = get_client()
            .post(OAUTH_TOKEN_URL)
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", self.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ApiError::Authentication(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Authentication(format!("HTTP {status}: {body}")));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| ApiError::Authentication(format!("invalid token response: {e}")))
    }
}
