//! Client-credentials bearer token handling.
//!
//! Spotify's app-level flow: POST the client id/secret (HTTP basic auth) to
//! the accounts service, receive a bearer token valid for about an hour.
//! See: https://developer.spotify.com/documentation/web-api/tutorials/client-credentials-flow

use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::dto;
use crate::catalog::domain::CatalogError;

/// Refresh this long before the token actually expires
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn from_response(response: dto::TokenResponse, now: Instant) -> Self {
        let lifetime = Duration::from_secs(response.expires_in).saturating_sub(EXPIRY_MARGIN);
        Self {
            value: response.access_token,
            expires_at: now + lifetime,
        }
    }

    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Fetches and caches the app-level bearer token.
///
/// The lock is only held to read or replace the cached value, never across
/// the token request itself. Two concurrent requests may both refresh; the
/// later one wins, which is harmless.
pub(super) struct TokenProvider {
    client_id: String,
    client_secret: String,
    token_url: String,
    http_client: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub(super) fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        token_url: impl Into<String>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_url: token_url.into(),
            http_client,
            cached: Mutex::new(None),
        }
    }

    /// Current bearer token, requesting a new one if needed
    pub(super) async fn bearer(&self) -> Result<String, CatalogError> {
        let now = Instant::now();
        let cached = self
            .cached
            .lock()
            .as_ref()
            .filter(|token| token.is_fresh(now))
            .map(|token| token.value.clone());
        if let Some(value) = cached {
            return Ok(value);
        }

        let response = self.request_token().await?;
        let token = CachedToken::from_response(response, Instant::now());
        let value = token.value.clone();
        *self.cached.lock() = Some(token);

        tracing::debug!("Obtained new catalog access token");
        Ok(value)
    }

    /// Drop the cached token (after the API rejected it)
    pub(super) fn invalidate(&self) {
        self.cached.lock().take();
    }

    async fn request_token(&self) -> Result<dto::TokenResponse, CatalogError> {
        let response = self
            .http_client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body("grant_type=client_credentials")
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Unauthorized(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json::<dto::TokenResponse>()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }
}
