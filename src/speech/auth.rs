//! Bearer token issuance for the speech provider
//!
//! Tokens are exchanged for the subscription key and live ten minutes on the
//! provider side; we refresh a minute early.

use super::TranscriptionError;
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const TOKEN_TTL: Duration = Duration::from_secs(9 * 60);

struct CachedToken {
    value: String,
    fetched_at: Instant,
}

/// Fetches and caches access tokens
pub struct TokenProvider {
    client: Client,
    token_uri: String,
    subscription_key: String,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(client: Client, token_uri: String, subscription_key: String) -> Self {
        Self {
            client,
            token_uri,
            subscription_key,
            cached: Mutex::new(None),
        }
    }

    /// Return a valid token, fetching a new one if the cached one is stale.
    ///
    /// The lock is held across the fetch so concurrent turns share one request.
    pub async fn access_token(&self) -> Result<String, TranscriptionError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.fetched_at.elapsed() < TOKEN_TTL {
                return Ok(token.value.clone());
            }
        }

        let value = self.fetch().await?;
        tracing::debug!("Speech access token refreshed");
        *cached = Some(CachedToken {
            value: value.clone(),
            fetched_at: Instant::now(),
        });
        Ok(value)
    }

    /// Drop the cached token (after the provider rejects it)
    pub async fn invalidate(&self) {
        self.cached.lock().await.take();
    }

    async fn fetch(&self) -> Result<String, TranscriptionError> {
        let response = self
            .client
            .post(&self.token_uri)
            .header("Ocp-Apim-Subscription-Key", &self.subscription_key)
            .header(reqwest::header::CONTENT_LENGTH, "0")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TranscriptionError::from_status(status.as_u16(), &body));
        }

        let token = body.trim();
        if token.is_empty() {
            return Err(TranscriptionError::auth("token endpoint returned an empty token"));
        }
        Ok(token.to_string())
    }
}
