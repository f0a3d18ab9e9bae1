//! Client-credentials access token cache.
//!
//! One token is shared by every catalog request. Readers take the fast path under a read lock;
//! a missing or expiring token is fetched with no lock held and then stored, so concurrent
//! refreshes are possible and the last writer wins.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use super::dto::TokenResponse;
use crate::recognition::domain::ProviderError;

/// Tokens this close to expiry are treated as expired.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Opaque bearer token with its expiry instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: Instant,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, lifetime: Duration) -> Self {
        Self {
            value: value.into(),
            expires_at: Instant::now() + lifetime,
        }
    }

    fn is_fresh(&self, now: Instant) -> bool {
        now + EXPIRY_MARGIN < self.expires_at
    }
}

/// Shared holder for the current access token.
#[derive(Clone, Default)]
pub struct TokenCache {
    current: Arc<RwLock<Option<AccessToken>>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached token value, or run `refresh` and store its result.
    ///
    /// A failed refresh leaves the previous token (if any) in place.
    pub async fn get_or_refresh<F, Fut>(&self, refresh: F) -> Result<String, ProviderError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<AccessToken, ProviderError>>,
    {
        let now = Instant::now();
        let cached = self
            .current
            .read()
            .as_ref()
            .filter(|token| token.is_fresh(now))
            .map(|token| token.value.clone());
        if let Some(value) = cached {
            return Ok(value);
        }

        tracing::debug!("Access token missing or expired, refreshing");
        let token = refresh().await?;
        let value = token.value.clone();
        *self.current.write() = Some(token);
        Ok(value)
    }

    /// Forget the current token.
    pub fn invalidate(&self) {
        *self.current.write() = None;
    }
}

/// Exchange client credentials for a token (`POST {accounts_url}/api/token`).
pub async fn request_token(
    http_client: &reqwest::Client,
    accounts_url: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<AccessToken, ProviderError> {
    let url = format!("{}/api/token", accounts_url);

    let response = http_client
        .post(&url)
        .basic_auth(client_id, Some(client_secret))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await
        .map_err(ProviderError::from_reqwest)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Auth(format!(
            "token exchange returned HTTP {}",
            status.as_u16()
        )));
    }

    let body: TokenResponse = response
        .json()
        .await
        .map_err(|e| ProviderError::Parse(e.to_string()))?;

    tracing::info!("Obtained catalog access token (expires in {}s)", body.expires_in);
    Ok(AccessToken::new(
        body.access_token,
        Duration::from_secs(body.expires_in),
    ))
}
