//! Process-wide access token cache with transparent refresh.
//!
//! Adapters for OAuth-protected services keep one `TokenCache` and call
//! [`TokenCache::get_or_refresh`] before every request. The refresh closure
//! only runs when there is no token or the cached one is inside the safety
//! margin of its expiry.

use std::future::Future;
use std::time::{Duration, Instant};

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;

/// Refresh this long before the reported expiry.
pub const DEFAULT_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Lifetime assumed when the token endpoint omits `expires_in`.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// A freshly issued access token.
pub struct AccessToken {
    pub value: SecretString,
    pub expires_in: Duration,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, expires_in: Option<u64>) -> Self {
        Self {
            value: SecretString::from(value.into()),
            expires_in: expires_in
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TOKEN_LIFETIME),
        }
    }
}

struct CachedToken {
    value: SecretString,
    expires_at: Instant,
}

/// Single-slot token cache guarded by an async mutex.
///
/// Concurrent callers queue on the mutex, so at most one refresh is in
/// flight and the rest reuse its result.
pub struct TokenCache {
    state: Mutex<Option<CachedToken>>,
    margin: Duration,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::with_margin(DEFAULT_REFRESH_MARGIN)
    }

    pub fn with_margin(margin: Duration) -> Self {
        Self {
            state: Mutex::new(None),
            margin,
        }
    }

    /// Return the cached token, refreshing it first if missing or stale.
    pub async fn get_or_refresh<F, Fut, E>(&self, refresh: F) -> Result<SecretString, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<AccessToken, E>>,
    {
        let mut state = self.state.lock().await;

        if let Some(cached) = state.as_ref() {
            if Instant::now() + self.margin < cached.expires_at {
                return Ok(copy_secret(&cached.value));
            }
        }

        let token = refresh().await?;
        tracing::debug!(
            expires_in_secs = token.expires_in.as_secs(),
            "access token refreshed"
        );
        let value = copy_secret(&token.value);
        *state = Some(CachedToken {
            value: token.value,
            expires_at: Instant::now() + token.expires_in,
        });
        Ok(value)
    }

    /// Forget the cached token so the next call refreshes.
    pub async fn invalidate(&self) {
        *self.state.lock().await = None;
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("margin", &self.margin)
            .finish_non_exhaustive()
    }
}

fn copy_secret(secret: &SecretString) -> SecretString {
    SecretString::from(secret.expose_secret().to_string())
}
