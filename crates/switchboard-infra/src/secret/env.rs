//! Environment variable secret provider.
//!
//! Key resolution: `SWITCHBOARD_{KEY}` first, then `{KEY}` directly.
//! Empty values count as unset.

use std::collections::HashMap;

use secrecy::SecretString;

use switchboard_types::error::ServiceError;

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Read-only secret provider backed by the process environment.
pub struct EnvSecretProvider {
    lookup: Lookup,
}

impl EnvSecretProvider {
    /// Provider reading the real process environment.
    pub fn new() -> Self {
        Self {
            // Non-unicode values are treated as unset.
            lookup: Box::new(|key| std::env::var(key).ok()),
        }
    }

    /// Provider over a fixed map, for tests and embedding.
    pub fn from_map(values: HashMap<String, String>) -> Self {
        Self {
            lookup: Box::new(move |key| values.get(key).cloned()),
        }
    }

    fn raw(&self, key: &str) -> Option<String> {
        [format!("SWITCHBOARD_{key}"), key.to_string()]
            .iter()
            .filter_map(|name| (self.lookup)(name))
            .find(|value| !value.trim().is_empty())
    }

    /// The secret for `key`, if set.
    pub fn get(&self, key: &str) -> Option<SecretString> {
        self.raw(key).map(SecretString::from)
    }

    /// Whether `key` is set, without reading it into a secret.
    pub fn is_set(&self, key: &str) -> bool {
        self.raw(key).is_some()
    }

    /// The secret for `key`, or `NotConfigured(service)`.
    pub fn require(&self, key: &str, service: &'static str) -> Result<SecretString, ServiceError> {
        self.get(key).ok_or_else(|| {
            tracing::debug!(key, service, "credential not set");
            ServiceError::NotConfigured(service)
        })
    }
}

impl Default for EnvSecretProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use secrecy::ExposeSecret;

    fn provider(pairs: &[(&str, &str)]) -> EnvSecretProvider {
        EnvSecretProvider::from_map(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_plain_key() {
        let p = provider(&[("NEWS_API_KEY", "abc")]);
        assert_eq!(p.get("NEWS_API_KEY").unwrap().expose_secret(), "abc");
        assert!(p.is_set("NEWS_API_KEY"));
    }

    #[test]
    fn test_prefixed_key_wins() {
        let p = provider(&[("NEWS_API_KEY", "plain"), ("SWITCHBOARD_NEWS_API_KEY", "scoped")]);
        assert_eq!(p.get("NEWS_API_KEY").unwrap().expose_secret(), "scoped");
    }

    #[test]
    fn test_empty_value_is_unset() {
        let p = provider(&[("LASTFM_API_KEY", "  ")]);
        assert!(p.get("LASTFM_API_KEY").is_none());
    }

    #[test]
    fn test_require_missing() {
        let p = provider(&[]);
        let err = p.require("SPOTIFY_CLIENT_ID", "Spotify").unwrap_err();
        assert!(matches!(err, ServiceError::NotConfigured("Spotify")));
    }
}
