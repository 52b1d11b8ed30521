//! Text-model provider implementations.
//!
//! Contains concrete implementations of the [`LlmProvider`] trait defined
//! in `switchboard-core`, and a factory ([`create_provider`]) that builds
//! the configured one.
//!
//! [`LlmProvider`]: switchboard_core::llm::provider::LlmProvider

pub mod ollama;
pub mod openai_compat;

use std::time::Duration;

use switchboard_core::llm::box_provider::BoxLlmProvider;
use switchboard_types::config::LlmConfig;
use switchboard_types::llm::{CompletionRequest, LlmError, ProviderType};

use crate::http::build_client;
use crate::secret::{EnvSecretProvider, OPENAI_API_KEY};

use self::ollama::OllamaProvider;
use self::openai_compat::OpenAiCompatibleProvider;

/// Build the configured provider.
///
/// A missing `OPENAI_API_KEY` does not fail here: the provider is built
/// without a key and every call reports `AuthenticationFailed`, which the
/// classifier and handlers already degrade from.
pub fn create_provider(
    config: &LlmConfig,
    secrets: &EnvSecretProvider,
) -> Result<BoxLlmProvider, LlmError> {
    let client = build_client(Duration::from_secs(config.timeout_secs)).map_err(|e| {
        LlmError::Provider {
            message: format!("failed to build HTTP client: {e}"),
        }
    })?;

    let provider = match config.provider {
        ProviderType::Ollama => {
            let mut provider = OllamaProvider::new(client, config.model.clone())
                .with_timeout_secs(config.timeout_secs);
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            BoxLlmProvider::new(provider)
        }
        ProviderType::OpenAiCompatible => {
            let api_key = secrets.get(OPENAI_API_KEY);
            if api_key.is_none() && config.base_url.is_none() {
                tracing::warn!("OPENAI_API_KEY is not set; text-model calls will fail");
            }
            let mut provider = OpenAiCompatibleProvider::new(client, api_key, config.model.clone())
                .with_timeout_secs(config.timeout_secs);
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            BoxLlmProvider::new(provider)
        }
    };

    tracing::debug!(
        provider = %config.provider,
        model = %config.model,
        "text-model provider ready"
    );
    Ok(provider)
}

/// Send a tiny prompt to check the provider answers at all.
pub async fn test_provider_connection(provider: &BoxLlmProvider) -> Result<String, LlmError> {
    let request = CompletionRequest::prompt("Reply with the single word: ok", 8).with_temperature(0.0);
    let response = provider.complete(&request).await?;
    Ok(response.model)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn secrets(pairs: &[(&str, &str)]) -> EnvSecretProvider {
        EnvSecretProvider::from_map(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        )
    }

    #[test]
    fn test_create_ollama_provider() {
        let provider = create_provider(&LlmConfig::default(), &secrets(&[])).unwrap();
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn test_create_openai_provider_without_key() {
        let config = LlmConfig {
            provider: ProviderType::OpenAiCompatible,
            model: "gpt-4o-mini".to_string(),
            ..LlmConfig::default()
        };
        let provider = create_provider(&config, &secrets(&[])).unwrap();
        assert_eq!(provider.name(), "openai_compatible");
    }

    #[tokio::test]
    async fn test_connection_failure_is_reported() {
        let config = LlmConfig {
            base_url: Some("http://127.0.0.1:9".to_string()),
            timeout_secs: 2,
            ..LlmConfig::default()
        };
        let provider = create_provider(&config, &secrets(&[])).unwrap();
        assert!(test_provider_connection(&provider).await.is_err());
    }
}
