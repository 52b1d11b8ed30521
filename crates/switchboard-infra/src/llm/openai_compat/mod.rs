//! OpenAI-compatible chat completions provider.
//!
//! One [`OpenAiCompatibleProvider`] serves OpenAI itself and any server
//! exposing `/chat/completions` (vLLM, LM Studio, llama.cpp, OpenRouter)
//! via a configurable base URL.

mod types;

use secrecy::{ExposeSecret, SecretString};

use switchboard_core::llm::provider::LlmProvider;
use switchboard_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use self::types::{ChatMessage, ChatRequest, ChatResponse};

/// OpenAI's public API root.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

/// Provider for any OpenAI-compatible API.
///
/// Does NOT derive Debug: the bearer key lives in this struct.
pub struct OpenAiCompatibleProvider {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
    model: String,
    timeout_secs: u64,
}

impl OpenAiCompatibleProvider {
    /// `api_key` may be `None` for local servers that skip auth.
    pub fn new(client: reqwest::Client, api_key: Option<SecretString>, model: impl Into<String>) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_OPENAI_URL.to_string(),
            model: model.into(),
            timeout_secs: 15,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn to_chat_request<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        let model = if request.model.is_empty() {
            self.model.as_str()
        } else {
            request.model.as_str()
        };

        let system = request.system.as_deref().map(|content| ChatMessage {
            role: "system".to_string(),
            content,
        });
        let messages = system
            .into_iter()
            .chain(request.messages.iter().map(|m| ChatMessage {
                role: m.role.to_string(),
                content: m.content.as_str(),
            }))
            .collect();

        ChatRequest {
            model,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        "openai_compatible"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.to_chat_request(request);

        let mut builder = self.client.post(self.url()).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(self.timeout_secs)
            } else {
                LlmError::Provider {
                    message: format!("HTTP request failed: {e}"),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited,
                400 => LlmError::InvalidRequest(error_body),
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        chat.into_completion()
    }
}
