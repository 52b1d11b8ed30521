//! LlmProvider trait definition.
//!
//! Every free-text understanding step (topic extraction, intent and music
//! classification, reminder parsing, chat answers) goes through this trait.

use switchboard_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for text-model backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in switchboard-infra (e.g., `OllamaProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "ollama").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
