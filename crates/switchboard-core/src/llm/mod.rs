//! Text-model provider abstractions.
//!
//! - `LlmProvider`: RPITIT trait for concrete backends (Ollama, OpenAI-compatible)
//! - `BoxLlmProvider`: object-safe wrapper so handlers can share one provider

pub mod box_provider;
pub mod provider;
