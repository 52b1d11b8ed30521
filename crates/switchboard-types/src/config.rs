//! Configuration types for Switchboard.
//!
//! `AppConfig` represents the top-level `config.toml` that controls the text
//! model backend, intent routing, and per-service settings. Every field has
//! a default, so an empty file is a valid configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::conversation::DEFAULT_CONTEXT_LIMIT;
use crate::intent::Intent;
use crate::llm::ProviderType;

/// Top-level configuration.
///
/// Loaded from `~/.switchboard/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Timeout applied to every outbound third-party HTTP call.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub router: RouterConfig,

    #[serde(default)]
    pub news: NewsConfig,

    #[serde(default)]
    pub music: MusicConfig,

    #[serde(default)]
    pub calendar: CalendarConfig,
}

fn default_http_timeout_secs() -> u64 {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: default_http_timeout_secs(),
            llm: LlmConfig::default(),
            router: RouterConfig::default(),
            news: NewsConfig::default(),
            music: MusicConfig::default(),
            calendar: CalendarConfig::default(),
        }
    }
}

/// Text model backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: ProviderType,
    pub model: String,
    /// Overrides the provider's default base URL.
    pub base_url: Option<String>,
    pub temperature: Option<f64>,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderType::Ollama,
            model: "mistral".to_string(),
            base_url: None,
            temperature: None,
            timeout_secs: 15,
        }
    }
}

/// Intent routing and context window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Labels the classifier may answer with.
    pub intents: Vec<Intent>,
    /// Intent used whenever classification fails.
    pub default_intent: Intent,
    /// Extra labels accepted from the classifier, e.g. `song = "music"`.
    pub aliases: BTreeMap<String, Intent>,
    /// Include recent turns in the classification prompt.
    pub use_context: bool,
    /// How many recent turns the classifier sees when `use_context` is set.
    pub context_turns: usize,
    /// Size of the context window handed to handlers.
    pub context_limit: usize,
    pub classifier_timeout_secs: u64,
    /// Prefix that marks an explicit command, e.g. `!play`.
    pub command_prefix: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            intents: Intent::ALL.to_vec(),
            default_intent: Intent::Qa,
            aliases: BTreeMap::new(),
            use_context: false,
            context_turns: 3,
            context_limit: DEFAULT_CONTEXT_LIMIT,
            classifier_timeout_secs: 10,
            command_prefix: "!".to_string(),
        }
    }
}

/// News search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub endpoint: String,
    pub page_size: u32,
    pub language: String,
    /// Topic used when phrase extraction fails.
    pub fallback_topic: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://newsapi.org/v2/everything".to_string(),
            page_size: 3,
            language: "en".to_string(),
            fallback_topic: "latest news".to_string(),
        }
    }
}

/// Music service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicConfig {
    /// Spotify market code used for searches and top tracks.
    pub market: String,
    /// Maximum tracks queued for a mood request.
    pub mood_track_limit: u32,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            market: "IN".to_string(),
            mood_track_limit: 50,
        }
    }
}

/// Calendar settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub calendar_id: String,
    pub time_zone: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            calendar_id: "primary".to_string(),
            time_zone: "Asia/Kolkata".to_string(),
        }
    }
}
