//! Text-model backed intent classifier with a deterministic fallback.
//!
//! The classifier never fails outwardly. Every failure mode (provider error,
//! timeout, empty input, an answer outside the enabled labels) resolves to
//! the configured default intent and is logged at `warn`.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use switchboard_types::config::RouterConfig;
use switchboard_types::conversation::{MessageRecord, render_transcript};
use switchboard_types::intent::Intent;
use switchboard_types::llm::{CompletionRequest, LlmError};

use crate::fallback::or_default;
use crate::llm::box_provider::BoxLlmProvider;

/// Labels are one word; leave a little room for stray punctuation.
const CLASSIFY_MAX_TOKENS: u32 = 10;

/// The labels the classifier may answer with, plus aliases and the default.
#[derive(Debug, Clone)]
pub struct IntentSet {
    enabled: Vec<Intent>,
    aliases: BTreeMap<String, Intent>,
    default: Intent,
}

impl IntentSet {
    /// Build a set. The default intent is always enabled, duplicates are
    /// dropped, and aliases pointing at disabled intents are ignored.
    pub fn new(intents: &[Intent], default: Intent, aliases: &BTreeMap<String, Intent>) -> Self {
        let mut enabled: Vec<Intent> = Vec::with_capacity(intents.len() + 1);
        for intent in intents.iter().copied().chain(std::iter::once(default)) {
            if !enabled.contains(&intent) {
                enabled.push(intent);
            }
        }

        let aliases = aliases
            .iter()
            .filter(|(_, target)| enabled.contains(target))
            .map(|(label, target)| (normalize_label(label), *target))
            .filter(|(label, _)| !label.is_empty())
            .collect();

        Self {
            enabled,
            aliases,
            default,
        }
    }

    pub fn from_config(config: &RouterConfig) -> Self {
        Self::new(&config.intents, config.default_intent, &config.aliases)
    }

    pub fn default_intent(&self) -> Intent {
        self.default
    }

    pub fn enabled(&self) -> &[Intent] {
        &self.enabled
    }

    /// Resolve a raw model answer to an enabled intent.
    pub fn resolve(&self, raw: &str) -> Option<Intent> {
        let label = normalize_label(raw);
        if let Ok(intent) = label.parse::<Intent>() {
            if self.enabled.contains(&intent) {
                return Some(intent);
            }
        }
        self.aliases.get(&label).copied()
    }

    /// Labels offered in the prompt: enabled intents first, then aliases.
    fn prompt_labels(&self) -> Vec<&str> {
        self.enabled
            .iter()
            .map(|intent| intent.label())
            .chain(self.aliases.keys().map(String::as_str))
            .collect()
    }
}

impl Default for IntentSet {
    fn default() -> Self {
        Self::from_config(&RouterConfig::default())
    }
}

/// Trim, lower-case, and strip surrounding quotes/punctuation.
pub fn normalize_label(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// Why a classification attempt fell back to the default.
#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    #[error("empty input")]
    EmptyInput,

    #[error("classifier timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("unrecognized label: '{0}'")]
    UnknownLabel(String),
}

/// Maps a message (and optionally recent turns) to an [`Intent`].
pub struct IntentClassifier {
    llm: Arc<BoxLlmProvider>,
    intents: IntentSet,
    use_context: bool,
    context_turns: usize,
    timeout: Duration,
}

impl IntentClassifier {
    pub fn new(llm: Arc<BoxLlmProvider>, intents: IntentSet) -> Self {
        Self {
            llm,
            intents,
            use_context: false,
            context_turns: 0,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn from_config(llm: Arc<BoxLlmProvider>, config: &RouterConfig) -> Self {
        Self::new(llm, IntentSet::from_config(config))
            .with_context(config.use_context, config.context_turns)
            .with_timeout(Duration::from_secs(config.classifier_timeout_secs))
    }

    /// Include up to `turns` recent records in the prompt when `enabled`.
    pub fn with_context(mut self, enabled: bool, turns: usize) -> Self {
        self.use_context = enabled;
        self.context_turns = turns;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn intents(&self) -> &IntentSet {
        &self.intents
    }

    /// Classify `text`. Never fails; falls back to the default intent.
    ///
    /// `context` holds prior turns, oldest first, without the current message.
    #[tracing::instrument(name = "classify_intent", skip_all, fields(provider = %self.llm.name()))]
    pub async fn classify(&self, text: &str, context: &[MessageRecord]) -> Intent {
        let intent = or_default(
            "intent classification",
            self.try_classify(text, context).await,
            || self.intents.default_intent(),
        );
        tracing::debug!(%intent, "message classified");
        intent
    }

    /// Classify without the fallback, exposing why it failed.
    pub async fn try_classify(
        &self,
        text: &str,
        context: &[MessageRecord],
    ) -> Result<Intent, ClassificationError> {
        if text.trim().is_empty() {
            return Err(ClassificationError::EmptyInput);
        }

        let request =
            CompletionRequest::prompt(self.build_prompt(text, context), CLASSIFY_MAX_TOKENS)
                .with_temperature(0.0);

        let response = tokio::time::timeout(self.timeout, self.llm.complete(&request))
            .await
            .map_err(|_| ClassificationError::Timeout(self.timeout))??;

        self.intents
            .resolve(&response.content)
            .ok_or_else(|| ClassificationError::UnknownLabel(response.content.trim().to_string()))
    }

    fn build_prompt(&self, text: &str, context: &[MessageRecord]) -> String {
        let labels = self.intents.prompt_labels().join(", ");
        let mut prompt = String::from("You are an intent classifier. ");

        if self.use_context && self.context_turns > 0 && !context.is_empty() {
            let start = context.len().saturating_sub(self.context_turns);
            prompt.push_str("Recent conversation:\n");
            prompt.push_str(&render_transcript(&context[start..]));
            prompt.push('\n');
        }

        prompt.push_str(&format!(
            "Given the message: '{text}', classify it as one of: {labels}. \
             Respond with only the intent label."
        ));
        prompt
    }
}
