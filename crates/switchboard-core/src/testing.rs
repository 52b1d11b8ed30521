//! Test doubles shared by the unit tests in this crate.

use std::sync::{Arc, Mutex};

use switchboard_types::error::HandlerError;
use switchboard_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use crate::handler::{Handler, HandlerRequest};
use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::provider::LlmProvider;

/// Text model that answers by matching substrings of the prompt.
///
/// The first rule whose needle appears in the prompt wins. With no match the
/// call fails with a provider error.
#[derive(Default)]
pub struct StubLlm {
    rules: Vec<(String, Result<String, String>)>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl StubLlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, needle: &str, reply: &str) -> Self {
        self.rules.push((needle.to_string(), Ok(reply.to_string())));
        self
    }

    pub fn fail(mut self, needle: &str) -> Self {
        self.rules
            .push((needle.to_string(), Err(format!("stub failure for '{needle}'"))));
        self
    }

    /// Handle to the prompts seen so far.
    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }

    pub fn boxed(self) -> Arc<BoxLlmProvider> {
        Arc::new(BoxLlmProvider::new(self))
    }
}

impl LlmProvider for StubLlm {
    fn name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let mut prompt = request.system.clone().unwrap_or_default();
        for message in &request.messages {
            prompt.push('\n');
            prompt.push_str(&message.content);
        }
        self.prompts.lock().unwrap().push(prompt.clone());

        let rule = self
            .rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()));
        match rule {
            Some((_, Ok(reply))) => Ok(CompletionResponse {
                content: reply.clone(),
                model: "stub".to_string(),
            }),
            Some((_, Err(message))) => Err(LlmError::Provider {
                message: message.clone(),
            }),
            None => Err(LlmError::Provider {
                message: "no stub rule matched".to_string(),
            }),
        }
    }
}

/// Text model that never answers within any reasonable timeout.
pub struct HangingLlm;

impl LlmProvider for HangingLlm {
    fn name(&self) -> &str {
        "hanging"
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        std::future::pending().await
    }
}

/// How a [`StubHandler`] responds.
#[derive(Clone)]
pub enum Behaviour {
    Reply(String),
    AuthFailure(&'static str),
    Unexpected(String),
    Panic,
}

/// Handler that records its requests and responds per [`Behaviour`].
pub struct StubHandler {
    name: &'static str,
    behaviour: Behaviour,
    seen: Arc<Mutex<Vec<HandlerRequest>>>,
}

impl StubHandler {
    pub fn new(name: &'static str, behaviour: Behaviour) -> Self {
        Self {
            name,
            behaviour,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn replying(name: &'static str, reply: &str) -> Self {
        Self::new(name, Behaviour::Reply(reply.to_string()))
    }

    pub fn seen(&self) -> Arc<Mutex<Vec<HandlerRequest>>> {
        Arc::clone(&self.seen)
    }
}

impl Handler for StubHandler {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn handle(&self, request: &HandlerRequest) -> Result<String, HandlerError> {
        self.seen.lock().unwrap().push(request.clone());
        match &self.behaviour {
            Behaviour::Reply(reply) => Ok(reply.clone()),
            Behaviour::AuthFailure(service) => Err(HandlerError::AuthenticationFailed {
                service: *service,
            }),
            Behaviour::Unexpected(message) => Err(HandlerError::Unexpected(message.clone())),
            Behaviour::Panic => panic!("stub handler panicked"),
        }
    }
}
