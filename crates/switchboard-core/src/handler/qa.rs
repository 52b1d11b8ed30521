//! Question-answering handler. Reminder-like questions are handed to the
//! reminder handler; everything else is answered by the text model with the
//! recent conversation as context.

use std::sync::Arc;

use switchboard_types::conversation::render_transcript;
use switchboard_types::error::HandlerError;
use switchboard_types::llm::{CompletionRequest, LlmError};

use super::{Handler, HandlerRequest};
use crate::fallback::or_default;
use crate::llm::box_provider::BoxLlmProvider;

const MODEL_UNAVAILABLE: &str = "⚠️ I'm having trouble processing that. Try again later.";

/// Sub-intent within the question-answering family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QaRoute {
    Reminder,
    Chat,
}

pub struct QaHandler<R> {
    llm: Arc<BoxLlmProvider>,
    reminder: R,
    max_tokens: u32,
    temperature: Option<f64>,
}

impl<R: Handler> QaHandler<R> {
    /// `reminder` receives messages the model labels as reminders.
    pub fn new(llm: Arc<BoxLlmProvider>, reminder: R) -> Self {
        Self {
            llm,
            reminder,
            max_tokens: 512,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }

    async fn route(&self, text: &str) -> QaRoute {
        let prompt = format!(
            "Classify the following user message as one of: reminder, chat.\n\
             Message: \"{text}\"\n\
             Respond with only the label."
        );
        let request = CompletionRequest::prompt(prompt, 10).with_temperature(0.0);
        let label = or_default(
            "qa routing",
            self.llm.complete(&request).await.map(|r| r.content.to_lowercase()),
            String::new,
        );
        if label.contains("reminder") {
            QaRoute::Reminder
        } else {
            QaRoute::Chat
        }
    }

    async fn answer(&self, request: &HandlerRequest) -> Result<String, LlmError> {
        let prompt = format!(
            "You are a helpful assistant. Here is the conversation so far:\n\
             {}\n\
             User: {}\nAssistant:",
            render_transcript(&request.context),
            request.text
        );
        let mut completion = CompletionRequest::prompt(prompt, self.max_tokens);
        completion.temperature = self.temperature;
        Ok(self.llm.complete(&completion).await?.content.trim().to_string())
    }
}

impl<R: Handler> Handler for QaHandler<R> {
    fn name(&self) -> &'static str {
        "qa"
    }

    #[tracing::instrument(name = "qa_handler", skip_all, fields(user_id = %request.user_id))]
    async fn handle(&self, request: &HandlerRequest) -> Result<String, HandlerError> {
        if self.route(&request.text).await == QaRoute::Reminder {
            tracing::debug!("delegating to reminder handler");
            return self.reminder.handle(request).await;
        }

        Ok(or_default("qa answer", self.answer(request).await, || {
            MODEL_UNAVAILABLE.to_string()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;
    use switchboard_types::conversation::{MessageRecord, Role};
    use uuid::Uuid;

    use crate::testing::{StubHandler, StubLlm};

    fn record(role: Role, text: &str, sequence: i64) -> MessageRecord {
        MessageRecord {
            id: Uuid::now_v7(),
            user_id: "u1".to_string(),
            role,
            text: text.to_string(),
            created_at: Utc::now(),
            sequence,
        }
    }

    #[tokio::test]
    async fn test_chat_answer_uses_context() {
        let llm = StubLlm::new()
            .reply("one of: reminder, chat", "chat")
            .reply("helpful assistant", "  Paris is the capital of France.  ");
        let prompts = llm.prompts();
        let reminder = StubHandler::replying("reminder", "should not be used");
        let seen = reminder.seen();
        let handler = QaHandler::new(llm.boxed(), reminder);

        let request = HandlerRequest::new("u1", "and its capital?").with_context(vec![
            record(Role::User, "tell me about France", 1),
            record(Role::Assistant, "France is in Europe.", 2),
        ]);
        let reply = handler.handle(&request).await.unwrap();

        assert_eq!(reply, "Paris is the capital of France.");
        assert!(seen.lock().unwrap().is_empty());
        let prompt = prompts.lock().unwrap()[1].clone();
        assert!(prompt.contains("user: tell me about France\nassistant: France is in Europe."));
        assert!(prompt.ends_with("User: and its capital?\nAssistant:"));
    }

    #[tokio::test]
    async fn test_reminder_is_delegated() {
        let reminder = StubHandler::replying("reminder", "✅ Reminder 'gym' set for 2024-06-02 07:00.");
        let seen = reminder.seen();
        let handler = QaHandler::new(
            StubLlm::new().reply("one of: reminder, chat", "Reminder").boxed(),
            reminder,
        );

        let reply = handler
            .handle(&HandlerRequest::new("u1", "gym at 7 tomorrow"))
            .await
            .unwrap();
        assert!(reply.starts_with("✅ Reminder 'gym'"));
        assert_eq!(seen.lock().unwrap()[0].text, "gym at 7 tomorrow");
    }

    #[tokio::test]
    async fn test_routing_failure_means_chat() {
        let llm = StubLlm::new()
            .fail("one of: reminder, chat")
            .reply("helpful assistant", "Hello!");
        let handler = QaHandler::new(llm.boxed(), StubHandler::replying("reminder", "no"));
        let reply = handler.handle(&HandlerRequest::new("u1", "hi")).await.unwrap();
        assert_eq!(reply, "Hello!");
    }

    #[tokio::test]
    async fn test_model_failure_message() {
        let llm = StubLlm::new()
            .reply("one of: reminder, chat", "chat")
            .fail("helpful assistant");
        let handler = QaHandler::new(llm.boxed(), StubHandler::replying("reminder", "no"));
        let reply = handler.handle(&HandlerRequest::new("u1", "hi")).await.unwrap();
        assert_eq!(reply, MODEL_UNAVAILABLE);
    }
}
