//! The per-message pipeline: store the message, pick an intent, dispatch,
//! store the reply.
//!
//! Requests from the same user are linearized by [`UserLocks`]; different
//! users run concurrently. Storage failures abort the request with a generic
//! apology; every other failure is absorbed further down (classifier
//! fallback, dispatch error replies).

use std::sync::Arc;

use switchboard_types::config::RouterConfig;
use switchboard_types::conversation::{DEFAULT_CONTEXT_LIMIT, MessageRecord, Role};
use switchboard_types::error::RepositoryError;

use crate::command::{self, Command};
use crate::conversation::lock::UserLocks;
use crate::conversation::store::ConversationStore;
use crate::dispatch::Dispatcher;
use crate::handler::HandlerRequest;
use crate::intent::IntentClassifier;

/// Reply when the conversation store cannot be reached.
pub const STORAGE_APOLOGY: &str = "⚠️ Something went wrong while processing your request.";

/// Reply after a user purges their history.
pub const FORGET_REPLY: &str = "🧹 Your conversation history has been cleared.";

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("conversation store failed: {0}")]
    Storage(#[from] RepositoryError),
}

pub struct MessageRouter<S> {
    store: Arc<S>,
    classifier: IntentClassifier,
    dispatcher: Dispatcher,
    locks: UserLocks,
    context_limit: usize,
    command_prefix: String,
}

impl<S: ConversationStore> MessageRouter<S> {
    pub fn new(store: Arc<S>, classifier: IntentClassifier, dispatcher: Dispatcher) -> Self {
        Self {
            store,
            classifier,
            dispatcher,
            locks: UserLocks::new(),
            context_limit: DEFAULT_CONTEXT_LIMIT,
            command_prefix: "!".to_string(),
        }
    }

    pub fn from_config(
        store: Arc<S>,
        classifier: IntentClassifier,
        dispatcher: Dispatcher,
        config: &RouterConfig,
    ) -> Self {
        Self::new(store, classifier, dispatcher)
            .with_context_limit(config.context_limit)
            .with_command_prefix(&config.command_prefix)
    }

    /// How many records (including the current message) are loaded per request.
    pub fn with_context_limit(mut self, limit: usize) -> Self {
        self.context_limit = limit;
        self
    }

    pub fn with_command_prefix(mut self, prefix: &str) -> Self {
        self.command_prefix = prefix.to_string();
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn command_prefix(&self) -> &str {
        &self.command_prefix
    }

    /// Process one inbound message and return exactly one reply.
    pub async fn handle_message(&self, user_id: &str, text: &str) -> String {
        match self.route(user_id, text).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(user_id, error = %e, "request aborted");
                STORAGE_APOLOGY.to_string()
            }
        }
    }

    /// Like [`Self::handle_message`], but storage failures are returned.
    pub async fn route(&self, user_id: &str, text: &str) -> Result<String, RouterError> {
        let guard = self.locks.acquire(user_id).await;
        let result = self.route_locked(user_id, text).await;
        drop(guard);
        self.locks.prune();
        result
    }

    #[tracing::instrument(name = "route_message", skip_all, fields(user_id = %user_id))]
    async fn route_locked(&self, user_id: &str, text: &str) -> Result<String, RouterError> {
        let text = text.trim();
        let command = command::parse(text, &self.command_prefix);

        match &command {
            Some(Command::Forget) => {
                self.purge(user_id).await?;
                return Ok(FORGET_REPLY.to_string());
            }
            Some(Command::Help) => return Ok(command::help_text(&self.command_prefix)),
            Some(Command::Unknown(reason)) => {
                return Ok(format!(
                    "❓ Sorry, {reason}. Send {}help for the list of commands.",
                    self.command_prefix
                ));
            }
            _ => {}
        }

        let current = self.store.append(user_id, Role::User, text).await?;
        let context: Vec<MessageRecord> = self
            .store
            .recent(user_id, self.context_limit)
            .await?
            .into_iter()
            .filter(|record| record.id != current.id)
            .collect();

        let (intent, request) = match command.as_ref().and_then(Command::route) {
            Some((intent, payload, directive)) => {
                let mut request = HandlerRequest::new(user_id, payload).with_context(context);
                request.directive = directive;
                (intent, request)
            }
            None => {
                let intent = self.classifier.classify(text, &context).await;
                (intent, HandlerRequest::new(user_id, text).with_context(context))
            }
        };
        tracing::info!(%intent, command = command.is_some(), "routing message");

        let reply = self.dispatcher.dispatch(intent, &request).await;
        self.store.append(user_id, Role::Assistant, &reply).await?;
        Ok(reply)
    }

    async fn purge(&self, user_id: &str) -> Result<u64, RouterError> {
        let removed = self.store.purge(user_id).await?;
        self.dispatcher.forget(user_id);
        tracing::info!(user_id, removed, "conversation purged");
        Ok(removed)
    }

    /// Delete a user's history and in-memory handler state.
    pub async fn forget(&self, user_id: &str) -> Result<u64, RouterError> {
        let _guard = self.locks.acquire(user_id).await;
        self.purge(user_id).await
    }

    /// The last `limit` records for a user, oldest first.
    pub async fn history(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<MessageRecord>, RouterError> {
        Ok(self.store.recent(user_id, limit).await?)
    }
}
