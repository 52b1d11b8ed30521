//! Handler dispatch: one handler per intent, failures turned into replies.

use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;

use switchboard_types::error::HandlerError;
use switchboard_types::intent::Intent;

use crate::handler::{BoxHandler, HandlerRequest};

/// User-facing reply when a handler of `intent` fails unexpectedly.
pub fn failure_message(intent: Intent) -> &'static str {
    match intent {
        Intent::News => "⚠️ I couldn't fetch the news right now. Try again later.",
        Intent::Music => "⚠️ Something went wrong with music playback. Try again later.",
        Intent::Reminder => "⚠️ Could not create the reminder. Try a simpler description.",
        Intent::Qa => "⚠️ I'm having trouble processing that. Try again later.",
    }
}

/// Static intent -> handler table.
pub struct Dispatcher {
    news: BoxHandler,
    music: BoxHandler,
    reminder: BoxHandler,
    qa: BoxHandler,
}

impl Dispatcher {
    pub fn new(news: BoxHandler, music: BoxHandler, reminder: BoxHandler, qa: BoxHandler) -> Self {
        Self {
            news,
            music,
            reminder,
            qa,
        }
    }

    pub fn handler_for(&self, intent: Intent) -> &BoxHandler {
        match intent {
            Intent::News => &self.news,
            Intent::Music => &self.music,
            Intent::Reminder => &self.reminder,
            Intent::Qa => &self.qa,
        }
    }

    /// Run the handler for `intent`. Always produces exactly one reply:
    /// errors and panics are logged and replaced by a per-family message.
    #[tracing::instrument(name = "dispatch", skip_all, fields(intent = %intent, user_id = %request.user_id))]
    pub async fn dispatch(&self, intent: Intent, request: &HandlerRequest) -> String {
        let handler = self.handler_for(intent);
        let outcome = AssertUnwindSafe(handler.handle(request)).catch_unwind().await;

        match outcome {
            Ok(Ok(reply)) if !reply.trim().is_empty() => reply,
            Ok(Ok(_)) => {
                tracing::warn!(handler = handler.name(), "handler returned an empty reply");
                failure_message(intent).to_string()
            }
            Ok(Err(HandlerError::AuthenticationFailed { service })) => {
                tracing::warn!(handler = handler.name(), service, "external authentication failed");
                format!("⚠️ {service} authentication failed.")
            }
            Ok(Err(e)) => {
                tracing::error!(handler = handler.name(), error = %e, "handler failed");
                failure_message(intent).to_string()
            }
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!(handler = handler.name(), panic = %message, "handler panicked");
                failure_message(intent).to_string()
            }
        }
    }

    /// Clear per-user state held by every handler.
    pub fn forget(&self, user_id: &str) {
        for intent in Intent::ALL {
            self.handler_for(intent).forget(user_id);
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("news", &self.news.name())
            .field("music", &self.music.name())
            .field("reminder", &self.reminder.name())
            .field("qa", &self.qa.name())
            .finish()
    }
}
