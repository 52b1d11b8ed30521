//! Agent handlers and the trait they share.
//!
//! Each handler turns one user message into one reply by composing calls to
//! the text model and a third-party service port. Service ports are defined
//! next to the handler that uses them; adapters live in switchboard-infra.

pub mod music;
pub mod news;
pub mod qa;
pub mod reminder;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use switchboard_types::conversation::MessageRecord;
use switchboard_types::error::HandlerError;
use switchboard_types::music::PlaybackControl;

/// An explicit instruction from a command that bypasses free-text parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Playback(PlaybackControl),
    /// Queue the user's last music selection again.
    Replay,
}

/// Everything a handler sees for one message.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    pub user_id: String,
    /// The message text (for commands, the text after the command word).
    pub text: String,
    /// Prior turns for this user, oldest first, excluding the current message.
    pub context: Vec<MessageRecord>,
    pub directive: Option<Directive>,
}

impl HandlerRequest {
    pub fn new(user_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            text: text.into(),
            context: Vec::new(),
            directive: None,
        }
    }

    pub fn with_context(mut self, context: Vec<MessageRecord>) -> Self {
        self.context = context;
        self
    }

    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.directive = Some(directive);
        self
    }
}

/// A task-specific message handler.
///
/// Recoverable service problems are turned into reply text inside the
/// handler; only failures the dispatcher must report (authentication,
/// unexpected errors) come back as `Err`.
pub trait Handler: Send + Sync {
    /// Short name used in logs (e.g. "news").
    fn name(&self) -> &'static str;

    fn handle(
        &self,
        request: &HandlerRequest,
    ) -> impl Future<Output = Result<String, HandlerError>> + Send;

    /// Drop any per-user state the handler keeps in memory.
    fn forget(&self, _user_id: &str) {}
}

impl<H: Handler> Handler for Arc<H> {
    fn name(&self) -> &'static str {
        Handler::name(&**self)
    }

    fn handle(
        &self,
        request: &HandlerRequest,
    ) -> impl Future<Output = Result<String, HandlerError>> + Send {
        Handler::handle(&**self, request)
    }

    fn forget(&self, user_id: &str) {
        Handler::forget(&**self, user_id)
    }
}

/// Object-safe version of [`Handler`] with a boxed future.
pub trait HandlerDyn: Send + Sync {
    fn name(&self) -> &'static str;

    fn handle_boxed<'a>(
        &'a self,
        request: &'a HandlerRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, HandlerError>> + Send + 'a>>;

    fn forget(&self, user_id: &str);
}

impl<T: Handler> HandlerDyn for T {
    fn name(&self) -> &'static str {
        Handler::name(self)
    }

    fn handle_boxed<'a>(
        &'a self,
        request: &'a HandlerRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, HandlerError>> + Send + 'a>> {
        Box::pin(self.handle(request))
    }

    fn forget(&self, user_id: &str) {
        Handler::forget(self, user_id)
    }
}

/// Type-erased handler so the dispatcher can hold one of each family.
pub struct BoxHandler {
    inner: Box<dyn HandlerDyn>,
}

impl BoxHandler {
    pub fn new<T: Handler + 'static>(handler: T) -> Self {
        Self {
            inner: Box::new(handler),
        }
    }

    pub fn name(&self) -> &'static str {
        self.inner.name()
    }

    pub async fn handle(&self, request: &HandlerRequest) -> Result<String, HandlerError> {
        self.inner.handle_boxed(request).await
    }

    pub fn forget(&self, user_id: &str) {
        self.inner.forget(user_id)
    }
}

impl std::fmt::Debug for BoxHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxHandler")
            .field("name", &self.name())
            .finish()
    }
}
