use thiserror::Error;

use crate::llm::LlmError;

/// Errors from conversation store operations (used by trait definitions in switchboard-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The persistence layer could not be reached or refused the write.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("query error: {0}")]
    Query(String),
}

/// Errors loading `config.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },
}

/// Failure to pull a structured object out of free-form model output.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no JSON object found in model output")]
    NoJsonObject,

    #[error("model output did not match the expected shape: {0}")]
    InvalidShape(String),

    #[error("invalid value for '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("model call failed: {0}")]
    Model(#[from] LlmError),
}

/// Errors from third-party service adapters (news, music, calendar).
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} credentials are not configured")]
    NotConfigured(&'static str),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

/// A failure inside a handler that crosses the dispatch boundary.
///
/// Display output is for logs only; users see the per-family message chosen
/// at dispatch.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{service} authentication failed")]
    AuthenticationFailed { service: &'static str },

    #[error("{service} call failed: {source}")]
    Service {
        service: &'static str,
        #[source]
        source: ServiceError,
    },

    #[error("unexpected handler failure: {0}")]
    Unexpected(String),
}

impl HandlerError {
    /// Wrap a service error, lifting auth problems into their own variant.
    pub fn from_service(service: &'static str, err: ServiceError) -> Self {
        match err {
            ServiceError::AuthenticationFailed | ServiceError::NotConfigured(_) => {
                HandlerError::AuthenticationFailed { service }
            }
            other => HandlerError::Service {
                service,
                source: other,
            },
        }
    }
}
