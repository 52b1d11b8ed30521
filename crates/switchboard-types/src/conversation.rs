//! Conversation record types.
//!
//! A [`MessageRecord`] is one immutable line of a user's conversation log.
//! The most recent records for a user form the context window that the
//! classifier and the question-answering handler see.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::llm::MessageRole;

/// Number of records returned by a context window request when the caller
/// does not specify a limit.
pub const DEFAULT_CONTEXT_LIMIT: usize = 5;

/// Who produced a conversation record.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (role IN ('user', 'assistant'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(format!("invalid conversation role: '{other}'")),
        }
    }
}

impl From<Role> for MessageRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => MessageRole::User,
            Role::Assistant => MessageRole::Assistant,
        }
    }
}

/// A single persisted conversation line.
///
/// Records are never updated. Per-user ordering is by `sequence`, which the
/// store assigns at insertion time; `created_at` never decreases within a
/// user's log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: Uuid,
    pub user_id: String,
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// Store-assigned insertion sequence.
    pub sequence: i64,
}

/// Render records as `role: text` lines for inclusion in a prompt.
pub fn render_transcript(records: &[MessageRecord]) -> String {
    records
        .iter()
        .map(|r| format!("{}: {}", r.role, r.text))
        .collect::<Vec<_>>()
        .join("\n")
}
