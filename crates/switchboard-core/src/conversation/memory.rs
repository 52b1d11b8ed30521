//! Process-local conversation store backed by a `DashMap`.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use switchboard_types::conversation::{MessageRecord, Role};
use switchboard_types::error::RepositoryError;

use super::store::ConversationStore;

/// In-memory [`ConversationStore`]. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    logs: DashMap<String, Vec<MessageRecord>>,
    sequence: AtomicI64,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with at least one stored record.
    pub fn user_count(&self) -> usize {
        self.logs.len()
    }
}

impl ConversationStore for InMemoryConversationStore {
    async fn append(
        &self,
        user_id: &str,
        role: Role,
        text: &str,
    ) -> Result<MessageRecord, RepositoryError> {
        let mut log = self.logs.entry(user_id.to_string()).or_default();

        // Never step backwards in time within one user's log.
        let now = Utc::now();
        let created_at = match log.last() {
            Some(last) if last.created_at > now => last.created_at,
            _ => now,
        };

        let record = MessageRecord {
            id: Uuid::now_v7(),
            user_id: user_id.to_string(),
            role,
            text: text.to_string(),
            created_at,
            sequence: self.sequence.fetch_add(1, Ordering::SeqCst) + 1,
        };
        log.push(record.clone());
        Ok(record)
    }

    async fn recent(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<MessageRecord>, RepositoryError> {
        let Some(log) = self.logs.get(user_id) else {
            return Ok(Vec::new());
        };
        let start = log.len().saturating_sub(limit);
        Ok(log.value()[start..].to_vec())
    }

    async fn purge(&self, user_id: &str) -> Result<u64, RepositoryError> {
        Ok(self
            .logs
            .remove(user_id)
            .map(|(_, log)| log.len() as u64)
            .unwrap_or(0))
    }
}
