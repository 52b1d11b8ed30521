//! SQLite conversation store.
//!
//! Implements `ConversationStore` from `switchboard-core` with raw sqlx
//! queries, a private Row struct, and split reader/writer pool usage.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;
use uuid::Uuid;

use switchboard_core::conversation::store::ConversationStore;
use switchboard_types::conversation::{MessageRecord, Role};
use switchboard_types::error::RepositoryError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ConversationStore`.
#[derive(Clone)]
pub struct SqliteConversationStore {
    pool: DatabasePool,
}

impl SqliteConversationStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }
}

/// Internal row type for mapping SQLite rows to `MessageRecord`.
struct MessageRow {
    seq: i64,
    id: String,
    user_id: String,
    role: String,
    message: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            seq: row.try_get("seq")?,
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            role: row.try_get("role")?,
            message: row.try_get("message")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_record(self) -> Result<MessageRecord, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
        let role: Role = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(MessageRecord {
            id,
            user_id: self.user_id,
            role,
            text: self.message,
            created_at: parse_datetime(&self.created_at)?,
            sequence: self.seq,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width UTC timestamps so text comparison matches time order.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Connection-level failures mean the store is unreachable; anything else
/// is a query problem.
fn map_sqlx(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::Io(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => RepositoryError::Unavailable(e.to_string()),
        other => RepositoryError::Query(other.to_string()),
    }
}

impl ConversationStore for SqliteConversationStore {
    async fn append(
        &self,
        user_id: &str,
        role: Role,
        text: &str,
    ) -> Result<MessageRecord, RepositoryError> {
        let id = Uuid::now_v7();

        // created_at never moves backwards within a user's log, even if the
        // wall clock does.
        let row = sqlx::query(
            r#"INSERT INTO conversation_messages (id, user_id, role, message, created_at)
               VALUES (?, ?, ?, ?, MAX(?, COALESCE(
                   (SELECT MAX(created_at) FROM conversation_messages WHERE user_id = ?), '')))
               RETURNING seq, id, user_id, role, message, created_at"#,
        )
        .bind(id.to_string())
        .bind(user_id)
        .bind(role.to_string())
        .bind(text)
        .bind(format_datetime(&Utc::now()))
        .bind(user_id)
        .fetch_one(&self.pool.writer)
        .await
        .map_err(map_sqlx)?;

        MessageRow::from_row(&row)
            .map_err(|e| RepositoryError::Query(e.to_string()))?
            .into_record()
    }

    async fn recent(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<MessageRecord>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT * FROM (
                   SELECT seq, id, user_id, role, message, created_at
                   FROM conversation_messages
                   WHERE user_id = ?
                   ORDER BY seq DESC
                   LIMIT ?
               ) ORDER BY seq ASC"#,
        )
        .bind(user_id)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx)?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let message_row =
                MessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            records.push(message_row.into_record()?);
        }

        Ok(records)
    }

    async fn purge(&self, user_id: &str) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM conversation_messages WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx)?;

        Ok(result.rows_affected())
    }
}
