//! ConversationStore trait definition.
//!
//! Same RPITIT pattern as the other ports in this crate.

use switchboard_types::conversation::{MessageRecord, Role};
use switchboard_types::error::RepositoryError;

/// Append-only, per-user message log.
///
/// Implementations live in switchboard-infra (e.g.,
/// `SqliteConversationStore`) plus [`super::memory::InMemoryConversationStore`].
pub trait ConversationStore: Send + Sync {
    /// Persist a new record and return it with its assigned id, timestamp,
    /// and sequence. The record is durable once this returns.
    fn append(
        &self,
        user_id: &str,
        role: Role,
        text: &str,
    ) -> impl std::future::Future<Output = Result<MessageRecord, RepositoryError>> + Send;

    /// The last `limit` records for a user, oldest first. Unknown users
    /// yield an empty list.
    fn recent(
        &self,
        user_id: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<MessageRecord>, RepositoryError>> + Send;

    /// Delete every record for a user. Returns how many were removed;
    /// purging an unknown user is not an error.
    fn purge(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
