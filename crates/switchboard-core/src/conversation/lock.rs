//! Per-user async locks that linearize requests from the same user.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per user id.
///
/// A guard is held for the whole request pipeline, so two messages from the
/// same user never interleave their append/classify/dispatch steps while
/// different users proceed concurrently.
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `user_id`.
    pub async fn acquire(&self, user_id: &str) -> OwnedMutexGuard<()> {
        // Clone the Arc out before awaiting so the map shard is not held.
        let lock = self
            .locks
            .entry(user_id.to_string())
            .or_default()
            .value()
            .clone();
        lock.lock_owned().await
    }

    /// Drop locks nobody holds or waits on.
    pub fn prune(&self) {
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    /// Number of tracked users.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
