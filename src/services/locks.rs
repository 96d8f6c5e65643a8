//! Per-user mutual exclusion for account mutations.
//!
//! A read-compute-write sequence on an account spans awaits, so two
//! interleaved handlers for the same user could otherwise overwrite
//! each other's save (the classic lost update). Holding the user's
//! lock across the whole sequence serializes them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Default)]
pub struct AccountLocks {
    inner: Mutex<HashMap<u64, Arc<AsyncMutex<()>>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for one user. Locks for distinct users are
    /// independent. Idle lock entries are reclaimed on the next acquire.
    pub async fn acquire(&self, user_id: u64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap();
            map.retain(|id, lock| *id == user_id || Arc::strong_count(lock) > 1);
            map.entry(user_id)
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_user_is_serialized() {
        let locks = Arc::new(AccountLocks::new());

        let guard = locks.acquire(1).await;

        let locks2 = locks.clone();
        let contender = tokio::spawn(async move {
            let _guard = locks2.acquire(1).await;
        });

        // The second acquire cannot finish while the guard is held.
        tokio::task::yield_now().await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn different_users_are_independent() {
        let locks = AccountLocks::new();

        let _one = locks.acquire(1).await;
        // Must not deadlock.
        let _two = locks.acquire(2).await;
    }

    #[tokio::test]
    async fn idle_entries_are_reclaimed() {
        let locks = AccountLocks::new();

        drop(locks.acquire(1).await);
        drop(locks.acquire(2).await);
        let _held = locks.acquire(3).await;

        assert_eq!(locks.inner.lock().unwrap().len(), 1);
    }
}
