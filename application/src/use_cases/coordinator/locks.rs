//! Per-entity write serialization.
//!
//! Every mutation of a session or workflow runs its read-modify-write while
//! holding that entity's lock, so two calls on the same id never interleave.
//! Calls on different ids proceed in parallel.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap<K> = HashMap<K, Arc<AsyncMutex<()>>>;

/// A map of async mutexes keyed by entity id.
///
/// Entries are created on first use and dropped again once no caller holds
/// or waits for them, so the map only tracks ids with calls in flight.
pub(crate) struct EntityLocks<K> {
    locks: Mutex<LockMap<K>>,
}

impl<K: Eq + Hash + Clone> EntityLocks<K> {
    pub(crate) fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Wait for exclusive access to `key`.
    pub(crate) async fn acquire(&self, key: &K) -> EntityGuard<'_, K> {
        let lock = Arc::clone(
            self.map()
                .entry(key.clone())
                .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
        );
        EntityGuard {
            guard: Some(lock.lock_owned().await),
            key: key.clone(),
            owner: self,
        }
    }

    fn map(&self) -> MutexGuard<'_, LockMap<K>> {
        self.locks.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Drop the entry for `key` if the map holds the only handle.
    fn release(&self, key: &K) {
        let mut locks = self.map();
        if locks
            .get(key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(key);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.map().len()
    }
}

/// Exclusive access to one entity, released on drop.
pub(crate) struct EntityGuard<'a, K: Eq + Hash + Clone> {
    guard: Option<OwnedMutexGuard<()>>,
    key: K,
    owner: &'a EntityLocks<K>,
}

impl<K: Eq + Hash + Clone> Drop for EntityGuard<'_, K> {
    fn drop(&mut self) {
        // Unlock first so our handle no longer counts
        self.guard.take();
        self.owner.release(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_is_serialized() {
        let locks = Arc::new(EntityLocks::<String>::new());
        let guard = locks.acquire(&"s-1".to_string()).await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire(&"s-1".to_string()).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let locks = EntityLocks::<String>::new();
        let _first = locks.acquire(&"a".to_string()).await;
        let _second = locks.acquire(&"b".to_string()).await;
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_entries_are_released_after_use() {
        let locks = EntityLocks::<String>::new();
        for i in 0..50 {
            let _guard = locks.acquire(&format!("s-{}", i)).await;
        }
        assert_eq!(locks.len(), 0);

        let held = locks.acquire(&"kept".to_string()).await;
        drop(locks.acquire(&"gone".to_string()).await);
        assert_eq!(locks.len(), 1);
        drop(held);
        assert_eq!(locks.len(), 0);
    }
}
