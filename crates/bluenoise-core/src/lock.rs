//! Per-key write serialization.
//!
//! [`KeyLocks`] hands out one async mutex per `(bucket, key)` pair. Writers
//! (put, delete, metadata update) hold the [`KeyGuard`] across the
//! commit-then-publish step so operations on the same key are linearizable.
//! Readers never touch these locks.
//!
//! Slots are created on demand and removed again when the last interested
//! task releases them, so the table only holds keys with in-flight writes.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type SlotKey = (String, String);

/// Table of per-key write locks.
#[derive(Debug, Clone, Default)]
pub struct KeyLocks {
    slots: Arc<DashMap<SlotKey, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    /// Wait for exclusive write access to `bucket`/`key`.
    pub async fn lock(&self, bucket: &str, key: &str) -> KeyGuard {
        let slot_key = (bucket.to_owned(), key.to_owned());
        let slot = Arc::clone(self.slots.entry(slot_key.clone()).or_default().value());
        let guard = Arc::clone(&slot).lock_owned().await;
        KeyGuard {
            locks: self.clone(),
            slot_key,
            slot,
            guard: Some(guard),
        }
    }

    /// Number of keys with an in-flight or waiting writer.
    #[must_use]
    pub fn active(&self) -> usize {
        self.slots.len()
    }
}

/// Exclusive write access to one key; released on drop.
#[derive(Debug)]
pub struct KeyGuard {
    locks: KeyLocks,
    slot_key: SlotKey,
    slot: Arc<Mutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // The table and this guard are the only owners when nobody is waiting.
        self.locks
            .slots
            .remove_if(&self.slot_key, |_, slot| {
                Arc::ptr_eq(slot, &self.slot) && Arc::strong_count(slot) == 2
            });
    }
}
