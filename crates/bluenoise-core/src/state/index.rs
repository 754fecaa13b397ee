//! Published object index.
//!
//! Uses a `BTreeMap` so listings come out in lexicographic key order without
//! a sort. Each value is an `Arc<ObjectRecord>`: publishing a new version is a
//! single pointer swap under a short write lock, and readers walk away with
//! their own reference to whichever version was current.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::object::ObjectRecord;

/// Sorted map from key to the currently published record.
#[derive(Debug, Default)]
pub struct ObjectIndex {
    records: RwLock<BTreeMap<String, Arc<ObjectRecord>>>,
}

impl ObjectIndex {
    /// The record currently published under `key`.
    #[must_use]
    pub fn current(&self, key: &str) -> Option<Arc<ObjectRecord>> {
        self.records.read().get(key).cloned()
    }

    /// Publish `record` under its key, returning the record it replaced.
    pub fn publish(&self, record: Arc<ObjectRecord>) -> Option<Arc<ObjectRecord>> {
        let key = record.metadata.key.clone();
        self.records.write().insert(key, record)
    }

    /// Remove the record published under `key`.
    pub fn retract(&self, key: &str) -> Option<Arc<ObjectRecord>> {
        self.records.write().remove(key)
    }

    /// All keys at a single point in time, in ascending order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.records.read().keys().cloned().collect()
    }

    /// All records at a single point in time, in ascending key order.
    #[must_use]
    pub fn records(&self) -> Vec<Arc<ObjectRecord>> {
        self.records.read().values().cloned().collect()
    }

    /// Number of published objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}
