//! Per-bucket state.

use chrono::{DateTime, Utc};

use super::index::ObjectIndex;

/// A bucket and its published objects.
#[derive(Debug)]
pub struct BucketState {
    /// Bucket name.
    pub name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Published objects.
    pub objects: ObjectIndex,
}

impl BucketState {
    /// Create an empty bucket.
    #[must_use]
    pub fn new(name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            created_at,
            objects: ObjectIndex::default(),
        }
    }
}
