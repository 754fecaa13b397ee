//! Bucket registry.
//!
//! The bucket table sits behind a `tokio::sync::RwLock`. Lookups take it
//! shared and only hold it long enough to clone an `Arc<BucketState>`;
//! creation takes it exclusively across the marker write so two concurrent
//! creates of the same name resolve to exactly one `Created`.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

use super::bucket::BucketState;
use crate::error::{StoreError, StoreResult};
use crate::storage::{BucketMarker, DiskStorage};
use crate::validation::validate_bucket_name;

/// The set of existing buckets.
#[derive(Debug, Default)]
pub struct BucketRegistry {
    buckets: RwLock<BTreeMap<String, Arc<BucketState>>>,
}

impl BucketRegistry {
    /// Build a registry from buckets recovered at startup.
    #[must_use]
    pub fn from_buckets(buckets: impl IntoIterator<Item = Arc<BucketState>>) -> Self {
        Self {
            buckets: RwLock::new(
                buckets
                    .into_iter()
                    .map(|bucket| (bucket.name.clone(), bucket))
                    .collect(),
            ),
        }
    }

    /// Validate and create a bucket, persisting its marker.
    pub async fn create(
        &self,
        name: &str,
        storage: &DiskStorage,
    ) -> StoreResult<Arc<BucketState>> {
        validate_bucket_name(name)?;

        let mut buckets = self.buckets.write().await;
        if buckets.contains_key(name) {
            return Err(StoreError::BucketAlreadyExists {
                bucket: name.to_owned(),
            });
        }

        let marker = BucketMarker {
            name: name.to_owned(),
            created_at: Utc::now(),
        };
        storage.create_bucket(&marker).await?;

        let bucket = Arc::new(BucketState::new(marker.name, marker.created_at));
        buckets.insert(name.to_owned(), Arc::clone(&bucket));
        info!(bucket = %name, "created bucket");
        Ok(bucket)
    }

    /// Look up a bucket.
    pub async fn get(&self, name: &str) -> StoreResult<Arc<BucketState>> {
        self.buckets
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NoSuchBucket {
                bucket: name.to_owned(),
            })
    }

    /// Whether a bucket exists.
    pub async fn exists(&self, name: &str) -> bool {
        self.buckets.read().await.contains_key(name)
    }

    /// All buckets in name order.
    pub async fn snapshot(&self) -> Vec<Arc<BucketState>> {
        self.buckets.read().await.values().cloned().collect()
    }

    /// Number of buckets.
    pub async fn len(&self) -> usize {
        self.buckets.read().await.len()
    }
}
