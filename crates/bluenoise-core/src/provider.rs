//! The BlueNoise store provider.
//!
//! [`BlueNoiseStore`] owns every component and is cheap to clone: all fields
//! are reference-counted. Operation handlers live in [`crate::ops`].

use std::sync::Arc;

use dashmap::DashMap;
use tracing::info;

use crate::config::StoreConfig;
use crate::error::StoreResult;
use crate::health::HealthMonitor;
use crate::lock::KeyLocks;
use crate::state::{BucketRegistry, BucketState, ObjectLocation, ObjectRecord};
use crate::storage::DiskStorage;

/// The object store.
#[derive(Debug, Clone)]
pub struct BlueNoiseStore {
    /// Store configuration.
    pub(crate) config: Arc<StoreConfig>,
    /// Persistence layer.
    pub(crate) storage: Arc<DiskStorage>,
    /// Existing buckets and their published objects.
    pub(crate) registry: Arc<BucketRegistry>,
    /// Per-key write locks.
    pub(crate) locks: KeyLocks,
    /// Object id to current location.
    pub(crate) ids: Arc<DashMap<String, ObjectLocation>>,
    /// Liveness probe.
    pub(crate) health: Arc<HealthMonitor>,
}

impl BlueNoiseStore {
    /// Open the store rooted at `config.data_dir`, recovering persisted state.
    pub async fn open(config: StoreConfig) -> StoreResult<Self> {
        let storage = DiskStorage::open(&config.data_dir).await?;
        let loaded = storage.load().await?;

        let ids = DashMap::new();
        let mut buckets = Vec::with_capacity(loaded.len());
        let mut object_count = 0usize;
        for entry in loaded {
            let bucket = BucketState::new(entry.marker.name, entry.marker.created_at);
            for (metadata, blob) in entry.objects {
                ids.insert(
                    metadata.id.clone(),
                    ObjectLocation {
                        bucket: metadata.bucket.clone(),
                        key: metadata.key.clone(),
                    },
                );
                bucket
                    .objects
                    .publish(Arc::new(ObjectRecord::new(metadata, Arc::new(blob))));
                object_count += 1;
            }
            buckets.push(Arc::new(bucket));
        }

        info!(
            data_dir = %config.data_dir,
            buckets = buckets.len(),
            objects = object_count,
            "opened object store"
        );

        let health = HealthMonitor::new(storage.health_dir(), config.health_timeout());
        Ok(Self {
            config: Arc::new(config),
            storage: Arc::new(storage),
            registry: Arc::new(BucketRegistry::from_buckets(buckets)),
            locks: KeyLocks::default(),
            ids: Arc::new(ids),
            health: Arc::new(health),
        })
    }

    /// The configuration the store was opened with.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Whether `bucket` exists.
    pub async fn bucket_exists(&self, bucket: &str) -> bool {
        self.registry.exists(bucket).await
    }
}
