//! Single-node object store for BlueNoise.
//!
//! Buckets are isolated namespaces of objects; objects are immutable binary
//! values addressed by `(bucket, key)` and replaced wholesale on upload.
//!
//! # Architecture
//!
//! ```text
//! BlueNoiseStore (ops: create / put / get / list / delete / search / health)
//!        |
//!        +-- BucketRegistry   (RwLock: exclusive for create, shared for lookup)
//!        |      |
//!        |      v
//!        |   BucketState -> ObjectIndex (published Arc<ObjectRecord> per key)
//!        |
//!        +-- KeyLocks         (per-key mutex for commit-then-publish)
//!        |
//!        +-- DiskStorage      (staging -> blobs, metadata records, recovery)
//!        |
//!        +-- HealthMonitor    (write-then-read probe with timeout)
//! ```

pub mod checksums;
pub mod config;
pub mod error;
pub mod health;
pub mod lock;
mod ops;
pub mod provider;
pub mod state;
pub mod storage;
pub mod validation;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use provider::BlueNoiseStore;
