//! Typed operation outputs.

use bytes::Bytes;

use crate::types::{HealthStatus, ObjectMetadata};

/// Output of `CreateBucket`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBucketOutput {
    /// Name of the created bucket.
    pub bucket: String,
}

/// Output of `PutObject`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObjectOutput {
    /// Metadata of the newly published object.
    pub metadata: ObjectMetadata,
}

/// Output of `GetObject`.
#[derive(Debug, Clone)]
pub struct GetObjectOutput {
    /// Full object content.
    pub body: Bytes,
    /// Metadata of the version that was read.
    pub metadata: ObjectMetadata,
}

/// Output of `ListObjects`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListObjectsOutput {
    /// Keys in ascending lexicographic order.
    pub keys: Vec<String>,
}

/// Output of `DeleteObject`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteObjectOutput {
    /// Bucket the object was removed from.
    pub bucket: String,
    /// Removed key.
    pub key: String,
}

/// Output of `Health`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthOutput {
    /// Probe result.
    pub status: HealthStatus,
}

/// Output of `SearchObjects`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchObjectsOutput {
    /// Matches ordered by bucket then key.
    pub objects: Vec<ObjectMetadata>,
}

/// Output of `UpdateMetadata`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateMetadataOutput {
    /// The record as published after the update.
    pub metadata: ObjectMetadata,
}
