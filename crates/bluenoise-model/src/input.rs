//! Typed operation inputs.

use std::collections::BTreeMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::types::MetadataAction;

/// Content type applied when the client declares none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Input for `CreateBucket`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBucketInput {
    /// Name of the bucket to create.
    pub bucket: String,
}

/// Input for `PutObject`.
#[derive(Debug, Clone)]
pub struct PutObjectInput {
    /// Target bucket.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Full object content.
    pub body: Bytes,
    /// Declared content type.
    pub content_type: String,
}

/// Input for `GetObject`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetObjectInput {
    /// Bucket to read from.
    pub bucket: String,
    /// Object key.
    pub key: String,
}

/// Input for `ListObjects`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListObjectsInput {
    /// Bucket to enumerate.
    pub bucket: String,
}

/// Input for `DeleteObject`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteObjectInput {
    /// Bucket to delete from.
    pub bucket: String,
    /// Object key.
    pub key: String,
}

/// Input for `Health`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HealthInput;

/// Input for `SearchObjects`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchObjectsInput {
    /// Matched against object keys and bucket names.
    pub query: String,
}

/// Input for `UpdateMetadata`, carried as a JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateMetadataInput {
    /// Id of the object to update.
    pub id: String,
    /// Pairs to merge, or keys to remove for [`MetadataAction::Delete`].
    #[serde(default)]
    pub custom_metadata: BTreeMap<String, String>,
    /// How to apply `custom_metadata`.
    pub action: MetadataAction,
}
