//! Shared record types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata describing one stored object.
///
/// A new `id` is assigned every time the object's content is written, so an id
/// names one specific version of one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    /// Unique object id (UUID v4).
    pub id: String,
    /// Bucket the object lives in.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Declared content type.
    pub content_type: String,
    /// Content length in bytes.
    pub size: u64,
    /// Lowercase hex SHA-256 of the content.
    pub sha256: String,
    /// Time the content was stored.
    pub uploaded_at: DateTime<Utc>,
    /// User-supplied key/value pairs.
    #[serde(default)]
    pub custom_metadata: BTreeMap<String, String>,
}

impl ObjectMetadata {
    /// The quoted entity tag derived from the content digest.
    #[must_use]
    pub fn etag(&self) -> String {
        format!("\"{}\"", self.sha256)
    }
}

/// How a custom metadata update is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataAction {
    /// Insert the given pairs, overwriting existing keys.
    Add,
    /// Same as [`MetadataAction::Add`].
    Update,
    /// Remove the given keys; values are ignored.
    Delete,
}

/// Outcome of a health probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// The persistence layer answered the probe in time.
    Healthy,
    /// The probe failed or timed out.
    Degraded(String),
}
