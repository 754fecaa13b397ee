//! Immutable object records.

use std::collections::BTreeMap;
use std::sync::Arc;

use bluenoise_model::types::{MetadataAction, ObjectMetadata};

use crate::storage::BlobHandle;

/// One published version of an object.
///
/// Records are never mutated after publication. A metadata update builds a
/// new record that shares the same [`BlobHandle`].
#[derive(Debug)]
pub struct ObjectRecord {
    /// Descriptive metadata.
    pub metadata: ObjectMetadata,
    /// Committed content.
    pub blob: Arc<BlobHandle>,
}

impl ObjectRecord {
    /// Create a record.
    #[must_use]
    pub fn new(metadata: ObjectMetadata, blob: Arc<BlobHandle>) -> Self {
        Self { metadata, blob }
    }

    /// Build the successor record produced by a custom metadata update.
    #[must_use]
    pub fn with_custom_metadata(
        &self,
        action: MetadataAction,
        pairs: &BTreeMap<String, String>,
    ) -> Self {
        let mut metadata = self.metadata.clone();
        match action {
            MetadataAction::Add | MetadataAction::Update => {
                metadata
                    .custom_metadata
                    .extend(pairs.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            MetadataAction::Delete => {
                metadata
                    .custom_metadata
                    .retain(|k, _| !pairs.contains_key(k));
            }
        }
        Self::new(metadata, Arc::clone(&self.blob))
    }
}

/// Where an object id currently lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
}
