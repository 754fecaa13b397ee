//! Custom metadata updates.
//!
//! An update never edits a published record in place. It builds a successor
//! record with the merged metadata, persists it, and swaps it into the index
//! under the key lock. Content is shared with the predecessor.

use std::sync::Arc;

use bluenoise_model::ApiError;
use bluenoise_model::input::UpdateMetadataInput;
use bluenoise_model::output::UpdateMetadataOutput;
use tracing::info;

use super::run_to_completion;
use crate::error::{StoreError, StoreResult};
use crate::provider::BlueNoiseStore;

impl BlueNoiseStore {
    /// Apply a custom metadata update to the object with `input.id`.
    pub async fn update_metadata(
        &self,
        input: UpdateMetadataInput,
    ) -> StoreResult<UpdateMetadataOutput> {
        let no_such_object = |id: &str| StoreError::NoSuchObject { id: id.to_owned() };

        let location = self
            .ids
            .get(&input.id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| no_such_object(&input.id))?;
        let bucket = self.registry.get(&location.bucket).await?;

        let store = self.clone();
        let metadata = run_to_completion(async move {
            let _guard = store.locks.lock(&location.bucket, &location.key).await;

            // The key may have been overwritten or deleted while we waited.
            let current = bucket
                .objects
                .current(&location.key)
                .filter(|record| record.metadata.id == input.id)
                .ok_or_else(|| no_such_object(&input.id))?;

            let next = current.with_custom_metadata(input.action, &input.custom_metadata);
            store.storage.write_metadata(&next.metadata).await?;
            let metadata = next.metadata.clone();
            bucket.objects.publish(Arc::new(next));
            Ok(metadata)
        })
        .await?;

        info!(
            bucket = %metadata.bucket,
            key = %metadata.key,
            id = %metadata.id,
            "updated custom metadata"
        );
        Ok(UpdateMetadataOutput { metadata })
    }

    /// Wire entry point for [`BlueNoiseStore::update_metadata`].
    pub async fn handle_update_metadata(
        &self,
        input: UpdateMetadataInput,
    ) -> Result<UpdateMetadataOutput, ApiError> {
        self.update_metadata(input)
            .await
            .map_err(StoreError::into_api_error)
    }
}
