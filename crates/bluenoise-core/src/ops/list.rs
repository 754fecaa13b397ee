//! Listing and search handlers.

use bluenoise_model::ApiError;
use bluenoise_model::input::{ListObjectsInput, SearchObjectsInput};
use bluenoise_model::output::{ListObjectsOutput, SearchObjectsOutput};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::provider::BlueNoiseStore;

impl BlueNoiseStore {
    /// List the keys of a bucket in lexicographic order.
    ///
    /// The result is a snapshot: writes that complete after the snapshot is
    /// taken are not reflected.
    pub async fn list_objects(&self, input: ListObjectsInput) -> StoreResult<ListObjectsOutput> {
        let bucket = self.registry.get(&input.bucket).await?;
        let keys = bucket.objects.keys();
        debug!(bucket = %input.bucket, count = keys.len(), "list_objects completed");
        Ok(ListObjectsOutput { keys })
    }

    /// Find objects whose key or bucket name equals the query.
    ///
    /// Results are ordered by bucket name, then key.
    pub async fn search_objects(
        &self,
        input: SearchObjectsInput,
    ) -> StoreResult<SearchObjectsOutput> {
        let query = input.query;
        let mut objects = Vec::new();
        for bucket in self.registry.snapshot().await {
            let bucket_matches = bucket.name == query;
            objects.extend(
                bucket
                    .objects
                    .records()
                    .into_iter()
                    .filter(|record| bucket_matches || record.metadata.key == query)
                    .map(|record| record.metadata.clone()),
            );
        }
        debug!(query = %query, count = objects.len(), "search_objects completed");
        Ok(SearchObjectsOutput { objects })
    }

    /// Wire entry point for [`BlueNoiseStore::list_objects`].
    pub async fn handle_list_objects(
        &self,
        input: ListObjectsInput,
    ) -> Result<ListObjectsOutput, ApiError> {
        self.list_objects(input)
            .await
            .map_err(StoreError::into_api_error)
    }

    /// Wire entry point for [`BlueNoiseStore::search_objects`].
    pub async fn handle_search_objects(
        &self,
        input: SearchObjectsInput,
    ) -> Result<SearchObjectsOutput, ApiError> {
        self.search_objects(input)
            .await
            .map_err(StoreError::into_api_error)
    }
}
