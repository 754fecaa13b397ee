//! Bucket operation handlers.

use bluenoise_model::ApiError;
use bluenoise_model::input::CreateBucketInput;
use bluenoise_model::output::CreateBucketOutput;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::provider::BlueNoiseStore;

impl BlueNoiseStore {
    /// Create a bucket.
    ///
    /// Fails with [`StoreError::InvalidBucketName`] before any I/O, or with
    /// [`StoreError::BucketAlreadyExists`] if the name is taken.
    pub async fn create_bucket(&self, input: CreateBucketInput) -> StoreResult<CreateBucketOutput> {
        let bucket = self.registry.create(&input.bucket, &self.storage).await?;
        debug!(bucket = %bucket.name, "create_bucket completed");
        Ok(CreateBucketOutput {
            bucket: bucket.name.clone(),
        })
    }

    /// Wire entry point for [`BlueNoiseStore::create_bucket`].
    pub async fn handle_create_bucket(
        &self,
        input: CreateBucketInput,
    ) -> Result<CreateBucketOutput, ApiError> {
        self.create_bucket(input)
            .await
            .map_err(StoreError::into_api_error)
    }
}
