//! Object put, get, and delete handlers.
//!
//! Writes follow commit-then-publish:
//!
//! 1. Content is staged to a private file outside any lock.
//! 2. Under the key lock the blob is committed, its metadata record is
//!    written, and only then is the new record published in the bucket index.
//! 3. The replaced record's blob is retired and disappears once the last
//!    in-flight reader drops it.
//!
//! Reads clone the published record and read its blob without taking the key
//! lock, so they never observe a partially written object.

use std::collections::BTreeMap;
use std::sync::Arc;

use bluenoise_model::ApiError;
use bluenoise_model::input::{
    DEFAULT_CONTENT_TYPE, DeleteObjectInput, GetObjectInput, PutObjectInput,
};
use bluenoise_model::output::{DeleteObjectOutput, GetObjectOutput, PutObjectOutput};
use bluenoise_model::types::ObjectMetadata;
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use super::run_to_completion;
use crate::checksums;
use crate::error::{StoreError, StoreResult};
use crate::provider::BlueNoiseStore;
use crate::state::{ObjectLocation, ObjectRecord};
use crate::validation::validate_key;

impl BlueNoiseStore {
    /// Store an object, replacing any existing object under the same key.
    pub async fn put_object(&self, input: PutObjectInput) -> StoreResult<PutObjectOutput> {
        let bucket = self.registry.get(&input.bucket).await?;
        validate_key(&input.key)?;

        let size = input.body.len() as u64;
        if size > self.config.max_object_size {
            return Err(StoreError::EntityTooLarge {
                size,
                max: self.config.max_object_size,
            });
        }

        let content_type = if input.content_type.trim().is_empty() {
            DEFAULT_CONTENT_TYPE.to_owned()
        } else {
            input.content_type
        };
        let sha256 = checksums::sha256_hex(&input.body);
        let staged = self.storage.stage_blob(input.body).await?;

        let store = self.clone();
        let key = input.key;
        let metadata = run_to_completion(async move {
            let _guard = store.locks.lock(&bucket.name, &key).await;

            let id = Uuid::new_v4().to_string();
            let blob = Arc::new(store.storage.commit_blob(staged, &id).await?);
            let metadata = ObjectMetadata {
                id: id.clone(),
                bucket: bucket.name.clone(),
                key: key.clone(),
                content_type,
                size,
                sha256,
                uploaded_at: Utc::now(),
                custom_metadata: BTreeMap::new(),
            };
            if let Err(e) = store.storage.write_metadata(&metadata).await {
                blob.retire();
                return Err(e);
            }

            let record = Arc::new(ObjectRecord::new(metadata.clone(), blob));
            if let Some(previous) = bucket.objects.publish(record) {
                previous.blob.retire();
                store.ids.remove(&previous.metadata.id);
            }
            store.ids.insert(
                id,
                ObjectLocation {
                    bucket: bucket.name.clone(),
                    key,
                },
            );
            Ok(metadata)
        })
        .await?;

        info!(
            bucket = %metadata.bucket,
            key = %metadata.key,
            id = %metadata.id,
            size = metadata.size,
            "stored object"
        );
        Ok(PutObjectOutput { metadata })
    }

    /// Read the currently published version of an object.
    pub async fn get_object(&self, input: GetObjectInput) -> StoreResult<GetObjectOutput> {
        let bucket = self.registry.get(&input.bucket).await?;
        let record = bucket
            .objects
            .current(&input.key)
            .ok_or_else(|| StoreError::NoSuchKey {
                bucket: input.bucket.clone(),
                key: input.key.clone(),
            })?;

        let body = record.blob.read().await?;
        debug!(bucket = %input.bucket, key = %input.key, size = body.len(), "get_object completed");
        Ok(GetObjectOutput {
            body,
            metadata: record.metadata.clone(),
        })
    }

    /// Remove an object. A missing key is reported as [`StoreError::NoSuchKey`].
    pub async fn delete_object(&self, input: DeleteObjectInput) -> StoreResult<DeleteObjectOutput> {
        let bucket = self.registry.get(&input.bucket).await?;

        let store = self.clone();
        let DeleteObjectInput {
            bucket: bucket_name,
            key,
        } = input;
        run_to_completion(async move {
            let _guard = store.locks.lock(&bucket.name, &key).await;

            if bucket.objects.current(&key).is_none() {
                return Err(StoreError::NoSuchKey {
                    bucket: bucket_name,
                    key,
                });
            }

            store.storage.remove_metadata(&bucket.name, &key).await?;
            if let Some(previous) = bucket.objects.retract(&key) {
                previous.blob.retire();
                store.ids.remove(&previous.metadata.id);
            }

            info!(bucket = %bucket_name, key = %key, "deleted object");
            Ok(DeleteObjectOutput {
                bucket: bucket_name,
                key,
            })
        })
        .await
    }

    /// Wire entry point for [`BlueNoiseStore::put_object`].
    pub async fn handle_put_object(&self, input: PutObjectInput) -> Result<PutObjectOutput, ApiError> {
        self.put_object(input)
            .await
            .map_err(StoreError::into_api_error)
    }

    /// Wire entry point for [`BlueNoiseStore::get_object`].
    pub async fn handle_get_object(&self, input: GetObjectInput) -> Result<GetObjectOutput, ApiError> {
        self.get_object(input)
            .await
            .map_err(StoreError::into_api_error)
    }

    /// Wire entry point for [`BlueNoiseStore::delete_object`].
    pub async fn handle_delete_object(
        &self,
        input: DeleteObjectInput,
    ) -> Result<DeleteObjectOutput, ApiError> {
        self.delete_object(input)
            .await
            .map_err(StoreError::into_api_error)
    }
}
