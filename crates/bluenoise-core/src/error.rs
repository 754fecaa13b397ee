//! Store error types.
//!
//! [`StoreError`] is the closed set of outcomes a store operation can fail
//! with. Converting it into a wire [`ApiError`] attaches the matching
//! [`ErrorCode`] and therefore the HTTP status.
//!
//! ```
//! use bluenoise_core::error::StoreError;
//! use bluenoise_model::{ApiError, ErrorCode};
//!
//! let err = StoreError::NoSuchBucket {
//!     bucket: "photos".to_owned(),
//! };
//! let api: ApiError = err.into();
//! assert_eq!(api.code, ErrorCode::NoSuchBucket);
//! ```

use bluenoise_model::{ApiError, ErrorCode};

/// Store error type.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The bucket name fails validation.
    #[error("Invalid bucket name: {name}: {reason}")]
    InvalidBucketName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The object key fails validation.
    #[error("Invalid key: {reason}")]
    InvalidKey {
        /// Why it was rejected.
        reason: String,
    },

    /// The bucket does not exist.
    #[error("The specified bucket does not exist: {bucket}")]
    NoSuchBucket {
        /// The missing bucket.
        bucket: String,
    },

    /// A bucket with this name already exists.
    #[error("The requested bucket name is not available: {bucket}")]
    BucketAlreadyExists {
        /// The taken name.
        bucket: String,
    },

    /// The key does not exist in the bucket.
    #[error("The specified key does not exist: {bucket}/{key}")]
    NoSuchKey {
        /// Bucket searched.
        bucket: String,
        /// Missing key.
        key: String,
    },

    /// No published object carries this id.
    #[error("No object with id {id}")]
    NoSuchObject {
        /// The unknown id.
        id: String,
    },

    /// The object is larger than the configured maximum.
    #[error("Object of {size} bytes exceeds the maximum of {max} bytes")]
    EntityTooLarge {
        /// Submitted size.
        size: u64,
        /// Configured ceiling.
        max: u64,
    },

    /// Persistence failure with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl StoreError {
    /// Convert this error into an [`ApiError`].
    #[must_use]
    pub fn into_api_error(self) -> ApiError {
        ApiError::from(self)
    }

    /// The wire error code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidBucketName { .. } => ErrorCode::InvalidBucketName,
            Self::InvalidKey { .. } => ErrorCode::InvalidKey,
            Self::NoSuchBucket { .. } => ErrorCode::NoSuchBucket,
            Self::BucketAlreadyExists { .. } => ErrorCode::BucketAlreadyExists,
            Self::NoSuchKey { .. } => ErrorCode::NoSuchKey,
            Self::NoSuchObject { .. } => ErrorCode::NoSuchObject,
            Self::EntityTooLarge { .. } => ErrorCode::EntityTooLarge,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    fn resource(&self) -> Option<String> {
        match self {
            Self::InvalidBucketName { name: bucket, .. }
            | Self::NoSuchBucket { bucket }
            | Self::BucketAlreadyExists { bucket } => Some(bucket.clone()),
            Self::NoSuchKey { bucket, key } => Some(format!("{bucket}/{key}")),
            Self::NoSuchObject { id } => Some(id.clone()),
            Self::InvalidKey { .. } | Self::EntityTooLarge { .. } | Self::Internal(_) => None,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let code = err.code();
        let resource = err.resource();
        // Internal details stay in the logs.
        let message = if code == ErrorCode::InternalError {
            tracing::error!(error = ?err, "storage failure");
            code.default_message().to_owned()
        } else {
            err.to_string()
        };

        let api = ApiError::with_message(code, message);
        match resource {
            Some(resource) => api.with_resource(resource),
            None => api,
        }
    }
}

/// Convenience result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_convert_no_such_bucket() {
        let api: ApiError = StoreError::NoSuchBucket {
            bucket: "photos".to_owned(),
        }
        .into();
        assert_eq!(api.code, ErrorCode::NoSuchBucket);
        assert_eq!(api.status_code.as_u16(), 404);
        assert!(api.message.contains("photos"));
        assert_eq!(api.resource.as_deref(), Some("photos"));
    }

    #[test]
    fn test_should_convert_no_such_key_with_full_resource() {
        let api = StoreError::NoSuchKey {
            bucket: "photos".to_owned(),
            key: "a.png".to_owned(),
        }
        .into_api_error();
        assert_eq!(api.code, ErrorCode::NoSuchKey);
        assert_eq!(api.resource.as_deref(), Some("photos/a.png"));
    }

    #[test]
    fn test_should_convert_conflict_and_validation() {
        let cases = [
            (
                StoreError::BucketAlreadyExists {
                    bucket: "x".to_owned(),
                },
                409,
            ),
            (
                StoreError::InvalidBucketName {
                    name: "a b".to_owned(),
                    reason: "space".to_owned(),
                },
                400,
            ),
            (
                StoreError::InvalidKey {
                    reason: "empty".to_owned(),
                },
                400,
            ),
            (StoreError::EntityTooLarge { size: 2, max: 1 }, 413),
        ];
        for (err, status) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status_code.as_u16(), status);
        }
    }

    #[test]
    fn test_should_hide_internal_details() {
        let api: ApiError = StoreError::Internal(anyhow::anyhow!("disk on fire at /var")).into();
        assert_eq!(api.code, ErrorCode::InternalError);
        assert!(!api.message.contains("/var"));
    }
}
