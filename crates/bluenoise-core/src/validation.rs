//! Bucket name and object key validation.
//!
//! Bucket names double as directory names in the persistence layer, so they
//! are restricted to a filesystem-safe alphabet. Keys are never used as paths
//! and only need to be non-empty, bounded, and free of control characters.

use crate::error::StoreError;

/// Minimum bucket name length.
const MIN_BUCKET_NAME_LEN: usize = 1;

/// Maximum bucket name length.
const MAX_BUCKET_NAME_LEN: usize = 63;

/// Maximum object key length in bytes.
const MAX_KEY_LEN: usize = 1024;

/// Validate a bucket name.
///
/// Accepts 1 to 63 ASCII letters, digits, hyphens, and underscores. Names are
/// case-sensitive.
///
/// # Examples
///
/// ```
/// use bluenoise_core::validation::validate_bucket_name;
///
/// assert!(validate_bucket_name("photos").is_ok());
/// assert!(validate_bucket_name("My_Bucket-01").is_ok());
/// assert!(validate_bucket_name("no/slashes").is_err());
/// ```
pub fn validate_bucket_name(name: &str) -> Result<(), StoreError> {
    let invalid = |reason: &str| StoreError::InvalidBucketName {
        name: name.to_owned(),
        reason: reason.to_owned(),
    };

    if name.len() < MIN_BUCKET_NAME_LEN {
        return Err(invalid("bucket name must not be empty"));
    }
    if name.len() > MAX_BUCKET_NAME_LEN {
        return Err(invalid(&format!(
            "bucket name must be at most {MAX_BUCKET_NAME_LEN} characters"
        )));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(invalid(&format!("character {c:?} is not allowed")));
    }

    Ok(())
}

/// Validate an object key.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let invalid = |reason: String| StoreError::InvalidKey { reason };

    if key.is_empty() {
        return Err(invalid("object key must not be empty".to_owned()));
    }
    if key.len() > MAX_KEY_LEN {
        return Err(invalid(format!(
            "object key must be at most {MAX_KEY_LEN} bytes"
        )));
    }
    if key.chars().any(char::is_control) {
        return Err(invalid(
            "object key must not contain control characters".to_owned(),
        ));
    }

    Ok(())
}
