//! Error taxonomy shared by every layer that speaks HTTP.

use std::fmt;

/// Closed set of error codes the service can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorCode {
    /// The request was rejected by the authorizer.
    AccessDenied,
    /// A bucket with this name already exists.
    BucketAlreadyExists,
    /// The upload is larger than the configured maximum.
    EntityTooLarge,
    /// Storage failure.
    #[default]
    InternalError,
    /// The bucket name fails validation.
    InvalidBucketName,
    /// The object key fails validation.
    InvalidKey,
    /// A required parameter is missing or the body is malformed.
    InvalidRequest,
    /// The path exists but not for this method.
    MethodNotAllowed,
    /// The bucket does not exist.
    NoSuchBucket,
    /// The key does not exist in the bucket.
    NoSuchKey,
    /// No object carries the given id.
    NoSuchObject,
    /// No route matches the path.
    NotFound,
    /// The health probe failed.
    ServiceUnavailable,
}

impl ErrorCode {
    /// Returns the error code as a static string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessDenied => "AccessDenied",
            Self::BucketAlreadyExists => "BucketAlreadyExists",
            Self::EntityTooLarge => "EntityTooLarge",
            Self::InternalError => "InternalError",
            Self::InvalidBucketName => "InvalidBucketName",
            Self::InvalidKey => "InvalidKey",
            Self::InvalidRequest => "InvalidRequest",
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::NoSuchBucket => "NoSuchBucket",
            Self::NoSuchKey => "NoSuchKey",
            Self::NoSuchObject => "NoSuchObject",
            Self::NotFound => "NotFound",
            Self::ServiceUnavailable => "ServiceUnavailable",
        }
    }

    /// Parse a code previously produced by [`ErrorCode::as_str`].
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "AccessDenied" => Self::AccessDenied,
            "BucketAlreadyExists" => Self::BucketAlreadyExists,
            "EntityTooLarge" => Self::EntityTooLarge,
            "InternalError" => Self::InternalError,
            "InvalidBucketName" => Self::InvalidBucketName,
            "InvalidKey" => Self::InvalidKey,
            "InvalidRequest" => Self::InvalidRequest,
            "MethodNotAllowed" => Self::MethodNotAllowed,
            "NoSuchBucket" => Self::NoSuchBucket,
            "NoSuchKey" => Self::NoSuchKey,
            "NoSuchObject" => Self::NoSuchObject,
            "NotFound" => Self::NotFound,
            "ServiceUnavailable" => Self::ServiceUnavailable,
            _ => return None,
        })
    }

    /// Returns the default HTTP status code for this error.
    #[must_use]
    pub fn default_status_code(&self) -> http::StatusCode {
        match self {
            Self::InvalidBucketName | Self::InvalidKey | Self::InvalidRequest => {
                http::StatusCode::BAD_REQUEST
            }
            Self::AccessDenied => http::StatusCode::FORBIDDEN,
            Self::NoSuchBucket | Self::NoSuchKey | Self::NoSuchObject | Self::NotFound => {
                http::StatusCode::NOT_FOUND
            }
            Self::MethodNotAllowed => http::StatusCode::METHOD_NOT_ALLOWED,
            Self::BucketAlreadyExists => http::StatusCode::CONFLICT,
            Self::EntityTooLarge => http::StatusCode::PAYLOAD_TOO_LARGE,
            Self::InternalError => http::StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => http::StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Returns the default message for this error.
    #[must_use]
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::AccessDenied => "Access denied",
            Self::BucketAlreadyExists => "The requested bucket name is not available",
            Self::EntityTooLarge => "Your proposed upload exceeds the maximum allowed size",
            Self::InternalError => "We encountered an internal error, please try again",
            Self::InvalidBucketName => "The specified bucket name is not valid",
            Self::InvalidKey => "The specified object key is not valid",
            Self::InvalidRequest => "The request is missing a parameter or is malformed",
            Self::MethodNotAllowed => "The specified method is not allowed against this resource",
            Self::NoSuchBucket => "The specified bucket does not exist",
            Self::NoSuchKey => "The specified key does not exist",
            Self::NoSuchObject => "No object matches the specified id",
            Self::NotFound => "The requested path does not exist",
            Self::ServiceUnavailable => "The service is degraded",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error response.
#[derive(Debug)]
pub struct ApiError {
    /// The error code.
    pub code: ErrorCode,
    /// A human-readable error message.
    pub message: String,
    /// The bucket, key, or path the error refers to.
    pub resource: Option<String>,
    /// The HTTP status code.
    pub status_code: http::StatusCode,
    /// The underlying source error, if any.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl ApiError {
    /// Create an error with the code's default message.
    #[must_use]
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.default_message())
    }

    /// Create an error with a custom message.
    #[must_use]
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: message.into(),
            code,
            resource: None,
            source: None,
        }
    }

    /// Set the resource that caused this error.
    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Set the source error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a NoSuchBucket error.
    #[must_use]
    pub fn no_such_bucket(bucket: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoSuchBucket).with_resource(bucket)
    }

    /// Create a NoSuchKey error.
    #[must_use]
    pub fn no_such_key(key: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoSuchKey).with_resource(key)
    }

    /// Create an InvalidRequest error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, message)
    }

    /// Create an InvalidRequest error for a missing query parameter.
    #[must_use]
    pub fn missing_parameter(name: &str) -> Self {
        Self::invalid_request(format!("Missing required parameter: {name}"))
    }

    /// Create a MethodNotAllowed error.
    #[must_use]
    pub fn method_not_allowed(method: impl Into<String>) -> Self {
        Self::new(ErrorCode::MethodNotAllowed).with_resource(method)
    }

    /// Create a NotFound error for an unrouted path.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound).with_resource(path)
    }

    /// Create an AccessDenied error.
    #[must_use]
    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AccessDenied, message)
    }

    /// Create an InternalError.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, message)
    }

    /// Create a ServiceUnavailable error.
    #[must_use]
    pub fn service_unavailable(reason: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ServiceUnavailable, reason)
    }
}
