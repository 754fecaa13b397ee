//! Client error type.

use bluenoise_model::ErrorCode;
use reqwest::StatusCode;

/// Errors returned by [`BlueNoiseClient`](crate::BlueNoiseClient).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The base URL could not be used.
    #[error("invalid base url {url}: {reason}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with an error status.
    #[error("{status} {code}: {message}")]
    Api {
        /// HTTP status of the response.
        status: StatusCode,
        /// Error code from the `x-error-code` header.
        code: ErrorCode,
        /// Human-readable message from the body.
        message: String,
    },

    /// A success response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ClientError {
    /// The server-side error code, for [`ClientError::Api`].
    #[must_use]
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Build an [`ClientError::Api`] from an error response.
///
/// The body is expected as `"<Code>: <message>\n"`; anything else is kept
/// verbatim as the message.
pub(crate) fn from_response(status: StatusCode, code_header: Option<&str>, body: &str) -> ClientError {
    let code = code_header
        .and_then(ErrorCode::from_code)
        .unwrap_or_else(|| code_for_status(status));
    let body = body.trim_end();
    let message = body
        .strip_prefix(code.as_str())
        .and_then(|rest| rest.strip_prefix(": "))
        .unwrap_or(body)
        .to_owned();
    ClientError::Api {
        status,
        code,
        message,
    }
}

/// Best guess for responses that lack an `x-error-code` header.
fn code_for_status(status: StatusCode) -> ErrorCode {
    match status.as_u16() {
        400 => ErrorCode::InvalidRequest,
        403 => ErrorCode::AccessDenied,
        404 => ErrorCode::NotFound,
        405 => ErrorCode::MethodNotAllowed,
        413 => ErrorCode::EntityTooLarge,
        503 => ErrorCode::ServiceUnavailable,
        _ => ErrorCode::InternalError,
    }
}
