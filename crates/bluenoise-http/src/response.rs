//! Typed output to HTTP response conversion.
//!
//! Confirmations are `text/plain` lines, downloads return the raw content with
//! its metadata in headers, listings are newline-delimited keys, and search or
//! metadata updates return JSON.

use bluenoise_model::ApiError;
use bluenoise_model::output::{
    CreateBucketOutput, DeleteObjectOutput, GetObjectOutput, HealthOutput, ListObjectsOutput,
    PutObjectOutput, SearchObjectsOutput, UpdateMetadataOutput,
};
use bluenoise_model::types::{HealthStatus, ObjectMetadata};
use http::header::{self, HeaderName, HeaderValue};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;

use crate::body::ResponseBody;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const APPLICATION_JSON: &str = "application/json";

/// Header carrying the machine-readable error code.
pub const ERROR_CODE_HEADER: &str = "x-error-code";
/// Header carrying the object id on upload and download.
pub const OBJECT_ID_HEADER: &str = "x-object-id";

/// Convert an operation output into an HTTP response.
pub trait IntoStoreResponse {
    /// Build the response.
    fn into_store_response(self) -> Result<http::Response<ResponseBody>, ApiError>;
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build_response(
    builder: http::response::Builder,
    body: ResponseBody,
) -> Result<http::Response<ResponseBody>, ApiError> {
    builder
        .body(body)
        .map_err(|e| ApiError::internal_error(format!("failed to build response: {e}")))
}

fn text_response(text: String) -> Result<http::Response<ResponseBody>, ApiError> {
    build_response(
        http::Response::builder()
            .status(http::StatusCode::OK)
            .header(header::CONTENT_TYPE, TEXT_PLAIN),
        ResponseBody::from_string(text),
    )
}

fn json_response<T: Serialize>(value: &T) -> Result<http::Response<ResponseBody>, ApiError> {
    let json = serde_json::to_vec(value)
        .map_err(|e| ApiError::internal_error(format!("failed to encode response: {e}")))?;
    build_response(
        http::Response::builder()
            .status(http::StatusCode::OK)
            .header(header::CONTENT_TYPE, APPLICATION_JSON),
        ResponseBody::from_bytes(json),
    )
}

/// Set a header, skipping values that are not valid header text.
fn set_header(
    builder: http::response::Builder,
    name: HeaderName,
    value: &str,
) -> http::response::Builder {
    match HeaderValue::from_str(value) {
        Ok(hv) => builder.header(name, hv),
        Err(_) => builder,
    }
}

/// `attachment` disposition naming the key as the download filename.
///
/// Non-ASCII keys additionally get an RFC 5987 `filename*` parameter.
fn attachment_disposition(key: &str) -> String {
    let escaped = key.replace('\\', "\\\\").replace('"', "\\\"");
    if key.is_ascii() {
        format!("attachment; filename=\"{escaped}\"")
    } else {
        let encoded = utf8_percent_encode(key, NON_ALPHANUMERIC);
        format!("attachment; filename=\"{escaped}\"; filename*=UTF-8''{encoded}")
    }
}

fn http_date(metadata: &ObjectMetadata) -> String {
    metadata
        .uploaded_at
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

impl IntoStoreResponse for CreateBucketOutput {
    fn into_store_response(self) -> Result<http::Response<ResponseBody>, ApiError> {
        text_response(format!("Bucket created successfully: {}\n", self.bucket))
    }
}

impl IntoStoreResponse for PutObjectOutput {
    fn into_store_response(self) -> Result<http::Response<ResponseBody>, ApiError> {
        let metadata = self.metadata;
        let builder = http::Response::builder()
            .status(http::StatusCode::OK)
            .header(header::CONTENT_TYPE, TEXT_PLAIN);
        let builder = set_header(builder, header::ETAG, &metadata.etag());
        let builder = set_header(
            builder,
            HeaderName::from_static(OBJECT_ID_HEADER),
            &metadata.id,
        );
        build_response(
            builder,
            ResponseBody::from_string(format!("File uploaded successfully: {}\n", metadata.key)),
        )
    }
}

impl IntoStoreResponse for GetObjectOutput {
    fn into_store_response(self) -> Result<http::Response<ResponseBody>, ApiError> {
        let metadata = self.metadata;
        let builder = http::Response::builder()
            .status(http::StatusCode::OK)
            .header(header::CONTENT_LENGTH, self.body.len());
        let builder = set_header(builder, header::CONTENT_TYPE, &metadata.content_type);
        let builder = set_header(builder, header::ETAG, &metadata.etag());
        let builder = set_header(builder, header::LAST_MODIFIED, &http_date(&metadata));
        let builder = set_header(
            builder,
            HeaderName::from_static(OBJECT_ID_HEADER),
            &metadata.id,
        );
        let builder = set_header(
            builder,
            header::CONTENT_DISPOSITION,
            &attachment_disposition(&metadata.key),
        );
        build_response(builder, ResponseBody::from_bytes(self.body))
    }
}

impl IntoStoreResponse for ListObjectsOutput {
    fn into_store_response(self) -> Result<http::Response<ResponseBody>, ApiError> {
        let mut text = String::new();
        for key in &self.keys {
            text.push_str(key);
            text.push('\n');
        }
        text_response(text)
    }
}

impl IntoStoreResponse for DeleteObjectOutput {
    fn into_store_response(self) -> Result<http::Response<ResponseBody>, ApiError> {
        text_response(format!("File deleted successfully: {}\n", self.key))
    }
}

impl IntoStoreResponse for HealthOutput {
    fn into_store_response(self) -> Result<http::Response<ResponseBody>, ApiError> {
        match self.status {
            HealthStatus::Healthy => text_response("OK\n".to_owned()),
            HealthStatus::Degraded(reason) => {
                Ok(error_to_response(&ApiError::service_unavailable(reason)))
            }
        }
    }
}

impl IntoStoreResponse for SearchObjectsOutput {
    fn into_store_response(self) -> Result<http::Response<ResponseBody>, ApiError> {
        json_response(&self.objects)
    }
}

impl IntoStoreResponse for UpdateMetadataOutput {
    fn into_store_response(self) -> Result<http::Response<ResponseBody>, ApiError> {
        json_response(&self.metadata)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Render an error as `"<Code>: <message>\n"` with an `x-error-code` header.
#[must_use]
pub fn error_to_response(err: &ApiError) -> http::Response<ResponseBody> {
    http::Response::builder()
        .status(err.status_code)
        .header(header::CONTENT_TYPE, TEXT_PLAIN)
        .header(ERROR_CODE_HEADER, err.code.as_str())
        .body(ResponseBody::from_string(format!(
            "{}: {}\n",
            err.code, err.message
        )))
        .unwrap_or_else(|_| {
            let mut fallback = http::Response::new(ResponseBody::empty());
            *fallback.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}
