//! HTTP request to typed input conversion.
//!
//! Parameters come from the query string (`bucket`, `filename`, `query`),
//! upload content from the body (raw or `multipart/form-data`), and metadata
//! updates from a JSON body.

use bluenoise_model::ApiError;
use bluenoise_model::input::{
    CreateBucketInput, DEFAULT_CONTENT_TYPE, DeleteObjectInput, GetObjectInput, HealthInput,
    ListObjectsInput, PutObjectInput, SearchObjectsInput, UpdateMetadataInput,
};
use bytes::Bytes;

use crate::multipart::{form_data_boundary, parse_multipart};
use crate::router::RoutingContext;

/// Extract a typed input from request components.
pub trait FromStoreRequest: Sized {
    /// Build the input from the request head, routing context, and body.
    fn from_store_request(
        parts: &http::request::Parts,
        ctx: &RoutingContext,
        body: Bytes,
    ) -> Result<Self, ApiError>;
}

/// Extract a header value as a string.
#[must_use]
pub fn header_str<'a>(parts: &'a http::request::Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}

fn content_type_or_default(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_owned()
}

impl FromStoreRequest for CreateBucketInput {
    fn from_store_request(
        _parts: &http::request::Parts,
        ctx: &RoutingContext,
        _body: Bytes,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            bucket: ctx.required_param("bucket")?.to_owned(),
        })
    }
}

impl FromStoreRequest for PutObjectInput {
    fn from_store_request(
        parts: &http::request::Parts,
        ctx: &RoutingContext,
        body: Bytes,
    ) -> Result<Self, ApiError> {
        let bucket = ctx.required_param("bucket")?.to_owned();
        let request_type = header_str(parts, "content-type");
        let key_override = ctx.query_param("filename").filter(|v| !v.is_empty());

        if let Some(boundary) = request_type.map(form_data_boundary).transpose()?.flatten() {
            let form = parse_multipart(&body, &boundary)?;
            let key = key_override
                .map(ToOwned::to_owned)
                .or(form.file_name)
                .ok_or_else(|| ApiError::missing_parameter("filename"))?;
            return Ok(Self {
                bucket,
                key,
                content_type: content_type_or_default(form.file_content_type.as_deref()),
                body: form.file_data,
            });
        }

        Ok(Self {
            bucket,
            key: ctx.required_param("filename")?.to_owned(),
            content_type: content_type_or_default(request_type),
            body,
        })
    }
}

impl FromStoreRequest for GetObjectInput {
    fn from_store_request(
        _parts: &http::request::Parts,
        ctx: &RoutingContext,
        _body: Bytes,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            bucket: ctx.required_param("bucket")?.to_owned(),
            key: ctx.required_param("filename")?.to_owned(),
        })
    }
}

impl FromStoreRequest for ListObjectsInput {
    fn from_store_request(
        _parts: &http::request::Parts,
        ctx: &RoutingContext,
        _body: Bytes,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            bucket: ctx.required_param("bucket")?.to_owned(),
        })
    }
}

impl FromStoreRequest for DeleteObjectInput {
    fn from_store_request(
        _parts: &http::request::Parts,
        ctx: &RoutingContext,
        _body: Bytes,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            bucket: ctx.required_param("bucket")?.to_owned(),
            key: ctx.required_param("filename")?.to_owned(),
        })
    }
}

impl FromStoreRequest for HealthInput {
    fn from_store_request(
        _parts: &http::request::Parts,
        _ctx: &RoutingContext,
        _body: Bytes,
    ) -> Result<Self, ApiError> {
        Ok(Self)
    }
}

impl FromStoreRequest for SearchObjectsInput {
    fn from_store_request(
        _parts: &http::request::Parts,
        ctx: &RoutingContext,
        _body: Bytes,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            query: ctx.required_param("query")?.to_owned(),
        })
    }
}

impl FromStoreRequest for UpdateMetadataInput {
    fn from_store_request(
        _parts: &http::request::Parts,
        _ctx: &RoutingContext,
        body: Bytes,
    ) -> Result<Self, ApiError> {
        serde_json::from_slice(&body).map_err(|e| {
            ApiError::invalid_request(format!("Invalid metadata update body: {e}")).with_source(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use bluenoise_model::ErrorCode;
    use bluenoise_model::types::MetadataAction;

    use super::*;
    use crate::router::StoreRouter;

    fn parse<T: FromStoreRequest>(
        method: http::Method,
        uri: &str,
        content_type: Option<&str>,
        body: &'static [u8],
    ) -> Result<T, ApiError> {
        let mut builder = http::Request::builder().method(method).uri(uri);
        if let Some(ct) = content_type {
            builder = builder.header("content-type", ct);
        }
        let req = builder.body(()).expect("valid request");
        let ctx = StoreRouter::new().resolve(&req).expect("route");
        let (parts, ()) = req.into_parts();
        T::from_store_request(&parts, &ctx, Bytes::from_static(body))
    }

    #[test]
    fn test_should_parse_raw_upload() {
        let input: PutObjectInput = parse(
            http::Method::POST,
            "/upload?bucket=photos&filename=a.png",
            Some("image/png"),
            b"bytesA",
        )
        .expect("parse");
        assert_eq!(input.bucket, "photos");
        assert_eq!(input.key, "a.png");
        assert_eq!(input.content_type, "image/png");
        assert_eq!(input.body.as_ref(), b"bytesA");
    }

    #[test]
    fn test_should_default_raw_upload_content_type() {
        let input: PutObjectInput = parse(
            http::Method::POST,
            "/upload?bucket=photos&filename=blob",
            None,
            b"x",
        )
        .expect("parse");
        assert_eq!(input.content_type, DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_should_require_filename_for_raw_upload() {
        let err = parse::<PutObjectInput>(
            http::Method::POST,
            "/upload?bucket=photos",
            Some("text/plain"),
            b"x",
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        assert!(err.message.contains("filename"));
    }

    const FORM: &[u8] = b"--B\r\nContent-Disposition: form-data; name=\"file\"; filename=\"a.png\"\r\nContent-Type: image/png\r\n\r\nbytesA\r\n--B--\r\n";

    #[test]
    fn test_should_parse_multipart_upload() {
        let input: PutObjectInput = parse(
            http::Method::POST,
            "/upload?bucket=photos",
            Some("multipart/form-data; boundary=B"),
            FORM,
        )
        .expect("parse");
        assert_eq!(input.key, "a.png");
        assert_eq!(input.content_type, "image/png");
        assert_eq!(input.body.as_ref(), b"bytesA");
    }

    #[test]
    fn test_should_not_store_malformed_multipart_as_raw_upload() {
        let err = parse::<PutObjectInput>(
            http::Method::POST,
            "/upload?bucket=photos&filename=a.png",
            Some("multipart/form-data; boundary=abc/def"),
            b"--abc/def\r\nContent-Disposition: form-data; name=\"file\"\r\n\r\nx\r\n--abc/def--\r\n",
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[test]
    fn test_should_let_query_override_multipart_filename() {
        let input: PutObjectInput = parse(
            http::Method::POST,
            "/upload?bucket=photos&filename=renamed.png",
            Some("multipart/form-data; boundary=B"),
            FORM,
        )
        .expect("parse");
        assert_eq!(input.key, "renamed.png");
    }

    #[test]
    fn test_should_require_bucket_and_filename_for_download() {
        let err = parse::<GetObjectInput>(http::Method::GET, "/download?filename=k", None, b"")
            .unwrap_err();
        assert!(err.message.contains("bucket"));
        let err = parse::<DeleteObjectInput>(http::Method::DELETE, "/delete?bucket=b", None, b"")
            .unwrap_err();
        assert!(err.message.contains("filename"));
    }

    #[test]
    fn test_should_require_search_query() {
        let err = parse::<SearchObjectsInput>(http::Method::GET, "/search", None, b"").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[test]
    fn test_should_parse_metadata_update() {
        let input: UpdateMetadataInput = parse(
            http::Method::POST,
            "/update-metadata",
            Some("application/json"),
            br#"{"id":"abc","custom_metadata":{"owner":"ana"},"action":"update"}"#,
        )
        .expect("parse");
        assert_eq!(input.id, "abc");
        assert_eq!(input.action, MetadataAction::Update);
        assert_eq!(input.custom_metadata.get("owner").map(String::as_str), Some("ana"));
    }

    #[test]
    fn test_should_reject_unknown_metadata_action() {
        let err = parse::<UpdateMetadataInput>(
            http::Method::POST,
            "/update-metadata",
            None,
            br#"{"id":"abc","custom_metadata":{},"action":"merge"}"#,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        assert!(err.source.is_some());
    }
}
