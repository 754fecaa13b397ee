//! Typed client for the BlueNoise HTTP interface.
//!
//! Callers name operations and arguments; the client owns URL construction,
//! query encoding, and mapping error responses back to [`ErrorCode`]s.
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), bluenoise_client::ClientError> {
//! use bluenoise_client::BlueNoiseClient;
//!
//! let client = BlueNoiseClient::new("http://127.0.0.1:8080")?;
//! client.create_bucket("photos").await?;
//! client.upload("photos", "a.png", "image/png", b"bytesA".to_vec()).await?;
//! let keys = client.list("photos").await?;
//! assert_eq!(keys, vec!["a.png"]);
//! # Ok(())
//! # }
//! ```

mod error;

use bluenoise_model::StoreOperation;
use bluenoise_model::input::UpdateMetadataInput;
use bluenoise_model::types::{HealthStatus, ObjectMetadata};
use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, ETAG};
use reqwest::{Response, Url};
use tracing::debug;

pub use bluenoise_model::ErrorCode;
pub use error::ClientError;

const OBJECT_ID_HEADER: &str = "x-object-id";
const ERROR_CODE_HEADER: &str = "x-error-code";

/// Acknowledgement of a stored upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uploaded {
    /// Id assigned to the stored version.
    pub id: Option<String>,
    /// Quoted SHA-256 of the stored content.
    pub etag: Option<String>,
}

/// A downloaded object.
#[derive(Debug, Clone)]
pub struct Downloaded {
    /// Object content.
    pub body: Bytes,
    /// Declared content type.
    pub content_type: String,
    /// Id of the version that was read.
    pub id: Option<String>,
    /// Quoted SHA-256 of the content.
    pub etag: Option<String>,
}

/// Async client for one BlueNoise server.
#[derive(Debug, Clone)]
pub struct BlueNoiseClient {
    http: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl BlueNoiseClient {
    /// Create a client for the server at `base_url`, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    /// Like [`BlueNoiseClient::new`] with a preconfigured `reqwest` client.
    pub fn with_http_client(base_url: &str, http: reqwest::Client) -> Result<Self, ClientError> {
        let base = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl {
                url: base_url.to_owned(),
                reason: "not a base URL".to_owned(),
            });
        }
        Ok(Self {
            http,
            base,
            token: None,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Create a bucket.
    pub async fn create_bucket(&self, bucket: &str) -> Result<(), ClientError> {
        let url = self.url(StoreOperation::CreateBucket, &[("bucket", bucket)]);
        self.send(self.http.post(url)).await?;
        Ok(())
    }

    /// Upload `body` as `key` in `bucket`, replacing any existing object.
    pub async fn upload(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        body: impl Into<Bytes>,
    ) -> Result<Uploaded, ClientError> {
        let url = self.url(
            StoreOperation::PutObject,
            &[("bucket", bucket), ("filename", key)],
        );
        let resp = self
            .send(
                self.http
                    .post(url)
                    .header(CONTENT_TYPE, content_type)
                    .body(body.into()),
            )
            .await?;
        Ok(Uploaded {
            id: header_string(&resp, OBJECT_ID_HEADER),
            etag: header_string(&resp, ETAG.as_str()),
        })
    }

    /// Download an object.
    pub async fn download(&self, bucket: &str, key: &str) -> Result<Downloaded, ClientError> {
        let url = self.url(
            StoreOperation::GetObject,
            &[("bucket", bucket), ("filename", key)],
        );
        let resp = self.send(self.http.get(url)).await?;
        let content_type = header_string(&resp, CONTENT_TYPE.as_str()).unwrap_or_default();
        let id = header_string(&resp, OBJECT_ID_HEADER);
        let etag = header_string(&resp, ETAG.as_str());
        Ok(Downloaded {
            body: resp.bytes().await?,
            content_type,
            id,
            etag,
        })
    }

    /// List the keys of a bucket in lexicographic order.
    pub async fn list(&self, bucket: &str) -> Result<Vec<String>, ClientError> {
        let url = self.url(StoreOperation::ListObjects, &[("bucket", bucket)]);
        let text = self.send(self.http.get(url)).await?.text().await?;
        Ok(text.lines().map(ToOwned::to_owned).collect())
    }

    /// Delete an object.
    pub async fn delete(&self, bucket: &str, key: &str) -> Result<(), ClientError> {
        let url = self.url(
            StoreOperation::DeleteObject,
            &[("bucket", bucket), ("filename", key)],
        );
        self.send(self.http.delete(url)).await?;
        Ok(())
    }

    /// Probe the server. A 503 answer is reported as `Degraded`, not an error.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = self.url(StoreOperation::Health, &[]);
        match self.send(self.http.get(url)).await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(ClientError::Api {
                code: ErrorCode::ServiceUnavailable,
                message,
                ..
            }) => Ok(HealthStatus::Degraded(message)),
            Err(e) => Err(e),
        }
    }

    /// Find objects whose key or bucket name equals `query`.
    pub async fn search(&self, query: &str) -> Result<Vec<ObjectMetadata>, ClientError> {
        let url = self.url(StoreOperation::SearchObjects, &[("query", query)]);
        let body = self.send(self.http.get(url)).await?.bytes().await?;
        serde_json::from_slice(&body).map_err(ClientError::Decode)
    }

    /// Apply a custom metadata update and return the resulting record.
    pub async fn update_metadata(
        &self,
        update: &UpdateMetadataInput,
    ) -> Result<ObjectMetadata, ClientError> {
        let url = self.url(StoreOperation::UpdateMetadata, &[]);
        let body = self
            .send(self.http.post(url).json(update))
            .await?
            .bytes()
            .await?;
        serde_json::from_slice(&body).map_err(ClientError::Decode)
    }

    fn url(&self, op: StoreOperation, params: &[(&str, &str)]) -> Url {
        let mut url = self.base.clone();
        let path = format!("{}{}", self.base.path().trim_end_matches('/'), op.path());
        url.set_path(&path);
        url.set_query(None);
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in params {
                pairs.append_pair(name, value);
            }
        }
        url
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, ClientError> {
        let request = match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        };
        let resp = request.send().await?;
        let status = resp.status();
        debug!(url = %resp.url(), %status, "received response");
        if status.is_success() {
            return Ok(resp);
        }

        let code = header_string(&resp, ERROR_CODE_HEADER);
        let text = resp.text().await.unwrap_or_default();
        Err(error::from_response(status, code.as_deref(), &text))
    }
}

fn header_string(resp: &Response, name: &str) -> Option<String> {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned)
}
