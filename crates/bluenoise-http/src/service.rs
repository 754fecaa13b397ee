//! The hyper `Service` for the object store.
//!
//! [`StoreHttpService`] runs every request through the same pipeline:
//!
//! 1. CORS preflight interception (`OPTIONS` on any path)
//! 2. Authorization via the configured [`Authorizer`]
//! 3. Routing via [`StoreRouter`]
//! 4. Bounded body collection
//! 5. Dispatch to the [`StoreHandler`]
//! 6. Common response headers (`x-request-id`, CORS)

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bluenoise_model::ApiError;
use bluenoise_model::error::ErrorCode;
use bytes::Bytes;
use http::header::HeaderValue;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::service::Service;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::{AllowAll, Authorizer};
use crate::body::ResponseBody;
use crate::dispatch::{StoreHandler, dispatch_operation};
use crate::response::error_to_response;
use crate::router::StoreRouter;

/// Header echoing the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Configuration for the HTTP service.
#[derive(Clone)]
pub struct HttpConfig {
    /// Value of `Access-Control-Allow-Origin` on every response.
    pub cors_allow_origin: String,
    /// Largest request body accepted, in bytes.
    pub max_body_size: usize,
    /// Consulted before routing.
    pub authorizer: Arc<dyn Authorizer>,
}

impl std::fmt::Debug for HttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConfig")
            .field("cors_allow_origin", &self.cors_allow_origin)
            .field("max_body_size", &self.max_body_size)
            .field("authorizer", &"...")
            .finish()
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            cors_allow_origin: "*".to_owned(),
            max_body_size: 100 * 1024 * 1024,
            authorizer: Arc::new(AllowAll),
        }
    }
}

/// The store's HTTP service.
#[derive(Debug)]
pub struct StoreHttpService<H: StoreHandler> {
    handler: Arc<H>,
    router: StoreRouter,
    config: Arc<HttpConfig>,
}

impl<H: StoreHandler> StoreHttpService<H> {
    /// Create a service owning `handler`.
    #[must_use]
    pub fn new(handler: H, config: HttpConfig) -> Self {
        Self::from_shared(Arc::new(handler), config)
    }

    /// Create a service from a shared handler.
    #[must_use]
    pub fn from_shared(handler: Arc<H>, config: HttpConfig) -> Self {
        Self {
            handler,
            router: StoreRouter::new(),
            config: Arc::new(config),
        }
    }

    /// Run one request through the pipeline.
    ///
    /// Never fails: every error is rendered as a response.
    pub async fn handle<B>(&self, req: http::Request<B>) -> http::Response<ResponseBody>
    where
        B: http_body::Body<Data = Bytes> + Send,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let request_id = Uuid::new_v4().to_string();
        let response = process_request(
            req,
            self.handler.as_ref(),
            &self.router,
            &self.config,
            &request_id,
        )
        .await;
        add_common_headers(response, &request_id, &self.config.cors_allow_origin)
    }
}

impl<H: StoreHandler> Clone for StoreHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            router: self.router,
            config: Arc::clone(&self.config),
        }
    }
}

impl<H: StoreHandler> Service<http::Request<Incoming>> for StoreHttpService<H> {
    type Response = http::Response<ResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { Ok(service.handle(req).await) })
    }
}

async fn process_request<H, B>(
    req: http::Request<B>,
    handler: &H,
    router: &StoreRouter,
    config: &HttpConfig,
    request_id: &str,
) -> http::Response<ResponseBody>
where
    H: StoreHandler,
    B: http_body::Body<Data = Bytes> + Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let uri = req.uri().clone();
    debug!(%method, %uri, request_id, "processing request");

    if method == http::Method::OPTIONS {
        return cors_preflight_response();
    }

    let (parts, body) = req.into_parts();

    if let Err(err) = config.authorizer.authorize(&parts) {
        warn!(%method, %uri, error = %err, request_id, "request rejected by authorizer");
        return error_to_response(&err);
    }

    let ctx = match router.resolve_parts(&parts) {
        Ok(ctx) => ctx,
        Err(err) => {
            warn!(%method, %uri, error = %err, request_id, "failed to route request");
            return error_to_response(&err);
        }
    };

    info!(operation = %ctx.operation, request_id, "routed request");

    let body = match collect_body(body, config.max_body_size).await {
        Ok(body) => body,
        Err(err) => {
            warn!(error = %err, request_id, "failed to read request body");
            return error_to_response(&err);
        }
    };

    match dispatch_operation(handler, parts, body, ctx).await {
        Ok(response) => response,
        Err(err) => {
            debug!(error = %err, request_id, "operation returned error");
            error_to_response(&err)
        }
    }
}

/// Collect the body, refusing anything over `limit` bytes.
async fn collect_body<B>(body: B, limit: usize) -> Result<Bytes, ApiError>
where
    B: http_body::Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            Err(ApiError::with_message(
                ErrorCode::EntityTooLarge,
                format!("Request body exceeds the maximum of {limit} bytes"),
            ))
        }
        Err(err) => Err(ApiError::invalid_request(format!(
            "Failed to read request body: {err}"
        ))),
    }
}

fn cors_preflight_response() -> http::Response<ResponseBody> {
    let mut response = http::Response::new(ResponseBody::empty());
    *response.status_mut() = http::StatusCode::OK;
    response
}

/// Add the request id and CORS headers to every response.
fn add_common_headers(
    mut response: http::Response<ResponseBody>,
    request_id: &str,
    allow_origin: &str,
) -> http::Response<ResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = HeaderValue::from_str(request_id) {
        headers.insert(REQUEST_ID_HEADER, hv);
    }
    if let Ok(hv) = HeaderValue::from_str(allow_origin) {
        headers.insert(http::header::ACCESS_CONTROL_ALLOW_ORIGIN, hv);
    }
    headers.insert(
        http::header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        http::header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );

    response
}
