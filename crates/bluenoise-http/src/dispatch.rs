//! Dispatch of a routed request to the business logic handler.

use std::future::Future;
use std::pin::Pin;

use bluenoise_model::{ApiError, StoreOperation};
use bytes::Bytes;

use crate::body::ResponseBody;
use crate::router::RoutingContext;

/// Boxed future returned by [`StoreHandler::handle_operation`].
pub type HandlerFuture =
    Pin<Box<dyn Future<Output = Result<http::Response<ResponseBody>, ApiError>> + Send>>;

/// The boundary between the HTTP layer and the store.
///
/// Boxed futures keep the trait object-safe so the service can hold the
/// handler behind an `Arc`.
pub trait StoreHandler: Send + Sync + 'static {
    /// Handle one operation and produce a complete response.
    fn handle_operation(
        &self,
        op: StoreOperation,
        parts: http::request::Parts,
        body: Bytes,
        ctx: RoutingContext,
    ) -> HandlerFuture;
}

/// Hand a routed request to `handler`.
pub async fn dispatch_operation<H: StoreHandler>(
    handler: &H,
    parts: http::request::Parts,
    body: Bytes,
    ctx: RoutingContext,
) -> Result<http::Response<ResponseBody>, ApiError> {
    let op = ctx.operation;
    tracing::debug!(operation = %op, params = ?ctx.query_params, "dispatching operation");
    handler.handle_operation(op, parts, body, ctx).await
}
