//! Bridges the HTTP layer to [`BlueNoiseStore`].
//!
//! Each operation is parsed with [`FromStoreRequest`], handed to the matching
//! `handle_*` method on the store, and rendered with [`IntoStoreResponse`].

use std::future::Future;

use bluenoise_core::BlueNoiseStore;
use bluenoise_http::body::ResponseBody;
use bluenoise_http::dispatch::{HandlerFuture, StoreHandler};
use bluenoise_http::request::FromStoreRequest;
use bluenoise_http::response::IntoStoreResponse;
use bluenoise_http::router::RoutingContext;
use bluenoise_model::{ApiError, StoreOperation};
use bytes::Bytes;

/// Implements [`StoreHandler`] by delegating to the store's handler methods.
#[derive(Debug, Clone)]
pub struct BlueNoiseHandler(pub BlueNoiseStore);

impl StoreHandler for BlueNoiseHandler {
    fn handle_operation(
        &self,
        op: StoreOperation,
        parts: http::request::Parts,
        body: Bytes,
        ctx: RoutingContext,
    ) -> HandlerFuture {
        let store = self.0.clone();
        Box::pin(async move {
            match op {
                StoreOperation::CreateBucket => {
                    dispatch_output(&parts, &ctx, body, |input| store.handle_create_bucket(input))
                        .await
                }
                StoreOperation::PutObject => {
                    dispatch_output(&parts, &ctx, body, |input| store.handle_put_object(input))
                        .await
                }
                StoreOperation::GetObject => {
                    dispatch_output(&parts, &ctx, body, |input| store.handle_get_object(input))
                        .await
                }
                StoreOperation::ListObjects => {
                    dispatch_output(&parts, &ctx, body, |input| store.handle_list_objects(input))
                        .await
                }
                StoreOperation::DeleteObject => {
                    dispatch_output(&parts, &ctx, body, |input| {
                        store.handle_delete_object(input)
                    })
                    .await
                }
                StoreOperation::Health => {
                    dispatch_output(&parts, &ctx, body, |input| store.handle_health(input)).await
                }
                StoreOperation::SearchObjects => {
                    dispatch_output(&parts, &ctx, body, |input| {
                        store.handle_search_objects(input)
                    })
                    .await
                }
                StoreOperation::UpdateMetadata => {
                    dispatch_output(&parts, &ctx, body, |input| {
                        store.handle_update_metadata(input)
                    })
                    .await
                }
            }
        })
    }
}

/// Parse the input, run the operation, and render its output.
async fn dispatch_output<I, O, F, Fut>(
    parts: &http::request::Parts,
    ctx: &RoutingContext,
    body: Bytes,
    handler_fn: F,
) -> Result<http::Response<ResponseBody>, ApiError>
where
    I: FromStoreRequest,
    O: IntoStoreResponse,
    F: FnOnce(I) -> Fut,
    Fut: Future<Output = Result<O, ApiError>>,
{
    let input = I::from_store_request(parts, ctx, body)?;
    let output = handler_fn(input).await?;
    output.into_store_response()
}
