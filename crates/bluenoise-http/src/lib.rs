//! HTTP layer for the BlueNoise object store.
//!
//! - **Routing** ([`router`]): maps method and path to a [`StoreOperation`]
//!   and parses the query string.
//! - **Request parsing** ([`request`], [`multipart`]): turns request parts and
//!   the collected body into typed inputs from `bluenoise-model`.
//! - **Response serialization** ([`response`]): turns typed outputs and
//!   [`ApiError`] values into HTTP responses.
//! - **Authorization** ([`auth`]): the pluggable boundary in front of routing.
//! - **Dispatch** ([`dispatch`]): hands a routed request to the [`StoreHandler`].
//! - **Service** ([`service`]): the hyper `Service` tying it all together.
//!
//! # Architecture
//!
//! ```text
//! HTTP Request
//!   -> StoreHttpService (hyper Service)
//!     -> CORS preflight interception
//!     -> Authorizer
//!     -> StoreRouter (method + path -> StoreOperation)
//!     -> Body collection (bounded)
//!     -> dispatch_operation (StoreHandler trait)
//!     -> Common response headers (x-request-id, CORS)
//!   <- HTTP Response
//! ```
//!
//! [`StoreOperation`]: bluenoise_model::StoreOperation
//! [`ApiError`]: bluenoise_model::ApiError

// ApiError is returned on every fallible path of the request pipeline.
#![allow(clippy::result_large_err)]

pub mod auth;
pub mod body;
pub mod dispatch;
pub mod multipart;
pub mod request;
pub mod response;
pub mod router;
pub mod service;

pub use auth::{AllowAll, Authorizer, BearerTokenAuthorizer};
pub use body::ResponseBody;
pub use dispatch::StoreHandler;
pub use request::FromStoreRequest;
pub use response::IntoStoreResponse;
pub use router::{RoutingContext, StoreRouter};
pub use service::{HttpConfig, StoreHttpService};
