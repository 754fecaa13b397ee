//! Wire model for the BlueNoise object store.
//!
//! Everything that crosses the HTTP boundary is defined here so the server,
//! the HTTP layer, and the typed client agree on a single contract:
//!
//! - [`StoreOperation`]: the closed set of routable operations.
//! - [`input`] / [`output`]: typed request and response payloads.
//! - [`types`]: shared records such as [`types::ObjectMetadata`].
//! - [`ApiError`] / [`ErrorCode`]: the error taxonomy and its status mapping.

pub mod error;
pub mod input;
pub mod operations;
pub mod output;
pub mod types;

pub use error::{ApiError, ErrorCode};
pub use operations::StoreOperation;
