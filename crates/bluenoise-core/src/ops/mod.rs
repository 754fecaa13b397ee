//! Store operation handlers.
//!
//! Each submodule adds methods to [`crate::provider::BlueNoiseStore`] in two
//! flavors: a domain method returning [`StoreResult`] (used by tests and
//! embedders) and a `handle_*` method returning the wire [`ApiError`] (used by
//! the server's HTTP handler).
//!
//! [`ApiError`]: bluenoise_model::ApiError

pub mod bucket;
pub mod health;
pub mod list;
pub mod metadata;
pub mod object;

use std::future::Future;

use anyhow::Context;

use crate::error::StoreResult;

/// Run a commit-then-publish section on its own task.
///
/// The HTTP layer drops request futures when a client disconnects. Running
/// the section detached means it either never starts or runs to completion,
/// so disk and index never disagree.
pub(crate) async fn run_to_completion<F, T>(section: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(section)
        .await
        .context("commit task panicked")?
}
