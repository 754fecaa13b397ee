//! Integration tests for the BlueNoise server.
//!
//! These tests require a running server at `localhost:8080`, or at the URL in
//! `BLUENOISE_ENDPOINT_URL`. They are marked `#[ignore]` so they don't run
//! during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p bluenoise-integration -- --ignored
//! ```

use std::sync::Once;

use bluenoise_client::BlueNoiseClient;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL for the server.
#[must_use]
pub fn endpoint_url() -> String {
    std::env::var("BLUENOISE_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:8080".to_owned())
}

/// Create a client pointing at the local server.
///
/// Sends `BLUENOISE_AUTH_TOKEN` as a bearer token when set.
#[must_use]
pub fn client() -> BlueNoiseClient {
    init_tracing();
    let client = BlueNoiseClient::new(&endpoint_url())
        .unwrap_or_else(|e| panic!("invalid endpoint url: {e}"));
    match std::env::var("BLUENOISE_AUTH_TOKEN") {
        Ok(token) if !token.is_empty() => client.with_token(token),
        _ => client,
    }
}

/// Generate a unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// Create a uniquely named bucket and return its name.
pub async fn create_test_bucket(client: &BlueNoiseClient, prefix: &str) -> String {
    let bucket = test_bucket_name(prefix);
    client
        .create_bucket(&bucket)
        .await
        .unwrap_or_else(|e| panic!("create_bucket {bucket}: {e}"));
    bucket
}

#[cfg(test)]
mod test_bucket;
#[cfg(test)]
mod test_concurrency;
#[cfg(test)]
mod test_cors;
#[cfg(test)]
mod test_error;
#[cfg(test)]
mod test_metadata;
#[cfg(test)]
mod test_object;
