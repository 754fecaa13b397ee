//! BlueNoise server: a single-node object store over HTTP.
//!
//! # Usage
//!
//! ```text
//! DATA_DIR=/var/lib/bluenoise bluenoise-server
//! bluenoise-server --health-check
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `BLUENOISE_LISTEN` | `0.0.0.0:8080` | Bind address |
//! | `DATA_DIR` | `./storage` | Persistence root |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `MAX_OBJECT_SIZE` | `104857600` | Largest accepted upload in bytes |
//! | `HEALTH_TIMEOUT_MS` | `2000` | Health probe bound |
//! | `AUTH_TOKEN` | *(unset)* | Require `Authorization: Bearer <token>` |
//! | `CORS_ALLOW_ORIGIN` | `*` | `Access-Control-Allow-Origin` value |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod handler;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use bluenoise_core::{BlueNoiseStore, StoreConfig};
use bluenoise_http::auth::{AllowAll, Authorizer, BearerTokenAuthorizer};
use bluenoise_http::dispatch::StoreHandler;
use bluenoise_http::service::{HttpConfig, StoreHttpService};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::handler::BlueNoiseHandler;

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Room for multipart framing on top of the largest accepted object.
const MULTIPART_ALLOWANCE: usize = 64 * 1024;

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Derive the HTTP layer configuration from the store configuration.
fn build_http_config(config: &StoreConfig) -> HttpConfig {
    let authorizer: Arc<dyn Authorizer> = match &config.auth_token {
        Some(token) => {
            info!("bearer token authorization enabled");
            Arc::new(BearerTokenAuthorizer::new(token.clone()))
        }
        None => Arc::new(AllowAll),
    };

    HttpConfig {
        cors_allow_origin: config.cors_allow_origin.clone(),
        max_body_size: usize::try_from(config.max_object_size)
            .unwrap_or(usize::MAX)
            .saturating_add(MULTIPART_ALLOWANCE),
        authorizer,
    }
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve<H: StoreHandler>(listener: TcpListener, service: StoreHttpService<H>) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let conn = http.serve_connection(TokioIo::new(stream), service.clone());
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

/// Request `GET /health` from a running server and require a 200 answer.
async fn run_health_check(addr: &str, auth_token: Option<&str>, timeout: Duration) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let probe = async {
        let stream = TcpStream::connect(addr)
            .await
            .with_context(|| format!("cannot connect to {addr}"))?;
        let mut stream = stream;

        let authorization = auth_token
            .map(|token| format!("Authorization: Bearer {token}\r\n"))
            .unwrap_or_default();
        let request = format!(
            "GET /health HTTP/1.1\r\nHost: {addr}\r\n{authorization}Connection: close\r\n\r\n"
        );
        // `Connection: close` ends the exchange; half-closing the write side
        // early makes the server drop the connection before it answers.
        stream.write_all(request.as_bytes()).await?;

        let mut response = String::new();
        stream.read_to_string(&mut response).await?;
        Ok::<_, anyhow::Error>(response)
    };

    // Leave the server its own probe budget plus a margin for the round trip.
    let response = tokio::time::timeout(timeout * 2, probe)
        .await
        .with_context(|| format!("health check against {addr} timed out"))??;

    let status_line = response.lines().next().unwrap_or_default();
    if status_line.split_whitespace().nth(1) == Some("200") {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}: {status_line}")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = StoreConfig::from_env();

    // Handle --health-check flag for container HEALTHCHECK.
    if std::env::args().any(|a| a == "--health-check") {
        let addr = config.listen.replace("0.0.0.0", "127.0.0.1");
        let healthy = run_health_check(
            &addr,
            config.auth_token.as_deref(),
            config.health_timeout(),
        )
        .await
        .is_ok();
        std::process::exit(i32::from(!healthy));
    }

    init_tracing(&config.log_level)?;

    info!(
        listen = %config.listen,
        data_dir = %config.data_dir,
        max_object_size = config.max_object_size,
        version = VERSION,
        "starting BlueNoise server",
    );

    let store = BlueNoiseStore::open(config.clone())
        .await
        .with_context(|| format!("failed to open store at {}", config.data_dir))?;
    let service = StoreHttpService::new(BlueNoiseHandler(store), build_http_config(&config));

    let addr: SocketAddr = config
        .listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, "listening for connections");

    serve(listener, service).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_build_open_http_config_by_default() {
        let config = StoreConfig::default();
        let http_config = build_http_config(&config);

        assert_eq!(http_config.cors_allow_origin, "*");
        assert_eq!(
            http_config.max_body_size,
            100 * 1024 * 1024 + MULTIPART_ALLOWANCE
        );
        let (parts, ()) = http::Request::builder()
            .uri("/health")
            .body(())
            .expect("valid request")
            .into_parts();
        assert!(http_config.authorizer.authorize(&parts).is_ok());
    }

    #[test]
    fn test_should_require_token_when_configured() {
        let config = StoreConfig::builder()
            .auth_token(Some("s3cret".to_owned()))
            .cors_allow_origin("https://app.example".to_owned())
            .build();
        let http_config = build_http_config(&config);
        assert_eq!(http_config.cors_allow_origin, "https://app.example");

        let (parts, ()) = http::Request::builder()
            .uri("/health")
            .body(())
            .expect("valid request")
            .into_parts();
        assert!(http_config.authorizer.authorize(&parts).is_err());
    }

    #[tokio::test]
    async fn test_should_fail_health_check_without_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr").to_string();
        drop(listener);

        let result = run_health_check(&addr, None, Duration::from_millis(500)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_should_pass_health_check_against_live_server() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = StoreConfig::builder()
            .data_dir(dir.path().to_string_lossy().into_owned())
            .build();
        let store = BlueNoiseStore::open(config.clone()).await.expect("open");
        let service = StoreHttpService::new(BlueNoiseHandler(store), build_http_config(&config));

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr").to_string();
        let server = tokio::spawn(serve(listener, service));

        let result = run_health_check(&addr, None, Duration::from_secs(2)).await;
        server.abort();
        result.unwrap_or_else(|e| panic!("health check failed: {e}"));
    }

    #[tokio::test]
    async fn test_should_send_token_in_health_check() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = StoreConfig::builder()
            .data_dir(dir.path().to_string_lossy().into_owned())
            .auth_token(Some("s3cret".to_owned()))
            .build();
        let store = BlueNoiseStore::open(config.clone()).await.expect("open");
        let service = StoreHttpService::new(BlueNoiseHandler(store), build_http_config(&config));

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr").to_string();
        let server = tokio::spawn(serve(listener, service));

        let denied = run_health_check(&addr, None, Duration::from_secs(2)).await;
        let allowed = run_health_check(&addr, Some("s3cret"), Duration::from_secs(2)).await;
        server.abort();

        let err = denied.expect_err("missing token should be refused");
        assert!(err.to_string().contains("403"), "{err}");
        allowed.unwrap_or_else(|e| panic!("health check failed: {e}"));
    }
}
