//! Store configuration.
//!
//! Provides [`StoreConfig`] for configuring the BlueNoise store and server.
//! Values are loaded from environment variables with defaults suitable for
//! local development.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Default upload ceiling: 100 MiB.
const DEFAULT_MAX_OBJECT_SIZE: u64 = 100 * 1024 * 1024;

/// Store configuration.
///
/// # Examples
///
/// ```
/// use bluenoise_core::config::StoreConfig;
///
/// let config = StoreConfig::default();
/// assert_eq!(config.listen, "0.0.0.0:8080");
/// assert!(config.auth_token.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Bind address for the HTTP server.
    #[builder(default = String::from("0.0.0.0:8080"))]
    pub listen: String,

    /// Root directory of the persistence layer.
    #[builder(default = String::from("./storage"))]
    pub data_dir: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,

    /// Largest accepted object, in bytes.
    #[builder(default = DEFAULT_MAX_OBJECT_SIZE)]
    pub max_object_size: u64,

    /// Upper bound on the health probe, in milliseconds.
    #[builder(default = 2000)]
    pub health_timeout_ms: u64,

    /// Bearer token required on every request when set.
    #[builder(default)]
    pub auth_token: Option<String>,

    /// Value of `Access-Control-Allow-Origin` on every response.
    #[builder(default = String::from("*"))]
    pub cors_allow_origin: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            listen: String::from("0.0.0.0:8080"),
            data_dir: String::from("./storage"),
            log_level: String::from("info"),
            max_object_size: DEFAULT_MAX_OBJECT_SIZE,
            health_timeout_ms: 2000,
            auth_token: None,
            cors_allow_origin: String::from("*"),
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `BLUENOISE_LISTEN` | `0.0.0.0:8080` |
    /// | `DATA_DIR` | `./storage` |
    /// | `LOG_LEVEL` | `info` |
    /// | `MAX_OBJECT_SIZE` | `104857600` |
    /// | `HEALTH_TIMEOUT_MS` | `2000` |
    /// | `AUTH_TOKEN` | *(unset)* |
    /// | `CORS_ALLOW_ORIGIN` | `*` |
    ///
    /// Unparseable numeric values keep their defaults; an empty `AUTH_TOKEN`
    /// counts as unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("BLUENOISE_LISTEN") {
            config.listen = v;
        }
        if let Some(v) = lookup("DATA_DIR") {
            config.data_dir = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(v) = lookup("MAX_OBJECT_SIZE") {
            if let Ok(n) = v.parse::<u64>() {
                config.max_object_size = n;
            }
        }
        if let Some(v) = lookup("HEALTH_TIMEOUT_MS") {
            if let Ok(n) = v.parse::<u64>() {
                config.health_timeout_ms = n;
            }
        }
        if let Some(v) = lookup("AUTH_TOKEN") {
            if !v.trim().is_empty() {
                config.auth_token = Some(v);
            }
        }
        if let Some(v) = lookup("CORS_ALLOW_ORIGIN") {
            config.cors_allow_origin = v;
        }

        config
    }

    /// The health probe bound as a [`std::time::Duration`].
    #[must_use]
    pub fn health_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.health_timeout_ms)
    }
}
