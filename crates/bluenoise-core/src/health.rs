//! Liveness probe over the persistence layer.
//!
//! [`HealthMonitor::check`] writes a small random payload to the reserved
//! `.health/` directory, reads it back, and removes it. The whole probe is
//! bounded by a timeout; any failure or a timeout reports
//! [`HealthStatus::Degraded`] with the reason.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, ensure};
use bluenoise_model::types::HealthStatus;
use tracing::{debug, warn};
use uuid::Uuid;

/// Stateless health probe.
#[derive(Debug, Clone)]
pub struct HealthMonitor {
    probe_dir: PathBuf,
    timeout: Duration,
}

impl HealthMonitor {
    /// Create a monitor probing `probe_dir` within `timeout`.
    #[must_use]
    pub fn new(probe_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            probe_dir: probe_dir.into(),
            timeout,
        }
    }

    /// Run one write-then-read probe.
    pub async fn check(&self) -> HealthStatus {
        self.bounded(self.probe()).await
    }

    /// Classify the outcome of `probe`, giving up after the configured timeout.
    pub(crate) async fn bounded<F>(&self, probe: F) -> HealthStatus
    where
        F: Future<Output = anyhow::Result<()>>,
    {
        match tokio::time::timeout(self.timeout, probe).await {
            Ok(Ok(())) => {
                debug!("health probe succeeded");
                HealthStatus::Healthy
            }
            Ok(Err(e)) => {
                warn!(error = %format!("{e:#}"), "health probe failed");
                HealthStatus::Degraded(format!("{e:#}"))
            }
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis(), "health probe timed out");
                HealthStatus::Degraded(format!(
                    "storage probe timed out after {}ms",
                    self.timeout.as_millis()
                ))
            }
        }
    }

    async fn probe(&self) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.probe_dir)
            .await
            .with_context(|| format!("cannot create {}", self.probe_dir.display()))?;

        let token = Uuid::new_v4().to_string();
        let path = self.probe_dir.join(format!("probe-{token}"));
        tokio::fs::write(&path, token.as_bytes())
            .await
            .with_context(|| format!("cannot write {}", path.display()))?;

        let read_back = tokio::fs::read(&path).await;
        // Remove before inspecting the result so failed probes do not accumulate.
        let _ = tokio::fs::remove_file(&path).await;

        let read_back = read_back.with_context(|| format!("cannot read {}", path.display()))?;
        ensure!(
            read_back == token.as_bytes(),
            "probe file {} returned different content",
            path.display()
        );
        Ok(())
    }
}
