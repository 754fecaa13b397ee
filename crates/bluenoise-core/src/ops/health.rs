//! Health handler.

use bluenoise_model::ApiError;
use bluenoise_model::input::HealthInput;
use bluenoise_model::output::HealthOutput;

use crate::provider::BlueNoiseStore;

impl BlueNoiseStore {
    /// Probe the persistence layer.
    pub async fn check_health(&self) -> HealthOutput {
        HealthOutput {
            status: self.health.check().await,
        }
    }

    /// Wire entry point for [`BlueNoiseStore::check_health`].
    ///
    /// Always succeeds; a degraded probe is carried in the output and turned
    /// into a 503 by the response layer.
    pub async fn handle_health(&self, _input: HealthInput) -> Result<HealthOutput, ApiError> {
        Ok(self.check_health().await)
    }
}
