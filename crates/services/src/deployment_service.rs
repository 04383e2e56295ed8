use std::sync::Arc;

use onboard_core::deployment::{DeploymentBundle, EndpointTestReport, Language};
use storage::repository::ProgressRepository;
use tracing::{info, warn};

use crate::Clock;
use crate::error::ActionError;
use crate::simulation::{ActionProfile, CancelToken, OutcomeProvider, simulate_latency};

/// Deployment helper: config generation and simulated endpoint checks.
#[derive(Clone)]
pub struct DeploymentService {
    clock: Clock,
    progress: Arc<dyn ProgressRepository>,
    outcomes: Arc<dyn OutcomeProvider>,
    config_profile: ActionProfile,
    test_profile: ActionProfile,
}

impl DeploymentService {
    #[must_use]
    pub fn new(
        clock: Clock,
        progress: Arc<dyn ProgressRepository>,
        outcomes: Arc<dyn OutcomeProvider>,
        config_profile: ActionProfile,
        test_profile: ActionProfile,
    ) -> Self {
        Self {
            clock,
            progress,
            outcomes,
            config_profile,
            test_profile,
        }
    }

    /// Render deployment files for `language`, inlining stored keys when present.
    ///
    /// # Errors
    ///
    /// Returns `ActionError::MissingPrerequisite` before any delay when the
    /// whitelist step is incomplete, `ActionError::Cancelled`, or
    /// `ActionError::Storage`.
    pub async fn generate_config(
        &self,
        language: Language,
        token: &CancelToken,
    ) -> Result<DeploymentBundle, ActionError> {
        let record = self.progress.load_progress().await?;
        if !record.whitelist_verified() {
            return Err(ActionError::MissingPrerequisite(
                "Please complete whitelist verification first",
            ));
        }

        simulate_latency(self.config_profile.latency, token).await?;

        let bundle = DeploymentBundle::render(language, record.keys());
        info!(
            language = language.value(),
            keys_inlined = record.has_keys(),
            "deployment config generated"
        );
        Ok(bundle)
    }

    /// Check the deployed endpoints. All checks passing marks the step done;
    /// any failure clears it.
    ///
    /// # Errors
    ///
    /// Returns `ActionError::InvalidInput` for a blank URL (before any delay),
    /// `ActionError::Cancelled`, or `ActionError::Storage`.
    pub async fn test_endpoints(
        &self,
        server_url: &str,
        token: &CancelToken,
    ) -> Result<EndpointTestReport, ActionError> {
        if server_url.trim().is_empty() {
            return Err(ActionError::InvalidInput("Please enter your server URL"));
        }

        simulate_latency(self.test_profile.latency, token).await?;

        let reachable = self.outcomes.succeeds(self.test_profile.success_rate);
        let report = EndpointTestReport::new(server_url, self.clock.now(), reachable);

        let mut record = self.progress.load_progress().await?;
        record.set_deployment_completed(report.overall_success);
        self.progress.save_progress(&record).await?;

        if report.overall_success {
            info!(url = %report.tested_url, "deployment endpoints passed");
        } else {
            let failed: Vec<&str> = report
                .failed_checks()
                .iter()
                .map(|check| check.name.as_str())
                .collect();
            warn!(url = %report.tested_url, ?failed, "deployment endpoints failed");
        }
        Ok(report)
    }
}
