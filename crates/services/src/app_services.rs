use std::sync::Arc;

use storage::repository::Storage;
use tracing::info;

use crate::Clock;
use crate::deployment_service::DeploymentService;
use crate::error::AppServicesError;
use crate::header_service::HeaderService;
use crate::key_service::KeyService;
use crate::progress_service::ProgressService;
use crate::simulation::{OutcomeProvider, RandomOutcomes, SimulationProfile};
use crate::subscription_service::SubscriptionService;
use crate::whitelist_service::WhitelistService;

/// Assembles the app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    progress: Arc<ProgressService>,
    whitelist: Arc<WhitelistService>,
    keys: Arc<KeyService>,
    deployment: Arc<DeploymentService>,
    subscription: Arc<SubscriptionService>,
    headers: Arc<HeaderService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage with random outcomes.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        profile: SimulationProfile,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        info!(db = db_url, "sqlite storage ready");
        Ok(Self::from_storage(
            &storage,
            clock,
            Arc::new(RandomOutcomes),
            profile,
        ))
    }

    /// Wire every service over an existing storage and outcome provider.
    #[must_use]
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        outcomes: Arc<dyn OutcomeProvider>,
        profile: SimulationProfile,
    ) -> Self {
        let progress = Arc::new(ProgressService::new(Arc::clone(&storage.progress)));
        let whitelist = Arc::new(WhitelistService::new(
            clock,
            Arc::clone(&storage.progress),
            Arc::clone(&outcomes),
            profile.whitelist,
        ));
        let keys = Arc::new(KeyService::new(
            clock,
            Arc::clone(&storage.progress),
            Arc::clone(&outcomes),
            profile.key_generation,
        ));
        let deployment = Arc::new(DeploymentService::new(
            clock,
            Arc::clone(&storage.progress),
            Arc::clone(&outcomes),
            profile.deployment_config,
            profile.endpoint_test,
        ));
        let subscription = Arc::new(SubscriptionService::new(
            clock,
            Arc::clone(&storage.progress),
            Arc::clone(&outcomes),
            profile.subscription,
        ));
        let headers = Arc::new(HeaderService::new(
            clock,
            Arc::clone(&storage.progress),
            outcomes,
            profile.header_create,
            profile.header_verify,
        ));

        Self {
            progress,
            whitelist,
            keys,
            deployment,
            subscription,
            headers,
        }
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn whitelist(&self) -> Arc<WhitelistService> {
        Arc::clone(&self.whitelist)
    }

    #[must_use]
    pub fn keys(&self) -> Arc<KeyService> {
        Arc::clone(&self.keys)
    }

    #[must_use]
    pub fn deployment(&self) -> Arc<DeploymentService> {
        Arc::clone(&self.deployment)
    }

    #[must_use]
    pub fn subscription(&self) -> Arc<SubscriptionService> {
        Arc::clone(&self.subscription)
    }

    #[must_use]
    pub fn headers(&self) -> Arc<HeaderService> {
        Arc::clone(&self.headers)
    }
}
