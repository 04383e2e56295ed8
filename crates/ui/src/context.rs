use std::sync::Arc;

use services::{
    DeploymentService, HeaderService, KeyService, ProgressService, SubscriptionService,
    WhitelistService,
};

/// Services the views need, supplied by the composition root.
pub trait UiApp: Send + Sync {
    fn progress(&self) -> Arc<ProgressService>;
    fn whitelist(&self) -> Arc<WhitelistService>;
    fn keys(&self) -> Arc<KeyService>;
    fn deployment(&self) -> Arc<DeploymentService>;
    fn subscription(&self) -> Arc<SubscriptionService>;
    fn headers(&self) -> Arc<HeaderService>;
}

#[derive(Clone)]
pub struct AppContext {
    progress: Arc<ProgressService>,
    whitelist: Arc<WhitelistService>,
    keys: Arc<KeyService>,
    deployment: Arc<DeploymentService>,
    subscription: Arc<SubscriptionService>,
    headers: Arc<HeaderService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            progress: app.progress(),
            whitelist: app.whitelist(),
            keys: app.keys(),
            deployment: app.deployment(),
            subscription: app.subscription(),
            headers: app.headers(),
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

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
