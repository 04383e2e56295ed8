use std::sync::Arc;

use chrono::{DateTime, Utc};
use onboard_core::subscription::{SubscriptionForm, SubscriptionPayload};
use serde::Serialize;
use storage::repository::ProgressRepository;
use tracing::{info, warn};

use crate::Clock;
use crate::error::ActionError;
use crate::simulation::{ActionProfile, CancelToken, OutcomeProvider, simulate_latency};

pub const NEXT_STEPS: [&str; 4] = [
    "ONDC will verify your endpoints within 24-48 hours",
    "You will receive confirmation email once verification is complete",
    "Monitor your application logs for challenge requests",
    "Manage authorization headers for secure communication",
];

/// What the simulated registry returns after a subscribe call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionReceipt {
    pub subscription_id: String,
    pub subscriber_id: String,
    pub status: String,
    pub message: String,
    pub operation: String,
    pub registered_at: DateTime<Utc>,
    pub verification_status: String,
    pub next_steps: Vec<String>,
    pub payload: SubscriptionPayload,
}

#[derive(Clone)]
pub struct SubscriptionService {
    clock: Clock,
    progress: Arc<dyn ProgressRepository>,
    outcomes: Arc<dyn OutcomeProvider>,
    profile: ActionProfile,
}

impl SubscriptionService {
    #[must_use]
    pub fn new(
        clock: Clock,
        progress: Arc<dyn ProgressRepository>,
        outcomes: Arc<dyn OutcomeProvider>,
        profile: ActionProfile,
    ) -> Self {
        Self {
            clock,
            progress,
            outcomes,
            profile,
        }
    }

    /// Build the subscribe payload from `form` and submit it.
    ///
    /// Business fields are passed through unvalidated.
    ///
    /// # Errors
    ///
    /// Returns `ActionError::MissingPrerequisite` before any delay when there is
    /// no session id or no key set, `ActionError::Cancelled`,
    /// `ActionError::Rejected`, or `ActionError::Storage`.
    pub async fn submit(
        &self,
        form: &SubscriptionForm,
        token: &CancelToken,
    ) -> Result<SubscriptionReceipt, ActionError> {
        let record = self.progress.load_progress().await?;
        let (Some(session_id), Some(keys)) = (record.session_id().cloned(), record.keys().cloned())
        else {
            return Err(ActionError::MissingPrerequisite(
                "Please complete whitelist verification and key generation first",
            ));
        };

        simulate_latency(self.profile.latency, token).await?;

        if !self.outcomes.succeeds(self.profile.success_rate) {
            warn!(session = %session_id, "subscription rejected");
            return Err(ActionError::Rejected("Subscription failed"));
        }

        let now = self.clock.now();
        let payload = SubscriptionPayload::build(form, &session_id, &keys, now);

        let mut record = self.progress.load_progress().await?;
        record.set_subscription_completed(true);
        self.progress.save_progress(&record).await?;

        let receipt = SubscriptionReceipt {
            subscription_id: format!("ondc-sub-{}", now.timestamp_millis()),
            subscriber_id: form.subscriber_id.clone(),
            status: "success".into(),
            message: "Successfully subscribed to ONDC network".into(),
            operation: form.operation.label().into(),
            registered_at: now,
            verification_status: "pending".into(),
            next_steps: NEXT_STEPS.iter().map(|s| (*s).to_string()).collect(),
            payload,
        };
        info!(
            subscription = %receipt.subscription_id,
            operation = %receipt.operation,
            participants = form.network_participant.len(),
            "subscription submitted"
        );
        Ok(receipt)
    }
}
