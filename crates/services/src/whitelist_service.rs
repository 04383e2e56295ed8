use std::sync::Arc;

use onboard_core::model::{SESSION_SUFFIX_ALPHABET, SESSION_SUFFIX_LEN, SessionId, SubscriberId};
use rand::Rng;
use storage::repository::ProgressRepository;
use tracing::{info, warn};

use crate::Clock;
use crate::error::ActionError;
use crate::simulation::{ActionProfile, CancelToken, OutcomeProvider, simulate_latency};

/// Result of a successful whitelist check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhitelistOutcome {
    pub subscriber_id: SubscriberId,
    pub session_id: SessionId,
}

/// Simulated whitelist lookup against the network registry.
#[derive(Clone)]
pub struct WhitelistService {
    clock: Clock,
    progress: Arc<dyn ProgressRepository>,
    outcomes: Arc<dyn OutcomeProvider>,
    profile: ActionProfile,
}

impl WhitelistService {
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

    /// Verify `subscriber_id` and start a new onboarding session.
    ///
    /// # Errors
    ///
    /// Returns `ActionError::InvalidInput` for a blank id (before any delay),
    /// `ActionError::Cancelled` if `token` fires during the delay,
    /// `ActionError::Rejected` when the simulated registry declines, and
    /// `ActionError::Storage` if progress cannot be persisted.
    pub async fn verify(
        &self,
        subscriber_id: &str,
        token: &CancelToken,
    ) -> Result<WhitelistOutcome, ActionError> {
        let subscriber_id = SubscriberId::new(subscriber_id)
            .map_err(|_| ActionError::InvalidInput("Please enter a subscriber ID"))?;

        simulate_latency(self.profile.latency, token).await?;

        if !self.outcomes.succeeds(self.profile.success_rate) {
            warn!(subscriber = %subscriber_id, "whitelist verification rejected");
            return Err(ActionError::Rejected("Subscriber ID is not whitelisted"));
        }

        let session_id = new_session_id(self.clock.unix_millis())?;
        let mut record = self.progress.load_progress().await?;
        record.mark_whitelisted(subscriber_id.clone(), session_id.clone());
        self.progress.save_progress(&record).await?;

        info!(subscriber = %subscriber_id, session = %session_id, "whitelist verified");
        Ok(WhitelistOutcome {
            subscriber_id,
            session_id,
        })
    }

    /// Forget the whitelist result and its session id.
    ///
    /// # Errors
    ///
    /// Returns `ActionError::Storage` if progress cannot be persisted.
    pub async fn unverify(&self) -> Result<(), ActionError> {
        let mut record = self.progress.load_progress().await?;
        record.clear_whitelist();
        self.progress.save_progress(&record).await?;
        info!("whitelist verification cleared");
        Ok(())
    }
}

/// `ondc_<millis>_<9 random base36 chars>`.
fn new_session_id(millis: i64) -> Result<SessionId, ActionError> {
    let mut rng = rand::rng();
    let suffix: String = (0..SESSION_SUFFIX_LEN)
        .map(|_| {
            let idx = rng.random_range(0..SESSION_SUFFIX_ALPHABET.len());
            char::from(SESSION_SUFFIX_ALPHABET[idx])
        })
        .collect();
    SessionId::new(millis, suffix).map_err(|e| ActionError::Core(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::FixedOutcomes;
    use onboard_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    fn service(repo: Arc<InMemoryRepository>, outcomes: FixedOutcomes) -> WhitelistService {
        WhitelistService::new(
            fixed_clock(),
            repo,
            Arc::new(outcomes),
            ActionProfile::new(0, 1.0),
        )
    }

    #[test]
    fn generated_session_ids_are_well_formed() {
        let id = new_session_id(1_700_000_000_000).unwrap();
        assert!(SessionId::is_session_id(&id.to_string()));
        assert_eq!(id.suffix().len(), SESSION_SUFFIX_LEN);
    }

    #[tokio::test]
    async fn blank_subscriber_is_rejected() {
        let repo = Arc::new(InMemoryRepository::new());
        let err = service(Arc::clone(&repo), FixedOutcomes::always_succeed())
            .verify("   ", &CancelToken::never())
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::InvalidInput(_)));
        assert!(repo.load_progress().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejection_leaves_record_unchanged() {
        let repo = Arc::new(InMemoryRepository::new());
        let err = service(Arc::clone(&repo), FixedOutcomes::always_fail())
            .verify("buyer-app.ondc.org", &CancelToken::never())
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Rejected(_)));
        assert!(!repo.load_progress().await.unwrap().whitelist_verified());
    }

    #[tokio::test]
    async fn unverify_clears_session() {
        let repo = Arc::new(InMemoryRepository::new());
        let svc = service(Arc::clone(&repo), FixedOutcomes::always_succeed());
        svc.verify("buyer-app.ondc.org", &CancelToken::never())
            .await
            .unwrap();
        svc.unverify().await.unwrap();
        let record = repo.load_progress().await.unwrap();
        assert!(!record.whitelist_verified());
        assert!(record.session_id().is_none());
    }
}
