use crate::model::{KeySet, SessionId, SubscriberId};

/// Whitelist state keeps the subscriber and session together so a session id
/// can only exist for a verified subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Whitelisted {
    subscriber_id: SubscriberId,
    session_id: SessionId,
}

/// Locally persisted wizard progress.
///
/// Completion flags are independent of one another; the record does not
/// enforce step ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressRecord {
    whitelist: Option<Whitelisted>,
    // Stored subscriber id, kept even without the verified flag. Cleared on unverify.
    last_subscriber_id: Option<SubscriberId>,
    keys: Option<KeySet>,
    deployment_completed: bool,
    subscription_completed: bool,
}

impl ProgressRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate a record from persisted flags.
    ///
    /// Malformed combinations are normalized rather than rejected: a session id
    /// without the verified flag is dropped, and a verified flag without both a
    /// subscriber id and a session id counts as not verified.
    #[must_use]
    pub fn from_persisted(
        whitelist_verified: bool,
        subscriber_id: Option<SubscriberId>,
        session_id: Option<SessionId>,
        keys: Option<KeySet>,
        deployment_completed: bool,
        subscription_completed: bool,
    ) -> Self {
        let whitelist = match (whitelist_verified, subscriber_id.clone(), session_id) {
            (true, Some(subscriber_id), Some(session_id)) => Some(Whitelisted {
                subscriber_id,
                session_id,
            }),
            _ => None,
        };
        Self {
            whitelist,
            last_subscriber_id: subscriber_id,
            keys,
            deployment_completed,
            subscription_completed,
        }
    }

    #[must_use]
    pub fn whitelist_verified(&self) -> bool {
        self.whitelist.is_some()
    }

    /// The verified subscriber, or a stored one whose verification is incomplete.
    #[must_use]
    pub fn subscriber_id(&self) -> Option<&SubscriberId> {
        self.whitelist
            .as_ref()
            .map(|w| &w.subscriber_id)
            .or(self.last_subscriber_id.as_ref())
    }

    #[must_use]
    pub fn session_id(&self) -> Option<&SessionId> {
        self.whitelist.as_ref().map(|w| &w.session_id)
    }

    #[must_use]
    pub fn keys(&self) -> Option<&KeySet> {
        self.keys.as_ref()
    }

    #[must_use]
    pub fn has_keys(&self) -> bool {
        self.keys.is_some()
    }

    #[must_use]
    pub fn deployment_completed(&self) -> bool {
        self.deployment_completed
    }

    #[must_use]
    pub fn subscription_completed(&self) -> bool {
        self.subscription_completed
    }

    /// Record a successful whitelist check. Replaces any previous session.
    pub fn mark_whitelisted(&mut self, subscriber_id: SubscriberId, session_id: SessionId) {
        self.last_subscriber_id = Some(subscriber_id.clone());
        self.whitelist = Some(Whitelisted {
            subscriber_id,
            session_id,
        });
    }

    /// Drop whitelist verification together with its session.
    pub fn clear_whitelist(&mut self) {
        self.whitelist = None;
        self.last_subscriber_id = None;
    }

    pub fn set_keys(&mut self, keys: KeySet) {
        self.keys = Some(keys);
    }

    pub fn clear_keys(&mut self) {
        self.keys = None;
    }

    pub fn set_deployment_completed(&mut self, completed: bool) {
        self.deployment_completed = completed;
    }

    pub fn set_subscription_completed(&mut self, completed: bool) {
        self.subscription_completed = completed;
    }

    /// Clear every field, as if the wizard was never started.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
