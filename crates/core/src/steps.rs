//! Derives the ordered wizard steps from a [`ProgressRecord`].
//!
//! Completion is a direct read of each flag; no step is validated against the
//! ones before it.

use crate::model::ProgressRecord;

/// The four wizard steps, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepId {
    Whitelist,
    Keys,
    Deployment,
    Subscription,
}

impl StepId {
    pub const ALL: [StepId; 4] = [
        StepId::Whitelist,
        StepId::Keys,
        StepId::Deployment,
        StepId::Subscription,
    ];

    /// 1-based position in the wizard.
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            StepId::Whitelist => 1,
            StepId::Keys => 2,
            StepId::Deployment => 3,
            StepId::Subscription => 4,
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            StepId::Whitelist => "Verify Whitelisting Status",
            StepId::Keys => "Generate Cryptographic Keys",
            StepId::Deployment => "Deploy ONDC Endpoints",
            StepId::Subscription => "Subscribe to ONDC",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            StepId::Whitelist => "Verify your subscriber ID is whitelisted on the ONDC network",
            StepId::Keys => "Create signing and encryption key pairs",
            StepId::Deployment => "Set up required endpoints and test your deployment",
            StepId::Subscription => "Subscribe your application to the ONDC network",
        }
    }

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            StepId::Whitelist => "/whitelist",
            StepId::Keys => "/keys",
            StepId::Deployment => "/deployment",
            StepId::Subscription => "/subscribe",
        }
    }

    #[must_use]
    pub fn is_completed(self, record: &ProgressRecord) -> bool {
        match self {
            StepId::Whitelist => record.whitelist_verified(),
            StepId::Keys => record.has_keys(),
            StepId::Deployment => record.deployment_completed(),
            StepId::Subscription => record.subscription_completed(),
        }
    }

    /// Parse a step from its short name (`whitelist`, `keys`, `deployment`, `subscription`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "whitelist" => Some(StepId::Whitelist),
            "keys" => Some(StepId::Keys),
            "deployment" => Some(StepId::Deployment),
            "subscription" | "subscribe" => Some(StepId::Subscription),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDescriptor {
    pub id: StepId,
    pub number: u8,
    pub title: &'static str,
    pub path: &'static str,
    pub is_completed: bool,
}

impl StepDescriptor {
    fn for_step(id: StepId, record: &ProgressRecord) -> Self {
        Self {
            id,
            number: id.number(),
            title: id.title(),
            path: id.path(),
            is_completed: id.is_completed(record),
        }
    }
}

/// Map a record to the four step descriptors in fixed order.
#[must_use]
pub fn derive_steps(record: &ProgressRecord) -> [StepDescriptor; 4] {
    StepId::ALL.map(|id| StepDescriptor::for_step(id, record))
}

/// First incomplete step, or `None` once the wizard is finished.
#[must_use]
pub fn next_step(record: &ProgressRecord) -> Option<StepDescriptor> {
    derive_steps(record)
        .into_iter()
        .find(|step| !step.is_completed)
}

#[must_use]
pub fn completed_count(record: &ProgressRecord) -> usize {
    StepId::ALL
        .iter()
        .filter(|id| id.is_completed(record))
        .count()
}

/// Percentage of completed steps, 0..=100.
#[must_use]
pub fn progress_percent(record: &ProgressRecord) -> u8 {
    let percent = completed_count(record) * 100 / StepId::ALL.len();
    u8::try_from(percent).unwrap_or(100)
}

#[must_use]
pub fn is_finished(record: &ProgressRecord) -> bool {
    next_step(record).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{KeySet, SessionId, SubscriberId};

    fn keys() -> KeySet {
        KeySet {
            sign_private_key: "a".into(),
            sign_public_key: "b".into(),
            enc_private_key: "c".into(),
            enc_public_key: "d".into(),
            session_id: None,
        }
    }

    fn complete_record() -> ProgressRecord {
        let mut record = ProgressRecord::new();
        record.mark_whitelisted(
            SubscriberId::new("buyer-app.ondc.org").unwrap(),
            SessionId::new(1, "abcdefghi").unwrap(),
        );
        record.set_keys(keys());
        record.set_deployment_completed(true);
        record.set_subscription_completed(true);
        record
    }

    #[test]
    fn derived_steps_have_fixed_order() {
        let steps = derive_steps(&ProgressRecord::new());
        let ids: Vec<_> = steps.iter().map(|s| s.id).collect();
        assert_eq!(ids, StepId::ALL.to_vec());
        let numbers: Vec<_> = steps.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn empty_record_points_to_whitelist() {
        let next = next_step(&ProgressRecord::new()).unwrap();
        assert_eq!(next.id, StepId::Whitelist);
        assert_eq!(next.path, "/whitelist");
        assert_eq!(progress_percent(&ProgressRecord::new()), 0);
    }

    #[test]
    fn finished_record_has_no_next_step() {
        let record = complete_record();
        assert!(next_step(&record).is_none());
        assert!(is_finished(&record));
        assert_eq!(progress_percent(&record), 100);
    }

    #[test]
    fn next_step_skips_completed_later_flags() {
        let mut record = ProgressRecord::new();
        record.set_keys(keys());
        record.set_subscription_completed(true);
        assert_eq!(next_step(&record).unwrap().id, StepId::Whitelist);
        assert_eq!(completed_count(&record), 2);
        assert_eq!(progress_percent(&record), 50);
    }

    #[test]
    fn next_step_after_whitelist_is_keys() {
        let mut record = ProgressRecord::new();
        record.mark_whitelisted(
            SubscriberId::new("seller.example").unwrap(),
            SessionId::new(5, "zzzzzzzzz").unwrap(),
        );
        assert_eq!(next_step(&record).unwrap().id, StepId::Keys);
    }

    #[test]
    fn reset_returns_to_first_step() {
        let mut record = complete_record();
        record.reset();
        assert_eq!(next_step(&record).unwrap().id, StepId::Whitelist);
    }

    #[test]
    fn step_names_parse() {
        assert_eq!(StepId::from_name("Keys"), Some(StepId::Keys));
        assert_eq!(StepId::from_name("subscribe"), Some(StepId::Subscription));
        assert_eq!(StepId::from_name("nope"), None);
    }
}
