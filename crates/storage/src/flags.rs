//! Flat string-keyed representation of a [`ProgressRecord`].
//!
//! Every backend stores the same keys, so a record written by one backend can be
//! read by another and by external tooling.

use std::collections::BTreeMap;

use onboard_core::model::{KeySet, ProgressRecord, SessionId, SubscriberId};

pub const WHITELIST_VERIFIED: &str = "ondc_whitelist_verified";
pub const SUBSCRIBER_ID: &str = "ondc_subscriber_id";
pub const SESSION_ID: &str = "ondc_session_id";
pub const KEYS: &str = "ondc_keys";
pub const DEPLOYMENT_COMPLETED: &str = "ondc_deployment_completed";
pub const SUBSCRIPTION_COMPLETED: &str = "ondc_subscription_completed";

pub type FlagMap = BTreeMap<String, String>;

const TRUE: &str = "true";

/// Flatten a record. Unset fields are omitted rather than stored empty.
///
/// # Errors
///
/// Returns the `serde_json` error if the key set cannot be serialized.
pub fn encode(record: &ProgressRecord) -> Result<FlagMap, serde_json::Error> {
    let mut flags = FlagMap::new();
    if record.whitelist_verified() {
        flags.insert(WHITELIST_VERIFIED.into(), TRUE.into());
    }
    if let Some(subscriber) = record.subscriber_id() {
        flags.insert(SUBSCRIBER_ID.into(), subscriber.to_string());
    }
    if let Some(session) = record.session_id() {
        flags.insert(SESSION_ID.into(), session.to_string());
    }
    if let Some(keys) = record.keys() {
        flags.insert(KEYS.into(), serde_json::to_string(keys)?);
    }
    if record.deployment_completed() {
        flags.insert(DEPLOYMENT_COMPLETED.into(), TRUE.into());
    }
    if record.subscription_completed() {
        flags.insert(SUBSCRIPTION_COMPLETED.into(), TRUE.into());
    }
    Ok(flags)
}

/// Rebuild a record from flags.
///
/// Total over any input: unknown keys are ignored and unparseable values read
/// as unset, so a corrupt store shows up as "nothing completed" for that field.
#[must_use]
pub fn decode(flags: &FlagMap) -> ProgressRecord {
    let is_true = |key: &str| flags.get(key).is_some_and(|v| v == TRUE);
    let subscriber = flags
        .get(SUBSCRIBER_ID)
        .and_then(|v| SubscriberId::new(v).ok());
    let session = flags.get(SESSION_ID).and_then(|v| v.parse::<SessionId>().ok());
    let keys = flags
        .get(KEYS)
        .and_then(|v| serde_json::from_str::<KeySet>(v).ok());

    ProgressRecord::from_persisted(
        is_true(WHITELIST_VERIFIED),
        subscriber,
        session,
        keys,
        is_true(DEPLOYMENT_COMPLETED),
        is_true(SUBSCRIPTION_COMPLETED),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> KeySet {
        KeySet {
            sign_private_key: "sp".into(),
            sign_public_key: "spub".into(),
            enc_private_key: "ep".into(),
            enc_public_key: "epub".into(),
            session_id: None,
        }
    }

    #[test]
    fn empty_record_encodes_to_no_flags() {
        let flags = encode(&ProgressRecord::new()).unwrap();
        assert!(flags.is_empty());
        assert_eq!(decode(&flags), ProgressRecord::new());
    }

    #[test]
    fn full_record_survives_flattening() {
        let mut record = ProgressRecord::new();
        record.mark_whitelisted(
            SubscriberId::new("buyer-app.ondc.org").unwrap(),
            SessionId::new(1_700_000_000_000, "abcdefghi").unwrap(),
        );
        record.set_keys(keys());
        record.set_deployment_completed(true);

        let flags = encode(&record).unwrap();
        assert_eq!(flags.get(WHITELIST_VERIFIED).map(String::as_str), Some("true"));
        assert_eq!(
            flags.get(SESSION_ID).map(String::as_str),
            Some("ondc_1700000000000_abcdefghi")
        );
        assert!(!flags.contains_key(SUBSCRIPTION_COMPLETED));
        assert_eq!(decode(&flags), record);
    }

    #[test]
    fn corrupt_values_read_as_unset() {
        let mut flags = FlagMap::new();
        flags.insert(KEYS.into(), "{not json".into());
        flags.insert(SESSION_ID.into(), "garbage".into());
        flags.insert(WHITELIST_VERIFIED.into(), "true".into());
        flags.insert(DEPLOYMENT_COMPLETED.into(), "yes".into());
        let record = decode(&flags);
        assert!(!record.has_keys());
        assert!(!record.whitelist_verified());
        assert!(!record.deployment_completed());
    }
}
