use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Characters a session suffix may use (lowercase base-36).
pub const SESSION_SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random session suffix.
pub const SESSION_SUFFIX_LEN: usize = 9;

const SESSION_PREFIX: &str = "ondc_";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubscriberIdError {
    #[error("subscriber id cannot be empty")]
    Empty,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionIdError {
    #[error("session id must start with `ondc_`")]
    MissingPrefix,

    #[error("session id timestamp must be unix milliseconds")]
    InvalidTimestamp,

    #[error("session suffix must be {SESSION_SUFFIX_LEN} lowercase alphanumeric characters")]
    InvalidSuffix,
}

/// Opaque integrator identifier. Only emptiness is checked.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriberId(String);

impl SubscriberId {
    /// Trim and wrap a subscriber id.
    ///
    /// # Errors
    ///
    /// Returns `SubscriberIdError::Empty` for blank input.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, SubscriberIdError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SubscriberIdError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriberId({})", self.0)
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SubscriberId {
    type Err = SubscriberIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Session token issued at whitelist verification: `ondc_<millis>_<suffix>`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId {
    millis: i64,
    suffix: String,
}

impl SessionId {
    /// Build a session id from its parts.
    ///
    /// # Errors
    ///
    /// Returns `SessionIdError` if the timestamp is negative or the suffix is malformed.
    pub fn new(millis: i64, suffix: impl Into<String>) -> Result<Self, SessionIdError> {
        if millis < 0 {
            return Err(SessionIdError::InvalidTimestamp);
        }
        let suffix = suffix.into();
        if suffix.len() != SESSION_SUFFIX_LEN
            || !suffix.bytes().all(|b| SESSION_SUFFIX_ALPHABET.contains(&b))
        {
            return Err(SessionIdError::InvalidSuffix);
        }
        Ok(Self { millis, suffix })
    }

    #[must_use]
    pub fn millis(&self) -> i64 {
        self.millis
    }

    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Returns true if `raw` is a well-formed session id.
    #[must_use]
    pub fn is_session_id(raw: &str) -> bool {
        raw.parse::<Self>().is_ok()
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({self})")
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SESSION_PREFIX}{}_{}", self.millis, self.suffix)
    }
}

impl FromStr for SessionId {
    type Err = SessionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix(SESSION_PREFIX)
            .ok_or(SessionIdError::MissingPrefix)?;
        let (millis, suffix) = rest
            .split_once('_')
            .ok_or(SessionIdError::InvalidSuffix)?;
        if millis.is_empty() || !millis.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SessionIdError::InvalidTimestamp);
        }
        let millis = millis
            .parse::<i64>()
            .map_err(|_| SessionIdError::InvalidTimestamp)?;
        Self::new(millis, suffix)
    }
}

impl TryFrom<String> for SessionId {
    type Error = SessionIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SessionId> for String {
    fn from(value: SessionId) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriber_id_is_trimmed() {
        let id = SubscriberId::new("  buyer-app.ondc.org ").unwrap();
        assert_eq!(id.as_str(), "buyer-app.ondc.org");
    }

    #[test]
    fn subscriber_id_rejects_blank() {
        assert_eq!(SubscriberId::new("   "), Err(SubscriberIdError::Empty));
    }

    #[test]
    fn session_id_display_matches_pattern() {
        let id = SessionId::new(1_700_000_000_000, "k3j9x0abc").unwrap();
        assert_eq!(id.to_string(), "ondc_1700000000000_k3j9x0abc");
    }

    #[test]
    fn session_id_parses_its_own_output() {
        let id: SessionId = "ondc_1700000000123_zzzzzzzzz".parse().unwrap();
        assert_eq!(id.millis(), 1_700_000_000_123);
        assert_eq!(id.suffix(), "zzzzzzzzz");
    }

    #[test]
    fn session_id_rejects_bad_suffix() {
        assert_eq!(
            SessionId::new(1, "ABCDEFGHI"),
            Err(SessionIdError::InvalidSuffix)
        );
        assert_eq!(SessionId::new(1, "short"), Err(SessionIdError::InvalidSuffix));
    }

    #[test]
    fn session_id_rejects_missing_prefix_and_timestamp() {
        assert_eq!(
            "sess_1_abcdefghi".parse::<SessionId>(),
            Err(SessionIdError::MissingPrefix)
        );
        assert_eq!(
            "ondc_-1_abcdefghi".parse::<SessionId>(),
            Err(SessionIdError::InvalidTimestamp)
        );
        assert!(!SessionId::is_session_id("ondc__abcdefghi"));
    }

    #[test]
    fn session_id_serializes_as_string() {
        let id = SessionId::new(42, "abcdefghi").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ondc_42_abcdefghi\"");
        let back: SessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
