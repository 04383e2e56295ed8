use std::sync::Arc;

use chrono::{DateTime, Utc};
use onboard_core::header::{AuthorizationHeader, SIGNING_ALGORITHM, SigningString, parse_json_body};
use serde::Serialize;
use serde_json::Value;
use storage::repository::ProgressRepository;
use tracing::{debug, info};

use crate::Clock;
use crate::error::ActionError;
use crate::simulation::{ActionProfile, CancelToken, OutcomeProvider, simulate_latency};

pub const DEFAULT_SUBSCRIBER_ID: &str = "buyer-app.ondc.org";
pub const DEFAULT_UNIQUE_KEY_ID: &str = "207";
pub const DEFAULT_REQUEST_BODY: &str = r#"{"order_id":"12345","amount":100.50,"currency":"INR"}"#;

/// Input for header creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRequest {
    pub subscriber_id: String,
    pub unique_key_id: String,
    pub body: String,
    pub use_custom_key: bool,
    pub custom_private_key: String,
}

impl Default for HeaderRequest {
    fn default() -> Self {
        Self {
            subscriber_id: DEFAULT_SUBSCRIBER_ID.into(),
            unique_key_id: DEFAULT_UNIQUE_KEY_ID.into(),
            body: DEFAULT_REQUEST_BODY.into(),
            use_custom_key: false,
            custom_private_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatedHeader {
    pub header: AuthorizationHeader,
    pub signing_string: SigningString,
    pub body: Value,
}

/// Input for header verification. All three fields are required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyRequest {
    pub header: String,
    pub body: String,
    pub public_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationDetails {
    pub signature_valid: bool,
    pub header_format_valid: bool,
    pub timestamp_valid: bool,
    pub algorithm: String,
    pub subscriber_id: String,
    pub key_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub details: VerificationDetails,
}

const UNKNOWN: &str = "unknown";

/// Simulated creation and verification of signed `Authorization` headers.
#[derive(Clone)]
pub struct HeaderService {
    clock: Clock,
    progress: Arc<dyn ProgressRepository>,
    outcomes: Arc<dyn OutcomeProvider>,
    create_profile: ActionProfile,
    verify_profile: ActionProfile,
}

impl HeaderService {
    #[must_use]
    pub fn new(
        clock: Clock,
        progress: Arc<dyn ProgressRepository>,
        outcomes: Arc<dyn OutcomeProvider>,
        create_profile: ActionProfile,
        verify_profile: ActionProfile,
    ) -> Self {
        Self {
            clock,
            progress,
            outcomes,
            create_profile,
            verify_profile,
        }
    }

    /// Stamp a header for `request.body`. The signature is a fixed placeholder.
    ///
    /// # Errors
    ///
    /// Returns `ActionError::MissingPrerequisite` when no signing key is
    /// available and `ActionError::InvalidJson` for a malformed body, both
    /// before any delay. Otherwise `ActionError::Cancelled` or
    /// `ActionError::Storage`.
    pub async fn create(
        &self,
        request: &HeaderRequest,
        token: &CancelToken,
    ) -> Result<CreatedHeader, ActionError> {
        let has_key = if request.use_custom_key {
            !request.custom_private_key.trim().is_empty()
        } else {
            let record = self.progress.load_progress().await?;
            record
                .keys()
                .is_some_and(|keys| !keys.sign_private_key.is_empty())
        };
        if !has_key {
            return Err(ActionError::MissingPrerequisite(
                "No signing private key provided. Please enter a private key or generate keys first",
            ));
        }
        let body =
            parse_json_body(&request.body).map_err(|e| ActionError::InvalidJson(e.to_string()))?;

        simulate_latency(self.create_profile.latency, token).await?;

        let header = AuthorizationHeader::placeholder(
            &request.subscriber_id,
            &request.unique_key_id,
            self.clock.unix_seconds(),
        );
        let signing_string = SigningString::for_body(&header, &body);
        info!(
            key_id = %header.key_id(),
            created = header.created,
            custom_key = request.use_custom_key,
            "authorization header created"
        );
        Ok(CreatedHeader {
            header,
            signing_string,
            body,
        })
    }

    /// Check a header's format and freshness, then roll the simulated
    /// signature check.
    ///
    /// # Errors
    ///
    /// Returns `ActionError::InvalidInput` when a field is blank and
    /// `ActionError::InvalidJson` for a malformed body, both before any delay.
    /// Otherwise only `ActionError::Cancelled`.
    pub async fn verify(
        &self,
        request: &VerifyRequest,
        token: &CancelToken,
    ) -> Result<VerificationReport, ActionError> {
        if [&request.header, &request.body, &request.public_key]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(ActionError::InvalidInput(
                "Please fill in all fields for verification",
            ));
        }
        parse_json_body(&request.body).map_err(|e| ActionError::InvalidJson(e.to_string()))?;

        simulate_latency(self.verify_profile.latency, token).await?;

        let now = self.clock.now();
        let parsed = AuthorizationHeader::parse(&request.header);
        if let Err(err) = &parsed {
            debug!(error = %err, "header did not parse");
        }
        let header_format_valid = parsed.is_ok();
        let timestamp_valid = parsed
            .as_ref()
            .is_ok_and(|header| header.is_fresh_at(now.timestamp()));
        let signature_valid = self.outcomes.succeeds(self.verify_profile.success_rate);

        let is_valid = header_format_valid && timestamp_valid && signature_valid;
        let reason = if is_valid {
            None
        } else if !header_format_valid {
            Some("Invalid header format")
        } else if !timestamp_valid {
            Some("Invalid timestamp")
        } else {
            Some("Signature verification failed")
        };

        let (subscriber_id, key_id) = parsed.as_ref().map_or_else(
            |_| (UNKNOWN.to_string(), UNKNOWN.to_string()),
            |header| (header.subscriber_id.clone(), header.unique_key_id.clone()),
        );
        let report = VerificationReport {
            is_valid,
            reason: reason.map(str::to_string),
            timestamp: now,
            details: VerificationDetails {
                signature_valid,
                header_format_valid,
                timestamp_valid,
                algorithm: SIGNING_ALGORITHM.to_string(),
                subscriber_id,
                key_id,
            },
        };
        info!(
            valid = report.is_valid,
            reason = report.reason.as_deref().unwrap_or("none"),
            "authorization header verified"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{FixedOutcomes, ScriptedOutcomes};
    use chrono::Duration;
    use onboard_core::model::{KeySet, ProgressRecord};
    use onboard_core::time::{fixed_clock, fixed_now};
    use storage::repository::InMemoryRepository;

    fn service_at(
        clock: Clock,
        repo: Arc<InMemoryRepository>,
        outcomes: Arc<dyn OutcomeProvider>,
    ) -> HeaderService {
        HeaderService::new(
            clock,
            repo,
            outcomes,
            ActionProfile::new(0, 1.0),
            ActionProfile::new(0, 0.8),
        )
    }

    fn later() -> Clock {
        Clock::fixed(fixed_now() + Duration::seconds(30))
    }

    async fn repo_with_keys() -> Arc<InMemoryRepository> {
        let repo = Arc::new(InMemoryRepository::new());
        let mut record = ProgressRecord::new();
        record.set_keys(KeySet {
            sign_private_key: "sp".into(),
            sign_public_key: "spub".into(),
            enc_private_key: "ep".into(),
            enc_public_key: "epub".into(),
            session_id: None,
        });
        repo.save_progress(&record).await.unwrap();
        repo
    }

    #[tokio::test]
    async fn create_without_any_key_is_rejected() {
        let repo = Arc::new(InMemoryRepository::new());
        let request = HeaderRequest {
            body: r#"{"a":1}"#.into(),
            ..HeaderRequest::default()
        };
        let err = service_at(fixed_clock(), repo, Arc::new(FixedOutcomes::always_succeed()))
            .create(&request, &CancelToken::never())
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::MissingPrerequisite(_)));
    }

    #[tokio::test]
    async fn create_with_custom_key_needs_no_stored_keys() {
        let repo = Arc::new(InMemoryRepository::new());
        let request = HeaderRequest {
            use_custom_key: true,
            custom_private_key: "my-key".into(),
            ..HeaderRequest::default()
        };
        let created = service_at(fixed_clock(), repo, Arc::new(FixedOutcomes::always_succeed()))
            .create(&request, &CancelToken::never())
            .await
            .unwrap();
        assert_eq!(created.header.created, fixed_now().timestamp());
        assert_eq!(created.header.expires, fixed_now().timestamp() + 300);
        assert_eq!(created.header.key_id(), "buyer-app.ondc.org|207|ed25519");
    }

    #[tokio::test]
    async fn create_rejects_malformed_body() {
        let repo = repo_with_keys().await;
        let request = HeaderRequest {
            body: "{oops".into(),
            ..HeaderRequest::default()
        };
        let err = service_at(fixed_clock(), repo, Arc::new(FixedOutcomes::always_succeed()))
            .create(&request, &CancelToken::never())
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::InvalidJson(_)));
    }

    #[tokio::test]
    async fn created_header_verifies_later() {
        let repo = repo_with_keys().await;
        let created = service_at(
            fixed_clock(),
            Arc::clone(&repo),
            Arc::new(FixedOutcomes::always_succeed()),
        )
        .create(&HeaderRequest::default(), &CancelToken::never())
        .await
        .unwrap();

        let report = service_at(later(), repo, Arc::new(FixedOutcomes::always_succeed()))
            .verify(
                &VerifyRequest {
                    header: created.header.to_string(),
                    body: DEFAULT_REQUEST_BODY.into(),
                    public_key: "spub".into(),
                },
                &CancelToken::never(),
            )
            .await
            .unwrap();
        assert!(report.is_valid);
        assert_eq!(report.reason, None);
        assert_eq!(report.details.subscriber_id, "buyer-app.ondc.org");
        assert_eq!(report.details.key_id, "207");
    }

    #[tokio::test]
    async fn verify_at_creation_second_is_not_fresh() {
        let repo = Arc::new(InMemoryRepository::new());
        let header = AuthorizationHeader::placeholder("a", "1", fixed_now().timestamp());
        let report = service_at(fixed_clock(), repo, Arc::new(FixedOutcomes::always_succeed()))
            .verify(
                &VerifyRequest {
                    header: header.to_string(),
                    body: "{}".into(),
                    public_key: "k".into(),
                },
                &CancelToken::never(),
            )
            .await
            .unwrap();
        assert!(!report.is_valid);
        assert_eq!(report.reason.as_deref(), Some("Invalid timestamp"));
    }

    #[tokio::test]
    async fn reason_precedence_prefers_format() {
        let repo = Arc::new(InMemoryRepository::new());
        let outcomes: Arc<dyn OutcomeProvider> = Arc::new(ScriptedOutcomes::new([false], true));
        let report = service_at(later(), repo, outcomes)
            .verify(
                &VerifyRequest {
                    header: "Bearer abc".into(),
                    body: "{}".into(),
                    public_key: "k".into(),
                },
                &CancelToken::never(),
            )
            .await
            .unwrap();
        assert_eq!(report.reason.as_deref(), Some("Invalid header format"));
        assert_eq!(report.details.subscriber_id, "unknown");
    }

    #[tokio::test]
    async fn failed_signature_roll_is_reported_last() {
        let repo = Arc::new(InMemoryRepository::new());
        let header = AuthorizationHeader::placeholder("a", "1", fixed_now().timestamp());
        let report = service_at(later(), repo, Arc::new(FixedOutcomes::always_fail()))
            .verify(
                &VerifyRequest {
                    header: header.to_string(),
                    body: "{}".into(),
                    public_key: "k".into(),
                },
                &CancelToken::never(),
            )
            .await
            .unwrap();
        assert!(!report.details.signature_valid);
        assert_eq!(
            report.reason.as_deref(),
            Some("Signature verification failed")
        );
    }

    #[tokio::test]
    async fn verify_requires_every_field() {
        let repo = Arc::new(InMemoryRepository::new());
        let err = service_at(later(), repo, Arc::new(FixedOutcomes::always_succeed()))
            .verify(
                &VerifyRequest {
                    header: "Signature x".into(),
                    body: "{}".into(),
                    public_key: "  ".into(),
                },
                &CancelToken::never(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::InvalidInput(_)));
    }
}
