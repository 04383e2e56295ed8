use services::VerificationReport;

use crate::vm::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckVm {
    pub label: &'static str,
    pub passed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationVm {
    pub is_valid: bool,
    pub headline: String,
    pub checks: Vec<CheckVm>,
    pub subscriber_id: String,
    pub key_id: String,
    pub algorithm: String,
    pub checked_at: String,
}

impl From<&VerificationReport> for VerificationVm {
    fn from(report: &VerificationReport) -> Self {
        let headline = if report.is_valid {
            "Header verified successfully".to_string()
        } else {
            report
                .reason
                .clone()
                .unwrap_or_else(|| "Header verification failed".to_string())
        };
        let details = &report.details;
        Self {
            is_valid: report.is_valid,
            headline,
            checks: vec![
                CheckVm {
                    label: "Header format",
                    passed: details.header_format_valid,
                },
                CheckVm {
                    label: "Timestamp window",
                    passed: details.timestamp_valid,
                },
                CheckVm {
                    label: "Signature",
                    passed: details.signature_valid,
                },
            ],
            subscriber_id: details.subscriber_id.clone(),
            key_id: details.key_id.clone(),
            algorithm: details.algorithm.clone(),
            checked_at: format_datetime(report.timestamp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_core::time::fixed_now;
    use services::VerificationDetails;

    #[test]
    fn failed_report_uses_reason_as_headline() {
        let report = VerificationReport {
            is_valid: false,
            reason: Some("Invalid timestamp".into()),
            timestamp: fixed_now(),
            details: VerificationDetails {
                signature_valid: true,
                header_format_valid: true,
                timestamp_valid: false,
                algorithm: "ed25519".into(),
                subscriber_id: "buyer-app.ondc.org".into(),
                key_id: "207".into(),
            },
        };
        let vm = VerificationVm::from(&report);
        assert_eq!(vm.headline, "Invalid timestamp");
        assert!(!vm.checks[1].passed);
        assert_eq!(vm.checked_at, "2023-11-14 22:13:20 UTC");
    }
}
