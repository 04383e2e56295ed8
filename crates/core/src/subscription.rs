//! Subscription request model.
//!
//! Field names follow the registry's `subscribe` payload. Business fields are
//! collected verbatim: GST, PAN, e-mail, and mobile formats are not checked.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{KeySet, SessionId};

/// Standard domains a participant list is generated for.
pub const ONDC_DOMAINS: [&str; 10] = [
    "ONDC:RET10",
    "ONDC:RET11",
    "ONDC:RET12",
    "ONDC:RET13",
    "ONDC:RET14",
    "ONDC:RET15",
    "ONDC:RET16",
    "ONDC:RET18",
    "ONDC:AGR10",
    "nic2004:60232",
];

pub const BUYER_SUBSCRIBER_URL: &str = "/bap/retails/protocol/v1";
pub const SELLER_SUBSCRIBER_URL: &str = "/bpp/retails/protocol/v1";

/// Common city codes offered in the form.
pub const CITY_CODES: [(&str, &str); 9] = [
    ("std:01662", "Hisar (01662)"),
    ("std:011", "Delhi (011)"),
    ("std:022", "Mumbai (022)"),
    ("std:080", "Bangalore (080)"),
    ("std:040", "Hyderabad (040)"),
    ("std:033", "Kolkata (033)"),
    ("std:044", "Chennai (044)"),
    ("std:020", "Pune (020)"),
    ("*", "All Cities (*)"),
];

/// Signing key validity advertised in the payload (ten years).
pub const KEY_VALIDITY_DAYS: i64 = 3650;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum OperationType {
    Buyer,
    Seller,
    Both,
}

impl OperationType {
    pub const ALL: [OperationType; 3] = [
        OperationType::Buyer,
        OperationType::Seller,
        OperationType::Both,
    ];

    #[must_use]
    pub fn ops_no(self) -> u8 {
        match self {
            OperationType::Buyer => 1,
            OperationType::Seller => 2,
            OperationType::Both => 4,
        }
    }

    #[must_use]
    pub fn from_ops_no(ops_no: u8) -> Option<Self> {
        match ops_no {
            1 => Some(OperationType::Buyer),
            2 => Some(OperationType::Seller),
            4 => Some(OperationType::Both),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            OperationType::Buyer => "Buyer Application",
            OperationType::Seller => "Seller Application",
            OperationType::Both => "Both Buyer & Seller",
        }
    }

    fn includes_buyer(self) -> bool {
        matches!(self, OperationType::Buyer | OperationType::Both)
    }

    fn includes_seller(self) -> bool {
        matches!(self, OperationType::Seller | OperationType::Both)
    }
}

impl From<OperationType> for u8 {
    fn from(value: OperationType) -> Self {
        value.ops_no()
    }
}

impl TryFrom<u8> for OperationType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_ops_no(value).ok_or_else(|| format!("unknown ops_no {value}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticipantType {
    #[serde(rename = "buyerApp")]
    BuyerApp,
    #[serde(rename = "sellerApp")]
    SellerApp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkParticipant {
    pub subscriber_url: String,
    pub domain: String,
    #[serde(rename = "type")]
    pub participant_type: ParticipantType,
    pub msn: bool,
    pub city_code: Vec<String>,
}

impl NetworkParticipant {
    #[must_use]
    pub fn buyer(domain: &str) -> Self {
        Self {
            subscriber_url: BUYER_SUBSCRIBER_URL.to_string(),
            domain: domain.to_string(),
            participant_type: ParticipantType::BuyerApp,
            msn: false,
            city_code: vec!["*".to_string()],
        }
    }

    #[must_use]
    pub fn seller(domain: &str) -> Self {
        Self {
            subscriber_url: SELLER_SUBSCRIBER_URL.to_string(),
            domain: domain.to_string(),
            participant_type: ParticipantType::SellerApp,
            msn: false,
            city_code: vec!["*".to_string()],
        }
    }
}

/// Participants for every standard domain, buyers first.
#[must_use]
pub fn participants_for(ops: OperationType) -> Vec<NetworkParticipant> {
    let mut participants = Vec::new();
    if ops.includes_buyer() {
        participants.extend(ONDC_DOMAINS.iter().map(|d| NetworkParticipant::buyer(d)));
    }
    if ops.includes_seller() {
        participants.extend(ONDC_DOMAINS.iter().map(|d| NetworkParticipant::seller(d)));
    }
    participants
}

/// Everything the subscription form collects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionForm {
    pub operation: OperationType,
    pub legal_entity_name: String,
    pub business_address: String,
    pub city_code: Vec<String>,
    pub gst_no: String,
    pub name_as_per_pan: String,
    pub pan_no: String,
    pub date_of_incorporation: String,
    pub name_of_authorised_signatory: String,
    pub address_of_authorised_signatory: String,
    pub email_id: String,
    pub mobile_no: String,
    pub country: String,
    pub subscriber_id: String,
    pub callback_url: String,
    pub network_participant: Vec<NetworkParticipant>,
}

impl Default for SubscriptionForm {
    fn default() -> Self {
        Self {
            operation: OperationType::Buyer,
            legal_entity_name: String::new(),
            business_address: String::new(),
            city_code: vec!["std:01662".to_string()],
            gst_no: String::new(),
            name_as_per_pan: String::new(),
            pan_no: String::new(),
            date_of_incorporation: String::new(),
            name_of_authorised_signatory: String::new(),
            address_of_authorised_signatory: String::new(),
            email_id: String::new(),
            mobile_no: String::new(),
            country: "IND".to_string(),
            subscriber_id: String::new(),
            callback_url: "/".to_string(),
            network_participant: vec![NetworkParticipant::buyer(ONDC_DOMAINS[0])],
        }
    }
}

impl SubscriptionForm {
    /// Switch operation type and regenerate the participant list.
    pub fn set_operation(&mut self, operation: OperationType) {
        self.operation = operation;
        self.network_participant = participants_for(operation);
    }

    pub fn add_participant(&mut self) {
        self.network_participant
            .push(NetworkParticipant::buyer(ONDC_DOMAINS[0]));
    }

    /// Remove the participant at `index`; out-of-range indexes are ignored.
    pub fn remove_participant(&mut self, index: usize) {
        if index < self.network_participant.len() {
            self.network_participant.remove(index);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationContext {
    pub ops_no: OperationType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadContext {
    pub operation: OperationContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GstDetails {
    pub legal_entity_name: String,
    pub business_address: String,
    pub city_code: Vec<String>,
    pub gst_no: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanDetails {
    pub name_as_per_pan: String,
    pub pan_no: String,
    pub date_of_incorporation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyPair {
    pub signing_public_key: String,
    pub encryption_public_key: String,
    pub valid_from: String,
    pub valid_until: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDetails {
    pub gst: GstDetails,
    pub pan: PanDetails,
    pub name_of_authorised_signatory: String,
    pub address_of_authorised_signatory: String,
    pub email_id: String,
    pub mobile_no: Option<u64>,
    pub country: String,
    pub subscriber_id: String,
    pub unique_key_id: String,
    pub callback_url: String,
    pub key_pair: PublicKeyPair,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadMessage {
    pub request_id: String,
    pub timestamp: String,
    pub entity: EntityDetails,
    pub network_participant: Vec<NetworkParticipant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionPayload {
    pub context: PayloadContext,
    pub message: PayloadMessage,
}

impl SubscriptionPayload {
    /// Assemble the request. The session id doubles as request id and key id.
    #[must_use]
    pub fn build(
        form: &SubscriptionForm,
        session_id: &SessionId,
        keys: &KeySet,
        now: DateTime<Utc>,
    ) -> Self {
        let timestamp = format_timestamp(now);
        let valid_until = format_timestamp(now + Duration::days(KEY_VALIDITY_DAYS));
        Self {
            context: PayloadContext {
                operation: OperationContext {
                    ops_no: form.operation,
                },
            },
            message: PayloadMessage {
                request_id: session_id.to_string(),
                timestamp: timestamp.clone(),
                entity: EntityDetails {
                    gst: GstDetails {
                        legal_entity_name: form.legal_entity_name.clone(),
                        business_address: form.business_address.clone(),
                        city_code: form.city_code.clone(),
                        gst_no: form.gst_no.clone(),
                    },
                    pan: PanDetails {
                        name_as_per_pan: form.name_as_per_pan.clone(),
                        pan_no: form.pan_no.clone(),
                        date_of_incorporation: form.date_of_incorporation.clone(),
                    },
                    name_of_authorised_signatory: form.name_of_authorised_signatory.clone(),
                    address_of_authorised_signatory: form.address_of_authorised_signatory.clone(),
                    email_id: form.email_id.clone(),
                    mobile_no: parse_mobile(&form.mobile_no),
                    country: form.country.clone(),
                    subscriber_id: form.subscriber_id.clone(),
                    unique_key_id: session_id.to_string(),
                    callback_url: form.callback_url.clone(),
                    key_pair: PublicKeyPair {
                        signing_public_key: keys.sign_public_key.clone(),
                        encryption_public_key: keys.enc_public_key.clone(),
                        valid_from: timestamp,
                        valid_until,
                    },
                },
                network_participant: form.network_participant.clone(),
            },
        }
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Leading digits of the input, after an optional `+`.
///
/// `None` when there are no digits, and also when they overflow `u64`: a
/// number that long is not a mobile number, so it serializes as `null`.
fn parse_mobile(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    let digits: String = trimmed
        .strip_prefix('+')
        .unwrap_or(trimmed)
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}
