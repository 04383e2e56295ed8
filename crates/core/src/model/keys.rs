use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::SessionId;

/// Placeholder signing/encryption key strings.
///
/// These only look like Ed25519/X25519 material; nothing in the workspace treats
/// them as real keys. The serialized shape matches the `ondc_keys` JSON entry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySet {
    pub sign_private_key: String,
    pub sign_public_key: String,
    pub enc_private_key: String,
    pub enc_public_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
}

impl KeySet {
    /// Returns true if every key field is non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [
            &self.sign_private_key,
            &self.sign_public_key,
            &self.enc_private_key,
            &self.enc_public_key,
        ]
        .iter()
        .all(|key| !key.trim().is_empty())
    }
}

// Private halves stay out of debug output and logs.
impl fmt::Debug for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySet")
            .field("sign_public_key", &self.sign_public_key)
            .field("enc_public_key", &self.enc_public_key)
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}

pub const CONFIG_EXPORT_INSTRUCTIONS: [&str; 4] = [
    "1. Keep private keys secure and never expose them in public repositories",
    "2. Use the public keys for ONDC registration",
    "3. Implement the signing logic using the private key",
    "4. Store keys in environment variables or secure vaults",
];

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ExportedKeyPair {
    pub public_key: String,
    pub private_key: String,
}

impl fmt::Debug for ExportedKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportedKeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedKeys {
    pub signing: ExportedKeyPair,
    pub encryption: ExportedKeyPair,
}

/// Downloadable key configuration (`ondc-config-<session>.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyConfigExport {
    pub keys: ExportedKeys,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    /// RFC 3339 with milliseconds, UTC.
    pub generated_at: String,
    pub instructions: Vec<String>,
}

impl KeyConfigExport {
    #[must_use]
    pub fn new(keys: &KeySet, session_id: Option<SessionId>, generated_at: DateTime<Utc>) -> Self {
        Self {
            keys: ExportedKeys {
                signing: ExportedKeyPair {
                    public_key: keys.sign_public_key.clone(),
                    private_key: keys.sign_private_key.clone(),
                },
                encryption: ExportedKeyPair {
                    public_key: keys.enc_public_key.clone(),
                    private_key: keys.enc_private_key.clone(),
                },
            },
            session_id,
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            instructions: CONFIG_EXPORT_INSTRUCTIONS.map(String::from).to_vec(),
        }
    }

    /// `ondc-config-<session_id>.json`, or `ondc-config.json` without a session.
    #[must_use]
    pub fn file_name(&self) -> String {
        match &self.session_id {
            Some(session) => format!("ondc-config-{session}.json"),
            None => "ondc-config.json".to_string(),
        }
    }

    /// Two-space indented JSON.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
