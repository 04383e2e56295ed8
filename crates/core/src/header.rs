//! Text formats for ONDC-style request signing.
//!
//! Nothing here signs or hashes anything. The header and signing string are
//! rendered with placeholder material so integrators can see the shape of what
//! a real implementation produces.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use thiserror::Error;

/// Seconds between `created` and `expires`.
pub const HEADER_LIFETIME_SECS: i64 = 300;

pub const SIGNING_ALGORITHM: &str = "ed25519";

pub const SIGNED_HEADERS: &str = "(created) (expires) digest";

/// Fixed stand-in for an Ed25519 signature.
pub const PLACEHOLDER_SIGNATURE: &str = "MEUCIQDxyz123abc456def789ghi012jkl345mno678pqr901stu234vwx567yzAiEA890abc123def456ghi789jkl012mno345pqr678stu901vwx234yzabc567def890";

const DIGEST_SEED: &str = "BLAKE-512-hash-of-";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HeaderParseError {
    #[error("header must start with `Signature `")]
    MissingScheme,

    #[error("malformed header parameter: {0}")]
    MalformedParam(String),

    #[error("missing header parameter `{0}`")]
    MissingParam(&'static str),

    #[error("keyId must be `<subscriber>|<key id>|<algorithm>`")]
    InvalidKeyId,

    #[error("`{0}` must be a unix timestamp")]
    InvalidTimestamp(&'static str),
}

/// Parsed or rendered `Authorization` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationHeader {
    pub subscriber_id: String,
    pub unique_key_id: String,
    pub algorithm: String,
    pub created: i64,
    pub expires: i64,
    pub headers: String,
    pub signature: String,
}

impl AuthorizationHeader {
    /// Header stamped at `created`, expiring after [`HEADER_LIFETIME_SECS`].
    #[must_use]
    pub fn placeholder(subscriber_id: &str, unique_key_id: &str, created: i64) -> Self {
        Self {
            subscriber_id: subscriber_id.to_string(),
            unique_key_id: unique_key_id.to_string(),
            algorithm: SIGNING_ALGORITHM.to_string(),
            created,
            expires: created + HEADER_LIFETIME_SECS,
            headers: SIGNED_HEADERS.to_string(),
            signature: PLACEHOLDER_SIGNATURE.to_string(),
        }
    }

    #[must_use]
    pub fn key_id(&self) -> String {
        format!(
            "{}|{}|{}",
            self.subscriber_id, self.unique_key_id, self.algorithm
        )
    }

    /// True when `created < now < expires`.
    #[must_use]
    pub fn is_fresh_at(&self, now: i64) -> bool {
        self.created < now && now < self.expires
    }

    /// Parse the text produced by the `Display` impl.
    ///
    /// # Errors
    ///
    /// Returns `HeaderParseError` when the scheme, a parameter, the key id, or a
    /// timestamp is malformed or missing.
    pub fn parse(raw: &str) -> Result<Self, HeaderParseError> {
        let params = raw
            .trim()
            .strip_prefix("Signature ")
            .ok_or(HeaderParseError::MissingScheme)?;

        let mut key_id = None;
        let mut algorithm = None;
        let mut created = None;
        let mut expires = None;
        let mut headers = None;
        let mut signature = None;

        for param in split_params(params) {
            let (name, value) = parse_param(param)?;
            match name {
                "keyId" => key_id = Some(value),
                "algorithm" => algorithm = Some(value),
                "created" => created = Some(value),
                "expires" => expires = Some(value),
                "headers" => headers = Some(value),
                "signature" => signature = Some(value),
                _ => {}
            }
        }

        let key_id = key_id.ok_or(HeaderParseError::MissingParam("keyId"))?;
        let mut parts = key_id.split('|');
        let (Some(subscriber_id), Some(unique_key_id), Some(key_algorithm), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(HeaderParseError::InvalidKeyId);
        };
        if subscriber_id.is_empty() || unique_key_id.is_empty() {
            return Err(HeaderParseError::InvalidKeyId);
        }

        let created = created
            .ok_or(HeaderParseError::MissingParam("created"))?
            .parse::<i64>()
            .map_err(|_| HeaderParseError::InvalidTimestamp("created"))?;
        let expires = expires
            .ok_or(HeaderParseError::MissingParam("expires"))?
            .parse::<i64>()
            .map_err(|_| HeaderParseError::InvalidTimestamp("expires"))?;

        Ok(Self {
            subscriber_id: subscriber_id.to_string(),
            unique_key_id: unique_key_id.to_string(),
            algorithm: algorithm.unwrap_or(key_algorithm).to_string(),
            created,
            expires,
            headers: headers.unwrap_or(SIGNED_HEADERS).to_string(),
            signature: signature
                .ok_or(HeaderParseError::MissingParam("signature"))?
                .to_string(),
        })
    }
}

impl fmt::Display for AuthorizationHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Signature keyId=\"{}\",algorithm=\"{}\",created=\"{}\",expires=\"{}\",headers=\"{}\",signature=\"{}\"",
            self.key_id(),
            self.algorithm,
            self.created,
            self.expires,
            self.headers,
            self.signature
        )
    }
}

/// Split on commas that are not inside double quotes.
fn split_params(raw: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (idx, ch) in raw.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(&raw[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&raw[start..]);
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

fn parse_param(param: &str) -> Result<(&str, &str), HeaderParseError> {
    let malformed = || HeaderParseError::MalformedParam(param.to_string());
    let (name, value) = param.split_once('=').ok_or_else(malformed)?;
    let value = value
        .trim()
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or_else(malformed)?;
    Ok((name.trim(), value))
}

/// The three-line string a real implementation would sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningString {
    pub created: i64,
    pub expires: i64,
    pub digest: String,
}

impl SigningString {
    #[must_use]
    pub fn for_body(header: &AuthorizationHeader, body: &Value) -> Self {
        Self {
            created: header.created,
            expires: header.expires,
            digest: pseudo_digest(body),
        }
    }
}

impl fmt::Display for SigningString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(created): {}\n(expires): {}\ndigest: BLAKE-512={}",
            self.created, self.expires, self.digest
        )
    }
}

/// Base64 of a fixed seed plus the compact body. Simulated; not a BLAKE hash.
#[must_use]
pub fn pseudo_digest(body: &Value) -> String {
    STANDARD.encode(format!("{DIGEST_SEED}{body}"))
}

/// Check that a request body is well-formed JSON.
///
/// # Errors
///
/// Returns the `serde_json` error for malformed input.
pub fn parse_json_body(raw: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(raw)
}
