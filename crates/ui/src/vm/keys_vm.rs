use onboard_core::model::KeySet;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyRowVm {
    pub label: &'static str,
    pub env_name: &'static str,
    pub value: String,
    pub is_private: bool,
}

const VISIBLE_PREFIX: usize = 8;

/// Keep a short prefix and hide the rest.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= VISIBLE_PREFIX {
        return "*".repeat(secret.chars().count());
    }
    let prefix: String = secret.chars().take(VISIBLE_PREFIX).collect();
    format!("{prefix}{}", "*".repeat(16))
}

#[must_use]
pub fn map_key_rows(keys: &KeySet, reveal_private: bool) -> Vec<KeyRowVm> {
    let private = |value: &str| {
        if reveal_private {
            value.to_string()
        } else {
            mask_secret(value)
        }
    };
    vec![
        KeyRowVm {
            label: "Signing Private Key",
            env_name: "ONDC_SIGNING_PRIVATE_KEY",
            value: private(&keys.sign_private_key),
            is_private: true,
        },
        KeyRowVm {
            label: "Signing Public Key",
            env_name: "ONDC_SIGNING_PUBLIC_KEY",
            value: keys.sign_public_key.clone(),
            is_private: false,
        },
        KeyRowVm {
            label: "Encryption Private Key",
            env_name: "ONDC_ENCRYPTION_PRIVATE_KEY",
            value: private(&keys.enc_private_key),
            is_private: true,
        },
        KeyRowVm {
            label: "Encryption Public Key",
            env_name: "ONDC_ENCRYPTION_PUBLIC_KEY",
            value: keys.enc_public_key.clone(),
            is_private: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> KeySet {
        KeySet {
            sign_private_key: "zeiPflZ2GHCX1bkzm4C4".into(),
            sign_public_key: "3fdeC79Oqcsb".into(),
            enc_private_key: "MC4CAQEwBQYDK2Vu".into(),
            enc_public_key: "MCowBQYDK2VuAyEA".into(),
            session_id: None,
        }
    }

    #[test]
    fn private_keys_are_masked_by_default() {
        let rows = map_key_rows(&keys(), false);
        assert_eq!(rows[0].value, "zeiPflZ2****************");
        assert_eq!(rows[1].value, "3fdeC79Oqcsb");
        assert!(rows.iter().filter(|r| r.is_private).all(|r| r.value.contains('*')));
    }

    #[test]
    fn reveal_shows_full_values() {
        let rows = map_key_rows(&keys(), true);
        assert_eq!(rows[2].value, "MC4CAQEwBQYDK2Vu");
    }

    #[test]
    fn short_secrets_are_fully_hidden() {
        assert_eq!(mask_secret("abc"), "***");
    }
}
