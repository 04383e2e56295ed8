use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use onboard_core::model::{KeyConfigExport, KeySet};
use onboard_core::time::Clock;
use rand::Rng;
use storage::repository::ProgressRepository;
use tracing::{info, warn};

use crate::error::ActionError;
use crate::simulation::{ActionProfile, CancelToken, OutcomeProvider, simulate_latency};

pub const SIGN_PRIVATE_PREFIX: &str = "zeiPflZ2GHCX1bkzm4C4HfOoWclVKdZi9qYXgEnv89g";
pub const SIGN_PUBLIC_PREFIX: &str = "3fdeC79Oqcsb26JLPA8aZSyjWytVR+CdRVtkaneijPk";
pub const ENC_PRIVATE_PREFIX: &str = "MC4CAQEwBQYDK2VuBCIEIP";
pub const ENC_PUBLIC_PREFIX: &str = "MCowBQYDK2VuAyEAHjjX+uHubK";

/// Produces placeholder key material. Nothing here is real cryptography.
#[derive(Clone)]
pub struct KeyService {
    clock: Clock,
    progress: Arc<dyn ProgressRepository>,
    outcomes: Arc<dyn OutcomeProvider>,
    profile: ActionProfile,
}

impl KeyService {
    #[must_use]
    pub fn new(
        clock: Clock,
        progress: Arc<dyn ProgressRepository>,
        outcomes: Arc<dyn OutcomeProvider>,
        profile: ActionProfile,
    ) -> Self {
        Self {
            clock,
            progress,
            outcomes,
            profile,
        }
    }

    /// Generate and store a fresh key set, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `ActionError::Cancelled`, `ActionError::Rejected`, or
    /// `ActionError::Storage`.
    pub async fn generate(&self, token: &CancelToken) -> Result<KeySet, ActionError> {
        simulate_latency(self.profile.latency, token).await?;

        if !self.outcomes.succeeds(self.profile.success_rate) {
            warn!("key generation rejected");
            return Err(ActionError::Rejected("Key generation failed"));
        }

        let mut record = self.progress.load_progress().await?;
        let keys = placeholder_keys(record.session_id().cloned());
        record.set_keys(keys.clone());
        self.progress.save_progress(&record).await?;

        info!(
            session = ?keys.session_id.as_ref().map(ToString::to_string),
            "key pairs generated"
        );
        Ok(keys)
    }

    /// The stored key set, if any.
    ///
    /// # Errors
    ///
    /// Returns `ActionError::Storage` if the repository cannot be read.
    pub async fn current(&self) -> Result<Option<KeySet>, ActionError> {
        let record = self.progress.load_progress().await?;
        Ok(record.keys().cloned())
    }

    /// Build the key configuration export from the stored keys.
    ///
    /// Keys generated before whitelisting fall back to the current session.
    ///
    /// # Errors
    ///
    /// Returns `ActionError::MissingPrerequisite` if no complete key set is
    /// stored, or `ActionError::Storage`.
    pub async fn export_config(&self) -> Result<KeyConfigExport, ActionError> {
        let record = self.progress.load_progress().await?;
        let keys = record
            .keys()
            .filter(|keys| keys.is_complete())
            .ok_or(ActionError::MissingPrerequisite(
                "Generate keys before exporting the configuration",
            ))?;
        let session = keys
            .session_id
            .clone()
            .or_else(|| record.session_id().cloned());
        Ok(KeyConfigExport::new(keys, session, self.clock.now()))
    }

    /// Write the key configuration export into `dir` and return its path.
    ///
    /// # Errors
    ///
    /// Same as [`KeyService::export_config`], plus `ActionError::Export` if
    /// the file cannot be written.
    pub async fn write_config(&self, dir: &Path) -> Result<PathBuf, ActionError> {
        let export = self.export_config().await?;
        let json = export
            .to_json_pretty()
            .map_err(|e| ActionError::Export(e.to_string()))?;
        let path = dir.join(export.file_name());
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| ActionError::Export(e.to_string()))?;
        info!(path = %path.display(), "key configuration exported");
        Ok(path)
    }
}

/// Base64 of `draws` random decimals, cut to `len` chars.
fn random_tail(rng: &mut impl Rng, draws: usize, len: usize) -> String {
    let mut seed: String = (0..draws).map(|_| rng.random::<f64>().to_string()).collect();
    while STANDARD.encode(&seed).len() < len {
        seed.push_str(&rng.random::<f64>().to_string());
    }
    STANDARD.encode(seed).chars().take(len).collect()
}

fn placeholder_keys(session_id: Option<onboard_core::model::SessionId>) -> KeySet {
    let mut rng = rand::rng();
    KeySet {
        sign_private_key: format!("{SIGN_PRIVATE_PREFIX}{}", random_tail(&mut rng, 1, 10)),
        sign_public_key: format!("{SIGN_PUBLIC_PREFIX}{}", random_tail(&mut rng, 1, 10)),
        enc_private_key: format!("{ENC_PRIVATE_PREFIX}{}", random_tail(&mut rng, 2, 30)),
        enc_public_key: format!("{ENC_PUBLIC_PREFIX}{}", random_tail(&mut rng, 2, 25)),
        session_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::FixedOutcomes;
    use onboard_core::model::{ProgressRecord, SessionId, SubscriberId};
    use onboard_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    fn service(repo: Arc<InMemoryRepository>) -> KeyService {
        KeyService::new(
            fixed_clock(),
            repo,
            Arc::new(FixedOutcomes::always_succeed()),
            ActionProfile::new(0, 1.0),
        )
    }

    #[test]
    fn placeholder_keys_use_fixed_prefixes() {
        let keys = placeholder_keys(None);
        assert!(keys.sign_private_key.starts_with(SIGN_PRIVATE_PREFIX));
        assert_eq!(keys.sign_private_key.len(), SIGN_PRIVATE_PREFIX.len() + 10);
        assert!(keys.sign_public_key.starts_with(SIGN_PUBLIC_PREFIX));
        assert_eq!(keys.enc_private_key.len(), ENC_PRIVATE_PREFIX.len() + 30);
        assert_eq!(keys.enc_public_key.len(), ENC_PUBLIC_PREFIX.len() + 25);
        assert!(keys.is_complete());
    }

    #[tokio::test]
    async fn generated_keys_carry_current_session() {
        let repo = Arc::new(InMemoryRepository::new());
        let session = SessionId::new(1_700_000_000_000, "abcdefghi").unwrap();
        let mut record = ProgressRecord::new();
        record.mark_whitelisted(SubscriberId::new("buyer-app.ondc.org").unwrap(), session.clone());
        repo.save_progress(&record).await.unwrap();

        let svc = service(Arc::clone(&repo));
        let keys = svc.generate(&CancelToken::never()).await.unwrap();
        assert_eq!(keys.session_id, Some(session));
        assert_eq!(svc.current().await.unwrap(), Some(keys));
    }

    #[tokio::test]
    async fn generation_without_whitelist_still_succeeds() {
        let repo = Arc::new(InMemoryRepository::new());
        let keys = service(Arc::clone(&repo))
            .generate(&CancelToken::never())
            .await
            .unwrap();
        assert!(keys.session_id.is_none());
        assert!(repo.load_progress().await.unwrap().has_keys());
    }

    #[tokio::test]
    async fn export_requires_stored_keys() {
        let repo = Arc::new(InMemoryRepository::new());
        let err = service(repo).export_config().await.unwrap_err();
        assert!(matches!(err, ActionError::MissingPrerequisite(_)));
    }

    #[tokio::test]
    async fn export_rejects_blank_key_fields() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut keys = placeholder_keys(None);
        keys.enc_private_key = String::new();
        let mut record = ProgressRecord::new();
        record.set_keys(keys);
        repo.save_progress(&record).await.unwrap();

        let err = service(repo).export_config().await.unwrap_err();
        assert!(matches!(err, ActionError::MissingPrerequisite(_)));
    }

    #[tokio::test]
    async fn export_falls_back_to_record_session() {
        let repo = Arc::new(InMemoryRepository::new());
        let svc = service(Arc::clone(&repo));
        svc.generate(&CancelToken::never()).await.unwrap();

        let session = SessionId::new(1_700_000_000_000, "abcdefghi").unwrap();
        let mut record = repo.load_progress().await.unwrap();
        record.mark_whitelisted(SubscriberId::new("buyer-app.ondc.org").unwrap(), session.clone());
        repo.save_progress(&record).await.unwrap();

        let export = svc.export_config().await.unwrap();
        assert_eq!(export.session_id, Some(session));
        assert_eq!(export.generated_at, "2023-11-14T22:13:20.000Z");
        assert_eq!(
            export.file_name(),
            "ondc-config-ondc_1700000000000_abcdefghi.json"
        );
    }

    #[tokio::test]
    async fn write_config_creates_pretty_json_file() {
        let repo = Arc::new(InMemoryRepository::new());
        let svc = service(Arc::clone(&repo));
        let keys = svc.generate(&CancelToken::never()).await.unwrap();

        let dir = std::env::temp_dir().join(format!("onboard-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = svc.write_config(&dir).await.unwrap();
        assert_eq!(path, dir.join("ondc-config.json"));

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("{\n  \"keys\""));
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["keys"]["signing"]["private_key"], keys.sign_private_key);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
