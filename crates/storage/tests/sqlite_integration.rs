use onboard_core::model::{KeySet, ProgressRecord, SessionId, SubscriberId};
use onboard_core::steps::{StepId, next_step};
use storage::flags;
use storage::repository::{ProgressRepository, Storage};
use storage::sqlite::SqliteRepository;

fn keys() -> KeySet {
    KeySet {
        sign_private_key: "sign-private".into(),
        sign_public_key: "sign-public".into(),
        enc_private_key: "enc-private".into(),
        enc_public_key: "enc-public".into(),
        session_id: None,
    }
}

fn whitelisted() -> ProgressRecord {
    let mut record = ProgressRecord::new();
    record.mark_whitelisted(
        SubscriberId::new("buyer-app.ondc.org").unwrap(),
        SessionId::new(1_700_000_000_000, "k2j4h6g8f").unwrap(),
    );
    record
}

#[tokio::test]
async fn sqlite_roundtrip_persists_progress() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_progress?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let mut record = whitelisted();
    record.set_keys(keys());
    repo.save_progress(&record).await.unwrap();

    let loaded = repo.load_progress().await.unwrap();
    assert_eq!(loaded, record);
    assert_eq!(next_step(&loaded).unwrap().id, StepId::Deployment);

    let raw = repo.load_flags().await.unwrap();
    assert_eq!(
        raw.get(flags::SESSION_ID).map(String::as_str),
        Some("ondc_1700000000000_k2j4h6g8f")
    );
    assert!(!raw.contains_key(flags::DEPLOYMENT_COMPLETED));
}

#[tokio::test]
async fn sqlite_save_replaces_previous_flags() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_replace?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let mut record = whitelisted();
    record.set_deployment_completed(true);
    repo.save_progress(&record).await.unwrap();

    record.clear_whitelist();
    repo.save_progress(&record).await.unwrap();

    let raw = repo.load_flags().await.unwrap();
    assert!(!raw.contains_key(flags::WHITELIST_VERIFIED));
    assert!(!raw.contains_key(flags::SESSION_ID));
    let loaded = repo.load_progress().await.unwrap();
    assert!(!loaded.whitelist_verified());
    assert!(loaded.deployment_completed());
}

#[tokio::test]
async fn sqlite_clear_resets_to_empty() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_clear?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.save_progress(&whitelisted()).await.unwrap();
    repo.clear_progress().await.unwrap();

    let loaded = repo.load_progress().await.unwrap();
    assert!(loaded.is_empty());
    assert_eq!(next_step(&loaded).unwrap().id, StepId::Whitelist);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");
}

#[tokio::test]
async fn storage_facade_uses_sqlite_backend() {
    let storage = Storage::sqlite("sqlite:file:memdb_facade?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage.progress.save_progress(&whitelisted()).await.unwrap();
    let loaded = storage.progress.load_progress().await.unwrap();
    assert!(loaded.whitelist_verified());
}
