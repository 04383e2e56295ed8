use std::sync::Arc;

use onboard_core::model::{KeySet, ProgressRecord, SessionId, SubscriberId};
use storage::repository::{ProgressRepository, Storage, StorageError};

use super::test_harness::{ViewKind, setup_view_harness, setup_view_harness_with_storage};

fn whitelisted() -> ProgressRecord {
    let mut record = ProgressRecord::new();
    record.mark_whitelisted(
        SubscriberId::new("buyer-app.ondc.org").unwrap(),
        SessionId::new(1_700_000_000_000, "abcdefghi").unwrap(),
    );
    record
}

fn finished() -> ProgressRecord {
    let mut record = whitelisted();
    record.set_keys(KeySet {
        sign_private_key: "MC4CAQAwBQYDK2VwBCIEIAbCdEfGhIjK".into(),
        sign_public_key: "MCowBQYDK2VwAyEAsPub".into(),
        enc_private_key: "MC4CAQAwBQYDK2VuBCIEIEncPriv".into(),
        enc_public_key: "MCowBQYDK2VuAyEAEncPub".into(),
        session_id: record.session_id().cloned(),
    });
    record.set_deployment_completed(true);
    record.set_subscription_completed(true);
    record
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_smoke_points_at_first_step() {
    let mut harness = setup_view_harness(ViewKind::Dashboard);
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("Continue: Verify Whitelisting Status"),
        "missing next step in {html}"
    );
    assert!(html.contains("0 of 4 steps complete"), "missing count in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_smoke_renders_finished_wizard() {
    let mut harness = setup_view_harness(ViewKind::Dashboard);
    harness
        .storage
        .progress
        .save_progress(&finished())
        .await
        .expect("seed progress");
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("All steps complete"), "missing finish in {html}");
    assert!(!html.contains("Continue:"), "unexpected next step in {html}");
    assert!(html.contains("100%"), "missing percent in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn keys_smoke_renders_empty_state() {
    let mut harness = setup_view_harness(ViewKind::Keys);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("No keys generated yet."), "missing empty state in {html}");
    assert!(html.contains("Generate Keys"), "missing action in {html}");
    assert!(!html.contains("Export Configuration"), "export without keys in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn keys_smoke_masks_private_keys() {
    let mut harness = setup_view_harness(ViewKind::Keys);
    harness
        .storage
        .progress
        .save_progress(&finished())
        .await
        .expect("seed progress");
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Regenerate Keys"), "missing regenerate in {html}");
    assert!(html.contains("Export Configuration"), "missing export in {html}");
    assert!(html.contains("MCowBQYDK2VwAyEAsPub"), "missing public key in {html}");
    assert!(
        !html.contains("MC4CAQAwBQYDK2VwBCIEIAbCdEfGhIjK"),
        "private key leaked in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn whitelist_smoke_shows_verified_subscriber() {
    let mut harness = setup_view_harness(ViewKind::Whitelist);
    harness
        .storage
        .progress
        .save_progress(&whitelisted())
        .await
        .expect("seed progress");
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("buyer-app.ondc.org"), "missing subscriber in {html}");
    assert!(
        html.contains("ondc_1700000000000_abcdefghi"),
        "missing session in {html}"
    );
    assert!(html.contains("Continue to Key Generation"), "missing link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn whitelist_smoke_renders_form_when_unverified() {
    let mut harness = setup_view_harness(ViewKind::Whitelist);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Verify Whitelisting Status"), "missing button in {html}");
    assert!(html.contains("subscriber-id"), "missing input in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn static_views_render() {
    for (view, expected) in [
        (ViewKind::HowToUse, "Generate Cryptographic Keys"),
        (ViewKind::Deployment, "Generate Configuration"),
        (ViewKind::Subscribe, "Network participants (1)"),
        (ViewKind::Headers, "Create Header"),
    ] {
        let mut harness = setup_view_harness(view);
        harness.settle().await;
        let html = harness.render();
        assert!(html.contains(expected), "missing {expected} in {html}");
    }
}

struct FailingProgressRepo;

#[async_trait::async_trait]
impl ProgressRepository for FailingProgressRepo {
    async fn load_progress(&self) -> Result<ProgressRecord, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn save_progress(&self, _record: &ProgressRecord) -> Result<(), StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn clear_progress(&self) -> Result<(), StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_smoke_renders_error_state() {
    let storage = Storage {
        progress: Arc::new(FailingProgressRepo),
    };
    let mut harness = setup_view_harness_with_storage(ViewKind::Dashboard, storage);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Something went wrong"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}
