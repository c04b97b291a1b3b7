mod support;

use fiatlife_model::{Bill, BillCategory, CreditAccount, FinancialGoal, SalaryConfig};
use fiatlife_storage::Database;
use fiatlife_sync::{
    BillRepository, CreditAccountRepository, GoalRepository, JsonCodec, SalaryRepository,
    SyncReport, DEFAULT_SYNC_TIMEOUT,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use support::{FakeBlobs, FakeRelay};

fn goal_json(id: &str, updated_at: i64) -> String {
    serde_json::to_string(&FinancialGoal {
        id: id.into(),
        name: format!("goal {id}"),
        updated_at,
        ..FinancialGoal::default()
    })
    .unwrap()
}

fn goal_repo(db: &Database, relay: &Arc<FakeRelay>, timeout: Duration) -> GoalRepository {
    GoalRepository::new(db.goals(), relay.clone(), JsonCodec, timeout)
}

#[tokio::test]
async fn pull_upserts_with_payload_timestamp() {
    let db = Database::open_in_memory().unwrap();
    let relay = Arc::new(FakeRelay::with_signer());
    relay.push_app_data("fiatlife/goal/g1", &goal_json("g1", 1_000));
    relay.push_app_data("fiatlife/goal/g2", &goal_json("g2", 3_000));
    relay.push_app_data("fiatlife/bill/b1", "{}");
    let repo = goal_repo(&db, &relay, DEFAULT_SYNC_TIMEOUT);

    let report = repo.sync_from_relay().await;

    assert_eq!(report, SyncReport { upserted: 2, deleted: 0, skipped: 0, interrupted: false });
    let goals = repo.list_goals().await.unwrap();
    let ids: Vec<&str> = goals.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(ids, vec!["g2", "g1"]);
    assert_eq!(db.goals().get_by_key("g1").await.unwrap().unwrap().updated_at, 1_000);
}

#[tokio::test]
async fn tombstone_deletes_local_row() {
    let db = Database::open_in_memory().unwrap();
    let relay = Arc::new(FakeRelay::with_signer());
    let repo = goal_repo(&db, &relay, DEFAULT_SYNC_TIMEOUT);
    relay.push_app_data("fiatlife/goal/g1", &goal_json("g1", 1));
    repo.sync_from_relay().await;
    assert!(repo.get_goal("g1").await.unwrap().is_some());

    let relay = Arc::new(FakeRelay::with_signer());
    relay.push_app_data("fiatlife/goal/g1", r#"{"deleted":true}"#);
    let report = goal_repo(&db, &relay, DEFAULT_SYNC_TIMEOUT).sync_from_relay().await;

    assert_eq!(report.deleted, 1);
    assert_eq!(repo.get_goal("g1").await.unwrap(), None);
}

#[tokio::test]
async fn bill_sync_honors_tombstones() {
    let db = Database::open_in_memory().unwrap();
    db.bills()
        .upsert(fiatlife_storage::BillEntity {
            id: "b1".into(),
            json_data: "{}".into(),
            category: "OTHER".into(),
            updated_at: 1,
        })
        .await
        .unwrap();
    let relay = Arc::new(FakeRelay::with_signer());
    relay.push_app_data("fiatlife/bill/b1", r#"{"deleted": true}"#);
    let repo = BillRepository::new(
        db.bills(),
        relay.clone(),
        Arc::new(FakeBlobs::default()),
        JsonCodec,
        DEFAULT_SYNC_TIMEOUT,
    );

    assert_eq!(repo.sync_from_relay().await.deleted, 1);
    assert_eq!(db.bills().count().await.unwrap(), 0);
}

#[tokio::test]
async fn unparsable_and_anonymous_payloads_are_skipped() {
    let db = Database::open_in_memory().unwrap();
    let relay = Arc::new(FakeRelay::with_signer());
    relay.push_app_data("fiatlife/bill/x", "not json at all");
    relay.push_app_data("fiatlife/bill/y", r#"{"name":"no id"}"#);
    relay.push_app_data("fiatlife/bill/z", r#"{"id":"z","frequency":"FORTNIGHTLY"}"#);
    let bill = Bill { id: "ok".into(), category: BillCategory::Pet, updated_at: 9, ..Bill::default() };
    relay.push_app_data("fiatlife/bill/ok", &serde_json::to_string(&bill).unwrap());
    let repo = BillRepository::new(
        db.bills(),
        relay.clone(),
        Arc::new(FakeBlobs::default()),
        JsonCodec,
        DEFAULT_SYNC_TIMEOUT,
    );

    let report = repo.sync_from_relay().await;

    assert_eq!(report, SyncReport { upserted: 1, deleted: 0, skipped: 3, interrupted: false });
    assert_eq!(repo.list_bills().await.unwrap(), vec![bill]);
    assert_eq!(db.bills().get_by_key("ok").await.unwrap().unwrap().category, "PET");
}

#[tokio::test]
async fn pulled_payload_keeps_unknown_keys_in_storage() {
    let db = Database::open_in_memory().unwrap();
    let relay = Arc::new(FakeRelay::with_signer());
    let json = r#"{"id":"c1","type":"HELOC","futureField":[1,2,3],"updatedAt":5}"#;
    relay.push_app_data("fiatlife/credit/c1", json);
    let repo = CreditAccountRepository::new(
        db.credit_accounts(),
        relay.clone(),
        Arc::new(FakeBlobs::default()),
        JsonCodec,
        DEFAULT_SYNC_TIMEOUT,
    );

    repo.sync_from_relay().await;

    let row = db.credit_accounts().get_by_key("c1").await.unwrap().unwrap();
    assert_eq!(row.json_data, json);
    assert_eq!(row.account_type, "HELOC");
    let account: CreditAccount = repo.get_account("c1").await.unwrap().unwrap();
    assert_eq!(account.minimum_payment_value, 2.0);
}

#[tokio::test]
async fn salary_sync_uses_exact_tag() {
    let db = Database::open_in_memory().unwrap();
    let relay = Arc::new(FakeRelay::with_signer());
    let config = SalaryConfig { id: "s1".into(), hourly_rate: 42.0, updated_at: 7, ..SalaryConfig::default() };
    relay.push_app_data("fiatlife/salary", &serde_json::to_string(&config).unwrap());
    relay.push_app_data("fiatlife/salary-archive", &serde_json::to_string(&config).unwrap());
    let repo = SalaryRepository::new(db.salary_configs(), relay.clone(), JsonCodec, DEFAULT_SYNC_TIMEOUT);

    let report = repo.sync_from_relay().await;

    assert_eq!(report.upserted, 1);
    assert_eq!(repo.current_config().await.unwrap(), Some(config));
}

#[tokio::test]
async fn sync_without_signer_does_nothing() {
    let db = Database::open_in_memory().unwrap();
    let relay = Arc::new(FakeRelay::without_signer());
    relay.push_app_data("fiatlife/goal/g1", &goal_json("g1", 1));

    let report = goal_repo(&db, &relay, DEFAULT_SYNC_TIMEOUT).sync_from_relay().await;

    assert_eq!(report, SyncReport::default());
    assert_eq!(db.goals().count().await.unwrap(), 0);
}

#[tokio::test]
async fn timeout_keeps_partial_progress() {
    let db = Database::open_in_memory().unwrap();
    let relay = Arc::new(FakeRelay::with_signer());
    relay.push_app_data("fiatlife/goal/g1", &goal_json("g1", 1));
    relay.stall_fetches();

    let report = goal_repo(&db, &relay, Duration::from_millis(200)).sync_from_relay().await;

    assert!(report.interrupted);
    assert_eq!(report.upserted, 1);
    assert_eq!(db.goals().count().await.unwrap(), 1);
}

#[test]
fn reports_merge() {
    let mut total = SyncReport { upserted: 1, deleted: 2, skipped: 0, interrupted: false };
    total.merge(SyncReport { upserted: 3, deleted: 0, skipped: 1, interrupted: true });
    assert_eq!(total, SyncReport { upserted: 4, deleted: 2, skipped: 1, interrupted: true });
}
