//! Shared plumbing for repositories whose records travel as kind 30078 app
//! data: d-tag layout, publish, tombstones and pull-from-relay.

use crate::client::{DTagFilter, RelayClient, KIND_APP_DATA};
use crate::codec::{JsonCodec, TOMBSTONE};
use crate::error::{SyncError, SyncResult};
use fiatlife_model::{Bill, CreditAccount, FinancialGoal, SalaryConfig, Versioned};
use fiatlife_storage::{
    BillEntity, CreditAccountEntity, EntityStore, GoalEntity, LiveQuery, Record,
    SalaryConfigEntity,
};
use futures::stream::{BoxStream, StreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Default bound on one relay pull.
pub const DEFAULT_SYNC_TIMEOUT: Duration = Duration::from_secs(30);

/// A model type stored in its own table and synced as app data.
pub trait AppData: Versioned + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Entity: Record;

    /// Singular noun used in log lines.
    const LABEL: &'static str;

    /// Which relay items belong to this type.
    fn filter() -> DTagFilter;

    fn d_tag(&self) -> String;

    /// Row for this record, with `json_data` as its payload.
    fn to_entity(&self, json_data: String) -> Self::Entity;

    fn entity_json(entity: &Self::Entity) -> &str;
}

impl AppData for SalaryConfig {
    type Entity = SalaryConfigEntity;
    const LABEL: &'static str = "salary config";

    fn filter() -> DTagFilter {
        DTagFilter::Exact("fiatlife/salary".into())
    }

    fn d_tag(&self) -> String {
        "fiatlife/salary".into()
    }

    fn to_entity(&self, json_data: String) -> SalaryConfigEntity {
        SalaryConfigEntity {
            id: self.id.clone(),
            json_data,
            updated_at: self.updated_at,
        }
    }

    fn entity_json(entity: &SalaryConfigEntity) -> &str {
        &entity.json_data
    }
}

impl AppData for Bill {
    type Entity = BillEntity;
    const LABEL: &'static str = "bill";

    fn filter() -> DTagFilter {
        DTagFilter::Prefix("fiatlife/bill/".into())
    }

    fn d_tag(&self) -> String {
        format!("fiatlife/bill/{}", self.id)
    }

    fn to_entity(&self, json_data: String) -> BillEntity {
        BillEntity {
            id: self.id.clone(),
            json_data,
            category: self.category.as_str().into(),
            updated_at: self.updated_at,
        }
    }

    fn entity_json(entity: &BillEntity) -> &str {
        &entity.json_data
    }
}

impl AppData for FinancialGoal {
    type Entity = GoalEntity;
    const LABEL: &'static str = "goal";

    fn filter() -> DTagFilter {
        DTagFilter::Prefix("fiatlife/goal/".into())
    }

    fn d_tag(&self) -> String {
        format!("fiatlife/goal/{}", self.id)
    }

    fn to_entity(&self, json_data: String) -> GoalEntity {
        GoalEntity {
            id: self.id.clone(),
            json_data,
            category: self.category.as_str().into(),
            updated_at: self.updated_at,
        }
    }

    fn entity_json(entity: &GoalEntity) -> &str {
        &entity.json_data
    }
}

impl AppData for CreditAccount {
    type Entity = CreditAccountEntity;
    const LABEL: &'static str = "credit account";

    fn filter() -> DTagFilter {
        DTagFilter::Prefix("fiatlife/credit/".into())
    }

    fn d_tag(&self) -> String {
        format!("fiatlife/credit/{}", self.id)
    }

    fn to_entity(&self, json_data: String) -> CreditAccountEntity {
        CreditAccountEntity {
            id: self.id.clone(),
            json_data,
            account_type: self.account_type.as_str().into(),
            updated_at: self.updated_at,
        }
    }

    fn entity_json(entity: &CreditAccountEntity) -> &str {
        &entity.json_data
    }
}

/// Outcome of one pull from the relay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub upserted: usize,
    pub deleted: usize,
    pub skipped: usize,
    /// The pull stopped early on an error or the timeout; counts cover what
    /// was applied before that.
    pub interrupted: bool,
}

impl SyncReport {
    pub fn merge(&mut self, other: SyncReport) {
        self.upserted += other.upserted;
        self.deleted += other.deleted;
        self.skipped += other.skipped;
        self.interrupted |= other.interrupted;
    }
}

/// Relay side of an app-data repository.
#[derive(Clone)]
pub(crate) struct AppDataSync {
    relay: Arc<dyn RelayClient>,
    codec: JsonCodec,
    timeout: Duration,
}

impl AppDataSync {
    pub(crate) fn new(relay: Arc<dyn RelayClient>, codec: JsonCodec, timeout: Duration) -> Self {
        Self {
            relay,
            codec,
            timeout,
        }
    }

    pub(crate) fn codec(&self) -> JsonCodec {
        self.codec
    }

    /// Stamps, stores and publishes `record`. Publish failures are logged.
    pub(crate) async fn save<M: AppData>(
        &self,
        store: &EntityStore<M::Entity>,
        record: M,
    ) -> SyncResult<M> {
        let record = fiatlife_model::prepare_for_save(
            record,
            || uuid::Uuid::new_v4().to_string(),
            crate::now_ms(),
        );
        let json = self.codec.encode(&record)?;
        store.upsert(record.to_entity(json.clone())).await?;
        self.publish(&record.d_tag(), &json, M::LABEL).await;
        Ok(record)
    }

    async fn publish(&self, d_tag: &str, json: &str, label: &str) {
        if !self.relay.has_signer() {
            debug!("no signer, {label} saved locally only");
            return;
        }
        match self.relay.publish_app_data(d_tag, json).await {
            Ok(()) => debug!(d_tag, "published {label} to relay"),
            Err(e) => error!(d_tag, "failed to publish {label}: {e}"),
        }
    }

    /// Publishes a tombstone and a deletion request for `d_tag`.
    pub(crate) async fn publish_delete(&self, d_tag: &str, label: &str) {
        if !self.relay.has_signer() {
            return;
        }
        match self.relay.publish_app_data(d_tag, TOMBSTONE).await {
            Ok(()) => debug!(d_tag, "published delete tombstone for {label}"),
            Err(e) => error!(d_tag, "failed to publish {label} tombstone: {e}"),
        }
        match self.relay.publish_deletion(KIND_APP_DATA, d_tag).await {
            Ok(()) => debug!(d_tag, "published deletion request for {label}"),
            Err(e) => error!(d_tag, "failed to publish {label} deletion request: {e}"),
        }
    }

    /// Pulls every item for `M` and applies it locally, bounded by the sync
    /// timeout. Never fails: problems are logged and flagged in the report.
    pub(crate) async fn pull<M: AppData>(&self, store: &EntityStore<M::Entity>) -> SyncReport {
        let mut report = SyncReport::default();
        if !self.relay.has_signer() {
            return report;
        }
        let outcome = tokio::time::timeout(self.timeout, self.apply::<M>(store, &mut report))
            .await
            .unwrap_or(Err(SyncError::Timeout(self.timeout)));
        match outcome {
            Ok(()) => info!(
                "synced {} {}(s) from relay, {} deleted, {} skipped",
                report.upserted,
                M::LABEL,
                report.deleted,
                report.skipped
            ),
            Err(e) => {
                report.interrupted = true;
                error!("{} sync failed: {e}", M::LABEL);
            }
        }
        report
    }

    async fn apply<M: AppData>(
        &self,
        store: &EntityStore<M::Entity>,
        report: &mut SyncReport,
    ) -> SyncResult<()> {
        let filter = M::filter();
        let mut items = self.relay.fetch_app_data(filter.clone());
        while let Some(item) = items.next().await {
            let item = item?;
            if self.codec.is_tombstone(&item.json) {
                match filter.id_in(&item.d_tag) {
                    Some(id) => {
                        store.delete_by_key(id).await?;
                        report.deleted += 1;
                        debug!(id, "deleted tombstoned {}", M::LABEL);
                    }
                    None => report.skipped += 1,
                }
                continue;
            }
            match self.codec.decode::<M>(&item.json) {
                Ok(record) if !record.id().is_empty() => {
                    store.upsert(record.to_entity(item.json)).await?;
                    report.upserted += 1;
                }
                Ok(_) => report.skipped += 1,
                Err(e) => {
                    warn!(d_tag = %item.d_tag, "failed to parse {} payload: {e}", M::LABEL);
                    report.skipped += 1;
                }
            }
        }
        Ok(())
    }
}

/// Decodes a live list of rows into models.
pub(crate) fn decode_list<M: AppData>(
    codec: JsonCodec,
    live: LiveQuery<Vec<M::Entity>>,
) -> BoxStream<'static, SyncResult<Vec<M>>> {
    live.into_stream()
        .map(move |rows| -> SyncResult<Vec<M>> { decode_rows::<M>(codec, &rows?) })
        .boxed()
}

/// Decodes a live single row into a model.
pub(crate) fn decode_one<M: AppData>(
    codec: JsonCodec,
    live: LiveQuery<Option<M::Entity>>,
) -> BoxStream<'static, SyncResult<Option<M>>> {
    live.into_stream()
        .map(move |row| -> SyncResult<Option<M>> { decode_row::<M>(codec, row?) })
        .boxed()
}

pub(crate) fn decode_rows<M: AppData>(codec: JsonCodec, rows: &[M::Entity]) -> SyncResult<Vec<M>> {
    rows.iter()
        .map(|row| codec.decode(M::entity_json(row)))
        .collect()
}

pub(crate) fn decode_row<M: AppData>(
    codec: JsonCodec,
    row: Option<M::Entity>,
) -> SyncResult<Option<M>> {
    row.map(|row| codec.decode(M::entity_json(&row))).transpose()
}
