use crate::app_data::{decode_one, AppDataSync, SyncReport};
use crate::client::RelayClient;
use crate::codec::JsonCodec;
use crate::error::SyncResult;
use fiatlife_model::SalaryConfig;
use fiatlife_storage::{EntityStore, SalaryConfigEntity};
use futures::stream::BoxStream;
use std::sync::Arc;
use std::time::Duration;

/// Salary configuration. The most recently saved row is the active one.
#[derive(Clone)]
pub struct SalaryRepository {
    store: EntityStore<SalaryConfigEntity>,
    sync: AppDataSync,
}

impl SalaryRepository {
    pub fn new(
        store: EntityStore<SalaryConfigEntity>,
        relay: Arc<dyn RelayClient>,
        codec: JsonCodec,
        sync_timeout: Duration,
    ) -> Self {
        Self {
            store,
            sync: AppDataSync::new(relay, codec, sync_timeout),
        }
    }

    /// Live view of the active configuration.
    pub fn observe_config(&self) -> BoxStream<'static, SyncResult<Option<SalaryConfig>>> {
        decode_one::<SalaryConfig>(self.sync.codec(), self.store.observe_latest())
    }

    pub async fn current_config(&self) -> SyncResult<Option<SalaryConfig>> {
        let latest = self.store.list_all().await?.into_iter().next();
        latest
            .map(|row| self.sync.codec().decode(&row.json_data))
            .transpose()
    }

    pub async fn save_config(&self, config: SalaryConfig) -> SyncResult<SalaryConfig> {
        self.sync.save(&self.store, config).await
    }

    pub async fn sync_from_relay(&self) -> SyncReport {
        self.sync.pull::<SalaryConfig>(&self.store).await
    }
}
