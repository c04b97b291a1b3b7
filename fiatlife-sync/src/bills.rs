use crate::app_data::{decode_list, decode_one, decode_row, decode_rows, AppDataSync, SyncReport};
use crate::client::{BlobClient, RelayClient};
use crate::codec::JsonCodec;
use crate::error::SyncResult;
use fiatlife_model::{Bill, BillCategory};
use fiatlife_storage::{BillEntity, EntityStore};
use futures::stream::BoxStream;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Bills stored locally and synced as app data under `fiatlife/bill/<id>`.
#[derive(Clone)]
pub struct BillRepository {
    store: EntityStore<BillEntity>,
    sync: AppDataSync,
    blobs: Arc<dyn BlobClient>,
}

impl BillRepository {
    pub fn new(
        store: EntityStore<BillEntity>,
        relay: Arc<dyn RelayClient>,
        blobs: Arc<dyn BlobClient>,
        codec: JsonCodec,
        sync_timeout: Duration,
    ) -> Self {
        Self {
            store,
            sync: AppDataSync::new(relay, codec, sync_timeout),
            blobs,
        }
    }

    pub fn observe_bills(&self) -> BoxStream<'static, SyncResult<Vec<Bill>>> {
        decode_list::<Bill>(self.sync.codec(), self.store.observe_all())
    }

    pub fn observe_by_category(
        &self,
        category: BillCategory,
    ) -> BoxStream<'static, SyncResult<Vec<Bill>>> {
        decode_list::<Bill>(self.sync.codec(), self.store.observe_by_filter(category.as_str()))
    }

    pub fn observe_bill(&self, id: &str) -> BoxStream<'static, SyncResult<Option<Bill>>> {
        decode_one::<Bill>(self.sync.codec(), self.store.observe_by_key(id))
    }

    pub async fn list_bills(&self) -> SyncResult<Vec<Bill>> {
        decode_rows::<Bill>(self.sync.codec(), &self.store.list_all().await?)
    }

    pub async fn get_bill(&self, id: &str) -> SyncResult<Option<Bill>> {
        decode_row::<Bill>(self.sync.codec(), self.store.get_by_key(id).await?)
    }

    /// Stores the bill (assigning an id on first save) and publishes it.
    pub async fn save_bill(&self, bill: Bill) -> SyncResult<Bill> {
        self.sync.save(&self.store, bill).await
    }

    /// Removes the bill locally. No tombstone is published.
    pub async fn delete_bill(&self, bill: &Bill) -> SyncResult<()> {
        self.store.delete_by_key(&bill.id).await?;
        debug!(id = %bill.id, "deleted bill");
        Ok(())
    }

    /// Uploads an attachment and returns its sha256.
    pub async fn upload_attachment(
        &self,
        data: Vec<u8>,
        content_type: &str,
        filename: &str,
    ) -> SyncResult<String> {
        Ok(self.blobs.upload(data, content_type, filename).await?.sha256)
    }

    pub async fn download_attachment(&self, sha256: &str) -> SyncResult<Vec<u8>> {
        self.blobs.download(sha256).await
    }

    pub async fn sync_from_relay(&self) -> SyncReport {
        self.sync.pull::<Bill>(&self.store).await
    }
}
