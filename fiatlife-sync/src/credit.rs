use crate::app_data::{decode_list, decode_one, decode_row, decode_rows, AppData, AppDataSync, SyncReport};
use crate::client::{BlobClient, RelayClient};
use crate::codec::JsonCodec;
use crate::error::SyncResult;
use fiatlife_model::{CreditAccount, CreditAccountType};
use fiatlife_storage::{CreditAccountEntity, EntityStore};
use futures::stream::BoxStream;
use std::sync::Arc;
use std::time::Duration;

/// Credit cards and loans, synced under `fiatlife/credit/<id>`, with
/// statement attachments in blob storage.
#[derive(Clone)]
pub struct CreditAccountRepository {
    store: EntityStore<CreditAccountEntity>,
    sync: AppDataSync,
    blobs: Arc<dyn BlobClient>,
}

impl CreditAccountRepository {
    pub fn new(
        store: EntityStore<CreditAccountEntity>,
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

    pub fn observe_accounts(&self) -> BoxStream<'static, SyncResult<Vec<CreditAccount>>> {
        decode_list::<CreditAccount>(self.sync.codec(), self.store.observe_all())
    }

    pub fn observe_by_type(
        &self,
        account_type: CreditAccountType,
    ) -> BoxStream<'static, SyncResult<Vec<CreditAccount>>> {
        decode_list::<CreditAccount>(
            self.sync.codec(),
            self.store.observe_by_filter(account_type.as_str()),
        )
    }

    pub fn observe_account(&self, id: &str) -> BoxStream<'static, SyncResult<Option<CreditAccount>>> {
        decode_one::<CreditAccount>(self.sync.codec(), self.store.observe_by_key(id))
    }

    pub async fn list_accounts(&self) -> SyncResult<Vec<CreditAccount>> {
        decode_rows::<CreditAccount>(self.sync.codec(), &self.store.list_all().await?)
    }

    pub async fn get_account(&self, id: &str) -> SyncResult<Option<CreditAccount>> {
        decode_row::<CreditAccount>(self.sync.codec(), self.store.get_by_key(id).await?)
    }

    pub async fn save_account(&self, account: CreditAccount) -> SyncResult<CreditAccount> {
        self.sync.save(&self.store, account).await
    }

    pub async fn delete_account(&self, account: &CreditAccount) -> SyncResult<()> {
        self.store.delete_by_key(&account.id).await?;
        self.sync.publish_delete(&account.d_tag(), CreditAccount::LABEL).await;
        Ok(())
    }

    /// Uploads a statement or other attachment and returns its sha256.
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
        self.sync.pull::<CreditAccount>(&self.store).await
    }
}
