//! CypherLog subscriptions (kind 37004) surfaced as bills.

mod mapping;

pub use mapping::{
    bill_from_content, bill_from_tags, bill_to_tags, frequency_from_cypherlog,
    frequency_to_cypherlog, PreservedTags, MAPPED_TAG_KEYS,
};

use crate::app_data::{SyncReport, DEFAULT_SYNC_TIMEOUT};
use crate::client::{RelayClient, RelayEvent, KIND_CYPHERLOG_SUBSCRIPTION};
use crate::codec::JsonCodec;
use crate::error::{SyncError, SyncResult};
use fiatlife_model::{Bill, BillWithSource};
use fiatlife_storage::{CypherLogSubscriptionEntity, EntityStore};
use futures::stream::{BoxStream, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Subscriptions tracked by CypherLog, cached locally as raw events and
/// presented as bills.
#[derive(Clone)]
pub struct CypherLogSubscriptionRepository {
    store: EntityStore<CypherLogSubscriptionEntity>,
    relay: Arc<dyn RelayClient>,
    codec: JsonCodec,
    sync_timeout: Duration,
}

impl CypherLogSubscriptionRepository {
    pub fn new(
        store: EntityStore<CypherLogSubscriptionEntity>,
        relay: Arc<dyn RelayClient>,
        codec: JsonCodec,
        sync_timeout: Duration,
    ) -> Self {
        Self {
            store,
            relay,
            codec,
            sync_timeout,
        }
    }

    /// Repository with the default sync timeout.
    pub fn with_defaults(
        store: EntityStore<CypherLogSubscriptionEntity>,
        relay: Arc<dyn RelayClient>,
    ) -> Self {
        Self::new(store, relay, JsonCodec, DEFAULT_SYNC_TIMEOUT)
    }

    /// Live list of subscriptions as bills, newest event first.
    pub fn observe_as_bills(&self) -> BoxStream<'static, SyncResult<Vec<BillWithSource>>> {
        let codec = self.codec;
        self.store
            .observe_all()
            .into_stream()
            .map(move |rows| -> SyncResult<Vec<BillWithSource>> {
                Ok(rows?.iter().map(|row| to_bill(codec, row)).collect())
            })
            .boxed()
    }

    pub fn observe_by_d_tag(
        &self,
        d_tag: &str,
    ) -> BoxStream<'static, SyncResult<Option<BillWithSource>>> {
        let codec = self.codec;
        self.store
            .observe_by_key(d_tag)
            .into_stream()
            .map(move |row| -> SyncResult<Option<BillWithSource>> {
                Ok(row?.map(|row| to_bill(codec, &row)))
            })
            .boxed()
    }

    pub async fn list_as_bills(&self) -> SyncResult<Vec<BillWithSource>> {
        let rows = self.store.list_all().await?;
        Ok(rows.iter().map(|row| to_bill(self.codec, row)).collect())
    }

    pub async fn get_by_d_tag(&self, d_tag: &str) -> SyncResult<Option<BillWithSource>> {
        let row = self.store.get_by_key(d_tag).await?;
        Ok(row.map(|row| to_bill(self.codec, &row)))
    }

    /// Caches a 37004 event. Content is decrypted with the author's key,
    /// then with our own; if neither works it is stored as `None`.
    pub async fn upsert_from_event(&self, event: &RelayEvent) -> SyncResult<()> {
        let d_tag = event.d_tag().ok_or(SyncError::MissingDTag)?.to_string();
        let tags_json = self.codec.encode_tags(&event.tags)?;
        let content_decrypted_json = self.decrypt(event, &d_tag).await;
        self.store
            .upsert(CypherLogSubscriptionEntity {
                d_tag: d_tag.clone(),
                event_id: event.id.clone(),
                tags_json,
                created_at: event.created_at,
                content_decrypted_json,
            })
            .await?;
        debug!(d_tag, "upserted 37004 subscription");
        Ok(())
    }

    async fn decrypt(&self, event: &RelayEvent, d_tag: &str) -> Option<String> {
        if event.content.trim().is_empty() || !self.relay.has_signer() {
            return None;
        }
        if let Some(plain) = self.relay.decrypt_content(&event.content, &event.pubkey).await {
            return Some(plain);
        }
        if let Some(own) = self.relay.signer_pubkey()
            && let Some(plain) = self.relay.decrypt_content(&event.content, &own).await
        {
            return Some(plain);
        }
        let author: String = event.pubkey.chars().take(8).collect();
        warn!(d_tag, %author, "failed to decrypt 37004 content");
        None
    }

    /// Publishes `bill` as a new or edited subscription and caches it.
    /// Returns the subscription's `d` tag. Nothing is stored if publishing
    /// fails.
    pub async fn save_subscription(
        &self,
        bill: &Bill,
        preserved: Option<&PreservedTags>,
    ) -> SyncResult<String> {
        if !self.relay.has_signer() {
            return Err(SyncError::NoSigner);
        }
        let d_tag = if bill.id.is_empty() {
            uuid::Uuid::new_v4().to_string()
        } else {
            bill.id.clone()
        };
        let tags = bill_to_tags(bill, preserved, &d_tag);
        self.relay.publish_replaceable_subscription(&d_tag, &tags).await?;
        self.store
            .upsert(CypherLogSubscriptionEntity {
                d_tag: d_tag.clone(),
                event_id: String::new(),
                tags_json: self.codec.encode_tags(&tags)?,
                created_at: crate::now_ms() / 1000,
                content_decrypted_json: None,
            })
            .await?;
        info!(d_tag, "published 37004 subscription");
        Ok(d_tag)
    }

    /// Requests deletion on the relay (failures logged) and drops the local
    /// row.
    pub async fn delete_subscription(&self, d_tag: &str) -> SyncResult<()> {
        if self.relay.has_signer() {
            match self.relay.publish_deletion(KIND_CYPHERLOG_SUBSCRIPTION, d_tag).await {
                Ok(()) => debug!(d_tag, "published 37004 deletion request"),
                Err(e) => error!(d_tag, "failed to publish 37004 deletion: {e}"),
            }
        }
        self.store.delete_by_key(d_tag).await?;
        Ok(())
    }

    /// Pulls the signer's 37004 events, bounded by the sync timeout.
    pub async fn sync_from_relay(&self) -> SyncReport {
        let mut report = SyncReport::default();
        if !self.relay.has_signer() {
            return report;
        }
        let outcome = tokio::time::timeout(self.sync_timeout, self.apply_events(&mut report))
            .await
            .unwrap_or(Err(SyncError::Timeout(self.sync_timeout)));
        match outcome {
            Ok(()) => info!("synced {} 37004 subscription(s) from relay", report.upserted),
            Err(e) => {
                report.interrupted = true;
                error!("37004 sync failed: {e}");
            }
        }
        report
    }

    async fn apply_events(&self, report: &mut SyncReport) -> SyncResult<()> {
        let mut events = self.relay.fetch_subscription_events();
        while let Some(event) = events.next().await {
            match self.upsert_from_event(&event?).await {
                Ok(()) => report.upserted += 1,
                Err(SyncError::MissingDTag) => report.skipped += 1,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

fn to_bill(codec: JsonCodec, row: &CypherLogSubscriptionEntity) -> BillWithSource {
    let tags = codec.decode_tags(&row.tags_json);
    match &row.content_decrypted_json {
        Some(content) => bill_from_content(&row.d_tag, content, &tags),
        None => bill_from_tags(&row.d_tag, &tags),
    }
}
