//! Minimal relay double serving canned app data and subscription events.
#![allow(dead_code)]

use async_trait::async_trait;
use fiatlife_sync::{AppDataItem, DTagFilter, RelayClient, RelayEvent, SyncResult};
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Mutex;

#[derive(Default)]
pub struct CannedRelay {
    app_data: Mutex<Vec<AppDataItem>>,
    events: Mutex<Vec<RelayEvent>>,
}

impl CannedRelay {
    pub fn push_app_data(&self, d_tag: &str, json: &str) {
        self.app_data.lock().unwrap().push(AppDataItem {
            d_tag: d_tag.into(),
            json: json.into(),
        });
    }

    pub fn push_event(&self, event: RelayEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl RelayClient for CannedRelay {
    fn has_signer(&self) -> bool {
        true
    }

    fn signer_pubkey(&self) -> Option<String> {
        Some("00".repeat(32))
    }

    async fn publish_app_data(&self, _d_tag: &str, _json: &str) -> SyncResult<()> {
        Ok(())
    }

    async fn publish_deletion(&self, _kind: u16, _d_tag: &str) -> SyncResult<()> {
        Ok(())
    }

    fn fetch_app_data(&self, filter: DTagFilter) -> BoxStream<'static, SyncResult<AppDataItem>> {
        let items: Vec<AppDataItem> = self
            .app_data
            .lock()
            .unwrap()
            .iter()
            .filter(|item| filter.matches(&item.d_tag))
            .cloned()
            .collect();
        stream::iter(items.into_iter().map(Ok)).boxed()
    }

    async fn publish_replaceable_subscription(
        &self,
        _d_tag: &str,
        _tags: &[Vec<String>],
    ) -> SyncResult<()> {
        Ok(())
    }

    fn fetch_subscription_events(&self) -> BoxStream<'static, SyncResult<RelayEvent>> {
        let events = self.events.lock().unwrap().clone();
        stream::iter(events.into_iter().map(Ok)).boxed()
    }

    async fn decrypt_content(&self, _ciphertext: &str, _author_pubkey: &str) -> Option<String> {
        None
    }
}
