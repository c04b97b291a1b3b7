//! In-memory relay and blob clients for repository tests.
#![allow(dead_code)]

use async_trait::async_trait;
use fiatlife_sync::{
    AppDataItem, BlobClient, BlobDescriptor, DTagFilter, RelayClient, RelayEvent, SyncError,
    SyncResult,
};
use futures::stream::{self, BoxStream, StreamExt};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub const OWN_PUBKEY: &str = "a1b2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c6d7e8f90";

/// Relay double that records what is published and serves canned items.
#[derive(Default)]
pub struct FakeRelay {
    signer: Option<String>,
    app_data: Mutex<Vec<AppDataItem>>,
    events: Mutex<Vec<RelayEvent>>,
    plaintexts: Mutex<HashMap<(String, String), String>>,
    published: Mutex<Vec<(String, String)>>,
    deletions: Mutex<Vec<(u16, String)>>,
    subscriptions: Mutex<Vec<(String, Vec<Vec<String>>)>>,
    fail_publish: AtomicBool,
    stall_fetch: AtomicBool,
}

impl FakeRelay {
    pub fn with_signer() -> Self {
        Self {
            signer: Some(OWN_PUBKEY.to_string()),
            ..Self::default()
        }
    }

    pub fn without_signer() -> Self {
        Self::default()
    }

    pub fn push_app_data(&self, d_tag: &str, json: &str) {
        self.app_data.lock().unwrap().push(AppDataItem {
            d_tag: d_tag.into(),
            json: json.into(),
        });
    }

    pub fn push_event(&self, event: RelayEvent) {
        self.events.lock().unwrap().push(event);
    }

    /// Makes `ciphertext` from `pubkey` decrypt to `plaintext`.
    pub fn allow_decrypt(&self, ciphertext: &str, pubkey: &str, plaintext: &str) {
        self.plaintexts
            .lock()
            .unwrap()
            .insert((ciphertext.into(), pubkey.into()), plaintext.into());
    }

    pub fn fail_publishing(&self) {
        self.fail_publish.store(true, Ordering::SeqCst);
    }

    /// Fetches yield their items, then never finish.
    pub fn stall_fetches(&self) {
        self.stall_fetch.store(true, Ordering::SeqCst);
    }

    pub fn published(&self) -> Vec<(String, String)> {
        self.published.lock().unwrap().clone()
    }

    pub fn deletions(&self) -> Vec<(u16, String)> {
        self.deletions.lock().unwrap().clone()
    }

    pub fn subscriptions(&self) -> Vec<(String, Vec<Vec<String>>)> {
        self.subscriptions.lock().unwrap().clone()
    }

    fn check_publish(&self) -> SyncResult<()> {
        if self.signer.is_none() {
            return Err(SyncError::NoSigner);
        }
        if self.fail_publish.load(Ordering::SeqCst) {
            return Err(SyncError::Relay("relay rejected event".into()));
        }
        Ok(())
    }

    fn serve<T: Send + 'static>(&self, items: Vec<T>) -> BoxStream<'static, SyncResult<T>> {
        let ready = stream::iter(items.into_iter().map(Ok));
        if self.stall_fetch.load(Ordering::SeqCst) {
            ready.chain(stream::pending()).boxed()
        } else {
            ready.boxed()
        }
    }
}

#[async_trait]
impl RelayClient for FakeRelay {
    fn has_signer(&self) -> bool {
        self.signer.is_some()
    }

    fn signer_pubkey(&self) -> Option<String> {
        self.signer.clone()
    }

    async fn publish_app_data(&self, d_tag: &str, json: &str) -> SyncResult<()> {
        self.check_publish()?;
        self.published
            .lock()
            .unwrap()
            .push((d_tag.to_string(), json.to_string()));
        Ok(())
    }

    async fn publish_deletion(&self, kind: u16, d_tag: &str) -> SyncResult<()> {
        self.check_publish()?;
        self.deletions.lock().unwrap().push((kind, d_tag.to_string()));
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
        self.serve(items)
    }

    async fn publish_replaceable_subscription(
        &self,
        d_tag: &str,
        tags: &[Vec<String>],
    ) -> SyncResult<()> {
        self.check_publish()?;
        self.subscriptions
            .lock()
            .unwrap()
            .push((d_tag.to_string(), tags.to_vec()));
        Ok(())
    }

    fn fetch_subscription_events(&self) -> BoxStream<'static, SyncResult<RelayEvent>> {
        let events = self.events.lock().unwrap().clone();
        self.serve(events)
    }

    async fn decrypt_content(&self, ciphertext: &str, author_pubkey: &str) -> Option<String> {
        self.plaintexts
            .lock()
            .unwrap()
            .get(&(ciphertext.to_string(), author_pubkey.to_string()))
            .cloned()
    }
}

/// Content-addressed blob store double.
#[derive(Default)]
pub struct FakeBlobs {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl FakeBlobs {
    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }
}

fn fake_hash(data: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    data.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

#[async_trait]
impl BlobClient for FakeBlobs {
    async fn upload(
        &self,
        data: Vec<u8>,
        content_type: &str,
        filename: &str,
    ) -> SyncResult<BlobDescriptor> {
        let sha256 = fake_hash(&data);
        let size = data.len() as u64;
        self.blobs.lock().unwrap().insert(sha256.clone(), data);
        Ok(BlobDescriptor {
            url: format!("https://blossom.test/{sha256}/{filename}"),
            sha256,
            size,
            content_type: Some(content_type.to_string()),
            uploaded: 1_700_000_000,
        })
    }

    async fn download(&self, sha256: &str) -> SyncResult<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap()
            .get(sha256)
            .cloned()
            .ok_or_else(|| SyncError::Blob(format!("blob {sha256} not found")))
    }

    async fn list(&self, _pubkey: &str) -> SyncResult<Vec<BlobDescriptor>> {
        Ok(Vec::new())
    }

    async fn delete(&self, sha256: &str) -> SyncResult<()> {
        self.blobs.lock().unwrap().remove(sha256);
        Ok(())
    }
}
