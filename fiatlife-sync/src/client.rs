//! Seams to the remote collaborators: the Nostr relay client and the
//! Blossom blob client. Only the interfaces live here; transports are
//! supplied by the host application.

use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use serde::{Deserialize, Serialize};

/// Parameterized replaceable app data (NIP-78).
pub const KIND_APP_DATA: u16 = 30078;
/// CypherLog subscription record.
pub const KIND_CYPHERLOG_SUBSCRIPTION: u16 = 37004;

/// Which app-data items to fetch, by `d` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DTagFilter {
    Exact(String),
    Prefix(String),
}

impl DTagFilter {
    pub fn matches(&self, d_tag: &str) -> bool {
        match self {
            DTagFilter::Exact(tag) => d_tag == tag,
            DTagFilter::Prefix(prefix) => d_tag.starts_with(prefix.as_str()),
        }
    }

    /// Record id encoded in a prefixed `d` tag. Exact tags carry no id.
    pub fn id_in<'a>(&self, d_tag: &'a str) -> Option<&'a str> {
        match self {
            DTagFilter::Exact(_) => None,
            DTagFilter::Prefix(prefix) => d_tag
                .strip_prefix(prefix.as_str())
                .filter(|id| !id.is_empty()),
        }
    }
}

/// A decrypted app-data item pulled from the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDataItem {
    pub d_tag: String,
    pub json: String,
}

/// A signed relay event as delivered by the relay client.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RelayEvent {
    pub id: String,
    pub pubkey: String,
    /// Epoch seconds.
    pub created_at: i64,
    pub kind: u16,
    pub tags: Vec<Vec<String>>,
    pub content: String,
}

impl RelayEvent {
    /// First value of the `d` tag.
    pub fn d_tag(&self) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.len() >= 2 && tag[0] == "d")
            .map(|tag| tag[1].as_str())
    }
}

/// Remote sync client. Implementations handle signing, NIP-44 encryption
/// and the relay connection.
#[async_trait]
pub trait RelayClient: Send + Sync {
    /// Whether a signer is available. Without one nothing is published or
    /// pulled.
    fn has_signer(&self) -> bool;

    /// Hex pubkey of the signer, if any.
    fn signer_pubkey(&self) -> Option<String>;

    /// Encrypts `json` to self and publishes it as kind 30078 under `d_tag`.
    async fn publish_app_data(&self, d_tag: &str, json: &str) -> SyncResult<()>;

    /// Publishes a NIP-09 deletion request for `kind:pubkey:d_tag`.
    async fn publish_deletion(&self, kind: u16, d_tag: &str) -> SyncResult<()>;

    /// Streams the signer's app-data items matching `filter`, decrypted.
    fn fetch_app_data(&self, filter: DTagFilter) -> BoxStream<'static, SyncResult<AppDataItem>>;

    /// Publishes a replaceable kind 37004 event with the given tags.
    async fn publish_replaceable_subscription(
        &self,
        d_tag: &str,
        tags: &[Vec<String>],
    ) -> SyncResult<()>;

    /// Streams the signer's kind 37004 events.
    fn fetch_subscription_events(&self) -> BoxStream<'static, SyncResult<RelayEvent>>;

    /// NIP-44 decrypts `ciphertext` from `author_pubkey`. `None` when the
    /// signer cannot decrypt it.
    async fn decrypt_content(&self, ciphertext: &str, author_pubkey: &str) -> Option<String>;
}

/// Blob descriptor returned by a Blossom server.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlobDescriptor {
    pub url: String,
    pub sha256: String,
    pub size: u64,
    #[serde(rename = "type", default)]
    pub content_type: Option<String>,
    /// Epoch seconds.
    pub uploaded: i64,
}

/// Blob storage client for attachments.
#[async_trait]
pub trait BlobClient: Send + Sync {
    async fn upload(
        &self,
        data: Vec<u8>,
        content_type: &str,
        filename: &str,
    ) -> SyncResult<BlobDescriptor>;

    async fn download(&self, sha256: &str) -> SyncResult<Vec<u8>>;

    async fn list(&self, pubkey: &str) -> SyncResult<Vec<BlobDescriptor>>;

    async fn delete(&self, sha256: &str) -> SyncResult<()>;
}

/// Relay client for local-only use: no signer, nothing to fetch.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineRelay;

#[async_trait]
impl RelayClient for OfflineRelay {
    fn has_signer(&self) -> bool {
        false
    }

    fn signer_pubkey(&self) -> Option<String> {
        None
    }

    async fn publish_app_data(&self, _d_tag: &str, _json: &str) -> SyncResult<()> {
        Err(SyncError::NoSigner)
    }

    async fn publish_deletion(&self, _kind: u16, _d_tag: &str) -> SyncResult<()> {
        Err(SyncError::NoSigner)
    }

    fn fetch_app_data(&self, _filter: DTagFilter) -> BoxStream<'static, SyncResult<AppDataItem>> {
        stream::empty().boxed()
    }

    async fn publish_replaceable_subscription(
        &self,
        _d_tag: &str,
        _tags: &[Vec<String>],
    ) -> SyncResult<()> {
        Err(SyncError::NoSigner)
    }

    fn fetch_subscription_events(&self) -> BoxStream<'static, SyncResult<RelayEvent>> {
        stream::empty().boxed()
    }

    async fn decrypt_content(&self, _ciphertext: &str, _author_pubkey: &str) -> Option<String> {
        None
    }
}

/// Blob client used when no Blossom server is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredBlobClient;

impl UnconfiguredBlobClient {
    fn unavailable<T>() -> SyncResult<T> {
        Err(SyncError::Blob("no blob server configured".into()))
    }
}

#[async_trait]
impl BlobClient for UnconfiguredBlobClient {
    async fn upload(
        &self,
        _data: Vec<u8>,
        _content_type: &str,
        _filename: &str,
    ) -> SyncResult<BlobDescriptor> {
        Self::unavailable()
    }

    async fn download(&self, _sha256: &str) -> SyncResult<Vec<u8>> {
        Self::unavailable()
    }

    async fn list(&self, _pubkey: &str) -> SyncResult<Vec<BlobDescriptor>> {
        Self::unavailable()
    }

    async fn delete(&self, _sha256: &str) -> SyncResult<()> {
        Self::unavailable()
    }
}
