//! Repository layer for FiatLife.
//!
//! Each repository wraps one [`fiatlife_storage::EntityStore`] and adds what
//! the store does not know about: id and timestamp stamping, JSON encoding,
//! publishing to the relay, pulling from it, and attachments in blob
//! storage. The relay and blob transports are trait objects supplied by the
//! host application.
//!
//! # Relay layout
//!
//! | Record | Kind | `d` tag |
//! |---|---|---|
//! | Salary config | 30078 | `fiatlife/salary` |
//! | Bill | 30078 | `fiatlife/bill/<id>` |
//! | Goal | 30078 | `fiatlife/goal/<id>` |
//! | Credit account | 30078 | `fiatlife/credit/<id>` |
//! | CypherLog subscription | 37004 | subscription id |

mod app_data;
mod bills;
mod client;
mod codec;
mod credit;
pub mod cypherlog;
mod error;
mod goals;
mod salary;

pub use app_data::{AppData, SyncReport, DEFAULT_SYNC_TIMEOUT};
pub use bills::BillRepository;
pub use client::{
    AppDataItem, BlobClient, BlobDescriptor, DTagFilter, OfflineRelay, RelayClient, RelayEvent,
    UnconfiguredBlobClient, KIND_APP_DATA, KIND_CYPHERLOG_SUBSCRIPTION,
};
pub use codec::{JsonCodec, TOMBSTONE};
pub use credit::CreditAccountRepository;
pub use cypherlog::CypherLogSubscriptionRepository;
pub use error::{SyncError, SyncResult};
pub use goals::GoalRepository;
pub use salary::SalaryRepository;

/// Current time in epoch milliseconds.
pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
