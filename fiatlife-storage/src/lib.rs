//! Embedded SQLite storage for FiatLife.
//!
//! # Architecture
//!
//! - Five tables, each a flat row: string key, `jsonData` payload, a few
//!   denormalized filter columns and a timestamp used for newest-first order
//! - One generic [`EntityStore`] per table, driven by the [`Record`] trait
//! - Every operation is async and runs on tokio's blocking pool
//! - [`LiveQuery`] re-runs a read after each committed write to its table
//! - Schema migrations are handled automatically on open

mod database;
mod entities;
mod entity_store;
mod error;
mod live_query;
mod record;
mod schema;

pub use database::Database;
pub use entities::{
    BillEntity, CreditAccountEntity, CypherLogSubscriptionEntity, GoalEntity, SalaryConfigEntity,
};
pub use entity_store::EntityStore;
pub use error::{StorageError, StorageResult};
pub use live_query::LiveQuery;
pub use record::{FilteredRecord, Record, Table};
pub use schema::{schema_version, SCHEMA_VERSION};
