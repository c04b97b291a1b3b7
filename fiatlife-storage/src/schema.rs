//! DDL and versioned migrations for the FiatLife database.
//!
//! The schema version lives in `PRAGMA user_version`. A fresh file gets the
//! current layout in one step; older files are walked forward one version at
//! a time inside a single transaction.

use crate::error::{StorageError, StorageResult};
use rusqlite::{Connection, Transaction};
use tracing::info;

/// Version written by this build.
pub const SCHEMA_VERSION: u32 = 4;

const SALARY_CONFIGS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS salary_configs (
    id TEXT NOT NULL PRIMARY KEY,
    jsonData TEXT NOT NULL,
    updatedAt INTEGER NOT NULL
);
"#;

const BILLS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS bills (
    id TEXT NOT NULL PRIMARY KEY,
    jsonData TEXT NOT NULL,
    category TEXT NOT NULL,
    updatedAt INTEGER NOT NULL
);
"#;

const GOALS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS goals (
    id TEXT NOT NULL PRIMARY KEY,
    jsonData TEXT NOT NULL,
    category TEXT NOT NULL,
    updatedAt INTEGER NOT NULL
);
"#;

const CREDIT_ACCOUNTS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS credit_accounts (
    id TEXT NOT NULL PRIMARY KEY,
    jsonData TEXT NOT NULL,
    type TEXT NOT NULL,
    updatedAt INTEGER NOT NULL
);
"#;

/// Subscription table as first shipped in version 2, before decrypted
/// content was cached.
const CYPHERLOG_SUBSCRIPTIONS_V2_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS cypherlog_subscriptions (
    dTag TEXT NOT NULL PRIMARY KEY,
    eventId TEXT NOT NULL DEFAULT '',
    tagsJson TEXT NOT NULL DEFAULT '[]',
    createdAt INTEGER NOT NULL DEFAULT 0
);
"#;

const CYPHERLOG_SUBSCRIPTIONS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS cypherlog_subscriptions (
    dTag TEXT NOT NULL PRIMARY KEY,
    eventId TEXT NOT NULL DEFAULT '',
    tagsJson TEXT NOT NULL DEFAULT '[]',
    createdAt INTEGER NOT NULL DEFAULT 0,
    contentDecryptedJson TEXT
);
"#;

const ADD_CONTENT_DECRYPTED_JSON: &str =
    "ALTER TABLE cypherlog_subscriptions ADD COLUMN contentDecryptedJson TEXT";

/// Reads the schema version stored in the file header.
pub fn schema_version(conn: &Connection) -> StorageResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Brings the database up to [`SCHEMA_VERSION`].
pub fn initialize_schema(conn: &mut Connection) -> StorageResult<()> {
    let found = schema_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(StorageError::UnsupportedSchemaVersion {
            found,
            supported: SCHEMA_VERSION,
        });
    }
    if found == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    if found == 0 {
        info!("creating database schema v{SCHEMA_VERSION}");
        create_current(&tx)?;
    } else {
        for from in found..SCHEMA_VERSION {
            info!("migrating database schema v{} -> v{}", from, from + 1);
            migrate_step(&tx, from)?;
        }
    }
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;
    Ok(())
}

fn create_current(tx: &Transaction<'_>) -> StorageResult<()> {
    tx.execute_batch(SALARY_CONFIGS_DDL)?;
    tx.execute_batch(BILLS_DDL)?;
    tx.execute_batch(GOALS_DDL)?;
    tx.execute_batch(CREDIT_ACCOUNTS_DDL)?;
    tx.execute_batch(CYPHERLOG_SUBSCRIPTIONS_DDL)?;
    Ok(())
}

fn migrate_step(tx: &Transaction<'_>, from: u32) -> StorageResult<()> {
    match from {
        1 => tx.execute_batch(CYPHERLOG_SUBSCRIPTIONS_V2_DDL)?,
        2 => tx.execute_batch(CREDIT_ACCOUNTS_DDL)?,
        3 => tx.execute_batch(ADD_CONTENT_DECRYPTED_JSON)?,
        _ => {}
    }
    Ok(())
}

