//! The five persisted row types.

use crate::record::{FilteredRecord, Record, Table};
use rusqlite::types::ToSql;
use rusqlite::Row;

/// `salary_configs` row. The newest row is the active configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalaryConfigEntity {
    pub id: String,
    pub json_data: String,
    pub updated_at: i64,
}

impl Record for SalaryConfigEntity {
    const TABLE: Table = Table::SalaryConfigs;
    const KEY: &'static str = "id";
    const TIMESTAMP: &'static str = "updatedAt";
    const COLUMNS: &'static [&'static str] = &["id", "jsonData", "updatedAt"];

    fn key(&self) -> &str {
        &self.id
    }

    fn to_params(&self) -> Vec<&dyn ToSql> {
        vec![&self.id, &self.json_data, &self.updated_at]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            json_data: row.get(1)?,
            updated_at: row.get(2)?,
        })
    }
}

/// `bills` row, filterable by category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillEntity {
    pub id: String,
    pub json_data: String,
    pub category: String,
    pub updated_at: i64,
}

impl Record for BillEntity {
    const TABLE: Table = Table::Bills;
    const KEY: &'static str = "id";
    const TIMESTAMP: &'static str = "updatedAt";
    const COLUMNS: &'static [&'static str] = &["id", "jsonData", "category", "updatedAt"];

    fn key(&self) -> &str {
        &self.id
    }

    fn to_params(&self) -> Vec<&dyn ToSql> {
        vec![&self.id, &self.json_data, &self.category, &self.updated_at]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            json_data: row.get(1)?,
            category: row.get(2)?,
            updated_at: row.get(3)?,
        })
    }
}

impl FilteredRecord for BillEntity {
    const FILTER: &'static str = "category";
}

/// `goals` row, filterable by category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalEntity {
    pub id: String,
    pub json_data: String,
    pub category: String,
    pub updated_at: i64,
}

impl Record for GoalEntity {
    const TABLE: Table = Table::Goals;
    const KEY: &'static str = "id";
    const TIMESTAMP: &'static str = "updatedAt";
    const COLUMNS: &'static [&'static str] = &["id", "jsonData", "category", "updatedAt"];

    fn key(&self) -> &str {
        &self.id
    }

    fn to_params(&self) -> Vec<&dyn ToSql> {
        vec![&self.id, &self.json_data, &self.category, &self.updated_at]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            json_data: row.get(1)?,
            category: row.get(2)?,
            updated_at: row.get(3)?,
        })
    }
}

impl FilteredRecord for GoalEntity {
    const FILTER: &'static str = "category";
}

/// `credit_accounts` row, filterable by account type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditAccountEntity {
    pub id: String,
    pub json_data: String,
    pub account_type: String,
    pub updated_at: i64,
}

impl Record for CreditAccountEntity {
    const TABLE: Table = Table::CreditAccounts;
    const KEY: &'static str = "id";
    const TIMESTAMP: &'static str = "updatedAt";
    const COLUMNS: &'static [&'static str] = &["id", "jsonData", "type", "updatedAt"];

    fn key(&self) -> &str {
        &self.id
    }

    fn to_params(&self) -> Vec<&dyn ToSql> {
        vec![&self.id, &self.json_data, &self.account_type, &self.updated_at]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            json_data: row.get(1)?,
            account_type: row.get(2)?,
            updated_at: row.get(3)?,
        })
    }
}

impl FilteredRecord for CreditAccountEntity {
    const FILTER: &'static str = "type";
}

/// `cypherlog_subscriptions` row: a kind-37004 event as last seen on the relay.
///
/// `created_at` is the event's own timestamp in epoch seconds.
/// `content_decrypted_json` stays `None` until the content has been decrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CypherLogSubscriptionEntity {
    pub d_tag: String,
    pub event_id: String,
    pub tags_json: String,
    pub created_at: i64,
    pub content_decrypted_json: Option<String>,
}

impl Record for CypherLogSubscriptionEntity {
    const TABLE: Table = Table::CypherLogSubscriptions;
    const KEY: &'static str = "dTag";
    const TIMESTAMP: &'static str = "createdAt";
    const COLUMNS: &'static [&'static str] =
        &["dTag", "eventId", "tagsJson", "createdAt", "contentDecryptedJson"];

    fn key(&self) -> &str {
        &self.d_tag
    }

    fn to_params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.d_tag,
            &self.event_id,
            &self.tags_json,
            &self.created_at,
            &self.content_decrypted_json,
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            d_tag: row.get(0)?,
            event_id: row.get(1)?,
            tags_json: row.get(2)?,
            created_at: row.get(3)?,
            content_decrypted_json: row.get(4)?,
        })
    }
}
