//! Row shape description used by the generic [`EntityStore`](crate::EntityStore).

use rusqlite::types::ToSql;
use rusqlite::Row;

/// The tables the store knows about. Each one has its own change counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    SalaryConfigs,
    Bills,
    Goals,
    CreditAccounts,
    CypherLogSubscriptions,
}

impl Table {
    pub const ALL: [Table; 5] = [
        Table::SalaryConfigs,
        Table::Bills,
        Table::Goals,
        Table::CreditAccounts,
        Table::CypherLogSubscriptions,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::SalaryConfigs => "salary_configs",
            Table::Bills => "bills",
            Table::Goals => "goals",
            Table::CreditAccounts => "credit_accounts",
            Table::CypherLogSubscriptions => "cypherlog_subscriptions",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// A flat row stored in one table.
///
/// `COLUMNS` lists every column in the order produced by [`Record::to_params`]
/// and consumed by [`Record::from_row`]; the key column comes first.
pub trait Record: Clone + Send + Sync + 'static {
    const TABLE: Table;
    const KEY: &'static str;
    /// Sort column for newest-first listings.
    const TIMESTAMP: &'static str;
    const COLUMNS: &'static [&'static str];

    fn key(&self) -> &str;
    fn to_params(&self) -> Vec<&dyn ToSql>;
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// A record with one denormalized column callers filter on.
pub trait FilteredRecord: Record {
    const FILTER: &'static str;
}

pub(crate) fn column_list<R: Record>() -> String {
    R::COLUMNS.join(", ")
}

pub(crate) fn upsert_sql<R: Record>() -> String {
    let placeholders = (1..=R::COLUMNS.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let updates = R::COLUMNS
        .iter()
        .filter(|c| **c != R::KEY)
        .map(|c| format!("{c} = excluded.{c}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {table} ({cols}) VALUES ({placeholders}) ON CONFLICT({key}) DO UPDATE SET {updates}",
        table = R::TABLE.name(),
        cols = column_list::<R>(),
        key = R::KEY,
    )
}

/// `SELECT` of every column, with an optional `WHERE` clause, newest first.
/// Ties on the timestamp fall back to key order so listings are stable.
pub(crate) fn select_sql<R: Record>(filter: Option<&str>) -> String {
    let mut sql = format!("SELECT {} FROM {}", column_list::<R>(), R::TABLE.name());
    if let Some(column) = filter {
        sql.push_str(&format!(" WHERE {column} = ?1"));
    }
    sql.push_str(&format!(" ORDER BY {} DESC, {} ASC", R::TIMESTAMP, R::KEY));
    sql
}
