//! Generic per-table store: upsert, delete, point lookup and live listings.

use crate::database::Database;
use crate::error::StorageResult;
use crate::live_query::LiveQuery;
use crate::record::{select_sql, upsert_sql, FilteredRecord, Record};
use rusqlite::{params, Connection, OptionalExtension};
use std::marker::PhantomData;

/// Store for one record type. Obtained from [`Database`] accessors.
pub struct EntityStore<R> {
    db: Database,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for EntityStore<R> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: Record> EntityStore<R> {
    pub(crate) fn new(db: Database) -> Self {
        Self {
            db,
            _record: PhantomData,
        }
    }

    /// Inserts the record, or overwrites every column of the row with the
    /// same key.
    pub async fn upsert(&self, record: R) -> StorageResult<()> {
        self.db
            .write(&[R::TABLE], move |tx| {
                tx.execute(&upsert_sql::<R>(), record.to_params().as_slice())?;
                Ok(())
            })
            .await
    }

    /// Upserts several records in one transaction.
    pub async fn upsert_all(&self, records: Vec<R>) -> StorageResult<()> {
        if records.is_empty() {
            return Ok(());
        }
        self.db
            .write(&[R::TABLE], move |tx| {
                let mut stmt = tx.prepare(&upsert_sql::<R>())?;
                for record in &records {
                    stmt.execute(record.to_params().as_slice())?;
                }
                Ok(())
            })
            .await
    }

    pub async fn delete(&self, record: &R) -> StorageResult<()> {
        self.delete_by_key(record.key()).await
    }

    /// Removes the row with `key`, if any.
    pub async fn delete_by_key(&self, key: &str) -> StorageResult<()> {
        let key = key.to_string();
        self.db
            .write(&[R::TABLE], move |tx| {
                let sql = format!("DELETE FROM {} WHERE {} = ?1", R::TABLE.name(), R::KEY);
                tx.execute(&sql, params![key])?;
                Ok(())
            })
            .await
    }

    pub async fn delete_all(&self) -> StorageResult<()> {
        self.db
            .write(&[R::TABLE], |tx| {
                tx.execute(&format!("DELETE FROM {}", R::TABLE.name()), [])?;
                Ok(())
            })
            .await
    }

    pub async fn get_by_key(&self, key: &str) -> StorageResult<Option<R>> {
        let key = key.to_string();
        self.db.read(move |conn| query_by_key::<R>(conn, &key)).await
    }

    /// Every row, newest first.
    pub async fn list_all(&self) -> StorageResult<Vec<R>> {
        self.db.read(query_all::<R>).await
    }

    pub async fn count(&self) -> StorageResult<u64> {
        self.db
            .read(|conn| {
                let sql = format!("SELECT COUNT(*) FROM {}", R::TABLE.name());
                let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
    }

    /// Live list of every row, newest first.
    pub fn observe_all(&self) -> LiveQuery<Vec<R>> {
        self.db.live(R::TABLE, query_all::<R>)
    }

    /// Live view of one row; `None` while it does not exist.
    pub fn observe_by_key(&self, key: impl Into<String>) -> LiveQuery<Option<R>> {
        let key = key.into();
        self.db.live(R::TABLE, move |conn| query_by_key::<R>(conn, &key))
    }

    /// Live view of the most recently written row.
    pub fn observe_latest(&self) -> LiveQuery<Option<R>> {
        self.db.live(R::TABLE, |conn| {
            let sql = format!("{} LIMIT 1", select_sql::<R>(None));
            Ok(conn.query_row(&sql, [], |row| R::from_row(row)).optional()?)
        })
    }
}

impl<R: FilteredRecord> EntityStore<R> {
    /// Live list of rows whose filter column equals `value`, newest first.
    pub fn observe_by_filter(&self, value: impl Into<String>) -> LiveQuery<Vec<R>> {
        let value = value.into();
        self.db.live(R::TABLE, move |conn| query_filtered::<R>(conn, &value))
    }

    pub async fn list_by_filter(&self, value: &str) -> StorageResult<Vec<R>> {
        let value = value.to_string();
        self.db.read(move |conn| query_filtered::<R>(conn, &value)).await
    }
}

fn query_by_key<R: Record>(conn: &Connection, key: &str) -> StorageResult<Option<R>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE {} = ?1",
        R::COLUMNS.join(", "),
        R::TABLE.name(),
        R::KEY
    );
    Ok(conn.query_row(&sql, params![key], |row| R::from_row(row)).optional()?)
}

fn query_all<R: Record>(conn: &Connection) -> StorageResult<Vec<R>> {
    let mut stmt = conn.prepare(&select_sql::<R>(None))?;
    let rows = stmt.query_map([], |row| R::from_row(row))?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

fn query_filtered<R: FilteredRecord>(conn: &Connection, value: &str) -> StorageResult<Vec<R>> {
    let mut stmt = conn.prepare(&select_sql::<R>(Some(R::FILTER)))?;
    let rows = stmt.query_map(params![value], |row| R::from_row(row))?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
