//! Shared database handle: connections, blocking-pool dispatch and change
//! notification.

use crate::entities::{
    BillEntity, CreditAccountEntity, CypherLogSubscriptionEntity, GoalEntity, SalaryConfigEntity,
};
use crate::entity_store::EntityStore;
use crate::error::StorageResult;
use crate::live_query::LiveQuery;
use crate::record::{Record, Table};
use crate::schema::{self, initialize_schema};
use rusqlite::{Connection, OpenFlags, Transaction};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the FiatLife database. Cheap to clone; all clones share the
/// same connections and change counters.
///
/// Writes go through a single writer connection, one transaction per call.
/// File databases also get a read-only connection so that reads see the last
/// committed state without waiting on a writer.
#[derive(Clone)]
pub struct Database {
    inner: Arc<Inner>,
}

struct Inner {
    writer: Mutex<Connection>,
    reader: Option<Mutex<Connection>>,
    changes: ChangeTracker,
}

/// One version counter per table, bumped after every committed write.
struct ChangeTracker {
    versions: [watch::Sender<u64>; Table::ALL.len()],
}

impl ChangeTracker {
    fn new() -> Self {
        Self {
            versions: std::array::from_fn(|_| watch::channel(0).0),
        }
    }

    fn notify(&self, tables: &[Table]) {
        for table in tables {
            self.versions[table.index()].send_modify(|v| *v = v.wrapping_add(1));
        }
    }

    fn subscribe(&self, table: Table) -> watch::Receiver<u64> {
        self.versions[table.index()].subscribe()
    }
}

impl Database {
    /// Opens (or creates) the database file at `path` and migrates it to the
    /// current schema.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let mut writer = open_sqlite(path)?;
        initialize_schema(&mut writer)?;
        let reader = open_sqlite_reader(path)?;
        debug!(path = %path.display(), "database opened");
        Ok(Self::from_parts(writer, Some(reader)))
    }

    /// Opens an in-memory database (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        let mut conn = Connection::open_in_memory()?;
        initialize_schema(&mut conn)?;
        Ok(Self::from_parts(conn, None))
    }

    fn from_parts(writer: Connection, reader: Option<Connection>) -> Self {
        Self {
            inner: Arc::new(Inner {
                writer: Mutex::new(writer),
                reader: reader.map(Mutex::new),
                changes: ChangeTracker::new(),
            }),
        }
    }

    pub fn salary_configs(&self) -> EntityStore<SalaryConfigEntity> {
        self.store()
    }

    pub fn bills(&self) -> EntityStore<BillEntity> {
        self.store()
    }

    pub fn goals(&self) -> EntityStore<GoalEntity> {
        self.store()
    }

    pub fn credit_accounts(&self) -> EntityStore<CreditAccountEntity> {
        self.store()
    }

    pub fn cypherlog_subscriptions(&self) -> EntityStore<CypherLogSubscriptionEntity> {
        self.store()
    }

    /// Typed store for any record kind.
    pub fn store<R: Record>(&self) -> EntityStore<R> {
        EntityStore::new(self.clone())
    }

    pub async fn schema_version(&self) -> StorageResult<u32> {
        self.read(|conn| schema::schema_version(conn)).await
    }

    /// Empties every table in one transaction (sign-out / account reset).
    pub async fn clear_all_tables(&self) -> StorageResult<()> {
        self.write(&Table::ALL, |tx| {
            for table in Table::ALL {
                tx.execute(&format!("DELETE FROM {}", table.name()), [])?;
            }
            Ok(())
        })
        .await?;
        info!("cleared all tables");
        Ok(())
    }

    /// Runs `f` inside a transaction on the writer connection, then wakes
    /// live queries on `tables`. Nothing is notified if `f` fails.
    pub(crate) async fn write<T, F>(&self, tables: &[Table], f: F) -> StorageResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Transaction<'_>) -> StorageResult<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let tables = tables.to_vec();
        tokio::task::spawn_blocking(move || -> StorageResult<T> {
            let mut conn = lock(&inner.writer, "writer");
            let tx = conn.transaction()?;
            let out = f(&tx)?;
            tx.commit()?;
            drop(conn);
            inner.changes.notify(&tables);
            Ok(out)
        })
        .await?
    }

    /// Runs `f` against the reader connection (the writer, in memory).
    pub(crate) async fn read<T, F>(&self, f: F) -> StorageResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StorageResult<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || -> StorageResult<T> {
            let conn = match &inner.reader {
                Some(reader) => lock(reader, "reader"),
                None => lock(&inner.writer, "writer"),
            };
            f(&conn)
        })
        .await?
    }

    /// Builds a live query that re-runs `query` after each write to `table`.
    pub(crate) fn live<T, F>(&self, table: Table, query: F) -> LiveQuery<T>
    where
        T: Send + 'static,
        F: Fn(&Connection) -> StorageResult<T> + Send + Sync + 'static,
    {
        LiveQuery::new(self.downgrade(), self.inner.changes.subscribe(table), Arc::new(query))
    }

    fn downgrade(&self) -> WeakDatabase {
        WeakDatabase(Arc::downgrade(&self.inner))
    }
}

/// Non-owning handle held by live queries, so that dropping the last
/// [`Database`] closes their change channels.
pub(crate) struct WeakDatabase(Weak<Inner>);

impl WeakDatabase {
    pub(crate) fn upgrade(&self) -> Option<Database> {
        self.0.upgrade().map(|inner| Database { inner })
    }
}

/// Open the read-write connection, creating the file and its parent
/// directory if needed, with WAL journaling so a reader can run alongside
/// a write transaction.
fn open_sqlite(path: &Path) -> StorageResult<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(path)?;
    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    if !mode.eq_ignore_ascii_case("wal") {
        warn!(%mode, "WAL journaling unavailable, reads will wait on writes");
    }
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(conn)
}

fn open_sqlite_reader(path: &Path) -> StorageResult<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX | OpenFlags::SQLITE_OPEN_URI,
    )?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(conn)
}

/// Acquire a connection lock, recovering from poison left by a panicking
/// blocking task.
fn lock<'a>(conn: &'a Mutex<Connection>, role: &'static str) -> MutexGuard<'a, Connection> {
    conn.lock().unwrap_or_else(|poisoned| {
        warn!(role, "recovering from poisoned database mutex");
        poisoned.into_inner()
    })
}
