//! Standing queries that re-emit whenever their table changes.

use crate::database::WeakDatabase;
use crate::error::StorageResult;
use futures::Stream;
use rusqlite::Connection;
use std::sync::Arc;
use tokio::sync::watch;

type QueryFn<T> = Arc<dyn Fn(&Connection) -> StorageResult<T> + Send + Sync>;

/// A live query over one table.
///
/// The first call to [`next`](LiveQuery::next) yields the current snapshot.
/// Each later call waits for a committed write to the table and yields a
/// fresh snapshot. Writes that land while the caller is busy are coalesced:
/// the caller gets one snapshot reflecting all of them, never a stale one.
///
/// `next` is cancel-safe. A snapshot whose read was dropped midway is read
/// again by the following call.
///
/// Dropping the query releases its subscription.
pub struct LiveQuery<T> {
    db: WeakDatabase,
    changes: watch::Receiver<u64>,
    query: QueryFn<T>,
    /// A snapshot is owed to the caller: initially, and from a change
    /// notification until the read that answers it completes.
    pending: bool,
}

impl<T: Send + 'static> LiveQuery<T> {
    pub(crate) fn new(db: WeakDatabase, changes: watch::Receiver<u64>, query: QueryFn<T>) -> Self {
        Self {
            db,
            changes,
            query,
            pending: true,
        }
    }

    /// Waits for the next snapshot. Returns `None` once every handle to the
    /// database has been dropped.
    pub async fn next(&mut self) -> Option<StorageResult<T>> {
        if !self.pending {
            self.changes.changed().await.ok()?;
            self.pending = true;
        }
        let db = self.db.upgrade()?;
        // Writes racing the read below trigger another emission.
        self.changes.borrow_and_update();
        let query = Arc::clone(&self.query);
        let snapshot = db.read(move |conn| query(conn)).await;
        self.pending = false;
        Some(snapshot)
    }

    /// Adapts the query into a `Stream` of snapshots.
    pub fn into_stream(self) -> impl Stream<Item = StorageResult<T>> + Send + 'static {
        futures::stream::unfold(self, |mut live| async move {
            let item = live.next().await?;
            Some((item, live))
        })
    }
}
