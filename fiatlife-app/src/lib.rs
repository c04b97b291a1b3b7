//! FiatLife core wired together.
//!
//! [`FiatLife::open`] is the single place where the database, the host's
//! relay and blob clients and the repositories are connected. Hosts keep the
//! returned handle for the lifetime of the signed-in session and call
//! [`FiatLife::reset`] on sign-out.

mod config;
mod logging;

pub use config::FiatLifeConfig;
pub use logging::init_logging;

use anyhow::{Context, Result};
use fiatlife_model::BillWithSource;
use fiatlife_storage::Database;
use fiatlife_sync::{
    BillRepository, BlobClient, CreditAccountRepository, CypherLogSubscriptionRepository,
    GoalRepository, JsonCodec, RelayClient, SalaryRepository, SyncReport,
};
use std::sync::Arc;
use tracing::info;

/// Per-repository outcome of [`FiatLife::sync_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FullSyncReport {
    pub salary: SyncReport,
    pub bills: SyncReport,
    pub goals: SyncReport,
    pub credit_accounts: SyncReport,
    pub cypherlog: SyncReport,
}

impl FullSyncReport {
    pub fn total(&self) -> SyncReport {
        let mut total = SyncReport::default();
        for report in [self.salary, self.bills, self.goals, self.credit_accounts, self.cypherlog] {
            total.merge(report);
        }
        total
    }
}

/// Open database plus every repository built on it.
#[derive(Clone)]
pub struct FiatLife {
    config: Arc<FiatLifeConfig>,
    database: Database,
    salary: SalaryRepository,
    bills: BillRepository,
    goals: GoalRepository,
    credit_accounts: CreditAccountRepository,
    cypherlog: CypherLogSubscriptionRepository,
}

impl FiatLife {
    /// Opens (or creates and migrates) the database and builds the
    /// repositories around the given clients.
    pub fn open(
        config: &FiatLifeConfig,
        relay: Arc<dyn RelayClient>,
        blobs: Arc<dyn BlobClient>,
    ) -> Result<Self> {
        let database = if config.in_memory {
            Database::open_in_memory().context("failed to open in-memory database")?
        } else {
            let path = config.database_path();
            Database::open(&path)
                .with_context(|| format!("failed to open database at {}", path.display()))?
        };
        let codec = JsonCodec;
        let timeout = config.sync_timeout();

        let app = Self {
            salary: SalaryRepository::new(database.salary_configs(), relay.clone(), codec, timeout),
            bills: BillRepository::new(database.bills(), relay.clone(), blobs.clone(), codec, timeout),
            goals: GoalRepository::new(database.goals(), relay.clone(), codec, timeout),
            credit_accounts: CreditAccountRepository::new(
                database.credit_accounts(),
                relay.clone(),
                blobs,
                codec,
                timeout,
            ),
            cypherlog: CypherLogSubscriptionRepository::new(
                database.cypherlog_subscriptions(),
                relay,
                codec,
                timeout,
            ),
            database,
            config: Arc::new(config.clone()),
        };
        info!(in_memory = config.in_memory, "FiatLife core opened");
        Ok(app)
    }

    /// Configuration the core was opened with. The core never dials
    /// `relay_url` or `blossom_server_url` itself; hosts read them here to
    /// build the clients they pass to [`FiatLife::open`].
    pub fn config(&self) -> &FiatLifeConfig {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn salary(&self) -> &SalaryRepository {
        &self.salary
    }

    pub fn bills(&self) -> &BillRepository {
        &self.bills
    }

    pub fn goals(&self) -> &GoalRepository {
        &self.goals
    }

    pub fn credit_accounts(&self) -> &CreditAccountRepository {
        &self.credit_accounts
    }

    pub fn cypherlog(&self) -> &CypherLogSubscriptionRepository {
        &self.cypherlog
    }

    /// Pulls every record type from the relay concurrently.
    pub async fn sync_all(&self) -> FullSyncReport {
        let (salary, bills, goals, credit_accounts, cypherlog) = tokio::join!(
            self.salary.sync_from_relay(),
            self.bills.sync_from_relay(),
            self.goals.sync_from_relay(),
            self.credit_accounts.sync_from_relay(),
            self.cypherlog.sync_from_relay(),
        );
        let report = FullSyncReport {
            salary,
            bills,
            goals,
            credit_accounts,
            cypherlog,
        };
        let total = report.total();
        info!(
            upserted = total.upserted,
            deleted = total.deleted,
            skipped = total.skipped,
            interrupted = total.interrupted,
            "relay sync finished"
        );
        report
    }

    /// Native bills followed by CypherLog subscriptions, each newest first.
    pub async fn all_bills(&self) -> Result<Vec<BillWithSource>> {
        let native = self.bills.list_bills().await.context("failed to list bills")?;
        let subscriptions = self
            .cypherlog
            .list_as_bills()
            .await
            .context("failed to list CypherLog subscriptions")?;
        Ok(native
            .into_iter()
            .map(BillWithSource::native)
            .chain(subscriptions)
            .collect())
    }

    /// Drops every locally stored record. Used on sign-out.
    pub async fn reset(&self) -> Result<()> {
        self.database
            .clear_all_tables()
            .await
            .context("failed to clear local data")?;
        info!("local data cleared");
        Ok(())
    }
}
