use crate::app_data::{decode_list, decode_one, decode_row, decode_rows, AppData, AppDataSync, SyncReport};
use crate::client::RelayClient;
use crate::codec::JsonCodec;
use crate::error::SyncResult;
use fiatlife_model::{FinancialGoal, GoalCategory};
use fiatlife_storage::{EntityStore, GoalEntity};
use futures::stream::BoxStream;
use std::sync::Arc;
use std::time::Duration;

/// Savings goals, synced under `fiatlife/goal/<id>`. Deletes propagate to
/// other devices through a tombstone.
#[derive(Clone)]
pub struct GoalRepository {
    store: EntityStore<GoalEntity>,
    sync: AppDataSync,
}

impl GoalRepository {
    pub fn new(
        store: EntityStore<GoalEntity>,
        relay: Arc<dyn RelayClient>,
        codec: JsonCodec,
        sync_timeout: Duration,
    ) -> Self {
        Self {
            store,
            sync: AppDataSync::new(relay, codec, sync_timeout),
        }
    }

    pub fn observe_goals(&self) -> BoxStream<'static, SyncResult<Vec<FinancialGoal>>> {
        decode_list::<FinancialGoal>(self.sync.codec(), self.store.observe_all())
    }

    pub fn observe_by_category(
        &self,
        category: GoalCategory,
    ) -> BoxStream<'static, SyncResult<Vec<FinancialGoal>>> {
        decode_list::<FinancialGoal>(self.sync.codec(), self.store.observe_by_filter(category.as_str()))
    }

    pub fn observe_goal(&self, id: &str) -> BoxStream<'static, SyncResult<Option<FinancialGoal>>> {
        decode_one::<FinancialGoal>(self.sync.codec(), self.store.observe_by_key(id))
    }

    pub async fn list_goals(&self) -> SyncResult<Vec<FinancialGoal>> {
        decode_rows::<FinancialGoal>(self.sync.codec(), &self.store.list_all().await?)
    }

    pub async fn get_goal(&self, id: &str) -> SyncResult<Option<FinancialGoal>> {
        decode_row::<FinancialGoal>(self.sync.codec(), self.store.get_by_key(id).await?)
    }

    pub async fn save_goal(&self, goal: FinancialGoal) -> SyncResult<FinancialGoal> {
        self.sync.save(&self.store, goal).await
    }

    /// Sets the saved amount of an existing goal. `None` if there is no
    /// such goal.
    pub async fn update_progress(
        &self,
        goal_id: &str,
        new_amount: f64,
    ) -> SyncResult<Option<FinancialGoal>> {
        let Some(mut goal) = self.get_goal(goal_id).await? else {
            return Ok(None);
        };
        goal.current_amount = new_amount;
        self.save_goal(goal).await.map(Some)
    }

    pub async fn delete_goal(&self, goal: &FinancialGoal) -> SyncResult<()> {
        self.store.delete_by_key(&goal.id).await?;
        self.sync.publish_delete(&goal.d_tag(), FinancialGoal::LABEL).await;
        Ok(())
    }

    pub async fn sync_from_relay(&self) -> SyncReport {
        self.sync.pull::<FinancialGoal>(&self.store).await
    }
}
