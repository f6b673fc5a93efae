use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::types::{PlanSave, WeeklyPlan};
use crate::entitlements::Entitlement;
use crate::errors::{AppError, AppResult};
use crate::storage::{keys, load_json, save_json, KvStore};

/// One user's saved plans, newest first, capped by entitlement.
#[derive(Clone)]
pub struct PlanStore {
    store: Arc<dyn KvStore>,
    key: String,
}

impl PlanStore {
    pub fn for_user(store: Arc<dyn KvStore>, user_id: &Uuid) -> Self {
        Self {
            store,
            key: keys::owned(keys::SAVED_PLANS, user_id),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<WeeklyPlan>> {
        Ok(load_json(self.store.as_ref(), &self.key).await?.unwrap_or_default())
    }

    /// Prepends the plan unless the cap is reached; at capacity nothing is
    /// written and nothing is evicted.
    #[instrument(skip(self, plan, entitlement), fields(plan_id = %plan.id))]
    pub async fn append(&self, plan: WeeklyPlan, entitlement: &Entitlement) -> AppResult<PlanSave> {
        let mut plans = self.list().await?;
        if !entitlement.has_plan_slot(plans.len()) {
            info!(saved = plans.len(), cap = entitlement.max_saved_plans, "plan cap reached");
            return Ok(PlanSave::AtCapacity);
        }
        plans.insert(0, plan);
        save_json(self.store.as_ref(), &self.key, &plans).await?;
        Ok(PlanSave::Saved(plans))
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: Uuid) -> AppResult<Vec<WeeklyPlan>> {
        let mut plans = self.list().await?;
        let before = plans.len();
        plans.retain(|p| p.id != id);
        if plans.len() != before {
            save_json(self.store.as_ref(), &self.key, &plans).await?;
        } else {
            debug!("plan not found");
        }
        Ok(plans)
    }

    #[instrument(skip(self, title))]
    pub async fn rename(&self, id: Uuid, title: &str) -> AppResult<Vec<WeeklyPlan>> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::validation("Title is required"));
        }
        let mut plans = self.list().await?;
        let Some(plan) = plans.iter_mut().find(|p| p.id == id) else {
            debug!("plan not found");
            return Ok(plans);
        };
        plan.title = title.to_string();
        save_json(self.store.as_ref(), &self.key, &plans).await?;
        Ok(plans)
    }
}
