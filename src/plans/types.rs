use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::ai::{PlanDay, WeeklyPlanDraft};

/// A saved week. Only the title can change after saving.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPlan {
    pub id: Uuid,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub week_summary: String,
    pub days: Vec<PlanDay>,
}

impl WeeklyPlan {
    pub fn from_draft(draft: WeeklyPlanDraft, title: String, created_at: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            created_at,
            week_summary: draft.week_summary,
            days: draft.days,
        }
    }
}

/// Outcome of [`super::PlanStore::append`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlanSave {
    Saved(Vec<WeeklyPlan>),
    AtCapacity,
}
