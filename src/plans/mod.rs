mod repo;
pub mod services;
mod types;

pub use repo::PlanStore;
pub use services::{plan_from_draft, plan_title, PantrySelection};
pub use types::{PlanSave, WeeklyPlan};
