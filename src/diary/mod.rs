mod repo;
pub mod services;
mod types;

pub use repo::DiaryStore;
pub use services::{dashboard_summary, group_by_day, DashboardSummary, DayGroup};
pub use types::{DiaryEntry, MealType};
