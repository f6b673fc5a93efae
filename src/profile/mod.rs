pub mod services;
pub mod targets;
mod types;

pub use services::BodyStats;
pub use targets::compute_targets;
pub use types::{ActivityLevel, Gender, Goal, Language, MacroTargets, PlanType, UserProfile};
