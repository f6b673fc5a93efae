mod gateway;
pub mod generation;
pub mod model;
pub mod prompts;
mod types;

pub use gateway::AiGateway;
pub use generation::{Completed, GenerationGuard, GenerationToken};
pub use model::{GenerativeModel, InlineImage, ModelGateway, ModelRequest, OfflineModel};
pub use types::{
    normalize_score, DailyAnalysisResult, DailyMeal, DailyPlan, Exercise, FoodAnalysisResult,
    FoodInput, Macros, PlanDay, PlanPreferences, PlannedMeal, WeeklyPlanDraft,
};
