use async_trait::async_trait;

use super::types::{
    DailyAnalysisResult, DailyPlan, FoodAnalysisResult, PlanPreferences, WeeklyPlanDraft,
};
use crate::diary::DiaryEntry;
use crate::errors::AppResult;
use crate::profile::{Language, UserProfile};

/// Structured content generation. Implementations fail only with
/// [`crate::errors::AppError::Generation`].
#[async_trait]
pub trait AiGateway: Send + Sync {
    async fn analyze_food_image(
        &self,
        image_data_url: &str,
        language: Language,
        note: Option<&str>,
    ) -> AppResult<FoodAnalysisResult>;

    async fn analyze_food_text(
        &self,
        description: &str,
        language: Language,
    ) -> AppResult<FoodAnalysisResult>;

    async fn generate_weekly_plan(
        &self,
        profile: &UserProfile,
        preferences: &PlanPreferences,
    ) -> AppResult<WeeklyPlanDraft>;

    async fn analyze_daily_intake(
        &self,
        profile: &UserProfile,
        entries: &[DiaryEntry],
    ) -> AppResult<DailyAnalysisResult>;

    async fn generate_daily_plan(&self, profile: &UserProfile) -> AppResult<DailyPlan>;
}
