use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, instrument};

use super::gateway::AiGateway;
use super::prompts;
use super::types::{
    DailyAnalysisResult, DailyPlan, FoodAnalysisResult, PlanPreferences, WeeklyPlanDraft,
};
use crate::diary::DiaryEntry;
use crate::errors::{AppError, AppResult};
use crate::profile::{Language, UserProfile};

#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    /// Base64 payload without any data-URL prefix.
    pub data: String,
    pub mime_type: &'static str,
}

/// One structured-output call: prompt, optional images, JSON schema of the
/// expected reply.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub model: String,
    pub prompt: String,
    pub images: Vec<InlineImage>,
    pub response_schema: Value,
}

/// Transport to a generative model; returns the raw reply text.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, request: ModelRequest) -> anyhow::Result<String>;
}

/// Placeholder transport for builds without a model backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineModel;

#[async_trait]
impl GenerativeModel for OfflineModel {
    async fn generate(&self, _request: ModelRequest) -> anyhow::Result<String> {
        anyhow::bail!("no generative model configured")
    }
}

/// [`AiGateway`] over any [`GenerativeModel`]: builds prompts, sends them,
/// decodes the JSON reply.
pub struct ModelGateway<M> {
    model: M,
    model_name: String,
}

impl<M: GenerativeModel> ModelGateway<M> {
    pub fn new(model: M, model_name: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        what: &'static str,
        prompt: String,
        images: Vec<InlineImage>,
        response_schema: Value,
    ) -> AppResult<T> {
        let request = ModelRequest {
            model: self.model_name.clone(),
            prompt,
            images,
            response_schema,
        };
        let text = self.model.generate(request).await.map_err(|e| {
            error!(error = %e, what, "model call failed");
            AppError::generation(e.to_string())
        })?;
        if text.trim().is_empty() {
            error!(what, "empty model reply");
            return Err(AppError::generation("no response text"));
        }
        let parsed = serde_json::from_str(&text).map_err(|e| {
            error!(error = %e, what, "malformed model reply");
            AppError::generation(format!("malformed {what} reply"))
        })?;
        debug!(what, "model reply decoded");
        Ok(parsed)
    }
}

fn jpeg(data_url: &str) -> InlineImage {
    InlineImage {
        data: prompts::strip_data_url(data_url).to_string(),
        mime_type: "image/jpeg",
    }
}

#[async_trait]
impl<M: GenerativeModel> AiGateway for ModelGateway<M> {
    #[instrument(skip(self, image_data_url, note))]
    async fn analyze_food_image(
        &self,
        image_data_url: &str,
        language: Language,
        note: Option<&str>,
    ) -> AppResult<FoodAnalysisResult> {
        self.call(
            "food image analysis",
            prompts::food_image_prompt(language, note),
            vec![jpeg(image_data_url)],
            prompts::food_analysis_schema(),
        )
        .await
    }

    #[instrument(skip(self, description))]
    async fn analyze_food_text(
        &self,
        description: &str,
        language: Language,
    ) -> AppResult<FoodAnalysisResult> {
        self.call(
            "food text analysis",
            prompts::food_text_prompt(language, description),
            Vec::new(),
            prompts::food_analysis_schema(),
        )
        .await
    }

    #[instrument(skip_all, fields(user_id = %profile.id))]
    async fn generate_weekly_plan(
        &self,
        profile: &UserProfile,
        preferences: &PlanPreferences,
    ) -> AppResult<WeeklyPlanDraft> {
        self.call(
            "weekly plan",
            prompts::weekly_plan_prompt(profile, preferences),
            preferences.pantry_images.iter().map(|img| jpeg(img)).collect(),
            prompts::weekly_plan_schema(profile.language),
        )
        .await
    }

    #[instrument(skip_all, fields(user_id = %profile.id, entries = entries.len()))]
    async fn analyze_daily_intake(
        &self,
        profile: &UserProfile,
        entries: &[DiaryEntry],
    ) -> AppResult<DailyAnalysisResult> {
        self.call(
            "daily intake analysis",
            prompts::daily_intake_prompt(profile, entries),
            Vec::new(),
            prompts::daily_analysis_schema(),
        )
        .await
    }

    #[instrument(skip_all, fields(user_id = %profile.id))]
    async fn generate_daily_plan(&self, profile: &UserProfile) -> AppResult<DailyPlan> {
        self.call(
            "daily plan",
            prompts::daily_plan_prompt(profile),
            Vec::new(),
            prompts::daily_plan_schema(profile.language),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_profile, ScriptedModel};

    #[tokio::test]
    async fn decodes_structured_reply_and_strips_image_prefix() {
        let model = ScriptedModel::replying(
            r#"{"foodName":"Omelete","macros":{"calories":250,"protein":18,"carbs":2,"fat":19},"healthScore":7,"feedback":"ok","suggestions":[],"ingredients":["ovo"],"isValidFood":true}"#,
        );
        let gateway = ModelGateway::new(model.clone(), "test-model");
        let result = gateway
            .analyze_food_image("data:image/png;base64,AAAA", Language::PtPt, Some("sem sal"))
            .await
            .unwrap();
        assert_eq!(result.food_name, "Omelete");
        assert_eq!(result.macros.fat, 19.0);

        let sent = model.requests().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].model, "test-model");
        assert_eq!(sent[0].images, vec![InlineImage { data: "AAAA".into(), mime_type: "image/jpeg" }]);
        assert!(sent[0].prompt.contains("European Portuguese"));
    }

    #[tokio::test]
    async fn malformed_and_empty_replies_are_generation_failures() {
        let gateway = ModelGateway::new(ScriptedModel::replying("{not json"), "m");
        let err = gateway.analyze_food_text("bread", Language::En).await.unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));

        let gateway = ModelGateway::new(ScriptedModel::replying("   "), "m");
        let err = gateway.generate_daily_plan(&sample_profile()).await.unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
    }

    #[tokio::test]
    async fn transport_errors_are_generation_failures() {
        let gateway = ModelGateway::new(OfflineModel, "m");
        let err = gateway.analyze_food_text("bread", Language::En).await.unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
    }

    #[tokio::test]
    async fn weekly_plan_sends_every_pantry_image() {
        let model = ScriptedModel::replying(r#"{"weekSummary":"s","days":[{"day":"Mon","meals":[]}]}"#);
        let gateway = ModelGateway::new(model.clone(), "m");
        let prefs = PlanPreferences {
            meals_per_day: 4,
            budget: "medium".into(),
            pantry: String::new(),
            pantry_images: vec!["data:image/jpeg;base64,AA".into(), "BB".into()],
        };
        let draft = gateway.generate_weekly_plan(&sample_profile(), &prefs).await.unwrap();
        assert_eq!(draft.days.len(), 1);
        let sent = model.requests().await;
        assert_eq!(sent[0].images.len(), 2);
        assert_eq!(sent[0].images[1].data, "BB");
    }
}
