use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::{Controller, View};
use crate::ai::{
    normalize_score, Completed, DailyAnalysisResult, DailyPlan, FoodAnalysisResult, FoodInput,
    GenerationToken, PlanPreferences, WeeklyPlanDraft,
};
use crate::diary::services::{entries_on, entry_from_analysis};
use crate::diary::MealType;
use crate::entitlements::{Entitlement, Gate};
use crate::errors::{AppError, AppResult};
use crate::plans::{plan_from_draft, PlanSave};
use crate::recipes::{open_recipe, Recipe};

type Task<T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send>>;

/// An issued generation request. Run it (possibly elsewhere) and hand the
/// [`Completed`] value back to the matching `finish_*` method.
pub struct Pending<T> {
    token: GenerationToken,
    task: Task<T>,
}

impl<T> Pending<T> {
    pub fn token(&self) -> GenerationToken {
        self.token
    }

    pub async fn run(self) -> Completed<AppResult<T>> {
        Completed {
            token: self.token,
            result: self.task.await,
        }
    }
}

/// Planner form input; pantry photos come from the controller's selection.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanRequest {
    pub meals_per_day: u32,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub pantry: String,
}

/// An analysis together with the photo it was made from, if any.
#[derive(Debug, Clone)]
pub struct AnalyzedFood {
    pub analysis: FoodAnalysisResult,
    pub image: Option<String>,
}

impl Controller {
    fn entitlement(&self) -> Option<Entitlement> {
        self.profile().map(|p| p.entitlements())
    }

    /// Coach feedback on analyses and the week summary of plans.
    pub fn shows_coach_feedback(&self) -> bool {
        self.entitlement().is_some_and(|e| e.coach_feedback)
    }

    fn upgrade_required<T>(&mut self, feature: &'static str) -> Gate<T> {
        info!(feature, "feature locked for tier; showing pricing");
        self.set_view(View::Premium);
        Gate::UpgradeRequired
    }

    /// Issues an analysis request for a photo or a description. A photo
    /// wins over text.
    #[instrument(skip(self, input))]
    pub fn begin_food_analysis(&mut self, input: FoodInput) -> AppResult<Pending<AnalyzedFood>> {
        let language = self.require_session()?.profile.language;
        let gateway = self.state.gateway.clone();

        let task: Task<AnalyzedFood> = match input {
            FoodInput::Image { data_url, note } => Box::pin(async move {
                let analysis = gateway.analyze_food_image(&data_url, language, note.as_deref()).await?;
                Ok(AnalyzedFood {
                    analysis,
                    image: Some(data_url),
                })
            }),
            FoodInput::Text(text) => {
                let text = text.trim().to_string();
                if text.is_empty() {
                    return Err(self.inline(AppError::validation("Describe the meal")));
                }
                Box::pin(async move {
                    let analysis = gateway.analyze_food_text(&text, language).await?;
                    Ok(AnalyzedFood { analysis, image: None })
                })
            }
        };

        self.screen.loading = true;
        self.screen.error = None;
        Ok(Pending {
            token: self.guards.food.issue(),
            task,
        })
    }

    /// Applies a finished analysis if it is still the latest request.
    /// Returns whether it was applied. The shown analysis and its photo only
    /// ever change together.
    pub fn finish_food_analysis(&mut self, done: Completed<AppResult<AnalyzedFood>>) -> bool {
        if !self.guards.food.is_current(done.token) {
            debug!("stale food analysis dropped");
            return false;
        }
        self.screen.loading = false;
        match done.result {
            Ok(AnalyzedFood { analysis, image: Some(_) }) if analysis.is_valid_food == Some(false) => {
                warn!(food = %analysis.food_name, "image is not food");
                let message = if analysis.feedback.is_empty() {
                    "Not a food image".to_string()
                } else {
                    analysis.feedback
                };
                self.screen.error = Some(message);
            }
            Ok(AnalyzedFood { mut analysis, image }) => {
                analysis.health_score = normalize_score(analysis.health_score);
                self.screen.food_analysis = Some(analysis);
                self.screen.food_image = image;
                self.screen.error = None;
            }
            Err(e) => {
                self.inline(e);
            }
        }
        true
    }

    pub async fn analyze_food(&mut self, input: FoodInput) -> AppResult<()> {
        let pending = self.begin_food_analysis(input)?;
        let done = pending.run().await;
        self.finish_food_analysis(done);
        match &self.screen.error {
            Some(msg) => Err(AppError::generation(msg.clone())),
            None => Ok(()),
        }
    }

    /// Logs the current analysis to the diary and returns to the dashboard.
    #[instrument(skip(self))]
    pub async fn save_analysis(&mut self, meal_type: MealType) -> AppResult<()> {
        let Some(analysis) = self.screen.food_analysis.clone() else {
            return Err(self.inline(AppError::validation("Nothing to save")));
        };
        let entry = entry_from_analysis(
            &analysis,
            meal_type,
            self.screen.food_image.clone(),
            self.state.clock.as_ref(),
        );
        let session = self.require_session()?;
        let result = session.diary_store.append(entry).await;
        let diary = result.map_err(|e| self.inline(e))?;
        if let Some(s) = self.session.as_mut() {
            s.diary = diary;
        }
        self.screen.food_analysis = None;
        self.screen.food_image = None;
        self.set_view(View::Dashboard);
        Ok(())
    }

    /// Adds pantry photos up to the tier limit; returns how many were kept.
    pub fn add_pantry_photos(&mut self, photos: Vec<String>) -> usize {
        let offered = photos.len();
        let taken = self.pantry.add(photos);
        if taken < offered {
            debug!(offered, taken, "pantry photos over limit ignored");
        }
        taken
    }

    pub fn remove_pantry_photo(&mut self, index: usize) {
        self.pantry.remove(index);
    }

    /// Issues a weekly plan request. Upgradeable tiers with every plan slot
    /// used are sent to pricing instead.
    #[instrument(skip(self, req))]
    pub fn begin_weekly_plan(&mut self, req: PlanRequest) -> AppResult<Gate<Pending<WeeklyPlanDraft>>> {
        let session = self.require_session()?;
        let profile = session.profile.clone();
        let saved = session.plans.len();
        if !profile.entitlements().has_plan_slot(saved) && profile.plan_type().can_upgrade() {
            return Ok(self.upgrade_required("weekly_plan"));
        }
        if !(1..=8).contains(&req.meals_per_day) {
            return Err(self.inline(AppError::validation("Invalid data")));
        }

        let preferences = PlanPreferences {
            meals_per_day: req.meals_per_day,
            budget: req.budget,
            pantry: req.pantry,
            pantry_images: self.pantry.photos().to_vec(),
        };
        let gateway = self.state.gateway.clone();
        self.screen.loading = true;
        self.screen.error = None;
        Ok(Gate::Allowed(Pending {
            token: self.guards.weekly.issue(),
            task: Box::pin(async move { gateway.generate_weekly_plan(&profile, &preferences).await }),
        }))
    }

    pub fn finish_weekly_plan(&mut self, done: Completed<AppResult<WeeklyPlanDraft>>) -> bool {
        if !self.guards.weekly.is_current(done.token) {
            debug!("stale weekly plan dropped");
            return false;
        }
        self.screen.loading = false;
        match done.result {
            Ok(draft) => self.screen.weekly_draft = Some(draft),
            Err(e) => {
                self.inline(e);
            }
        }
        true
    }

    pub async fn generate_weekly_plan(&mut self, req: PlanRequest) -> AppResult<Gate<()>> {
        let pending = match self.begin_weekly_plan(req)? {
            Gate::Allowed(p) => p,
            Gate::UpgradeRequired => return Ok(Gate::UpgradeRequired),
        };
        let done = pending.run().await;
        let failed = done.result.as_ref().err().map(ToString::to_string);
        self.finish_weekly_plan(done);
        match failed {
            Some(message) => Err(AppError::generation(message)),
            None => Ok(Gate::Allowed(())),
        }
    }

    /// Saves the generated draft. At capacity nothing is stored; upgradeable
    /// tiers are sent to pricing.
    #[instrument(skip(self))]
    pub async fn save_weekly_plan(&mut self) -> AppResult<Gate<()>> {
        let Some(draft) = self.screen.weekly_draft.clone() else {
            return Err(self.inline(AppError::validation("Nothing to save")));
        };
        let clock = self.state.clock.clone();
        let session = self.require_session()?;
        let entitlement = session.profile.entitlements();
        let can_upgrade = session.profile.plan_type().can_upgrade();
        let plan = plan_from_draft(draft, session.profile.language, clock.as_ref());

        let result = session.plan_store.append(plan, &entitlement).await;
        match result.map_err(|e| self.inline(e))? {
            PlanSave::Saved(plans) => {
                if let Some(s) = self.session.as_mut() {
                    s.plans = plans;
                }
                self.screen.weekly_draft = None;
                self.pantry.clear();
                Ok(Gate::Allowed(()))
            }
            PlanSave::AtCapacity if can_upgrade => Ok(self.upgrade_required("save_plan")),
            PlanSave::AtCapacity => {
                self.screen.error = Some("Plan limit reached".into());
                Ok(Gate::UpgradeRequired)
            }
        }
    }

    /// Issues an analysis of one diary day. Needs `can_analyze_daily_intake`.
    #[instrument(skip(self))]
    pub fn begin_daily_analysis(&mut self, date: &str) -> AppResult<Gate<Pending<(String, DailyAnalysisResult)>>> {
        let session = self.require_session()?;
        let profile = session.profile.clone();
        let entries: Vec<_> = entries_on(&session.diary, date).into_iter().cloned().collect();
        if !profile.entitlements().can_analyze_daily_intake {
            return Ok(self.upgrade_required("daily_analysis"));
        }
        if entries.is_empty() {
            return Err(self.inline(AppError::validation("No meals logged on this day")));
        }

        let gateway = self.state.gateway.clone();
        let date = date.to_string();
        self.screen.loading = true;
        self.screen.error = None;
        Ok(Gate::Allowed(Pending {
            token: self.guards.daily.issue(),
            task: Box::pin(async move {
                let result = gateway.analyze_daily_intake(&profile, &entries).await?;
                Ok((date, result))
            }),
        }))
    }

    pub fn finish_daily_analysis(&mut self, done: Completed<AppResult<(String, DailyAnalysisResult)>>) -> bool {
        if !self.guards.daily.is_current(done.token) {
            debug!("stale daily analysis dropped");
            return false;
        }
        self.screen.loading = false;
        match done.result {
            Ok((date, mut result)) => {
                result.score = normalize_score(result.score);
                self.screen.daily_analyses.insert(date, result);
            }
            Err(e) => {
                self.inline(e);
            }
        }
        true
    }

    pub async fn analyze_day(&mut self, date: &str) -> AppResult<Gate<()>> {
        let pending = match self.begin_daily_analysis(date)? {
            Gate::Allowed(p) => p,
            Gate::UpgradeRequired => return Ok(Gate::UpgradeRequired),
        };
        let done = pending.run().await;
        let failed = done.result.as_ref().err().map(ToString::to_string);
        self.finish_daily_analysis(done);
        match failed {
            Some(message) => Err(AppError::generation(message)),
            None => Ok(Gate::Allowed(())),
        }
    }

    /// Issues a meal and workout plan for today. Paid tiers only.
    #[instrument(skip(self))]
    pub fn begin_daily_plan(&mut self) -> AppResult<Gate<Pending<DailyPlan>>> {
        let profile = self.require_session()?.profile.clone();
        if !profile.entitlements().daily_plan_access {
            return Ok(self.upgrade_required("daily_plan"));
        }
        let gateway = self.state.gateway.clone();
        self.screen.loading = true;
        self.screen.error = None;
        Ok(Gate::Allowed(Pending {
            token: self.guards.daily_plan.issue(),
            task: Box::pin(async move { gateway.generate_daily_plan(&profile).await }),
        }))
    }

    pub fn finish_daily_plan(&mut self, done: Completed<AppResult<DailyPlan>>) -> bool {
        if !self.guards.daily_plan.is_current(done.token) {
            debug!("stale daily plan dropped");
            return false;
        }
        self.screen.loading = false;
        match done.result {
            Ok(plan) => self.screen.daily_plan = Some(plan),
            Err(e) => {
                self.inline(e);
            }
        }
        true
    }

    pub async fn generate_daily_plan(&mut self) -> AppResult<Gate<()>> {
        let pending = match self.begin_daily_plan()? {
            Gate::Allowed(p) => p,
            Gate::UpgradeRequired => return Ok(Gate::UpgradeRequired),
        };
        let done = pending.run().await;
        let failed = done.result.as_ref().err().map(ToString::to_string);
        self.finish_daily_plan(done);
        match failed {
            Some(message) => Err(AppError::generation(message)),
            None => Ok(Gate::Allowed(())),
        }
    }

    /// Opens a recipe; locked premium recipes send the user to pricing.
    pub fn open_recipe(&mut self, id: &str) -> Option<Gate<&'static Recipe>> {
        let entitlement = self.entitlement()?;
        match open_recipe(id, &entitlement)? {
            Gate::Allowed(recipe) => Some(Gate::Allowed(recipe)),
            Gate::UpgradeRequired => Some(self.upgrade_required("recipe")),
        }
    }
}
