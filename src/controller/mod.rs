//! The view-state controller: owns the active screen, the session context
//! and the per-screen state, and is the only thing that changes views.

mod actions;
mod view;

pub use actions::{AnalyzedFood, Pending, PlanRequest};
pub use view::View;

use std::collections::HashMap;

use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::ai::{DailyAnalysisResult, DailyPlan, FoodAnalysisResult, GenerationGuard, WeeklyPlanDraft};
use crate::auth::{LoginRequest, RegisterRequest, SessionStore};
use crate::diary::{dashboard_summary, group_by_day, DashboardSummary, DayGroup, DiaryEntry, DiaryStore};
use crate::errors::{AppError, AppResult};
use crate::plans::{PantrySelection, PlanStore, WeeklyPlan};
use crate::profile::services::{apply_goal, apply_manual_targets, apply_meals_per_day, apply_stats};
use crate::profile::{BodyStats, Goal, Language, MacroTargets, PlanType, UserProfile};
use crate::recipes::RecipeBrowser;
use crate::state::AppState;

/// The logged-in user and their collections.
pub struct Session {
    pub profile: UserProfile,
    pub diary: Vec<DiaryEntry>,
    pub plans: Vec<WeeklyPlan>,
    diary_store: DiaryStore,
    plan_store: PlanStore,
}

/// Transient state of the screens. Cleared on login and logout.
#[derive(Debug, Default)]
pub struct Screen {
    pub loading: bool,
    pub error: Option<String>,
    pub food_analysis: Option<FoodAnalysisResult>,
    pub food_image: Option<String>,
    pub weekly_draft: Option<WeeklyPlanDraft>,
    /// Keyed by day (`YYYY-MM-DD`).
    pub daily_analyses: HashMap<String, DailyAnalysisResult>,
    pub daily_plan: Option<DailyPlan>,
}

/// One token sequence per feature.
#[derive(Debug, Clone, Default)]
struct Guards {
    food: GenerationGuard,
    weekly: GenerationGuard,
    daily: GenerationGuard,
    daily_plan: GenerationGuard,
}

impl Guards {
    fn invalidate_all(&self) {
        self.food.invalidate();
        self.weekly.invalidate();
        self.daily.invalidate();
        self.daily_plan.invalidate();
    }
}

pub struct Controller {
    state: AppState,
    sessions: SessionStore,
    view: View,
    language: Language,
    session: Option<Session>,
    screen: Screen,
    guards: Guards,
    pantry: PantrySelection,
    recipes: RecipeBrowser,
}

impl Controller {
    /// Restores the persisted session if there is one. Never fails: a
    /// malformed session is discarded and the user lands on onboarding.
    #[instrument(skip(state))]
    pub async fn start(state: AppState) -> Self {
        let sessions = SessionStore::new(state.store.clone(), state.clock.clone());
        let mut controller = Self {
            language: state.config.default_language,
            state,
            sessions,
            view: View::Onboarding,
            session: None,
            screen: Screen::default(),
            guards: Guards::default(),
            pantry: PantrySelection::default(),
            recipes: RecipeBrowser::new(),
        };

        match controller.sessions.current_session().await {
            Ok(Some(profile)) => controller.enter(profile).await,
            Ok(None) => info!("no session; onboarding"),
            Err(e) => {
                warn!(error = %e, "session unreadable; onboarding");
                if let Err(e) = controller.sessions.logout().await {
                    error!(error = %e, "could not discard malformed session");
                }
            }
        }
        controller
    }

    pub fn active_view(&self) -> View {
        self.view
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.session.as_ref().map(|s| &s.profile)
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn pantry(&self) -> &PantrySelection {
        &self.pantry
    }

    pub fn recipes(&self) -> &RecipeBrowser {
        &self.recipes
    }

    pub fn recipes_mut(&mut self) -> &mut RecipeBrowser {
        &mut self.recipes
    }

    pub fn dashboard(&self) -> Option<DashboardSummary> {
        let s = self.session.as_ref()?;
        Some(dashboard_summary(&s.profile, &s.diary, &self.state.clock.today()))
    }

    pub fn diary_days(&self) -> Vec<DayGroup> {
        self.session.as_ref().map(|s| group_by_day(&s.diary)).unwrap_or_default()
    }

    /// Language picker on the entry screens.
    pub fn set_entry_language(&mut self, language: Language) {
        if self.session.is_none() {
            self.language = language;
        }
    }

    pub fn go_to_login(&mut self) {
        if self.view == View::Onboarding {
            self.set_view(View::Login);
        }
    }

    pub fn go_to_register(&mut self) {
        if self.view == View::Login {
            self.set_view(View::Onboarding);
        }
    }

    /// Onboarding finished: creates the account and enters the dashboard.
    #[instrument(skip(self, req))]
    pub async fn complete_onboarding(&mut self, req: RegisterRequest) -> AppResult<()> {
        if self.view != View::Onboarding {
            debug!(view = ?self.view, "onboarding completed outside onboarding; ignored");
            return Ok(());
        }
        let profile = self.sessions.register(req).await.map_err(|e| self.inline(e))?;
        self.enter(profile).await;
        Ok(())
    }

    #[instrument(skip(self, req))]
    pub async fn login(&mut self, req: LoginRequest) -> AppResult<()> {
        if self.view != View::Login {
            debug!(view = ?self.view, "login outside login screen; ignored");
            return Ok(());
        }
        let profile = self.sessions.login(req).await.map_err(|e| self.inline(e))?;
        self.enter(profile).await;
        Ok(())
    }

    /// Clears the persisted session first, then the in-memory one.
    #[instrument(skip(self))]
    pub async fn logout(&mut self) -> AppResult<()> {
        if self.session.is_none() {
            return Ok(());
        }
        self.sessions.logout().await.map_err(|e| self.inline(e))?;
        self.session = None;
        self.screen = Screen::default();
        self.pantry = PantrySelection::default();
        self.set_view(View::Login);
        info!("logged out");
        Ok(())
    }

    /// Moves to `target`. Views that need a session fall back to login
    /// without one; in-flight generations are abandoned.
    #[instrument(skip(self))]
    pub fn navigate(&mut self, target: View) {
        if target == self.view {
            return;
        }
        if self.session.is_some() && !target.requires_auth() {
            debug!(?target, "entry screen while logged in; ignored");
            return;
        }
        self.set_view(target);
    }

    fn set_view(&mut self, target: View) {
        let target = if target.requires_auth() && self.session.is_none() {
            View::Login
        } else {
            target
        };
        if target != self.view {
            self.guards.invalidate_all();
            self.screen.loading = false;
            self.screen.error = None;
            debug!(from = ?self.view, to = ?target, "view change");
        }
        self.view = target;
    }

    async fn enter(&mut self, profile: UserProfile) {
        let diary_store = DiaryStore::for_user(self.state.store.clone(), &profile.id);
        let plan_store = PlanStore::for_user(self.state.store.clone(), &profile.id);
        self.screen = Screen::default();

        let diary = diary_store.list().await.unwrap_or_else(|e| {
            error!(error = %e, user_id = %profile.id, "diary unreadable");
            self.screen.error = Some(e.inline_message());
            Vec::new()
        });
        let plans = plan_store.list().await.unwrap_or_else(|e| {
            error!(error = %e, user_id = %profile.id, "saved plans unreadable");
            self.screen.error = Some(e.inline_message());
            Vec::new()
        });

        self.language = profile.language;
        self.pantry = PantrySelection::new(&profile.entitlements());
        info!(user_id = %profile.id, entries = diary.len(), plans = plans.len(), "session active");
        self.session = Some(Session {
            profile,
            diary,
            plans,
            diary_store,
            plan_store,
        });
        self.guards.invalidate_all();
        self.view = View::Dashboard;
    }

    /// Records the inline message for the active screen and hands the error
    /// back to the caller.
    fn inline(&mut self, err: AppError) -> AppError {
        match &err {
            AppError::Validation(_) | AppError::InvalidCredentials | AppError::DuplicateEmail => {
                debug!(error = %err, "rejected input")
            }
            _ => error!(error = %err, view = ?self.view, "operation failed"),
        }
        self.screen.loading = false;
        self.screen.error = Some(err.inline_message());
        err
    }

    fn require_session(&mut self) -> AppResult<&mut Session> {
        match self.session {
            Some(ref mut session) => Ok(session),
            None => {
                self.set_view(View::Login);
                Err(AppError::validation("Not logged in"))
            }
        }
    }

    /// Applies `edit` to a copy of the profile and persists it; the live
    /// profile changes only if both succeed.
    async fn edit_profile<F>(&mut self, edit: F) -> AppResult<()>
    where
        F: FnOnce(&mut UserProfile) -> AppResult<()>,
    {
        let mut updated = self.require_session()?.profile.clone();
        edit(&mut updated).map_err(|e| self.inline(e))?;
        self.sessions.persist(&updated).await.map_err(|e| self.inline(e))?;
        self.language = updated.language;
        self.screen.error = None;
        if let Some(s) = self.session.as_mut() {
            s.profile = updated;
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn update_stats(&mut self, stats: BodyStats) -> AppResult<()> {
        self.edit_profile(|p| apply_stats(p, stats)).await
    }

    #[instrument(skip(self))]
    pub async fn change_goal(&mut self, goal: Goal) -> AppResult<()> {
        self.edit_profile(|p| {
            apply_goal(p, goal);
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn set_targets(&mut self, targets: MacroTargets) -> AppResult<()> {
        self.edit_profile(|p| apply_manual_targets(p, targets)).await
    }

    #[instrument(skip(self))]
    pub async fn set_meals_per_day(&mut self, meals: u32) -> AppResult<()> {
        self.edit_profile(|p| apply_meals_per_day(p, meals)).await
    }

    #[instrument(skip(self))]
    pub async fn set_language(&mut self, language: Language) -> AppResult<()> {
        self.edit_profile(|p| {
            p.language = language;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self, picture))]
    pub async fn set_profile_picture(&mut self, picture: Option<String>) -> AppResult<()> {
        self.edit_profile(|p| {
            p.profile_picture = picture;
            Ok(())
        })
        .await
    }

    /// Pricing screen purchase: switches tier and returns to the dashboard.
    #[instrument(skip(self))]
    pub async fn upgrade(&mut self, plan: PlanType) -> AppResult<()> {
        self.edit_profile(|p| {
            p.set_plan_type(plan);
            Ok(())
        })
        .await?;
        if let Some(s) = self.session.as_ref() {
            self.pantry.relimit(&s.profile.entitlements());
            info!(user_id = %s.profile.id, plan = plan.as_str(), "plan changed");
        }
        self.set_view(View::Dashboard);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_diary_entry(&mut self, id: Uuid) -> AppResult<()> {
        let session = self.require_session()?;
        let result = session.diary_store.remove(id).await;
        let diary = result.map_err(|e| self.inline(e))?;
        if let Some(s) = self.session.as_mut() {
            s.diary = diary;
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_plan(&mut self, id: Uuid) -> AppResult<()> {
        let session = self.require_session()?;
        let result = session.plan_store.remove(id).await;
        let plans = result.map_err(|e| self.inline(e))?;
        if let Some(s) = self.session.as_mut() {
            s.plans = plans;
        }
        Ok(())
    }

    #[instrument(skip(self, title))]
    pub async fn rename_plan(&mut self, id: Uuid, title: &str) -> AppResult<()> {
        let session = self.require_session()?;
        let result = session.plan_store.rename(id, title).await;
        let plans = result.map_err(|e| self.inline(e))?;
        if let Some(s) = self.session.as_mut() {
            s.plans = plans;
        }
        Ok(())
    }
}
