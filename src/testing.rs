//! Fixtures shared by the unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use time::macros::datetime;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::ai::{
    AiGateway, DailyAnalysisResult, DailyPlan, FoodAnalysisResult, GenerativeModel, Macros,
    ModelRequest, PlanDay, PlanPreferences, PlannedMeal, WeeklyPlanDraft,
};
use crate::clock::Clock;
use crate::diary::{DiaryEntry, MealType};
use crate::errors::{AppError, AppResult};
use crate::plans::WeeklyPlan;
use crate::profile::{compute_targets, Gender, Goal, Language, UserProfile};

pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

/// 2026-10-19 10:30 at UTC+1.
pub fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(datetime!(2026-10-19 10:30 +1)))
}

/// 70 kg, 175 cm, 30 y male on maintenance, free tier.
pub fn sample_profile() -> UserProfile {
    let mut p = UserProfile::new_account(
        "Ana Silva".into(),
        "ana@example.com".into(),
        datetime!(2026-10-01 09:00 +1),
    );
    p.weight = 70.0;
    p.height = 175.0;
    p.age = 30;
    p.gender = Gender::Male;
    p.goal = Goal::Maintain;
    p.language = Language::PtPt;
    p.targets = compute_targets(p.weight, p.height, p.age, p.gender, p.goal);
    p
}

pub fn entry_on(date: &str, name: &str, calories: f64) -> DiaryEntry {
    DiaryEntry {
        id: Uuid::new_v4(),
        date: date.to_string(),
        timestamp: datetime!(2026-10-19 12:00 +1),
        food_name: name.to_string(),
        meal_type: MealType::Lunch,
        macros: Macros { calories, protein: 10.0, carbs: 20.0, fat: 5.0 },
        image: None,
    }
}

pub fn sample_plan(title: &str) -> WeeklyPlan {
    WeeklyPlan::from_draft(sample_draft(), title.to_string(), datetime!(2026-10-19 10:30 +1))
}

pub fn sample_draft() -> WeeklyPlanDraft {
    WeeklyPlanDraft {
        week_summary: "Mediterranean week".into(),
        days: vec![PlanDay {
            day: "Segunda".into(),
            meals: vec![PlannedMeal {
                meal_type: "Lunch".into(),
                name: "Salada de Frango".into(),
                calories: 450.0,
            }],
        }],
    }
}

pub fn sample_analysis(name: &str) -> FoodAnalysisResult {
    FoodAnalysisResult {
        food_name: name.to_string(),
        macros: Macros { calories: 450.0, protein: 35.0, carbs: 40.0, fat: 15.0 },
        health_score: 8.0,
        feedback: "Good balance".into(),
        suggestions: vec!["Add greens".into()],
        ingredients: vec!["chicken".into()],
        is_valid_food: Some(true),
    }
}

/// Model transport that always returns the same text and records requests.
#[derive(Clone)]
pub struct ScriptedModel {
    reply: String,
    sent: Arc<Mutex<Vec<ModelRequest>>>,
}

impl ScriptedModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            sent: Arc::default(),
        }
    }

    pub async fn requests(&self) -> Vec<ModelRequest> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate(&self, request: ModelRequest) -> anyhow::Result<String> {
        self.sent.lock().await.push(request);
        Ok(self.reply.clone())
    }
}

/// Gateway returning canned results, or failing every call.
pub struct FakeGateway {
    pub food: FoodAnalysisResult,
    pub fail: bool,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            food: sample_analysis("Salada de Frango"),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::new() }
    }

    pub fn with_food(food: FoodAnalysisResult) -> Self {
        Self { food, ..Self::new() }
    }

    fn answer<T>(&self, value: T) -> AppResult<T> {
        if self.fail {
            return Err(AppError::generation("scripted failure"));
        }
        Ok(value)
    }
}

#[async_trait]
impl AiGateway for FakeGateway {
    async fn analyze_food_image(
        &self,
        _image_data_url: &str,
        _language: Language,
        _note: Option<&str>,
    ) -> AppResult<FoodAnalysisResult> {
        self.answer(self.food.clone())
    }

    async fn analyze_food_text(&self, description: &str, _language: Language) -> AppResult<FoodAnalysisResult> {
        self.answer(FoodAnalysisResult {
            food_name: description.to_string(),
            is_valid_food: None,
            ..self.food.clone()
        })
    }

    async fn generate_weekly_plan(
        &self,
        _profile: &UserProfile,
        _preferences: &PlanPreferences,
    ) -> AppResult<WeeklyPlanDraft> {
        self.answer(sample_draft())
    }

    async fn analyze_daily_intake(
        &self,
        _profile: &UserProfile,
        entries: &[DiaryEntry],
    ) -> AppResult<DailyAnalysisResult> {
        self.answer(DailyAnalysisResult {
            score: 7.0,
            summary: format!("{} meals logged", entries.len()),
            positives: vec![],
            negatives: vec![],
            recommendations: vec![],
        })
    }

    async fn generate_daily_plan(&self, _profile: &UserProfile) -> AppResult<DailyPlan> {
        self.answer(DailyPlan {
            summary: "Active day".into(),
            meals: vec![],
            workout: vec![],
        })
    }
}
