use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Energy in kcal and macros in grams, as estimated for a food or summed
/// over a day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Macros {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
}

impl Add for Macros {
    type Output = Macros;

    fn add(self, rhs: Macros) -> Macros {
        Macros {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
        }
    }
}

impl std::iter::Sum for Macros {
    fn sum<I: Iterator<Item = Macros>>(iter: I) -> Macros {
        iter.fold(Macros::default(), Add::add)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodAnalysisResult {
    pub food_name: String,
    #[serde(default)]
    pub macros: Macros,
    /// 1–10; some replies use a 1–100 scale, see [`normalize_score`].
    #[serde(default)]
    pub health_score: f64,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_valid_food: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyAnalysisResult {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub positives: Vec<String>,
    #[serde(default)]
    pub negatives: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlannedMeal {
    #[serde(rename = "type")]
    pub meal_type: String,
    pub name: String,
    #[serde(default)]
    pub calories: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanDay {
    pub day: String,
    #[serde(default)]
    pub meals: Vec<PlannedMeal>,
}

/// A generated week before it is saved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPlanDraft {
    #[serde(default)]
    pub week_summary: String,
    #[serde(default)]
    pub days: Vec<PlanDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyMeal {
    #[serde(rename = "type")]
    pub meal_type: String,
    pub name: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub name: String,
    #[serde(default)]
    pub intensity: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyPlan {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub meals: Vec<DailyMeal>,
    #[serde(default)]
    pub workout: Vec<Exercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanPreferences {
    pub meals_per_day: u32,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub pantry: String,
    /// Data URLs of pantry/fridge photos.
    #[serde(default)]
    pub pantry_images: Vec<String>,
}

/// What the analyzer was given: a photo takes precedence over text.
#[derive(Debug, Clone, PartialEq)]
pub enum FoodInput {
    Image { data_url: String, note: Option<String> },
    Text(String),
}

/// Scores above 10 are on a 1–100 scale.
pub fn normalize_score(score: f64) -> f64 {
    if score > 10.0 {
        score / 10.0
    } else {
        score
    }
}
