use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Value};

use super::types::PlanPreferences;
use crate::diary::DiaryEntry;
use crate::profile::{Language, UserProfile};

pub fn language_context(lang: Language) -> &'static str {
    match lang {
        Language::PtPt => "European Portuguese (Portugal)",
        Language::PtBr => "Brazilian Portuguese (Brazil)",
        Language::En => "English",
        Language::Es => "Spanish (Español)",
        Language::Fr => "French (Français)",
    }
}

/// Raw base64 payload of a `data:image/...;base64,` URL. Other input is
/// returned unchanged.
pub fn strip_data_url(image: &str) -> &str {
    lazy_static! {
        static ref DATA_URL_RE: Regex =
            Regex::new(r"^data:image/(png|jpg|jpeg|webp);base64,").unwrap();
    }
    match DATA_URL_RE.find(image) {
        Some(m) => &image[m.end()..],
        None => image,
    }
}

fn restrictions(profile: &UserProfile) -> String {
    if profile.dietary_restrictions.is_empty() {
        "None".into()
    } else {
        profile.dietary_restrictions.join(", ")
    }
}

pub fn food_image_prompt(lang: Language, note: Option<&str>) -> String {
    let ctx = language_context(lang);
    let note = note
        .filter(|n| !n.trim().is_empty())
        .map(|n| format!("User note: {n}"))
        .unwrap_or_default();
    format!(
        "You are a friendly nutrition coach. You MUST respond exclusively in {ctx}.\n\
         Translate every field of the JSON to {ctx}.\n\
         Analyze this meal. {note}."
    )
}

pub fn food_text_prompt(lang: Language, description: &str) -> String {
    let ctx = language_context(lang);
    format!(
        "You are a friendly nutrition coach. You MUST respond exclusively in {ctx}.\n\
         Translate every field of the JSON output to {ctx}.\n\
         Analyze the following food description: \"{description}\"."
    )
}

pub fn weekly_plan_prompt(profile: &UserProfile, prefs: &PlanPreferences) -> String {
    let ctx = language_context(profile.language);
    let t = &profile.targets;
    let pantry_hint = if prefs.pantry_images.is_empty() {
        ""
    } else {
        "IMPORTANT: Prioritize using ingredients identified in the provided pantry/fridge images."
    };
    format!(
        "You are a nutritionist. You MUST respond ONLY in {ctx}.\n\
         Create a weekly meal plan (7 days) for the goal: {goal}.\n\
         All text fields in the JSON response must be in {ctx}.\n\n\
         NUTRITIONAL TARGETS:\n\
         - Calories: {cal} kcal\n\
         - Protein: {p}g\n\
         - Carbs: {c}g\n\
         - Fat: {f}g\n\n\
         User Info: {age} years, {weight}kg, restrictions: {restr}.\n\
         Preferences: {meals} meals/day, Budget: {budget}, Available in pantry: {pantry}.\n\
         {pantry_hint}",
        goal = profile.goal.as_str(),
        cal = t.calories,
        p = t.protein,
        c = t.carbs,
        f = t.fat,
        age = profile.age,
        weight = profile.weight,
        restr = restrictions(profile),
        meals = prefs.meals_per_day,
        budget = prefs.budget,
        pantry = prefs.pantry,
    )
}

pub fn daily_intake_prompt(profile: &UserProfile, entries: &[DiaryEntry]) -> String {
    let ctx = language_context(profile.language);
    let log = entries
        .iter()
        .map(|e| format!("{}: {} ({}kcal)", e.meal_type, e.food_name, e.macros.calories))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Act as a nutrition coach. You MUST respond exclusively in {ctx}.\n\
         Review the following food log for today and provide feedback in JSON.\n\
         Entries: {log}.\n\
         Goals: {goal}, Targets: {cal}kcal.",
        goal = profile.goal.as_str(),
        cal = profile.targets.calories,
    )
}

pub fn daily_plan_prompt(profile: &UserProfile) -> String {
    let ctx = language_context(profile.language);
    let t = &profile.targets;
    format!(
        "You are a professional nutrition and fitness coach. You MUST respond exclusively in {ctx}.\n\
         Create a detailed daily plan (meals and workout) based on the user profile below.\n\
         Translate every field of the JSON output to {ctx}.\n\n\
         USER PROFILE:\n\
         - Goal: {goal}\n\
         - Daily Targets: {cal} kcal, {p}g protein, {c}g carbs, {f}g fat\n\
         - Age: {age}, Weight: {weight}kg, Height: {height}cm\n\
         - Restrictions: {restr}",
        goal = profile.goal.as_str(),
        cal = t.calories,
        p = t.protein,
        c = t.carbs,
        f = t.fat,
        age = profile.age,
        weight = profile.weight,
        height = profile.height,
        restr = restrictions(profile),
    )
}

pub fn food_analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "isValidFood": { "type": "BOOLEAN" },
            "foodName": { "type": "STRING" },
            "macros": {
                "type": "OBJECT",
                "properties": {
                    "calories": { "type": "NUMBER" },
                    "protein": { "type": "NUMBER" },
                    "carbs": { "type": "NUMBER" },
                    "fat": { "type": "NUMBER" }
                }
            },
            "healthScore": { "type": "NUMBER" },
            "feedback": { "type": "STRING" },
            "suggestions": { "type": "ARRAY", "items": { "type": "STRING" } },
            "ingredients": { "type": "ARRAY", "items": { "type": "STRING" } }
        }
    })
}

pub fn weekly_plan_schema(lang: Language) -> Value {
    let ctx = language_context(lang);
    json!({
        "type": "OBJECT",
        "properties": {
            "weekSummary": { "type": "STRING", "description": format!("A short summary in {ctx}") },
            "days": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "day": { "type": "STRING", "description": format!("Day name in {ctx}") },
                        "meals": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "type": { "type": "STRING", "description": format!("Meal type name in {ctx}") },
                                    "name": { "type": "STRING", "description": format!("Meal name in {ctx}") },
                                    "calories": { "type": "NUMBER" }
                                }
                            }
                        }
                    }
                }
            }
        }
    })
}

pub fn daily_analysis_schema() -> Value {
    let list = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
    json!({
        "type": "OBJECT",
        "properties": {
            "score": { "type": "NUMBER" },
            "summary": { "type": "STRING" },
            "positives": list.clone(),
            "negatives": list.clone(),
            "recommendations": list
        }
    })
}

pub fn daily_plan_schema(lang: Language) -> Value {
    let ctx = language_context(lang);
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING", "description": format!("Brief summary of the day's focus in {ctx}") },
            "meals": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "type": { "type": "STRING", "description": format!("Meal type (e.g., Breakfast, Lunch) in {ctx}") },
                        "name": { "type": "STRING", "description": format!("Meal name in {ctx}") },
                        "calories": { "type": "NUMBER" },
                        "description": { "type": "STRING", "description": format!("Brief description of the meal in {ctx}") }
                    }
                }
            },
            "workout": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING", "description": format!("Exercise name in {ctx}") },
                        "intensity": { "type": "STRING", "description": format!("Intensity level in {ctx}") },
                        "duration": { "type": "STRING", "description": format!("Duration (e.g., 10 min) in {ctx}") },
                        "description": { "type": "STRING", "description": format!("Short instruction/description in {ctx}") }
                    }
                }
            }
        }
    })
}
