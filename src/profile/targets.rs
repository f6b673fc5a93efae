//! Daily calorie and macro targets.
//!
//! Mifflin-St Jeor resting energy with a fixed 1.375 activity factor, a
//! goal adjustment, then a 30/40/30 protein/carb/fat split of the calories.
//! Inputs are not range-checked here; see [`super::services::BodyStats`].

use super::types::{Gender, Goal, MacroTargets};

const ACTIVITY_FACTOR: f64 = 1.375;
const LOSE_WEIGHT_DEFICIT: f64 = 500.0;
const GAIN_MUSCLE_SURPLUS: f64 = 300.0;

const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

pub fn basal_metabolic_rate(weight_kg: f64, height_cm: f64, age: f64, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age;
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female | Gender::Other => base - 161.0,
    }
}

pub fn compute_targets(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    gender: Gender,
    goal: Goal,
) -> MacroTargets {
    let mut tdee = basal_metabolic_rate(weight_kg, height_cm, f64::from(age), gender) * ACTIVITY_FACTOR;
    match goal {
        Goal::LoseWeight => tdee -= LOSE_WEIGHT_DEFICIT,
        Goal::GainMuscle => tdee += GAIN_MUSCLE_SURPLUS,
        Goal::Maintain | Goal::Recomp => {}
    }

    let calories = round_half_up(tdee);
    let kcal = calories as f64;
    MacroTargets {
        calories,
        protein: round_half_up(kcal * 0.30 / KCAL_PER_G_PROTEIN),
        carbs: round_half_up(kcal * 0.40 / KCAL_PER_G_CARBS),
        fat: round_half_up(kcal * 0.30 / KCAL_PER_G_FAT),
    }
}

// Halves round toward +inf; `as` saturates, so absurd inputs cannot panic.
fn round_half_up(x: f64) -> i32 {
    (x + 0.5).floor() as i32
}
