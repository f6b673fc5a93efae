use serde::Deserialize;
use tracing::{debug, warn};

use super::targets::compute_targets;
use super::types::{Goal, MacroTargets, UserProfile};
use crate::errors::{AppError, AppResult};

pub const WEIGHT_RANGE_KG: (f64, f64) = (20.0, 300.0);
pub const HEIGHT_RANGE_CM: (f64, f64) = (50.0, 250.0);
pub const AGE_RANGE: (u32, u32) = (13, 115);

/// Biometric input as typed on the profile or onboarding screens.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct BodyStats {
    pub weight: f64,
    pub height: f64,
    pub age: u32,
}

impl BodyStats {
    pub fn validate(&self) -> AppResult<()> {
        let in_range = |v: f64, (lo, hi): (f64, f64)| v.is_finite() && v >= lo && v <= hi;
        if !in_range(self.weight, WEIGHT_RANGE_KG)
            || !in_range(self.height, HEIGHT_RANGE_CM)
            || self.age < AGE_RANGE.0
            || self.age > AGE_RANGE.1
        {
            warn!(weight = self.weight, height = self.height, age = self.age, "body stats out of range");
            return Err(AppError::validation("Invalid data"));
        }
        Ok(())
    }
}

/// Validates and stores new body stats, rewriting all four targets.
pub fn apply_stats(profile: &mut UserProfile, stats: BodyStats) -> AppResult<()> {
    stats.validate()?;
    profile.weight = stats.weight;
    profile.height = stats.height;
    profile.age = stats.age;
    profile.targets = targets_for(profile);
    Ok(())
}

impl UserProfile {
    pub fn body_stats(&self) -> BodyStats {
        BodyStats {
            weight: self.weight,
            height: self.height,
            age: self.age,
        }
    }
}

/// Stores the goal. Targets are recomputed only from stats in range; a
/// profile without usable stats keeps its current targets.
pub fn apply_goal(profile: &mut UserProfile, goal: Goal) {
    profile.goal = goal;
    if profile.body_stats().validate().is_err() {
        debug!(user_id = %profile.id, "no usable body stats; targets kept");
        return;
    }
    profile.targets = targets_for(profile);
}

/// Manual override from the goals editor; no recomputation.
pub fn apply_manual_targets(profile: &mut UserProfile, targets: MacroTargets) -> AppResult<()> {
    if targets.calories <= 0 || targets.protein < 0 || targets.carbs < 0 || targets.fat < 0 {
        return Err(AppError::validation("Invalid data"));
    }
    profile.targets = targets;
    Ok(())
}

pub fn apply_meals_per_day(profile: &mut UserProfile, meals: u32) -> AppResult<()> {
    if !(1..=8).contains(&meals) {
        return Err(AppError::validation("Invalid data"));
    }
    profile.meals_per_day = meals;
    Ok(())
}

fn targets_for(profile: &UserProfile) -> MacroTargets {
    compute_targets(profile.weight, profile.height, profile.age, profile.gender, profile.goal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::types::Gender;
    use time::OffsetDateTime;

    fn profile() -> UserProfile {
        let mut p = UserProfile::new_account("Rui".into(), "rui@example.com".into(), OffsetDateTime::UNIX_EPOCH);
        p.gender = Gender::Male;
        p.goal = Goal::Maintain;
        p
    }

    #[test]
    fn stats_boundaries() {
        assert!(BodyStats { weight: 20.0, height: 50.0, age: 13 }.validate().is_ok());
        assert!(BodyStats { weight: 300.0, height: 250.0, age: 115 }.validate().is_ok());
        assert!(BodyStats { weight: 19.9, height: 170.0, age: 30 }.validate().is_err());
        assert!(BodyStats { weight: 70.0, height: 251.0, age: 30 }.validate().is_err());
        assert!(BodyStats { weight: 70.0, height: 170.0, age: 12 }.validate().is_err());
        assert!(BodyStats { weight: f64::NAN, height: 170.0, age: 30 }.validate().is_err());
    }

    #[test]
    fn apply_stats_rewrites_targets() {
        let mut p = profile();
        apply_stats(&mut p, BodyStats { weight: 70.0, height: 175.0, age: 30 }).unwrap();
        assert_eq!(p.targets.calories, 2267);
        assert_eq!(p.targets.protein, 170);
    }

    #[test]
    fn rejected_stats_leave_profile_untouched() {
        let mut p = profile();
        let before = p.clone();
        let err = apply_stats(&mut p, BodyStats { weight: 500.0, height: 175.0, age: 30 }).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(p, before);
    }

    #[test]
    fn goal_change_recomputes_but_manual_targets_do_not() {
        let mut p = profile();
        apply_stats(&mut p, BodyStats { weight: 70.0, height: 175.0, age: 30 }).unwrap();
        apply_goal(&mut p, Goal::LoseWeight);
        assert_eq!(p.targets.calories, 1767);

        let manual = MacroTargets { calories: 1900, protein: 160, carbs: 150, fat: 70 };
        apply_manual_targets(&mut p, manual).unwrap();
        assert_eq!(p.targets, manual);
        assert_eq!(p.goal, Goal::LoseWeight);
    }

    #[test]
    fn goal_change_without_stats_keeps_targets() {
        let mut p = profile();
        let before = p.targets;
        assert_eq!(p.body_stats(), BodyStats { weight: 0.0, height: 0.0, age: 0 });
        apply_goal(&mut p, Goal::GainMuscle);
        assert_eq!(p.goal, Goal::GainMuscle);
        assert_eq!(p.targets, before);
    }
}
