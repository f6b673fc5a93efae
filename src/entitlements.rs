//! Feature limits per subscription tier.
//!
//! Every gated feature asks this module; nothing else compares tier names.

use serde::Serialize;

use crate::profile::PlanType;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Entitlement {
    pub can_analyze_daily_intake: bool,
    pub pantry_photo_limit: usize,
    pub max_saved_plans: usize,
    pub recipe_access: bool,
    /// Coach feedback on analyses and the week summary of generated plans.
    pub coach_feedback: bool,
    pub daily_plan_access: bool,
}

const FREE: Entitlement = Entitlement {
    can_analyze_daily_intake: false,
    pantry_photo_limit: 0,
    max_saved_plans: 1,
    recipe_access: false,
    coach_feedback: false,
    daily_plan_access: false,
};

const INTERMEDIATE: Entitlement = Entitlement {
    can_analyze_daily_intake: false,
    pantry_photo_limit: 15,
    max_saved_plans: 1,
    recipe_access: true,
    coach_feedback: true,
    daily_plan_access: true,
};

const PREMIUM: Entitlement = Entitlement {
    can_analyze_daily_intake: true,
    pantry_photo_limit: 50,
    max_saved_plans: 4,
    recipe_access: true,
    coach_feedback: true,
    daily_plan_access: true,
};

/// Limits for a tier name. Unknown names get the free row.
pub fn entitlements_for(tier: &str) -> Entitlement {
    match PlanType::from_tier(tier) {
        PlanType::Free => FREE,
        PlanType::Intermediate => INTERMEDIATE,
        PlanType::Premium | PlanType::Annual => PREMIUM,
    }
}

/// Result of an entitlement check: go ahead, or send the user to pricing.
#[derive(Debug, Clone, PartialEq)]
pub enum Gate<T> {
    Allowed(T),
    UpgradeRequired,
}

impl<T> Gate<T> {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Gate::Allowed(_))
    }

    pub fn allowed(self) -> Option<T> {
        match self {
            Gate::Allowed(v) => Some(v),
            Gate::UpgradeRequired => None,
        }
    }
}

impl Entitlement {
    pub fn has_plan_slot(&self, saved: usize) -> bool {
        saved < self.max_saved_plans
    }

    /// Keeps the first `pantry_photo_limit` photos.
    pub fn clamp_pantry_photos<T>(&self, mut photos: Vec<T>) -> Vec<T> {
        photos.truncate(self.pantry_photo_limit);
        photos
    }
}
