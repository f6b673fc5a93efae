use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entitlements::{entitlements_for, Entitlement};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
pub enum Language {
    #[default]
    #[serde(rename = "pt-PT")]
    PtPt,
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "en")]
    En,
    #[serde(rename = "es")]
    Es,
    #[serde(rename = "fr")]
    Fr,
}

impl Language {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "pt-PT" => Some(Self::PtPt),
            "pt-BR" => Some(Self::PtBr),
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            "fr" => Some(Self::Fr),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::PtPt => "pt-PT",
            Self::PtBr => "pt-BR",
            Self::En => "en",
            Self::Es => "es",
            Self::Fr => "fr",
        }
    }

    pub fn is_portuguese(self) -> bool {
        matches!(self, Self::PtPt | Self::PtBr)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    #[default]
    LoseWeight,
    GainMuscle,
    Maintain,
    Recomp,
}

impl Goal {
    pub fn as_str(self) -> &'static str {
        match self {
            Goal::LoseWeight => "lose_weight",
            Goal::GainMuscle => "gain_muscle",
            Goal::Maintain => "maintain",
            Goal::Recomp => "recomp",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    #[default]
    Moderate,
    Active,
    Athlete,
}

/// Subscription tier. Unrecognised tier strings decode as `Free`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum PlanType {
    #[default]
    Free,
    Intermediate,
    Premium,
    Annual,
}

impl PlanType {
    pub fn from_tier(tier: &str) -> Self {
        match tier {
            "intermediate" => Self::Intermediate,
            "premium" => Self::Premium,
            "annual" => Self::Annual,
            _ => Self::Free,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Intermediate => "intermediate",
            Self::Premium => "premium",
            Self::Annual => "annual",
        }
    }

    pub fn is_paid(self) -> bool {
        self != Self::Free
    }

    /// Whether a higher tier would raise any limit of this one.
    pub fn can_upgrade(self) -> bool {
        matches!(self, Self::Free | Self::Intermediate)
    }
}

impl From<String> for PlanType {
    fn from(tier: String) -> Self {
        Self::from_tier(&tier)
    }
}

/// Daily calorie and macro goals, in kcal and grams.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MacroTargets {
    pub calories: i32,
    pub protein: i32,
    pub carbs: i32,
    pub fat: i32,
}

impl Default for MacroTargets {
    fn default() -> Self {
        Self {
            calories: 2000,
            protein: 150,
            carbs: 200,
            fat: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub name: String,
    pub email: String,
    // argon2 PHC string; only ever written to users-db
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) password_hash: Option<String>,
    pub language: Language,
    pub gender: Gender,
    pub age: u32,
    pub height: f64,
    pub weight: f64,
    pub goal: Goal,
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    pub targets: MacroTargets,
    pub meals_per_day: u32,
    #[serde(default)]
    is_premium: bool,
    #[serde(default)]
    plan_type: PlanType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

impl UserProfile {
    pub(crate) fn new_account(name: String, email: String, now: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            name,
            email,
            password_hash: None,
            language: Language::default(),
            gender: Gender::default(),
            age: 0,
            height: 0.0,
            weight: 0.0,
            goal: Goal::default(),
            activity_level: ActivityLevel::default(),
            dietary_restrictions: Vec::new(),
            targets: MacroTargets::default(),
            meals_per_day: 4,
            is_premium: false,
            plan_type: PlanType::Free,
            profile_picture: None,
        }
    }

    pub fn plan_type(&self) -> PlanType {
        self.plan_type
    }

    pub fn is_premium(&self) -> bool {
        self.is_premium
    }

    /// The only way to change the tier; keeps `is_premium` in lockstep.
    pub fn set_plan_type(&mut self, plan: PlanType) {
        self.plan_type = plan;
        self.is_premium = plan.is_paid();
    }

    /// Re-derives `is_premium` from the tier after loading stored data.
    pub fn normalized(mut self) -> Self {
        self.set_plan_type(self.plan_type);
        self
    }

    pub fn entitlements(&self) -> Entitlement {
        entitlements_for(self.plan_type.as_str())
    }

    /// Copy suitable for the session blob.
    pub fn without_credentials(&self) -> Self {
        Self {
            password_hash: None,
            ..self.clone()
        }
    }

    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile::new_account("Ana Silva".into(), "ana@example.com".into(), OffsetDateTime::UNIX_EPOCH)
    }

    #[test]
    fn plan_type_unknown_tier_is_free() {
        let plan: PlanType = serde_json::from_str("\"platinum\"").unwrap();
        assert_eq!(plan, PlanType::Free);
        let plan: PlanType = serde_json::from_str("\"annual\"").unwrap();
        assert_eq!(plan, PlanType::Annual);
        assert_eq!(serde_json::to_string(&PlanType::Intermediate).unwrap(), "\"intermediate\"");
    }

    #[test]
    fn set_plan_type_keeps_premium_flag_in_lockstep() {
        let mut p = profile();
        assert!(!p.is_premium());
        p.set_plan_type(PlanType::Intermediate);
        assert!(p.is_premium());
        p.set_plan_type(PlanType::Free);
        assert!(!p.is_premium());
    }

    #[test]
    fn normalized_repairs_inconsistent_stored_flag() {
        let mut json = serde_json::to_value(profile()).unwrap();
        json["isPremium"] = serde_json::Value::Bool(true);
        json["planType"] = serde_json::Value::String("free".into());
        let loaded: UserProfile = serde_json::from_value(json).unwrap();
        assert!(loaded.is_premium());
        assert!(!loaded.normalized().is_premium());
    }

    #[test]
    fn session_copy_drops_password_hash() {
        let mut p = profile();
        p.password_hash = Some("$argon2id$...".into());
        let json = serde_json::to_string(&p.without_credentials()).unwrap();
        assert!(!json.contains("passwordHash"));
        assert!(json.contains("\"language\":\"pt-PT\""));
        assert!(json.contains("\"goal\":\"lose_weight\""));
    }

    #[test]
    fn first_name_takes_first_word() {
        assert_eq!(profile().first_name(), "Ana");
    }
}
