use serde::Deserialize;

use crate::profile::{ActivityLevel, BodyStats, Gender, Goal, Language};

/// Everything the onboarding screens collect before the account exists.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub body: Option<OnboardingBody>,
}

/// Optional body profile; when present, targets are computed from it.
#[derive(Debug, Clone, Deserialize)]
pub struct OnboardingBody {
    pub gender: Gender,
    pub stats: BodyStats,
    pub goal: Goal,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub meals_per_day: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
