use time::{macros::format_description, OffsetDateTime};

use super::types::WeeklyPlan;
use crate::ai::WeeklyPlanDraft;
use crate::clock::Clock;
use crate::entitlements::Entitlement;
use crate::profile::Language;

/// Default title for a plan saved at `at`, e.g. `Plano 19/10/2026`.
pub fn plan_title(language: Language, at: OffsetDateTime) -> String {
    let date = match language {
        Language::En => at.format(format_description!("[month]/[day]/[year]")),
        _ => at.format(format_description!("[day]/[month]/[year]")),
    }
    .unwrap_or_default();
    let prefix = if language.is_portuguese() { "Plano" } else { "Plan" };
    format!("{prefix} {date}").trim_end().to_string()
}

pub fn plan_from_draft(draft: WeeklyPlanDraft, language: Language, clock: &dyn Clock) -> WeeklyPlan {
    let now = clock.now();
    WeeklyPlan::from_draft(draft, plan_title(language, now), now)
}

/// Pantry photos picked for the planner, capped by the tier's photo limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PantrySelection {
    photos: Vec<String>,
    limit: usize,
}

impl PantrySelection {
    pub fn new(entitlement: &Entitlement) -> Self {
        Self {
            photos: Vec::new(),
            limit: entitlement.pantry_photo_limit,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.limit == 0
    }

    /// Adds photos until the limit; returns how many were taken.
    pub fn add(&mut self, photos: impl IntoIterator<Item = String>) -> usize {
        let room = self.limit.saturating_sub(self.photos.len());
        let before = self.photos.len();
        self.photos.extend(photos.into_iter().take(room));
        self.photos.len() - before
    }

    pub fn remove(&mut self, index: usize) {
        if index < self.photos.len() {
            self.photos.remove(index);
        }
    }

    /// Applies a new tier's limit, dropping photos past it.
    pub fn relimit(&mut self, entitlement: &Entitlement) {
        self.limit = entitlement.pantry_photo_limit;
        self.photos = entitlement.clamp_pantry_photos(std::mem::take(&mut self.photos));
    }

    pub fn photos(&self) -> &[String] {
        &self.photos
    }

    pub fn clear(&mut self) {
        self.photos.clear();
    }
}
