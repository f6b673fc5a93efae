use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use super::types::{DiaryEntry, MealType};
use crate::ai::{FoodAnalysisResult, Macros};
use crate::clock::{day_key, Clock};
use crate::profile::UserProfile;

/// Diary entry for an accepted analysis, dated to the local day.
pub fn entry_from_analysis(
    analysis: &FoodAnalysisResult,
    meal_type: MealType,
    image: Option<String>,
    clock: &dyn Clock,
) -> DiaryEntry {
    let now = clock.now();
    DiaryEntry {
        id: Uuid::new_v4(),
        date: day_key(now.date()),
        timestamp: now,
        food_name: analysis.food_name.clone(),
        meal_type,
        macros: analysis.macros,
        image,
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DayGroup {
    pub date: String,
    pub entries: Vec<DiaryEntry>,
    pub total_calories: f64,
}

/// Entries grouped by day, newest day first; entries keep diary order.
pub fn group_by_day(entries: &[DiaryEntry]) -> Vec<DayGroup> {
    let mut days: BTreeMap<&str, Vec<DiaryEntry>> = BTreeMap::new();
    for e in entries {
        days.entry(e.date.as_str()).or_default().push(e.clone());
    }
    days.into_iter()
        .rev()
        .map(|(date, entries)| DayGroup {
            date: date.to_string(),
            total_calories: entries.iter().map(|e| e.macros.calories).sum(),
            entries,
        })
        .collect()
}

pub fn entries_on<'a>(entries: &'a [DiaryEntry], date: &str) -> Vec<&'a DiaryEntry> {
    entries.iter().filter(|e| e.date == date).collect()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub greeting_name: String,
    pub date: String,
    pub consumed: Macros,
    pub remaining_calories: f64,
    pub targets: crate::profile::MacroTargets,
    pub entries: Vec<DiaryEntry>,
    pub show_upsell: bool,
}

pub fn dashboard_summary(profile: &UserProfile, entries: &[DiaryEntry], today: &str) -> DashboardSummary {
    let todays: Vec<DiaryEntry> = entries_on(entries, today).into_iter().cloned().collect();
    let consumed: Macros = todays.iter().map(|e| e.macros).sum();
    DashboardSummary {
        greeting_name: profile.first_name().to_string(),
        date: today.to_string(),
        consumed,
        remaining_calories: (f64::from(profile.targets.calories) - consumed.calories).max(0.0),
        targets: profile.targets,
        entries: todays,
        show_upsell: !profile.is_premium(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{entry_on, fixed_clock, sample_profile};

    #[test]
    fn entry_takes_local_day_and_analysis_macros() {
        let analysis = FoodAnalysisResult {
            food_name: "Bacalhau".into(),
            macros: Macros { calories: 540.0, protein: 40.0, carbs: 35.0, fat: 22.0 },
            health_score: 7.0,
            feedback: String::new(),
            suggestions: vec![],
            ingredients: vec![],
            is_valid_food: Some(true),
        };
        let clock = fixed_clock();
        let e = entry_from_analysis(&analysis, MealType::Dinner, None, clock.as_ref());
        assert_eq!(e.date, clock.today());
        assert_eq!(e.macros.calories, 540.0);
        assert_eq!(e.meal_type, MealType::Dinner);
    }

    #[test]
    fn groups_newest_day_first_with_totals() {
        let entries = vec![
            entry_on("2026-10-19", "C", 300.0),
            entry_on("2026-10-17", "A", 100.0),
            entry_on("2026-10-19", "B", 250.0),
        ];
        let groups = group_by_day(&entries);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, "2026-10-19");
        assert_eq!(groups[0].total_calories, 550.0);
        assert_eq!(groups[0].entries[0].food_name, "C");
        assert_eq!(groups[1].date, "2026-10-17");
    }

    #[test]
    fn dashboard_counts_only_today_and_floors_remaining() {
        let mut profile = sample_profile();
        profile.targets.calories = 500;
        let entries = vec![
            entry_on("2026-10-19", "Lunch", 450.0),
            entry_on("2026-10-19", "Snack", 200.0),
            entry_on("2026-10-18", "Old", 900.0),
        ];
        let s = dashboard_summary(&profile, &entries, "2026-10-19");
        assert_eq!(s.consumed.calories, 650.0);
        assert_eq!(s.remaining_calories, 0.0);
        assert_eq!(s.entries.len(), 2);
        assert!(s.show_upsell);
    }
}
