//! Static recipe library with a paged, filterable browser.

mod catalog;

pub use catalog::{find, Recipe, RecipeCategory, RecipeMacros, RECIPES};

use tracing::debug;

use crate::entitlements::{Entitlement, Gate};

pub const INITIAL_VISIBLE: usize = 6;
pub const LOAD_MORE_STEP: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecipeFilter {
    #[default]
    All,
    Category(RecipeCategory),
}

impl RecipeFilter {
    /// `all` or a category id; unknown ids fall back to `all`.
    pub fn from_id(id: &str) -> Self {
        RecipeCategory::from_id(id).map_or(Self::All, Self::Category)
    }

    fn matches(self, recipe: &Recipe) -> bool {
        match self {
            Self::All => true,
            Self::Category(c) => recipe.category == c,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeBrowser {
    filter: RecipeFilter,
    visible: usize,
}

impl Default for RecipeBrowser {
    fn default() -> Self {
        Self {
            filter: RecipeFilter::All,
            visible: INITIAL_VISIBLE,
        }
    }
}

impl RecipeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> RecipeFilter {
        self.filter
    }

    /// Changing the filter resets paging.
    pub fn set_filter(&mut self, filter: RecipeFilter) {
        self.filter = filter;
        self.visible = INITIAL_VISIBLE;
    }

    pub fn load_more(&mut self) {
        self.visible += LOAD_MORE_STEP;
    }

    fn matching(&self) -> impl Iterator<Item = &'static Recipe> + '_ {
        RECIPES.iter().filter(move |r| self.filter.matches(r))
    }

    pub fn visible(&self) -> Vec<&'static Recipe> {
        self.matching().take(self.visible).collect()
    }

    pub fn has_more(&self) -> bool {
        self.matching().count() > self.visible
    }
}

/// Free recipes open for everyone; premium ones need `recipe_access`.
pub fn open_recipe(id: &str, entitlement: &Entitlement) -> Option<Gate<&'static Recipe>> {
    let recipe = find(id)?;
    if recipe.is_premium && !entitlement.recipe_access {
        debug!(recipe_id = id, "premium recipe locked");
        return Some(Gate::UpgradeRequired);
    }
    Some(Gate::Allowed(recipe))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entitlements::entitlements_for;

    #[test]
    fn shows_six_then_four_more() {
        let mut browser = RecipeBrowser::new();
        assert_eq!(browser.visible().len(), 6);
        assert!(browser.has_more());
        browser.load_more();
        assert_eq!(browser.visible().len(), RECIPES.len().min(10));
        assert!(!browser.has_more());
    }

    #[test]
    fn filter_resets_paging() {
        let mut browser = RecipeBrowser::new();
        browser.load_more();
        browser.set_filter(RecipeFilter::from_id("quick"));
        let ids: Vec<_> = browser.visible().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["3", "19"]);
        browser.set_filter(RecipeFilter::All);
        assert_eq!(browser.visible().len(), INITIAL_VISIBLE);
    }

    #[test]
    fn unknown_filter_id_is_all() {
        assert_eq!(RecipeFilter::from_id("desserts"), RecipeFilter::All);
    }

    #[test]
    fn premium_recipe_needs_access() {
        assert_eq!(open_recipe("4", &entitlements_for("free")), Some(Gate::UpgradeRequired));
        assert!(open_recipe("4", &entitlements_for("intermediate")).unwrap().is_allowed());
        assert!(open_recipe("1", &entitlements_for("free")).unwrap().is_allowed());
        assert_eq!(open_recipe("404", &entitlements_for("premium")), None);
    }
}
