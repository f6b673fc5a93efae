use serde::Serialize;

/// The single active screen.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Onboarding,
    Login,
    Dashboard,
    Camera,
    Recipes,
    WeeklyPlan,
    Diary,
    Premium,
    Profile,
    Legal,
}

impl View {
    pub fn requires_auth(self) -> bool {
        !matches!(self, View::Onboarding | View::Login)
    }

    /// Screens that carry the bottom navigation bar.
    pub fn shows_navbar(self) -> bool {
        !matches!(self, View::Onboarding | View::Login | View::Camera | View::Legal)
    }
}
