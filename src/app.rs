use serde::Serialize;
use tracing::info;

use crate::controller::{Controller, View};
use crate::diary::DashboardSummary;
use crate::profile::Language;
use crate::state::AppState;

pub fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "foodai=debug".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

/// What the binary reports after restoring state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartupReport {
    pub view: View,
    pub language: Language,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<DashboardSummary>,
}

pub async fn run(state: AppState) -> anyhow::Result<StartupReport> {
    let controller = Controller::start(state).await;
    let report = StartupReport {
        view: controller.active_view(),
        language: controller.language(),
        dashboard: controller.dashboard(),
    };
    info!(view = ?report.view, language = report.language.code(), "controller ready");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::MemoryStore;
    use crate::testing::FakeGateway;

    #[tokio::test]
    async fn fresh_store_reports_onboarding() {
        let state = AppState::fake(MemoryStore::new(), Arc::new(FakeGateway::new()));
        let report = run(state).await.unwrap();
        assert_eq!(report.view, View::Onboarding);
        assert!(report.dashboard.is_none());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["view"], "onboarding");
        assert_eq!(json["language"], "pt-PT");
    }
}
