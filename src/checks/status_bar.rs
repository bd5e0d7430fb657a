//! StatusBar checks (SB-001, SB-002).

use super::contains_name;
use crate::model::{MergeView, SystemView};
use crate::CheckResult;

/// Fields every career system's `statusBarConfig` must define.
pub const REQUIRED_STATUS_FIELDS: [&str; 4] =
    ["progressField", "statusField", "levelField", "experienceField"];

/// Hook the status-bar integration must expose.
pub const INTEGRATION_HOOK: &str = "integration_hooks";

fn missing_fields(system: &SystemView<'_>) -> Vec<String> {
    REQUIRED_STATUS_FIELDS
        .iter()
        .filter(|field| !contains_name(system.status_bar_config, field))
        .map(|field| format!("{}.{}", system.name, field))
        .collect()
}

/// Run SB-001: StatusBar Configuration
pub fn check_status_bar_configs(view: &MergeView<'_>) -> CheckResult {
    let mut missing = missing_fields(&view.academic);
    missing.extend(missing_fields(&view.entertainment));

    if missing.is_empty() {
        CheckResult::pass("StatusBar configs complete for both systems")
    } else {
        CheckResult::fail(
            "StatusBar config issues detected",
            format!("missing fields: {}", missing.join(", ")),
        )
    }
}

/// Run SB-002: Integration Hooks
pub fn check_integration_hooks(view: &MergeView<'_>) -> CheckResult {
    let hooked = view
        .status_bar_integration
        .get("hooks")
        .is_some_and(|hooks| contains_name(hooks, INTEGRATION_HOOK));

    if hooked {
        CheckResult::pass("Integration hooks prepared for StatusBar implementation")
    } else {
        CheckResult::fail(
            "Integration hooks missing",
            format!("statusBarIntegration.hooks has no '{}'", INTEGRATION_HOOK),
        )
    }
}
