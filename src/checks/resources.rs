//! Shared resource checks (RES-001, RES-002).
//!
//! Every shared location and organization must be tied to both career
//! systems.

use super::covers_both_systems;
use crate::model::MergeView;
use crate::CheckResult;
use serde_json::Value;

/// Keys tying an organization to career systems.
pub const RELATION_KEYS: [&str; 3] = ["oversees", "serves", "includes"];

/// Relation keys present on `organization`, with their values.
fn relations(organization: &Value) -> Vec<(&'static str, &Value)> {
    RELATION_KEYS
        .iter()
        .filter_map(|key| organization.get(*key).map(|systems| (*key, systems)))
        .collect()
}

/// Run RES-001: Location Accessibility
pub fn check_locations(view: &MergeView<'_>) -> CheckResult {
    for (id, location) in view.locations {
        let problem = match location.get("accessibleBy") {
            None => Some("has no accessibleBy list".to_string()),
            Some(systems) if !covers_both_systems(systems) => {
                Some(format!("is accessible by {}", systems))
            }
            Some(_) => None,
        };

        if let Some(problem) = problem {
            return CheckResult::fail(
                "Location accessibility issues detected",
                format!("location '{}' {}", id, problem),
            );
        }
    }

    CheckResult::pass("All locations accessible by both systems")
}

/// Run RES-002: Organization References
pub fn check_organizations(view: &MergeView<'_>) -> CheckResult {
    for (id, organization) in view.organizations {
        let present = relations(organization);

        if present.is_empty() {
            return CheckResult::fail(
                "Organization reference issues detected",
                format!("organization '{}' has none of oversees/serves/includes", id),
            );
        }

        if let Some((key, systems)) = present
            .into_iter()
            .find(|(_, systems)| !covers_both_systems(systems))
        {
            return CheckResult::fail(
                "Organization reference issues detected",
                format!("organization '{}' {} {}", id, key, systems),
            );
        }
    }

    CheckResult::pass("All organizations reference both systems")
}
