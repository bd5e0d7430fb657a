//! Lore checks (LORE-001 through LORE-003).
//!
//! No recorded contradictions between the systems, and content that bridges
//! them.

use super::contains_name;
use crate::model::{MergeView, SystemView, ACADEMIC, ENTERTAINMENT};
use crate::CheckResult;
use serde_json::Value;

/// Lists the `validation` section must hold, each empty.
pub const CONFLICT_LISTS: [&str; 3] = ["uidConflicts", "namingConflicts", "contradictoryLore"];

fn is_empty_list(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Array(items)) if items.is_empty())
}

/// Run LORE-001: Validation Section
///
/// Records nothing when the document carries no `validation` section.
pub fn check_validation_section(view: &MergeView<'_>) -> CheckResult {
    let Some(validation) = view.validation else {
        return CheckResult::skip("No validation section in worldbook");
    };

    let dirty: Vec<&str> = CONFLICT_LISTS
        .iter()
        .copied()
        .filter(|key| !is_empty_list(validation.get(*key)))
        .collect();

    if dirty.is_empty() {
        CheckResult::pass("No conflicts detected in validation section")
    } else {
        CheckResult::fail(
            "Conflicts detected in validation section",
            format!("not an empty list: {}", dirty.join(", ")),
        )
    }
}

/// Professions in `system` that list cross-references into `target`.
fn referencing_professions<'a>(system: &SystemView<'a>, target: &str) -> Vec<&'a str> {
    system
        .professions
        .iter()
        .filter(|(_, profession)| {
            profession
                .get("crossReferences")
                .is_some_and(|refs| contains_name(refs, target))
        })
        .map(|(id, _)| id.as_str())
        .collect()
}

/// Run LORE-002: Cross-References
///
/// Only looks for cross-references on either side; whether every reference
/// is mirrored by the other system is not checked.
pub fn check_cross_references(view: &MergeView<'_>) -> CheckResult {
    let academic = referencing_professions(&view.academic, ENTERTAINMENT);
    let entertainment = referencing_professions(&view.entertainment, ACADEMIC);

    if !academic.is_empty() || !entertainment.is_empty() {
        CheckResult::pass("Cross-references implemented between systems")
    } else {
        CheckResult::warn(
            "No cross-references found (may be intentional)",
            "no profession lists crossReferences into the other system",
        )
    }
}

/// Run LORE-003: Bridging Lore
pub fn check_bridging_lore(view: &MergeView<'_>) -> CheckResult {
    let present = view.bridging_lore.is_some_and(|lore| {
        lore.get("interactions").is_some() && lore.get("sharedQuests").is_some()
    });

    if present {
        CheckResult::pass("Bridging lore implemented for collaboration")
    } else {
        CheckResult::fail(
            "Bridging lore missing",
            "bridgingLore needs both interactions and sharedQuests",
        )
    }
}
