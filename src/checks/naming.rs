//! Naming checks (NAM-001 through NAM-003).
//!
//! Both career systems must be fully represented with no naming or uid
//! conflicts between them.

use crate::model::MergeView;
use crate::CheckResult;
use std::collections::BTreeSet;

pub const ACADEMIC_PREFIX: &str = "acad_";
pub const ENTERTAINMENT_PREFIX: &str = "ent_";

/// Number of profession levels each career system must define.
pub const EXPECTED_LEVELS: usize = 8;

/// Run NAM-001: Prefix System
pub fn check_prefixes(view: &MergeView<'_>) -> CheckResult {
    let academic = view.academic.prefix;
    let entertainment = view.entertainment.prefix;

    if academic.as_str() == Some(ACADEMIC_PREFIX)
        && entertainment.as_str() == Some(ENTERTAINMENT_PREFIX)
    {
        CheckResult::pass("Prefix system correctly implemented")
    } else {
        CheckResult::fail(
            "Prefix system incorrectly implemented",
            format!(
                "academic={}, entertainment={}; expected {:?} and {:?}",
                academic, entertainment, ACADEMIC_PREFIX, ENTERTAINMENT_PREFIX
            ),
        )
    }
}

/// Run NAM-002: UID Conflicts
pub fn check_uid_conflicts(view: &MergeView<'_>) -> CheckResult {
    let academic: BTreeSet<_> = view.academic.uids().collect();
    let entertainment: BTreeSet<_> = view.entertainment.uids().collect();

    let shared: Vec<&str> = academic
        .intersection(&entertainment)
        .map(|uid| uid.as_ref())
        .collect();

    if shared.is_empty() {
        CheckResult::pass("No UID conflicts between systems")
    } else {
        CheckResult::fail(
            "UID conflicts detected",
            format!("uids used by both systems: {}", shared.join(", ")),
        )
    }
}

/// Run NAM-003: Complete Progression
pub fn check_progression(view: &MergeView<'_>) -> CheckResult {
    let academic = view.academic.professions.len();
    let entertainment = view.entertainment.professions.len();

    if academic == EXPECTED_LEVELS && entertainment == EXPECTED_LEVELS {
        CheckResult::pass(format!(
            "Both systems have complete {}-level progression",
            EXPECTED_LEVELS
        ))
    } else {
        CheckResult::fail(
            format!(
                "Incomplete progression: Academic={}, Entertainment={}",
                academic, entertainment
            ),
            format!("each system needs exactly {} professions", EXPECTED_LEVELS),
        )
    }
}
