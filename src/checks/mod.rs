//! Merge check modules.
//!
//! This module contains the merge checklist organized by criterion:
//! - Naming: prefixes, uid disjointness, progression length
//! - Resources: shared locations and organizations reference both systems
//! - StatusBar: status-bar configuration fields and integration hooks
//! - Lore: recorded conflicts, cross-references, bridging lore
//!
//! # Outcomes
//!
//! Every check is a pure predicate over a [`MergeView`](crate::model::MergeView):
//! - Condition holds: `CheckResult::Pass`
//! - Condition violated: `CheckResult::Fail` naming the first offender
//! - Inconclusive by nature: `CheckResult::Warn` (cross-references only)
//! - Section absent and optional: `CheckResult::Skip`, which records no line
//!
//! Checks never panic and never return errors. Missing required keys are
//! rejected before any check runs.

pub mod lore;
pub mod naming;
pub mod resources;
pub mod status_bar;

use crate::model::{ACADEMIC, ENTERTAINMENT};
use serde_json::Value;
use std::collections::BTreeSet;

/// Whether `systems` is a list of names that is exactly `{academic, entertainment}`.
///
/// Duplicates are ignored; order does not matter. Anything other than a list
/// of strings never matches.
pub fn covers_both_systems(systems: &Value) -> bool {
    let Some(items) = systems.as_array() else {
        return false;
    };
    let found: Option<BTreeSet<&str>> = items.iter().map(Value::as_str).collect();
    found.is_some_and(|found| found == BTreeSet::from([ACADEMIC, ENTERTAINMENT]))
}

/// Whether `value` names `key`, either as an object key or a list element.
pub fn contains_name(value: &Value, key: &str) -> bool {
    match value {
        Value::Object(map) => map.contains_key(key),
        Value::Array(items) => items.iter().any(|item| item.as_str() == Some(key)),
        _ => false,
    }
}
