//! Check execution orchestrator.
//!
//! Manages check registration and execution against a loaded worldbook.
//!
//! # Graceful Degradation
//!
//! - Check panics: caught via std::panic::catch_unwind, converted to Fail result
//! - Empty check list: returns an empty report (not an error)
//!
//! Every registered check runs exactly once per call, in registration order.

use crate::checks::{lore, naming, resources, status_bar};
use crate::engine::result::{ResultAggregator, ValidationReport};
use crate::model::MergeView;
use crate::{Check, CheckCategory, CheckResult};
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, warn};

/// Signature every merge check implements.
pub type CheckFn = Box<dyn Fn(&MergeView<'_>) -> CheckResult + Send + Sync>;

/// A registered check with its execution function
pub struct RegisteredCheck {
    pub id: String,
    pub name: String,
    pub category: CheckCategory,
    pub description: String,
    pub check_fn: CheckFn,
}

impl RegisteredCheck {
    /// Metadata for this check without a result.
    pub fn describe(&self) -> Check {
        Check {
            id: self.id.clone(),
            name: self.name.clone(),
            category: self.category,
            description: self.description.clone(),
            result: None,
        }
    }
}

/// Check orchestrator
#[derive(Default)]
pub struct CheckOrchestrator {
    checks: Vec<RegisteredCheck>,
}

impl CheckOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register checks for execution
    pub fn register_checks(&mut self, checks: Vec<RegisteredCheck>) {
        self.checks.extend(checks);
    }

    /// Register a single check
    pub fn register_check(&mut self, check: RegisteredCheck) {
        self.checks.push(check);
    }

    /// Registered checks, in execution order
    pub fn checks(&self) -> &[RegisteredCheck] {
        &self.checks
    }

    /// Run all registered checks
    pub fn run_all(&self, view: &MergeView<'_>) -> ValidationReport {
        let start = Instant::now();
        let mut aggregator = ResultAggregator::new();

        for check in &self.checks {
            let result = self.execute_check(check, view);
            debug!(check = %check.id, outcome = %result, "check finished");

            let mut executed = check.describe();
            executed.result = Some(result);
            aggregator.add_result(executed);
        }

        aggregator.set_duration(start.elapsed().as_millis() as u64);
        aggregator.into_report()
    }

    /// Execute a single check, converting a panic into a failure
    fn execute_check(&self, check: &RegisteredCheck, view: &MergeView<'_>) -> CheckResult {
        let start = Instant::now();
        let result = panic::catch_unwind(AssertUnwindSafe(|| (check.check_fn)(view)));
        let elapsed = start.elapsed().as_millis() as u64;

        match result {
            Ok(check_result) => check_result.with_duration(elapsed),
            Err(_) => {
                warn!(check = %check.id, "check panicked");
                CheckResult::Fail {
                    message: "Check panicked during execution".to_string(),
                    details: "An unexpected error occurred".to_string(),
                    duration_ms: elapsed,
                }
            }
        }
    }
}

fn registered(
    id: &str,
    name: &str,
    category: CheckCategory,
    description: &str,
    check_fn: fn(&MergeView<'_>) -> CheckResult,
) -> RegisteredCheck {
    RegisteredCheck {
        id: id.to_string(),
        name: name.to_string(),
        category,
        description: description.to_string(),
        check_fn: Box::new(check_fn),
    }
}

/// Create all merge checks with their execution functions
pub fn create_all_checks() -> Vec<RegisteredCheck> {
    vec![
        // Criterion 1
        registered(
            "NAM-001",
            "Prefix System",
            CheckCategory::Naming,
            "Academic prefix is acad_ and entertainment prefix is ent_",
            naming::check_prefixes,
        ),
        registered(
            "NAM-002",
            "UID Conflicts",
            CheckCategory::Naming,
            "Profession uids of the two systems are disjoint",
            naming::check_uid_conflicts,
        ),
        registered(
            "NAM-003",
            "Complete Progression",
            CheckCategory::Naming,
            "Each system defines exactly 8 professions",
            naming::check_progression,
        ),
        // Criterion 2
        registered(
            "RES-001",
            "Location Accessibility",
            CheckCategory::SharedResources,
            "Every shared location is accessible by both systems",
            resources::check_locations,
        ),
        registered(
            "RES-002",
            "Organization References",
            CheckCategory::SharedResources,
            "Every shared organization oversees, serves, or includes both systems",
            resources::check_organizations,
        ),
        // Criterion 3
        registered(
            "SB-001",
            "StatusBar Configuration",
            CheckCategory::StatusBar,
            "Both statusBarConfig objects define the progress, status, level, and experience fields",
            status_bar::check_status_bar_configs,
        ),
        registered(
            "SB-002",
            "Integration Hooks",
            CheckCategory::StatusBar,
            "statusBarIntegration.hooks exposes integration_hooks",
            status_bar::check_integration_hooks,
        ),
        // Criterion 4
        registered(
            "LORE-001",
            "Validation Section",
            CheckCategory::Lore,
            "Recorded uid, naming, and lore conflict lists are empty",
            lore::check_validation_section,
        ),
        registered(
            "LORE-002",
            "Cross-References",
            CheckCategory::Lore,
            "Professions cross-reference the other system",
            lore::check_cross_references,
        ),
        registered(
            "LORE-003",
            "Bridging Lore",
            CheckCategory::Lore,
            "bridgingLore defines interactions and sharedQuests",
            lore::check_bridging_lore,
        ),
    ]
}
