//! Result aggregation and reporting.
//!
//! Collects check results and applies the pass-ratio rule that decides the
//! overall outcome of a merge check.

use crate::{Check, CheckCategory, CheckResult, DEFAULT_PASS_THRESHOLD_PCT};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Result summary statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSummary {
    pub passed: u32,
    pub warned: u32,
    pub failed: u32,
    pub skipped: u32,
    pub total: u32,
    pub total_duration_ms: u64,
}

impl ResultSummary {
    /// Summarize a set of executed checks.
    pub fn from_checks(checks: &[Check]) -> Self {
        let mut summary = ResultSummary::default();

        for check in checks {
            summary.total += 1;

            match &check.result {
                Some(CheckResult::Pass { duration_ms, .. }) => {
                    summary.passed += 1;
                    summary.total_duration_ms += duration_ms;
                }
                Some(CheckResult::Warn { duration_ms, .. }) => {
                    summary.warned += 1;
                    summary.total_duration_ms += duration_ms;
                }
                Some(CheckResult::Fail { duration_ms, .. }) => {
                    summary.failed += 1;
                    summary.total_duration_ms += duration_ms;
                }
                Some(CheckResult::Skip { .. }) | None => {
                    summary.skipped += 1;
                }
            }
        }

        summary
    }

    /// Line items that count toward the pass ratio.
    pub fn recorded(&self) -> u32 {
        self.passed + self.warned + self.failed
    }

    /// Whether at least `threshold_pct` percent of recorded items passed.
    pub fn meets_threshold(&self, threshold_pct: u32) -> bool {
        u64::from(self.passed) * 100 >= u64::from(self.recorded()) * u64::from(threshold_pct)
    }

    /// Passing share of recorded items, in percent (100 when nothing was recorded).
    pub fn pass_percentage(&self) -> f64 {
        let recorded = self.recorded();
        if recorded == 0 {
            100.0
        } else {
            f64::from(self.passed) * 100.0 / f64::from(recorded)
        }
    }
}

/// Merge check report containing all check results
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub timestamp: DateTime<Utc>,
    /// Document the checks ran against
    pub source: PathBuf,
    pub checks: Vec<Check>,
    pub total_duration_ms: u64,
    pub pass_threshold_pct: u32,
}

impl ValidationReport {
    /// Create a new empty report
    pub fn new() -> Self {
        ValidationReport {
            timestamp: Utc::now(),
            source: PathBuf::from(crate::WORLDBOOK_FILE),
            checks: Vec::new(),
            total_duration_ms: 0,
            pass_threshold_pct: DEFAULT_PASS_THRESHOLD_PCT,
        }
    }

    /// Calculate summary statistics
    pub fn summary(&self) -> ResultSummary {
        ResultSummary::from_checks(&self.checks)
    }

    /// Overall outcome under the report's pass threshold.
    pub fn is_success(&self) -> bool {
        self.summary().meets_threshold(self.pass_threshold_pct)
    }

    /// Checks belonging to one criterion, in execution order.
    pub fn by_category(&self, category: CheckCategory) -> Vec<&Check> {
        self.checks.iter().filter(|c| c.category == category).collect()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Result aggregator for collecting check results
#[derive(Debug, Default)]
pub struct ResultAggregator {
    checks: Vec<Check>,
    total_duration_ms: u64,
}

impl ResultAggregator {
    /// Create a new result aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Set total wall-clock time for the run
    pub fn set_duration(&mut self, total_duration_ms: u64) {
        self.total_duration_ms = total_duration_ms;
    }

    /// Add a completed check result
    pub fn add_result(&mut self, check: Check) {
        self.checks.push(check);
    }

    /// Create final validation report
    pub fn into_report(self) -> ValidationReport {
        ValidationReport {
            checks: self.checks,
            total_duration_ms: self.total_duration_ms,
            ..ValidationReport::new()
        }
    }
}
