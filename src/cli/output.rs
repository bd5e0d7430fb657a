//! Terminal output for merge check reports.
//!
//! # Graceful Degradation
//!
//! - Non-TTY output: color disabled via NO_COLOR or --no-color
//! - Empty reports: produces a valid report with zero checks
//!
//! The formatter produces output for any ValidationReport input and never panics.

use crate::engine::result::ValidationReport;
use crate::{CheckCategory, CheckResult};

const RULE: &str = "============================================================";

/// Trait for merge report formatters
pub trait OutputFormatter {
    /// Format a validation report into a string
    fn format(&self, report: &ValidationReport) -> String;
}

/// Terminal (human-readable) formatter
pub struct TerminalFormatter {
    color: bool,
    verbose: bool,
    quiet: bool,
}

impl TerminalFormatter {
    pub fn new(color: bool, verbose: bool, quiet: bool) -> Self {
        TerminalFormatter {
            color,
            verbose,
            quiet,
        }
    }

    fn colorize(&self, text: &str, color_code: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", color_code, text)
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.colorize(text, "32")
    }

    fn yellow(&self, text: &str) -> String {
        self.colorize(text, "33")
    }

    fn red(&self, text: &str) -> String {
        self.colorize(text, "31")
    }

    fn gray(&self, text: &str) -> String {
        self.colorize(text, "90")
    }

    fn is_hidden(&self, result: &Option<CheckResult>) -> bool {
        self.quiet
            && matches!(
                result,
                Some(CheckResult::Pass { .. }) | Some(CheckResult::Skip { .. }) | None
            )
    }

    fn line(&self, result: &Option<CheckResult>) -> (String, String) {
        match result {
            Some(CheckResult::Pass { message, duration_ms }) => {
                let msg = if self.verbose {
                    format!("{} ({}ms)", message, duration_ms)
                } else {
                    message.clone()
                };
                (self.green("[PASS]"), msg)
            }
            Some(CheckResult::Warn { message, details, duration_ms }) => {
                let msg = if self.verbose {
                    format!("{} - {} ({}ms)", message, details, duration_ms)
                } else {
                    message.clone()
                };
                (self.yellow("[WARN]"), msg)
            }
            Some(CheckResult::Fail { message, details, duration_ms }) => {
                let msg = if self.verbose {
                    format!("{} - {} ({}ms)", message, details, duration_ms)
                } else {
                    message.clone()
                };
                (self.red("[FAIL]"), msg)
            }
            Some(CheckResult::Skip { reason }) => (self.gray("[SKIP]"), reason.clone()),
            None => (self.gray("[----]"), "Not executed".to_string()),
        }
    }
}

impl OutputFormatter for TerminalFormatter {
    fn format(&self, report: &ValidationReport) -> String {
        let mut output = String::new();

        output.push_str(RULE);
        output.push('\n');
        output.push_str("VALIDATION RESULTS\n");
        output.push_str(&format!("Source: {}\n", report.source.display()));
        output.push_str(&format!(
            "Timestamp: {}\n",
            report.timestamp.format("%Y-%m-%dT%H:%M:%SZ")
        ));
        output.push_str(RULE);
        output.push_str("\n\n");

        for category in CheckCategory::ALL {
            let checks: Vec<_> = report
                .by_category(category)
                .into_iter()
                .filter(|c| !self.is_hidden(&c.result))
                .collect();

            if checks.is_empty() {
                continue;
            }

            output.push_str(&format!(
                "Criteria {}: {}\n",
                category.criterion(),
                category.heading()
            ));

            for check in checks {
                let (status, message) = self.line(&check.result);
                output.push_str(&format!("  {} {} {}\n", status, check.id, message));
            }

            output.push('\n');
        }

        let summary = report.summary();
        output.push_str(RULE);
        output.push('\n');
        output.push_str(&format!(
            "Overall: {}/{} checks passed ({:.1}%, {}% required)\n",
            summary.passed,
            summary.recorded(),
            summary.pass_percentage(),
            report.pass_threshold_pct
        ));
        if self.verbose {
            output.push_str(&format!(
                "{} warnings, {} failed, {} not applicable, {}ms\n",
                summary.warned, summary.failed, summary.skipped, report.total_duration_ms
            ));
        }

        if report.is_success() {
            output.push_str(&self.green("CAREER SYSTEMS MERGE VALIDATION SUCCESSFUL!"));
        } else {
            output.push_str(&self.red("CAREER SYSTEMS MERGE VALIDATION FAILED!"));
        }

        output
    }
}
