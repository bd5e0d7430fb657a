//! Audit report rendering.
//!
//! Each report is written twice: once under a timestamped name and once as
//! `validation-report-latest.<ext>`, overwriting the previous run.

use crate::commands::audit::{AuditResults, Finding, Severity, Statistics};
use crate::WorldbookError;
use chrono::SecondsFormat;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Which report files an audit writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Markdown,
    Both,
}

impl ReportFormat {
    /// Parse a format name, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "json" => Some(ReportFormat::Json),
            "markdown" => Some(ReportFormat::Markdown),
            "both" => Some(ReportFormat::Both),
            _ => None,
        }
    }

    fn writers(self) -> Vec<Box<dyn ReportWriter>> {
        let json: Box<dyn ReportWriter> = Box::new(JsonReport);
        let markdown: Box<dyn ReportWriter> = Box::new(MarkdownReport);
        match self {
            ReportFormat::Json => vec![json],
            ReportFormat::Markdown => vec![markdown],
            ReportFormat::Both => vec![json, markdown],
        }
    }
}

/// Renders audit results into one report file format.
pub trait ReportWriter {
    /// File extension without the dot
    fn extension(&self) -> &'static str;

    fn render(&self, results: &AuditResults) -> Result<String, WorldbookError>;
}

/// Machine-readable report
pub struct JsonReport;

/// Human-readable report
pub struct MarkdownReport;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    total_errors: usize,
    total_warnings: usize,
    total_info: usize,
    has_circular_references: bool,
    #[serde(rename = "hasDuplicateUIDs")]
    has_duplicate_uids: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonDocument<'a> {
    timestamp: String,
    summary: JsonSummary,
    statistics: &'a Statistics,
    errors: &'a [Finding],
    warnings: &'a [Finding],
    info: &'a [Finding],
    recursion_findings: &'a [Finding],
    trigger_summary: &'a [Finding],
    schema_validation: &'a [Finding],
}

fn timestamp(results: &AuditResults) -> String {
    results.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl ReportWriter for JsonReport {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, results: &AuditResults) -> Result<String, WorldbookError> {
        let document = JsonDocument {
            timestamp: timestamp(results),
            summary: JsonSummary {
                total_errors: results.critical_errors.len(),
                total_warnings: results.warnings.len(),
                total_info: results.info.len(),
                has_circular_references: results.statistics.circular_references > 0,
                has_duplicate_uids: results.statistics.duplicate_uids > 0,
            },
            statistics: &results.statistics,
            errors: &results.critical_errors,
            warnings: &results.warnings,
            info: &results.info,
            recursion_findings: &results.recursion_findings,
            trigger_summary: &results.trigger_summary,
            schema_validation: &results.schema_validation,
        };

        serde_json::to_string_pretty(&document).map_err(|source| WorldbookError::Report { source })
    }
}

impl MarkdownReport {
    fn push_recursion(lines: &mut Vec<String>, findings: &[Finding]) {
        if findings.is_empty() {
            return;
        }
        lines.push("## Recursion & Circular Reference Analysis\n".to_string());

        let circular: Vec<_> = findings
            .iter()
            .filter(|f| f.severity == Some(Severity::Critical))
            .collect();
        let broken: Vec<_> = findings
            .iter()
            .filter(|f| f.severity == Some(Severity::Error))
            .collect();
        let valid: Vec<_> = findings.iter().filter(|f| f.code == "VALID_CHAIN").collect();

        if !circular.is_empty() {
            lines.push("### Circular References (CRITICAL)\n".to_string());
            for finding in circular {
                lines.push(format!(
                    "- **{}:** {}",
                    finding.system.as_deref().unwrap_or("unknown"),
                    finding.message
                ));
                if !finding.chain.is_empty() {
                    lines.push(format!("  - Chain: {}", finding.chain.join(" → ")));
                }
            }
            lines.push(String::new());
        }

        if !broken.is_empty() {
            lines.push("### Broken References\n".to_string());
            for finding in broken {
                lines.push(format!("- {}", finding.message));
            }
            lines.push(String::new());
        }

        if !valid.is_empty() {
            lines.push("### Valid Profession Chains\n".to_string());
            for finding in valid {
                if let (Some(first), Some(last)) = (finding.chain.first(), finding.chain.last()) {
                    lines.push(format!(
                        "- **{}** ({} professions): {} → ... → {}",
                        finding.system.as_deref().unwrap_or("unknown"),
                        finding.chain.len(),
                        first,
                        last
                    ));
                }
            }
            lines.push(String::new());
        }
    }

    fn push_triggers(lines: &mut Vec<String>, findings: &[Finding]) {
        if findings.is_empty() {
            return;
        }
        lines.push("## Trigger Diagnostics\n".to_string());

        let duplicates: Vec<_> = findings.iter().filter(|f| f.code.contains("DUPLICATE")).collect();
        let regex_errors: Vec<_> = findings.iter().filter(|f| f.code == "INVALID_REGEX").collect();
        let conflicts: Vec<_> = findings.iter().filter(|f| f.code.contains("CONFLICT")).collect();

        if !duplicates.is_empty() {
            lines.push("### Duplicate Triggers\n".to_string());
            for dup in duplicates {
                lines.push(format!(
                    "- \"{}\" found in entries: {}",
                    dup.pattern.as_deref().unwrap_or_default(),
                    dup.related.join(", ")
                ));
            }
            lines.push(String::new());
        }

        if !regex_errors.is_empty() {
            lines.push("### Invalid Regex Patterns\n".to_string());
            for err in regex_errors {
                lines.push(format!(
                    "- Entry {}: \"{}\" - {}",
                    err.subject.as_deref().unwrap_or_default(),
                    err.pattern.as_deref().unwrap_or_default(),
                    err.error.as_deref().unwrap_or_default()
                ));
            }
            lines.push(String::new());
        }

        if !conflicts.is_empty() {
            lines.push("### Activation Conflicts\n".to_string());
            for conflict in conflicts {
                lines.push(format!("- {}", conflict.message));
            }
            lines.push(String::new());
        }
    }
}

impl ReportWriter for MarkdownReport {
    fn extension(&self) -> &'static str {
        "md"
    }

    fn render(&self, results: &AuditResults) -> Result<String, WorldbookError> {
        let stats = &results.statistics;
        let mut lines = vec![
            "# Worldbook Validation Report\n".to_string(),
            format!("**Generated:** {}\n", timestamp(results)),
            "---\n".to_string(),
            "## Summary\n".to_string(),
            format!("- **Total Errors:** {}", results.critical_errors.len()),
            format!("- **Total Warnings:** {}", results.warnings.len()),
            format!("- **Total Info:** {}", results.info.len()),
            format!(
                "- **Status:** {}\n",
                if results.has_critical_errors() { "❌ FAIL" } else { "✅ PASS" }
            ),
            "## Statistics\n".to_string(),
            format!("- **Total Professions:** {}", stats.total_professions),
            format!("- **Total Shared Resources:** {}", stats.total_shared_resources),
            format!("- **Total Bridging Lore:** {}", stats.total_bridging_lore),
            format!("- **Total Entries:** {}", stats.total_entries),
            format!("- **Circular References:** {}", stats.circular_references),
            format!("- **Duplicate UIDs:** {}\n", stats.duplicate_uids),
            "## Critical Errors\n".to_string(),
        ];

        if results.critical_errors.is_empty() {
            lines.push("✅ No critical errors found.\n".to_string());
        }
        for (index, error) in results.critical_errors.iter().enumerate() {
            lines.push(format!("### Error {}: {}\n", index + 1, error.code));
            lines.push(format!("**Message:** {}\n", error.message));
            if !error.chain.is_empty() {
                lines.push(format!("**Chain:** {}\n", error.chain.join(" -> ")));
            }
            if let Some(system) = &error.system {
                lines.push(format!("**System:** {}\n", system));
            }
        }

        if !results.warnings.is_empty() {
            lines.push("## Warnings\n".to_string());
            for (index, warning) in results.warnings.iter().enumerate() {
                lines.push(format!("{}. **{}:** {}", index + 1, warning.code, warning.message));
            }
            lines.push(String::new());
        }

        Self::push_recursion(&mut lines, &results.recursion_findings);
        Self::push_triggers(&mut lines, &results.trigger_summary);

        if !results.info.is_empty() {
            lines.push("## Additional Information\n".to_string());
            for info in &results.info {
                lines.push(format!("- {}", info.message));
            }
            lines.push(String::new());
        }

        lines.push("---\n".to_string());
        lines.push("*Report generated by worldbook-doc audit*\n".to_string());

        Ok(lines.join("\n"))
    }
}

/// Write the reports selected by `format` into `dir`.
///
/// Returns the written paths, timestamped file first for each format.
pub fn write_reports(
    dir: &Path,
    results: &AuditResults,
    format: ReportFormat,
) -> Result<Vec<PathBuf>, WorldbookError> {
    let millis = results.timestamp.timestamp_millis();
    let mut written = Vec::new();

    for writer in format.writers() {
        let content = writer.render(results)?;

        for name in [
            format!("validation-report-{}.{}", millis, writer.extension()),
            format!("validation-report-latest.{}", writer.extension()),
        ] {
            let path = dir.join(name);
            fs::write(&path, &content)
                .map_err(|e| WorldbookError::io(format!("writing {}", path.display()), e))?;
            debug!(path = %path.display(), "report written");
            written.push(path);
        }
    }

    Ok(written)
}
