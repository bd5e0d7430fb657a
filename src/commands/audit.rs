//! Worldbook audit command
//!
//! Deep lint of `worldbook.json`: schema, uid registry, profession chains,
//! references, lorebook triggers, and naming conventions. Findings land in
//! three buckets (critical errors, warnings, info) and are written out as
//! JSON and/or Markdown reports.
//!
//! # Graceful Degradation
//!
//! - Unreadable or malformed document: recorded as `FILE_LOAD_ERROR`, reports
//!   are still written
//! - Missing root `worldbook` object: recorded as a schema error, further
//!   analysis stops
//! - Unknown report format: recorded as `INVALID_ARGUMENT`, both formats are
//!   written
//!
//! # Trigger Diagnostics
//!
//! `CASE_SENSITIVITY_CONFLICT` is raised for a key of a `case_sensitive:
//! false` entry only when a *different* entry already claimed the same key
//! ignoring case. An entry's own keys never conflict with themselves, so a
//! lone case-insensitive entry produces no finding.

use crate::commands::report::{self, ReportFormat};
use crate::model::{Profession, Worldbook, WorldbookDocument};
use crate::{WorldbookError, WORLDBOOK_FILE};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory the reports are written to, relative to the project root.
pub const REPORTS_DIR: &str = "reports";

/// Configuration for the audit command.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Document to audit
    pub path: PathBuf,
    /// Directory receiving the reports (created if absent)
    pub reports_dir: PathBuf,
    /// Requested report format, as given on the command line
    pub format: Option<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        AuditConfig {
            path: PathBuf::from(WORLDBOOK_FILE),
            reports_dir: PathBuf::from(REPORTS_DIR),
            format: None,
        }
    }
}

impl AuditConfig {
    /// Configuration for a project rooted at `root`.
    pub fn in_dir(root: &Path, format: Option<String>) -> Self {
        AuditConfig {
            path: root.join(WORLDBOOK_FILE),
            reports_dir: root.join(REPORTS_DIR),
            format,
        }
    }
}

/// How serious a chain or trigger finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    Error,
    Warning,
    Info,
}

/// A single audit finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    #[serde(rename = "type")]
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Uid, profession, or entry the finding is about
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub chain: Vec<String>,
    /// Contexts or entries the subject was seen in
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<String>,
    /// Trigger key or regex pattern
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Finding {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Finding {
            code,
            message: message.into(),
            severity: None,
            system: None,
            subject: None,
            chain: Vec::new(),
            related: Vec::new(),
            pattern: None,
            error: None,
        }
    }

    fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    fn system(mut self, system: &str) -> Self {
        self.system = Some(system.to_string());
        self
    }

    fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    fn chain(mut self, chain: Vec<String>) -> Self {
        self.chain = chain;
        self
    }

    fn related(mut self, related: Vec<String>) -> Self {
        self.related = related;
        self
    }

    fn pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }

    fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Document statistics gathered during the audit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_entries: usize,
    pub total_professions: usize,
    pub total_shared_resources: usize,
    pub total_bridging_lore: usize,
    pub circular_references: usize,
    #[serde(rename = "duplicateUIDs")]
    pub duplicate_uids: usize,
}

/// Everything one audit run found.
#[derive(Debug, Clone)]
pub struct AuditResults {
    pub timestamp: DateTime<Utc>,
    pub critical_errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub info: Vec<Finding>,
    pub recursion_findings: Vec<Finding>,
    pub trigger_summary: Vec<Finding>,
    pub schema_validation: Vec<Finding>,
    pub statistics: Statistics,
}

impl AuditResults {
    pub fn new() -> Self {
        AuditResults {
            timestamp: Utc::now(),
            critical_errors: Vec::new(),
            warnings: Vec::new(),
            info: Vec::new(),
            recursion_findings: Vec::new(),
            trigger_summary: Vec::new(),
            schema_validation: Vec::new(),
            statistics: Statistics::default(),
        }
    }

    pub fn has_critical_errors(&self) -> bool {
        !self.critical_errors.is_empty()
    }

    fn codes(findings: &[Finding]) -> Vec<&'static str> {
        findings.iter().map(|f| f.code).collect()
    }

    /// Critical error codes, in the order they were found.
    pub fn critical_codes(&self) -> Vec<&'static str> {
        Self::codes(&self.critical_errors)
    }

    /// Warning codes, in the order they were found.
    pub fn warning_codes(&self) -> Vec<&'static str> {
        Self::codes(&self.warnings)
    }
}

impl Default for AuditResults {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of the audit command.
#[derive(Debug)]
pub struct AuditOutcome {
    pub results: AuditResults,
    /// Progress lines, in the order the phases ran
    pub progress: Vec<String>,
    /// Report files written
    pub reports: Vec<PathBuf>,
}

impl AuditOutcome {
    pub fn is_success(&self) -> bool {
        !self.results.has_critical_errors()
    }
}

/// Run the audit command.
///
/// # Errors
///
/// Returns an error only when the reports cannot be written. Problems with
/// the document itself are findings.
pub fn run(config: &AuditConfig) -> Result<AuditOutcome, WorldbookError> {
    let mut results = AuditResults::new();
    let mut progress = vec!["Starting worldbook validation...".to_string()];

    fs::create_dir_all(&config.reports_dir).map_err(|e| {
        WorldbookError::io(format!("creating {}", config.reports_dir.display()), e)
    })?;

    let format = resolve_format(config.format.as_deref(), &mut results, &mut progress);

    let document = match WorldbookDocument::load(&config.path) {
        Ok(document) => document,
        Err(e) => {
            info!(error = %e, "worldbook could not be loaded");
            results.critical_errors.push(
                Finding::new(
                    "FILE_LOAD_ERROR",
                    format!("Failed to load {}: {}", WORLDBOOK_FILE, e),
                )
                .subject(config.path.display().to_string()),
            );
            progress.push("Failed to load worldbook.".to_string());

            let reports = report::write_reports(&config.reports_dir, &results, ReportFormat::Both)?;
            return Ok(AuditOutcome {
                results,
                progress,
                reports,
            });
        }
    };
    progress.push("Worldbook loaded successfully".to_string());

    progress.extend(audit_document(&document, &mut results));

    let reports = report::write_reports(&config.reports_dir, &results, format)?;
    info!(reports = reports.len(), "audit reports written");

    Ok(AuditOutcome {
        results,
        progress,
        reports,
    })
}

fn resolve_format(
    requested: Option<&str>,
    results: &mut AuditResults,
    progress: &mut Vec<String>,
) -> ReportFormat {
    let Some(requested) = requested else {
        return ReportFormat::Both;
    };

    match ReportFormat::parse(requested) {
        Some(format) => format,
        None => {
            info!(format = requested, "unrecognized report format");
            results.warnings.push(Finding::new(
                "INVALID_ARGUMENT",
                format!(
                    "Unrecognized or missing format value \"{}\". Using default \"both\".",
                    requested.to_lowercase()
                ),
            ));
            progress.push("Warning: unrecognized --format value. Defaulting to \"both\".".to_string());
            ReportFormat::Both
        }
    }
}

/// Run every audit phase over a loaded document, returning progress lines.
pub fn audit_document(document: &WorldbookDocument, results: &mut AuditResults) -> Vec<String> {
    let mut progress = Vec::new();

    let schema_errors = validate_schema(document, results);
    if schema_errors.is_empty() {
        progress.push("Schema validation passed".to_string());
    } else {
        progress.push(format!("Found {} schema errors", schema_errors.len()));
    }
    results.critical_errors.extend(schema_errors.iter().cloned());
    results.schema_validation = schema_errors;

    let Some(worldbook) = document.worldbook.as_ref() else {
        return progress;
    };

    let registry = collect_uids(worldbook, results);
    progress.push(format!("Found {} unique UIDs", registry.len()));

    let chains = detect_recursion(worldbook, results);
    let circular = chains.iter().filter(|f| f.code == "CIRCULAR_REFERENCE").count();
    results.recursion_findings = chains;
    if circular > 0 {
        progress.push(format!("Found {} circular references", circular));
    } else {
        progress.push("No circular references detected".to_string());
    }

    let references = validate_references(worldbook, &registry, results);
    let invalid = references.iter().filter(|f| f.code == "INVALID_REFERENCE").count();
    let cross = references.len() - invalid;
    if invalid > 0 {
        progress.push(format!("Found {} invalid reference errors", invalid));
    }
    if cross > 0 {
        progress.push(format!("Found {} cross-reference warnings", cross));
    }
    if references.is_empty() {
        progress.push("All cross-references are valid".to_string());
    }

    let triggers = validate_triggers(worldbook, results);
    let trigger_errors = triggers
        .iter()
        .filter(|f| f.severity == Some(Severity::Error))
        .count();
    results.trigger_summary = triggers;
    if trigger_errors > 0 {
        progress.push(format!("Found {} trigger errors", trigger_errors));
    } else {
        progress.push("Trigger validation passed".to_string());
    }

    let naming = validate_naming(worldbook, results);
    let naming_errors = naming
        .iter()
        .filter(|f| f.severity == Some(Severity::Error))
        .count();
    if naming_errors > 0 {
        progress.push(format!("Found {} naming convention errors", naming_errors));
    } else {
        progress.push("Naming conventions validated".to_string());
    }

    calculate_statistics(worldbook, &mut results.statistics);

    progress
}

/// JavaScript-style truthiness of an optional JSON value.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn has_text(value: Option<&String>) -> bool {
    value.is_some_and(|s| !s.is_empty())
}

/// Name a profession by uid, falling back to its key in the professions map.
fn label<'a>(key: &'a str, profession: &'a Profession) -> &'a str {
    profession.uid.as_deref().unwrap_or(key)
}

fn validate_schema(document: &WorldbookDocument, results: &mut AuditResults) -> Vec<Finding> {
    let mut errors = Vec::new();

    let Some(worldbook) = document.worldbook.as_ref() else {
        errors.push(Finding::new(
            "SCHEMA_ERROR",
            "Missing root \"worldbook\" object",
        ));
        return errors;
    };

    for (field, value) in [
        ("version", worldbook.version.as_ref()),
        ("description", worldbook.description.as_ref()),
    ] {
        if !is_truthy(value) {
            errors.push(
                Finding::new("SCHEMA_ERROR", format!("Missing required field: {}", field))
                    .subject(field),
            );
        }
    }

    if worldbook.career_systems.is_none() {
        errors.push(Finding::new("SCHEMA_ERROR", "Missing careerSystems object"));
    }

    if worldbook.shared_resources.is_none() {
        results
            .warnings
            .push(Finding::new("SCHEMA_WARNING", "Missing sharedResources object"));
    }

    errors
}

/// Where a registered uid was first seen.
#[derive(Debug, Clone)]
struct UidOrigin {
    context: String,
    name: Option<String>,
}

/// Every uid in the document, keyed by uid.
#[derive(Debug, Default)]
pub struct UidRegistry {
    uids: HashMap<String, UidOrigin>,
}

impl UidRegistry {
    pub fn len(&self) -> usize {
        self.uids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uids.is_empty()
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.uids.contains_key(uid)
    }

    fn register(&mut self, uid: &str, context: &str, name: Option<&String>, results: &mut AuditResults) {
        if let Some(existing) = self.uids.get(uid) {
            debug!(uid, first = %existing.context, second = context, "duplicate uid");
            let names = [existing.name.as_deref(), name.map(String::as_str)]
                .iter()
                .map(|n| n.unwrap_or("unnamed").to_string())
                .collect::<Vec<_>>();
            results.critical_errors.push(
                Finding::new(
                    "DUPLICATE_UID",
                    format!(
                        "Duplicate UID \"{}\" found ({} / {})",
                        uid,
                        names[0],
                        names[1]
                    ),
                )
                .subject(uid)
                .related(vec![existing.context.clone(), context.to_string()]),
            );
            results.statistics.duplicate_uids += 1;
        } else {
            self.uids.insert(
                uid.to_string(),
                UidOrigin {
                    context: context.to_string(),
                    name: name.cloned(),
                },
            );
        }
    }
}

fn collect_uids(worldbook: &Worldbook, results: &mut AuditResults) -> UidRegistry {
    let mut registry = UidRegistry::default();

    if let Some(shared) = &worldbook.shared_resources {
        for location in shared.locations.iter().flat_map(|l| l.values()) {
            if let Some(uid) = location.uid.as_deref().filter(|u| !u.is_empty()) {
                registry.register(uid, "sharedResources.locations", location.name.as_ref(), results);
            }
        }
        for org in shared.organizations.iter().flat_map(|o| o.values()) {
            if let Some(uid) = org.uid.as_deref().filter(|u| !u.is_empty()) {
                registry.register(uid, "sharedResources.organizations", org.name.as_ref(), results);
            }
        }
    }

    for (system_name, system) in worldbook.career_systems.iter().flatten() {
        let context = format!("careerSystems.{}.professions", system_name);
        for profession in system.professions.iter().flat_map(|p| p.values()) {
            if let Some(uid) = profession.uid.as_deref().filter(|u| !u.is_empty()) {
                registry.register(uid, &context, profession.name.as_ref(), results);
            }
        }
    }

    if let Some(lore) = &worldbook.bridging_lore {
        for (context, items) in [
            ("bridgingLore.interactions", &lore.interactions),
            ("bridgingLore.sharedQuests", &lore.shared_quests),
        ] {
            for item in items.iter().flatten() {
                if let Some(uid) = item.uid.as_deref().filter(|u| !u.is_empty()) {
                    registry.register(uid, context, item.name.as_ref(), results);
                }
            }
        }
    }

    registry
}

fn detect_recursion(worldbook: &Worldbook, results: &mut AuditResults) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (system_name, system) in worldbook.career_systems.iter().flatten() {
        let Some(professions) = &system.professions else {
            continue;
        };

        let mut by_uid: HashMap<&str, &Profession> = HashMap::new();
        for profession in professions.values() {
            if let Some(uid) = profession.uid.as_deref() {
                by_uid.entry(uid).or_insert(profession);
            }
        }

        for (key, profession) in professions {
            let start = label(key, profession);
            let mut chain = vec![start.to_string()];
            let mut visited: HashSet<&str> = HashSet::from([start]);
            let mut current_label = start;
            let mut current = profession;
            let mut circular = false;

            while let Some(next) = current.next_profession.as_deref() {
                if visited.contains(next) {
                    let mut cycle = chain.clone();
                    cycle.push(next.to_string());
                    findings.push(
                        Finding::new(
                            "CIRCULAR_REFERENCE",
                            format!(
                                "Circular reference detected in {}: {}",
                                system_name,
                                cycle.join(" -> ")
                            ),
                        )
                        .severity(Severity::Critical)
                        .system(system_name)
                        .chain(cycle.clone()),
                    );
                    results.critical_errors.push(
                        Finding::new(
                            "CIRCULAR_REFERENCE",
                            format!("Circular reference in {} career path", system_name),
                        )
                        .system(system_name)
                        .chain(cycle),
                    );
                    results.statistics.circular_references += 1;
                    circular = true;
                    break;
                }

                visited.insert(next);
                chain.push(next.to_string());

                let Some(next_profession) = by_uid.get(next).copied() else {
                    findings.push(
                        Finding::new(
                            "BROKEN_REFERENCE",
                            format!(
                                "nextProfession reference \"{}\" not found in {}",
                                next, system_name
                            ),
                        )
                        .severity(Severity::Error)
                        .system(system_name)
                        .subject(current_label),
                    );
                    results.critical_errors.push(
                        Finding::new(
                            "BROKEN_REFERENCE",
                            format!(
                                "Invalid nextProfession reference: {} -> {}",
                                current_label, next
                            ),
                        )
                        .system(system_name),
                    );
                    break;
                };

                current_label = next;
                current = next_profession;
            }

            let previous = profession
                .requirements
                .as_ref()
                .and_then(|r| r.previous_profession.as_deref())
                .filter(|p| !p.is_empty());
            if let Some(previous) = previous {
                match by_uid.get(previous) {
                    None => {
                        findings.push(
                            Finding::new(
                                "BROKEN_REFERENCE",
                                format!(
                                    "previousProfession reference \"{}\" not found in {}",
                                    previous, system_name
                                ),
                            )
                            .severity(Severity::Error)
                            .system(system_name)
                            .subject(start),
                        );
                        results.critical_errors.push(
                            Finding::new(
                                "BROKEN_REFERENCE",
                                format!(
                                    "Invalid previousProfession reference: {} -> {}",
                                    start, previous
                                ),
                            )
                            .system(system_name),
                        );
                    }
                    Some(prev) if prev.next_profession.as_deref() != profession.uid.as_deref() => {
                        findings.push(
                            Finding::new(
                                "INCONSISTENT_CHAIN",
                                format!(
                                    "previousProfession chain inconsistency: {}.nextProfession should be {}",
                                    previous, start
                                ),
                            )
                            .severity(Severity::Warning)
                            .system(system_name)
                            .subject(start),
                        );
                        results.warnings.push(
                            Finding::new(
                                "INCONSISTENT_CHAIN",
                                format!("Chain inconsistency between {} and {}", previous, start),
                            )
                            .system(system_name),
                        );
                    }
                    Some(_) => {}
                }
            }

            if !circular && chain.len() > 1 {
                findings.push(
                    Finding::new(
                        "VALID_CHAIN",
                        format!("{} professions starting at {}", chain.len(), start),
                    )
                    .severity(Severity::Info)
                    .system(system_name)
                    .subject(start)
                    .chain(chain),
                );
            }
        }
    }

    findings
}

fn validate_references(
    worldbook: &Worldbook,
    registry: &UidRegistry,
    results: &mut AuditResults,
) -> Vec<Finding> {
    let mut errors = Vec::new();

    for (key, profession) in worldbook
        .career_systems
        .iter()
        .flatten()
        .flat_map(|(_, system)| system.professions.iter().flatten())
    {
        let owner = label(key, profession);

        for (kind, refs) in [
            ("location", &profession.locations),
            ("organization", &profession.organizations),
        ] {
            for reference in refs.iter().filter(|r| !registry.contains(r)) {
                errors.push(
                    Finding::new(
                        "INVALID_REFERENCE",
                        format!("Invalid {} reference \"{}\" in profession {}", kind, reference, owner),
                    )
                    .subject(owner),
                );
                results.critical_errors.push(Finding::new(
                    "INVALID_REFERENCE",
                    format!("Invalid {} reference: {} -> {}", kind, owner, reference),
                ));
            }
        }

        for (target, refs) in profession.cross_references.iter().flatten() {
            for reference in refs.iter().filter(|r| !registry.contains(r)) {
                errors.push(
                    Finding::new(
                        "INVALID_CROSS_REFERENCE",
                        format!(
                            "Invalid cross-system reference \"{}\" in profession {}",
                            reference, owner
                        ),
                    )
                    .system(target)
                    .subject(owner),
                );
                results.warnings.push(Finding::new(
                    "INVALID_CROSS_REFERENCE",
                    format!("Invalid cross-reference: {} -> {}", owner, reference),
                ));
            }
        }
    }

    errors
}

/// Render an entry id the way authors wrote it.
fn entry_label(entry: &Value, index: usize) -> String {
    for key in ["uid", "id"] {
        let value = entry.get(key);
        if is_truthy(value) {
            match value {
                Some(Value::String(s)) => return s.clone(),
                Some(other) => return other.to_string(),
                None => {}
            }
        }
    }
    format!("entry_{}", index)
}

fn string_list<'a>(entry: &'a Value, key: &str) -> Option<Vec<&'a str>> {
    entry
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
}

fn validate_triggers(worldbook: &Worldbook, results: &mut AuditResults) -> Vec<Finding> {
    let mut findings = Vec::new();

    let Some(entries) = worldbook.entries.as_ref().and_then(Value::as_array) else {
        results.info.push(Finding::new(
            "NO_TRIGGERS_FOUND",
            "No standard SillyTavern lorebook entries found in worldbook. This may be a custom format.",
        ));
        return findings;
    };

    // lowercased trigger -> entry that first used it
    let mut seen: HashMap<String, String> = HashMap::new();

    for (index, entry) in entries.iter().enumerate() {
        let entry_id = entry_label(entry, index);
        let keys = string_list(entry, "keys");

        for key in keys.iter().flatten() {
            let normalized = key.to_lowercase();
            match seen.get(&normalized) {
                Some(first) => {
                    let related = vec![first.clone(), entry_id.clone()];
                    findings.push(
                        Finding::new(
                            "DUPLICATE_TRIGGER",
                            format!("Duplicate trigger \"{}\" found in multiple entries", key),
                        )
                        .severity(Severity::Warning)
                        .pattern(key)
                        .related(related.clone()),
                    );
                    results.warnings.push(
                        Finding::new("DUPLICATE_TRIGGER", format!("Duplicate trigger: \"{}\"", key))
                            .related(related),
                    );
                }
                None => {
                    seen.insert(normalized, entry_id.clone());
                }
            }
        }

        for key in string_list(entry, "secondary_keys").iter().flatten() {
            if let Some(first) = seen.get(&key.to_lowercase()) {
                findings.push(
                    Finding::new(
                        "DUPLICATE_SECONDARY_TRIGGER",
                        format!("Duplicate secondary trigger \"{}\" found", key),
                    )
                    .severity(Severity::Info)
                    .pattern(key)
                    .related(vec![first.clone(), entry_id.clone()]),
                );
            }
        }

        if is_truthy(entry.get("use_regex")) {
            for pattern in keys.iter().flatten() {
                match Regex::new(pattern) {
                    Ok(_) => findings.push(
                        Finding::new("VALID_REGEX", format!("Valid regex pattern: {}", pattern))
                            .severity(Severity::Info)
                            .subject(entry_id.clone())
                            .pattern(pattern),
                    ),
                    Err(e) => {
                        findings.push(
                            Finding::new(
                                "INVALID_REGEX",
                                format!("Invalid regex pattern \"{}\": {}", pattern, e),
                            )
                            .severity(Severity::Error)
                            .subject(entry_id.clone())
                            .pattern(pattern)
                            .error(e.to_string()),
                        );
                        results.critical_errors.push(
                            Finding::new(
                                "INVALID_REGEX",
                                format!("Invalid regex in entry {}: {}", entry_id, pattern),
                            )
                            .error(e.to_string()),
                        );
                    }
                }
            }
        }

        if entry.get("case_sensitive") == Some(&Value::Bool(false)) {
            // Only a trigger first claimed by another entry counts.
            for key in keys.iter().flatten() {
                let clashes = seen
                    .get(&key.to_lowercase())
                    .is_some_and(|first| *first != entry_id);
                if clashes {
                    findings.push(
                        Finding::new(
                            "CASE_SENSITIVITY_CONFLICT",
                            format!("Potential case sensitivity conflict with trigger \"{}\"", key),
                        )
                        .severity(Severity::Warning)
                        .pattern(key),
                    );
                }
            }
        }
    }

    results.info.push(
        Finding::new(
            "TRIGGER_SCAN_COMPLETE",
            format!(
                "Scanned {} entries for trigger issues ({} unique triggers)",
                entries.len(),
                seen.len()
            ),
        ),
    );

    findings
}

fn validate_naming(worldbook: &Worldbook, results: &mut AuditResults) -> Vec<Finding> {
    let mut issues = Vec::new();

    for (system_name, system) in worldbook.career_systems.iter().flatten() {
        let prefix = system.prefix.as_deref().filter(|p| !p.is_empty());

        for (key, profession) in system.professions.iter().flatten() {
            let owner = label(key, profession);

            if let (Some(prefix), Some(uid)) = (prefix, profession.uid.as_deref()) {
                if !uid.starts_with(prefix) {
                    issues.push(
                        Finding::new(
                            "NAMING_CONVENTION_VIOLATION",
                            format!(
                                "Profession UID \"{}\" does not follow prefix convention \"{}\"",
                                uid, prefix
                            ),
                        )
                        .severity(Severity::Warning)
                        .system(system_name)
                        .subject(uid),
                    );
                    results.warnings.push(
                        Finding::new(
                            "NAMING_CONVENTION",
                            format!("UID {} doesn't follow convention {}", uid, prefix),
                        )
                        .system(system_name),
                    );
                }
            }

            let present = [
                ("uid", has_text(profession.uid.as_ref())),
                ("name", has_text(profession.name.as_ref())),
                ("level", is_truthy(profession.level.as_ref())),
                ("description", is_truthy(profession.description.as_ref())),
            ];
            for (field, _) in present.iter().filter(|(_, ok)| !ok) {
                issues.push(
                    Finding::new(
                        "MISSING_FIELD",
                        format!("Missing required field \"{}\" in profession {}", field, owner),
                    )
                    .severity(Severity::Error)
                    .system(system_name)
                    .subject(owner),
                );
                results.critical_errors.push(
                    Finding::new(
                        "MISSING_FIELD",
                        format!("Missing {} in profession {}", field, owner),
                    )
                    .system(system_name),
                );
            }
        }
    }

    issues
}

fn calculate_statistics(worldbook: &Worldbook, stats: &mut Statistics) {
    stats.total_professions = worldbook
        .career_systems
        .iter()
        .flatten()
        .map(|(_, system)| system.professions.as_ref().map_or(0, |p| p.len()))
        .sum();

    if let Some(shared) = &worldbook.shared_resources {
        stats.total_shared_resources = shared.locations.as_ref().map_or(0, |l| l.len())
            + shared.organizations.as_ref().map_or(0, |o| o.len());
    }

    if let Some(lore) = &worldbook.bridging_lore {
        stats.total_bridging_lore = lore.interactions.as_ref().map_or(0, Vec::len)
            + lore.shared_quests.as_ref().map_or(0, Vec::len);
    }

    stats.total_entries = worldbook
        .entries
        .as_ref()
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
}

/// Format the console output of an audit run.
pub fn format_text(outcome: &AuditOutcome) -> String {
    let results = &outcome.results;
    let rule = "=".repeat(60);
    let mut output = String::new();

    for line in &outcome.progress {
        output.push_str(line);
        output.push('\n');
    }

    output.push('\n');
    for path in &outcome.reports {
        output.push_str(&format!("Report written to: {}\n", path.display()));
    }

    output.push('\n');
    output.push_str(&rule);
    output.push_str("\nVALIDATION SUMMARY\n");
    output.push_str(&rule);
    output.push('\n');
    output.push_str(&format!("Critical Errors: {}\n", results.critical_errors.len()));
    output.push_str(&format!("Warnings: {}\n", results.warnings.len()));
    output.push_str(&format!("Info: {}\n", results.info.len()));
    output.push_str(&format!(
        "Circular References: {}\n",
        results.statistics.circular_references
    ));
    output.push_str(&format!("Duplicate UIDs: {}\n", results.statistics.duplicate_uids));
    output.push_str(&rule);
    output.push_str("\n\n");

    if results.has_critical_errors() {
        output.push_str("Validation FAILED - Critical errors found");
    } else if !results.warnings.is_empty() {
        output.push_str("Validation PASSED with warnings");
    } else {
        output.push_str("Validation PASSED - No issues found");
    }

    output
}
