//! Audit integration tests.
//!
//! Runs the audit against mock projects and inspects the written reports.

use crate::mocks::{MockProject, MockWorldbookConfig};
use serde_json::{json, Value};
use worldbook_doc::commands::audit::{self, AuditConfig};

fn audit_project(project: &MockProject, format: Option<&str>) -> audit::AuditOutcome {
    audit::run(&AuditConfig::in_dir(project.path(), format.map(String::from))).unwrap()
}

fn latest_json(project: &MockProject) -> Value {
    serde_json::from_str(&project.read("reports/validation-report-latest.json")).unwrap()
}

#[test]
fn test_healthy_project_report() {
    let project = MockProject::with_worldbook(&MockWorldbookConfig::healthy());
    let outcome = audit_project(&project, None);

    assert!(outcome.is_success());
    assert_eq!(outcome.reports.len(), 4);

    let report = latest_json(&project);
    assert_eq!(report["summary"]["totalErrors"], 0);
    assert_eq!(report["statistics"]["totalProfessions"], 16);
    assert_eq!(report["statistics"]["totalSharedResources"], 3);
    assert_eq!(report["statistics"]["totalBridgingLore"], 3);
    assert_eq!(report["info"][0]["type"], "NO_TRIGGERS_FOUND");
}

#[test]
fn test_timestamped_and_latest_reports_match() {
    let project = MockProject::with_worldbook(&MockWorldbookConfig::healthy());
    let outcome = audit_project(&project, Some("markdown"));

    let millis = outcome.results.timestamp.timestamp_millis();
    let stamped = project.read(&format!("reports/validation-report-{}.md", millis));
    assert_eq!(stamped, project.read("reports/validation-report-latest.md"));
    assert!(stamped.contains("- **Status:** ✅ PASS"));
}

#[test]
fn test_duplicate_uid_is_reported_with_both_contexts() {
    let project = MockProject::with_worldbook(&MockWorldbookConfig::with_shared_uid());
    let outcome = audit_project(&project, Some("json"));

    assert!(!outcome.is_success());
    let report = latest_json(&project);
    assert_eq!(report["statistics"]["duplicateUIDs"], 8);
    assert_eq!(report["summary"]["hasDuplicateUIDs"], true);

    let duplicate = report["errors"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["type"] == "DUPLICATE_UID")
        .unwrap();
    assert_eq!(
        duplicate["related"],
        json!([
            "careerSystems.academic.professions",
            "careerSystems.entertainment.professions"
        ])
    );
}

#[test]
fn test_circular_chain_in_markdown() {
    let mut config = MockWorldbookConfig::healthy();
    config.entertainment.last_next = Some("ent_rank1".to_string());
    let project = MockProject::with_worldbook(&config);

    audit_project(&project, Some("markdown"));

    let markdown = project.read("reports/validation-report-latest.md");
    assert!(markdown.contains("## Recursion & Circular Reference Analysis"));
    assert!(markdown.contains("### Circular References (CRITICAL)"));
    assert!(markdown.contains("ent_rank8 → ent_rank1"));
}

#[test]
fn test_trigger_entries_are_scanned() {
    let mut config = MockWorldbookConfig::healthy();
    config.entries = Some(json!([
        { "uid": "lib", "keys": ["library", "books"] },
        { "uid": "hall", "keys": ["Library"] },
        { "uid": "rx", "keys": ["[unclosed"], "use_regex": true }
    ]));
    let project = MockProject::with_worldbook(&config);

    let outcome = audit_project(&project, Some("json"));
    assert!(!outcome.is_success());

    let report = latest_json(&project);
    assert_eq!(report["statistics"]["totalEntries"], 3);
    let kinds: Vec<_> = report["triggerSummary"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["type"].as_str().unwrap().to_string())
        .collect();
    assert!(kinds.contains(&"DUPLICATE_TRIGGER".to_string()));
    assert!(kinds.contains(&"INVALID_REGEX".to_string()));
}

#[test]
fn test_unreadable_worldbook_writes_both_reports() {
    let project = MockProject::empty();
    project.write("worldbook.json", "not json");

    let outcome = audit_project(&project, Some("json"));

    assert!(!outcome.is_success());
    assert_eq!(outcome.results.critical_codes(), vec!["FILE_LOAD_ERROR"]);
    assert!(project.join("reports/validation-report-latest.json").exists());
    assert!(project.join("reports/validation-report-latest.md").exists());
}

#[test]
fn test_invalid_format_recorded_as_warning() {
    let project = MockProject::with_worldbook(&MockWorldbookConfig::healthy());
    let outcome = audit_project(&project, Some("XML"));

    assert_eq!(outcome.results.warning_codes(), vec!["INVALID_ARGUMENT"]);
    assert!(outcome.results.warnings[0].message.contains("\"xml\""));
    assert_eq!(outcome.reports.len(), 4);
}
