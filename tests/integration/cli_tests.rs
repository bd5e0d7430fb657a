//! CLI integration tests.
//!
//! Runs the binary inside mock projects and checks output and exit codes.

use crate::mocks::{MockProject, MockWorldbookConfig};
use assert_cmd::Command;
use predicates::prelude::*;

fn worldbook_doc(project: &MockProject) -> Command {
    let mut cmd = Command::cargo_bin("worldbook-doc").unwrap();
    cmd.current_dir(project.path())
        .env_remove("WORLDBOOK_DOC_FORMAT")
        .env_remove("WORLDBOOK_LOG");
    cmd
}

#[test]
fn test_default_command_runs_merge_check() {
    let project = MockProject::with_worldbook(&MockWorldbookConfig::healthy());

    worldbook_doc(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("[PASS] NAM-001"))
        .stdout(predicate::str::contains("Overall: 10/10 checks passed"))
        .stdout(predicate::str::contains("CAREER SYSTEMS MERGE VALIDATION SUCCESSFUL!"));
}

#[test]
fn test_check_below_threshold_exits_one() {
    let mut config = MockWorldbookConfig::with_shared_uid();
    config.hooks = Vec::new();
    config.location_access = vec!["academic"];
    let project = MockProject::with_worldbook(&config);

    worldbook_doc(&project)
        .arg("check")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[FAIL] NAM-002 UID conflicts detected"))
        .stdout(predicate::str::contains("CAREER SYSTEMS MERGE VALIDATION FAILED!"));
}

#[test]
fn test_check_without_worldbook_exits_one() {
    let project = MockProject::empty();

    worldbook_doc(&project)
        .arg("check")
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("Error reading worldbook.json: failed to read"))
        .stdout(predicate::str::contains("VALIDATION RESULTS").not());
}

#[test]
fn test_check_malformed_worldbook_reports_on_stdout() {
    let project = MockProject::empty();
    project.write("worldbook.json", "{ \"worldbook\": ");

    worldbook_doc(&project)
        .arg("check")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Error reading worldbook.json: failed to parse"));
}

#[test]
fn test_check_tolerates_values_it_does_not_read() {
    let project = MockProject::empty();
    let mut doc = MockWorldbookConfig::healthy().to_json();
    doc["worldbook"]["careerSystems"]["entertainment"]["professions"]["level2"]["name"] =
        serde_json::json!({ "en": "Stagehand", "ja": "裏方" });
    project.write_json("worldbook.json", &doc);

    worldbook_doc(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("Overall: 10/10 checks passed"));
}

#[test]
fn test_check_missing_required_key_exits_one() {
    let project = MockProject::with_worldbook(&MockWorldbookConfig::healthy());
    let mut doc = MockWorldbookConfig::healthy().to_json();
    doc["worldbook"]
        .as_object_mut()
        .unwrap()
        .remove("statusBarIntegration");
    project.write_json("worldbook.json", &doc);

    worldbook_doc(&project)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "missing required key: worldbook.statusBarIntegration",
        ))
        .stdout(predicate::str::contains("Overall:").not());
}

#[test]
fn test_quiet_hides_passing_lines() {
    let mut config = MockWorldbookConfig::healthy();
    config.hooks = Vec::new();
    let project = MockProject::with_worldbook(&config);

    worldbook_doc(&project)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("[FAIL] SB-002"))
        .stdout(predicate::str::contains("[PASS]").not());
}

#[test]
fn test_unknown_flag_is_usage_error() {
    let project = MockProject::empty();

    worldbook_doc(&project).arg("--bogus").assert().code(3);
}

#[test]
fn test_help_exits_zero() {
    let project = MockProject::empty();

    worldbook_doc(&project)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("EXIT CODES"));
}

#[test]
fn test_list_command() {
    let project = MockProject::empty();

    worldbook_doc(&project)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("CRITERIA 1"))
        .stdout(predicate::str::contains("NAM-001"))
        .stdout(predicate::str::contains("LORE-003"));
}

#[test]
fn test_version_command() {
    let project = MockProject::empty();

    worldbook_doc(&project)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "worldbook-doc {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_package_command() {
    let project = MockProject::empty().with_authoring_tree();

    worldbook_doc(&project)
        .arg("package")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Creating zip package..."))
        .stdout(predicate::str::contains("Warning: reports/ not found, skipping"))
        .stdout(predicate::str::contains(
            "Package created: dist/optimized-worldbook.zip",
        ));

    assert!(project.join("dist/optimized-worldbook.zip").exists());
}

#[test]
fn test_package_in_empty_project_still_succeeds() {
    let project = MockProject::empty();

    worldbook_doc(&project)
        .arg("package")
        .assert()
        .success()
        .stdout(predicate::str::contains("Warning: package.json not found, skipping"));
}

#[test]
fn test_audit_command_writes_reports() {
    let project = MockProject::with_worldbook(&MockWorldbookConfig::healthy());

    worldbook_doc(&project)
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("VALIDATION SUMMARY"))
        .stdout(predicate::str::contains("Validation PASSED - No issues found"));

    assert!(project.join("reports/validation-report-latest.json").exists());
    assert!(project.join("reports/validation-report-latest.md").exists());
}

#[test]
fn test_audit_with_circular_chain_exits_one() {
    let mut config = MockWorldbookConfig::healthy();
    config.academic.last_next = Some("acad_rank1".to_string());
    let project = MockProject::with_worldbook(&config);

    worldbook_doc(&project)
        .args(["audit", "--format", "json"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("circular references"))
        .stdout(predicate::str::contains("Validation FAILED"));

    assert!(project.join("reports/validation-report-latest.json").exists());
    assert!(!project.join("reports/validation-report-latest.md").exists());
}

#[test]
fn test_audit_format_from_environment() {
    let project = MockProject::with_worldbook(&MockWorldbookConfig::healthy());

    worldbook_doc(&project)
        .arg("audit")
        .env("WORLDBOOK_DOC_FORMAT", "markdown")
        .assert()
        .success();

    assert!(project.join("reports/validation-report-latest.md").exists());
    assert!(!project.join("reports/validation-report-latest.json").exists());
}

#[test]
fn test_audit_unknown_format_falls_back_to_both() {
    let project = MockProject::with_worldbook(&MockWorldbookConfig::healthy());

    worldbook_doc(&project)
        .args(["audit", "--format", "html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unrecognized --format value"))
        .stdout(predicate::str::contains("Validation PASSED with warnings"));

    assert!(project.join("reports/validation-report-latest.json").exists());
    assert!(project.join("reports/validation-report-latest.md").exists());
}

#[test]
fn test_audit_without_worldbook_still_writes_reports() {
    let project = MockProject::empty();

    worldbook_doc(&project)
        .args(["audit", "--format", "json"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Failed to load worldbook."));

    let report = project.read("reports/validation-report-latest.json");
    assert!(report.contains("FILE_LOAD_ERROR"));
    assert!(project.join("reports/validation-report-latest.md").exists());
}
