//! Output formatting tests.
//!
//! Tests the terminal formatter against reports from real merge check runs.

use crate::mocks::{MockProject, MockWorldbookConfig};
use worldbook_doc::cli::output::{OutputFormatter, TerminalFormatter};
use worldbook_doc::{run_checks, ValidateConfig};

fn report_for(config: &MockWorldbookConfig) -> worldbook_doc::Report {
    let project = MockProject::with_worldbook(config);
    run_checks(&ValidateConfig::in_dir(project.path())).unwrap()
}

#[test]
fn test_criteria_are_printed_in_order() {
    let output = TerminalFormatter::new(false, false, false).format(&report_for(&MockWorldbookConfig::healthy()));

    let positions: Vec<_> = (1..=4)
        .map(|n| output.find(&format!("Criteria {}:", n)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_every_line_item_is_labeled() {
    let output = TerminalFormatter::new(false, false, false).format(&report_for(&MockWorldbookConfig::healthy()));

    for id in [
        "NAM-001", "NAM-002", "NAM-003", "RES-001", "RES-002", "SB-001", "SB-002", "LORE-001", "LORE-002",
        "LORE-003",
    ] {
        assert!(output.contains(&format!("[PASS] {}", id)), "missing {}", id);
    }
}

#[test]
fn test_progression_failure_names_both_counts() {
    let mut config = MockWorldbookConfig::healthy();
    config.academic.profession_count = 7;

    let output = TerminalFormatter::new(false, false, false).format(&report_for(&config));
    assert!(output.contains("[FAIL] NAM-003 Incomplete progression: Academic=7, Entertainment=8"));
}

#[test]
fn test_cross_reference_warning_line() {
    let mut config = MockWorldbookConfig::healthy();
    config.academic.cross_references = false;
    config.entertainment.cross_references = false;

    let output = TerminalFormatter::new(false, false, false).format(&report_for(&config));
    assert!(output.contains("[WARN] LORE-002 No cross-references found (may be intentional)"));
    assert!(output.contains("Overall: 9/10 checks passed"));
    assert!(output.contains("VALIDATION SUCCESSFUL"));
}

#[test]
fn test_absent_validation_section_is_not_counted() {
    let mut config = MockWorldbookConfig::healthy();
    config.uid_conflicts = None;

    let output = TerminalFormatter::new(false, false, false).format(&report_for(&config));
    assert!(output.contains("[SKIP] LORE-001"));
    assert!(output.contains("Overall: 9/9 checks passed"));
}

#[test]
fn test_source_path_is_shown() {
    let project = MockProject::with_worldbook(&MockWorldbookConfig::healthy());
    let report = run_checks(&ValidateConfig::in_dir(project.path())).unwrap();

    let output = TerminalFormatter::new(false, false, false).format(&report);
    assert!(output.contains(&format!("Source: {}", project.join("worldbook.json").display())));
}
