//! Package integration tests.
//!
//! Builds archives from mock authoring trees and inspects their entries.

use crate::mocks::MockProject;
use std::collections::BTreeSet;
use std::fs::File;
use worldbook_doc::commands::package::{create_package, PackageConfig, OUTPUT_PATH};
use zip::ZipArchive;

fn entries(project: &MockProject) -> BTreeSet<String> {
    let archive = ZipArchive::new(File::open(project.join(OUTPUT_PATH)).unwrap()).unwrap();
    archive.file_names().map(String::from).collect()
}

#[test]
fn test_authoring_tree_is_packaged() {
    let project = MockProject::empty().with_authoring_tree();
    let summary = create_package(&PackageConfig::in_dir(project.path()), |_| {}).unwrap();

    let expected: BTreeSet<String> = [
        "lorebook/academic/ranks.md",
        "lorebook/core/intro.md",
        "docs/guide.md",
        "scripts/validate.sh",
        "README.md",
        "package.json",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    assert_eq!(entries(&project), expected);
    assert_eq!(summary.missing, vec!["reports/"]);
}

#[test]
fn test_previous_reports_are_packaged() {
    let project = MockProject::empty().with_authoring_tree();
    project.write("reports/validation-report-latest.md", "# Report");

    create_package(&PackageConfig::in_dir(project.path()), |_| {}).unwrap();
    assert!(entries(&project).contains("reports/validation-report-latest.md"));
}

#[test]
fn test_git_and_node_modules_are_skipped() {
    let project = MockProject::empty();
    project.write("scripts/.git/HEAD", "ref");
    project.write("scripts/node_modules/dep/index.js", "module.exports = {}");
    project.write("scripts/run.js", "console.log('run')");

    create_package(&PackageConfig::in_dir(project.path()), |_| {}).unwrap();

    let names = entries(&project);
    assert_eq!(names.len(), 1);
    assert!(names.contains("scripts/run.js"));
}

#[test]
fn test_unrelated_top_level_files_are_ignored() {
    let project = MockProject::empty().with_authoring_tree();
    project.write("notes.txt", "scratch");
    project.write("worldbook.json", "{}");

    create_package(&PackageConfig::in_dir(project.path()), |_| {}).unwrap();

    let names = entries(&project);
    assert!(!names.contains("notes.txt"));
    assert!(!names.contains("worldbook.json"));
}
