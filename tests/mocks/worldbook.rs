//! Mock worldbook documents and project directories.
//!
//! Provides configurable documents that simulate:
//! - Fully merged career systems that pass every check
//! - Prefix, uid, and progression problems
//! - Shared resources missing one of the systems
//! - Broken profession chains and lorebook triggers for the audit

use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Mock career system configuration
#[derive(Debug, Clone)]
pub struct MockSystemConfig {
    pub name: &'static str,
    pub prefix: String,
    /// Prefix used for generated profession uids
    pub uid_prefix: String,
    pub profession_count: usize,
    pub cross_references: bool,
    pub status_bar_fields: Vec<&'static str>,
    /// Next-profession override for the last profession
    pub last_next: Option<String>,
}

impl MockSystemConfig {
    fn new(name: &'static str, prefix: &str) -> Self {
        MockSystemConfig {
            name,
            prefix: prefix.to_string(),
            uid_prefix: prefix.to_string(),
            profession_count: 8,
            cross_references: true,
            status_bar_fields: vec!["progressField", "statusField", "levelField", "experienceField"],
            last_next: None,
        }
    }

    pub fn academic() -> Self {
        Self::new("academic", "acad_")
    }

    pub fn entertainment() -> Self {
        Self::new("entertainment", "ent_")
    }

    fn other(&self) -> (&'static str, &'static str) {
        if self.name == "academic" {
            ("entertainment", "ent_")
        } else {
            ("academic", "acad_")
        }
    }

    fn to_json(&self) -> Value {
        let mut professions = Map::new();
        let (other_name, other_prefix) = self.other();

        for level in 1..=self.profession_count {
            let mut profession = json!({
                "uid": format!("{}rank{}", self.uid_prefix, level),
                "name": format!("{} rank {}", self.name, level),
                "level": level,
                "description": format!("Level {} of the {} career", level, self.name),
                "locations": ["shared_library"],
                "organizations": ["shared_council"]
            });

            if level < self.profession_count {
                profession["nextProfession"] = json!(format!("{}rank{}", self.uid_prefix, level + 1));
            } else if let Some(next) = &self.last_next {
                profession["nextProfession"] = json!(next);
            }
            if level > 1 {
                profession["requirements"] =
                    json!({ "previousProfession": format!("{}rank{}", self.uid_prefix, level - 1) });
            }
            if self.cross_references {
                let mut refs = Map::new();
                refs.insert(
                    other_name.to_string(),
                    json!([format!("{}rank{}", other_prefix, level.min(8))]),
                );
                profession["crossReferences"] = Value::Object(refs);
            }

            professions.insert(format!("level{}", level), profession);
        }

        let mut status_bar = Map::new();
        for field in &self.status_bar_fields {
            status_bar.insert(field.to_string(), json!(format!("{}_{}", self.name, field)));
        }

        json!({
            "prefix": self.prefix,
            "professions": professions,
            "statusBarConfig": status_bar
        })
    }
}

/// Mock worldbook configuration
#[derive(Debug, Clone)]
pub struct MockWorldbookConfig {
    pub academic: MockSystemConfig,
    pub entertainment: MockSystemConfig,
    /// Systems listed in every location's accessibleBy
    pub location_access: Vec<&'static str>,
    /// Systems listed under the council's `oversees`
    pub council_oversees: Vec<&'static str>,
    pub hooks: Vec<&'static str>,
    /// Contents of `validation.uidConflicts`; None drops the whole section
    pub uid_conflicts: Option<Vec<&'static str>>,
    pub bridging_lore: bool,
    pub entries: Option<Value>,
}

impl Default for MockWorldbookConfig {
    fn default() -> Self {
        MockWorldbookConfig {
            academic: MockSystemConfig::academic(),
            entertainment: MockSystemConfig::entertainment(),
            location_access: vec!["academic", "entertainment"],
            council_oversees: vec!["academic", "entertainment"],
            hooks: vec!["integration_hooks"],
            uid_conflicts: Some(Vec::new()),
            bridging_lore: true,
            entries: None,
        }
    }
}

impl MockWorldbookConfig {
    /// A worldbook that passes every merge check and has no audit findings.
    pub fn healthy() -> Self {
        Self::default()
    }

    /// Entertainment professions reuse the academic uids.
    pub fn with_shared_uid() -> Self {
        let mut config = Self::default();
        config.entertainment.uid_prefix = "acad_".to_string();
        config
    }

    pub fn to_json(&self) -> Value {
        let mut hooks = Map::new();
        for hook in &self.hooks {
            hooks.insert(hook.to_string(), json!(["onLevelUp"]));
        }

        let mut worldbook = json!({
            "version": "2.1.0",
            "description": "Merged academic and entertainment career systems",
            "careerSystems": {
                "academic": self.academic.to_json(),
                "entertainment": self.entertainment.to_json()
            },
            "sharedResources": {
                "locations": {
                    "library": {
                        "uid": "shared_library",
                        "name": "Grand Library",
                        "accessibleBy": self.location_access
                    }
                },
                "organizations": {
                    "council": {
                        "uid": "shared_council",
                        "name": "City Council",
                        "oversees": self.council_oversees
                    },
                    "union": {
                        "uid": "shared_union",
                        "name": "Workers Union",
                        "includes": ["entertainment", "academic"]
                    }
                }
            },
            "statusBarIntegration": {
                "hooks": hooks
            }
        });

        if let Some(conflicts) = &self.uid_conflicts {
            worldbook["validation"] = json!({
                "uidConflicts": conflicts,
                "namingConflicts": [],
                "contradictoryLore": []
            });
        }
        if self.bridging_lore {
            worldbook["bridgingLore"] = json!({
                "interactions": [
                    { "uid": "bridge_lecture_show", "name": "Lecture Show" }
                ],
                "sharedQuests": [
                    { "uid": "bridge_festival", "name": "Campus Festival" },
                    { "uid": "bridge_exam_gala", "name": "Exam Gala" }
                ]
            });
        }
        if let Some(entries) = &self.entries {
            worldbook["entries"] = entries.clone();
        }

        json!({ "worldbook": worldbook })
    }
}

/// Scratch project directory
pub struct MockProject {
    dir: TempDir,
}

impl MockProject {
    /// Empty project
    pub fn empty() -> Self {
        MockProject {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Project holding a worldbook.json generated from `config`
    pub fn with_worldbook(config: &MockWorldbookConfig) -> Self {
        let project = Self::empty();
        project.write_json("worldbook.json", &config.to_json());
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn write_json(&self, relative: &str, value: &Value) {
        self.write(relative, &serde_json::to_string_pretty(value).unwrap());
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.join(relative)).unwrap()
    }

    /// Populate the authoring tree the package command archives
    pub fn with_authoring_tree(self) -> Self {
        self.write("lorebook/core/intro.md", "# Intro");
        self.write("lorebook/academic/ranks.md", "# Ranks");
        self.write("lorebook/build.log", "build output");
        self.write("docs/guide.md", "# Guide");
        self.write("scripts/validate.sh", "worldbook-doc audit");
        self.write("README.md", "# Worldbook");
        self.write("package.json", "{\"name\": \"worldbook\"}");
        self
    }
}
