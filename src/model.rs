//! Worldbook document model.
//!
//! Two readings of `worldbook.json`:
//! - [`WorldbookDocument`]: the typed model the audit walks. Every section is
//!   optional so the audit can report on incomplete documents.
//! - [`MergeView`]: the merge checklist's view, built straight from the JSON
//!   value. Only the keys the checklist indexes directly are required; every
//!   other value is read by lookup and never has to match a type.

use crate::WorldbookError;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const ACADEMIC: &str = "academic";
pub const ENTERTAINMENT: &str = "entertainment";

/// Root of the JSON file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorldbookDocument {
    pub worldbook: Option<Worldbook>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worldbook {
    pub version: Option<Value>,
    pub description: Option<Value>,
    pub career_systems: Option<BTreeMap<String, CareerSystem>>,
    pub shared_resources: Option<SharedResources>,
    pub bridging_lore: Option<BridgingLore>,
    /// SillyTavern-style lorebook entries, kept raw because the format varies.
    pub entries: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CareerSystem {
    pub prefix: Option<String>,
    pub professions: Option<BTreeMap<String, Profession>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profession {
    pub uid: Option<String>,
    pub name: Option<String>,
    pub level: Option<Value>,
    pub description: Option<Value>,
    pub next_profession: Option<String>,
    pub requirements: Option<Requirements>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub organizations: Vec<String>,
    /// Target system name to profession uids in that system.
    pub cross_references: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirements {
    pub previous_profession: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SharedResources {
    pub locations: Option<BTreeMap<String, SharedResource>>,
    pub organizations: Option<BTreeMap<String, SharedResource>>,
}

/// A shared location or organization, as far as the uid registry cares.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SharedResource {
    pub uid: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgingLore {
    pub interactions: Option<Vec<LoreItem>>,
    pub shared_quests: Option<Vec<LoreItem>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoreItem {
    pub uid: Option<String>,
    pub name: Option<String>,
}

/// Read `path` and parse it as JSON, without imposing any document shape.
pub fn read_json(path: &Path) -> Result<Value, WorldbookError> {
    let content = fs::read_to_string(path).map_err(|source| WorldbookError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| WorldbookError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl WorldbookDocument {
    /// Read a worldbook file into the typed model.
    pub fn load(path: &Path) -> Result<Self, WorldbookError> {
        let value = read_json(path)?;
        serde_json::from_value(value).map_err(|source| WorldbookError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn require<'a>(parent: &'a Value, parent_path: &str, key: &str) -> Result<&'a Value, WorldbookError> {
    parent.get(key).ok_or_else(|| WorldbookError::MissingKey {
        path: join(parent_path, key),
    })
}

/// Like [`require`], for keys the checklist iterates over.
fn require_object<'a>(
    parent: &'a Value,
    parent_path: &str,
    key: &str,
) -> Result<&'a Map<String, Value>, WorldbookError> {
    require(parent, parent_path, key)?
        .as_object()
        .ok_or_else(|| WorldbookError::NotAnObject {
            path: join(parent_path, key),
        })
}

/// One career system with every key the merge check indexes present.
#[derive(Debug, Clone, Copy)]
pub struct SystemView<'a> {
    pub name: &'static str,
    pub prefix: &'a Value,
    pub professions: &'a Map<String, Value>,
    pub status_bar_config: &'a Value,
}

impl<'a> SystemView<'a> {
    fn from_systems(systems: &'a Value, name: &'static str) -> Result<Self, WorldbookError> {
        let base = join("worldbook.careerSystems", name);
        let system = require(systems, "worldbook.careerSystems", name)?;
        let prefix = require(system, &base, "prefix")?;
        let professions = require_object(system, &base, "professions")?;

        let professions_path = join(&base, "professions");
        for (id, profession) in professions {
            require(profession, &join(&professions_path, id), "uid")?;
        }

        let status_bar_config = require(system, &base, "statusBarConfig")?;

        Ok(SystemView {
            name,
            prefix,
            professions,
            status_bar_config,
        })
    }

    /// Profession uids in this system. Non-string uids compare by their JSON text.
    pub fn uids(&self) -> impl Iterator<Item = Cow<'a, str>> + 'a {
        self.professions
            .values()
            .filter_map(|profession| profession.get("uid"))
            .map(|uid| match uid {
                Value::String(uid) => Cow::Borrowed(uid.as_str()),
                other => Cow::Owned(other.to_string()),
            })
    }
}

/// The sections of a worldbook the merge check evaluates.
#[derive(Debug, Clone, Copy)]
pub struct MergeView<'a> {
    pub academic: SystemView<'a>,
    pub entertainment: SystemView<'a>,
    pub locations: &'a Map<String, Value>,
    pub organizations: &'a Map<String, Value>,
    pub status_bar_integration: &'a Value,
    pub validation: Option<&'a Value>,
    pub bridging_lore: Option<&'a Value>,
}

impl<'a> MergeView<'a> {
    /// Narrow a parsed document to the sections the merge check reads.
    ///
    /// Fails on the first missing key, in the order the checklist reads them.
    pub fn from_value(root: &'a Value) -> Result<Self, WorldbookError> {
        let worldbook = require(root, "", "worldbook")?;
        let systems = require(worldbook, "worldbook", "careerSystems")?;

        let academic = SystemView::from_systems(systems, ACADEMIC)?;
        let entertainment = SystemView::from_systems(systems, ENTERTAINMENT)?;

        let shared = require(worldbook, "worldbook", "sharedResources")?;
        let locations = require_object(shared, "worldbook.sharedResources", "locations")?;
        let organizations = require_object(shared, "worldbook.sharedResources", "organizations")?;

        let status_bar_integration = require(worldbook, "worldbook", "statusBarIntegration")?;

        Ok(MergeView {
            academic,
            entertainment,
            locations,
            organizations,
            status_bar_integration,
            validation: worldbook.get("validation"),
            bridging_lore: worldbook.get("bridgingLore"),
        })
    }
}
