//! Deserializable representation of one dumped command document.
//!
//! Each `<command>.json` file under a version directory holds the entry the
//! server reported for that command in its `listCommands` response. Fields the
//! server did not report fall back to their zero value so documents from very
//! old releases still load.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Metadata for a single command in a single release.
pub struct CommandRecord {
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub requires_auth: bool,
    #[serde(default, alias = "slaveOk")]
    pub secondary_ok: bool,
    #[serde(default)]
    pub admin_only: bool,
    #[serde(default)]
    pub api_versions: Vec<Value>,
    #[serde(default)]
    pub deprecated_api_versions: Vec<Value>,
}

/// Command name to record for exactly one release.
#[derive(Clone, Debug, Default)]
pub struct VersionCatalog {
    commands: BTreeMap<String, CommandRecord>,
}

impl VersionCatalog {
    pub fn insert(&mut self, name: impl Into<String>, record: CommandRecord) {
        self.commands.insert(name.into(), record);
    }

    /// Look up a command by its exact name.
    pub fn command(&self, name: &str) -> Option<&CommandRecord> {
        self.commands.get(name)
    }

    /// Command names in stable order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl FromIterator<(String, CommandRecord)> for VersionCatalog {
    fn from_iter<I: IntoIterator<Item = (String, CommandRecord)>>(iter: I) -> Self {
        Self {
            commands: iter.into_iter().collect(),
        }
    }
}
