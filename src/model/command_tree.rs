//! Normalized command specifications, as stored in the aaz repository's
//! command tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Name of the tree's root node.
pub const ROOT_NODE: &str = "aaz";

/// A command group in the specification tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandTreeNode {
    /// Full name path without the root (`["network", "vnet"]`). The root
    /// itself is named `["aaz"]`.
    pub names: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    #[serde(default)]
    pub command_groups: BTreeMap<String, CommandTreeNode>,

    #[serde(default)]
    pub commands: BTreeMap<String, CommandTreeLeaf>,
}

/// A single command in the specification tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandTreeLeaf {
    pub names: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    #[serde(default)]
    pub versions: Vec<LeafVersion>,
}

impl CommandTreeLeaf {
    /// Look up a version by name.
    pub fn version(&self, name: &str) -> Option<&LeafVersion> {
        self.versions.iter().find(|v| v.name == name)
    }
}

/// One API version a command is available in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafVersion {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,

    #[serde(default)]
    pub resources: Vec<ResourceRef>,
}

/// A swagger resource backing a command version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub id: String,
    pub version: String,
}
