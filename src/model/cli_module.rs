//! CLI module view: which spec commands a module exposes, per profile.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Repository a CLI module lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CliRepo {
    /// The azure-cli repository.
    Main,
    /// The azure-cli-extensions repository.
    Extension,
}

impl CliRepo {
    pub fn as_str(&self) -> &'static str {
        match self {
            CliRepo::Main => "Main",
            CliRepo::Extension => "Extension",
        }
    }
}

impl fmt::Display for CliRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a repo segment is neither `Main` nor `Extension`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRepo(pub String);

impl fmt::Display for UnknownRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown repo '{}', expected 'Main' or 'Extension'", self.0)
    }
}

impl std::error::Error for UnknownRepo {}

impl FromStr for CliRepo {
    type Err = UnknownRepo;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Main" => Ok(CliRepo::Main),
            "Extension" => Ok(CliRepo::Extension),
            other => Err(UnknownRepo(other.to_string())),
        }
    }
}

/// Listing entry for a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSummary {
    pub name: String,
    pub folder: String,
    pub repo: CliRepo,
}

/// A CLI module and its command selection per profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliModule {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,

    #[serde(default)]
    pub profiles: BTreeMap<String, CliProfile>,
}

impl CliModule {
    /// A module with an empty selection for every given profile.
    pub fn empty<'a>(name: &str, profiles: impl IntoIterator<Item = &'a String>) -> Self {
        Self {
            name: name.to_string(),
            folder: None,
            profiles: profiles
                .into_iter()
                .map(|p| (p.clone(), CliProfile::new(p)))
                .collect(),
        }
    }
}

/// Commands selected for one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliProfile {
    pub name: String,

    #[serde(default)]
    pub command_groups: BTreeMap<String, CliCommandGroup>,
}

impl CliProfile {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            command_groups: BTreeMap::new(),
        }
    }

    /// All commands in the profile, depth first in name order.
    pub fn commands(&self) -> Vec<&CliCommand> {
        let mut out = Vec::new();
        for group in self.command_groups.values() {
            group.collect_commands(&mut out);
        }
        out
    }

    /// Visit every command mutably.
    pub fn for_each_command_mut(&mut self, f: &mut impl FnMut(&mut CliCommand)) {
        for group in self.command_groups.values_mut() {
            group.for_each_command_mut(f);
        }
    }
}

/// A command group selected into a profile.
///
/// Groups are added as empty shells and filled one command at a time, so
/// empty children are omitted from the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliCommandGroup {
    pub names: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub command_groups: BTreeMap<String, CliCommandGroup>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub commands: BTreeMap<String, CliCommand>,
}

impl CliCommandGroup {
    /// A group with no selected children.
    pub fn shell(names: Vec<String>, help: Option<String>) -> Self {
        Self {
            names,
            help,
            command_groups: BTreeMap::new(),
            commands: BTreeMap::new(),
        }
    }

    fn collect_commands<'a>(&'a self, out: &mut Vec<&'a CliCommand>) {
        out.extend(self.commands.values());
        for group in self.command_groups.values() {
            group.collect_commands(out);
        }
    }

    fn for_each_command_mut(&mut self, f: &mut impl FnMut(&mut CliCommand)) {
        for command in self.commands.values_mut() {
            f(command);
        }
        for group in self.command_groups.values_mut() {
            group.for_each_command_mut(f);
        }
    }
}

/// A command pinned to one spec version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliCommand {
    pub names: Vec<String>,
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl CliCommand {
    /// Space separated command name, e.g. `network vnet create`.
    pub fn display_name(&self) -> String {
        self.names.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(names: &[&str]) -> CliCommand {
        CliCommand {
            names: names.iter().map(|s| s.to_string()).collect(),
            version: "2022-01-01".into(),
            help: None,
        }
    }

    fn sample_profile() -> CliProfile {
        let mut vnet = CliCommandGroup::shell(vec!["network".into(), "vnet".into()], None);
        vnet.commands.insert("create".into(), command(&["network", "vnet", "create"]));
        let mut network = CliCommandGroup::shell(vec!["network".into()], None);
        network.commands.insert("list-usages".into(), command(&["network", "list-usages"]));
        network.command_groups.insert("vnet".into(), vnet);

        let mut profile = CliProfile::new("latest");
        profile.command_groups.insert("network".into(), network);
        profile
    }

    #[test]
    fn test_repo_parsing() {
        assert_eq!("Main".parse::<CliRepo>().unwrap(), CliRepo::Main);
        assert_eq!("Extension".parse::<CliRepo>().unwrap(), CliRepo::Extension);
        assert!("main".parse::<CliRepo>().is_err());
    }

    #[test]
    fn test_profile_commands_depth_first() {
        let profile = sample_profile();
        let names: Vec<_> = profile.commands().iter().map(|c| c.display_name()).collect();
        assert_eq!(names, vec!["network list-usages", "network vnet create"]);
    }

    #[test]
    fn test_for_each_command_mut_reaches_nested() {
        let mut profile = sample_profile();
        profile.for_each_command_mut(&mut |c| c.help = Some("x".into()));
        assert!(profile.commands().iter().all(|c| c.help.as_deref() == Some("x")));
    }

    #[test]
    fn test_shell_group_omits_empty_children() {
        let group = CliCommandGroup::shell(vec!["network".into()], Some("Manage networks.".into()));
        let value = serde_json::to_value(&group).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "names": ["network"], "help": "Manage networks." })
        );

        let parsed: CliCommandGroup = serde_json::from_value(serde_json::json!({ "names": ["network"] })).unwrap();
        assert_eq!(parsed, CliCommandGroup::shell(vec!["network".into()], None));
    }

    #[test]
    fn test_empty_module_has_every_profile() {
        let profiles = vec!["latest".to_string(), "2020-09-01-hybrid".to_string()];
        let module = CliModule::empty("network", &profiles);
        assert_eq!(module.profiles.len(), 2);
        assert!(module.profiles["latest"].command_groups.is_empty());
    }
}
