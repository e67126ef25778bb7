//! Portal CLI document generation.
//!
//! Produces one document per command selected in a module profile,
//! combining the selection with the command's spec entry.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::CliModule;
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::transfer::spec_location;
use crate::services::{PortalGenerator, SpecsManager};

/// Portal description of one CLI command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalCommand {
    /// Full invocation, e.g. `az network vnet create`.
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(default)]
    pub resource_ids: Vec<String>,
}

pub struct PortalCliGenerator {
    specs: Arc<dyn SpecsManager>,
    output_dir: Option<PathBuf>,
}

impl PortalCliGenerator {
    pub fn new(specs: Arc<dyn SpecsManager>, output_dir: Option<PathBuf>) -> Self {
        Self { specs, output_dir }
    }
}

impl PortalGenerator for PortalCliGenerator {
    fn generate(&self, module: &CliModule, profile: &str) -> ServiceResult<Vec<PortalCommand>> {
        let selection = module
            .profiles
            .get(profile)
            .ok_or_else(|| ServiceError::not_found("profile", profile))?;

        let mut documents = Vec::new();
        for command in selection.commands() {
            let (node_names, leaf_name) = spec_location(&command.names)?;
            let leaf = self.specs.find_leaf(&node_names, leaf_name)?;
            let version = leaf.version(&command.version).ok_or_else(|| {
                ServiceError::not_found(
                    "command version",
                    format!("{} {}", command.display_name(), command.version),
                )
            })?;

            documents.push(PortalCommand {
                name: format!("az {}", command.display_name()),
                version: version.name.clone(),
                help: leaf.help.clone(),
                resource_ids: version.resources.iter().map(|r| r.id.clone()).collect(),
            });
        }

        tracing::debug!(
            module = %module.name,
            profile,
            commands = documents.len(),
            "Portal commands generated"
        );
        Ok(documents)
    }

    fn write(&self, module: &str, commands: &[PortalCommand]) -> ServiceResult<PathBuf> {
        let dir = self
            .output_dir
            .as_ref()
            .ok_or_else(|| ServiceError::Unavailable("portal output path is not configured".into()))?;

        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.json", module));
        fs::write(&path, serde_json::to_vec_pretty(commands)?)?;

        tracing::info!(module, path = %path.display(), "Portal commands written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        CliCommand, CliCommandGroup, CommandTreeLeaf, CommandTreeNode, LeafVersion, ResourceRef,
    };
    use crate::services::specs::AazSpecsManager;
    use std::collections::BTreeMap;

    fn specs() -> Arc<dyn SpecsManager> {
        let leaf = CommandTreeLeaf {
            names: vec!["ssh".into(), "vm".into()],
            help: Some("SSH into a VM".into()),
            versions: vec![LeafVersion {
                name: "2022-01-01".into(),
                stage: None,
                resources: vec![ResourceRef {
                    id: "/subscriptions/{}/providers/microsoft.compute/virtualmachines/{}".into(),
                    version: "2022-01-01".into(),
                }],
            }],
        };
        let mut ssh = CommandTreeNode {
            names: vec!["ssh".into()],
            help: None,
            command_groups: BTreeMap::new(),
            commands: BTreeMap::new(),
        };
        ssh.commands.insert("vm".into(), leaf);
        let mut root = CommandTreeNode {
            names: vec!["aaz".into()],
            help: None,
            command_groups: BTreeMap::new(),
            commands: BTreeMap::new(),
        };
        root.command_groups.insert("ssh".into(), ssh);
        Arc::new(AazSpecsManager::from_tree(root, PathBuf::from("tree.json")))
    }

    fn module(version: &str) -> CliModule {
        let profiles = vec!["latest".to_string()];
        let mut module = CliModule::empty("ssh", &profiles);
        let mut group = CliCommandGroup {
            names: vec!["ssh".into()],
            help: None,
            command_groups: BTreeMap::new(),
            commands: BTreeMap::new(),
        };
        group.commands.insert(
            "vm".into(),
            CliCommand {
                names: vec!["ssh".into(), "vm".into()],
                version: version.into(),
                help: None,
            },
        );
        if let Some(latest) = module.profiles.get_mut("latest") {
            latest.command_groups.insert("ssh".into(), group);
        }
        module
    }

    #[test]
    fn test_generate_combines_selection_and_spec() {
        let generator = PortalCliGenerator::new(specs(), None);
        let docs = generator.generate(&module("2022-01-01"), "latest").unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name, "az ssh vm");
        assert_eq!(docs[0].help.as_deref(), Some("SSH into a VM"));
        assert_eq!(docs[0].resource_ids.len(), 1);
    }

    #[test]
    fn test_generate_fails_on_unknown_profile_or_version() {
        let generator = PortalCliGenerator::new(specs(), None);
        assert!(matches!(
            generator.generate(&module("2022-01-01"), "2019-03-01-hybrid"),
            Err(ServiceError::NotFound { kind: "profile", .. })
        ));
        assert!(matches!(
            generator.generate(&module("2018-01-01"), "latest"),
            Err(ServiceError::NotFound { kind: "command version", .. })
        ));
    }

    #[test]
    fn test_write_requires_output_dir() {
        let generator = PortalCliGenerator::new(specs(), None);
        assert!(matches!(generator.write("ssh", &[]), Err(ServiceError::Unavailable(_))));

        let dir = tempfile::tempdir().unwrap();
        let generator = PortalCliGenerator::new(specs(), Some(dir.path().join("portal")));
        let path = generator.write("ssh", &[]).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "[]");
    }
}
