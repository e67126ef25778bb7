//! Command specification store backed by the aaz repository.
//!
//! # Responsibilities
//! - Load `Commands/tree.json` once at startup
//! - Resolve command groups and commands by name path
//!
//! # Design Decisions
//! - The tree is immutable after load; lookups need no locking
//! - A missing or unreadable tree fails startup rather than serving empty data

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::model::{CommandTreeLeaf, CommandTreeNode, ROOT_NODE};
use crate::services::error::{InitError, ServiceError, ServiceResult};
use crate::services::SpecsManager;

/// Read-only view of the aaz command tree.
#[derive(Debug)]
pub struct AazSpecsManager {
    root: CommandTreeNode,
    tree_path: PathBuf,
}

impl AazSpecsManager {
    /// Open the aaz repository at `aaz_path`.
    pub fn open(aaz_path: &Path) -> Result<Self, InitError> {
        if !aaz_path.is_dir() {
            return Err(InitError::MissingDirectory {
                what: "aaz",
                path: aaz_path.to_path_buf(),
            });
        }

        let tree_path = aaz_path.join("Commands").join("tree.json");
        if !tree_path.is_file() {
            return Err(InitError::MissingTree { path: tree_path });
        }

        let root = read_tree(&tree_path).map_err(|source| InitError::Load {
            path: tree_path.clone(),
            source,
        })?;

        tracing::info!(
            path = %tree_path.display(),
            command_groups = root.command_groups.len(),
            "Command tree loaded"
        );

        Ok(Self::from_tree(root, tree_path))
    }

    /// Wrap an already-loaded tree.
    pub fn from_tree(root: CommandTreeNode, tree_path: PathBuf) -> Self {
        Self { root, tree_path }
    }

    pub fn tree_path(&self) -> &Path {
        &self.tree_path
    }

    fn walk(&self, names: &[String]) -> ServiceResult<&CommandTreeNode> {
        let (first, rest) = names
            .split_first()
            .ok_or_else(|| ServiceError::invalid("command group path must not be empty"))?;
        if first != ROOT_NODE {
            return Err(ServiceError::not_found("command group", names.join(" ")));
        }

        let mut node = &self.root;
        for name in rest {
            node = node
                .command_groups
                .get(name)
                .ok_or_else(|| ServiceError::not_found("command group", names.join(" ")))?;
        }
        Ok(node)
    }
}

fn read_tree(path: &Path) -> ServiceResult<CommandTreeNode> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

impl SpecsManager for AazSpecsManager {
    fn find_node(&self, names: &[String]) -> ServiceResult<CommandTreeNode> {
        self.walk(names).cloned()
    }

    fn find_leaf(&self, node_names: &[String], leaf: &str) -> ServiceResult<CommandTreeLeaf> {
        let node = self.walk(node_names)?;
        node.commands.get(leaf).cloned().ok_or_else(|| {
            let mut full = node_names.to_vec();
            full.push(leaf.to_string());
            ServiceError::not_found("command", full.join(" "))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const TREE: &str = r#"{
        "names": ["aaz"],
        "commandGroups": {
            "network": {
                "names": ["network"],
                "commandGroups": {
                    "vnet": {
                        "names": ["network", "vnet"],
                        "commands": {
                            "create": {
                                "names": ["network", "vnet", "create"],
                                "versions": [{"name": "2021-05-01"}]
                            }
                        }
                    }
                }
            }
        }
    }"#;

    fn names(path: &[&str]) -> Vec<String> {
        path.iter().map(|s| s.to_string()).collect()
    }

    fn open_fixture() -> (tempfile::TempDir, AazSpecsManager) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Commands")).unwrap();
        fs::write(dir.path().join("Commands/tree.json"), TREE).unwrap();
        let specs = AazSpecsManager::open(dir.path()).unwrap();
        (dir, specs)
    }

    #[test]
    fn test_find_node_and_leaf() {
        let (_dir, specs) = open_fixture();

        let node = specs.find_node(&names(&["aaz", "network", "vnet"])).unwrap();
        assert_eq!(node.names, names(&["network", "vnet"]));

        let leaf = specs.find_leaf(&names(&["aaz", "network", "vnet"]), "create").unwrap();
        assert_eq!(leaf.versions[0].name, "2021-05-01");
    }

    #[test]
    fn test_unknown_paths_are_not_found() {
        let (_dir, specs) = open_fixture();

        let err = specs.find_node(&names(&["aaz", "storage"])).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { kind: "command group", .. }));

        let err = specs.find_node(&names(&["network"])).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));

        let err = specs.find_leaf(&names(&["aaz", "network", "vnet"]), "delete").unwrap_err();
        assert_eq!(err.to_string(), "command 'aaz network vnet delete' not found");
    }

    #[test]
    fn test_empty_path_is_invalid() {
        let (_dir, specs) = open_fixture();
        assert!(matches!(specs.find_node(&[]), Err(ServiceError::InvalidInput(_))));
    }

    #[test]
    fn test_open_fails_without_tree() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(AazSpecsManager::open(dir.path()), Err(InitError::MissingTree { .. })));
        assert!(matches!(
            AazSpecsManager::open(&dir.path().join("missing")),
            Err(InitError::MissingDirectory { .. })
        ));
    }

    #[test]
    fn test_open_fails_on_corrupt_tree() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Commands")).unwrap();
        fs::write(dir.path().join("Commands/tree.json"), "{not json").unwrap();
        assert!(matches!(AazSpecsManager::open(dir.path()), Err(InitError::Load { .. })));
    }
}
