//! Conversion of spec tree entries into CLI module selections.

use crate::model::{CliCommand, CliCommandGroup, CommandTreeLeaf, CommandTreeNode};
use crate::services::error::{ServiceError, ServiceResult};

/// Convert a spec command group into an empty CLI group.
///
/// Only the group itself is transferred. Its commands are selected one by
/// one through [`transfer_leaf`], so nothing below the group is pinned to a
/// version the caller did not choose.
pub fn transfer_node(node: &CommandTreeNode) -> CliCommandGroup {
    CliCommandGroup::shell(node.names.clone(), node.help.clone())
}

/// Convert a spec command into a CLI command pinned to `version`.
pub fn transfer_leaf(leaf: &CommandTreeLeaf, version: &str) -> ServiceResult<CliCommand> {
    if leaf.version(version).is_none() {
        return Err(ServiceError::not_found(
            "command version",
            format!("{} {}", leaf.names.join(" "), version),
        ));
    }
    Ok(to_command(leaf, version))
}

fn to_command(leaf: &CommandTreeLeaf, version: &str) -> CliCommand {
    CliCommand {
        names: leaf.names.clone(),
        version: version.to_string(),
        help: leaf.help.clone(),
    }
}

/// Split a command's names into the spec node path (rooted at `aaz`) and
/// the leaf name.
pub fn spec_location(names: &[String]) -> ServiceResult<(Vec<String>, &str)> {
    let (leaf, groups) = names
        .split_last()
        .ok_or_else(|| ServiceError::invalid("command names must not be empty"))?;
    let mut node_names = Vec::with_capacity(groups.len() + 1);
    node_names.push(crate::model::ROOT_NODE.to_string());
    node_names.extend(groups.iter().cloned());
    Ok((node_names, leaf.as_str()))
}
