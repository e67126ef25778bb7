//! Domain types shared by the backend services and the route groups.
//!
//! # Contents
//! - command_tree.rs: read-only command specifications (nodes, leaves, versions)
//! - cli_module.rs: per-profile command selections of a CLI module

pub mod cli_module;
pub mod command_tree;

pub use cli_module::{CliCommand, CliCommandGroup, CliModule, CliProfile, CliRepo, ModuleSummary};
pub use command_tree::{CommandTreeLeaf, CommandTreeNode, LeafVersion, ResourceRef, ROOT_NODE};
