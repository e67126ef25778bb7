//! Route lookup over the registered groups.
//!
//! # Responsibilities
//! - Store every registered (group, method, path) in registration order
//! - Look up the group owning a request path
//! - Return the owning group or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after registration (thread-safe without locks)
//! - O(n) prefix scan (acceptable for a handful of groups)
//! - Prefixes are disjoint, so at most one group can match

use axum::http::Method;

use crate::routing::group::OperationBinding;
use crate::routing::matcher::PathPrefixMatcher;

/// A fully-qualified registered route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub group: &'static str,
    pub method: Method,
    pub path: String,
}

/// Frozen view of everything the registry attached.
#[derive(Debug, Default, Clone)]
pub struct RoutingTable {
    groups: Vec<(&'static str, PathPrefixMatcher)>,
    entries: Vec<RouteEntry>,
}

impl RoutingTable {
    pub(crate) fn push_group(
        &mut self,
        group: &'static str,
        prefix: &'static str,
        operations: &[OperationBinding],
    ) {
        self.groups.push((group, PathPrefixMatcher::new(prefix)));
        for op in operations {
            let path = if op.path == "/" {
                prefix.to_string()
            } else {
                format!("{}{}", prefix, op.path)
            };
            self.entries.push(RouteEntry {
                group,
                method: op.method.clone(),
                path,
            });
        }
    }

    /// Group names in registration order.
    pub fn groups(&self) -> Vec<&'static str> {
        self.groups.iter().map(|(name, _)| *name).collect()
    }

    /// Top-level prefixes in registration order.
    pub fn prefixes(&self) -> Vec<&str> {
        self.groups.iter().map(|(_, m)| m.prefix()).collect()
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// The group whose prefix owns `path`, if any.
    pub fn owner_of(&self, path: &str) -> Option<&'static str> {
        self.groups
            .iter()
            .find(|(_, matcher)| matcher.matches_path(path))
            .map(|(name, _)| *name)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_lookup() {
        let mut table = RoutingTable::default();
        table.push_group(
            "ps",
            "/CLI/PS",
            &[OperationBinding {
                method: Method::GET,
                path: "/{repo}/Modules",
            }],
        );
        table.push_group(
            "portal",
            "/CLI/Portal",
            &[OperationBinding {
                method: Method::POST,
                path: "/Generate",
            }],
        );

        assert_eq!(table.owner_of("/CLI/PS/Main/Modules"), Some("ps"));
        assert_eq!(table.owner_of("/CLI/Portal/Generate"), Some("portal"));
        assert_eq!(table.owner_of("/CLI/Az/Profiles"), None);
        assert_eq!(table.entries()[0].path, "/CLI/PS/{repo}/Modules");
        assert_eq!(table.prefixes(), vec!["/CLI/PS", "/CLI/Portal"]);
    }
}
