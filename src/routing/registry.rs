//! Route group registry.
//!
//! # Responsibilities
//! - Hold the fixed, ordered list of route groups
//! - Validate every group before touching the service router
//! - Nest each group under its prefix and produce the routing table
//!
//! # Design Decisions
//! - Groups are listed statically; order is declaration order
//! - Overlapping prefixes are rejected, so no group ever shadows another
//! - All validation runs before the first group is attached: either every
//!   group is registered or none is
//! - `register` consumes the registry, so it runs once per instance

use axum::http::Method;
use axum::Router;
use thiserror::Error;

use crate::api::{AzGroup, CmdsGroup, PortalGroup, PsGroup};
use crate::observability::metrics;
use crate::routing::group::{GroupRoutes, RouteGroup, RouteGroupDescriptor};
use crate::routing::matcher::PathPrefixMatcher;
use crate::routing::router::RoutingTable;
use crate::services::Backends;

/// Why registration was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("route group '{group}' has invalid prefix '{prefix}': {reason}")]
    InvalidPrefix {
        group: &'static str,
        prefix: &'static str,
        reason: &'static str,
    },

    #[error("route group '{second}' prefix '{second_prefix}' overlaps route group '{first}' prefix '{first_prefix}'")]
    PrefixCollision {
        first: &'static str,
        first_prefix: &'static str,
        second: &'static str,
        second_prefix: &'static str,
    },

    #[error("route group '{group}' declares {method} {path} more than once")]
    DuplicateOperation {
        group: &'static str,
        method: Method,
        path: &'static str,
    },

    #[error("route group '{group}' declares no operations")]
    EmptyGroup { group: &'static str },
}

/// Result of a successful registration.
pub struct Registered {
    /// The service router with every group attached.
    pub router: Router,
    pub table: RoutingTable,
}

/// Ordered collection of route groups.
#[derive(Default)]
pub struct Registry {
    groups: Vec<Box<dyn RouteGroup>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a group; it is registered after every group added before it.
    pub fn with_group(mut self, group: impl RouteGroup + 'static) -> Self {
        self.groups.push(Box::new(group));
        self
    }

    /// The four platform groups wired to the given backends:
    /// `_cmds`, `az`, `ps`, `portal`, in that order.
    pub fn standard(backends: &Backends) -> Self {
        Self::new()
            .with_group(CmdsGroup::new(backends.modules.clone(), backends.specs.clone()))
            .with_group(AzGroup::new(
                backends.modules.clone(),
                backends.specs.clone(),
                backends.profiles.clone(),
            ))
            .with_group(PsGroup::new(
                backends.modules.clone(),
                backends.specs.clone(),
                backends.portal.clone(),
                backends.default_profile.clone(),
            ))
            .with_group(PortalGroup::new(
                backends.modules.clone(),
                backends.portal.clone(),
                backends.default_profile.clone(),
            ))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Describe every group without registering anything.
    pub fn descriptors(&self) -> Vec<RouteGroupDescriptor> {
        self.groups
            .iter()
            .map(|group| RouteGroupDescriptor {
                name: group.name(),
                prefix: group.prefix(),
                operations: group.build().operations,
            })
            .collect()
    }

    /// Build the service router with every group nested under its prefix.
    ///
    /// The router starts empty, so validated prefixes are the only routes
    /// and nesting cannot collide with anything.
    pub fn register(self) -> Result<Registered, RegistryError> {
        let mut validated: Vec<(&'static str, &'static str, GroupRoutes)> =
            Vec::with_capacity(self.groups.len());

        for group in &self.groups {
            let name = group.name();
            let prefix = group.prefix();
            validate_prefix(name, prefix)?;

            let matcher = PathPrefixMatcher::new(prefix);
            if let Some((first, first_prefix, _)) = validated
                .iter()
                .find(|(_, other, _)| matcher.overlaps(&PathPrefixMatcher::new(*other)))
            {
                return Err(RegistryError::PrefixCollision {
                    first: *first,
                    first_prefix: *first_prefix,
                    second: name,
                    second_prefix: prefix,
                });
            }

            let routes = group.build();
            if let Some(dup) = routes.duplicates.first() {
                return Err(RegistryError::DuplicateOperation {
                    group: name,
                    method: dup.method.clone(),
                    path: dup.path,
                });
            }
            if routes.operations.is_empty() {
                return Err(RegistryError::EmptyGroup { group: name });
            }

            validated.push((name, prefix, routes));
        }

        let mut router = Router::new();
        let mut table = RoutingTable::default();
        for (name, prefix, routes) in validated {
            tracing::info!(
                group = name,
                prefix,
                operations = routes.operations.len(),
                "Route group registered"
            );
            table.push_group(name, prefix, &routes.operations);
            router = router.nest(prefix, routes.router);
        }

        metrics::record_groups_registered(table.groups().len());
        Ok(Registered { router, table })
    }
}

fn validate_prefix(group: &'static str, prefix: &'static str) -> Result<(), RegistryError> {
    let reason = if !prefix.starts_with('/') {
        Some("must start with '/'")
    } else if prefix == "/" {
        Some("must not be the root")
    } else if prefix.ends_with('/') {
        Some("must not end with '/'")
    } else if prefix.contains(['{', '}', '*']) {
        Some("must not contain path parameters")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(RegistryError::InvalidPrefix {
            group,
            prefix,
            reason,
        }),
        None => Ok(()),
    }
}
