//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route group (api/*)
//!     → group.rs (declare operations, build the group's sub-router)
//!     → registry.rs (validate every group, then nest under its prefix)
//!     → router.rs (frozen table: prefixes, operations, owner lookup)
//!     → matcher.rs (segment-aware prefix matching)
//! ```
//!
//! # Design Decisions
//! - Groups registered at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: registration order is declaration order
//! - Prefixes are disjoint, so at most one group owns a path

pub mod group;
pub mod matcher;
pub mod registry;
pub mod router;

pub use group::{GroupBuilder, GroupRoutes, OperationBinding, RouteGroup, RouteGroupDescriptor};
pub use matcher::PathPrefixMatcher;
pub use registry::{Registered, Registry, RegistryError};
pub use router::{RouteEntry, RoutingTable};
