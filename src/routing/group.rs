//! Route group definition.
//!
//! A route group exposes one platform's operations under a fixed prefix.
//! Groups declare their operations through [`GroupBuilder`], which records
//! an [`OperationBinding`] for every route it adds, so the registry can
//! validate a group before attaching it.

use axum::handler::Handler;
use axum::http::Method;
use axum::routing::{self, MethodRouter};
use axum::Router;

/// One `(method, path)` pair a group serves, relative to its prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationBinding {
    pub method: Method,
    pub path: &'static str,
}

/// Static description of a route group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGroupDescriptor {
    pub name: &'static str,
    pub prefix: &'static str,
    pub operations: Vec<OperationBinding>,
}

/// A self-contained set of operations under one URL prefix.
pub trait RouteGroup: Send + Sync {
    /// Group name used in logs, metrics and errors.
    fn name(&self) -> &'static str;

    /// Prefix the group is nested under, e.g. `/CLI/PS`.
    fn prefix(&self) -> &'static str;

    /// Build the group's router with its backends bound.
    fn build(&self) -> GroupRoutes;
}

/// A built group: its router plus what it declared.
pub struct GroupRoutes {
    pub(crate) router: Router,
    pub(crate) operations: Vec<OperationBinding>,
    pub(crate) duplicates: Vec<OperationBinding>,
}

impl GroupRoutes {
    pub fn operations(&self) -> &[OperationBinding] {
        &self.operations
    }
}

/// Collects a group's routes and their bindings.
///
/// A `(method, path)` declared twice is not added to the router; it is
/// recorded so registration can fail with a descriptive error instead.
pub struct GroupBuilder<S> {
    router: Router<S>,
    operations: Vec<OperationBinding>,
    duplicates: Vec<OperationBinding>,
}

impl<S> Default for GroupBuilder<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> GroupBuilder<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            operations: Vec::new(),
            duplicates: Vec::new(),
        }
    }

    pub fn get<H, T>(self, path: &'static str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.add(Method::GET, path, routing::get(handler))
    }

    pub fn post<H, T>(self, path: &'static str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.add(Method::POST, path, routing::post(handler))
    }

    pub fn put<H, T>(self, path: &'static str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.add(Method::PUT, path, routing::put(handler))
    }

    pub fn patch<H, T>(self, path: &'static str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.add(Method::PATCH, path, routing::patch(handler))
    }

    pub fn delete<H, T>(self, path: &'static str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.add(Method::DELETE, path, routing::delete(handler))
    }

    fn add(mut self, method: Method, path: &'static str, route: MethodRouter<S>) -> Self {
        let binding = OperationBinding { method, path };
        if self.operations.contains(&binding) {
            self.duplicates.push(binding);
            return self;
        }
        self.router = self.router.route(path, route);
        self.operations.push(binding);
        self
    }

    /// Bind the group's state and freeze its routes.
    pub fn finish(self, state: S) -> GroupRoutes {
        GroupRoutes {
            router: self.router.with_state(state),
            operations: self.operations,
            duplicates: self.duplicates,
        }
    }
}
