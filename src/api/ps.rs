//! `/CLI/PS` route group: the PowerShell module view.
//!
//! Reads az modules through the module managers, queries the spec tree and
//! runs the portal generator for a module without persisting its output.

use std::sync::Arc;

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;

use crate::api::{node_names, parse_repo, ProfileQuery};
use crate::http::response::ApiResult;
use crate::model::{CliModule, CommandTreeNode, ModuleSummary};
use crate::routing::group::{GroupBuilder, GroupRoutes, RouteGroup};
use crate::services::{ModuleManagers, PortalCommand, PortalGenerator, SpecsManager};

#[derive(Clone)]
struct PsState {
    modules: ModuleManagers,
    specs: Arc<dyn SpecsManager>,
    portal: Arc<dyn PortalGenerator>,
    default_profile: String,
}

/// Route group for PowerShell module operations.
pub struct PsGroup {
    state: PsState,
}

impl PsGroup {
    pub fn new(
        modules: ModuleManagers,
        specs: Arc<dyn SpecsManager>,
        portal: Arc<dyn PortalGenerator>,
        default_profile: String,
    ) -> Self {
        Self {
            state: PsState {
                modules,
                specs,
                portal,
                default_profile,
            },
        }
    }
}

impl RouteGroup for PsGroup {
    fn name(&self) -> &'static str {
        "ps"
    }

    fn prefix(&self) -> &'static str {
        "/CLI/PS"
    }

    fn build(&self) -> GroupRoutes {
        GroupBuilder::new()
            .get("/{repo}/Modules", list_modules)
            .get("/{repo}/Modules/{module}", get_module)
            .post("/{repo}/Modules/{module}/Portal", generate_portal)
            .get("/AAZ/Specs/CommandTree/Nodes/{*names}", get_node)
            .finish(self.state.clone())
    }
}

async fn list_modules(
    State(state): State<PsState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Vec<ModuleSummary>>> {
    let Path(repo) = path?;
    let repo = parse_repo(&repo)?;
    Ok(Json(state.modules.for_repo(repo).list_modules()?))
}

async fn get_module(
    State(state): State<PsState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> ApiResult<Json<CliModule>> {
    let Path((repo, module)) = path?;
    let repo = parse_repo(&repo)?;
    Ok(Json(state.modules.for_repo(repo).load_module(&module)?))
}

async fn generate_portal(
    State(state): State<PsState>,
    path: Result<Path<(String, String)>, PathRejection>,
    query: Result<Query<ProfileQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<PortalCommand>>> {
    let Path((repo, module)) = path?;
    let repo = parse_repo(&repo)?;
    let Query(query) = query?;
    let profile = query.profile.unwrap_or(state.default_profile);

    let module = state.modules.for_repo(repo).load_module(&module)?;
    Ok(Json(state.portal.generate(&module, &profile)?))
}

async fn get_node(
    State(state): State<PsState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<CommandTreeNode>> {
    let Path(names) = path?;
    Ok(Json(state.specs.find_node(&node_names(&names))?))
}
