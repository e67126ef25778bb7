//! `/CLI/Portal` route group: portal document generation.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{parse_repo, ProfileQuery};
use crate::http::response::ApiResult;
use crate::model::CliRepo;
use crate::routing::group::{GroupBuilder, GroupRoutes, RouteGroup};
use crate::services::{ModuleManagers, PortalCommand, PortalGenerator};

#[derive(Clone)]
struct PortalState {
    modules: ModuleManagers,
    portal: Arc<dyn PortalGenerator>,
    default_profile: String,
}

/// Route group for the portal CLI generator.
pub struct PortalGroup {
    state: PortalState,
}

impl PortalGroup {
    pub fn new(modules: ModuleManagers, portal: Arc<dyn PortalGenerator>, default_profile: String) -> Self {
        Self {
            state: PortalState {
                modules,
                portal,
                default_profile,
            },
        }
    }
}

impl RouteGroup for PortalGroup {
    fn name(&self) -> &'static str {
        "portal"
    }

    fn prefix(&self) -> &'static str {
        "/CLI/Portal"
    }

    fn build(&self) -> GroupRoutes {
        GroupBuilder::new()
            .get("/{repo}/Modules/{module}/Commands", preview)
            .post("/Generate", generate)
            .finish(self.state.clone())
    }
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    repo: CliRepo,
    module: String,
    #[serde(default)]
    profile: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    module: String,
    profile: String,
    output: String,
    commands: Vec<PortalCommand>,
}

async fn preview(
    State(state): State<PortalState>,
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

async fn generate(
    State(state): State<PortalState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> ApiResult<Json<GenerateResponse>> {
    let Json(request) = payload?;
    let profile = request.profile.unwrap_or(state.default_profile);

    let module = state.modules.for_repo(request.repo).load_module(&request.module)?;
    let commands = state.portal.generate(&module, &profile)?;
    let output = state.portal.write(&module.name, &commands)?;

    Ok(Json(GenerateResponse {
        module: module.name,
        profile,
        output: output.display().to_string(),
        commands,
    }))
}
