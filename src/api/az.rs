//! `/CLI/Az` route group.
//!
//! # Operations
//! ```text
//! GET   /Profiles                              configured CLI profiles
//! GET   /{repo}/Modules                        list modules
//! POST  /{repo}/Modules                        create module
//! GET   /{repo}/Modules/{module}               load module
//! PUT   /{repo}/Modules/{module}               replace profile selections
//! PATCH /{repo}/Modules/{module}               replace the given profiles only
//! POST  /AAZ/Specs/CommandTree/Nodes/{*tail}   transfer a spec node or leaf
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::api::{parse_repo, parse_transfer_path, TransferTarget};
use crate::http::response::ApiResult;
use crate::model::{CliModule, CliProfile, ModuleSummary};
use crate::routing::group::{GroupBuilder, GroupRoutes, RouteGroup};
use crate::services::transfer::{transfer_leaf, transfer_node};
use crate::services::{ModuleManagers, SpecsManager};

#[derive(Clone)]
struct AzState {
    modules: ModuleManagers,
    specs: Arc<dyn SpecsManager>,
    profiles: Arc<[String]>,
}

/// Route group for az CLI modules.
pub struct AzGroup {
    state: AzState,
}

impl AzGroup {
    pub fn new(modules: ModuleManagers, specs: Arc<dyn SpecsManager>, profiles: Arc<[String]>) -> Self {
        Self {
            state: AzState {
                modules,
                specs,
                profiles,
            },
        }
    }
}

impl RouteGroup for AzGroup {
    fn name(&self) -> &'static str {
        "az"
    }

    fn prefix(&self) -> &'static str {
        "/CLI/Az"
    }

    fn build(&self) -> GroupRoutes {
        GroupBuilder::new()
            .get("/Profiles", list_profiles)
            .get("/{repo}/Modules", list_modules)
            .post("/{repo}/Modules", create_module)
            .get("/{repo}/Modules/{module}", get_module)
            .put("/{repo}/Modules/{module}", update_module)
            .patch("/{repo}/Modules/{module}", patch_module)
            .post("/AAZ/Specs/CommandTree/Nodes/{*tail}", transfer)
            .finish(self.state.clone())
    }
}

#[derive(Debug, Deserialize)]
struct CreateModuleRequest {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ProfilesRequest {
    profiles: BTreeMap<String, CliProfile>,
}

async fn list_profiles(State(state): State<AzState>) -> Json<Vec<String>> {
    Json(state.profiles.to_vec())
}

async fn list_modules(
    State(state): State<AzState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Vec<ModuleSummary>>> {
    let Path(repo) = path?;
    let repo = parse_repo(&repo)?;
    Ok(Json(state.modules.for_repo(repo).list_modules()?))
}

async fn create_module(
    State(state): State<AzState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<CreateModuleRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CliModule>)> {
    let Path(repo) = path?;
    let repo = parse_repo(&repo)?;
    let Json(request) = payload?;
    let module = state.modules.for_repo(repo).create_module(&request.name)?;
    Ok((StatusCode::CREATED, Json(module)))
}

async fn get_module(
    State(state): State<AzState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> ApiResult<Json<CliModule>> {
    let Path((repo, module)) = path?;
    let repo = parse_repo(&repo)?;
    Ok(Json(state.modules.for_repo(repo).load_module(&module)?))
}

async fn update_module(
    State(state): State<AzState>,
    path: Result<Path<(String, String)>, PathRejection>,
    payload: Result<Json<ProfilesRequest>, JsonRejection>,
) -> ApiResult<Json<CliModule>> {
    let Path((repo, module)) = path?;
    let repo = parse_repo(&repo)?;
    let Json(request) = payload?;
    let manager = state.modules.for_repo(repo);
    Ok(Json(manager.update_module(&module, request.profiles)?))
}

async fn patch_module(
    State(state): State<AzState>,
    path: Result<Path<(String, String)>, PathRejection>,
    payload: Result<Json<ProfilesRequest>, JsonRejection>,
) -> ApiResult<Json<CliModule>> {
    let Path((repo, module)) = path?;
    let repo = parse_repo(&repo)?;
    let Json(request) = payload?;
    let manager = state.modules.for_repo(repo);
    Ok(Json(manager.patch_module(&module, request.profiles)?))
}

async fn transfer(
    State(state): State<AzState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Response> {
    let Path(tail) = path?;
    match parse_transfer_path(&tail)? {
        TransferTarget::Node(names) => {
            let node = state.specs.find_node(&names)?;
            Ok(Json(transfer_node(&node)).into_response())
        }
        TransferTarget::Leaf {
            node,
            leaf,
            version,
        } => {
            let leaf = state.specs.find_leaf(&node, &leaf)?;
            Ok(Json(transfer_leaf(&leaf, &version)?).into_response())
        }
    }
}
