//! `/CLI/_cmds` route group: repository maintenance commands.
//!
//! `Regenerate` re-reads every selected command from the spec tree,
//! refreshes its help text and saves the module. `Verify` does the same
//! without saving. Both report commands whose pinned version no longer
//! exists in the tree.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::http::response::ApiResult;
use crate::model::{CliCommand, CliModule, CliRepo};
use crate::routing::group::{GroupBuilder, GroupRoutes, RouteGroup};
use crate::services::transfer::spec_location;
use crate::services::{ModuleManagers, ServiceError, ServiceResult, SpecsManager};

#[derive(Clone)]
struct CmdsState {
    modules: ModuleManagers,
    specs: Arc<dyn SpecsManager>,
}

/// Route group for maintenance commands.
pub struct CmdsGroup {
    state: CmdsState,
}

impl CmdsGroup {
    pub fn new(modules: ModuleManagers, specs: Arc<dyn SpecsManager>) -> Self {
        Self {
            state: CmdsState { modules, specs },
        }
    }
}

impl RouteGroup for CmdsGroup {
    fn name(&self) -> &'static str {
        "_cmds"
    }

    fn prefix(&self) -> &'static str {
        "/CLI/_cmds"
    }

    fn build(&self) -> GroupRoutes {
        GroupBuilder::new()
            .post("/Regenerate", regenerate)
            .post("/Verify", verify)
            .finish(self.state.clone())
    }
}

#[derive(Debug, Deserialize)]
struct MaintenanceRequest {
    repo: CliRepo,
    /// Limit to these modules; every module of the repo when absent.
    #[serde(default)]
    modules: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MaintenanceReport {
    pub repo: CliRepo,
    pub dry_run: bool,
    pub modules: Vec<ModuleReport>,
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleReport {
    pub name: String,
    pub commands: usize,
    /// Commands whose help text changed.
    pub refreshed: usize,
    /// `"<command> <version> (<profile>)"` for versions absent from the tree.
    pub missing: Vec<String>,
}

async fn regenerate(
    State(state): State<CmdsState>,
    payload: Result<Json<MaintenanceRequest>, JsonRejection>,
) -> ApiResult<Json<MaintenanceReport>> {
    let Json(request) = payload?;
    Ok(Json(run(&state, request, false)?))
}

async fn verify(
    State(state): State<CmdsState>,
    payload: Result<Json<MaintenanceRequest>, JsonRejection>,
) -> ApiResult<Json<MaintenanceReport>> {
    let Json(request) = payload?;
    Ok(Json(run(&state, request, true)?))
}

fn run(state: &CmdsState, request: MaintenanceRequest, dry_run: bool) -> ServiceResult<MaintenanceReport> {
    let manager = state.modules.for_repo(request.repo);
    let names = match request.modules {
        Some(names) => names,
        None => manager.list_modules()?.into_iter().map(|m| m.name).collect(),
    };

    let mut reports = Vec::with_capacity(names.len());
    for name in names {
        let report = if dry_run {
            let mut module = manager.load_module(&name)?;
            refresh_module(state.specs.as_ref(), &mut module)?
        } else {
            // Refresh and save under the module's lock so concurrent edits survive.
            let mut report = ModuleReport::default();
            manager.modify_module(&name, &mut |module: &mut CliModule| -> ServiceResult<bool> {
                report = refresh_module(state.specs.as_ref(), module)?;
                Ok(report.refreshed > 0)
            })?;
            report
        };
        tracing::info!(
            repo = %request.repo,
            module = %report.name,
            refreshed = report.refreshed,
            missing = report.missing.len(),
            dry_run,
            "Module regenerated"
        );
        reports.push(report);
    }

    Ok(MaintenanceReport {
        repo: request.repo,
        dry_run,
        modules: reports,
    })
}

/// Refresh every command's help from the tree, collecting missing versions.
fn refresh_module(specs: &dyn SpecsManager, module: &mut CliModule) -> ServiceResult<ModuleReport> {
    let mut report = ModuleReport {
        name: module.name.clone(),
        ..ModuleReport::default()
    };
    let mut failure: Option<ServiceError> = None;

    for (profile_name, profile) in module.profiles.iter_mut() {
        profile.for_each_command_mut(&mut |command: &mut CliCommand| {
            report.commands += 1;

            let lookup = spec_location(&command.names)
                .and_then(|(node, leaf)| specs.find_leaf(&node, leaf));
            match lookup {
                Ok(leaf) if leaf.version(&command.version).is_some() => {
                    if command.help != leaf.help {
                        command.help = leaf.help;
                        report.refreshed += 1;
                    }
                }
                Ok(_) => report.missing.push(format!(
                    "{} {} ({})",
                    command.display_name(),
                    command.version,
                    profile_name
                )),
                Err(err) if err.is_domain() => report.missing.push(format!(
                    "{} {} ({})",
                    command.display_name(),
                    command.version,
                    profile_name
                )),
                Err(err) => {
                    failure.get_or_insert(err);
                }
            }
        });
    }

    match failure {
        Some(err) => Err(err),
        None => Ok(report),
    }
}
