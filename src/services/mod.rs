//! Backend services the route groups delegate to.
//!
//! # Data Flow
//! ```text
//! AppConfig (paths, profiles)
//!     → Backends::init (construct every service, fail fast)
//!         → specs.rs     AazSpecsManager   (command tree, read-only)
//!         → modules.rs   AzModuleManager   (Main + Extension repos)
//!         → portal.rs    PortalCliGenerator (uses the specs manager)
//!     → handed to each route group as Arc<dyn Trait>
//! ```
//!
//! # Design Decisions
//! - Route groups only see the traits below, never the concrete types
//! - Services return ServiceError and do no HTTP work themselves
//! - Locking discipline, where needed, lives inside each service

pub mod error;
pub mod modules;
pub mod portal;
pub mod specs;
pub mod transfer;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::model::{CliModule, CliProfile, CliRepo, CommandTreeLeaf, CommandTreeNode, ModuleSummary};

pub use error::{InitError, ServiceError, ServiceResult};
pub use modules::AzModuleManager;
pub use portal::{PortalCliGenerator, PortalCommand};
pub use specs::AazSpecsManager;

/// Query access to normalized command specifications.
pub trait SpecsManager: Send + Sync {
    /// Find a command group by its rooted name path (`["aaz", ...]`).
    fn find_node(&self, names: &[String]) -> ServiceResult<CommandTreeNode>;

    /// Find a command inside the group at `node_names`.
    fn find_leaf(&self, node_names: &[String], leaf: &str) -> ServiceResult<CommandTreeLeaf>;
}

/// Read and import operations on the modules of one CLI repository.
pub trait ModuleManager: Send + Sync {
    fn repo(&self) -> CliRepo;

    fn list_modules(&self) -> ServiceResult<Vec<ModuleSummary>>;

    fn load_module(&self, name: &str) -> ServiceResult<CliModule>;

    fn create_module(&self, name: &str) -> ServiceResult<CliModule>;

    /// Replace every profile; profiles absent from `profiles` become empty.
    fn update_module(&self, name: &str, profiles: BTreeMap<String, CliProfile>)
        -> ServiceResult<CliModule>;

    /// Replace only the given profiles.
    fn patch_module(&self, name: &str, profiles: BTreeMap<String, CliProfile>)
        -> ServiceResult<CliModule>;

    /// Edit a module while no other update of it can run. `edit` returns
    /// whether the result is saved; it must not call back into this manager.
    fn modify_module(
        &self,
        name: &str,
        edit: &mut dyn FnMut(&mut CliModule) -> ServiceResult<bool>,
    ) -> ServiceResult<CliModule>;
}

/// Derives portal documents from module selections.
pub trait PortalGenerator: Send + Sync {
    fn generate(&self, module: &CliModule, profile: &str) -> ServiceResult<Vec<PortalCommand>>;

    /// Persist generated documents, returning the written file.
    fn write(&self, module: &str, commands: &[PortalCommand]) -> ServiceResult<PathBuf>;
}

/// The main and extension module managers, selected by repo.
#[derive(Clone)]
pub struct ModuleManagers {
    pub main: Arc<dyn ModuleManager>,
    pub extension: Arc<dyn ModuleManager>,
}

impl ModuleManagers {
    pub fn for_repo(&self, repo: CliRepo) -> &Arc<dyn ModuleManager> {
        match repo {
            CliRepo::Main => &self.main,
            CliRepo::Extension => &self.extension,
        }
    }
}

/// Every backend service, constructed once at startup.
#[derive(Clone)]
pub struct Backends {
    pub modules: ModuleManagers,
    pub specs: Arc<dyn SpecsManager>,
    pub portal: Arc<dyn PortalGenerator>,
    /// Configured profile names, in display order.
    pub profiles: Arc<[String]>,
    pub default_profile: String,
}

impl Backends {
    /// Construct all backends from configuration. Any failure aborts startup.
    pub fn init(config: &AppConfig) -> Result<Self, InitError> {
        let profiles: Arc<[String]> = Arc::from(config.cli.profiles.clone());

        let specs: Arc<dyn SpecsManager> = Arc::new(AazSpecsManager::open(&config.paths.aaz_path)?);
        let main = AzModuleManager::main(&config.paths.cli_path, profiles.clone())?;
        let extension = AzModuleManager::extension(&config.paths.cli_extension_path, profiles.clone())?;
        let portal = PortalCliGenerator::new(specs.clone(), config.paths.portal_output_path.clone());

        Ok(Self {
            modules: ModuleManagers {
                main: Arc::new(main),
                extension: Arc::new(extension),
            },
            specs,
            portal: Arc::new(portal),
            profiles,
            default_profile: config.cli.default_profile.clone(),
        })
    }
}
