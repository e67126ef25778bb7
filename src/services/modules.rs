//! Module managers for the azure-cli and azure-cli-extensions repositories.
//!
//! # Responsibilities
//! - List module folders of a repository
//! - Load a module's per-profile command selection
//! - Create modules and persist selection updates
//!
//! # Design Decisions
//! - One module per folder; the selection lives in `aaz_module.json`
//! - A folder without the file is a module with empty profiles
//! - Loaded modules are cached. Cache misses, writes and read-modify-write
//!   edits all go through the entry API, so they run under the entry's
//!   shard lock and one module's updates are serialized
//! - A module is read from disk at most once; a racing load can never
//!   replace a newer cached copy

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::model::{CliModule, CliProfile, CliRepo, ModuleSummary};
use crate::services::error::{InitError, ServiceError, ServiceResult};
use crate::services::ModuleManager;

/// File holding a module's profile selections.
pub const MODULE_FILE: &str = "aaz_module.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct ModuleFile {
    #[serde(default)]
    profiles: BTreeMap<String, CliProfile>,
}

/// Manages the modules of one CLI repository.
#[derive(Debug)]
pub struct AzModuleManager {
    repo: CliRepo,
    modules_root: PathBuf,
    profiles: Arc<[String]>,
    cache: DashMap<String, CliModule>,
}

impl AzModuleManager {
    /// Manager for azure-cli command modules
    /// (`src/azure-cli/azure/cli/command_modules`).
    pub fn main(cli_path: &Path, profiles: Arc<[String]>) -> Result<Self, InitError> {
        Self::open(
            CliRepo::Main,
            "azure-cli",
            cli_path,
            cli_path.join("src").join("azure-cli").join("azure").join("cli").join("command_modules"),
            profiles,
        )
    }

    /// Manager for azure-cli-extensions (`src`).
    pub fn extension(extension_path: &Path, profiles: Arc<[String]>) -> Result<Self, InitError> {
        Self::open(
            CliRepo::Extension,
            "azure-cli-extensions",
            extension_path,
            extension_path.join("src"),
            profiles,
        )
    }

    fn open(
        repo: CliRepo,
        what: &'static str,
        repo_path: &Path,
        modules_root: PathBuf,
        profiles: Arc<[String]>,
    ) -> Result<Self, InitError> {
        if !repo_path.is_dir() {
            return Err(InitError::MissingDirectory {
                what,
                path: repo_path.to_path_buf(),
            });
        }
        if !modules_root.is_dir() {
            return Err(InitError::MissingDirectory {
                what: "modules",
                path: modules_root,
            });
        }

        tracing::info!(repo = %repo, root = %modules_root.display(), "Module manager ready");

        Ok(Self {
            repo,
            modules_root,
            profiles,
            cache: DashMap::new(),
        })
    }

    pub fn modules_root(&self) -> &Path {
        &self.modules_root
    }

    fn module_dir(&self, name: &str) -> PathBuf {
        self.modules_root.join(name)
    }

    fn read_from_disk(&self, name: &str) -> ServiceResult<CliModule> {
        let dir = self.module_dir(name);
        if !dir.is_dir() {
            return Err(ServiceError::not_found("module", name));
        }

        let file = dir.join(MODULE_FILE);
        let stored = if file.is_file() {
            let content = fs::read(&file)?;
            serde_json::from_slice::<ModuleFile>(&content)?
        } else {
            ModuleFile::default()
        };

        let mut module = CliModule::empty(name, self.profiles.iter());
        module.folder = Some(dir.display().to_string());
        for (key, profile) in stored.profiles {
            module.profiles.insert(key, profile);
        }
        Ok(module)
    }

    /// The cached module, read from disk on a miss. The guard holds the
    /// shard lock until dropped.
    fn locked(&self, name: &str) -> ServiceResult<RefMut<'_, String, CliModule>> {
        self.cache
            .entry(name.to_string())
            .or_try_insert_with(|| self.read_from_disk(name))
    }

    fn write_to_disk(&self, module: &CliModule) -> ServiceResult<()> {
        let stored = ModuleFile {
            profiles: module.profiles.clone(),
        };
        let content = serde_json::to_vec_pretty(&stored)?;
        fs::write(self.module_dir(&module.name).join(MODULE_FILE), content)?;
        Ok(())
    }

    fn check_profiles(&self, profiles: &mut BTreeMap<String, CliProfile>) -> ServiceResult<()> {
        for (key, profile) in profiles.iter_mut() {
            if !self.profiles.iter().any(|p| p == key) {
                return Err(ServiceError::invalid(format!("unknown profile '{}'", key)));
            }
            profile.name.clone_from(key);

            if let Some(command) = profile.commands().into_iter().find(|c| c.version.is_empty()) {
                return Err(ServiceError::invalid(format!(
                    "command '{}' has no version",
                    command.display_name()
                )));
            }
        }
        Ok(())
    }

    fn write_profiles(
        &self,
        name: &str,
        mut profiles: BTreeMap<String, CliProfile>,
        replace: bool,
    ) -> ServiceResult<CliModule> {
        validate_module_name(name)?;
        self.check_profiles(&mut profiles)?;

        let mut entry = self.locked(name)?;
        let mut updated = entry.value().clone();
        if replace {
            updated.profiles = CliModule::empty(name, self.profiles.iter()).profiles;
        }
        updated.profiles.extend(profiles);

        self.write_to_disk(&updated)?;
        *entry.value_mut() = updated.clone();

        tracing::info!(repo = %self.repo, module = %name, replace, "Module updated");
        Ok(updated)
    }
}

impl ModuleManager for AzModuleManager {
    fn repo(&self) -> CliRepo {
        self.repo
    }

    fn list_modules(&self) -> ServiceResult<Vec<ModuleSummary>> {
        let mut modules = Vec::new();
        for entry in fs::read_dir(&self.modules_root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || name.starts_with('_') {
                continue;
            }
            modules.push(ModuleSummary {
                folder: entry.path().display().to_string(),
                name,
                repo: self.repo,
            });
        }
        modules.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(modules)
    }

    fn load_module(&self, name: &str) -> ServiceResult<CliModule> {
        validate_module_name(name)?;
        if let Some(module) = self.cache.get(name) {
            return Ok(module.clone());
        }
        Ok(self.locked(name)?.value().clone())
    }

    fn create_module(&self, name: &str) -> ServiceResult<CliModule> {
        validate_module_name(name)?;
        let dir = self.module_dir(name);

        match self.cache.entry(name.to_string()) {
            Entry::Occupied(_) => Err(ServiceError::Conflict(format!("module '{}' already exists", name))),
            Entry::Vacant(entry) => {
                if dir.exists() {
                    return Err(ServiceError::Conflict(format!("module '{}' already exists", name)));
                }
                fs::create_dir_all(&dir)?;

                let mut module = CliModule::empty(name, self.profiles.iter());
                module.folder = Some(dir.display().to_string());
                self.write_to_disk(&module)?;
                entry.insert(module.clone());

                tracing::info!(repo = %self.repo, module = %name, "Module created");
                Ok(module)
            }
        }
    }

    fn update_module(
        &self,
        name: &str,
        profiles: BTreeMap<String, CliProfile>,
    ) -> ServiceResult<CliModule> {
        self.write_profiles(name, profiles, true)
    }

    fn patch_module(
        &self,
        name: &str,
        profiles: BTreeMap<String, CliProfile>,
    ) -> ServiceResult<CliModule> {
        self.write_profiles(name, profiles, false)
    }

    fn modify_module(
        &self,
        name: &str,
        edit: &mut dyn FnMut(&mut CliModule) -> ServiceResult<bool>,
    ) -> ServiceResult<CliModule> {
        validate_module_name(name)?;
        let mut entry = self.locked(name)?;

        let mut updated = entry.value().clone();
        if !edit(&mut updated)? {
            return Ok(updated);
        }
        updated.name = name.to_string();

        self.write_to_disk(&updated)?;
        *entry.value_mut() = updated.clone();

        tracing::info!(repo = %self.repo, module = %name, "Module modified");
        Ok(updated)
    }
}

/// Module names are lowercase identifiers with `-` or `_` separators.
pub fn validate_module_name(name: &str) -> ServiceResult<()> {
    let mut chars = name.chars();
    let valid_start = chars.next().is_some_and(|c| c.is_ascii_lowercase());
    let valid_rest = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if valid_start && valid_rest {
        Ok(())
    } else {
        Err(ServiceError::invalid(format!("invalid module name '{}'", name)))
    }
}
