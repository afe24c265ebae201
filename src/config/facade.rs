//! Config loading entry points.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::ClonekitConfig;
use config::{Config, ConfigError, File, FileFormat};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Builds a [`ClonekitConfig`] from the layered sources
#[derive(Debug, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Path of the user-level config file
    pub fn xdg_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    /// Load with the full precedence chain:
    /// defaults, global file, workspace files, environment.
    pub fn load(workspace_root: &Path) -> Result<ClonekitConfig, ConfigError> {
        Self::load_with_global(workspace_root, Self::xdg_config_path().as_deref())
    }

    /// As [`ConfigLoader::load`] with an explicit global file location
    pub fn load_with_global(
        workspace_root: &Path,
        global: Option<&Path>,
    ) -> Result<ClonekitConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder, global)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder)?;
        let config: ClonekitConfig = builder.build()?.try_deserialize()?;
        debug!(workspace = %workspace_root.display(), "Configuration loaded");
        Ok(config)
    }

    /// Load from a single file on top of the defaults; no other layers
    pub fn load_from_file(path: &Path) -> Result<ClonekitConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).format(FileFormat::Toml))
            .build()
            .and_then(Config::try_deserialize)
    }
}
