//! Configuration System
//!
//! Layered configuration: built-in defaults, then the user's global file,
//! then workspace files, then `CLONEKIT_*` environment variables. The role
//! grants a CLI session runs with live here as well, since there is no chain
//! to read them from.

use crate::access::{allowlist_admin_role, factory_role, RoleTable, DEFAULT_ADMIN_ROLE};
use crate::codec::LeafEncoding;
use crate::logging::LoggingConfig;
use crate::merkle::TreeOptions;
use crate::types::Address;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClonekitConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub allowlist: AllowlistConfig,
}

/// Registry persistence and role grants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Sled database directory, relative to the workspace unless absolute
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Holders of DEFAULT_ADMIN_ROLE
    #[serde(default)]
    pub admins: Vec<Address>,

    /// Holders of FACTORY_ROLE
    #[serde(default)]
    pub factory_operators: Vec<Address>,

    /// Holders of ALLOWLIST_ADMIN_ROLE
    #[serde(default)]
    pub allowlist_admins: Vec<Address>,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".clonekit/store")
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            admins: Vec::new(),
            factory_operators: Vec::new(),
            allowlist_admins: Vec::new(),
        }
    }
}

impl RegistryConfig {
    /// Role table holding exactly the configured grants
    pub fn role_table(&self) -> RoleTable {
        let table = RoleTable::new();
        for admin in &self.admins {
            table.bootstrap(DEFAULT_ADMIN_ROLE, *admin);
        }
        for operator in &self.factory_operators {
            table.bootstrap(factory_role(), *operator);
        }
        for admin in &self.allowlist_admins {
            table.bootstrap(allowlist_admin_role(), *admin);
        }
        table
    }
}

/// Allowlist tree defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllowlistConfig {
    /// Sort leaf digests before building the tree
    #[serde(default)]
    pub sort_leaves: bool,

    /// Required schema for eligibility lists; any single schema when unset
    #[serde(default)]
    pub encoding: Option<LeafEncoding>,
}

impl AllowlistConfig {
    pub fn tree_options(&self) -> TreeOptions {
        TreeOptions {
            sort_leaves: self.sort_leaves,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Logging(String),
    Registry(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
            ValidationError::Registry(msg) => write!(f, "Registry: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ClonekitConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.logging.format.parse::<crate::logging::LogFormat>() {
            errors.push(ValidationError::Logging(e.to_string()));
        }
        if let Err(e) = self.logging.output.parse::<crate::logging::LogOutput>() {
            errors.push(ValidationError::Logging(e.to_string()));
        }

        if self.registry.store_path.as_os_str().is_empty() {
            errors.push(ValidationError::Registry(
                "Store path cannot be empty".to_string(),
            ));
        }
        let grants = [
            ("admins", &self.registry.admins),
            ("factory_operators", &self.registry.factory_operators),
            ("allowlist_admins", &self.registry.allowlist_admins),
        ];
        for (name, members) in grants {
            if members.iter().any(Address::is_zero) {
                errors.push(ValidationError::Registry(format!(
                    "{} must not contain the zero address",
                    name
                )));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
