//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::access::RoleTable;
use crate::allowlist::{Allowlist, AllowlistSnapshot};
use crate::cli::command_name;
use crate::cli::parse::{
    AllowlistCommands, CloneCommands, Commands, ConfigCommands, LeafCommands, RegistryCommands,
};
use crate::cli::presentation::{
    format_claim_bundle, format_published_root, format_registry_list_json,
    format_registry_list_text, format_root_output,
};
use crate::clone::derive_address;
use crate::codec::{contract_type_id, parse_eligibility_list, parse_uint, LeafRecord};
use crate::config::{ClonekitConfig, ConfigLoader};
use crate::error::{ApiError, CodecError, StorageError};
use crate::merkle::verify;
use crate::registry::{ContractKind, ImplementationRegistry};
use crate::store::{RegistryStore, SledRegistryStore};
use crate::types::{format_digest, parse_digest, Address, Digest};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info_span};

/// Runtime context for CLI execution: workspace, resolved config and store location.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    workspace_root: PathBuf,
    config: ClonekitConfig,
    store_path: PathBuf,
    store: OnceLock<SledRegistryStore>,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Self::with_config(workspace_root, config)
    }

    /// Create run context from an already loaded config
    pub fn with_config(workspace_root: PathBuf, config: ClonekitConfig) -> Result<Self, ApiError> {
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;

        let store_path = if config.registry.store_path.is_absolute() {
            config.registry.store_path.clone()
        } else {
            workspace_root.join(&config.registry.store_path)
        };

        Ok(Self {
            workspace_root,
            config,
            store_path,
            store: OnceLock::new(),
        })
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn config(&self) -> &ClonekitConfig {
        &self.config
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let span = info_span!("command", name = %command_name(command));
        let _guard = span.enter();
        match command {
            Commands::Leaf { command } => self.handle_leaf(command),
            Commands::Allowlist { command } => self.handle_allowlist(command),
            Commands::Clone { command } => self.handle_clone(command),
            Commands::Registry { command } => self.handle_registry(command),
            Commands::Config { command } => self.handle_config(command),
        }
    }

    fn handle_leaf(&self, command: &LeafCommands) -> Result<String, ApiError> {
        match command {
            LeafCommands::Hash {
                claimant,
                quantity,
                price,
                currency,
                amount,
            } => {
                let claimant = parse_address(claimant)?;
                let record = match (quantity, price, currency, amount) {
                    (None, None, None, Some(amount)) => LeafRecord::Airdrop {
                        claimant,
                        amount: parse_uint(amount)?,
                    },
                    (Some(quantity), Some(price), Some(currency), None) => LeafRecord::Claim {
                        claimant,
                        quantity: parse_uint(quantity)?,
                        price_per_unit: parse_uint(price)?,
                        currency: parse_address(currency)?,
                    },
                    _ => {
                        return Err(CodecError::Encoding(
                            "give either --amount, or --quantity with --price and --currency"
                                .to_string(),
                        )
                        .into())
                    }
                };
                Ok(format_digest(&record.digest()?))
            }
        }
    }

    fn handle_allowlist(&self, command: &AllowlistCommands) -> Result<String, ApiError> {
        match command {
            AllowlistCommands::Root {
                input,
                sort_leaves,
                format,
            } => {
                let snapshot = self.load_snapshot(input, *sort_leaves)?;
                format_root_output(&snapshot, format)
            }
            AllowlistCommands::Proof {
                input,
                claimant,
                sort_leaves,
                abi,
                format,
            } => {
                let snapshot = self.load_snapshot(input, *sort_leaves)?;
                let claimant = parse_address(claimant)?;
                let record = snapshot
                    .find_by_claimant(&claimant)
                    .ok_or(ApiError::ClaimantNotFound(claimant))?;
                let bundle = snapshot.claim_bundle(record)?;
                format_claim_bundle(&bundle, &claimant, *abi, format)
            }
            AllowlistCommands::Verify { root, leaf, proof } => {
                let root = parse_digest(root)?;
                let leaf = parse_digest(leaf)?;
                let proof = parse_proof_list(proof)?;
                Ok(verdict(verify(&root, &leaf, &proof)))
            }
            AllowlistCommands::Publish {
                input,
                name,
                caller,
                sort_leaves,
            } => {
                let caller = parse_address(caller)?;
                let snapshot = self.load_snapshot(input, *sort_leaves)?;
                let store = self.open_store()?;

                let mut allowlist =
                    Allowlist::new(snapshot.encoding(), Arc::new(self.role_table()));
                if let Some(previous) = store.load_root(name)? {
                    allowlist.restore(previous)?;
                }
                allowlist.publish_root(snapshot.root(), &caller)?;
                let published = allowlist
                    .published()
                    .ok_or(ApiError::NoRootPublished)?;
                store.save_root(name, published)?;
                store.flush()?;
                Ok(format_published_root(name, published))
            }
            AllowlistCommands::Claim {
                name,
                input,
                claimant,
                sort_leaves,
            } => {
                let store = self.open_store()?;
                let published = store.load_root(name)?.ok_or(ApiError::NoRootPublished)?;
                let mut allowlist =
                    Allowlist::new(published.encoding, Arc::new(self.role_table()));
                allowlist.restore(published)?;

                let snapshot = self.load_snapshot(input, *sort_leaves)?;
                let claimant = parse_address(claimant)?;
                let record = snapshot
                    .find_by_claimant(&claimant)
                    .ok_or(ApiError::ClaimantNotFound(claimant))?;
                let proof = snapshot.proof_for(record)?;
                Ok(verdict(allowlist.verify_claim(record, &proof)?))
            }
        }
    }

    fn handle_clone(&self, command: &CloneCommands) -> Result<String, ApiError> {
        match command {
            CloneCommands::Address {
                implementation,
                deployer,
                salt,
            } => {
                let implementation = parse_address(implementation)?;
                let deployer = parse_address(deployer)?;
                let salt = parse_digest(salt)?;
                Ok(derive_address(&implementation, &deployer, &salt).to_string())
            }
        }
    }

    fn handle_registry(&self, command: &RegistryCommands) -> Result<String, ApiError> {
        let store = self.open_store()?;
        let mut registry = ImplementationRegistry::new(Arc::new(self.role_table()));
        registry.load_entries(store.load_entries()?);

        let output = match command {
            RegistryCommands::Register {
                implementation,
                caller,
                contract_type,
                contract_version,
            } => {
                let implementation = parse_address(implementation)?;
                let caller = parse_address(caller)?;
                match (contract_type, contract_version) {
                    (Some(name), Some(version)) => {
                        let kind = ContractKind {
                            contract_type: contract_type_id(name)?,
                            version: *version,
                        };
                        registry.register_kind(implementation, kind, &caller)?
                    }
                    _ => registry.register(implementation, &caller)?,
                }
                persist_entry(store, &registry, &implementation)?;
                format!("Registered {}", implementation)
            }
            RegistryCommands::Revoke {
                implementation,
                caller,
            } => {
                let implementation = parse_address(implementation)?;
                registry.revoke(&implementation, &parse_address(caller)?)?;
                persist_entry(store, &registry, &implementation)?;
                format!("Revoked {}", implementation)
            }
            RegistryCommands::Approve {
                implementation,
                caller,
            } => {
                let implementation = parse_address(implementation)?;
                registry.approve(&implementation, &parse_address(caller)?)?;
                persist_entry(store, &registry, &implementation)?;
                format!("Approved {}", implementation)
            }
            RegistryCommands::Status { implementation } => {
                let implementation = parse_address(implementation)?;
                format!("{}: {}", implementation, registry.status(&implementation))
            }
            RegistryCommands::List { format } => {
                let entries: Vec<_> = registry.entries().cloned().collect();
                if format == "json" {
                    format_registry_list_json(&entries)?
                } else {
                    format_registry_list_text(&entries)
                }
            }
        };
        store.flush()?;
        Ok(output)
    }

    fn handle_config(&self, command: &ConfigCommands) -> Result<String, ApiError> {
        match command {
            ConfigCommands::Show => toml::to_string_pretty(&self.config)
                .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e))),
        }
    }

    fn role_table(&self) -> RoleTable {
        self.config.registry.role_table()
    }

    /// Registry store, opened on first use
    fn open_store(&self) -> Result<&SledRegistryStore, ApiError> {
        if let Some(store) = self.store.get() {
            return Ok(store);
        }
        std::fs::create_dir_all(&self.store_path).map_err(StorageError::IoError)?;
        debug!(store_path = %self.store_path.display(), "Opening registry store");
        let store = SledRegistryStore::new(&self.store_path)?;
        Ok(self.store.get_or_init(|| store))
    }

    /// Read, parse and hash an eligibility list
    fn load_snapshot(
        &self,
        input: &Path,
        sort_leaves: bool,
    ) -> Result<AllowlistSnapshot, ApiError> {
        let path = if input.is_absolute() {
            input.to_path_buf()
        } else {
            self.workspace_root.join(input)
        };
        let text = std::fs::read_to_string(&path).map_err(StorageError::IoError)?;
        let records = parse_eligibility_list(&text)?;
        let mut options = self.config.allowlist.tree_options();
        options.sort_leaves |= sort_leaves;
        let snapshot = AllowlistSnapshot::from_records(records, options)?;
        if let Some(expected) = self.config.allowlist.encoding {
            if snapshot.encoding() != expected {
                return Err(ApiError::EncodingMismatch {
                    expected,
                    found: snapshot.encoding(),
                });
            }
        }
        Ok(snapshot)
    }
}

fn persist_entry(
    store: &SledRegistryStore,
    registry: &ImplementationRegistry,
    implementation: &Address,
) -> Result<(), ApiError> {
    if let Some(entry) = registry.entry(implementation) {
        store.save_entry(entry)?;
    }
    Ok(())
}

fn parse_address(s: &str) -> Result<Address, ApiError> {
    Ok(s.parse::<Address>()?)
}

fn parse_proof_list(s: &str) -> Result<Vec<Digest>, ApiError> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| parse_digest(p).map_err(ApiError::from))
        .collect()
}

fn verdict(valid: bool) -> String {
    if valid { "valid" } else { "invalid" }.to_string()
}
