//! Implementation Registry
//!
//! The set of implementation contracts clones may point at. Entries are
//! created by a gated registration, flipped between approved and revoked by
//! gated writes, and never removed, so "revoked" stays distinguishable from
//! "never registered".

use crate::access::{factory_role, require_role, Authorizer};
use crate::codec::contract_type_name;
use crate::error::ApiError;
use crate::types::{Address, Digest};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Contract type and version an implementation reports about itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractKind {
    /// Left-aligned `bytes32` type name
    pub contract_type: Digest,
    pub version: u8,
}

impl ContractKind {
    pub fn type_name(&self) -> String {
        contract_type_name(&self.contract_type)
    }
}

/// One registered implementation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementationEntry {
    pub address: Address,
    pub kind: Option<ContractKind>,
    pub approved: bool,
}

/// Audit view of an address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplementationStatus {
    NeverRegistered,
    Approved,
    Revoked,
}

impl fmt::Display for ImplementationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImplementationStatus::NeverRegistered => write!(f, "never registered"),
            ImplementationStatus::Approved => write!(f, "approved"),
            ImplementationStatus::Revoked => write!(f, "revoked"),
        }
    }
}

/// Registry state without the authorizer
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    entries: BTreeMap<Address, ImplementationEntry>,
    versions: BTreeMap<Digest, BTreeMap<u8, Address>>,
}

/// Approved implementation registry
pub struct ImplementationRegistry {
    state: RegistrySnapshot,
    authorizer: Arc<dyn Authorizer>,
}

impl ImplementationRegistry {
    pub fn new(authorizer: Arc<dyn Authorizer>) -> Self {
        Self {
            state: RegistrySnapshot::default(),
            authorizer,
        }
    }

    /// Register `implementation` as approved
    pub fn register(&mut self, implementation: Address, caller: &Address) -> Result<(), ApiError> {
        self.insert(implementation, None, caller)
    }

    /// Register `implementation` together with its contract type and version
    ///
    /// Each (type, version) pair maps to at most one implementation.
    pub fn register_kind(
        &mut self,
        implementation: Address,
        kind: ContractKind,
        caller: &Address,
    ) -> Result<(), ApiError> {
        self.insert(implementation, Some(kind), caller)
    }

    fn insert(
        &mut self,
        implementation: Address,
        kind: Option<ContractKind>,
        caller: &Address,
    ) -> Result<(), ApiError> {
        require_role(self.authorizer.as_ref(), &factory_role(), caller)?;
        if self.state.entries.contains_key(&implementation) {
            return Err(ApiError::AlreadyRegistered(implementation));
        }
        if let Some(kind) = kind {
            if let Some(existing) = self.implementation(&kind.contract_type, kind.version) {
                return Err(ApiError::VersionTaken {
                    contract_type: kind.type_name(),
                    version: kind.version,
                    existing,
                });
            }
            self.state
                .versions
                .entry(kind.contract_type)
                .or_default()
                .insert(kind.version, implementation);
        }
        self.state.entries.insert(
            implementation,
            ImplementationEntry {
                address: implementation,
                kind,
                approved: true,
            },
        );
        info!(
            implementation = %implementation,
            contract_type = %kind.map(|k| k.type_name()).unwrap_or_default(),
            version = ?kind.map(|k| k.version),
            caller = %caller,
            "Implementation registered"
        );
        Ok(())
    }

    /// Total over all addresses; unregistered addresses are not approved
    pub fn is_approved(&self, implementation: &Address) -> bool {
        self.state
            .entries
            .get(implementation)
            .is_some_and(|e| e.approved)
    }

    /// Mark a registered implementation as not approved; the entry is kept
    pub fn revoke(&mut self, implementation: &Address, caller: &Address) -> Result<(), ApiError> {
        self.set_approval(implementation, false, caller)
    }

    /// Re-approve a revoked implementation
    pub fn approve(&mut self, implementation: &Address, caller: &Address) -> Result<(), ApiError> {
        self.set_approval(implementation, true, caller)
    }

    fn set_approval(
        &mut self,
        implementation: &Address,
        approved: bool,
        caller: &Address,
    ) -> Result<(), ApiError> {
        require_role(self.authorizer.as_ref(), &factory_role(), caller)?;
        let entry = self
            .state
            .entries
            .get_mut(implementation)
            .ok_or(ApiError::NotRegistered(*implementation))?;
        entry.approved = approved;
        info!(
            implementation = %implementation,
            approved,
            caller = %caller,
            "Implementation approval changed"
        );
        Ok(())
    }

    pub fn status(&self, implementation: &Address) -> ImplementationStatus {
        match self.state.entries.get(implementation) {
            None => ImplementationStatus::NeverRegistered,
            Some(e) if e.approved => ImplementationStatus::Approved,
            Some(_) => ImplementationStatus::Revoked,
        }
    }

    pub fn entry(&self, implementation: &Address) -> Option<&ImplementationEntry> {
        self.state.entries.get(implementation)
    }

    /// All entries ordered by address
    pub fn entries(&self) -> impl Iterator<Item = &ImplementationEntry> {
        self.state.entries.values()
    }

    /// Implementation registered for (type, version), approved or not
    pub fn implementation(&self, contract_type: &Digest, version: u8) -> Option<Address> {
        self.state
            .versions
            .get(contract_type)
            .and_then(|v| v.get(&version))
            .copied()
    }

    /// Highest registered version of a contract type
    pub fn latest(&self, contract_type: &Digest) -> Option<Address> {
        self.state
            .versions
            .get(contract_type)
            .and_then(|v| v.values().next_back())
            .copied()
    }

    /// Highest approved version of a contract type
    pub fn latest_approved(&self, contract_type: &Digest) -> Option<Address> {
        self.state
            .versions
            .get(contract_type)?
            .values()
            .rev()
            .find(|address| self.is_approved(address))
            .copied()
    }

    /// Replace state with previously persisted entries
    pub fn load_entries(&mut self, entries: impl IntoIterator<Item = ImplementationEntry>) {
        let mut state = RegistrySnapshot::default();
        for entry in entries {
            if let Some(kind) = entry.kind {
                state
                    .versions
                    .entry(kind.contract_type)
                    .or_default()
                    .insert(kind.version, entry.address);
            }
            state.entries.insert(entry.address, entry);
        }
        self.state = state;
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        self.state.clone()
    }

    pub fn restore(&mut self, snapshot: RegistrySnapshot) {
        self.state = snapshot;
    }
}
