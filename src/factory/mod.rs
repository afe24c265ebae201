//! Clone Factory
//!
//! Deploys minimal proxies of approved implementations at predictable
//! addresses. A deployment is approval check, address derivation, CREATE2
//! and initializer call, executed as one unit against the ledger: if any
//! step fails the ledger, registry and instance table are restored and no
//! discovery record leaves the factory.
//!
//! Discovery records are buffered in an outbox while an operation runs and
//! handed to the [`DeploymentSink`] only when it commits.

pub mod discovery;

pub use discovery::{DeploymentLog, DeploymentRecord, DeploymentSink, LoggedDeployment};

use crate::batch::{atomically, Dispatch, Transactional};
use crate::clone::{derive_address, implementation_of, proxy_init_code};
use crate::codec::contract_type_name;
use crate::error::{ApiError, LedgerError};
use crate::ledger::Ledger;
use crate::registry::{ContractKind, ImplementationRegistry, RegistrySnapshot};
use crate::types::{Address, Digest, Salt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// A deployed minimal proxy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneInstance {
    pub address: Address,
    pub implementation: Address,
    pub init_args: Vec<u8>,
}

/// One call of a factory batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactoryCall {
    Register { implementation: Address },
    AddImplementation { implementation: Address },
    Revoke { implementation: Address },
    Approve { implementation: Address },
    DeployClone {
        implementation: Address,
        salt: Salt,
        init_args: Vec<u8>,
    },
}

/// Result of one factory batch call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactoryOutput {
    Unit,
    Deployed(Address),
}

/// Full factory state captured before an atomic operation
pub struct FactorySnapshot<S> {
    ledger: S,
    registry: RegistrySnapshot,
    instances: BTreeMap<Address, CloneInstance>,
    outbox_len: usize,
}

/// Deterministic clone factory over a ledger `L`
pub struct CloneFactory<L: Ledger> {
    ledger: L,
    registry: ImplementationRegistry,
    sink: Arc<dyn DeploymentSink>,
    instances: BTreeMap<Address, CloneInstance>,
    outbox: Vec<DeploymentRecord>,
}

impl<L: Ledger> CloneFactory<L> {
    pub fn new(ledger: L, registry: ImplementationRegistry, sink: Arc<dyn DeploymentSink>) -> Self {
        Self {
            ledger,
            registry,
            sink,
            instances: BTreeMap::new(),
            outbox: Vec::new(),
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Direct ledger access for setup (installing implementations)
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn registry(&self) -> &ImplementationRegistry {
        &self.registry
    }

    pub fn is_approved(&self, implementation: &Address) -> bool {
        self.registry.is_approved(implementation)
    }

    pub fn instance(&self, address: &Address) -> Option<&CloneInstance> {
        self.instances.get(address)
    }

    pub fn instances(&self) -> impl Iterator<Item = &CloneInstance> {
        self.instances.values()
    }

    /// Address `deploy_clone` would use for the same inputs; touches nothing
    pub fn predict_address(
        &self,
        implementation: &Address,
        salt: &Salt,
        caller: &Address,
    ) -> Address {
        derive_address(implementation, caller, salt)
    }

    pub fn register(&mut self, implementation: Address, caller: &Address) -> Result<(), ApiError> {
        atomically(self, |f| f.registry.register(implementation, caller))
    }

    /// Register an implementation under the type and version its logic reports
    #[instrument(skip_all, fields(implementation = %implementation, caller = %caller))]
    pub fn add_implementation(
        &mut self,
        implementation: Address,
        caller: &Address,
    ) -> Result<(), ApiError> {
        atomically(self, |f| f.add_implementation_inner(implementation, caller))
    }

    pub fn revoke(&mut self, implementation: &Address, caller: &Address) -> Result<(), ApiError> {
        atomically(self, |f| f.registry.revoke(implementation, caller))
    }

    pub fn approve(&mut self, implementation: &Address, caller: &Address) -> Result<(), ApiError> {
        atomically(self, |f| f.registry.approve(implementation, caller))
    }

    /// Deploy and initialize a clone of `implementation`
    ///
    /// The clone lands at `derive_address(implementation, caller, salt)`.
    #[instrument(skip_all, fields(implementation = %implementation, caller = %caller))]
    pub fn deploy_clone(
        &mut self,
        implementation: &Address,
        salt: &Salt,
        init_args: &[u8],
        caller: &Address,
    ) -> Result<Address, ApiError> {
        atomically(self, |f| f.deploy_clone_inner(implementation, salt, init_args, caller))
    }

    /// Deploy a clone of the highest approved version of `contract_type`
    #[instrument(skip_all, fields(contract_type = %contract_type_name(contract_type), caller = %caller))]
    pub fn deploy_latest(
        &mut self,
        contract_type: &Digest,
        salt: &Salt,
        init_args: &[u8],
        caller: &Address,
    ) -> Result<Address, ApiError> {
        let implementation = self
            .registry
            .latest_approved(contract_type)
            .ok_or_else(|| ApiError::UnknownContractType(contract_type_name(contract_type)))?;
        self.deploy_clone(&implementation, salt, init_args, caller)
    }

    fn add_implementation_inner(
        &mut self,
        implementation: Address,
        caller: &Address,
    ) -> Result<(), ApiError> {
        // Clones have no logic of their own; a clone of a clone cannot run
        if self
            .ledger
            .runtime_code(&implementation)
            .and_then(|code| implementation_of(&code))
            .is_some()
        {
            warn!(implementation = %implementation, "Clone proxy offered as implementation");
            return Err(ApiError::ProxyImplementation(implementation));
        }
        let logic = self
            .ledger
            .logic_at(&implementation)
            .ok_or(LedgerError::NoCode(implementation))?;
        let kind = ContractKind {
            contract_type: logic.contract_type(),
            version: logic.contract_version(),
        };
        self.registry.register_kind(implementation, kind, caller)
    }

    fn deploy_clone_inner(
        &mut self,
        implementation: &Address,
        salt: &Salt,
        init_args: &[u8],
        caller: &Address,
    ) -> Result<Address, ApiError> {
        if !self.registry.is_approved(implementation) {
            warn!(implementation = %implementation, "Deployment of unapproved implementation rejected");
            return Err(ApiError::ImplementationNotApproved(*implementation));
        }

        let target = derive_address(implementation, caller, salt);
        if self.ledger.has_code(&target) {
            return Err(ApiError::AddressCollision(target));
        }

        let deployed = self
            .ledger
            .create2(caller, salt, &proxy_init_code(implementation))?;
        if deployed != target {
            return Err(LedgerError::Reverted {
                address: deployed,
                reason: format!("proxy landed at {deployed}, expected {target}"),
            }
            .into());
        }

        self.ledger
            .initialize(&target, caller, init_args)
            .map_err(|err| ApiError::InitializationFailed {
                target,
                reason: match err {
                    LedgerError::Reverted { reason, .. } => reason,
                    other => other.to_string(),
                },
            })?;

        self.instances.insert(
            target,
            CloneInstance {
                address: target,
                implementation: *implementation,
                init_args: init_args.to_vec(),
            },
        );
        self.outbox.push(DeploymentRecord {
            target,
            implementation: *implementation,
            caller: *caller,
            salt: *salt,
        });
        info!(target_address = %target, implementation = %implementation, "Clone deployed");
        Ok(target)
    }
}

impl<L: Ledger> Transactional for CloneFactory<L> {
    type Snapshot = FactorySnapshot<L::Snapshot>;

    fn snapshot(&self) -> Self::Snapshot {
        FactorySnapshot {
            ledger: self.ledger.snapshot(),
            registry: self.registry.snapshot(),
            instances: self.instances.clone(),
            outbox_len: self.outbox.len(),
        }
    }

    fn restore(&mut self, snapshot: Self::Snapshot) {
        self.ledger.restore(snapshot.ledger);
        self.registry.restore(snapshot.registry);
        self.instances = snapshot.instances;
        self.outbox.truncate(snapshot.outbox_len);
    }

    fn commit(&mut self) {
        for record in self.outbox.drain(..) {
            self.sink.record(&record);
        }
    }
}

impl<L: Ledger> Dispatch for CloneFactory<L> {
    type Call = FactoryCall;
    type Output = FactoryOutput;
    type Error = ApiError;

    fn dispatch(
        &mut self,
        call: &FactoryCall,
        caller: &Address,
    ) -> Result<FactoryOutput, ApiError> {
        match call {
            FactoryCall::Register { implementation } => {
                self.registry.register(*implementation, caller)?;
                Ok(FactoryOutput::Unit)
            }
            FactoryCall::AddImplementation { implementation } => {
                self.add_implementation_inner(*implementation, caller)?;
                Ok(FactoryOutput::Unit)
            }
            FactoryCall::Revoke { implementation } => {
                self.registry.revoke(implementation, caller)?;
                Ok(FactoryOutput::Unit)
            }
            FactoryCall::Approve { implementation } => {
                self.registry.approve(implementation, caller)?;
                Ok(FactoryOutput::Unit)
            }
            FactoryCall::DeployClone {
                implementation,
                salt,
                init_args,
            } => self
                .deploy_clone_inner(implementation, salt, init_args, caller)
                .map(FactoryOutput::Deployed),
        }
    }
}
