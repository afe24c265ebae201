//! Ledger
//!
//! The execution environment the factory deploys into, reduced to what the
//! factory needs: place code at a CREATE2 address, call a contract, read its
//! storage, and snapshot/restore whole-ledger state so that an operation can
//! be rolled back as a unit.
//!
//! Contract behaviour is supplied as [`ContractLogic`] trait objects.
//! Minimal proxies own storage but no logic: calls to them run the
//! implementation's logic against the proxy's storage.

pub mod memory;

pub use memory::MemoryLedger;

use crate::error::LedgerError;
use crate::types::{Address, Digest, Salt};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Contract storage: 32-byte slots
pub type Storage = BTreeMap<Digest, Digest>;

/// Execution context handed to contract logic for one call
pub struct CallContext<'a> {
    /// Account whose storage is being used (the proxy for delegated calls)
    pub this: Address,
    pub caller: Address,
    storage: &'a mut Storage,
}

impl<'a> CallContext<'a> {
    pub fn new(this: Address, caller: Address, storage: &'a mut Storage) -> Self {
        Self {
            this,
            caller,
            storage,
        }
    }

    /// Read a slot; unset slots read as zero
    pub fn sload(&self, slot: &Digest) -> Digest {
        self.storage.get(slot).copied().unwrap_or([0u8; 32])
    }

    pub fn sstore(&mut self, slot: Digest, value: Digest) {
        if value == [0u8; 32] {
            self.storage.remove(&slot);
        } else {
            self.storage.insert(slot, value);
        }
    }
}

/// Behaviour of an implementation contract
///
/// Errors are revert reasons.
pub trait ContractLogic: Send + Sync {
    /// `bytes32` contract type identifier
    fn contract_type(&self) -> Digest;

    fn contract_version(&self) -> u8;

    /// One-time initializer run right after a clone is deployed
    fn initialize(&self, ctx: &mut CallContext<'_>, init_args: &[u8]) -> Result<(), String>;

    fn call(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Vec<u8>, String>;
}

/// Abstract ledger
pub trait Ledger {
    type Snapshot;

    /// True if any code (logic or proxy) occupies `address`
    fn has_code(&self, address: &Address) -> bool;

    /// Runtime bytecode for proxy accounts
    fn runtime_code(&self, address: &Address) -> Option<Vec<u8>>;

    /// Logic executed for calls to `address`, resolved through proxies
    fn logic_at(&self, address: &Address) -> Option<Arc<dyn ContractLogic>>;

    /// Run `init_code` at its CREATE2 address for (`deployer`, `salt`)
    fn create2(
        &mut self,
        deployer: &Address,
        salt: &Salt,
        init_code: &[u8],
    ) -> Result<Address, LedgerError>;

    /// Run the initializer of the contract at `target` (at most once)
    fn initialize(
        &mut self,
        target: &Address,
        caller: &Address,
        init_args: &[u8],
    ) -> Result<(), LedgerError>;

    /// Call the contract at `target`
    fn call(
        &mut self,
        target: &Address,
        caller: &Address,
        input: &[u8],
    ) -> Result<Vec<u8>, LedgerError>;

    /// Read a storage slot of `address`
    fn storage_at(&self, address: &Address, slot: &Digest) -> Digest;

    fn snapshot(&self) -> Self::Snapshot;

    fn restore(&mut self, snapshot: Self::Snapshot);
}
