//! In-memory ledger with whole-state snapshots

use crate::clone::{create2_address, implementation_of, runtime_of_init_code};
use crate::codec::keccak256;
use crate::error::LedgerError;
use crate::ledger::{CallContext, ContractLogic, Ledger, Storage};
use crate::types::{Address, Digest, Salt};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Clone)]
enum Code {
    Logic(Arc<dyn ContractLogic>),
    Proxy(Vec<u8>),
}

#[derive(Clone)]
struct Account {
    code: Code,
    storage: Storage,
    initialized: bool,
}

/// Opaque copy of the full ledger state
#[derive(Clone)]
pub struct LedgerSnapshot(BTreeMap<Address, Account>);

/// Ledger held entirely in memory
///
/// Only minimal-proxy creation code is executable through `create2`;
/// implementation contracts are placed directly with [`MemoryLedger::install`].
#[derive(Clone, Default)]
pub struct MemoryLedger {
    accounts: BTreeMap<Address, Account>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place implementation logic at `address`
    pub fn install(
        &mut self,
        address: Address,
        logic: Arc<dyn ContractLogic>,
    ) -> Result<(), LedgerError> {
        if self.accounts.contains_key(&address) {
            return Err(LedgerError::CodeExists(address));
        }
        self.accounts.insert(
            address,
            Account {
                code: Code::Logic(logic),
                storage: Storage::new(),
                initialized: false,
            },
        );
        debug!(address = %address, "Installed implementation logic");
        Ok(())
    }

    /// Number of accounts holding code
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Run `f` against a scratch copy of the storage of `storage_owner`
    /// and keep the writes only if it succeeds
    fn run_on_storage<R>(
        &mut self,
        storage_owner: &Address,
        logic: &dyn ContractLogic,
        caller: &Address,
        f: impl FnOnce(&dyn ContractLogic, &mut CallContext<'_>) -> Result<R, String>,
    ) -> Result<R, LedgerError> {
        let account = self
            .accounts
            .get_mut(storage_owner)
            .ok_or(LedgerError::NoCode(*storage_owner))?;
        let mut scratch = account.storage.clone();
        let mut ctx = CallContext::new(*storage_owner, *caller, &mut scratch);
        let result = f(logic, &mut ctx).map_err(|reason| LedgerError::Reverted {
            address: *storage_owner,
            reason,
        })?;
        account.storage = scratch;
        Ok(result)
    }
}

impl Ledger for MemoryLedger {
    type Snapshot = LedgerSnapshot;

    fn has_code(&self, address: &Address) -> bool {
        self.accounts.contains_key(address)
    }

    fn runtime_code(&self, address: &Address) -> Option<Vec<u8>> {
        match self.accounts.get(address).map(|a| &a.code) {
            Some(Code::Proxy(runtime)) => Some(runtime.clone()),
            _ => None,
        }
    }

    fn logic_at(&self, address: &Address) -> Option<Arc<dyn ContractLogic>> {
        match &self.accounts.get(address)?.code {
            Code::Logic(logic) => Some(Arc::clone(logic)),
            Code::Proxy(runtime) => {
                let implementation = implementation_of(runtime)?;
                match &self.accounts.get(&implementation)?.code {
                    Code::Logic(logic) => Some(Arc::clone(logic)),
                    // A proxy pointing at another proxy has no logic to run
                    Code::Proxy(_) => None,
                }
            }
        }
    }

    fn create2(
        &mut self,
        deployer: &Address,
        salt: &Salt,
        init_code: &[u8],
    ) -> Result<Address, LedgerError> {
        let address = create2_address(deployer, salt, &keccak256(init_code));
        if self.accounts.contains_key(&address) {
            return Err(LedgerError::CodeExists(address));
        }
        let runtime = runtime_of_init_code(init_code).ok_or_else(|| LedgerError::Reverted {
            address,
            reason: "unsupported creation code".to_string(),
        })?;
        self.accounts.insert(
            address,
            Account {
                code: Code::Proxy(runtime.to_vec()),
                storage: Storage::new(),
                initialized: false,
            },
        );
        trace!(address = %address, deployer = %deployer, "CREATE2 deployment");
        Ok(address)
    }

    fn initialize(
        &mut self,
        target: &Address,
        caller: &Address,
        init_args: &[u8],
    ) -> Result<(), LedgerError> {
        let account = self
            .accounts
            .get(target)
            .ok_or(LedgerError::NoCode(*target))?;
        if account.initialized {
            return Err(LedgerError::AlreadyInitialized(*target));
        }
        let logic = self.logic_at(target).ok_or(LedgerError::NoCode(*target))?;
        self.run_on_storage(target, logic.as_ref(), caller, |logic, ctx| {
            logic.initialize(ctx, init_args)
        })?;
        if let Some(account) = self.accounts.get_mut(target) {
            account.initialized = true;
        }
        Ok(())
    }

    fn call(
        &mut self,
        target: &Address,
        caller: &Address,
        input: &[u8],
    ) -> Result<Vec<u8>, LedgerError> {
        let logic = self.logic_at(target).ok_or(LedgerError::NoCode(*target))?;
        self.run_on_storage(target, logic.as_ref(), caller, |logic, ctx| {
            logic.call(ctx, input)
        })
    }

    fn storage_at(&self, address: &Address, slot: &Digest) -> Digest {
        self.accounts
            .get(address)
            .and_then(|a| a.storage.get(slot).copied())
            .unwrap_or([0u8; 32])
    }

    fn snapshot(&self) -> Self::Snapshot {
        LedgerSnapshot(self.accounts.clone())
    }

    fn restore(&mut self, snapshot: Self::Snapshot) {
        self.accounts = snapshot.0;
    }
}
