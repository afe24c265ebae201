//! Shared fixtures for integration tests

use clonekit::access::{allowlist_admin_role, factory_role, RoleTable};
use clonekit::codec::{contract_type_id, keccak256};
use clonekit::factory::{CloneFactory, DeploymentLog};
use clonekit::ledger::{CallContext, ContractLogic, MemoryLedger};
use clonekit::registry::ImplementationRegistry;
use clonekit::types::{Address, Digest};
use std::sync::Arc;

pub const OPERATOR: Address = Address([0x0fu8; 20]);
pub const ALLOWLIST_ADMIN: Address = Address([0xadu8; 20]);
pub const OUTSIDER: Address = Address([0x99u8; 20]);
pub const IMPLEMENTATION: Address = Address([0x10u8; 20]);
pub const IMPLEMENTATION_V2: Address = Address([0x11u8; 20]);

/// Slot the test logic writes its owner hash into
pub const OWNER_SLOT: Digest = [0u8; 32];

/// Drop-style implementation logic
///
/// The initializer stores keccak(init_args) as the owner and rejects empty
/// arguments. Calls return the stored owner hash.
pub struct DropLogic {
    pub version: u8,
}

impl ContractLogic for DropLogic {
    fn contract_type(&self) -> Digest {
        contract_type_id("DropERC721").unwrap_or_default()
    }

    fn contract_version(&self) -> u8 {
        self.version
    }

    fn initialize(&self, ctx: &mut CallContext<'_>, init_args: &[u8]) -> Result<(), String> {
        if init_args.is_empty() {
            return Err("owner required".to_string());
        }
        ctx.sstore(OWNER_SLOT, keccak256(init_args));
        Ok(())
    }

    fn call(&self, ctx: &mut CallContext<'_>, _input: &[u8]) -> Result<Vec<u8>, String> {
        Ok(ctx.sload(&OWNER_SLOT).to_vec())
    }
}

pub fn roles() -> Arc<RoleTable> {
    let table = RoleTable::new();
    table.bootstrap(factory_role(), OPERATOR);
    table.bootstrap(allowlist_admin_role(), ALLOWLIST_ADMIN);
    Arc::new(table)
}

/// Factory over a ledger holding `IMPLEMENTATION` (v1) and `IMPLEMENTATION_V2` (v2),
/// neither registered yet
pub fn factory() -> (CloneFactory<MemoryLedger>, Arc<DeploymentLog>) {
    let mut ledger = MemoryLedger::new();
    ledger
        .install(IMPLEMENTATION, Arc::new(DropLogic { version: 1 }))
        .unwrap();
    ledger
        .install(IMPLEMENTATION_V2, Arc::new(DropLogic { version: 2 }))
        .unwrap();
    let log = Arc::new(DeploymentLog::new());
    let factory = CloneFactory::new(ledger, ImplementationRegistry::new(roles()), log.clone());
    (factory, log)
}

pub fn salt(n: u8) -> [u8; 32] {
    let mut salt = [0u8; 32];
    salt[31] = n;
    salt
}
