//! Deterministic (CREATE2) address derivation

use crate::clone::template::init_code_hash;
use crate::codec::keccak256;
use crate::types::{Address, Digest, Salt};
use tracing::trace;

/// CREATE2 address: last 20 bytes of keccak256(0xff ‖ deployer ‖ salt ‖ init_code_hash)
pub fn create2_address(deployer: &Address, salt: &Salt, init_code_hash: &Digest) -> Address {
    let mut buf = [0u8; 1 + 20 + 32 + 32];
    buf[0] = 0xff;
    buf[1..21].copy_from_slice(deployer.as_bytes());
    buf[21..53].copy_from_slice(salt);
    buf[53..].copy_from_slice(init_code_hash);
    let hash = keccak256(&buf);
    let mut out = [0u8; 20];
    out.copy_from_slice(&hash[12..]);
    Address(out)
}

/// Address a minimal proxy for `implementation` will occupy when deployed by
/// `deployer` with `salt`
///
/// Pure: no ledger access, identical on every machine.
pub fn derive_address(implementation: &Address, deployer: &Address, salt: &Salt) -> Address {
    let address = create2_address(deployer, salt, &init_code_hash(implementation));
    trace!(
        implementation = %implementation,
        deployer = %deployer,
        salt = %hex::encode(salt),
        address = %address,
        "Derived clone address"
    );
    address
}
