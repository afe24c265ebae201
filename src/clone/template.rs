//! EIP-1167 minimal proxy bytecode
//!
//! Init code = creation header ‖ runtime prefix ‖ implementation ‖ runtime suffix.
//! The creation header copies the 45-byte runtime to memory and returns it.

use crate::codec::keccak256;
use crate::types::{Address, Digest};

/// `RETURNDATASIZE PUSH1 2d DUP1 PUSH1 0a RETURNDATASIZE CODECOPY DUP2 RETURN`
const CREATION_HEADER: [u8; 10] = [0x3d, 0x60, 0x2d, 0x80, 0x60, 0x0a, 0x3d, 0x39, 0x81, 0xf3];

/// Runtime code up to and including `PUSH20`
const RUNTIME_PREFIX: [u8; 10] = [0x36, 0x3d, 0x3d, 0x37, 0x3d, 0x3d, 0x3d, 0x36, 0x3d, 0x73];

/// Runtime code after the implementation address
const RUNTIME_SUFFIX: [u8; 15] = [
    0x5a, 0xf4, 0x3d, 0x82, 0x80, 0x3e, 0x90, 0x3d, 0x91, 0x60, 0x2b, 0x57, 0xfd, 0x5b, 0xf3,
];

pub const RUNTIME_LEN: usize = RUNTIME_PREFIX.len() + 20 + RUNTIME_SUFFIX.len();
pub const INIT_CODE_LEN: usize = CREATION_HEADER.len() + RUNTIME_LEN;

/// Deployed (runtime) bytecode of a proxy delegating to `implementation`
pub fn proxy_runtime_code(implementation: &Address) -> Vec<u8> {
    let mut code = Vec::with_capacity(RUNTIME_LEN);
    code.extend_from_slice(&RUNTIME_PREFIX);
    code.extend_from_slice(implementation.as_bytes());
    code.extend_from_slice(&RUNTIME_SUFFIX);
    code
}

/// Creation bytecode of a proxy delegating to `implementation`
pub fn proxy_init_code(implementation: &Address) -> Vec<u8> {
    let mut code = Vec::with_capacity(INIT_CODE_LEN);
    code.extend_from_slice(&CREATION_HEADER);
    code.extend_from_slice(&proxy_runtime_code(implementation));
    code
}

/// keccak-256 of the proxy creation bytecode
pub fn init_code_hash(implementation: &Address) -> Digest {
    keccak256(&proxy_init_code(implementation))
}

/// Recover the implementation from proxy runtime bytecode
///
/// Returns `None` for anything that is not exactly a minimal proxy.
pub fn implementation_of(runtime_code: &[u8]) -> Option<Address> {
    if runtime_code.len() != RUNTIME_LEN {
        return None;
    }
    let (prefix, rest) = runtime_code.split_at(RUNTIME_PREFIX.len());
    let (implementation, suffix) = rest.split_at(20);
    if prefix != &RUNTIME_PREFIX[..] || suffix != &RUNTIME_SUFFIX[..] {
        return None;
    }
    Address::from_slice(implementation).ok()
}

/// Runtime bytecode produced by running proxy creation code
///
/// Returns `None` unless `init_code` is exactly a minimal-proxy creation
/// sequence.
pub fn runtime_of_init_code(init_code: &[u8]) -> Option<&[u8]> {
    if init_code.len() != INIT_CODE_LEN || init_code[..CREATION_HEADER.len()] != CREATION_HEADER {
        return None;
    }
    let runtime = &init_code[CREATION_HEADER.len()..];
    implementation_of(runtime).map(|_| runtime)
}
