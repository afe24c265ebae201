//! Minimal-proxy clones
//!
//! The EIP-1167 proxy template lives in [`template`] and is the only place
//! the proxy bytes are defined. Both address prediction ([`address`]) and
//! the factory's deployment step build on it.

pub mod address;
pub mod template;

pub use address::{create2_address, derive_address};
pub use template::{
    implementation_of, init_code_hash, proxy_init_code, proxy_runtime_code, runtime_of_init_code,
};
