//! Merkle Allowlist Engine
//!
//! Binary keccak-256 Merkle trees with sorted-pair hashing: every parent is
//! the hash of its two children ordered by value, never by position. This is
//! the layout OpenZeppelin's `MerkleProof.verify` expects, so proofs built
//! here verify on-chain.

pub mod builder;
pub mod proof;

pub use builder::{MerkleTree, TreeOptions};
pub use proof::{hash_pair, process_proof, verify};
