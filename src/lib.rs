//! clonekit: deterministic clone deployment and Merkle allowlists
//!
//! Two mechanisms shared by a family of on-chain contracts:
//!
//! - a clone factory that deploys EIP-1167 minimal proxies of approved
//!   implementations at CREATE2 addresses computable before deployment,
//!   backed by a role-gated implementation registry;
//! - a Merkle allowlist engine that builds sorted-pair keccak trees from
//!   eligibility lists and produces and verifies claim proofs.
//!
//! The ledger the factory deploys into is abstract ([`ledger::Ledger`]);
//! [`ledger::MemoryLedger`] is the in-process implementation.

pub mod access;
pub mod allowlist;
pub mod batch;
pub mod cli;
pub mod clone;
pub mod codec;
pub mod config;
pub mod error;
pub mod factory;
pub mod ledger;
pub mod logging;
pub mod merkle;
pub mod registry;
pub mod store;
pub mod types;
