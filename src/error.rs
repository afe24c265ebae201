//! Error types for the clone factory and allowlist tooling.

use crate::codec::leaf::LeafEncoding;
use crate::types::{Address, Digest};
use thiserror::Error;

/// Encoding and decoding errors raised before any hash is computed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

/// Off-chain Merkle tooling errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MerkleError {
    #[error("Cannot build a Merkle tree from zero leaves")]
    EmptyInput,

    #[error("Leaf not found in tree: 0x{}", hex::encode(.0))]
    LeafNotFound(Digest),

    #[error("Leaf index {index} is out of bounds for tree with {len} leaves")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Record {index} uses {found} encoding, expected {expected}")]
    MixedEncoding {
        index: usize,
        expected: LeafEncoding,
        found: LeafEncoding,
    },

    #[error("Leaf encoding failed: {0}")]
    Codec(#[from] CodecError),
}

/// Errors surfaced by the ledger execution environment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Code already exists at {0}")]
    CodeExists(Address),

    #[error("No contract code at {0}")]
    NoCode(Address),

    #[error("Call to {address} reverted: {reason}")]
    Reverted { address: Address, reason: String },

    #[error("Contract at {0} is already initialized")]
    AlreadyInitialized(Address),
}

/// Persistence errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::Database(err.to_string())
    }
}

impl From<bincode::Error> for StorageError {
    fn from(err: bincode::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Errors returned by gated writes and deployment operations
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Caller {caller} is missing role {role}")]
    Unauthorized { caller: Address, role: String },

    #[error("Implementation {0} is already registered")]
    AlreadyRegistered(Address),

    #[error("Implementation {0} is not registered")]
    NotRegistered(Address),

    #[error("Version {version} of {contract_type} is already taken by {existing}")]
    VersionTaken {
        contract_type: String,
        version: u8,
        existing: Address,
    },

    #[error("No approved implementation for contract type {0}")]
    UnknownContractType(String),

    #[error("Implementation {0} is not approved")]
    ImplementationNotApproved(Address),

    #[error("{0} is a clone proxy, not an implementation")]
    ProxyImplementation(Address),

    #[error("A contract already occupies {0}")]
    AddressCollision(Address),

    #[error("Initialization of clone at {target} failed: {reason}")]
    InitializationFailed { target: Address, reason: String },

    #[error("Claimant {0} is not in the eligibility list")]
    ClaimantNotFound(Address),

    #[error("No Merkle root has been published")]
    NoRootPublished,

    #[error("Leaf uses {found} encoding but the allowlist expects {expected}")]
    EncodingMismatch {
        expected: LeafEncoding,
        found: LeafEncoding,
    },

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Merkle error: {0}")]
    Merkle(#[from] MerkleError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
