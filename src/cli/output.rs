//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map domain errors to a single line for stderr, prefixed with a stable
/// category so scripts can tell "not approved" from "already deployed".
pub fn map_error(e: &ApiError) -> String {
    let category = match e {
        ApiError::Unauthorized { .. } => "unauthorized",
        ApiError::AlreadyRegistered(_)
        | ApiError::NotRegistered(_)
        | ApiError::VersionTaken { .. }
        | ApiError::UnknownContractType(_)
        | ApiError::ImplementationNotApproved(_)
        | ApiError::ProxyImplementation(_) => "registry",
        ApiError::AddressCollision(_) | ApiError::InitializationFailed { .. } => "deployment",
        ApiError::ClaimantNotFound(_)
        | ApiError::NoRootPublished
        | ApiError::EncodingMismatch { .. }
        | ApiError::Merkle(_) => "allowlist",
        ApiError::Codec(_) => "input",
        ApiError::Ledger(_) => "ledger",
        ApiError::StorageError(_) => "storage",
        ApiError::ConfigError(_) => "config",
    };
    format!("{}: {}", category, e)
}
