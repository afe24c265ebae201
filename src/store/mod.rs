//! Registry Store
//!
//! Durable copy of implementation registry entries and published allowlist
//! roots, so CLI invocations see the state earlier invocations left behind.

pub mod persistence;

pub use persistence::SledRegistryStore;

use crate::allowlist::PublishedRoot;
use crate::error::StorageError;
use crate::registry::ImplementationEntry;

/// Registry Store interface
pub trait RegistryStore {
    /// Every persisted entry, ordered by address
    fn load_entries(&self) -> Result<Vec<ImplementationEntry>, StorageError>;

    /// Insert or overwrite the entry for `entry.address`
    fn save_entry(&self, entry: &ImplementationEntry) -> Result<(), StorageError>;

    fn load_root(&self, name: &str) -> Result<Option<PublishedRoot>, StorageError>;

    fn save_root(&self, name: &str, root: &PublishedRoot) -> Result<(), StorageError>;
}
