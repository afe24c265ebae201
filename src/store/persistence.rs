//! Persistence layer for the Registry Store

use crate::allowlist::PublishedRoot;
use crate::error::StorageError;
use crate::registry::ImplementationEntry;
use crate::store::RegistryStore;
use crate::types::Address;
use std::path::Path;
use tracing::debug;

const ENTRY_PREFIX: &str = "impl:";
const ROOT_PREFIX: &str = "root:";

/// Sled-based implementation of RegistryStore
pub struct SledRegistryStore {
    db: sled::Db,
}

impl SledRegistryStore {
    /// Open (or create) the database directory at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path.as_ref()).map_err(|e| {
            StorageError::Database(format!(
                "Failed to open sled database at {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Ok(Self { db })
    }

    /// Block until all writes are on disk
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }

    fn entry_key(address: &Address) -> String {
        format!("{}{}", ENTRY_PREFIX, address)
    }

    fn root_key(name: &str) -> String {
        format!("{}{}", ROOT_PREFIX, name)
    }
}

impl RegistryStore for SledRegistryStore {
    fn load_entries(&self) -> Result<Vec<ImplementationEntry>, StorageError> {
        let mut entries = Vec::new();
        for item in self.db.scan_prefix(ENTRY_PREFIX.as_bytes()) {
            let (_, value) = item?;
            entries.push(bincode::deserialize::<ImplementationEntry>(&value)?);
        }
        debug!(count = entries.len(), "Loaded registry entries");
        Ok(entries)
    }

    fn save_entry(&self, entry: &ImplementationEntry) -> Result<(), StorageError> {
        let value = bincode::serialize(entry)?;
        self
            .db
            .insert(Self::entry_key(&entry.address).as_bytes(), value)?;
        Ok(())
    }

    fn load_root(&self, name: &str) -> Result<Option<PublishedRoot>, StorageError> {
        match self.db.get(Self::root_key(name).as_bytes())? {
            Some(value) => Ok(Some(bincode::deserialize(&value)?)),
            None => Ok(None),
        }
    }

    fn save_root(&self, name: &str, root: &PublishedRoot) -> Result<(), StorageError> {
        let value = bincode::serialize(root)?;
        self.db.insert(Self::root_key(name).as_bytes(), value)?;
        Ok(())
    }
}
