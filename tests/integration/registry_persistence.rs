//! Registry entries and allowlist roots survive a reopen of the sled store

use super::support::{roles, ALLOWLIST_ADMIN, IMPLEMENTATION, IMPLEMENTATION_V2, OPERATOR};
use clonekit::allowlist::Allowlist;
use clonekit::codec::{contract_type_id, LeafEncoding};
use clonekit::registry::{ContractKind, ImplementationRegistry, ImplementationStatus};
use clonekit::store::{RegistryStore, SledRegistryStore};
use tempfile::TempDir;

#[test]
fn test_registry_reloads_identically() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store");
    let kind = ContractKind {
        contract_type: contract_type_id("Pack").unwrap(),
        version: 1,
    };

    {
        let store = SledRegistryStore::new(&path).unwrap();
        let mut registry = ImplementationRegistry::new(roles());
        registry
            .register_kind(IMPLEMENTATION, kind, &OPERATOR)
            .unwrap();
        registry.register(IMPLEMENTATION_V2, &OPERATOR).unwrap();
        registry.revoke(&IMPLEMENTATION_V2, &OPERATOR).unwrap();
        for entry in registry.entries() {
            store.save_entry(entry).unwrap();
        }
        store.flush().unwrap();
    }

    let store = SledRegistryStore::new(&path).unwrap();
    let mut registry = ImplementationRegistry::new(roles());
    registry.load_entries(store.load_entries().unwrap());

    assert_eq!(
        registry.status(&IMPLEMENTATION),
        ImplementationStatus::Approved
    );
    assert_eq!(
        registry.status(&IMPLEMENTATION_V2),
        ImplementationStatus::Revoked
    );
    assert_eq!(registry.latest(&kind.contract_type), Some(IMPLEMENTATION));
    assert_eq!(registry.entry(&IMPLEMENTATION).unwrap().kind, Some(kind));
}

#[test]
fn test_published_root_reloads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store");

    let published = {
        let store = SledRegistryStore::new(&path).unwrap();
        let mut allowlist = Allowlist::new(LeafEncoding::Airdrop, roles());
        allowlist.publish_root([3u8; 32], &ALLOWLIST_ADMIN).unwrap();
        allowlist.publish_root([4u8; 32], &ALLOWLIST_ADMIN).unwrap();
        let published = allowlist.published().unwrap().clone();
        store.save_root("season-1", &published).unwrap();
        store.flush().unwrap();
        published
    };

    let store = SledRegistryStore::new(&path).unwrap();
    let loaded = store.load_root("season-1").unwrap().unwrap();
    assert_eq!(loaded, published);

    let mut allowlist = Allowlist::new(LeafEncoding::Airdrop, roles());
    allowlist.restore(loaded).unwrap();
    assert_eq!(allowlist.current_root(), Some([4u8; 32]));
    assert_eq!(
        allowlist.publish_root([5u8; 32], &ALLOWLIST_ADMIN).unwrap(),
        3
    );
}

#[test]
fn test_restore_rejects_other_schema() {
    let mut claims = Allowlist::new(LeafEncoding::Claim, roles());
    claims.publish_root([1u8; 32], &ALLOWLIST_ADMIN).unwrap();
    let published = claims.published().unwrap().clone();

    let mut airdrop = Allowlist::new(LeafEncoding::Airdrop, roles());
    assert!(airdrop.restore(published).is_err());
    assert!(airdrop.current_root().is_none());
}
