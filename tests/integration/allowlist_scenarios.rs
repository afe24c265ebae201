//! Allowlist generation, publication and claim checks

use super::support::{roles, ALLOWLIST_ADMIN, OUTSIDER};
use clonekit::allowlist::{Allowlist, AllowlistSnapshot};
use clonekit::codec::abi::decode_bytes32_array;
use clonekit::codec::{parse_eligibility_list, LeafEncoding, LeafRecord};
use clonekit::error::{ApiError, MerkleError};
use clonekit::merkle::{hash_pair, verify, TreeOptions};
use clonekit::types::{Address, U256};

const CURRENCY: Address = Address([0x0cu8; 20]);

fn claim(claimant: u8, quantity: u64) -> LeafRecord {
    LeafRecord::Claim {
        claimant: Address([claimant; 20]),
        quantity: U256::from(quantity),
        price_per_unit: U256::from(1u64),
        currency: CURRENCY,
    }
}

/// Three-claimant list: B's two-element proof verifies for B and not for D
#[test]
fn test_three_leaf_scenario() {
    let a = claim(0xaa, 10);
    let b = claim(0xbb, 5);
    let d = claim(0xdd, 1);
    let snapshot = AllowlistSnapshot::from_records(
        vec![a.clone(), b.clone(), d.clone()],
        TreeOptions::default(),
    )
    .unwrap();

    let (ha, hb, hd) = (a.digest().unwrap(), b.digest().unwrap(), d.digest().unwrap());
    let expected_root = hash_pair(&hash_pair(&ha, &hb), &hash_pair(&hd, &hd));
    assert_eq!(snapshot.root(), expected_root);

    let proof_b = snapshot.proof_for(&b).unwrap();
    assert_eq!(proof_b, vec![ha, hash_pair(&hd, &hd)]);
    assert!(verify(&snapshot.root(), &hb, &proof_b));
    assert!(!verify(&snapshot.root(), &hd, &proof_b));
}

/// Publishing a new root invalidates proofs generated for the old one
#[test]
fn test_root_rotation() {
    let first = AllowlistSnapshot::from_records(
        vec![claim(1, 1), claim(2, 1), claim(3, 1)],
        TreeOptions::default(),
    )
    .unwrap();
    let second = AllowlistSnapshot::from_records(
        vec![claim(2, 1), claim(3, 1), claim(4, 1)],
        TreeOptions::default(),
    )
    .unwrap();

    let mut allowlist = Allowlist::new(LeafEncoding::Claim, roles());
    allowlist
        .publish_root(first.root(), &ALLOWLIST_ADMIN)
        .unwrap();
    let record = claim(2, 1);
    let old_proof = first.proof_for(&record).unwrap();
    assert!(allowlist.verify_claim(&record, &old_proof).unwrap());

    assert_eq!(
        allowlist
            .publish_root(second.root(), &ALLOWLIST_ADMIN)
            .unwrap(),
        2
    );
    assert!(!allowlist.verify_claim(&record, &old_proof).unwrap());
    let new_proof = second.proof_for(&record).unwrap();
    assert!(allowlist.verify_claim(&record, &new_proof).unwrap());
}

#[test]
fn test_publish_requires_admin() {
    let mut allowlist = Allowlist::new(LeafEncoding::Claim, roles());
    assert!(matches!(
        allowlist.publish_root([1u8; 32], &OUTSIDER),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(allowlist.current_root().is_none());
}

/// A claimant listed twice gets a proof for the first slot, and the bundle says so
#[test]
fn test_duplicate_claimant_entries() {
    let records = vec![claim(1, 1), claim(2, 1), claim(1, 1), claim(3, 1)];
    let snapshot = AllowlistSnapshot::from_records(records, TreeOptions::default()).unwrap();
    let bundle = snapshot.claim_bundle(&claim(1, 1)).unwrap();
    assert_eq!(bundle.occurrences, 2);
    assert_eq!(bundle.proof, snapshot.tree().proof_at(0).unwrap());
    assert!(verify(&bundle.root, &bundle.leaf, &bundle.proof));
    assert!(verify(&bundle.root, &bundle.leaf, &snapshot.tree().proof_at(2).unwrap()));
}

#[test]
fn test_abi_proof_decodes_back() {
    let records: Vec<_> = (1..=9).map(|i| claim(i, i as u64)).collect();
    let snapshot = AllowlistSnapshot::from_records(records, TreeOptions::default()).unwrap();
    let bundle = snapshot.claim_bundle(&claim(5, 5)).unwrap();
    assert_eq!(
        decode_bytes32_array(&bundle.abi_encoded_proof()).unwrap(),
        bundle.proof
    );
}

/// Sorting leaves makes the root independent of list order
#[test]
fn test_sorted_leaves_ignore_input_order() {
    let sorted = TreeOptions { sort_leaves: true };
    let forward: Vec<_> = (1..=6).map(|i| claim(i, 1)).collect();
    let mut backward = forward.clone();
    backward.reverse();

    let r1 = AllowlistSnapshot::from_records(forward.clone(), sorted)
        .unwrap()
        .root();
    let r2 = AllowlistSnapshot::from_records(backward.clone(), sorted)
        .unwrap()
        .root();
    assert_eq!(r1, r2);

    let u1 = AllowlistSnapshot::from_records(forward, TreeOptions::default())
        .unwrap()
        .root();
    let u2 = AllowlistSnapshot::from_records(backward, TreeOptions::default())
        .unwrap()
        .root();
    assert_ne!(u1, u2);
}

/// Parsed CSV lists feed straight into the generator
#[test]
fn test_eligibility_list_file_format() {
    let text = "\
# claimant,quantity,price,currency
0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa,10,1,0x0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c

0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb,5,1,0x0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c
";
    let records = parse_eligibility_list(text).unwrap();
    assert_eq!(records, vec![claim(0xaa, 10), claim(0xbb, 5)]);

    let mixed = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa,10,1,0x0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c\n\
                 0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb,5\n";
    let records = parse_eligibility_list(mixed).unwrap();
    assert!(matches!(
        AllowlistSnapshot::from_records(records, TreeOptions::default()),
        Err(MerkleError::MixedEncoding { index: 1, .. })
    ));
}
