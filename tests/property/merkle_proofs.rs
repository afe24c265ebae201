//! Property-based tests for allowlist tree proofs

use clonekit::merkle::{verify, MerkleTree, TreeOptions};
use clonekit::types::Digest;
use proptest::prelude::*;

fn leaf_sets() -> impl Strategy<Value = Vec<Digest>> {
    prop::collection::vec(any::<[u8; 32]>(), 1..40)
}

/// Every slot's proof verifies against the root
#[test]
fn test_every_leaf_proves_membership() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&leaf_sets(), |leaves| {
            let tree = MerkleTree::build(leaves.clone()).unwrap();
            let root = tree.root();
            for (index, leaf) in leaves.iter().enumerate() {
                let proof = tree.proof_at(index).unwrap();
                prop_assert_eq!(proof.len(), tree.depth());
                prop_assert!(verify(&root, leaf, &proof));
            }
            Ok(())
        })
        .unwrap();
}

/// Flipping any single bit of a proof element breaks verification
#[test]
fn test_tampered_proof_is_rejected() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                prop::collection::vec(any::<[u8; 32]>(), 2..40),
                any::<prop::sample::Index>(),
                0usize..256,
            ),
            |(leaves, pick, bit)| {
                let tree = MerkleTree::build(leaves.clone()).unwrap();
                let index = pick.index(leaves.len());
                let mut proof = tree.proof_at(index).unwrap();

                let element = bit % proof.len();
                proof[element][(bit / 8) % 32] ^= 1 << (bit % 8);
                prop_assert!(!verify(&tree.root(), &leaves[index], &proof));
                Ok(())
            },
        )
        .unwrap();
}

/// A digest outside the set does not verify with a member's proof
#[test]
fn test_non_member_is_rejected() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(leaf_sets(), any::<[u8; 32]>()), |(leaves, outsider)| {
            prop_assume!(!leaves.contains(&outsider));
            let tree = MerkleTree::build(leaves).unwrap();
            let proof = tree.proof_at(0).unwrap();
            prop_assert!(!verify(&tree.root(), &outsider, &proof));
            Ok(())
        })
        .unwrap();
}

/// With sorting enabled the root ignores input order
#[test]
fn test_sorted_root_is_order_independent() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let options = TreeOptions { sort_leaves: true };

    runner
        .run(&leaf_sets(), |leaves| {
            let mut reversed = leaves.clone();
            reversed.reverse();
            let forward = MerkleTree::build_with(leaves, options).unwrap();
            let backward = MerkleTree::build_with(reversed, options).unwrap();
            prop_assert_eq!(forward.root(), backward.root());
            Ok(())
        })
        .unwrap();
}
