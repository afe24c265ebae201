//! Proof verification
//!
//! Depends only on `hash_pair`, never on the tree builder: a verifier holds
//! the root, one leaf and its proof, nothing else.

use crate::codec::keccak256;
use crate::types::Digest;

/// Hash two sibling digests after ordering them by value
pub fn hash_pair(a: &Digest, b: &Digest) -> Digest {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(lo);
    buf[32..].copy_from_slice(hi);
    keccak256(&buf)
}

/// Fold a proof from `leaf` upward and return the resulting root
pub fn process_proof(leaf: &Digest, proof: &[Digest]) -> Digest {
    proof
        .iter()
        .fold(*leaf, |computed, sibling| hash_pair(&computed, sibling))
}

/// Check that `proof` links `leaf` to `root`
pub fn verify(root: &Digest, leaf: &Digest, proof: &[Digest]) -> bool {
    process_proof(leaf, proof) == *root
}
