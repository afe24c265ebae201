//! Tree builder for allowlist Merkle trees

use crate::error::MerkleError;
use crate::merkle::proof::hash_pair;
use crate::types::Digest;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Build options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeOptions {
    /// Sort leaves by value before building, making the root independent of
    /// input order. Proof lookups still work by digest.
    #[serde(default)]
    pub sort_leaves: bool,
}

/// Complete Merkle tree: every level from the leaves (level 0) to the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    levels: Vec<Vec<Digest>>,
}

impl MerkleTree {
    /// Build a tree over `leaves` in the given order
    pub fn build(leaves: Vec<Digest>) -> Result<Self, MerkleError> {
        Self::build_with(leaves, TreeOptions::default())
    }

    /// Build a tree with explicit options
    ///
    /// Duplicate leaves are kept as independent slots. A level with an odd
    /// number of nodes pairs its last node with itself.
    #[instrument(skip(leaves), fields(leaf_count = leaves.len()))]
    pub fn build_with(mut leaves: Vec<Digest>, options: TreeOptions) -> Result<Self, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptyInput);
        }
        if options.sort_leaves {
            leaves.sort_unstable();
        }

        let mut levels = vec![leaves];
        loop {
            let current = &levels[levels.len() - 1];
            if current.len() == 1 {
                break;
            }
            let next: Vec<Digest> = current
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hash_pair(left, right),
                    [single] => hash_pair(single, single),
                    _ => unreachable!("chunks(2) yields one or two nodes"),
                })
                .collect();
            levels.push(next);
        }

        let tree = MerkleTree { levels };
        debug!(
            depth = tree.depth(),
            root = %hex::encode(tree.root()),
            "Merkle tree built"
        );
        Ok(tree)
    }

    /// Apex digest
    pub fn root(&self) -> Digest {
        self.levels[self.levels.len() - 1][0]
    }

    /// Leaves in tree order
    pub fn leaves(&self) -> &[Digest] {
        &self.levels[0]
    }

    /// Number of leaf slots
    pub fn len(&self) -> usize {
        self.levels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels[0].is_empty()
    }

    /// Number of hashing levels above the leaves (= proof length)
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// First slot holding `leaf`, in tree order
    pub fn position(&self, leaf: &Digest) -> Option<usize> {
        self.levels[0].iter().position(|l| l == leaf)
    }

    /// How many slots hold `leaf`
    ///
    /// A proof from [`MerkleTree::proof`] always authorizes the first
    /// occurrence; the verifier cannot tell occurrences apart.
    pub fn occurrences(&self, leaf: &Digest) -> usize {
        self.levels[0].iter().filter(|l| *l == leaf).count()
    }

    /// Proof for the first occurrence of `leaf`
    pub fn proof(&self, leaf: &Digest) -> Result<Vec<Digest>, MerkleError> {
        let index = self
            .position(leaf)
            .ok_or(MerkleError::LeafNotFound(*leaf))?;
        self.proof_at(index)
    }

    /// Proof for the leaf in slot `index`
    pub fn proof_at(&self, index: usize) -> Result<Vec<Digest>, MerkleError> {
        let len = self.len();
        if index >= len {
            return Err(MerkleError::IndexOutOfBounds { index, len });
        }

        let mut proof = Vec::with_capacity(self.depth());
        let mut current = index;
        for level in &self.levels[..self.depth()] {
            // The last node of an odd level is its own sibling
            let sibling = level.get(current ^ 1).unwrap_or(&level[current]);
            proof.push(*sibling);
            current /= 2;
        }
        Ok(proof)
    }
}
