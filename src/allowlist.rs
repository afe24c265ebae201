//! Merkle allowlist
//!
//! Two halves of one mechanism:
//!
//! - [`AllowlistSnapshot`]: the off-chain generator. It hashes an
//!   eligibility list into a tree and hands out `(root, proof)` bundles.
//! - [`Allowlist`]: the consumer. It holds the currently published root and
//!   checks claims against it.
//!
//! A published root pins one leaf schema; records of the other schema are
//! rejected rather than silently failing to verify.

use crate::access::{allowlist_admin_role, require_role, Authorizer};
use crate::codec::abi::encode_bytes32_array;
use crate::codec::{LeafEncoding, LeafRecord};
use crate::error::{ApiError, MerkleError};
use crate::merkle::{verify, MerkleTree, TreeOptions};
use crate::types::{format_digest, Address, Digest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Everything a claimant submits alongside a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimBundle {
    pub root: Digest,
    pub leaf: Digest,
    pub proof: Vec<Digest>,
    /// How many times the leaf appears in the list; the proof covers the first
    pub occurrences: usize,
}

impl ClaimBundle {
    /// Proof as ABI-encoded `bytes32[]`
    pub fn abi_encoded_proof(&self) -> Vec<u8> {
        encode_bytes32_array(&self.proof)
    }
}

/// Tree built from one eligibility list
#[derive(Debug, Clone)]
pub struct AllowlistSnapshot {
    encoding: LeafEncoding,
    records: Vec<LeafRecord>,
    tree: MerkleTree,
}

impl AllowlistSnapshot {
    /// Hash `records` and build their tree
    ///
    /// All records must share the schema of the first one.
    #[instrument(skip_all, fields(records = records.len(), sort_leaves = options.sort_leaves))]
    pub fn from_records(
        records: Vec<LeafRecord>,
        options: TreeOptions,
    ) -> Result<Self, MerkleError> {
        let encoding = records.first().ok_or(MerkleError::EmptyInput)?.encoding();
        if let Some((index, found)) = records
            .iter()
            .map(LeafRecord::encoding)
            .enumerate()
            .find(|(_, e)| *e != encoding)
        {
            return Err(MerkleError::MixedEncoding {
                index,
                expected: encoding,
                found,
            });
        }

        let digests = records
            .iter()
            .map(LeafRecord::digest)
            .collect::<Result<Vec<_>, _>>()?;
        let tree = MerkleTree::build_with(digests, options)?;
        debug!(
            root = %format_digest(&tree.root()),
            encoding = %encoding,
            "Allowlist snapshot built"
        );

        Ok(Self {
            encoding,
            records,
            tree,
        })
    }

    pub fn encoding(&self) -> LeafEncoding {
        self.encoding
    }

    pub fn root(&self) -> Digest {
        self.tree.root()
    }

    pub fn tree(&self) -> &MerkleTree {
        &self.tree
    }

    /// Records in input order
    pub fn records(&self) -> &[LeafRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn proof_for(&self, record: &LeafRecord) -> Result<Vec<Digest>, MerkleError> {
        self.tree.proof(&record.digest()?)
    }

    pub fn claim_bundle(&self, record: &LeafRecord) -> Result<ClaimBundle, MerkleError> {
        let leaf = record.digest()?;
        Ok(ClaimBundle {
            root: self.root(),
            leaf,
            proof: self.tree.proof(&leaf)?,
            occurrences: self.tree.occurrences(&leaf),
        })
    }

    /// First record of `claimant` in input order
    pub fn find_by_claimant(&self, claimant: &Address) -> Option<&LeafRecord> {
        self.records.iter().find(|r| r.claimant() == *claimant)
    }
}

/// A root as published to the consumer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedRoot {
    pub root: Digest,
    pub version: u64,
    pub encoding: LeafEncoding,
    pub published_by: Address,
    pub published_at: DateTime<Utc>,
}

/// Consumer-side allowlist state
pub struct Allowlist {
    encoding: LeafEncoding,
    published: Option<PublishedRoot>,
    authorizer: Arc<dyn Authorizer>,
}

impl Allowlist {
    pub fn new(encoding: LeafEncoding, authorizer: Arc<dyn Authorizer>) -> Self {
        Self {
            encoding,
            published: None,
            authorizer,
        }
    }

    pub fn encoding(&self) -> LeafEncoding {
        self.encoding
    }

    /// Replace the published root; returns the new root version
    ///
    /// Proofs against the previous root stop verifying.
    pub fn publish_root(&mut self, root: Digest, caller: &Address) -> Result<u64, ApiError> {
        require_role(self.authorizer.as_ref(), &allowlist_admin_role(), caller)?;
        let version = self.published.as_ref().map_or(1, |p| p.version + 1);
        self.published = Some(PublishedRoot {
            root,
            version,
            encoding: self.encoding,
            published_by: *caller,
            published_at: Utc::now(),
        });
        info!(root = %format_digest(&root), version, caller = %caller, "Allowlist root published");
        Ok(version)
    }

    pub fn current_root(&self) -> Option<Digest> {
        self.published.as_ref().map(|p| p.root)
    }

    pub fn published(&self) -> Option<&PublishedRoot> {
        self.published.as_ref()
    }

    /// Reinstate a persisted root
    pub fn restore(&mut self, published: PublishedRoot) -> Result<(), ApiError> {
        if published.encoding != self.encoding {
            return Err(ApiError::EncodingMismatch {
                expected: self.encoding,
                found: published.encoding,
            });
        }
        self.published = Some(published);
        Ok(())
    }

    /// Check `record` against the published root
    pub fn verify_claim(&self, record: &LeafRecord, proof: &[Digest]) -> Result<bool, ApiError> {
        let published = self.published.as_ref().ok_or(ApiError::NoRootPublished)?;
        if record.encoding() != self.encoding {
            return Err(ApiError::EncodingMismatch {
                expected: self.encoding,
                found: record.encoding(),
            });
        }
        let leaf = record.digest()?;
        Ok(verify(&published.root, &leaf, proof))
    }
}
