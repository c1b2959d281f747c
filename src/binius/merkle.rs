//! Binary Merkle commitment over opaque byte leaves.
//!
//! Leaves are SHA-256 hashed, then adjacent nodes are paired left-to-right
//! level by level; the last node of an odd level is paired with itself.
//! Every level is retained so branches can be extracted without rehashing.

use rayon::prelude::*;
use sha2::{Digest, Sha256};

use super::errors::{ProofError, ProofResult};

/// A 256-bit node hash.
pub type MerkleDigest = [u8; 32];

fn hash_leaf(data: &[u8]) -> MerkleDigest {
    Sha256::digest(data).into()
}

fn hash_pair(left: &MerkleDigest, right: &MerkleDigest) -> MerkleDigest {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// A Merkle tree retaining all levels bottom-up; the top level is the
/// singleton root.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    levels: Vec<Vec<MerkleDigest>>,
    leaf_count: usize,
}

impl MerkleTree {
    /// Build a tree over the given leaves. Rejects empty input.
    pub fn new<T: AsRef<[u8]> + Sync>(leaves: &[T]) -> ProofResult<Self> {
        if leaves.is_empty() {
            return Err(ProofError::empty_input("Merkle commitment leaves"));
        }
        let leaf_count = leaves.len();
        let mut current: Vec<MerkleDigest> =
            leaves.par_iter().map(|leaf| hash_leaf(leaf.as_ref())).collect();

        let mut levels = Vec::new();
        while current.len() > 1 {
            let next = current
                .chunks(2)
                .map(|pair| hash_pair(&pair[0], pair.get(1).unwrap_or(&pair[0])))
                .collect();
            levels.push(current);
            current = next;
        }
        levels.push(current);

        Ok(Self { levels, leaf_count })
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// The commitment: the final singleton node.
    pub fn root(&self) -> MerkleDigest {
        self.levels[self.levels.len() - 1][0]
    }

    /// Sibling hashes from the leaf at `index` up to (excluding) the root.
    /// At an odd boundary the node is its own sibling.
    pub fn branch(&self, index: usize) -> ProofResult<Vec<MerkleDigest>> {
        if index >= self.leaf_count {
            return Err(ProofError::shape_mismatch(
                "Merkle branch",
                format!("leaf index {index} out of range for {} leaves", self.leaf_count),
            ));
        }
        let mut path = Vec::with_capacity(self.levels.len() - 1);
        let mut idx = index;
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = if idx % 2 == 0 {
                if idx + 1 < level.len() {
                    idx + 1
                } else {
                    idx
                }
            } else {
                idx - 1
            };
            path.push(level[sibling]);
            idx /= 2;
        }
        Ok(path)
    }
}

/// Recompute the path from `leaf_bytes` at `index` through `branch` and
/// compare against `root`.
pub fn verify_branch(
    root: &MerkleDigest,
    index: usize,
    leaf_bytes: &[u8],
    branch: &[MerkleDigest],
) -> bool {
    let mut current = hash_leaf(leaf_bytes);
    let mut idx = index;
    for sibling in branch {
        current = if idx % 2 == 0 {
            hash_pair(&current, sibling)
        } else {
            hash_pair(sibling, &current)
        };
        idx /= 2;
    }
    current == *root
}
