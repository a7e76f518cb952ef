use serde::{Deserialize, Serialize};

use crate::error::CryptoError;
use crate::hashing::{self, Digest};

/// Compute the Merkle root of a list of leaf digests.
/// Empty input returns a zero digest; a single leaf is its own root.
pub fn merkle_root(leaves: &[Digest]) -> Digest {
    if leaves.is_empty() {
        return [0u8; 32];
    }
    if leaves.len() == 1 {
        return leaves[0];
    }

    let mut current_level: Vec<Digest> = leaves.to_vec();

    while current_level.len() > 1 {
        let mut next_level = Vec::with_capacity(current_level.len().div_ceil(2));
        for chunk in current_level.chunks(2) {
            let mut combined = Vec::with_capacity(64);
            combined.extend_from_slice(&chunk[0]);
            if chunk.len() == 2 {
                combined.extend_from_slice(&chunk[1]);
            } else {
                // Odd node pairs with itself
                combined.extend_from_slice(&chunk[0]);
            }
            next_level.push(hashing::hash(&combined));
        }
        current_level = next_level;
    }

    current_level[0]
}

/// Sibling path authenticating one leaf against a Merkle root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePath {
    /// Index of the leaf in the original list.
    pub leaf_index: usize,
    /// Sibling digests from the leaf level up to the root.
    pub siblings: Vec<Digest>,
    /// Direction flags, true = sibling is on the right.
    pub directions: Vec<bool>,
}

impl MerklePath {
    /// Number of levels in the path.
    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    /// True for single-leaf trees, where the leaf is the root.
    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }
}

/// Build the sibling path for the leaf at `index`.
pub fn merkle_path(leaves: &[Digest], index: usize) -> Result<MerklePath, CryptoError> {
    if index >= leaves.len() {
        return Err(CryptoError::IndexOutOfRange {
            index,
            leaf_count: leaves.len(),
        });
    }

    let mut siblings = Vec::new();
    let mut directions = Vec::new();

    let mut current_level = leaves.to_vec();
    let mut current_index = index;

    while current_level.len() > 1 {
        let sibling_index = if current_index % 2 == 0 {
            current_index + 1
        } else {
            current_index - 1
        };

        if sibling_index < current_level.len() {
            siblings.push(current_level[sibling_index]);
            directions.push(current_index % 2 == 0); // true = sibling on the right
        } else {
            // Odd node pairs with itself
            siblings.push(current_level[current_index]);
            directions.push(true);
        }

        let mut next_level = Vec::with_capacity(current_level.len().div_ceil(2));
        for chunk in current_level.chunks(2) {
            let mut combined = Vec::with_capacity(64);
            combined.extend_from_slice(&chunk[0]);
            if chunk.len() == 2 {
                combined.extend_from_slice(&chunk[1]);
            } else {
                combined.extend_from_slice(&chunk[0]);
            }
            next_level.push(hashing::hash(&combined));
        }
        current_level = next_level;
        current_index /= 2;
    }

    Ok(MerklePath {
        leaf_index: index,
        siblings,
        directions,
    })
}

/// Recompute the root from a leaf and its sibling path, comparing against
/// the expected root.
pub fn verify_merkle_path(leaf: &Digest, path: &MerklePath, root: &Digest) -> bool {
    if path.siblings.len() != path.directions.len() {
        return false;
    }

    let mut current = *leaf;
    for (sibling, is_right) in path.siblings.iter().zip(&path.directions) {
        let mut combined = Vec::with_capacity(64);
        if *is_right {
            combined.extend_from_slice(&current);
            combined.extend_from_slice(sibling);
        } else {
            combined.extend_from_slice(sibling);
            combined.extend_from_slice(&current);
        }
        current = hashing::hash(&combined);
    }

    current == *root
}
