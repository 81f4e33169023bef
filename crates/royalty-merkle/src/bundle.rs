//! Per-epoch claim bundle.
//!
//! The bundle is what holders receive after an epoch is published: the root,
//! and for every leaf its index, owner and sibling list as `0x` hex values.
//! Decoding an entry's `proof` yields exactly the [`MerkleProof`] that the
//! pull-mode `claim` and `debug_verify` expect.

use royalty_types::{Address, Hash256};
use serde::{Deserialize, Serialize};

use crate::tree::{self, MerkleProof, MerkleTree};
use crate::{MerkleError, Result};

/// One holder's claim material.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimEntry {
    /// Leaf index to claim with.
    pub index: u32,
    /// Owner committed in the leaf.
    pub owner: Address,
    /// Sibling chain, leaf to root.
    pub proof: MerkleProof,
}

impl ClaimEntry {
    /// Check this entry against a root without touching any engine.
    pub fn verify(&self, root: &Hash256) -> bool {
        tree::verify(self.index, &self.owner, &self.proof, root)
    }
}

/// All claim material for one epoch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimBundle {
    /// Epoch the root was published for.
    pub epoch_id: u32,
    /// Published root.
    pub root_hash: Hash256,
    /// Item count used for per-share division.
    pub total: u32,
    /// Entries in leaf order.
    pub holders: Vec<ClaimEntry>,
}

impl ClaimBundle {
    /// Assemble the bundle for `tree` under `epoch_id`.
    pub fn new(epoch_id: u32, tree: &MerkleTree) -> Self {
        let holders = tree
            .leaves()
            .iter()
            .map(|leaf| ClaimEntry {
                index: leaf.index,
                owner: leaf.owner,
                proof: tree.proof(leaf.index).cloned().unwrap_or_default(),
            })
            .collect();

        Self {
            epoch_id,
            root_hash: tree.root(),
            total: u32::try_from(tree.len()).unwrap_or(u32::MAX),
            holders,
        }
    }

    /// First entry owned by `owner`.
    pub fn entry_for(&self, owner: &Address) -> Option<&ClaimEntry> {
        self.holders.iter().find(|entry| &entry.owner == owner)
    }

    /// Every entry owned by `owner` (one per item held).
    pub fn entries_for<'a>(&'a self, owner: &'a Address) -> impl Iterator<Item = &'a ClaimEntry> {
        self.holders.iter().filter(move |entry| &entry.owner == owner)
    }

    /// Decode a bundle from JSON.
    ///
    /// # Errors
    ///
    /// - [`MerkleError::InvalidHash`] if any value fails to decode
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| MerkleError::InvalidHash(e.to_string()))
    }

    /// Encode the bundle as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// - [`MerkleError::Serialization`] if encoding fails
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| MerkleError::Serialization(e.to_string()))
    }
}
