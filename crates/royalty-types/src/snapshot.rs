//! Leaves and owner snapshot files.
//!
//! A snapshot lists who owned each item of a collection at a point in time.
//! It is produced by an indexer outside this workspace and consumed here as
//! the ordered `(index, owner)` leaf list for one epoch.

use serde::{Deserialize, Serialize};

use crate::{Address, Hash256, Result, TypesError};

/// One eligible unit in a distribution round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Leaf {
    /// Position in the canonical leaf order.
    pub index: u32,
    /// Account entitled to this unit's share.
    pub owner: Address,
}

impl Leaf {
    /// Create a leaf.
    pub const fn new(index: u32, owner: Address) -> Self {
        Self { index, owner }
    }

    /// Fixed-width leaf encoding: `BE32(index) || workchain || account`.
    pub fn encode(&self) -> [u8; 37] {
        let mut out = [0u8; 37];
        out[..4].copy_from_slice(&self.index.to_be_bytes());
        out[4..].copy_from_slice(&self.owner.to_bytes());
        out
    }
}

/// One row of an owner snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotHolder {
    /// Item index within the collection.
    pub index: u32,
    /// Owner at snapshot time.
    pub owner: Address,
    /// Item address, when the indexer reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nft: Option<String>,
}

/// An owner snapshot file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSnapshot {
    /// Human-readable label.
    #[serde(default)]
    pub label: String,
    /// ISO-8601 creation time.
    #[serde(default)]
    pub created_at: String,
    /// Collection the items belong to.
    #[serde(default)]
    pub collection: String,
    /// Declared number of items.
    pub total: u32,
    /// Owner rows.
    pub holders: Vec<SnapshotHolder>,
}

impl OwnerSnapshot {
    /// Decode a snapshot from JSON text.
    ///
    /// # Errors
    ///
    /// - [`TypesError::InvalidSnapshot`] on malformed JSON or when `total`
    ///   disagrees with the number of rows
    pub fn from_json(text: &str) -> Result<Self> {
        let snapshot: OwnerSnapshot =
            serde_json::from_str(text).map_err(|e| TypesError::InvalidSnapshot(e.to_string()))?;
        if snapshot.total as usize != snapshot.holders.len() {
            return Err(TypesError::InvalidSnapshot(format!(
                "total is {} but {} holders are listed",
                snapshot.total,
                snapshot.holders.len()
            )));
        }
        Ok(snapshot)
    }

    /// The snapshot's leaves in canonical (index) order.
    pub fn leaves(&self) -> Vec<Leaf> {
        let mut leaves: Vec<Leaf> = self
            .holders
            .iter()
            .map(|h| Leaf::new(h.index, h.owner))
            .collect();
        leaves.sort();
        leaves
    }

    /// Fingerprint of the leaf set, independent of labels and row order.
    pub fn digest(&self) -> Hash256 {
        let leaves = self.leaves();
        let mut material = Vec::with_capacity(leaves.len() * 37);
        for leaf in &leaves {
            material.extend_from_slice(&leaf.encode());
        }
        Hash256(royalty_crypto::blake3::derive_key(
            royalty_crypto::blake3::contexts::SNAPSHOT_DIGEST,
            &material,
        ))
    }
}
