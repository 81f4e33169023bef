//! Merkle tree construction and verification.
//!
//! ## Layout
//!
//! - Leaf: `BLAKE3::hash(0x00 || BE32(index) || workchain || account)`
//! - Inner: keyed BLAKE3 over the numerically sorted child pair
//! - Odd level: the last node is promoted unchanged and contributes no
//!   sibling to any proof
//!
//! Because inner hashes sort their inputs, a proof is just the sibling list
//! from leaf to root with no left/right flags.

use std::collections::BTreeMap;

use royalty_crypto::blake3;
use royalty_types::{Address, Hash256, Leaf};
use serde::{Deserialize, Serialize};

use crate::{MerkleError, Result};

/// Root of the empty tree. Never verifies anything.
pub const EMPTY_ROOT: Hash256 = Hash256::ZERO;

/// Longest accepted proof. A `u32` index space cannot need more.
pub const MAX_PROOF_DEPTH: usize = 32;

/// Sibling hashes from a leaf up to the root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MerkleProof {
    /// Siblings in leaf-to-root order.
    pub siblings: Vec<Hash256>,
}

impl MerkleProof {
    /// Wrap a sibling list.
    pub fn new(siblings: Vec<Hash256>) -> Self {
        Self { siblings }
    }

    /// Number of siblings.
    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    /// Whether the proof is empty (single-leaf tree).
    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }
}

/// A built tree: root, canonical leaves and every leaf's proof.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    root: Hash256,
    leaves: Vec<Leaf>,
    proofs: BTreeMap<u32, MerkleProof>,
}

impl MerkleTree {
    /// The root hash.
    pub fn root(&self) -> Hash256 {
        self.root
    }

    /// Leaves in canonical order.
    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Always false; empty input is rejected by [`build`].
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Proof for the leaf at `index`, if present.
    pub fn proof(&self, index: u32) -> Option<&MerkleProof> {
        self.proofs.get(&index)
    }

    /// All proofs keyed by leaf index.
    pub fn proofs(&self) -> &BTreeMap<u32, MerkleProof> {
        &self.proofs
    }

    /// Whether indices are exactly `0..len`, so `len` is a valid `total`
    /// for per-share division.
    pub fn is_contiguous(&self) -> bool {
        self.leaves
            .iter()
            .enumerate()
            .all(|(pos, leaf)| leaf.index as usize == pos)
    }
}

/// Hash a leaf.
pub fn leaf_hash(index: u32, owner: &Address) -> Hash256 {
    Hash256(blake3::merkle_leaf(&Leaf::new(index, *owner).encode()))
}

fn pair_hash(a: &Hash256, b: &Hash256) -> Hash256 {
    Hash256(blake3::merkle_pair(a.as_bytes(), b.as_bytes()))
}

/// Build the tree over `leaves`.
///
/// Leaves are sorted by index first, so any permutation of the same leaf set
/// produces the same root.
///
/// # Errors
///
/// - [`MerkleError::EmptyInput`] if `leaves` is empty
/// - [`MerkleError::DuplicateIndex`] if two leaves share an index
pub fn build(leaves: &[Leaf]) -> Result<MerkleTree> {
    if leaves.is_empty() {
        return Err(MerkleError::EmptyInput);
    }

    let mut sorted = leaves.to_vec();
    sorted.sort_by_key(|leaf| leaf.index);
    if let Some(pair) = sorted.windows(2).find(|w| w[0].index == w[1].index) {
        return Err(MerkleError::DuplicateIndex {
            index: pair[0].index,
        });
    }

    let mut levels: Vec<Vec<Hash256>> = vec![sorted
        .iter()
        .map(|leaf| leaf_hash(leaf.index, &leaf.owner))
        .collect()];

    while let Some(level) = levels.last().filter(|level| level.len() > 1) {
        let next: Vec<Hash256> = level
            .chunks(2)
            .map(|pair| match pair {
                [a, b] => pair_hash(a, b),
                // Odd node: promoted unchanged
                _ => pair[0],
            })
            .collect();
        levels.push(next);
    }

    let root = levels
        .last()
        .and_then(|level| level.first())
        .copied()
        .ok_or(MerkleError::EmptyInput)?;

    let proofs = sorted
        .iter()
        .enumerate()
        .map(|(position, leaf)| (leaf.index, proof_for_position(&levels, position)))
        .collect();

    tracing::debug!(leaves = sorted.len(), depth = levels.len() - 1, %root, "merkle tree built");

    Ok(MerkleTree {
        root,
        leaves: sorted,
        proofs,
    })
}

fn proof_for_position(levels: &[Vec<Hash256>], mut position: usize) -> MerkleProof {
    let mut siblings = Vec::with_capacity(levels.len().saturating_sub(1));
    for level in &levels[..levels.len() - 1] {
        if let Some(sibling) = level.get(position ^ 1) {
            siblings.push(*sibling);
        }
        position /= 2;
    }
    MerkleProof { siblings }
}

/// Verify that `(index, owner)` is a leaf of the tree committed to by `root`.
///
/// Never fails: a zero root, an over-long proof or any mismatch is `false`.
pub fn verify(index: u32, owner: &Address, proof: &MerkleProof, root: &Hash256) -> bool {
    if root.is_zero() || proof.siblings.len() > MAX_PROOF_DEPTH {
        return false;
    }

    let computed = proof
        .siblings
        .iter()
        .fold(leaf_hash(index, owner), |acc, sibling| pair_hash(&acc, sibling));

    computed == *root
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn holders(n: u32) -> Vec<Leaf> {
        (0..n)
            .map(|i| Leaf::new(i, Address::from_label(&format!("h{i}"))))
            .collect()
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(build(&[]), Err(MerkleError::EmptyInput)));
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let mut leaves = holders(3);
        leaves[2].index = 1;
        assert!(matches!(
            build(&leaves),
            Err(MerkleError::DuplicateIndex { index: 1 })
        ));
    }

    #[test]
    fn test_single_leaf_tree() {
        let leaves = holders(1);
        let tree = build(&leaves).expect("build");
        assert_eq!(tree.root(), leaf_hash(0, &leaves[0].owner));
        let proof = tree.proof(0).expect("proof");
        assert!(proof.is_empty());
        assert!(verify(0, &leaves[0].owner, proof, &tree.root()));
    }

    #[test]
    fn test_two_leaf_root() {
        let leaves = holders(2);
        let tree = build(&leaves).expect("build");
        let l0 = leaf_hash(0, &leaves[0].owner);
        let l1 = leaf_hash(1, &leaves[1].owner);
        assert_eq!(tree.root(), pair_hash(&l0, &l1));
        assert_eq!(tree.proof(0).expect("proof").siblings, vec![l1]);
        assert_eq!(tree.proof(1).expect("proof").siblings, vec![l0]);
    }

    #[test]
    fn test_odd_node_promoted() {
        let leaves = holders(3);
        let tree = build(&leaves).expect("build");
        let l: Vec<Hash256> = leaves
            .iter()
            .map(|leaf| leaf_hash(leaf.index, &leaf.owner))
            .collect();

        // Level 1 is [H(l0,l1), l2]; the root pairs them.
        assert_eq!(tree.root(), pair_hash(&pair_hash(&l[0], &l[1]), &l[2]));
        assert_eq!(tree.proof(2).expect("proof").len(), 1);
        assert_eq!(tree.proof(0).expect("proof").len(), 2);
    }

    #[test]
    fn test_five_leaf_proofs_verify() {
        let leaves = holders(5);
        let tree = build(&leaves).expect("build");
        for leaf in &leaves {
            let proof = tree.proof(leaf.index).expect("proof");
            assert!(verify(leaf.index, &leaf.owner, proof, &tree.root()));
        }
        // The promoted fifth leaf skips two levels.
        assert_eq!(tree.proof(4).expect("proof").len(), 1);
    }

    #[test]
    fn test_verify_rejects_wrong_owner_and_index() {
        let leaves = holders(4);
        let tree = build(&leaves).expect("build");
        let proof = tree.proof(1).expect("proof");
        let stranger = Address::from_label("stranger");
        assert!(!verify(1, &stranger, proof, &tree.root()));
        assert!(!verify(2, &leaves[1].owner, proof, &tree.root()));
    }

    #[test]
    fn test_verify_rejects_malformed_proofs() {
        let leaves = holders(4);
        let tree = build(&leaves).expect("build");
        let owner = &leaves[0].owner;
        let proof = tree.proof(0).expect("proof");

        let truncated = MerkleProof::new(proof.siblings[..1].to_vec());
        assert!(!verify(0, owner, &truncated, &tree.root()));

        let mut extended = proof.clone();
        extended.siblings.push(Hash256([7u8; 32]));
        assert!(!verify(0, owner, &extended, &tree.root()));

        let huge = MerkleProof::new(vec![Hash256([1u8; 32]); MAX_PROOF_DEPTH + 1]);
        assert!(!verify(0, owner, &huge, &tree.root()));

        assert!(!verify(0, owner, &MerkleProof::default(), &tree.root()));
    }

    #[test]
    fn test_zero_root_never_verifies() {
        let owner = Address::from_label("h0");
        assert!(!verify(0, &owner, &MerkleProof::default(), &EMPTY_ROOT));
    }

    #[test]
    fn test_order_independent_build() {
        let leaves = holders(6);
        let mut shuffled = leaves.clone();
        shuffled.reverse();
        shuffled.swap(0, 3);
        let a = build(&leaves).expect("build");
        let b = build(&shuffled).expect("build");
        assert_eq!(a.root(), b.root());
        assert_eq!(a.proofs(), b.proofs());
    }

    #[test]
    fn test_contiguity() {
        let tree = build(&holders(4)).expect("build");
        assert!(tree.is_contiguous());

        let mut gapped = holders(4);
        gapped[3].index = 9;
        let tree = build(&gapped).expect("build");
        assert!(!tree.is_contiguous());
        assert!(tree.proof(9).is_some());
        assert!(tree.proof(3).is_none());
    }

    proptest! {
        #[test]
        fn prop_round_trip(n in 1u32..70, stranger_seed in any::<u64>()) {
            let leaves = holders(n);
            let tree = build(&leaves).expect("build");
            let stranger = Address::from_label(&format!("stranger-{stranger_seed}"));
            for leaf in &leaves {
                let proof = tree.proof(leaf.index).expect("proof");
                prop_assert!(proof.len() <= MAX_PROOF_DEPTH);
                prop_assert!(verify(leaf.index, &leaf.owner, proof, &tree.root()));
                prop_assert!(!verify(leaf.index, &stranger, proof, &tree.root()));
            }
        }
    }
}
