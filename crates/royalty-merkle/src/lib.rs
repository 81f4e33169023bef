//! # royalty-merkle
//!
//! Merkle commitments over the `(index, owner)` leaves of a distribution round.
//!
//! The builder is used off-line to publish a root and hand every holder a
//! proof; the verifier is the only part the pull-mode engine needs.
//!
//! ## Modules
//!
//! - [`tree`] — Tree construction, proofs and verification
//! - [`bundle`] — Per-epoch claim bundle handed to holders

pub mod bundle;
pub mod tree;

pub use bundle::{ClaimBundle, ClaimEntry};
pub use tree::{build, leaf_hash, verify, MerkleProof, MerkleTree, EMPTY_ROOT, MAX_PROOF_DEPTH};

/// Error types for Merkle operations.
#[derive(Debug, thiserror::Error)]
pub enum MerkleError {
    /// No leaves were supplied. The empty tree has root [`EMPTY_ROOT`] and
    /// nothing is claimable under it.
    #[error("cannot build a Merkle tree from zero leaves")]
    EmptyInput,

    /// Two leaves share an index.
    #[error("duplicate leaf index {index}")]
    DuplicateIndex {
        /// The repeated index.
        index: u32,
    },

    /// A proof or root value could not be decoded.
    #[error("invalid hash: {0}")]
    InvalidHash(String),

    /// Bundle encoding failed.
    #[error("bundle serialization error: {0}")]
    Serialization(String),
}

/// Convenience result type for Merkle operations.
pub type Result<T> = std::result::Result<T, MerkleError>;
