//! # royalty-splitter
//!
//! Pull-mode distribution: holders claim their share with a Merkle proof.
//!
//! The owner publishes each epoch as `(epoch_id, total, root_hash)`. Opening
//! an epoch pays the creator immediately and fixes the per-share amount;
//! every leaf of the published tree may then claim that amount once. The
//! claimed set belongs to the current epoch only and is cleared on rotation.
//!
//! Ineligible claims (bad proof, repeat claim, no epoch yet) are soft
//! outcomes, not errors, so one holder's malformed request cannot block
//! anyone else's.
//!
//! ## Modules
//!
//! - [`state`] — Configuration, epoch state and queries
//! - [`epoch`] — Epoch rotation
//! - [`claims`] — Proof-authenticated claims

pub mod claims;
pub mod epoch;
pub mod state;

pub use claims::ClaimOutcome;
pub use epoch::EpochReceipt;
pub use state::{EpochState, RoyaltySplitter, SplitterConfig, SplitterPhase};

use royalty_revenue::{LedgerError, RevenueError};
use royalty_types::Address;

/// Error types for pull-mode operations.
#[derive(Debug, thiserror::Error)]
pub enum SplitterError {
    /// Caller is not the configured owner.
    #[error("unauthorized caller {caller}")]
    Unauthorized {
        /// The rejected caller.
        caller: Address,
    },

    /// Epoch ids must strictly increase.
    #[error("epoch must increase: current {current}, requested {requested}")]
    NonMonotonicEpoch {
        /// Current epoch id.
        current: u32,
        /// Requested epoch id.
        requested: u32,
    },

    /// Split configuration is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] RevenueError),

    /// The ledger refused a payment; nothing was recorded.
    #[error("payment failed: {0}")]
    Ledger(#[from] LedgerError),
}

/// Convenience result type for pull-mode operations.
pub type Result<T> = std::result::Result<T, SplitterError>;
