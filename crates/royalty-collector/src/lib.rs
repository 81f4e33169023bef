//! # royalty-collector
//!
//! Push-mode distribution: the operator pays holders in ordered batches.
//!
//! The first batch of an epoch opens it. It fixes the per-item share from the
//! pool balance and the declared item count, and it pays the creator. Each
//! following batch must start exactly where the previous one ended, so a
//! consumed range can never be paid twice. The batch that reaches the
//! declared total closes the epoch.
//!
//! ## Modules
//!
//! - [`state`] — Configuration, batch state and admin calls
//! - [`batch`] — Batch submission
//! - [`plan`] — Splitting a leaf set into contiguous requests

pub mod batch;
pub mod plan;
pub mod state;

pub use batch::{BatchReceipt, BatchRequest};
pub use plan::plan_batches;
pub use state::{BatchState, CollectorConfig, CollectorPhase, RoyaltyCollector};

use royalty_revenue::{LedgerError, RevenueError};
use royalty_types::Address;

/// Error types for push-mode operations.
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    /// Caller is not the configured owner.
    #[error("unauthorized caller {caller}")]
    Unauthorized {
        /// The rejected caller.
        caller: Address,
    },

    /// A new epoch must be greater than the last closed one.
    #[error("epoch must increase: last {last}, requested {requested}")]
    NonMonotonicEpoch {
        /// Last closed epoch.
        last: u32,
        /// Requested epoch.
        requested: u32,
    },

    /// The owner list does not match the declared range.
    #[error("range [{start}, {end}) does not match {owners} owners")]
    RangeMismatch {
        /// Range start.
        start: u32,
        /// Range end (exclusive).
        end: u32,
        /// Number of owners supplied.
        owners: usize,
    },

    /// The range extends past the declared total, or the total is zero.
    #[error("batch end {end} out of bounds for total {total}")]
    BatchOutOfBounds {
        /// Range end (exclusive).
        end: u32,
        /// Declared total.
        total: u32,
    },

    /// The batch does not continue where the previous one ended.
    #[error("non-contiguous batch: expected start {expected}, got {start}")]
    NonContiguousBatch {
        /// Next unconsumed index.
        expected: u32,
        /// Requested start.
        start: u32,
    },

    /// A continuation batch declared a different total than the opening one.
    #[error("total mismatch: epoch declared {declared}, batch requested {requested}")]
    TotalMismatch {
        /// Total fixed by the opening batch.
        declared: u32,
        /// Total carried by this batch.
        requested: u32,
    },

    /// Batch planning needs a positive chunk size.
    #[error("chunk size must be positive")]
    InvalidChunkSize,

    /// Split configuration is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] RevenueError),

    /// The ledger refused the batch; nothing was recorded.
    #[error("payment failed: {0}")]
    Ledger(#[from] LedgerError),
}

/// Convenience result type for push-mode operations.
pub type Result<T> = std::result::Result<T, CollectorError>;
