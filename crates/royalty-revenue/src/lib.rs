//! # royalty-revenue
//!
//! Epoch accounting shared by both distribution engines.
//!
//! Whatever the pool holds above the keep-alive reserve is split between the
//! creator and the holders; the holder pool is divided evenly per unit and
//! the indivisible remainder stays in the pool as dust.
//!
//! ## Modules
//!
//! - [`pool`] — Creator/holder split, per-unit share and dust floor
//! - [`ledger`] — The value-transfer seam and an in-memory ledger

pub mod ledger;
pub mod pool;

pub use ledger::{Ledger, LedgerError, MemoryLedger, Payout};
pub use pool::{
    payable, split_pool, split_pool_with, validate_split, PoolSplit, RoyaltySplit, DEFAULT_SPLIT,
};

/// Error types for revenue operations.
#[derive(Debug, thiserror::Error)]
pub enum RevenueError {
    /// Split percentages do not sum to 100.
    #[error("split percentages must sum to 100, got {total}")]
    InvalidSplitTotal {
        /// The actual total.
        total: u16,
    },
}

/// Convenience result type for revenue operations.
pub type Result<T> = std::result::Result<T, RevenueError>;
