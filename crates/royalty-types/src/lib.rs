//! # royalty-types
//!
//! Shared domain types used across the royalty workspace.
//!
//! ## Modules
//!
//! - [`address`] — Ledger account addresses
//! - [`hash`] — 256-bit digests ordered as unsigned integers
//! - [`snapshot`] — Leaves and owner snapshot files

pub mod address;
pub mod hash;
pub mod snapshot;

pub use address::Address;
pub use hash::Hash256;
pub use snapshot::{Leaf, OwnerSnapshot, SnapshotHolder};

/// Currency amount in nano-coins.
pub type Coins = u64;

/// Nano-coins per whole coin (1 coin = 1,000,000,000 nano-coins).
pub const NANOS_PER_COIN: Coins = 1_000_000_000;

/// Convert whole coins to nano-coins, saturating on overflow.
pub const fn coins(whole: u64) -> Coins {
    whole.saturating_mul(NANOS_PER_COIN)
}

/// Render a nano-coin amount as a decimal coin string (e.g. `"1.5"`).
pub fn to_coins_string(amount: Coins) -> String {
    let whole = amount / NANOS_PER_COIN;
    let frac = amount % NANOS_PER_COIN;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:09}");
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

/// Error types for parsing shared types.
#[derive(Debug, thiserror::Error)]
pub enum TypesError {
    /// Address text is not `<workchain>:<64 hex>`.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Hash text is not a hex integer of at most 256 bits.
    #[error("invalid hash: {0}")]
    InvalidHash(String),

    /// Snapshot file could not be decoded.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Convenience result type for type parsing.
pub type Result<T> = std::result::Result<T, TypesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coins_conversion() {
        assert_eq!(coins(100), 100 * NANOS_PER_COIN);
        assert_eq!(coins(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_to_coins_string() {
        assert_eq!(to_coins_string(coins(3)), "3");
        assert_eq!(to_coins_string(1_500_000_000), "1.5");
        assert_eq!(to_coins_string(10_000_000), "0.01");
        assert_eq!(to_coins_string(0), "0");
    }
}
