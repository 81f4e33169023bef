//! Creator/holder pool split.
//!
//! ```text
//! distributable  = max(0, balance - keep_alive)
//! creator_share  = floor(distributable * creator_pct / 100)
//! holder_pool    = distributable - creator_share
//! per_unit_share = total > 0 ? floor(holder_pool / total) : 0
//! dust           = holder_pool - per_unit_share * total
//! ```
//!
//! The creator share rounds down, so an odd unit left by the split goes to
//! the holder pool. Dust is never attributed to anyone; it stays in the pool
//! and is re-split with the next epoch's balance.

use royalty_types::Coins;
use serde::{Deserialize, Serialize};

use crate::{Result, RevenueError};

/// Default creator share percentage.
pub const DEFAULT_CREATOR_PCT: u8 = 50;

/// Default holder pool percentage.
pub const DEFAULT_HOLDERS_PCT: u8 = 50;

/// Creator/holder split configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoyaltySplit {
    /// Creator share percentage.
    pub creator_pct: u8,
    /// Holder pool percentage.
    pub holders_pct: u8,
}

/// Default split: creator=50, holders=50.
pub const DEFAULT_SPLIT: RoyaltySplit = RoyaltySplit {
    creator_pct: DEFAULT_CREATOR_PCT,
    holders_pct: DEFAULT_HOLDERS_PCT,
};

impl Default for RoyaltySplit {
    fn default() -> Self {
        DEFAULT_SPLIT
    }
}

/// Outcome of splitting the pool for one epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSplit {
    /// Balance above the keep-alive reserve.
    pub distributable: Coins,
    /// Paid to the creator when the epoch opens.
    pub creator_share: Coins,
    /// Reserved for holders.
    pub holder_pool: Coins,
    /// Owed to each eligible unit.
    pub per_unit_share: Coins,
    /// Part of the holder pool no unit is entitled to.
    pub dust: Coins,
}

/// Validate a split configuration.
///
/// # Errors
///
/// - [`RevenueError::InvalidSplitTotal`] if percentages do not sum to 100
pub fn validate_split(split: &RoyaltySplit) -> Result<()> {
    let total = split.creator_pct as u16 + split.holders_pct as u16;
    if total != 100 {
        return Err(RevenueError::InvalidSplitTotal { total });
    }
    Ok(())
}

/// Split the pool with the default 50/50 configuration.
pub fn split_pool(balance: Coins, keep_alive: Coins, total: u32) -> PoolSplit {
    split_unchecked(&DEFAULT_SPLIT, balance, keep_alive, total)
}

/// Split the pool with an explicit configuration.
///
/// # Errors
///
/// - [`RevenueError::InvalidSplitTotal`] if the split is invalid
pub fn split_pool_with(
    split: &RoyaltySplit,
    balance: Coins,
    keep_alive: Coins,
    total: u32,
) -> Result<PoolSplit> {
    validate_split(split)?;
    Ok(split_unchecked(split, balance, keep_alive, total))
}

fn split_unchecked(split: &RoyaltySplit, balance: Coins, keep_alive: Coins, total: u32) -> PoolSplit {
    let distributable = balance.saturating_sub(keep_alive);

    // Bounded by `distributable`, so the narrowing cannot truncate.
    let creator_share = (u128::from(distributable) * u128::from(split.creator_pct) / 100) as Coins;
    let holder_pool = distributable - creator_share;

    let (per_unit_share, dust) = if total > 0 {
        let units = Coins::from(total);
        (holder_pool / units, holder_pool % units)
    } else {
        (0, holder_pool)
    };

    PoolSplit {
        distributable,
        creator_share,
        holder_pool,
        per_unit_share,
        dust,
    }
}

/// Apply the dust floor: `amount` if it reaches `min_payout`, else zero.
///
/// A suppressed amount is not burned; it simply stays in the pool.
pub fn payable(amount: Coins, min_payout: Coins) -> Coins {
    if amount >= min_payout {
        amount
    } else {
        0
    }
}
