//! Splitter configuration, epoch state and read-only queries.

use std::collections::BTreeSet;

use royalty_merkle::EMPTY_ROOT;
use royalty_revenue::{validate_split, RoyaltySplit};
use royalty_types::{Address, Coins, Hash256};
use serde::{Deserialize, Serialize};

use crate::{Result, SplitterError};

/// Static splitter parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitterConfig {
    /// Only account allowed to publish epochs.
    pub owner: Address,
    /// Receives the creator share at each epoch opening.
    pub creator: Address,
    /// Reserve never distributed.
    #[serde(default)]
    pub keep_alive: Coins,
    /// Dust floor for claims.
    #[serde(default)]
    pub min_payout: Coins,
    /// Creator/holder split.
    #[serde(default)]
    pub split: RoyaltySplit,
}

/// Pull-mode epoch state.
///
/// `claimed_count == claimed.len()` at all times.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochState {
    /// Current epoch, 0 before the first publication.
    pub epoch_id: u32,
    /// Root of the current epoch's tree.
    pub root_hash: Hash256,
    /// Amount owed per claimed leaf.
    pub per_share: Coins,
    /// Declared item count of the current epoch.
    pub total: u32,
    /// Number of leaves claimed in the current epoch.
    pub claimed_count: u32,
    /// Leaf indices claimed in the current epoch.
    pub claimed: BTreeSet<u32>,
    /// Reserve never distributed.
    pub keep_alive: Coins,
    /// Dust floor for claims.
    pub min_payout: Coins,
}

/// Lifecycle of a splitter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitterPhase {
    /// No epoch published yet; nothing is claimable.
    Uninitialized,
    /// Claims are served against this epoch.
    Active {
        /// The open epoch.
        epoch_id: u32,
    },
}

/// Pull-mode distribution engine.
#[derive(Clone, Debug)]
pub struct RoyaltySplitter {
    pub(crate) owner: Address,
    pub(crate) creator: Address,
    pub(crate) split: RoyaltySplit,
    pub(crate) state: EpochState,
}

impl RoyaltySplitter {
    /// Create an uninitialized splitter.
    ///
    /// # Errors
    ///
    /// - [`SplitterError::InvalidConfig`] if the split does not sum to 100
    pub fn new(config: SplitterConfig) -> Result<Self> {
        validate_split(&config.split)?;

        Ok(Self {
            owner: config.owner,
            creator: config.creator,
            split: config.split,
            state: EpochState {
                epoch_id: 0,
                root_hash: EMPTY_ROOT,
                per_share: 0,
                total: 0,
                claimed_count: 0,
                claimed: BTreeSet::new(),
                keep_alive: config.keep_alive,
                min_payout: config.min_payout,
            },
        })
    }

    /// Snapshot of the epoch state.
    pub fn state(&self) -> EpochState {
        self.state.clone()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SplitterPhase {
        match self.state.epoch_id {
            0 => SplitterPhase::Uninitialized,
            epoch_id => SplitterPhase::Active { epoch_id },
        }
    }

    /// Whether `index` has claimed in the current epoch.
    pub fn is_claimed(&self, index: u32) -> bool {
        self.state.claimed.contains(&index)
    }

    /// The configured owner.
    pub fn owner(&self) -> &Address {
        &self.owner
    }

    /// The configured creator.
    pub fn creator(&self) -> &Address {
        &self.creator
    }

    pub(crate) fn ensure_owner(&self, caller: &Address) -> Result<()> {
        if caller != &self.owner {
            tracing::warn!(%caller, "splitter: rejected call from non-owner");
            return Err(SplitterError::Unauthorized { caller: *caller });
        }
        Ok(())
    }
}
