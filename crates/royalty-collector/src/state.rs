//! Collector configuration, batch state and admin calls.

use royalty_revenue::{validate_split, RoyaltySplit};
use royalty_types::{Address, Coins};
use serde::{Deserialize, Serialize};

use crate::{CollectorError, Result};

/// Static collector parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Only account allowed to submit batches and change parameters.
    pub owner: Address,
    /// Receives the creator share when an epoch opens.
    pub creator: Address,
    /// Reserve never distributed.
    #[serde(default)]
    pub keep_alive: Coins,
    /// Dust floor for holder payouts.
    #[serde(default)]
    pub min_payout: Coins,
    /// Creator/holder split.
    #[serde(default)]
    pub split: RoyaltySplit,
}

/// Push-mode epoch progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchState {
    /// Last closed epoch, 0 if none.
    pub last_epoch: u32,
    /// Epoch being distributed (meaningful while `epoch_started`).
    pub cur_epoch: u32,
    /// Whether an epoch is open.
    pub epoch_started: bool,
    /// Amount owed per item in the open epoch.
    pub per_item_share: Coins,
    /// Holder pool not yet paid out.
    pub remaining: Coins,
    /// Next index expected.
    pub cursor: u32,
    /// Declared item count of the open epoch.
    pub total: u32,
    /// Reserve never distributed.
    pub keep_alive: Coins,
    /// Dust floor.
    pub min_payout: Coins,
    /// Creator address.
    pub creator: Address,
}

/// Lifecycle of a collector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectorPhase {
    /// No epoch open; the next batch must open `> last_epoch`.
    Idle {
        /// Last closed epoch.
        last_epoch: u32,
    },
    /// Batches are being accepted for `cur_epoch` starting at `cursor`.
    InProgress {
        /// Open epoch.
        cur_epoch: u32,
        /// Next index expected.
        cursor: u32,
    },
}

/// Push-mode distribution engine.
#[derive(Clone, Debug)]
pub struct RoyaltyCollector {
    pub(crate) owner: Address,
    pub(crate) split: RoyaltySplit,
    pub(crate) state: BatchState,
}

impl RoyaltyCollector {
    /// Create an idle collector.
    ///
    /// # Errors
    ///
    /// - [`CollectorError::InvalidConfig`] if the split does not sum to 100
    pub fn new(config: CollectorConfig) -> Result<Self> {
        validate_split(&config.split)?;

        Ok(Self {
            owner: config.owner,
            split: config.split,
            state: BatchState {
                last_epoch: 0,
                cur_epoch: 0,
                epoch_started: false,
                per_item_share: 0,
                remaining: 0,
                cursor: 0,
                total: 0,
                keep_alive: config.keep_alive,
                min_payout: config.min_payout,
                creator: config.creator,
            },
        })
    }

    /// Snapshot of the batch state.
    pub fn state(&self) -> BatchState {
        self.state.clone()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> CollectorPhase {
        if self.state.epoch_started {
            CollectorPhase::InProgress {
                cur_epoch: self.state.cur_epoch,
                cursor: self.state.cursor,
            }
        } else {
            CollectorPhase::Idle {
                last_epoch: self.state.last_epoch,
            }
        }
    }

    /// The configured owner.
    pub fn owner(&self) -> &Address {
        &self.owner
    }

    /// Replace the creator address.
    ///
    /// Takes effect from the next epoch opening.
    ///
    /// # Errors
    ///
    /// - [`CollectorError::Unauthorized`] if `caller` is not the owner
    pub fn set_creator(&mut self, caller: &Address, creator: Address) -> Result<()> {
        self.ensure_owner(caller)?;
        tracing::info!(%creator, "collector: creator updated");
        self.state.creator = creator;
        Ok(())
    }

    /// Replace the reserve and dust floor.
    ///
    /// The per-item share of an open epoch is not recomputed; the new dust
    /// floor applies to the next batch.
    ///
    /// # Errors
    ///
    /// - [`CollectorError::Unauthorized`] if `caller` is not the owner
    pub fn set_params(&mut self, caller: &Address, keep_alive: Coins, min_payout: Coins) -> Result<()> {
        self.ensure_owner(caller)?;
        tracing::info!(keep_alive, min_payout, "collector: params updated");
        self.state.keep_alive = keep_alive;
        self.state.min_payout = min_payout;
        Ok(())
    }

    pub(crate) fn ensure_owner(&self, caller: &Address) -> Result<()> {
        if caller != &self.owner {
            tracing::warn!(%caller, "collector: rejected call from non-owner");
            return Err(CollectorError::Unauthorized { caller: *caller });
        }
        Ok(())
    }
}
