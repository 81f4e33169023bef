//! Epoch rotation.
//!
//! Publishing an epoch is the only place the creator is paid, so the cost of
//! paying the creator never scales with the number of holders.

use royalty_revenue::{split_pool_with, Ledger};
use royalty_types::{Address, Coins, Hash256};
use serde::{Deserialize, Serialize};

use crate::state::RoyaltySplitter;
use crate::{Result, SplitterError};

/// What an epoch publication did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochReceipt {
    /// The newly opened epoch.
    pub epoch_id: u32,
    /// Declared item count.
    pub total: u32,
    /// Amount actually transferred to the creator (0 if the transfer failed).
    pub creator_paid: Coins,
    /// Pool reserved for holders.
    pub holder_pool: Coins,
    /// Amount each claim will pay.
    pub per_share: Coins,
    /// Holder pool remainder nobody is entitled to.
    pub dust: Coins,
}

impl RoyaltySplitter {
    /// Publish a new epoch.
    ///
    /// Splits the current pool balance, pays the creator share, and replaces
    /// the root and per-share amount. The claimed set is cleared, so every
    /// leaf of the new tree may claim once.
    ///
    /// A failed creator transfer is not fatal: the funds stay in the pool and
    /// the epoch still advances.
    ///
    /// # Errors
    ///
    /// - [`SplitterError::Unauthorized`] if `caller` is not the owner
    /// - [`SplitterError::NonMonotonicEpoch`] if `epoch_id` is not greater
    ///   than the current epoch
    pub fn set_epoch<L: Ledger>(
        &mut self,
        ledger: &mut L,
        caller: &Address,
        epoch_id: u32,
        total: u32,
        root_hash: Hash256,
    ) -> Result<EpochReceipt> {
        self.ensure_owner(caller)?;

        if epoch_id <= self.state.epoch_id {
            tracing::warn!(
                current = self.state.epoch_id,
                requested = epoch_id,
                "splitter: rejected non-monotonic epoch"
            );
            return Err(SplitterError::NonMonotonicEpoch {
                current: self.state.epoch_id,
                requested: epoch_id,
            });
        }

        let split = split_pool_with(&self.split, ledger.balance(), self.state.keep_alive, total)?;

        let creator_paid = if split.creator_share == 0 {
            0
        } else {
            match ledger.pay(&self.creator, split.creator_share) {
                Ok(()) => split.creator_share,
                Err(e) => {
                    tracing::warn!(
                        epoch = epoch_id,
                        amount = split.creator_share,
                        error = %e,
                        "splitter: creator payment failed, funds stay in pool"
                    );
                    0
                }
            }
        };

        self.state.epoch_id = epoch_id;
        self.state.root_hash = root_hash;
        self.state.per_share = split.per_unit_share;
        self.state.total = total;
        self.state.claimed.clear();
        self.state.claimed_count = 0;

        tracing::info!(
            epoch = epoch_id,
            total,
            %root_hash,
            creator_paid,
            per_share = split.per_unit_share,
            dust = split.dust,
            "splitter: epoch published"
        );

        Ok(EpochReceipt {
            epoch_id,
            total,
            creator_paid,
            holder_pool: split.holder_pool,
            per_share: split.per_unit_share,
            dust: split.dust,
        })
    }
}
