//! Batch submission.

use royalty_revenue::{payable, split_pool_with, Ledger, Payout, PoolSplit};
use royalty_types::{Address, Coins};
use serde::{Deserialize, Serialize};

use crate::state::RoyaltyCollector;
use crate::{CollectorError, Result};

/// One push-mode batch: owners of items `[start, end)` of `epoch`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Epoch being distributed.
    pub epoch: u32,
    /// First index (inclusive).
    pub start: u32,
    /// Last index (exclusive).
    pub end: u32,
    /// Declared item count of the epoch.
    pub total: u32,
    /// Owner of each index in the range, in order.
    pub owners: Vec<Address>,
}

impl BatchRequest {
    /// Number of items in the range.
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Whether the range is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What an accepted batch did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReceipt {
    /// Epoch the batch belonged to.
    pub epoch: u32,
    /// Whether this batch opened the epoch.
    pub opened: bool,
    /// Whether this batch closed the epoch.
    pub closed: bool,
    /// Per-item share in force for the batch.
    pub per_item_share: Coins,
    /// Sum paid to holders by this batch.
    pub holders_paid: Coins,
    /// Amount transferred to the creator (only on an opening batch).
    pub creator_paid: Coins,
    /// Holder pool left after the batch (0 once closed).
    pub remaining: Coins,
}

impl RoyaltyCollector {
    /// Pay the owners of one contiguous range.
    ///
    /// All holder payouts of the batch settle through one atomic
    /// [`Ledger::pay_all`] before any state changes. On an opening batch the
    /// creator share is paid afterwards; its failure is logged and does not
    /// undo the batch.
    ///
    /// # Errors
    ///
    /// - [`CollectorError::Unauthorized`] if `caller` is not the owner
    /// - [`CollectorError::RangeMismatch`] if the range is empty or does not
    ///   match the owner list
    /// - [`CollectorError::BatchOutOfBounds`] if `total` is 0 or `end > total`
    /// - [`CollectorError::NonMonotonicEpoch`] if an opening epoch is not
    ///   greater than the last closed one
    /// - [`CollectorError::NonContiguousBatch`] if the batch does not start at
    ///   the next unconsumed index of the open epoch
    /// - [`CollectorError::TotalMismatch`] if a continuation changes `total`
    /// - [`CollectorError::Ledger`] if the holder payouts fail
    pub fn submit_batch<L: Ledger>(
        &mut self,
        ledger: &mut L,
        caller: &Address,
        request: &BatchRequest,
    ) -> Result<BatchReceipt> {
        self.ensure_owner(caller)?;
        check_range(request)?;

        let opening = if self.state.epoch_started {
            self.check_continuation(request)?;
            None
        } else {
            Some(self.check_opening(ledger, request)?)
        };

        let (per_item_share, remaining) = match &opening {
            Some(split) => (split.per_unit_share, split.holder_pool),
            None => (self.state.per_item_share, self.state.remaining),
        };
        let reserved_for_creator = opening.as_ref().map_or(0, |s| s.creator_share);
        let available = ledger
            .balance()
            .saturating_sub(self.state.keep_alive)
            .saturating_sub(reserved_for_creator);

        let mut left = remaining.min(available);
        let mut payouts = Vec::with_capacity(request.owners.len());
        for owner in &request.owners {
            let amount = payable(per_item_share.min(left), self.state.min_payout);
            left -= amount;
            if amount > 0 {
                payouts.push(Payout::new(*owner, amount));
            }
        }
        let holders_paid: Coins = payouts.iter().map(|p| p.amount).sum();

        ledger.pay_all(&payouts)?;

        let creator_paid = match &opening {
            Some(split) if split.creator_share > 0 => {
                let creator = self.state.creator;
                match ledger.pay(&creator, split.creator_share) {
                    Ok(()) => split.creator_share,
                    Err(e) => {
                        tracing::warn!(
                            epoch = request.epoch,
                            amount = split.creator_share,
                            error = %e,
                            "collector: creator payment failed, funds stay in pool"
                        );
                        0
                    }
                }
            }
            _ => 0,
        };

        if opening.is_some() {
            self.state.cur_epoch = request.epoch;
            self.state.epoch_started = true;
            self.state.per_item_share = per_item_share;
            self.state.total = request.total;
            tracing::info!(
                epoch = request.epoch,
                total = request.total,
                per_item_share,
                holder_pool = remaining,
                creator_paid,
                "collector: epoch opened"
            );
        }
        self.state.remaining = remaining.saturating_sub(holders_paid);
        self.state.cursor = request.end;

        tracing::debug!(
            epoch = request.epoch,
            start = request.start,
            end = request.end,
            holders_paid,
            remaining = self.state.remaining,
            "collector: batch applied"
        );

        let closed = request.end == self.state.total;
        if closed {
            self.close_epoch();
        }

        Ok(BatchReceipt {
            epoch: request.epoch,
            opened: opening.is_some(),
            closed,
            per_item_share,
            holders_paid,
            creator_paid,
            remaining: self.state.remaining,
        })
    }

    fn check_opening<L: Ledger>(&self, ledger: &L, request: &BatchRequest) -> Result<PoolSplit> {
        if request.epoch <= self.state.last_epoch {
            tracing::warn!(
                last = self.state.last_epoch,
                requested = request.epoch,
                "collector: rejected non-monotonic epoch"
            );
            return Err(CollectorError::NonMonotonicEpoch {
                last: self.state.last_epoch,
                requested: request.epoch,
            });
        }
        if request.start != 0 {
            return Err(CollectorError::NonContiguousBatch {
                expected: 0,
                start: request.start,
            });
        }
        Ok(split_pool_with(
            &self.split,
            ledger.balance(),
            self.state.keep_alive,
            request.total,
        )?)
    }

    fn check_continuation(&self, request: &BatchRequest) -> Result<()> {
        if request.epoch != self.state.cur_epoch || request.start != self.state.cursor {
            tracing::warn!(
                epoch = request.epoch,
                start = request.start,
                cur_epoch = self.state.cur_epoch,
                cursor = self.state.cursor,
                "collector: rejected non-contiguous batch"
            );
            return Err(CollectorError::NonContiguousBatch {
                expected: self.state.cursor,
                start: request.start,
            });
        }
        if request.total != self.state.total {
            return Err(CollectorError::TotalMismatch {
                declared: self.state.total,
                requested: request.total,
            });
        }
        Ok(())
    }

    fn close_epoch(&mut self) {
        let abandoned = self.state.remaining;
        self.state.last_epoch = self.state.cur_epoch;
        self.state.epoch_started = false;
        self.state.per_item_share = 0;
        self.state.remaining = 0;
        self.state.cursor = 0;
        self.state.total = 0;
        tracing::info!(
            epoch = self.state.last_epoch,
            dust = abandoned,
            "collector: epoch closed"
        );
    }
}

fn check_range(request: &BatchRequest) -> Result<()> {
    let mismatch = request.start >= request.end
        || usize::try_from(request.len()) != Ok(request.owners.len());
    if mismatch {
        return Err(CollectorError::RangeMismatch {
            start: request.start,
            end: request.end,
            owners: request.owners.len(),
        });
    }
    if request.total == 0 || request.end > request.total {
        return Err(CollectorError::BatchOutOfBounds {
            end: request.end,
            total: request.total,
        });
    }
    Ok(())
}
