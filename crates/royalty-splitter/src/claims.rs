//! Pull-mode claims.

use royalty_merkle::{self as merkle, MerkleProof};
use royalty_revenue::{payable, Ledger};
use royalty_types::{Address, Coins};
use serde::{Deserialize, Serialize};

use crate::state::RoyaltySplitter;
use crate::Result;

/// Result of a claim attempt.
///
/// Only [`ClaimOutcome::Claimed`] changes state. The other outcomes are
/// no-ops: nothing is paid and the claimed set is untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimOutcome {
    /// The leaf is now claimed; `amount` may be 0 under the dust floor.
    Claimed {
        /// Amount transferred to the caller.
        amount: Coins,
    },
    /// The leaf was already claimed this epoch.
    AlreadyClaimed,
    /// The proof does not link `(index, caller)` to the current root.
    InvalidProof,
    /// No epoch has been published yet.
    NoActiveEpoch,
}

impl ClaimOutcome {
    /// Amount paid by this claim.
    pub fn paid(&self) -> Coins {
        match self {
            Self::Claimed { amount } => *amount,
            _ => 0,
        }
    }
}

impl RoyaltySplitter {
    /// Claim the share for leaf `index` of the current epoch.
    ///
    /// The caller must be the owner committed in the leaf. The payment is
    /// `per_share`, clamped to the balance above the keep-alive reserve and
    /// suppressed below the dust floor; a suppressed claim still marks the
    /// leaf as claimed.
    ///
    /// # Errors
    ///
    /// - [`crate::SplitterError::Ledger`] if the transfer fails; the leaf
    ///   stays unclaimed
    pub fn claim<L: Ledger>(
        &mut self,
        ledger: &mut L,
        caller: &Address,
        index: u32,
        proof: &MerkleProof,
    ) -> Result<ClaimOutcome> {
        if self.state.epoch_id == 0 {
            return Ok(ClaimOutcome::NoActiveEpoch);
        }

        if !merkle::verify(index, caller, proof, &self.state.root_hash) {
            tracing::debug!(
                epoch = self.state.epoch_id,
                index,
                %caller,
                "splitter: proof rejected"
            );
            return Ok(ClaimOutcome::InvalidProof);
        }

        if self.state.claimed.contains(&index) {
            tracing::debug!(epoch = self.state.epoch_id, index, "splitter: already claimed");
            return Ok(ClaimOutcome::AlreadyClaimed);
        }

        let available = ledger.balance().saturating_sub(self.state.keep_alive);
        let amount = payable(self.state.per_share.min(available), self.state.min_payout);
        if amount > 0 {
            ledger.pay(caller, amount)?;
        }

        self.state.claimed.insert(index);
        self.state.claimed_count = self.state.claimed_count.saturating_add(1);

        tracing::info!(
            epoch = self.state.epoch_id,
            index,
            %caller,
            amount,
            "splitter: claimed"
        );

        Ok(ClaimOutcome::Claimed { amount })
    }

    /// Check a proof against the current root without claiming.
    pub fn debug_verify(&self, index: u32, owner: &Address, proof: &MerkleProof) -> bool {
        merkle::verify(index, owner, proof, &self.state.root_hash)
    }
}
