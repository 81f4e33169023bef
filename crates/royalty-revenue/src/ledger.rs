//! The value-transfer seam.
//!
//! Balances live in an external ledger that applies one operation at a time.
//! Engines only need to read the pool balance and to pay a set of recipients
//! atomically: either every payout of a call lands or none does, which is
//! what lets an engine commit its own state only after payment succeeded.

use std::collections::{BTreeMap, BTreeSet};

use royalty_types::{Address, Coins};
use serde::{Deserialize, Serialize};

/// A single transfer out of the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    /// Recipient.
    pub to: Address,
    /// Amount in nano-coins.
    pub amount: Coins,
}

impl Payout {
    /// Create a payout.
    pub const fn new(to: Address, amount: Coins) -> Self {
        Self { to, amount }
    }
}

/// Errors reported by a ledger when a payment set cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The pool cannot cover the requested total.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// Requested total.
        requested: Coins,
        /// Current pool balance.
        available: Coins,
    },

    /// A recipient cannot accept transfers.
    #[error("recipient {0} is unreachable")]
    Unreachable(Address),
}

/// The pool's view of the external ledger.
pub trait Ledger {
    /// Current pool balance.
    fn balance(&self) -> Coins;

    /// Apply every payout or none of them.
    ///
    /// # Errors
    ///
    /// Implementations return a [`LedgerError`] and leave all balances
    /// untouched when any payout cannot be made.
    fn pay_all(&mut self, payouts: &[Payout]) -> Result<(), LedgerError>;

    /// Pay a single recipient.
    ///
    /// # Errors
    ///
    /// See [`Ledger::pay_all`].
    fn pay(&mut self, to: &Address, amount: Coins) -> Result<(), LedgerError> {
        self.pay_all(&[Payout::new(*to, amount)])
    }
}

/// In-memory ledger for tests and dry runs.
#[derive(Clone, Debug, Default)]
pub struct MemoryLedger {
    balance: Coins,
    accounts: BTreeMap<Address, Coins>,
    unreachable: BTreeSet<Address>,
    transfers: Vec<Payout>,
}

impl MemoryLedger {
    /// Create a ledger whose pool starts with `balance`.
    pub fn new(balance: Coins) -> Self {
        Self {
            balance,
            ..Self::default()
        }
    }

    /// Credit incoming royalties to the pool.
    pub fn deposit(&mut self, amount: Coins) {
        self.balance = self.balance.saturating_add(amount);
        tracing::trace!(amount, balance = self.balance, "ledger: deposit");
    }

    /// Total received so far by `address`.
    pub fn balance_of(&self, address: &Address) -> Coins {
        self.accounts.get(address).copied().unwrap_or(0)
    }

    /// Make transfers to `address` fail.
    pub fn mark_unreachable(&mut self, address: Address) {
        self.unreachable.insert(address);
    }

    /// Let transfers to `address` succeed again.
    pub fn mark_reachable(&mut self, address: &Address) {
        self.unreachable.remove(address);
    }

    /// Every transfer applied so far, in order.
    pub fn transfers(&self) -> &[Payout] {
        &self.transfers
    }

    /// Sum of all transfers applied so far.
    pub fn total_paid(&self) -> Coins {
        self.transfers.iter().map(|p| p.amount).sum()
    }
}

impl Ledger for MemoryLedger {
    fn balance(&self) -> Coins {
        self.balance
    }

    fn pay_all(&mut self, payouts: &[Payout]) -> Result<(), LedgerError> {
        let requested = payouts
            .iter()
            .try_fold(0 as Coins, |acc, p| acc.checked_add(p.amount))
            .ok_or(LedgerError::InsufficientFunds {
                requested: Coins::MAX,
                available: self.balance,
            })?;
        if requested > self.balance {
            return Err(LedgerError::InsufficientFunds {
                requested,
                available: self.balance,
            });
        }
        if let Some(p) = payouts.iter().find(|p| self.unreachable.contains(&p.to)) {
            return Err(LedgerError::Unreachable(p.to));
        }

        for payout in payouts.iter().filter(|p| p.amount > 0) {
            let account = self.accounts.entry(payout.to).or_insert(0);
            *account = account.saturating_add(payout.amount);
            self.transfers.push(*payout);
        }
        self.balance -= requested;
        Ok(())
    }
}
