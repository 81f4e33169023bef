//! Integration test: push-mode distribution rounds.
//!
//! Exercises the batch lifecycle:
//! 1. Plan contiguous batches from a leaf set
//! 2. The opening batch fixes the per-item share and pays the creator
//! 3. Continuation batches must start at the cursor
//! 4. The batch reaching the declared total closes the epoch
//! 5. Push and pull modes pay holders the same amounts
//!
//! Uses royalty-collector, royalty-splitter and royalty-merkle on a
//! MemoryLedger.

use proptest::prelude::*;
use royalty_collector::{
    plan_batches, BatchRequest, CollectorConfig, CollectorError, CollectorPhase, RoyaltyCollector,
};
use royalty_merkle::build;
use royalty_revenue::{Ledger, MemoryLedger, RoyaltySplit};
use royalty_splitter::{RoyaltySplitter, SplitterConfig};
use royalty_types::{Address, Coins, Leaf};

fn owner() -> Address {
    Address::from_label("owner")
}

fn creator() -> Address {
    Address::from_label("creator")
}

fn holder(i: u32) -> Address {
    Address::from_label(&format!("holder-{i}"))
}

fn leaves(n: u32) -> Vec<Leaf> {
    (0..n).map(|i| Leaf::new(i, holder(i))).collect()
}

fn collector(keep_alive: Coins, min_payout: Coins) -> RoyaltyCollector {
    RoyaltyCollector::new(CollectorConfig {
        owner: owner(),
        creator: creator(),
        keep_alive,
        min_payout,
        split: RoyaltySplit::default(),
    })
    .expect("new collector")
}

fn range(epoch: u32, start: u32, end: u32, total: u32) -> BatchRequest {
    BatchRequest {
        epoch,
        start,
        end,
        total,
        owners: (start..end).map(holder).collect(),
    }
}

#[test]
fn test_contiguous_batches_close_epoch() {
    let mut ledger = MemoryLedger::new(100);
    let mut c = collector(0, 0);

    c.submit_batch(&mut ledger, &owner(), &range(1, 0, 3, 5))
        .expect("[0,3)");
    c.submit_batch(&mut ledger, &owner(), &range(1, 3, 5, 5))
        .expect("[3,5)");

    let state = c.state();
    assert!(!state.epoch_started);
    assert_eq!(state.remaining, 0);
    assert_eq!(state.last_epoch, 1);
    assert_eq!(c.phase(), CollectorPhase::Idle { last_epoch: 1 });
}

#[test]
fn test_gap_rejected() {
    let mut ledger = MemoryLedger::new(100);
    let mut c = collector(0, 0);

    c.submit_batch(&mut ledger, &owner(), &range(1, 0, 3, 5))
        .expect("[0,3)");
    let result = c.submit_batch(&mut ledger, &owner(), &range(1, 4, 5, 5));
    assert!(matches!(result, Err(CollectorError::NonContiguousBatch { .. })));
    assert_eq!(
        c.phase(),
        CollectorPhase::InProgress {
            cur_epoch: 1,
            cursor: 3
        }
    );

    // The right continuation is still accepted.
    c.submit_batch(&mut ledger, &owner(), &range(1, 3, 5, 5))
        .expect("[3,5)");
}

#[test]
fn test_planned_rounds_over_several_epochs() {
    let mut ledger = MemoryLedger::new(0);
    let mut c = collector(10, 0);

    for epoch in 1..=3u32 {
        ledger.deposit(1_010);
        let before = ledger.balance();
        let plan = plan_batches(epoch, &leaves(7), 3).expect("plan");
        assert_eq!(plan.len(), 3);

        let mut holders_paid = 0;
        let mut creator_paid = 0;
        for request in &plan {
            let receipt = c
                .submit_batch(&mut ledger, &owner(), request)
                .expect("batch");
            holders_paid += receipt.holders_paid;
            creator_paid += receipt.creator_paid;
        }

        assert_eq!(c.phase(), CollectorPhase::Idle { last_epoch: epoch });
        assert_eq!(before - ledger.balance(), holders_paid + creator_paid);
        assert!(ledger.balance() >= 10);
    }
}

#[test]
fn test_closed_epoch_cannot_reopen() {
    let mut ledger = MemoryLedger::new(100);
    let mut c = collector(0, 0);
    for request in plan_batches(2, &leaves(5), 5).expect("plan") {
        c.submit_batch(&mut ledger, &owner(), &request).expect("batch");
    }

    ledger.deposit(100);
    for epoch in [1, 2] {
        let result = c.submit_batch(&mut ledger, &owner(), &range(epoch, 0, 5, 5));
        assert!(matches!(result, Err(CollectorError::NonMonotonicEpoch { .. })));
    }
    c.submit_batch(&mut ledger, &owner(), &range(3, 0, 5, 5))
        .expect("epoch 3");
}

#[test]
fn test_push_and_pull_pay_the_same() {
    let n = 6;
    let balance = 12_345;

    let mut push_ledger = MemoryLedger::new(balance);
    let mut c = collector(0, 0);
    for request in plan_batches(1, &leaves(n), 4).expect("plan") {
        c.submit_batch(&mut push_ledger, &owner(), &request)
            .expect("batch");
    }

    let tree = build(&leaves(n)).expect("build");
    let mut pull_ledger = MemoryLedger::new(balance);
    let mut s = RoyaltySplitter::new(SplitterConfig {
        owner: owner(),
        creator: creator(),
        keep_alive: 0,
        min_payout: 0,
        split: RoyaltySplit::default(),
    })
    .expect("new splitter");
    s.set_epoch(&mut pull_ledger, &owner(), 1, n, tree.root())
        .expect("set_epoch");
    for i in 0..n {
        s.claim(&mut pull_ledger, &holder(i), i, tree.proof(i).expect("proof"))
            .expect("claim");
    }

    for i in 0..n {
        assert_eq!(push_ledger.balance_of(&holder(i)), pull_ledger.balance_of(&holder(i)));
    }
    assert_eq!(push_ledger.balance_of(&creator()), pull_ledger.balance_of(&creator()));
    assert_eq!(push_ledger.balance(), pull_ledger.balance());
}

#[test]
fn test_dust_floor_keeps_accounting_consistent() {
    let mut ledger = MemoryLedger::new(100);
    let mut c = collector(0, 20);
    let first = c
        .submit_batch(&mut ledger, &owner(), &range(1, 0, 3, 5))
        .expect("batch");
    assert_eq!(first.holders_paid, 0);
    assert_eq!(c.state().remaining, 50);

    // Lowering the floor mid-epoch applies to the next batch.
    c.set_params(&owner(), 0, 0).expect("set_params");
    let second = c
        .submit_batch(&mut ledger, &owner(), &range(1, 3, 5, 5))
        .expect("batch");
    assert_eq!(second.holders_paid, 20);
    assert!(second.closed);
    assert_eq!(ledger.balance(), 30);
}

proptest! {
    #[test]
    fn prop_planned_round_conserves_funds(
        n in 1u32..30,
        chunk in 1usize..8,
        balance in 0u64..1_000_000_000,
        keep_alive in 0u64..1_000,
    ) {
        let mut ledger = MemoryLedger::new(balance);
        let mut c = collector(keep_alive, 0);
        let mut paid: Coins = 0;
        let mut receipts = Vec::new();
        for request in plan_batches(1, &leaves(n), chunk).expect("plan") {
            let receipt = c.submit_batch(&mut ledger, &owner(), &request).expect("batch");
            paid += receipt.holders_paid + receipt.creator_paid;
            receipts.push(receipt);
        }

        prop_assert_eq!(paid + ledger.balance(), balance);
        prop_assert!(ledger.balance() >= keep_alive.min(balance));
        prop_assert!(receipts.last().is_some_and(|r| r.closed));
        prop_assert_eq!(c.phase(), CollectorPhase::Idle { last_epoch: 1 });

        let per_item = receipts[0].per_item_share;
        for i in 0..n {
            prop_assert_eq!(ledger.balance_of(&holder(i)), per_item);
        }
    }
}
