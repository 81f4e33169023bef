//! Subcommand implementations.
//!
//! Everything here works on decoded values; file and stdout handling stays in
//! `main`.

use anyhow::Context;
use royalty_collector::{plan_batches, BatchReceipt, BatchRequest, CollectorConfig, RoyaltyCollector};
use royalty_merkle::{build, ClaimBundle};
use royalty_revenue::{Ledger, MemoryLedger, RoyaltySplit};
use royalty_splitter::{EpochReceipt, RoyaltySplitter, SplitterConfig};
use royalty_types::{Address, Coins, Hash256, OwnerSnapshot};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::ToolConfig;

/// Build the claim bundle for `epoch` from a snapshot.
pub fn claims(snapshot: &OwnerSnapshot, epoch: u32) -> anyhow::Result<ClaimBundle> {
    let leaves = snapshot.leaves();
    let tree = build(&leaves).context("building Merkle tree")?;
    if !tree.is_contiguous() {
        warn!(
            leaves = tree.len(),
            "leaf indices are not contiguous from 0; per-share division will use the leaf count"
        );
    }
    info!(epoch, root = %tree.root(), total = tree.len(), "claim bundle built");
    Ok(ClaimBundle::new(epoch, &tree))
}

/// Plan the push-mode batches for `epoch` from a snapshot.
pub fn batches(snapshot: &OwnerSnapshot, epoch: u32, chunk_size: usize) -> anyhow::Result<Vec<BatchRequest>> {
    let plan = plan_batches(epoch, &snapshot.leaves(), chunk_size).context("planning batches")?;
    info!(epoch, batches = plan.len(), chunk_size, "batch plan built");
    Ok(plan)
}

/// Result of checking one bundle entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryCheck {
    /// Leaf index.
    pub index: u32,
    /// Whether the proof links the entry to the bundle root.
    pub valid: bool,
}

/// Check every entry `owner` holds in `bundle`.
pub fn verify(bundle: &ClaimBundle, owner: &Address) -> Vec<EntryCheck> {
    bundle
        .entries_for(owner)
        .map(|entry| EntryCheck {
            index: entry.index,
            valid: entry.verify(&bundle.root_hash),
        })
        .collect()
}

/// Outcome of a dry run of both engines.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    /// Published root.
    pub root_hash: Hash256,
    /// Pull mode: epoch publication.
    pub splitter_epoch: EpochReceipt,
    /// Pull mode: sum of all claims.
    pub splitter_claimed: Coins,
    /// Pull mode: pool left after every holder claimed.
    pub splitter_left: Coins,
    /// Push mode: one receipt per batch.
    pub collector_batches: Vec<BatchReceipt>,
    /// Push mode: pool left after the last batch.
    pub collector_left: Coins,
}

/// Run both engines in memory against a pool of `balance`.
///
/// Every holder of the snapshot claims once in pull mode; the batch plan is
/// submitted in order in push mode. Engine parameters come from the
/// `[splitter]` and `[collector]` sections, or from placeholder accounts.
pub fn simulate(
    config: &ToolConfig,
    snapshot: &OwnerSnapshot,
    epoch: u32,
    balance: Coins,
) -> anyhow::Result<SimulationReport> {
    let bundle = claims(snapshot, epoch)?;

    let splitter_config = config.splitter.clone().unwrap_or_else(|| SplitterConfig {
        owner: Address::from_label("owner"),
        creator: Address::from_label("creator"),
        keep_alive: 0,
        min_payout: 0,
        split: RoyaltySplit::default(),
    });
    let splitter_owner = splitter_config.owner;
    let mut splitter = RoyaltySplitter::new(splitter_config)?;
    let mut pull_ledger = MemoryLedger::new(balance);
    let splitter_epoch = splitter.set_epoch(
        &mut pull_ledger,
        &splitter_owner,
        epoch,
        bundle.total,
        bundle.root_hash,
    )?;
    let mut splitter_claimed: Coins = 0;
    for entry in &bundle.holders {
        let outcome = splitter.claim(&mut pull_ledger, &entry.owner, entry.index, &entry.proof)?;
        splitter_claimed = splitter_claimed.saturating_add(outcome.paid());
    }

    let collector_config = config.collector.clone().unwrap_or_else(|| CollectorConfig {
        owner: Address::from_label("owner"),
        creator: Address::from_label("creator"),
        keep_alive: 0,
        min_payout: 0,
        split: RoyaltySplit::default(),
    });
    let collector_owner = collector_config.owner;
    let mut collector = RoyaltyCollector::new(collector_config)?;
    let mut push_ledger = MemoryLedger::new(balance);
    let mut collector_batches = Vec::new();
    for request in batches(snapshot, epoch, config.batching.chunk_size)? {
        collector_batches.push(collector.submit_batch(&mut push_ledger, &collector_owner, &request)?);
    }

    Ok(SimulationReport {
        root_hash: bundle.root_hash,
        splitter_epoch,
        splitter_claimed,
        splitter_left: pull_ledger.balance(),
        collector_batches,
        collector_left: push_ledger.balance(),
    })
}
