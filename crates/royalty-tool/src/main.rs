//! royalty-tool: operator utility for royalty distribution rounds.
//!
//! Turns an owner snapshot into the artifacts each distribution mode needs.
//! Logs go to stderr; command output goes to stdout as JSON.
//!
//! Usage:
//!   royalty-tool [--config <path>] claims <snapshot.json> <epoch> [out.json]
//!   royalty-tool [--config <path>] batches <snapshot.json> <epoch> [chunk]
//!   royalty-tool [--config <path>] verify <claims.json> <owner>
//!   royalty-tool [--config <path>] simulate <snapshot.json> <epoch> <balance>

mod commands;
mod config;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use royalty_merkle::ClaimBundle;
use royalty_types::{to_coins_string, Address, OwnerSnapshot};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ToolConfig;

const USAGE: &str = "usage: royalty-tool [--config <path>] <command>\n\
  claims <snapshot.json> <epoch> [out.json]\n\
  batches <snapshot.json> <epoch> [chunk]\n\
  verify <claims.json> <owner>\n\
  simulate <snapshot.json> <epoch> <balance>";

fn main() -> anyhow::Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let config_path = match args.iter().position(|a| a == "--config") {
        Some(pos) => {
            let Some(path) = args.get(pos + 1).cloned() else {
                bail!("--config needs a path\n{USAGE}");
            };
            args.remove(pos + 1);
            args.remove(pos);
            Some(PathBuf::from(path))
        }
        None => None,
    };

    let config = ToolConfig::load(config_path.as_deref())?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.advanced.log_level)),
        )
        .init();

    let Some((command, rest)) = args.split_first() else {
        bail!("{USAGE}");
    };

    match (command.as_str(), rest) {
        ("claims", [snapshot, epoch, out @ ..]) => {
            let snapshot = read_snapshot(Path::new(snapshot))?;
            let bundle = commands::claims(&snapshot, parse_number(epoch, "epoch")?)?;
            let json = bundle.to_json_pretty()?;
            match out.first() {
                Some(path) => {
                    std::fs::write(path, &json).with_context(|| format!("writing {path}"))?;
                    info!(path = %path, "claim bundle written");
                    println!("root_hash: {}", bundle.root_hash);
                    println!("total: {}", bundle.total);
                }
                None => println!("{json}"),
            }
        }
        ("batches", [snapshot, epoch, chunk @ ..]) => {
            let snapshot = read_snapshot(Path::new(snapshot))?;
            let chunk_size = match chunk.first() {
                Some(c) => parse_number(c, "chunk")?,
                None => config.batching.chunk_size,
            };
            let plan = commands::batches(&snapshot, parse_number(epoch, "epoch")?, chunk_size)?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        ("verify", [bundle, owner]) => {
            let text = std::fs::read_to_string(bundle).with_context(|| format!("reading {bundle}"))?;
            let bundle = ClaimBundle::from_json(&text)?;
            let owner: Address = owner.parse()?;
            let checks = commands::verify(&bundle, &owner);
            println!("{}", serde_json::to_string_pretty(&checks)?);
            if checks.is_empty() {
                bail!("{owner} holds no entries in epoch {}", bundle.epoch_id);
            }
            if checks.iter().any(|c| !c.valid) {
                bail!("invalid proof for {owner} in epoch {}", bundle.epoch_id);
            }
        }
        ("simulate", [snapshot, epoch, balance]) => {
            let snapshot = read_snapshot(Path::new(snapshot))?;
            let balance = parse_number(balance, "balance")?;
            info!(balance = %to_coins_string(balance), "simulating distribution");
            let report = commands::simulate(&config, &snapshot, parse_number(epoch, "epoch")?, balance)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => bail!("{USAGE}"),
    }

    Ok(())
}

fn read_snapshot(path: &Path) -> anyhow::Result<OwnerSnapshot> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let snapshot = OwnerSnapshot::from_json(&text)?;
    info!(
        label = %snapshot.label,
        total = snapshot.total,
        digest = %snapshot.digest(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

fn parse_number<T: std::str::FromStr>(value: &str, what: &str) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.parse().with_context(|| format!("invalid {what}: {value}"))
}
