//! Connections demo: open many connections and hold them.
//!
//! The connections stay open until Ctrl+C (or exit immediately with
//! `--no-wait`), then are closed explicitly.
//!
//! Usage:
//!   cargo run --example connections -- --count 200
//!   cargo run --example connections -- --count 50 --no-wait --json

mod common;

use std::time::Instant;

use anyhow::Result;
use ws_loadgen::{PoolSummary, close_all, wait_all_open};

use common::{Args, init_logging, wait_for_exit};

// ============================================================================
// Constants
// ============================================================================

const DEFAULT_COUNT: usize = 10;

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("\n[ERROR] {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Args::parse(DEFAULT_COUNT)?;
    init_logging(args.debug);

    let config = args.config()?;
    println!(
        "=== Connections: {} to {} ===",
        config.count(),
        config.endpoint()
    );

    let started = Instant::now();
    let connections = config.open_connections()?;
    println!("[1] Started {} connections", connections.len());

    let results = wait_all_open(&connections).await;
    for (connection, result) in connections.iter().zip(&results) {
        if let Err(e) = result {
            println!("    {} failed: {e}", connection.id());
        }
    }

    let summary = PoolSummary::of(&connections);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "[2] {} open, {} failed, {} closed after {:?}",
            summary.open,
            summary.failed,
            summary.closed,
            started.elapsed()
        );
    }

    wait_for_exit(args.no_wait).await;

    close_all(&connections).await;
    println!("[3] Closed all connections");

    Ok(())
}
