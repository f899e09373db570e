//! Burst demo: one connection, marker plus numbered messages, then close.
//!
//! Usage:
//!   cargo run --example burst -- --count 1000
//!   cargo run --example burst -- --endpoint ws://127.0.0.1:1234/connect --count 10 --json

mod common;

use anyhow::Result;

use common::{Args, init_logging};

// ============================================================================
// Constants
// ============================================================================

const DEFAULT_COUNT: usize = 100;

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
        "=== Burst: {} messages to {} ===",
        config.count(),
        config.endpoint()
    );

    let report = config.run_burst().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "[OK] {} frames on {} in {:?} ({:.1} frames/s)",
            report.sent,
            report.connection_id,
            report.elapsed,
            report.frames_per_sec()
        );
    }

    Ok(())
}
