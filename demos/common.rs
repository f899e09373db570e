//! Shared utilities for the demo programs.
//!
//! Provides common functionality used by both demos:
//! - Command-line argument parsing
//! - Logging initialization
//! - Graceful exit handling

#![allow(dead_code)]

// ============================================================================
// Imports
// ============================================================================

use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;
use ws_loadgen::{DEFAULT_ENDPOINT, LoadConfig};

// ============================================================================
// Types
// ============================================================================

/// Command-line arguments for the demos.
#[derive(Debug, Clone)]
pub struct Args {
    pub endpoint: String,
    pub count: usize,
    pub debug: bool,
    pub json: bool,
    pub no_wait: bool,
}

impl Args {
    /// Parse command-line arguments.
    ///
    /// `--endpoint <url>`, `--count <n>`, `--debug`, `--json`, `--no-wait`.
    pub fn parse(default_count: usize) -> Result<Self> {
        Self::parse_from(std::env::args().skip(1), default_count)
    }

    /// Parse arguments from any iterator (program name excluded).
    pub fn parse_from(
        args: impl IntoIterator<Item = String>,
        default_count: usize,
    ) -> Result<Self> {
        let mut parsed = Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            count: default_count,
            debug: false,
            json: false,
            no_wait: false,
        };

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--endpoint" => {
                    parsed.endpoint = args.next().context("--endpoint needs a value")?;
                }
                "--count" => {
                    let value = args.next().context("--count needs a value")?;
                    parsed.count = value.parse().with_context(|| {
                        format!("--count must be a non-negative integer, got '{value}'")
                    })?;
                }
                "--debug" => parsed.debug = true,
                "--json" => parsed.json = true,
                "--no-wait" => parsed.no_wait = true,
                other => bail!("unknown argument '{other}'"),
            }
        }

        Ok(parsed)
    }

    /// Builds the load configuration from the parsed arguments.
    pub fn config(&self) -> Result<LoadConfig> {
        Ok(LoadConfig::builder()
            .endpoint(self.endpoint.clone())
            .count(self.count)
            .build()?)
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Initialize tracing/logging. `RUST_LOG` overrides the default filter.
pub fn init_logging(debug: bool) {
    let default_filter = if debug {
        "ws_loadgen=debug"
    } else {
        "ws_loadgen=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Wait for Ctrl+C or skip if `--no-wait` flag is set.
pub async fn wait_for_exit(no_wait: bool) {
    if no_wait {
        println!("[--no-wait] Skipping wait");
        return;
    }

    println!("Press Ctrl+C to exit...");
    tokio::signal::ctrl_c().await.ok();
}
