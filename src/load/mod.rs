//! Load generators.
//!
//! This module provides the two operations of the crate and their
//! configuration.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`MessageBurstSender`] | One connection, marker plus numbered frames, close |
//! | [`ConnectionPoolOpener`] | Many connections, handles returned to the caller |
//! | [`LoadConfig`] | Endpoint, count and options of one run |
//! | [`ConnectOptions`] | Handshake timeout and in-flight bound |
//!
//! # Example
//!
//! ```no_run
//! use ws_loadgen::{LoadConfig, Result};
//!
//! # async fn example() -> Result<()> {
//! let config = LoadConfig::builder()
//!     .endpoint("ws://127.0.0.1:1234/connect")
//!     .count(100)
//!     .build()?;
//!
//! let report = config.run_burst().await?;
//! let connections = config.open_connections()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder for run configuration.
pub mod builder;

/// Message burst over one connection.
pub mod burst;

/// Opening many connections at once.
pub mod opener;

/// Connection options.
pub mod options;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::{LoadConfig, LoadConfigBuilder};
pub use burst::{BurstReport, MessageBurstSender, send_burst};
pub use opener::{ConnectionPoolOpener, PoolSummary, close_all, open_connections, wait_all_open};
pub use options::{ConnectOptions, DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_IN_FLIGHT};
