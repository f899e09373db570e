//! ws-loadgen - WebSocket load generation helper.
//!
//! This library drives a WebSocket server under test in two ways:
//!
//! - **Message burst**: one connection, a `rate_test` marker frame followed
//!   by `count` numbered frames (`message #0`, `message #1`, ...), then close
//! - **Connection flood**: `count` independent connections whose handles are
//!   handed back to the caller
//!
//! # Architecture
//!
//! Every connection is a [`Connection`] handle backed by one tokio task that
//! owns the socket. Handles are returned before the handshake finishes;
//! the outcome is observed through [`Connection::wait_open`]. Failures stay
//! local to the connection they happened on.
//!
//! # Quick Start
//!
//! ```no_run
//! use ws_loadgen::{Result, open_connections, send_burst, wait_all_open};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Marker plus three numbered frames, then close
//!     let report = send_burst("ws://127.0.0.1:1234/connect", 3).await?;
//!     println!("sent {} frames in {:?}", report.sent, report.elapsed);
//!
//!     // Five connections, left open for the caller
//!     let connections = open_connections("ws://127.0.0.1:1234/connect", 5)?;
//!     for result in wait_all_open(&connections).await {
//!         result?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`load`] | Burst sender, connection opener, configuration |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | Burst frame texts |
//! | [`transport`] | Connection handle and endpoint type |

// ============================================================================
// Modules
// ============================================================================

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers.
pub mod identifiers;

/// Load generators and their configuration.
///
/// Use [`LoadConfig::builder()`] to configure a run, or call
/// [`send_burst`] and [`open_connections`] directly.
pub mod load;

/// Burst wire format.
pub mod protocol;

/// WebSocket transport layer.
///
/// Connection handles, their lifecycle and endpoint validation.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::ConnectionId;

// Load types
pub use load::{
    BurstReport, ConnectOptions, ConnectionPoolOpener, LoadConfig, LoadConfigBuilder,
    MessageBurstSender, PoolSummary, close_all, open_connections, send_burst, wait_all_open,
};

// Protocol
pub use protocol::{BURST_MARKER, sequence_message};

// Transport types
pub use transport::{
    Connection, ConnectionState, DEFAULT_ENDPOINT, Endpoint, MessageHandler, SendReceipt,
};
