//! WebSocket transport layer.
//!
//! This module owns the client side of every WebSocket the crate opens.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐                             ┌─────────────────┐
//! │ Connection       │   mpsc (bounded)  ┌──────┐  │ Target server   │
//! │ (handle)         │──────────────────►│ task │◄►│ ws://host:port  │
//! │                  │◄──────────────────│      │  │                 │
//! └──────────────────┘   watch (state)   └──────┘  └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `Connection::connect` - Returns a handle in `Connecting`, spawns the task
//! 2. Task completes the handshake - `Open` (or `Failed`)
//! 3. `Connection::send_text` / `enqueue_text` - Frames written in order
//! 4. `Connection::close` - Close frame sent, task ends - `Closed`
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | Connection handle and event loop |
//! | `endpoint` | Validated WebSocket addresses |

// ============================================================================
// Submodules
// ============================================================================

/// Connection handle and event loop.
pub mod connection;

/// Validated WebSocket endpoint addresses.
pub mod endpoint;

/// Loopback recording server for tests.
#[cfg(test)]
pub(crate) mod server;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{Connection, ConnectionState, MessageHandler, SendReceipt};
pub use endpoint::{DEFAULT_ENDPOINT, Endpoint};
