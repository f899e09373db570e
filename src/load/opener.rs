//! Opening many connections at once.
//!
//! The opener only starts connections; it never sends on them and never
//! closes them. Handles are returned to the caller in creation order, and
//! the caller decides when to close them ([`close_all`] or dropping them).
//!
//! # Example
//!
//! ```no_run
//! use ws_loadgen::{open_connections, wait_all_open, close_all, Result};
//!
//! # async fn example() -> Result<()> {
//! let connections = open_connections("ws://127.0.0.1:1234/connect", 100)?;
//!
//! let results = wait_all_open(&connections).await;
//! let failed = results.iter().filter(|r| r.is_err()).count();
//! println!("{failed} connections failed");
//!
//! close_all(&connections).await;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use futures_util::future::join_all;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::transport::{Connection, ConnectionState, Endpoint};

use super::ConnectOptions;

// ============================================================================
// ConnectionPoolOpener
// ============================================================================

/// Opens batches of independent connections to one endpoint.
#[derive(Debug, Clone)]
pub struct ConnectionPoolOpener {
    endpoint: Endpoint,
    options: ConnectOptions,
}

impl ConnectionPoolOpener {
    /// Creates an opener with default options.
    #[inline]
    #[must_use]
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            options: ConnectOptions::default(),
        }
    }

    /// Replaces the connection options.
    ///
    /// The options are validated by [`open`](Self::open).
    #[inline]
    #[must_use]
    pub fn with_options(mut self, options: ConnectOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the target endpoint.
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Starts `count` connections and returns their handles.
    ///
    /// Returns without waiting: handles may still be connecting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the options are
    /// invalid or there is no current Tokio runtime. No connection is left
    /// running in that case.
    pub fn open(&self, count: usize) -> Result<Vec<Connection>> {
        self.options.validate()?;

        let connections = (0..count)
            .map(|_| Connection::connect(self.endpoint.clone(), &self.options))
            .collect::<Result<Vec<_>>>()?;

        info!(count, endpoint = %self.endpoint, "Connections started");
        Ok(connections)
    }
}

// ============================================================================
// PoolSummary
// ============================================================================

/// Count of handles per lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolSummary {
    /// Handshake still running.
    pub connecting: usize,
    /// Ready to send.
    pub open: usize,
    /// Closed locally or remotely.
    pub closed: usize,
    /// Never opened.
    pub failed: usize,
}

impl PoolSummary {
    /// Tallies the current state of every handle.
    #[must_use]
    pub fn of(connections: &[Connection]) -> Self {
        connections
            .iter()
            .fold(Self::default(), |mut summary, connection| {
                match connection.state() {
                    ConnectionState::Connecting => summary.connecting += 1,
                    ConnectionState::Open => summary.open += 1,
                    ConnectionState::Closed => summary.closed += 1,
                    ConnectionState::Failed => summary.failed += 1,
                }
                summary
            })
    }

    /// Returns the number of handles counted.
    #[inline]
    #[must_use]
    pub fn total(&self) -> usize {
        self.connecting + self.open + self.closed + self.failed
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Starts `count` connections to `endpoint` with default options.
///
/// # Errors
///
/// - [`Error::InvalidEndpoint`](crate::Error::InvalidEndpoint) before any
///   connection is attempted
/// - [`Error::Config`](crate::Error::Config) outside a Tokio runtime
///
/// Per-connection failures are reported by each handle's
/// [`Connection::wait_open`].
pub fn open_connections(endpoint: &str, count: usize) -> Result<Vec<Connection>> {
    ConnectionPoolOpener::new(Endpoint::parse(endpoint)?).open(count)
}

/// Waits for every handshake; one result per handle, in the same order.
pub async fn wait_all_open(connections: &[Connection]) -> Vec<Result<()>> {
    let results = join_all(connections.iter().map(|connection| connection.wait_open())).await;

    let failed = results.iter().filter(|result| result.is_err()).count();
    debug!(total = results.len(), failed, "Handshakes settled");
    results
}

/// Closes every handle. Already closed handles are left alone.
pub async fn close_all(connections: &[Connection]) {
    join_all(connections.iter().map(|connection| connection.close())).await;
    debug!(count = connections.len(), "Connections closed");
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;
    use std::time::Duration;

    use crate::error::Error;
    use crate::transport::server::{Behavior, RecordingServer};

    #[tokio::test]
    async fn test_open_five_distinct_handles() {
        let server = RecordingServer::bind(Behavior::Record).await;

        let connections = open_connections(&server.ws_url(), 5).expect("valid endpoint");
        assert_eq!(connections.len(), 5);

        let ids: HashSet<_> = connections.iter().map(Connection::id).collect();
        assert_eq!(ids.len(), 5);
        for connection in &connections {
            assert_eq!(connection.endpoint(), &server.endpoint());
            assert!(matches!(
                connection.state(),
                ConnectionState::Connecting | ConnectionState::Open
            ));
        }

        close_all(&connections).await;
    }

    #[tokio::test]
    async fn test_zero_count_is_empty() {
        let server = RecordingServer::bind(Behavior::Record).await;
        let connections = open_connections(&server.ws_url(), 0).expect("valid endpoint");
        assert!(connections.is_empty());
        assert_eq!(PoolSummary::of(&connections).total(), 0);
    }

    #[tokio::test]
    async fn test_handles_created_in_order() {
        let server = RecordingServer::bind(Behavior::Record).await;
        let connections = ConnectionPoolOpener::new(server.endpoint())
            .open(4)
            .expect("open");

        let ids: Vec<_> = connections.iter().map(|c| c.id().as_u64()).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);

        close_all(&connections).await;
    }

    #[tokio::test]
    async fn test_opener_leaves_connections_open() {
        let server = RecordingServer::bind(Behavior::Record).await;
        let connections = open_connections(&server.ws_url(), 3).expect("valid endpoint");

        let results = wait_all_open(&connections).await;
        assert!(results.iter().all(Result::is_ok));
        assert_eq!(
            PoolSummary::of(&connections),
            PoolSummary {
                open: 3,
                ..PoolSummary::default()
            }
        );

        let sessions = server.wait_until(|s| s.len() == 3).await;
        assert!(sessions.iter().all(|s| s.frames.is_empty() && s.closes == 0));

        close_all(&connections).await;
        let sessions = server
            .wait_until(|s| s.len() == 3 && s.iter().all(|session| session.ended))
            .await;
        assert!(sessions.iter().all(|s| s.closes == 1));
        assert_eq!(PoolSummary::of(&connections).closed, 3);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_affect_others() {
        let server = RecordingServer::bind(Behavior::Record).await;
        let options = ConnectOptions::new().with_connect_timeout(Duration::from_secs(5));
        let mut connections = ConnectionPoolOpener::new(server.endpoint())
            .with_options(options.clone())
            .open(2)
            .expect("open");

        let dead = Endpoint::parse("ws://127.0.0.1:1/connect").expect("endpoint");
        connections.insert(1, Connection::connect(dead, &options).expect("connect"));

        let results = wait_all_open(&connections).await;
        assert!(results[0].is_ok());
        assert!(results[1].as_ref().is_err_and(Error::is_connection_error));
        assert!(results[2].is_ok());

        assert!(connections[0].send_text("still fine").await.is_ok());
        close_all(&connections).await;
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let err = open_connections("tcp://127.0.0.1:1234", 2).unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_outside_runtime_is_config_error() {
        let err = open_connections("ws://127.0.0.1:1234/connect", 2).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[tokio::test]
    async fn test_invalid_options_rejected() {
        let server = RecordingServer::bind(Behavior::Record).await;
        let opener = ConnectionPoolOpener::new(server.endpoint())
            .with_options(ConnectOptions::new().with_max_in_flight(0));

        for count in [0, 3] {
            let err = opener.open(count).unwrap_err();
            assert!(matches!(err, Error::Config { .. }));
        }
        assert!(server.sessions().is_empty());
    }
}
