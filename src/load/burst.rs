//! Message burst over a single connection.
//!
//! One burst is: connect, wait for open, send the marker followed by
//! `count` numbered frames in order, close. The connection is closed
//! exactly once whether the burst succeeds or not.
//!
//! # Example
//!
//! ```no_run
//! use ws_loadgen::{MessageBurstSender, Endpoint, Result};
//!
//! # async fn example() -> Result<()> {
//! let sender = MessageBurstSender::new(Endpoint::parse("ws://127.0.0.1:1234/connect")?);
//! let report = sender.send_burst(1000).await?;
//! println!("{} frames in {:?}", report.sent, report.elapsed);
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::identifiers::ConnectionId;
use crate::protocol::burst_frames;
use crate::transport::{Connection, Endpoint, SendReceipt};

use super::ConnectOptions;

// ============================================================================
// BurstReport
// ============================================================================

/// Outcome of a successful burst.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BurstReport {
    /// Connection the burst used.
    pub connection_id: ConnectionId,
    /// Endpoint the burst targeted.
    pub endpoint: String,
    /// Frames written, marker included.
    pub sent: usize,
    /// Time from connect to close.
    pub elapsed: Duration,
}

impl BurstReport {
    /// Returns frames written per second.
    #[must_use]
    pub fn frames_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 { self.sent as f64 / secs } else { 0.0 }
    }
}

// ============================================================================
// MessageBurstSender
// ============================================================================

/// Sends numbered message bursts to one endpoint.
///
/// Each [`send_burst`](Self::send_burst) call opens its own connection, so
/// a sender can be reused and shared between tasks.
#[derive(Debug, Clone)]
pub struct MessageBurstSender {
    endpoint: Endpoint,
    options: ConnectOptions,
}

impl MessageBurstSender {
    /// Creates a sender with default options.
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
    /// The options are validated when a burst starts.
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

    /// Returns the connection options.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &ConnectOptions {
        &self.options
    }

    /// Runs one burst of `count` numbered messages.
    ///
    /// Sends `count + 1` frames: `rate_test`, then `message #0` through
    /// `message #{count - 1}`.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`](crate::Error::Config) if the options are invalid
    /// - [`Error::Connection`](crate::Error::Connection) or
    ///   [`Error::ConnectionTimeout`](crate::Error::ConnectionTimeout) if the
    ///   connection never opened
    /// - [`Error::Send`](crate::Error::Send) if a frame could not be written;
    ///   nothing after it is sent
    pub async fn send_burst(&self, count: usize) -> Result<BurstReport> {
        let started = Instant::now();
        let connection = Connection::connect(self.endpoint.clone(), &self.options)?;
        let id = connection.id();

        let outcome = Self::drive(&connection, count, self.options.max_in_flight).await;
        connection.close().await;

        match outcome {
            Ok(sent) => {
                let report = BurstReport {
                    connection_id: id,
                    endpoint: self.endpoint.to_string(),
                    sent,
                    elapsed: started.elapsed(),
                };
                info!(
                    conn = %id,
                    sent,
                    elapsed_ms = report.elapsed.as_millis() as u64,
                    "Burst complete"
                );
                Ok(report)
            }
            Err(e) => {
                warn!(conn = %id, endpoint = %self.endpoint, error = %e, "Burst failed");
                Err(e)
            }
        }
    }

    /// Writes every frame, keeping at most `window` unacknowledged.
    ///
    /// Returns the number of acknowledged frames.
    async fn drive(connection: &Connection, count: usize, window: usize) -> Result<usize> {
        connection.wait_open().await?;
        debug!(conn = %connection.id(), count, window, "Burst started");

        let mut in_flight: VecDeque<(usize, SendReceipt)> = VecDeque::with_capacity(window);
        let mut acked = 0usize;

        for (position, frame) in burst_frames(count).enumerate() {
            if in_flight.len() >= window
                && let Some((oldest, receipt)) = in_flight.pop_front()
            {
                Self::settle(connection.id(), oldest, receipt).await?;
                acked += 1;
            }

            let receipt = connection.enqueue_text(frame).await?;
            in_flight.push_back((position, receipt));
        }

        for (position, receipt) in in_flight {
            Self::settle(connection.id(), position, receipt).await?;
            acked += 1;
        }

        Ok(acked)
    }

    /// Waits for one receipt, naming the frame if it failed.
    async fn settle(id: ConnectionId, position: usize, receipt: SendReceipt) -> Result<()> {
        receipt.wait().await.inspect_err(|e| {
            warn!(conn = %id, frame = position, error = %e, "Frame not written");
        })
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Runs one burst against `endpoint` with default options.
///
/// # Errors
///
/// - [`Error::InvalidEndpoint`](crate::Error::InvalidEndpoint) before any I/O
/// - Otherwise as [`MessageBurstSender::send_burst`]
pub async fn send_burst(endpoint: &str, count: usize) -> Result<BurstReport> {
    MessageBurstSender::new(Endpoint::parse(endpoint)?)
        .send_burst(count)
        .await
}

// ============================================================================
// Tests
// ============================================================================
