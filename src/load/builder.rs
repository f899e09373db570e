//! Builder for load run configuration.
//!
//! Provides a fluent API for configuring and creating [`LoadConfig`]
//! instances. Endpoint and count are the only required knobs; everything
//! else has a default.
//!
//! # Example
//!
//! ```
//! use ws_loadgen::LoadConfig;
//!
//! # fn example() -> ws_loadgen::Result<()> {
//! let config = LoadConfig::builder()
//!     .endpoint("ws://127.0.0.1:1234/connect")
//!     .count(500)
//!     .build()?;
//!
//! assert_eq!(config.count(), 500);
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crate::error::Result;
use crate::transport::{Connection, DEFAULT_ENDPOINT, Endpoint};

use super::burst::{BurstReport, MessageBurstSender};
use super::opener::ConnectionPoolOpener;
use super::options::ConnectOptions;

// ============================================================================
// LoadConfig
// ============================================================================

/// Validated configuration of one load run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadConfig {
    endpoint: Endpoint,
    count: usize,
    options: ConnectOptions,
}

impl LoadConfig {
    /// Creates a new configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> LoadConfigBuilder {
        LoadConfigBuilder::new()
    }

    /// Returns the target endpoint.
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns the number of messages (burst) or connections (opener).
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the connection options.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &ConnectOptions {
        &self.options
    }

    /// Creates a burst sender for this configuration.
    #[must_use]
    pub fn burst_sender(&self) -> MessageBurstSender {
        MessageBurstSender::new(self.endpoint.clone()).with_options(self.options.clone())
    }

    /// Creates a connection opener for this configuration.
    #[must_use]
    pub fn opener(&self) -> ConnectionPoolOpener {
        ConnectionPoolOpener::new(self.endpoint.clone()).with_options(self.options.clone())
    }

    /// Sends one burst of `count` messages.
    ///
    /// # Errors
    ///
    /// See [`MessageBurstSender::send_burst`].
    pub async fn run_burst(&self) -> Result<BurstReport> {
        self.burst_sender().send_burst(self.count).await
    }

    /// Starts `count` connections.
    ///
    /// # Errors
    ///
    /// See [`ConnectionPoolOpener::open`].
    pub fn open_connections(&self) -> Result<Vec<Connection>> {
        self.opener().open(self.count)
    }
}

// ============================================================================
// LoadConfigBuilder
// ============================================================================

/// Builder for a [`LoadConfig`].
///
/// Use [`LoadConfig::builder()`] to create a new builder.
#[derive(Debug, Default, Clone)]
pub struct LoadConfigBuilder {
    /// Endpoint text, parsed at build time.
    endpoint: Option<String>,
    /// Messages or connections.
    count: usize,
    /// Transport options.
    options: ConnectOptions,
}

impl LoadConfigBuilder {
    /// Creates a builder targeting the default endpoint with a count of zero.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the endpoint address (e.g. `ws://127.0.0.1:1234/connect`).
    #[inline]
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the number of messages or connections.
    #[inline]
    #[must_use]
    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Sets the handshake timeout.
    #[inline]
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.options = self.options.with_connect_timeout(timeout);
        self
    }

    /// Sets the bound on unacknowledged frames per connection.
    #[inline]
    #[must_use]
    pub fn max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.options = self.options.with_max_in_flight(max_in_flight);
        self
    }

    /// Replaces all connection options.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: ConnectOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the configuration with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidEndpoint`](crate::Error::InvalidEndpoint) if the
    ///   endpoint is not a WebSocket URL
    /// - [`Error::Config`](crate::Error::Config) if an option is out of range
    pub fn build(self) -> Result<LoadConfig> {
        let endpoint = Endpoint::parse(self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT))?;
        self.options.validate()?;

        Ok(LoadConfig {
            endpoint,
            count: self.count,
            options: self.options,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
