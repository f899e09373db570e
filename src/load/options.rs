//! Connection options shared by both load generators.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use ws_loadgen::ConnectOptions;
//!
//! let options = ConnectOptions::new()
//!     .with_connect_timeout(Duration::from_secs(5))
//!     .with_max_in_flight(32);
//!
//! assert!(options.validate().is_ok());
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Default handshake timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default bound on unacknowledged sends per connection.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 100;

// ============================================================================
// ConnectOptions
// ============================================================================

/// Per-connection transport options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Maximum time for the WebSocket handshake.
    pub connect_timeout: Duration,

    /// Maximum number of queued, unacknowledged frames per connection.
    pub max_in_flight: usize,
}

// ============================================================================
// Constructors
// ============================================================================

impl ConnectOptions {
    /// Creates options with default settings.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl ConnectOptions {
    /// Sets the handshake timeout.
    #[inline]
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the bound on unacknowledged frames.
    #[inline]
    #[must_use]
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight;
        self
    }
}

// ============================================================================
// Validation
// ============================================================================

impl ConnectOptions {
    /// Checks that every option is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a zero timeout or a zero in-flight bound.
    pub fn validate(&self) -> Result<()> {
        if self.connect_timeout.is_zero() {
            return Err(Error::config("connect_timeout must be greater than zero"));
        }

        if self.max_in_flight == 0 {
            return Err(Error::config("max_in_flight must be at least 1"));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
