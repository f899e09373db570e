//! Validated WebSocket endpoint addresses.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Endpoint of the local chat server the helper was written against.
pub const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:1234/connect";

// ============================================================================
// Endpoint
// ============================================================================

/// A `ws://` or `wss://` URL with a host.
///
/// # Example
///
/// ```
/// use ws_loadgen::Endpoint;
///
/// let endpoint: Endpoint = "ws://127.0.0.1:1234/connect".parse().unwrap();
/// assert_eq!(endpoint.port(), 1234);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    /// Parses and validates an endpoint address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the text is not a URL, the
    /// scheme is not `ws`/`wss`, or there is no host.
    pub fn parse(text: &str) -> Result<Self> {
        let url = Url::parse(text).map_err(|e| Error::invalid_endpoint(text, e.to_string()))?;
        Self::from_url(url)
    }

    /// Validates an already parsed URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the scheme is not `ws`/`wss`
    /// or there is no host.
    pub fn from_url(url: Url) -> Result<Self> {
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(Error::invalid_endpoint(
                url.as_str(),
                format!("scheme must be ws or wss, got '{}'", url.scheme()),
            ));
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(Error::invalid_endpoint(url.as_str(), "missing host"));
        }

        Ok(Self { url })
    }

    /// Returns the endpoint as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Returns the underlying URL.
    #[inline]
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the host name or address.
    #[inline]
    #[must_use]
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Returns the port, falling back to the scheme default (80 or 443).
    #[inline]
    #[must_use]
    pub fn port(&self) -> u16 {
        self.url.port_or_known_default().unwrap_or(80)
    }

    /// Returns `true` for `wss://` endpoints.
    #[inline]
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.url.scheme() == "wss"
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Endpoint {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Endpoint {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl TryFrom<Url> for Endpoint {
    type Error = Error;

    fn try_from(value: Url) -> Result<Self> {
        Self::from_url(value)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================
