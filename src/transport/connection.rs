//! WebSocket connection handle and event loop.
//!
//! A [`Connection`] is returned immediately in the `Connecting` state. A
//! spawned tokio task performs the handshake and then owns the socket for
//! the rest of its life:
//!
//! - Outgoing text frames from the handle, in enqueue order
//! - Incoming frames from the server (counted, passed to a handler)
//! - Close requests, remote Close frames and socket errors
//!
//! # Lifecycle
//!
//! ```text
//! Connecting ──► Open ──► Closed
//!      │
//!      ├──────────────────► Closed   (close() before the handshake finished)
//!      └──► Failed                   (refused, unreachable, timed out)
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::net::TcpStream;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, trace, warn};

use crate::error::{Error, Result};
use crate::identifiers::ConnectionId;
use crate::load::ConnectOptions;

use super::Endpoint;

// ============================================================================
// Types
// ============================================================================

/// Client-side WebSocket stream.
type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Write half of the client-side stream.
type WsSink = SplitSink<WsStream, Message>;

/// Incoming text frame callback.
///
/// Called on the connection's task for each text frame the server sends.
pub type MessageHandler = Box<dyn Fn(&str) + Send + Sync>;

// ============================================================================
// ConnectionState
// ============================================================================

/// Lifecycle state of a [`Connection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    /// Handshake in progress.
    Connecting,
    /// Handshake done, frames may be sent.
    Open,
    /// Closed locally or by the remote end.
    Closed,
    /// Never opened.
    Failed,
}

impl ConnectionState {
    /// Returns `true` once no further transition can happen.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Failed)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Failure
// ============================================================================

/// Why establishment failed. Kept so every `wait_open` caller gets an error.
#[derive(Debug, Clone)]
enum Failure {
    Timeout { timeout_ms: u64 },
    Refused { message: String },
}

// ============================================================================
// ConnectionCommand
// ============================================================================

/// Internal commands for the event loop.
enum ConnectionCommand {
    /// Write a text frame and report the outcome.
    Send {
        text: String,
        ack_tx: oneshot::Sender<Result<()>>,
    },
    /// Send a Close frame and stop.
    Close { done_tx: oneshot::Sender<()> },
}

impl ConnectionCommand {
    /// Answers a command the event loop will never execute.
    fn abandon(self, id: ConnectionId) {
        match self {
            Self::Send { ack_tx, .. } => {
                let _ = ack_tx.send(Err(Error::send(format!("{id} is not open"))));
            }
            Self::Close { done_tx } => {
                let _ = done_tx.send(());
            }
        }
    }
}

// ============================================================================
// SendReceipt
// ============================================================================

/// Acknowledgement of one queued frame.
///
/// Resolves once the event loop has written the frame to the transport.
#[must_use = "a receipt does nothing unless waited on"]
#[derive(Debug)]
pub struct SendReceipt {
    ack_rx: oneshot::Receiver<Result<()>>,
}

impl SendReceipt {
    /// Waits until the frame has been written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Send`] if the write failed or the connection ended
    /// before the frame was written.
    pub async fn wait(self) -> Result<()> {
        match self.ack_rx.await {
            Ok(result) => result,
            Err(_) => Err(Error::send("connection ended before the frame was written")),
        }
    }
}

// ============================================================================
// Connection
// ============================================================================

/// Handle to one client WebSocket connection.
///
/// The handle is the only owner of the connection: dropping it ends the
/// event loop and closes the socket. It is deliberately not `Clone`.
pub struct Connection {
    /// Process-unique ID.
    id: ConnectionId,
    /// Target address.
    endpoint: Endpoint,
    /// Bounded channel to the event loop.
    command_tx: mpsc::Sender<ConnectionCommand>,
    /// Lifecycle updates from the event loop.
    state_rx: watch::Receiver<ConnectionState>,
    /// Set before the state becomes `Failed`.
    failure: Arc<Mutex<Option<Failure>>>,
    /// Set before the state first becomes `Open`.
    opened: Arc<AtomicBool>,
    /// Incoming frame callback (shared with event loop).
    message_handler: Arc<Mutex<Option<MessageHandler>>>,
    /// Incoming text frames so far (shared with event loop).
    received: Arc<AtomicU64>,
}

/// Everything the event loop task owns.
struct EventLoop {
    id: ConnectionId,
    endpoint: Endpoint,
    connect_timeout: Duration,
    command_rx: mpsc::Receiver<ConnectionCommand>,
    state_tx: watch::Sender<ConnectionState>,
    failure: Arc<Mutex<Option<Failure>>>,
    opened: Arc<AtomicBool>,
    message_handler: Arc<Mutex<Option<MessageHandler>>>,
    received: Arc<AtomicU64>,
}

impl Connection {
    /// Starts connecting to `endpoint` and returns the handle immediately.
    ///
    /// The handshake runs on a spawned task; use [`wait_open`](Self::wait_open)
    /// to observe its outcome.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `options` are invalid or there is no
    /// current Tokio runtime.
    pub fn connect(endpoint: Endpoint, options: &ConnectOptions) -> Result<Self> {
        options.validate()?;
        let runtime = Handle::try_current()
            .map_err(|e| Error::config(format!("connect needs a Tokio runtime: {e}")))?;

        let id = ConnectionId::next();
        let (command_tx, command_rx) = mpsc::channel(options.max_in_flight);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
        let failure = Arc::new(Mutex::new(None));
        let opened = Arc::new(AtomicBool::new(false));
        let message_handler: Arc<Mutex<Option<MessageHandler>>> = Arc::new(Mutex::new(None));
        let received = Arc::new(AtomicU64::new(0));

        runtime.spawn(
            EventLoop {
                id,
                endpoint: endpoint.clone(),
                connect_timeout: options.connect_timeout,
                command_rx,
                state_tx,
                failure: Arc::clone(&failure),
                opened: Arc::clone(&opened),
                message_handler: Arc::clone(&message_handler),
                received: Arc::clone(&received),
            }
            .run(),
        );

        Ok(Self {
            id,
            endpoint,
            command_tx,
            state_rx,
            failure,
            opened,
            message_handler,
            received,
        })
    }

    /// Returns the connection ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Returns the endpoint this connection targets.
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns the current lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Returns `true` if frames may be sent.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// Returns `true` if the handshake ever completed, even if the
    /// connection has closed since.
    #[inline]
    #[must_use]
    pub fn was_opened(&self) -> bool {
        self.opened.load(Ordering::Acquire)
    }

    /// Returns the number of text frames received from the server.
    #[inline]
    #[must_use]
    pub fn received_count(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    /// Returns the number of queued commands not yet taken by the event loop.
    #[inline]
    #[must_use]
    pub fn pending_sends(&self) -> usize {
        self.command_tx.max_capacity() - self.command_tx.capacity()
    }

    /// Sets the incoming frame callback.
    pub fn set_message_handler(&self, handler: MessageHandler) {
        let mut guard = self.message_handler.lock();
        *guard = Some(handler);
    }

    /// Clears the incoming frame callback.
    pub fn clear_message_handler(&self) {
        let mut guard = self.message_handler.lock();
        *guard = None;
    }

    /// Waits until the handshake has finished.
    ///
    /// Succeeds once the connection has opened, even if it was closed again
    /// before this call; later sends then fail with [`Error::Send`].
    ///
    /// # Errors
    ///
    /// - [`Error::Connection`] if the endpoint refused or was unreachable
    /// - [`Error::ConnectionTimeout`] if the handshake took too long
    /// - [`Error::ConnectionClosed`] if it was closed while still connecting
    pub async fn wait_open(&self) -> Result<()> {
        let mut state_rx = self.state_rx.clone();
        let reached = state_rx
            .wait_for(|state| *state != ConnectionState::Connecting)
            .await
            .map(|state| *state);
        let state = reached.unwrap_or_else(|_| self.state());

        match state {
            ConnectionState::Open => Ok(()),
            ConnectionState::Closed if self.was_opened() => Ok(()),
            ConnectionState::Failed => Err(self.failure_error()),
            ConnectionState::Closed | ConnectionState::Connecting => Err(Error::ConnectionClosed),
        }
    }

    /// Waits until the connection is closed or failed.
    pub async fn closed(&self) {
        let mut state_rx = self.state_rx.clone();
        let _ = state_rx.wait_for(|state| state.is_terminal()).await;
    }

    /// Queues a text frame and returns a receipt for its write.
    ///
    /// Waits for room when `max_in_flight` commands are already queued.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Send`] if the connection is not open.
    pub async fn enqueue_text(&self, text: impl Into<String>) -> Result<SendReceipt> {
        let state = self.state();
        if state != ConnectionState::Open {
            return Err(Error::send(format!("{} is {state}, not open", self.id)));
        }

        let (ack_tx, ack_rx) = oneshot::channel();
        self.command_tx
            .send(ConnectionCommand::Send {
                text: text.into(),
                ack_tx,
            })
            .await
            .map_err(|_| Error::send(format!("{} is closed", self.id)))?;

        Ok(SendReceipt { ack_rx })
    }

    /// Sends a text frame and waits until it has been written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Send`] if the connection is not open or the write
    /// fails.
    pub async fn send_text(&self, text: impl Into<String>) -> Result<()> {
        self.enqueue_text(text).await?.wait().await
    }

    /// Closes the connection.
    ///
    /// Frames queued before the call are written first. Closing while
    /// connecting cancels the handshake. Closing a closed or failed
    /// connection does nothing.
    pub async fn close(&self) {
        if self.state().is_terminal() {
            return;
        }

        let (done_tx, done_rx) = oneshot::channel();
        if self
            .command_tx
            .send(ConnectionCommand::Close { done_tx })
            .await
            .is_err()
        {
            return;
        }

        let _ = done_rx.await;
    }

    /// Builds the error describing a failed establishment.
    fn failure_error(&self) -> Error {
        match &*self.failure.lock() {
            Some(Failure::Timeout { timeout_ms }) => Error::connection_timeout(*timeout_ms),
            Some(Failure::Refused { message }) => {
                Error::connection(self.endpoint.as_str(), message.clone())
            }
            None => Error::ConnectionClosed,
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("endpoint", &self.endpoint.as_str())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// EventLoop
// ============================================================================

impl EventLoop {
    /// Task body: handshake, then frame I/O until closed.
    async fn run(mut self) {
        let Some(ws_stream) = self.establish().await else {
            self.drain_commands();
            return;
        };

        self.opened.store(true, Ordering::Release);
        self.state_tx.send_replace(ConnectionState::Open);
        info!(conn = %self.id, endpoint = %self.endpoint, "WebSocket connection established");

        let (mut ws_write, mut ws_read) = ws_stream.split();
        let mut close_ack = None;

        loop {
            tokio::select! {
                // Incoming frames from the server
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            self.handle_incoming_text(text.as_str());
                        }

                        Some(Ok(Message::Close(_))) => {
                            debug!(conn = %self.id, "WebSocket closed by remote");
                            // Flushes the queued Close reply.
                            let _ = ws_write.close().await;
                            break;
                        }

                        Some(Err(e)) => {
                            warn!(conn = %self.id, error = %e, "WebSocket error");
                            break;
                        }

                        None => {
                            debug!(conn = %self.id, "WebSocket stream ended");
                            break;
                        }

                        // Ignore Binary, Ping, Pong
                        _ => {}
                    }
                }

                // Commands from the handle
                command = self.command_rx.recv() => {
                    match command {
                        Some(ConnectionCommand::Send { text, ack_tx }) => {
                            let written = Self::write_text(self.id, &mut ws_write, text).await;
                            let failed = written.is_err();
                            let _ = ack_tx.send(written);
                            if failed {
                                break;
                            }
                        }

                        Some(ConnectionCommand::Close { done_tx }) => {
                            debug!(conn = %self.id, "Close requested");
                            if let Err(e) = ws_write.close().await {
                                debug!(conn = %self.id, error = %e, "Close frame not delivered");
                            }
                            close_ack = Some(done_tx);
                            break;
                        }

                        None => {
                            debug!(conn = %self.id, "Handle dropped, closing");
                            let _ = ws_write.close().await;
                            break;
                        }
                    }
                }
            }
        }

        self.state_tx.send_replace(ConnectionState::Closed);
        if let Some(done_tx) = close_ack {
            let _ = done_tx.send(());
        }
        self.drain_commands();

        debug!(conn = %self.id, "Event loop terminated");
    }

    /// Performs the handshake unless a close request or drop comes first.
    ///
    /// Returns `None` with the terminal state already published.
    async fn establish(&mut self) -> Option<WsStream> {
        debug!(conn = %self.id, endpoint = %self.endpoint, "Connecting");

        let handshake = timeout(self.connect_timeout, connect_async(self.endpoint.as_str()));

        tokio::select! {
            result = handshake => match result {
                Ok(Ok((ws_stream, _response))) => Some(ws_stream),
                Ok(Err(e)) => {
                    warn!(conn = %self.id, endpoint = %self.endpoint, error = %e, "Connection failed");
                    self.fail(Failure::Refused { message: e.to_string() });
                    None
                }
                Err(_) => {
                    let timeout_ms = self.connect_timeout.as_millis() as u64;
                    warn!(conn = %self.id, endpoint = %self.endpoint, timeout_ms, "Connection timed out");
                    self.fail(Failure::Timeout { timeout_ms });
                    None
                }
            },

            command = self.command_rx.recv() => {
                debug!(conn = %self.id, "Closed while connecting");
                self.state_tx.send_replace(ConnectionState::Closed);
                if let Some(command) = command {
                    command.abandon(self.id);
                }
                None
            }
        }
    }

    /// Counts an incoming text frame and passes it to the handler.
    fn handle_incoming_text(&self, text: &str) {
        self.received.fetch_add(1, Ordering::Relaxed);
        trace!(conn = %self.id, text, "Frame received");

        let handler = self.message_handler.lock();
        if let Some(ref handler) = *handler {
            handler(text);
        }
    }

    /// Records the failure, then publishes `Failed`.
    fn fail(&self, failure: Failure) {
        *self.failure.lock() = Some(failure);
        self.state_tx.send_replace(ConnectionState::Failed);
    }

    /// Writes one text frame.
    async fn write_text(id: ConnectionId, ws_write: &mut WsSink, text: String) -> Result<()> {
        match ws_write.send(Message::Text(text.into())).await {
            Ok(()) => {
                trace!(conn = %id, "Frame sent");
                Ok(())
            }
            Err(e) => {
                warn!(conn = %id, error = %e, "Failed to send frame");
                Err(Error::write(e))
            }
        }
    }

    /// Answers every command still queued after the loop stopped.
    fn drain_commands(&mut self) {
        self.command_rx.close();

        let mut count = 0usize;
        while let Ok(command) = self.command_rx.try_recv() {
            command.abandon(self.id);
            count += 1;
        }

        if count > 0 {
            debug!(conn = %self.id, count, "Abandoned queued commands");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    use tokio::net::TcpListener;
    use tokio_test::{assert_err, assert_ok};

    use crate::transport::server::{Behavior, RecordingServer};

    fn options() -> ConnectOptions {
        ConnectOptions::new().with_connect_timeout(Duration::from_secs(5))
    }

    /// Returns an endpoint on a port nobody listens on.
    async fn refused_endpoint() -> Endpoint {
        let listener = TcpListener::bind(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0))
            .await
            .expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        drop(listener);
        Endpoint::parse(&format!("ws://127.0.0.1:{port}/connect")).expect("endpoint")
    }

    #[test]
    fn test_state_display_and_terminal() {
        assert_eq!(ConnectionState::Connecting.to_string(), "connecting");
        assert_eq!(ConnectionState::Open.to_string(), "open");
        assert!(!ConnectionState::Open.is_terminal());
        assert!(ConnectionState::Closed.is_terminal());
        assert!(ConnectionState::Failed.is_terminal());
    }

    #[tokio::test]
    async fn test_connect_returns_while_connecting() {
        let server = RecordingServer::bind(Behavior::Record).await;
        let connection = Connection::connect(server.endpoint(), &options()).expect("connect");

        assert!(matches!(
            connection.state(),
            ConnectionState::Connecting | ConnectionState::Open
        ));
        assert_eq!(connection.endpoint(), &server.endpoint());

        assert_ok!(connection.wait_open().await);
        assert!(connection.is_open());
        connection.close().await;
    }

    #[tokio::test]
    async fn test_send_text_in_order() {
        let server = RecordingServer::bind(Behavior::Record).await;
        let connection = Connection::connect(server.endpoint(), &options()).expect("connect");
        connection.wait_open().await.expect("open");

        for text in ["a", "b", "c"] {
            assert_ok!(connection.send_text(text).await);
        }
        connection.close().await;

        let sessions = server.wait_until(|s| s.len() == 1 && s[0].ended).await;
        assert_eq!(sessions[0].frames, vec!["a", "b", "c"]);
        assert_eq!(sessions[0].closes, 1);
    }

    #[tokio::test]
    async fn test_send_before_open_fails() {
        let server = RecordingServer::bind(Behavior::Silent).await;
        let connection = Connection::connect(server.endpoint(), &options()).expect("connect");

        let err = connection.send_text("too early").await.unwrap_err();
        assert!(err.is_send_error());
        connection.close().await;
    }

    #[tokio::test]
    async fn test_refused_connection_fails() {
        let connection =
            Connection::connect(refused_endpoint().await, &options()).expect("connect");

        let err = connection.wait_open().await.unwrap_err();
        assert!(matches!(err, Error::Connection { .. }));
        assert_eq!(connection.state(), ConnectionState::Failed);

        // Every waiter sees the same failure.
        assert_err!(connection.wait_open().await);
        assert!(connection.send_text("x").await.unwrap_err().is_send_error());
    }

    #[tokio::test]
    async fn test_handshake_timeout() {
        let server = RecordingServer::bind(Behavior::Silent).await;
        let connection = Connection::connect(
            server.endpoint(),
            &ConnectOptions::new().with_connect_timeout(Duration::from_millis(100)),
        )
        .expect("connect");

        let err = connection.wait_open().await.unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(connection.state(), ConnectionState::Failed);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let server = RecordingServer::bind(Behavior::Record).await;
        let connection = Connection::connect(server.endpoint(), &options()).expect("connect");
        connection.wait_open().await.expect("open");

        connection.close().await;
        assert_eq!(connection.state(), ConnectionState::Closed);
        connection.close().await;
        assert_eq!(connection.state(), ConnectionState::Closed);

        let sessions = server.wait_until(|s| s.len() == 1 && s[0].ended).await;
        assert_eq!(sessions[0].closes, 1);
    }

    #[tokio::test]
    async fn test_close_while_connecting_cancels() {
        let server = RecordingServer::bind(Behavior::Silent).await;
        let connection = Connection::connect(server.endpoint(), &options()).expect("connect");

        connection.close().await;
        assert_eq!(connection.state(), ConnectionState::Closed);
        assert!(!connection.was_opened());
        assert!(matches!(
            connection.wait_open().await,
            Err(Error::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn test_remote_close_rejects_sends() {
        let server = RecordingServer::bind(Behavior::CloseImmediately).await;
        let connection = Connection::connect(server.endpoint(), &options()).expect("connect");
        connection.wait_open().await.expect("open");

        tokio::time::timeout(Duration::from_secs(5), connection.closed())
            .await
            .expect("remote close observed");
        assert_eq!(connection.state(), ConnectionState::Closed);

        let err = connection.send_text("late").await.unwrap_err();
        assert!(err.is_send_error());
    }

    #[tokio::test]
    async fn test_wait_open_after_remote_close_succeeds() {
        let server = RecordingServer::bind(Behavior::CloseImmediately).await;
        let connection = Connection::connect(server.endpoint(), &options()).expect("connect");

        // Observe the close before ever asking about the handshake.
        tokio::time::timeout(Duration::from_secs(5), connection.closed())
            .await
            .expect("remote close observed");
        assert_eq!(connection.state(), ConnectionState::Closed);
        assert!(connection.was_opened());

        assert_ok!(connection.wait_open().await);
        let err = connection.send_text("late").await.unwrap_err();
        assert!(err.is_send_error());
        assert!(!err.is_connection_error());
    }

    #[tokio::test]
    async fn test_zero_in_flight_is_config_error() {
        let server = RecordingServer::bind(Behavior::Record).await;
        let err = Connection::connect(server.endpoint(), &options().with_max_in_flight(0))
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_connect_outside_runtime_is_config_error() {
        let endpoint = Endpoint::parse("ws://127.0.0.1:1234/connect").expect("endpoint");
        let err = Connection::connect(endpoint, &options()).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("Tokio runtime"));
    }

    #[tokio::test]
    async fn test_incoming_frames_reach_handler() {
        let server = RecordingServer::bind(Behavior::Greet("Welcome, rate_test!")).await;
        let connection = Connection::connect(server.endpoint(), &options()).expect("connect");

        let (seen_tx, mut seen_rx) = mpsc::unbounded_channel();
        connection.set_message_handler(Box::new(move |text: &str| {
            let _ = seen_tx.send(text.to_owned());
        }));
        connection.wait_open().await.expect("open");

        let greeting = tokio::time::timeout(Duration::from_secs(5), seen_rx.recv())
            .await
            .expect("greeting in time");
        assert_eq!(greeting.as_deref(), Some("Welcome, rate_test!"));
        assert_eq!(connection.received_count(), 1);

        connection.clear_message_handler();
        connection.close().await;
    }

    #[tokio::test]
    async fn test_dropping_handle_closes_socket() {
        let server = RecordingServer::bind(Behavior::Record).await;
        let connection = Connection::connect(server.endpoint(), &options()).expect("connect");
        connection.wait_open().await.expect("open");
        assert_eq!(connection.pending_sends(), 0);

        drop(connection);

        let sessions = server.wait_until(|s| s.len() == 1 && s[0].ended).await;
        assert_eq!(sessions[0].closes, 1);
    }

    #[tokio::test]
    async fn test_ids_are_distinct() {
        let server = RecordingServer::bind(Behavior::Record).await;
        let a = Connection::connect(server.endpoint(), &options()).expect("connect");
        let b = Connection::connect(server.endpoint(), &options()).expect("connect");
        assert_ne!(a.id(), b.id());
        assert!(format!("{a:?}").contains("Connection"));
    }
}
