//! Loopback WebSocket server for tests.
//!
//! Binds `127.0.0.1:0`, accepts every connection and records what each
//! client sent, so tests can assert on exact frame sequences.

// ============================================================================
// Imports
// ============================================================================

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

use super::Endpoint;

// ============================================================================
// Constants
// ============================================================================

/// Upper bound for [`RecordingServer::wait_until`].
const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Poll interval for [`RecordingServer::wait_until`].
const POLL_INTERVAL: Duration = Duration::from_millis(10);

// ============================================================================
// Types
// ============================================================================

/// How the server treats accepted connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Behavior {
    /// Complete the handshake and record frames.
    Record,
    /// Like `Record`, but send one text frame right after the handshake.
    Greet(&'static str),
    /// Complete the handshake, then send a Close frame.
    CloseImmediately,
    /// Accept TCP but never answer the handshake.
    Silent,
}

/// What one client did, in accept order.
#[derive(Debug, Clone, Default)]
pub(crate) struct Session {
    /// Text frames in arrival order.
    pub(crate) frames: Vec<String>,
    /// Close frames received.
    pub(crate) closes: usize,
    /// The socket is gone.
    pub(crate) ended: bool,
}

type Sessions = Arc<Mutex<Vec<Session>>>;

// ============================================================================
// RecordingServer
// ============================================================================

/// WebSocket server that records every session.
pub(crate) struct RecordingServer {
    port: u16,
    sessions: Sessions,
    accept_task: JoinHandle<()>,
}

impl RecordingServer {
    /// Binds to a random localhost port and starts accepting.
    pub(crate) async fn bind(behavior: Behavior) -> Self {
        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0);
        let listener = TcpListener::bind(addr).await.expect("bind loopback");
        let port = listener.local_addr().expect("local addr").port();
        let sessions = Sessions::default();

        let accept_task = tokio::spawn(Self::accept_loop(
            listener,
            behavior,
            Arc::clone(&sessions),
        ));

        Self {
            port,
            sessions,
            accept_task,
        }
    }

    /// Returns `ws://127.0.0.1:{port}/connect`.
    pub(crate) fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}/connect", self.port)
    }

    /// Returns the server address as an endpoint.
    pub(crate) fn endpoint(&self) -> Endpoint {
        Endpoint::parse(&self.ws_url()).expect("loopback endpoint")
    }

    /// Returns a snapshot of all sessions.
    pub(crate) fn sessions(&self) -> Vec<Session> {
        self.sessions.lock().clone()
    }

    /// Polls until `condition` holds, then returns the sessions.
    ///
    /// Panics after five seconds.
    pub(crate) async fn wait_until(&self, condition: impl Fn(&[Session]) -> bool) -> Vec<Session> {
        let poll = async {
            loop {
                {
                    let sessions = self.sessions.lock();
                    if condition(&sessions) {
                        return sessions.clone();
                    }
                }
                sleep(POLL_INTERVAL).await;
            }
        };

        match timeout(WAIT_TIMEOUT, poll).await {
            Ok(sessions) => sessions,
            Err(_) => panic!("server condition not reached: {:?}", self.sessions()),
        }
    }

    async fn accept_loop(listener: TcpListener, behavior: Behavior, sessions: Sessions) {
        // Silent sockets are parked here so they stay open.
        let mut parked = Vec::new();

        while let Ok((stream, _addr)) = listener.accept().await {
            if behavior == Behavior::Silent {
                parked.push(stream);
                continue;
            }

            let index = {
                let mut sessions = sessions.lock();
                sessions.push(Session::default());
                sessions.len() - 1
            };
            tokio::spawn(Self::serve(stream, index, behavior, Arc::clone(&sessions)));
        }
    }

    async fn serve(stream: TcpStream, index: usize, behavior: Behavior, sessions: Sessions) {
        let Ok(mut ws_stream) = accept_async(stream).await else {
            sessions.lock()[index].ended = true;
            return;
        };

        match behavior {
            Behavior::Greet(text) => {
                let _ = ws_stream.send(Message::Text(text.into())).await;
            }
            Behavior::CloseImmediately => {
                let _ = ws_stream.send(Message::Close(None)).await;
            }
            Behavior::Record | Behavior::Silent => {}
        }

        while let Some(Ok(message)) = ws_stream.next().await {
            let mut sessions = sessions.lock();
            match message {
                Message::Text(text) => sessions[index].frames.push(text.as_str().to_owned()),
                Message::Close(_) => sessions[index].closes += 1,
                _ => {}
            }
        }

        sessions.lock()[index].ended = true;
    }
}

impl Drop for RecordingServer {
    fn drop(&mut self) {
        self.accept_task.abort();
    }
}
