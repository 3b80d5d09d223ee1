//! Transport layer for Wyrmgate.
//!
//! The admission and session layers never touch sockets directly; they see
//! the [`Connection`] trait: bytes in, bytes out, close. That keeps the
//! admission protocol testable with channel-backed fakes and leaves the door
//! open for transports other than WebSocket.
//!
//! # Feature flags
//!
//! - `websocket` (default) — WebSocket listener via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod ws;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use ws::{WebSocketConnection, WebSocketListener};

use std::fmt;

/// Opaque identifier for one accepted connection, for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A single connection that can send and receive byte frames.
pub trait Connection: Send + Sync + 'static {
    /// Sends one frame to the remote peer.
    async fn send(&self, data: &[u8]) -> Result<(), TransportError>;

    /// Receives the next frame from the remote peer.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    async fn recv(&self) -> Result<Option<Vec<u8>>, TransportError>;

    /// Closes the connection.
    async fn close(&self) -> Result<(), TransportError>;

    /// Returns this connection's identifier.
    fn id(&self) -> ConnectionId;
}
