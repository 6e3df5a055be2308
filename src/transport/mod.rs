//! The `transport` module is responsible for network communication with
//! clients over WebSockets.
//!
//! It defines the text protocol spoken by clients (`message`), the
//! outbound capability the router forwards through (`Transport`), the table
//! of live peers implementing it (`peers`), and the WebSocket server that
//! accepts connections and feeds their events to the router (`websocket`).

pub mod message;
pub mod peers;
pub mod websocket;

use bytes::Bytes;

use crate::broker::PayloadKind;
use crate::client::ConnectionId;
use crate::utils::error::TransportError;

pub use message::ClientMessage;
pub use peers::PeerTable;
pub use websocket::{SharedRouter, serve, shared_router, start_websocket_server};

/// Outbound side of a transport, as seen by the router.
pub trait Transport {
    /// Remote IP of `connection`, as text.
    fn remote_address(&self, connection: ConnectionId) -> Result<String, TransportError>;

    /// Queues `payload` for delivery to `connection` as a frame of `kind`.
    ///
    /// Must not block. Errors are reported for this send only.
    fn send(
        &self,
        connection: ConnectionId,
        payload: Bytes,
        kind: PayloadKind,
    ) -> Result<(), TransportError>;
}

#[cfg(test)]
mod tests;
#[cfg(test)]
mod websocket_tests;
