use std::fmt;
use std::net::IpAddr;

use tokio::sync::mpsc::UnboundedSender;
use tungstenite::protocol::Message as WsMessage;
use uuid::Uuid;

/// Stable identity of one accepted connection.
///
/// Identity is all the relay needs: two ids are equal only if they were
/// produced by the same call to [`ConnectionId::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "client-{}", self.0)
    }
}

/// Represents a connected WebSocket client on the transport side.
///
/// The relay core never sees this type; it only knows the `id`. The
/// transport uses it to answer address lookups and to queue outbound frames.
#[derive(Debug)]
pub struct Client {
    /// Unique identifier for the connection.
    pub id: ConnectionId,

    /// Remote address as read from the socket, if it could be read.
    pub remote_ip: Option<IpAddr>,

    /// Channel to send WebSocket messages to the client.
    pub sender: UnboundedSender<WsMessage>,
}

impl Client {
    pub fn new(sender: UnboundedSender<WsMessage>, remote_ip: Option<IpAddr>) -> Self {
        Self {
            id: ConnectionId::new(),
            remote_ip,
            sender,
        }
    }
}
