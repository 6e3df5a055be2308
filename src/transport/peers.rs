use std::collections::HashMap;

use bytes::Bytes;
use tungstenite::protocol::frame::Utf8Bytes;
use tungstenite::protocol::Message as WsMessage;

use crate::broker::PayloadKind;
use crate::client::{Client, ConnectionId};
use crate::transport::Transport;
use crate::utils::error::TransportError;

/// Live WebSocket connections, keyed by id.
///
/// Sending only enqueues onto the client's unbounded channel; the
/// connection's writer task does the socket I/O.
#[derive(Debug, Default)]
pub struct PeerTable {
    clients: HashMap<ConnectionId, Client>,
}

impl PeerTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection whose handshake completed.
    pub fn attach(&mut self, client: Client) {
        self.clients.insert(client.id, client);
    }

    /// Drops the client's sender, which ends its writer task once the
    /// queue is drained.
    pub fn detach(&mut self, id: ConnectionId) -> Option<Client> {
        self.clients.remove(&id)
    }

    /// Number of attached connections.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl Transport for PeerTable {
    fn remote_address(&self, connection: ConnectionId) -> Result<String, TransportError> {
        let client = self
            .clients
            .get(&connection)
            .ok_or(TransportError::UnknownConnection(connection))?;
        client
            .remote_ip
            .map(|ip| ip.to_string())
            .ok_or(TransportError::AddressUnavailable(connection))
    }

    fn send(
        &self,
        connection: ConnectionId,
        payload: Bytes,
        kind: PayloadKind,
    ) -> Result<(), TransportError> {
        let client = self
            .clients
            .get(&connection)
            .ok_or(TransportError::UnknownConnection(connection))?;

        let frame = match kind {
            PayloadKind::Text => Utf8Bytes::try_from(payload)
                .map(WsMessage::Text)
                .map_err(|_| TransportError::InvalidText(connection))?,
            PayloadKind::Binary => WsMessage::Binary(payload),
        };

        client
            .sender
            .send(frame)
            .map_err(|_| TransportError::Closed(connection))
    }
}
