//! Message router
//!
//! The router is the relay core. It receives the open, message and close
//! events of every connection through [`ConnectionHandler`], keeps the
//! subscription registry and the lifecycle tracker up to date, and forwards
//! publishes through the [`Transport`] it was built with.
//!
//! Concurrency and usage notes:
//! - The API is synchronous and expects one event at a time. The WebSocket
//!   transport holds the router behind a single mutex.
//! - `Transport::send` must not block; the WebSocket transport only pushes
//!   onto an unbounded per-connection queue.
//! - Nothing here fails: bad input is logged or ignored and the connection
//!   stays open.

use bytes::Bytes;
use tracing::{error, info, warn};

use crate::broker::message::{ForwardPayload, PayloadKind};
use crate::broker::registry::SubscriptionRegistry;
use crate::broker::topic::TopicName;
use crate::client::{ConnectionId, LifecycleTracker};
use crate::transport::Transport;
use crate::transport::message::ClientMessage;

const UNKNOWN_IP: &str = "unknown";

/// Callbacks a transport invokes over the life of each connection.
pub trait ConnectionHandler {
    fn on_open(&mut self, connection: ConnectionId);

    fn on_message(&mut self, connection: ConnectionId, payload: Bytes, kind: PayloadKind);

    fn on_close(&mut self, connection: ConnectionId);
}

/// What the router did with one inbound payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    /// The sender now subscribes to `topic`.
    Subscribed { topic: TopicName },
    /// A well-formed publish was fanned out.
    Forwarded {
        topic: TopicName,
        delivered: usize,
        failed: usize,
    },
    /// A publish whose forward-payload lacks the MIME/filename separators.
    Malformed { topic: TopicName },
    /// Unknown prefix, or a publish without a topic delimiter.
    Ignored,
}

#[derive(Debug)]
pub struct Router<T> {
    registry: SubscriptionRegistry,
    tracker: LifecycleTracker,
    transport: T,
}

impl<T: Transport> Router<T> {
    /// Creates a router with no subscriptions that sends through `transport`.
    pub fn new(transport: T) -> Self {
        Self {
            registry: SubscriptionRegistry::new(),
            tracker: LifecycleTracker::new(),
            transport,
        }
    }

    /// Current subscriptions.
    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.registry
    }

    /// Remote IPs of the open connections.
    pub fn tracker(&self) -> &LifecycleTracker {
        &self.tracker
    }

    /// The outbound transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the transport, used to attach and detach peers.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Classifies `payload` and applies it on behalf of `sender`.
    pub fn route(&mut self, sender: ConnectionId, payload: Bytes, kind: PayloadKind) -> Routed {
        match ClientMessage::parse(payload) {
            ClientMessage::Subscribe { topic } => {
                self.registry.subscribe(sender, topic.clone());
                info!("Client subscribed to topic [{topic}]");
                Routed::Subscribed { topic }
            }
            ClientMessage::Publish { topic, payload } => self.publish(sender, topic, payload, kind),
            ClientMessage::Unrecognized => Routed::Ignored,
        }
    }

    fn publish(
        &self,
        sender: ConnectionId,
        topic: TopicName,
        payload: ForwardPayload,
        kind: PayloadKind,
    ) -> Routed {
        let Some(header) = payload.header() else {
            warn!("Message received on topic [{topic}]: Invalid format");
            return Routed::Malformed { topic };
        };

        let ip = self.tracker.ip_of(sender).unwrap_or(UNKNOWN_IP);
        info!(
            "Message received from IP [{ip}] on topic [{topic}]: MIME: {}, File: {}",
            header.mime_type, header.filename
        );

        let mut delivered = 0;
        let mut failed = 0;
        for target in self.registry.subscribers(topic.as_bytes()).filter(|c| *c != sender) {
            match self.transport.send(target, payload.as_bytes().clone(), kind) {
                Ok(()) => {
                    delivered += 1;
                    info!("Message forwarded on topic [{topic}]");
                }
                Err(e) => {
                    failed += 1;
                    error!("Error forwarding message: {e}");
                }
            }
        }

        Routed::Forwarded {
            topic,
            delivered,
            failed,
        }
    }
}

impl<T: Transport> ConnectionHandler for Router<T> {
    fn on_open(&mut self, connection: ConnectionId) {
        match self.transport.remote_address(connection) {
            Ok(ip) => {
                info!("Connection opened from IP: {ip}");
                self.tracker.on_open(connection, ip);
            }
            Err(e) => {
                error!("Error getting connection: {e}");
            }
        }
    }

    fn on_message(&mut self, connection: ConnectionId, payload: Bytes, kind: PayloadKind) {
        self.route(connection, payload, kind);
    }

    fn on_close(&mut self, connection: ConnectionId) {
        match self.tracker.on_close(connection) {
            Some(ip) => info!("Connection closed from IP: {ip}"),
            None => info!("Connection closed from unknown IP"),
        }
        self.registry.unsubscribe(connection);
    }
}
