//! Connection lifecycle tracking
//!
//! Records the remote IP of every connection between its open and close
//! events. The tracker is a plain map owned by the router; it is never
//! shared on its own.

use std::collections::HashMap;

use super::ConnectionId;

#[derive(Debug, Default)]
pub struct LifecycleTracker {
    ips: HashMap<ConnectionId, String>,
}

impl LifecycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the remote IP of a freshly opened connection.
    pub fn on_open(&mut self, connection: ConnectionId, remote_ip: impl Into<String>) {
        self.ips.insert(connection, remote_ip.into());
    }

    /// Forget a closed connection, returning the IP recorded at open.
    pub fn on_close(&mut self, connection: ConnectionId) -> Option<String> {
        self.ips.remove(&connection)
    }

    pub fn ip_of(&self, connection: ConnectionId) -> Option<&str> {
        self.ips.get(&connection).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ips.is_empty()
    }
}
