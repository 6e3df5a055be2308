//! Topic management
//!
//! A `Topic` holds the set of connections subscribed to one topic name.
//! Subscriptions are stored as a `HashSet` of `ConnectionId`, so duplicate
//! subscriptions are a no-op.
//!
//! Topic names are the exact bytes a client sent. Binary frames may carry
//! names that are not UTF-8, and two such names are only the same topic when
//! their bytes are equal; text is only produced when a name is displayed.
//!
//! Topics are only ever reached through `SubscriptionRegistry`, which
//! removes a topic as soon as its last subscriber leaves.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use bytes::Bytes;

use crate::client::ConnectionId;

/// The raw name of a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicName(Bytes);

impl TopicName {
    /// Wraps the bytes following a command prefix.
    pub fn new(name: Bytes) -> Self {
        Self(name)
    }

    /// The name exactly as received.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

// Hashes like `[u8]` so maps keyed by `TopicName` can be queried by slice.
impl Hash for TopicName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl Borrow<[u8]> for TopicName {
    fn borrow(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for TopicName {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Bytes> for TopicName {
    fn from(name: Bytes) -> Self {
        Self(name)
    }
}

impl From<&str> for TopicName {
    fn from(name: &str) -> Self {
        Self(Bytes::copy_from_slice(name.as_bytes()))
    }
}

impl From<&[u8]> for TopicName {
    fn from(name: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(name))
    }
}

impl PartialEq<str> for TopicName {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for TopicName {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

/// Lossy rendering for log lines.
impl fmt::Display for TopicName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

#[derive(Debug)]
pub struct Topic {
    pub name: TopicName,
    pub subscribers: HashSet<ConnectionId>,
}

impl Topic {
    /// Create a new topic with the given name.
    pub fn new(name: impl Into<TopicName>) -> Self {
        Self {
            name: name.into(),
            subscribers: HashSet::new(),
        }
    }

    /// Add a subscriber to the topic. Duplicate adds are ignored.
    pub fn subscribe(&mut self, id: ConnectionId) {
        self.subscribers.insert(id);
    }

    /// Remove a subscriber from the topic.
    pub fn unsubscribe(&mut self, id: &ConnectionId) {
        self.subscribers.remove(id);
    }

    /// True once the last subscriber has left.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
