//! Subscription registry
//!
//! Maps topic names to their subscribers and every subscribed connection
//! back to its topic. Both maps are kept consistent by every mutation:
//!
//! - a connection belongs to at most one topic;
//! - a topic is present only while it has at least one subscriber;
//! - `topic_of(c) == Some(t)` exactly when `c` is in `subscribers_of(t)`.
//!
//! The registry does no I/O and is not synchronized; the router that owns
//! it is held behind a lock by the transport.

use std::collections::{HashMap, HashSet};

use crate::broker::topic::{Topic, TopicName};
use crate::client::ConnectionId;

#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    topics: HashMap<TopicName, Topic>,
    memberships: HashMap<ConnectionId, TopicName>,
}

impl SubscriptionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `connection` to `topic`, creating the topic if needed.
    ///
    /// A connection subscribed elsewhere is moved: it leaves its previous
    /// topic first, and that topic is dropped if it becomes empty.
    /// Subscribing again to the current topic changes nothing.
    pub fn subscribe(&mut self, connection: ConnectionId, topic: impl Into<TopicName>) {
        let topic = topic.into();
        if self.topic_of(connection) == Some(&topic) {
            return;
        }
        self.unsubscribe(connection);

        self.topics
            .entry(topic.clone())
            .or_insert_with(|| Topic::new(topic.clone()))
            .subscribe(connection);
        self.memberships.insert(connection, topic);
    }

    /// Removes `connection` from its topic and returns that topic's name.
    /// Returns `None` if the connection was not subscribed.
    pub fn unsubscribe(&mut self, connection: ConnectionId) -> Option<TopicName> {
        let name = self.memberships.remove(&connection)?;

        if let Some(topic) = self.topics.get_mut(&name) {
            topic.unsubscribe(&connection);
            if topic.is_empty() {
                self.topics.remove(&name);
            }
        }

        Some(name)
    }

    /// Snapshot of the subscribers of `topic`; empty for unknown topics.
    pub fn subscribers_of(&self, topic: impl AsRef<[u8]>) -> HashSet<ConnectionId> {
        self.subscribers(topic.as_ref()).collect()
    }

    /// Borrowing iterator over the subscribers of `topic`.
    pub fn subscribers<'a>(&'a self, topic: &[u8]) -> impl Iterator<Item = ConnectionId> + 'a {
        self.topics
            .get(topic)
            .into_iter()
            .flat_map(|t| t.subscribers.iter().copied())
    }

    /// The topic `connection` currently subscribes to.
    pub fn topic_of(&self, connection: ConnectionId) -> Option<&TopicName> {
        self.memberships.get(&connection)
    }

    /// Names of all topics that currently have subscribers.
    pub fn topics(&self) -> impl Iterator<Item = &TopicName> + '_ {
        self.topics.keys()
    }

    /// Number of topics with at least one subscriber.
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}
