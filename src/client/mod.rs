//! The `client` module defines how a connection is represented.
//!
//! It provides `ConnectionId`, the identity the relay core works with,
//! `Client`, the transport-side handle holding a connection's outbound
//! channel, and `LifecycleTracker`, which remembers each connection's remote
//! IP from open to close.

pub mod connection;
pub mod tracker;

pub use connection::{Client, ConnectionId};
pub use tracker::LifecycleTracker;
