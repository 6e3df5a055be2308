//! Relay core
//!
//! The broker contains the relay's bookkeeping and routing:
//!
//! - `registry`: which connection subscribes to which topic, and back.
//! - `topic`: the subscriber set of one topic.
//! - `message`: payload kinds and the forward-payload carried by a publish.
//! - `router`: the event handler driving the registry, the lifecycle tracker
//!   and the outbound transport.

pub mod message;
pub mod registry;
pub mod router;
pub mod topic;

pub use message::{ForwardPayload, PayloadKind};
pub use registry::SubscriptionRegistry;
pub use router::{ConnectionHandler, Routed, Router};
pub use topic::TopicName;
