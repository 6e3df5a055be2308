//! Wire format of inbound payloads.
//!
//! A payload is classified by its literal prefix:
//!
//! - `subscribe:<topic>`, where the topic is everything after the prefix;
//! - `message:<topic>:<forward-payload>`, where the topic stops at the first
//!   `:` after the prefix;
//! - anything else is not a command and is ignored by the router.

use bytes::Bytes;

use crate::broker::message::ForwardPayload;
use crate::broker::topic::TopicName;

const SUBSCRIBE_PREFIX: &[u8] = b"subscribe:";
const PUBLISH_PREFIX: &[u8] = b"message:";

#[derive(Debug, PartialEq, Eq)]
pub enum ClientMessage {
    Subscribe {
        topic: TopicName,
    },
    Publish {
        topic: TopicName,
        payload: ForwardPayload,
    },
    /// No known prefix, an empty subscribe topic, or a publish with no `:`
    /// after its topic.
    Unrecognized,
}

impl ClientMessage {
    /// Classifies `payload` by its prefix. Topic and forward-payload are
    /// slices of `payload`, not copies.
    pub fn parse(payload: Bytes) -> Self {
        if let Some(topic) = payload.strip_prefix(SUBSCRIBE_PREFIX) {
            if topic.is_empty() {
                return Self::Unrecognized;
            }
            return Self::Subscribe {
                topic: TopicName::new(payload.slice(SUBSCRIBE_PREFIX.len()..)),
            };
        }

        if payload.starts_with(PUBLISH_PREFIX) {
            let rest = payload.slice(PUBLISH_PREFIX.len()..);
            return match rest.iter().position(|&b| b == b':') {
                Some(end) => Self::Publish {
                    topic: TopicName::new(rest.slice(..end)),
                    payload: ForwardPayload::new(rest.slice(end + 1..)),
                },
                None => Self::Unrecognized,
            };
        }

        Self::Unrecognized
    }
}
