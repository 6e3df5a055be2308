//! Payload definitions for the relay
//!
//! A publish carries a forward-payload of the form
//! `<mime-type>:<filename>:<raw-data>`. The relay never rewrites it: the
//! exact bytes received after the topic are what subscribers get, with the
//! same frame kind (text or binary) the publisher used.

use std::borrow::Cow;

use bytes::Bytes;

/// Encoding of a frame as it arrived from the publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Text,
    Binary,
}

/// The bytes of a publish that follow `message:<topic>:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardPayload {
    data: Bytes,
}

/// MIME type and filename read from the front of a forward-payload.
///
/// Used for logging only. Non UTF-8 bytes are replaced.
#[derive(Debug, PartialEq, Eq)]
pub struct PayloadHeader<'a> {
    pub mime_type: Cow<'a, str>,
    pub filename: Cow<'a, str>,
}

impl ForwardPayload {
    pub fn new(data: Bytes) -> Self {
        Self { data }
    }

    /// Extracts the MIME type and filename.
    ///
    /// Returns `None` when the payload holds fewer than two `:` separators,
    /// which makes the publish malformed.
    pub fn header(&self) -> Option<PayloadHeader<'_>> {
        let mut parts = self.data.splitn(3, |&b| b == b':');
        let mime_type = parts.next()?;
        let filename = parts.next()?;
        // The raw data may be empty, but its separator must be present.
        parts.next()?;

        Some(PayloadHeader {
            mime_type: String::from_utf8_lossy(mime_type),
            filename: String::from_utf8_lossy(filename),
        })
    }

    pub fn as_bytes(&self) -> &Bytes {
        &self.data
    }
}
