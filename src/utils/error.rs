//! The `error` module defines the error types used within `wsrelay`.
//!
//! Two families exist. `TransportError` is what the outbound side of a
//! transport reports to the router; the router logs it and carries on.
//! `RelayError` covers process startup (configuration, logging, binding) and
//! is the only error that ever reaches `main`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::client::ConnectionId;

/// Result type for startup operations.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Errors reported by a `Transport` when the router asks it to do something
/// for a connection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The connection is not (or no longer) known to the transport.
    #[error("unknown connection {0}")]
    UnknownConnection(ConnectionId),

    /// The remote endpoint of the connection could not be determined.
    #[error("remote address unavailable for {0}")]
    AddressUnavailable(ConnectionId),

    /// The connection is closing and its outbound queue is gone.
    #[error("connection {0} is closed")]
    Closed(ConnectionId),

    /// A text payload did not hold valid UTF-8.
    #[error("text payload for {0} is not valid UTF-8")]
    InvalidText(ConnectionId),
}

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The configuration sources could not be read or merged.
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    /// A configuration value was read but is not acceptable.
    #[error("invalid {key}: {message}")]
    InvalidSetting {
        /// Configuration key
        key: &'static str,
        /// Why the value was rejected
        message: String,
    },

    /// A file-system operation failed.
    #[error("{context} '{}': {source}", .path.display())]
    Io {
        /// What was being attempted
        context: &'static str,
        /// Path involved
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The listening socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// A global tracing subscriber was already installed.
    #[error("failed to initialise logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}

impl RelayError {
    /// Create an InvalidSetting error
    pub fn invalid_setting(key: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidSetting {
            key,
            message: message.into(),
        }
    }

    /// Create an Io error
    pub fn io(context: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            context,
            path: path.into(),
            source,
        }
    }
}
