use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use serde::Deserialize;

const MIB: u64 = 1024 * 1024;

/// Top-level configuration settings for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server: ServerSettings,
    pub transport: TransportSettings,
    pub logging: LoggingSettings,
}

/// Where the server listens.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub ip: IpAddr,
    pub port: u16,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port)
    }
}

/// Limits enforced by the WebSocket transport.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportSettings {
    pub max_message_size_mb: u64,
}

impl TransportSettings {
    pub fn max_message_bytes(&self) -> usize {
        usize::try_from(self.max_message_size_mb.saturating_mul(MIB)).unwrap_or(usize::MAX)
    }
}

/// Log destination and verbosity.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// File the audit lines are appended to, in addition to stdout.
    pub file: Option<PathBuf>,
    pub level: String,
}

/// Settings as read from the merged sources, before defaults and
/// validation.
///
/// Keys are flat so that a plain `key=value` file maps onto them directly.
#[derive(Debug, Default, Deserialize)]
pub struct PartialSettings {
    pub ip: Option<String>,
    pub port: Option<u16>,
    /// In MB.
    pub max_message_size: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Provides default values for `Settings`.
///
/// Listen on every interface at port 8765, accept messages up to 200 MB
/// and log to stdout only.
impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                port: 8765,
            },
            transport: TransportSettings {
                max_message_size_mb: 200,
            },
            logging: LoggingSettings {
                file: None,
                level: "info".to_string(),
            },
        }
    }
}
