use std::path::PathBuf;

use clap::Parser;

use super::validation::MAX_MESSAGE_SIZE_MB;

/// Command-line flags. Every flag overrides the same key from the
/// environment and the configuration file.
#[derive(Debug, Default, Parser)]
#[command(name = "wsrelay", version, about = "Topic-based WebSocket message relay")]
pub struct CliArgs {
    /// Port to listen on (default: 8765)
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// IP address to listen on (default: all interfaces)
    #[arg(short = 'i', long)]
    pub ip: Option<String>,

    /// Maximum message size in MB (default: 200)
    #[arg(
        short = 's',
        long = "max-message-size",
        value_parser = clap::value_parser!(u64).range(1..=MAX_MESSAGE_SIZE_MB)
    )]
    pub max_message_size: Option<u64>,

    /// File to append log lines to (default: stdout only)
    #[arg(short = 'l', long = "log-file")]
    pub log_file: Option<PathBuf>,

    /// Log level filter, e.g. "info" or "debug"
    #[arg(long = "log-level")]
    pub log_level: Option<String>,

    /// Configuration file with key=value lines
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,
}
