//! Validation of merged configuration values.

use std::fs;
use std::net::IpAddr;
use std::path::Path;

use crate::utils::error::{RelayError, Result};

/// Upper bound for `max_message_size`, in MB.
pub const MAX_MESSAGE_SIZE_MB: u64 = 1024;

const WRITE_PROBE: &str = ".wsrelay_write_probe";

pub fn parse_ip(raw: &str) -> Result<IpAddr> {
    raw.trim()
        .parse()
        .map_err(|_| RelayError::invalid_setting("ip", format!("not an IP address: {raw}")))
}

pub fn check_message_size(mb: u64) -> Result<u64> {
    if (1..=MAX_MESSAGE_SIZE_MB).contains(&mb) {
        Ok(mb)
    } else {
        Err(RelayError::invalid_setting(
            "max_message_size",
            format!("{mb} MB is outside 1-{MAX_MESSAGE_SIZE_MB} MB"),
        ))
    }
}

/// Checks that a file can be created next to `log_file`.
pub fn check_log_dir_writable(log_file: &Path) -> Result<()> {
    let dir = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let probe = dir.join(WRITE_PROBE);
    fs::File::create(&probe)
        .map_err(|e| RelayError::io("log directory is not writable", dir, e))?;
    let _ = fs::remove_file(&probe);
    Ok(())
}
