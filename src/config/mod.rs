mod cli;
mod settings;
mod validation;

use std::path::PathBuf;

use config::{Config, Environment, File, FileFormat};

use crate::utils::error::Result;
use settings::PartialSettings;

pub use cli::CliArgs;
pub use settings::{LoggingSettings, ServerSettings, Settings, TransportSettings};
pub use validation::MAX_MESSAGE_SIZE_MB;

/// Configuration file read when `--config` is not given. It may be absent.
pub const DEFAULT_CONFIG_FILE: &str = "/etc/websocket_server/websocket_server.conf";

/// Prefix of environment overrides, e.g. `WSRELAY_PORT=9000`.
pub const ENV_PREFIX: &str = "WSRELAY";

/// Loads the configuration from the config file, the environment and the
/// command line, in increasing order of precedence.
/// Missing keys fall back to `Settings::default()`; the merged result is
/// validated before it is returned.
pub fn load_config(args: &CliArgs) -> Result<Settings> {
    let (path, required) = match &args.config {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let builder = Config::builder()
        .add_source(File::from(path).format(FileFormat::Ini).required(required))
        .add_source(Environment::with_prefix(ENV_PREFIX))
        .set_override_option("ip", args.ip.clone())?
        .set_override_option("port", args.port.map(i64::from))?
        .set_override_option(
            "max_message_size",
            args.max_message_size.and_then(|mb| i64::try_from(mb).ok()),
        )?
        .set_override_option(
            "log_file",
            args.log_file.as_ref().map(|p| p.display().to_string()),
        )?
        .set_override_option("log_level", args.log_level.clone())?;

    let config = builder.build()?;
    let partial: PartialSettings = config.try_deserialize()?;

    merge_with_defaults(partial)
}

fn merge_with_defaults(partial: PartialSettings) -> Result<Settings> {
    let default = Settings::default();

    let ip = match partial.ip.as_deref() {
        Some(raw) => validation::parse_ip(raw)?,
        None => default.server.ip,
    };
    let max_message_size_mb = validation::check_message_size(
        partial
            .max_message_size
            .unwrap_or(default.transport.max_message_size_mb),
    )?;
    let file = partial.log_file.or(default.logging.file);
    if let Some(path) = &file {
        validation::check_log_dir_writable(path)?;
    }

    Ok(Settings {
        server: ServerSettings {
            ip,
            port: partial.port.unwrap_or(default.server.port),
        },
        transport: TransportSettings {
            max_message_size_mb,
        },
        logging: LoggingSettings {
            file,
            level: partial.log_level.unwrap_or(default.logging.level),
        },
    })
}
