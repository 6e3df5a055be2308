//! Tracing initialisation and the audit line format.
//!
//! Every event is rendered as a single line:
//!
//! ```text
//! Oct 18 14:02:11 websocket_server: Client subscribed to topic [news]
//! ```
//!
//! Lines always go to stdout and are additionally appended to the log file
//! when one is configured.

use std::fmt;
use std::fs::OpenOptions;
use std::sync::Arc;

use chrono::Local;
use tracing::{Event, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingSettings;
use crate::utils::error::{RelayError, Result};

/// Program name written after the timestamp of every line.
pub const PROGRAM_NAME: &str = "websocket_server";

const TIMESTAMP_FORMAT: &str = "%b %d %H:%M:%S";

/// Event formatter producing `<timestamp> <program>: <message>`.
#[derive(Debug, Clone)]
pub struct AuditLine {
    program: &'static str,
}

impl AuditLine {
    pub fn new(program: &'static str) -> Self {
        Self { program }
    }
}

impl Default for AuditLine {
    fn default() -> Self {
        Self::new(PROGRAM_NAME)
    }
}

impl<S, N> FormatEvent<S, N> for AuditLine
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "{} {}: ",
            Local::now().format(TIMESTAMP_FORMAT),
            self.program
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Initialize tracing/logging for the application.
///
/// `RUST_LOG` wins over the configured level when it is set.
pub fn init(settings: &LoggingSettings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match &settings.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| RelayError::io("failed to open log file", path, e))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .event_format(AuditLine::default())
                    .with_writer(Arc::new(file)),
            )
        }
        None => None,
    };

    let console_layer = tracing_subscriber::fmt::layer().event_format(AuditLine::default());

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}
