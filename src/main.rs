//! `wsrelay` binary: load settings, set up logging and serve until Ctrl-C.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use wsrelay::config::{CliArgs, load_config};
use wsrelay::transport::{shared_router, start_websocket_server};
use wsrelay::utils::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let settings = match load_config(&args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&settings.logging) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let router = shared_router();

    tokio::select! {
        result = start_websocket_server(&settings, router) => {
            if let Err(e) = result {
                error!("{e}");
                return ExitCode::FAILURE;
            }
            error!("WebSocket server exited unexpectedly.");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }

    ExitCode::SUCCESS
}
