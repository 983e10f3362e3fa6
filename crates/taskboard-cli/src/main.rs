//! Taskboard CLI entry point.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use taskboard_core::config::{AppConfig, LogFormat, LoggingConfig};

mod commands;
mod output;
mod password;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            output::print_error(&format!("Could not load {}: {e}", cli.config));
            std::process::exit(2);
        }
    };
    init_logging(&config.logging);

    if let Err(e) = cli.execute(&config).await {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins over the configured level.
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Json => fmt().json().with_env_filter(filter).with_target(true).init(),
        LogFormat::Pretty => fmt().with_env_filter(filter).with_target(false).init(),
    }
}
