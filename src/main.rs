use anyhow::Result;
use std::process::ExitCode;
use textgen_rust::{
    config,
    service::{self, ServiceLoop},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Configuration problems are initialization failures: answer with the
    // fatal line on stdout like a model that failed to load.
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            let termination = ServiceLoop::stdio().abort(e).await?;
            return Ok(ExitCode::from(termination.exit_code()));
        }
    };

    // Determine log level: environment variable overrides config
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.logs.level.clone());

    let level = match config::validate_log_level(&log_level) {
        Ok(level) => level,
        Err(e) => {
            let termination = ServiceLoop::stdio().abort(e).await?;
            return Ok(ExitCode::from(termination.exit_code()));
        }
    };

    // stdout carries the protocol; everything else goes to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::default().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!(
        "Starting text generation service with log level: {}",
        log_level
    );
    info!("Using model {}", config.generator.model);

    let termination = service::run(config).await?;

    Ok(ExitCode::from(termination.exit_code()))
}
