//! Logging Setup
//!
//! Shared `tracing-subscriber` initialisation for the exporter binaries.

use crate::error::{Error, Result};
use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Dependencies whose logs are capped below the requested level
const NOISE_DIRECTIVES: [&str; 4] = ["hyper=warn", "kube=info", "tower=warn", "axum=info"];

/// Parse a level name, falling back to `info`
pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Build the filter from `RUST_LOG`, the requested level and the noise caps
pub fn env_filter(level: &str) -> Result<EnvFilter> {
    let mut filter = EnvFilter::from_default_env().add_directive(parse_level(level).into());
    for directive in NOISE_DIRECTIVES {
        let directive: Directive = directive
            .parse()
            .map_err(|e| Error::Configuration(format!("Invalid log directive {}: {}", directive, e)))?;
        filter = filter.add_directive(directive);
    }
    Ok(filter)
}

/// Install the global subscriber
pub fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = env_filter(level)?;

    let installed = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init()
    };

    installed.map_err(|e| Error::Configuration(format!("Failed to initialise logging: {}", e)))
}
