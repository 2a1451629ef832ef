#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::doc_markdown)]
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # Physlab
//!
//! Command-line front end for the [`kinematics`] simulators and the
//! [`scoreboard`] quiz store.
//!
//! The binary is a thin wrapper around [`run`]; everything else lives here
//! so it can be tested without spawning a process.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;

use tracing::debug;

pub use cli::{Cli, Command};
pub use commands::{Format, execute};
pub use config::{Config, ConfigError};

/// Resolves configuration, installs logging, runs the command, and prints
/// its output to stdout.
///
/// # Errors
///
/// Returns configuration errors and whatever the command reports.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_cli(&cli)?;
    logging::init(config.verbosity);
    debug!(config = %config.to_diagnostic_string(), "Configuration resolved");

    let format = if cli.json { Format::Json } else { Format::Text };
    let output = execute(&cli.command, &config, format).await?;
    print!("{output}");
    if format == Format::Json {
        println!();
    }
    Ok(())
}
