//! # Sprig CLI Entry Point
//!
//! Parses arguments, sets up tracing, runs the command, and turns the outcome
//! into a process exit code.

use std::process::ExitCode;

use anyhow::Error;
use clap::Parser;
use sprig_cli::cli::{Cli, handle_cli};
use sprig_core::SprigError;
use sprig_core::output::print_error;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> ExitCode {
  let cmd = Cli::parse();

  let level = match cmd.verbose {
    0 => tracing::Level::WARN,  // Default: warnings and errors
    1 => tracing::Level::INFO,  // -v: step transitions
    2 => tracing::Level::DEBUG, // -vv: every spawned command
    _ => tracing::Level::TRACE, // -vvv: captured output too
  };

  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(EnvFilter::from_default_env().add_directive(level.into()))
    .init();

  debug!("Tracing initialized with level: {}", level);

  match handle_cli(cmd) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => report(&err),
  }
}

/// Print `err` and pick the exit code for its kind.
fn report(err: &Error) -> ExitCode {
  match err.downcast_ref::<SprigError>() {
    Some(sprig_err) => {
      sprig_err.display();
      ExitCode::from(u8::try_from(sprig_err.exit_code()).unwrap_or(1))
    }
    None => {
      print_error(&format!("{err:#}"));
      ExitCode::FAILURE
    }
  }
}
