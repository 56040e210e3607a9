//! Command layer and CLI of the podboard portal.
//!
//! [`run`] wires logging, configuration and the local database together,
//! then hands the parsed command to [`cli::execute`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod state;

use std::process::ExitCode;
use std::rc::Rc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use podboard_store::{Database, KeyValueStore};

use crate::cli::Cli;
use crate::config::ClientConfig;
use crate::error::CommandError;
use crate::state::AppState;

/// Exit status for input the user can correct and retry.
const EXIT_USER_ERROR: u8 = 2;

pub fn run() -> anyhow::Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("podboard_client_lib=info,podboard_store=info,warn")
    });

    // stdout carries command output, so logs go to stderr.
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = Some(dir);
    }
    tracing::debug!(?config, "loaded configuration");

    let db = match &config.data_dir {
        Some(dir) => Database::open_in_dir(dir),
        None => Database::new(),
    }
    .context("failed to open the local database")?;
    tracing::debug!(path = ?db.path(), "database opened");

    let store: Rc<dyn KeyValueStore> = Rc::new(db);
    let mut state = AppState::open(store, &config)?;

    let mut stdout = std::io::stdout().lock();
    let result = cli::execute(&mut state, cli.command, cli.json, &mut stdout);
    let status = finish(result, &mut std::io::stderr())?;
    Ok(ExitCode::from(status))
}

/// Turn a command result into an exit status. Mistakes in the input get a
/// one-line message and [`EXIT_USER_ERROR`]; anything else is passed up with
/// its full error chain.
fn finish(
    result: Result<(), CommandError>,
    stderr: &mut impl std::io::Write,
) -> anyhow::Result<u8> {
    match result {
        Ok(()) => Ok(0),
        Err(e) if e.is_user_error() => {
            tracing::debug!(error = %e, "command rejected");
            writeln!(stderr, "error: {e}")?;
            Ok(EXIT_USER_ERROR)
        }
        Err(e) => Err(e.into()),
    }
}
