//! todo - a single-user to-do list CLI
//!
//! Mocked sign-in plus task add/edit/complete/filter, all persisted in a
//! local data directory.

use clap::Parser;
use todoapp::cli::Cli;
use todoapp::error::exit_codes;
use todoapp::output::print_error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a stderr subscriber. Nothing is logged unless `RUST_LOG` holds a
/// valid filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let command = cli.command_name();
    let json = cli.json;

    let code = match cli.run() {
        Ok(()) => exit_codes::SUCCESS,
        Err(err) => {
            tracing::debug!(command, error = ?err, "command failed");
            let _ = print_error(command, &err, json);
            err.exit_code()
        }
    };
    std::process::exit(code);
}
