//! Mode routing
//!
//! `serve` (or no subcommand) runs the HTTP server; every other subcommand
//! is a one-shot CLI command.

pub mod server;

pub use server::run_server;

use crate::cli::Cli;

/// Mode detection result
#[derive(Debug, PartialEq, Eq)]
pub enum Mode {
    Server,
    Cli,
}

pub fn detect_mode(cli: &Cli) -> Mode {
    if cli.is_server_mode() {
        Mode::Server
    } else {
        Mode::Cli
    }
}
