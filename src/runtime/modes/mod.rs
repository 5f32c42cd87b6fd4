//! Mode routing
//!
//! No subcommand (or `serve`) runs the HTTP server; every other
//! subcommand runs once in CLI mode and exits. Which modes exist depends
//! on the `server` and `cli` features.

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "cli")]
pub use cli::run_cli_command;
#[cfg(feature = "server")]
pub use server::run_server;

use crate::cli::Commands;

/// Mode detection result
#[derive(Debug, PartialEq)]
pub enum Mode {
    #[cfg(feature = "server")]
    Server,
    #[cfg(feature = "cli")]
    Cli,
    Unknown,
}

pub fn detect_mode(command: Option<&Commands>) -> Mode {
    #[cfg(feature = "cli")]
    if matches!(command, Some(cmd) if *cmd != Commands::Serve) {
        return Mode::Cli;
    }

    #[cfg(feature = "server")]
    return Mode::Server;

    #[cfg(not(feature = "server"))]
    {
        let _ = command;
        Mode::Unknown
    }
}
