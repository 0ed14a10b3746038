//! Command implementations for phaselock.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Each command returns the process exit code to use;
//! `run` propagates the wrapped command's own code.

mod clean;
mod run;
mod status;

use crate::cli::Command;
use phaselock::error::Result;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<i32> {
    match command {
        Command::Run(args) => run::cmd_run(args),
        Command::Status(args) => status::cmd_status(args),
        Command::Clean(args) => clean::cmd_clean(args),
    }
}
