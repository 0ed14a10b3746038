//! Phaselock CLI: two-phase (shared/exclusive) locking over filesystem
//! lockfiles.
//!
//! This is the entry point for the `phaselock` binary. It parses
//! arguments, dispatches to the appropriate command handler, and maps
//! errors to exit codes. All locking semantics live in the library; the
//! binary only supplies a resource path and mode.

mod cli;
mod commands;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match commands::dispatch(cli.command) {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            // Return appropriate exit code
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
