//! Implementation of the `phaselock run` command.
//!
//! Acquires the requested lock, executes the wrapped command without a
//! shell, releases the lock, and propagates the command's exit code.

use crate::cli::RunArgs;
use phaselock::error::{LockError, Result};
use phaselock::exit_codes;
use phaselock::Lockfile;
use std::process::Command;

/// Execute the `phaselock run` command.
pub fn cmd_run(args: RunArgs) -> Result<i32> {
    let argv = match resolve_argv(&args) {
        Ok(argv) => argv,
        Err(message) => {
            eprintln!("Error: {}", message);
            return Ok(exit_codes::USER_ERROR);
        }
    };

    let lockfile = Lockfile::open(&args.lockfile)?;
    let mut handle = lockfile.acquire(args.mode.into(), !args.no_wait)?;

    let status = Command::new(&argv[0]).args(&argv[1..]).status();

    // Release before inspecting the command result so a spawn failure
    // cannot leave the lock held for the rest of this process.
    handle.release()?;

    let status = status.map_err(LockError::Os)?;
    Ok(status.code().unwrap_or(-1))
}

/// Resolve the command line to run from either `--command` or trailing
/// arguments.
fn resolve_argv(args: &RunArgs) -> std::result::Result<Vec<String>, String> {
    let argv = match &args.command {
        Some(line) => shell_words::split(line).map_err(|e| {
            format!(
                "failed to parse command '{}': {}\n\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                line, e
            )
        })?,
        None => args.argv.clone(),
    };

    if argv.is_empty() {
        return Err(
            "no command given.\n\n\
             Fix: pass a command after `--`, or use --command \"...\"."
                .to_string(),
        );
    }

    Ok(argv)
}
