//! Implementation of the `phaselock status` command.
//!
//! Prints a live ledger snapshot for one lockfile. The counts come from
//! kernel lock state, so they cover holders in every process on the
//! host, not just this one.

use crate::cli::StatusArgs;
use phaselock::error::Result;
use phaselock::exit_codes;
use phaselock::Lockfile;
use serde_json::json;

/// Execute the `phaselock status` command.
pub fn cmd_status(args: StatusArgs) -> Result<i32> {
    let lockfile = Lockfile::open(&args.lockfile)?;
    let state = lockfile.state()?;

    if args.json {
        let payload = json!({
            "lockfile": lockfile.path().display().to_string(),
            "concurrent": state.concurrent,
            "exclusive": state.exclusive,
            "mode": state.mode().map(|m| m.as_str()),
        });
        println!("{}", payload);
    } else {
        println!("{}", lockfile.path().display());
        println!("  {}", state);
        match state.mode() {
            Some(mode) => println!("  mode: {}", mode),
            None => println!("  mode: idle"),
        }
    }

    Ok(exit_codes::SUCCESS)
}
