//! Implementation of the `phaselock clean` command.

use crate::cli::CleanArgs;
use chrono::Duration;
use phaselock::error::Result;
use phaselock::exit_codes;
use phaselock::Lockfile;

/// Execute the `phaselock clean` command.
///
/// Removes the lockfile only when it has no live holder and is at least
/// `--min-age-ms` old; otherwise reports that it was kept.
pub fn cmd_clean(args: CleanArgs) -> Result<i32> {
    let lockfile = Lockfile::open(&args.lockfile)?;
    let min_age = Duration::milliseconds(args.min_age_ms.min(i64::MAX as u64) as i64);

    if lockfile.clean(min_age)? {
        println!("removed {}", lockfile.path().display());
    } else {
        println!("kept {} (busy or newer than threshold)", lockfile.path().display());
    }

    Ok(exit_codes::SUCCESS)
}
