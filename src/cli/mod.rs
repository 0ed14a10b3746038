//! CLI argument parsing for phaselock.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module. The CLI is a thin collaborator: it
//! only supplies a resource path and mode to the library operations.

use clap::{Args, Parser, Subcommand, ValueEnum};
use phaselock::Mode;
use std::path::PathBuf;

/// Phaselock: two-phase (shared/exclusive) inter-process locking over
/// filesystem lockfiles.
///
/// A lockfile path names the resource. Any number of concurrent
/// ("read") holders may coexist; an exclusive ("write") holder excludes
/// everyone. Holders that exit or crash release their locks
/// automatically.
#[derive(Parser, Debug)]
#[command(name = "phaselock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for phaselock.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a command while holding a lock.
    ///
    /// Acquires the lock, executes the command, releases the lock, and
    /// propagates the command's exit code.
    Run(RunArgs),

    /// Show live holder counts for a lockfile.
    ///
    /// Reads kernel lock state; counts reflect holders in every process
    /// on the host.
    Status(StatusArgs),

    /// Remove an idle lockfile older than a threshold.
    ///
    /// Never removes a lockfile with live holders; locks themselves
    /// cannot go stale, this only reclaims the on-disk token.
    Clean(CleanArgs),
}

/// Lock mode selector shared by subcommands.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Shared mode: coexists with other concurrent holders.
    Concurrent,
    /// Sole-holder mode: excludes every other holder.
    Exclusive,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Concurrent => Mode::Concurrent,
            ModeArg::Exclusive => Mode::Exclusive,
        }
    }
}

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Lockfile path naming the resource.
    pub lockfile: PathBuf,

    /// Lock mode to hold while the command runs.
    #[arg(short, long, value_enum, default_value = "exclusive")]
    pub mode: ModeArg,

    /// Fail immediately instead of waiting if the lock is busy.
    #[arg(short = 'n', long)]
    pub no_wait: bool,

    /// Command to run, given as one string (split with shell word rules,
    /// executed without a shell).
    #[arg(short = 'c', long = "command", conflicts_with = "argv")]
    pub command: Option<String>,

    /// Command to run, given after `--`.
    #[arg(last = true)]
    pub argv: Vec<String>,
}

/// Arguments for the `status` command.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Lockfile path naming the resource.
    pub lockfile: PathBuf,

    /// Emit the snapshot as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `clean` command.
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Lockfile path naming the resource.
    pub lockfile: PathBuf,

    /// Minimum lockfile age in milliseconds before removal.
    #[arg(long, default_value_t = 0)]
    pub min_age_ms: u64,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
