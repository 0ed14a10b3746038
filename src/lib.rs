//! Phaselock: two-phase (shared/exclusive) inter-process locking over
//! filesystem lockfiles.
//!
//! A lock is identified by a filesystem path. Any process on the host
//! that opens the same path participates in the same arbitration:
//! - Any number of **concurrent** ("read") holders may coexist while no
//!   exclusive holder exists.
//! - Exactly one **exclusive** ("write") holder excludes everyone else.
//!
//! Ownership lives entirely in open-descriptor flock state, so a holder
//! that exits or crashes releases its lock the moment the kernel tears
//! down its descriptors — no stale-lock sweeps, no PID files.
//!
//! Single POSIX host only: flock's atomicity is not trusted over network
//! filesystems, and no cross-host coordination is attempted.
//!
//! ```no_run
//! use phaselock::{Lockfile, Mode};
//!
//! # fn main() -> phaselock::Result<()> {
//! let lock = Lockfile::open("/tmp/res.lock")?;
//! let mut handle = lock.acquire(Mode::Exclusive, true)?;
//! // ... sole access to the resource ...
//! handle.release()?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod exit_codes;
pub mod lock;

pub use error::{LockError, Result};
pub use lock::{Decision, LedgerState, LockHandle, Lockfile, Mode, decide};
