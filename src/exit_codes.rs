//! Exit code constants for the phaselock CLI.
//!
//! - 0: Success
//! - 1: User error (bad arguments, unusable path, double release)
//! - 4: Lock busy (non-blocking acquire denied)
//! - 5: Interrupted (blocking wait aborted by a signal)
//! - 6: OS failure (descriptor/locking facility error)
//!
//! `phaselock run` propagates the wrapped command's own exit code on
//! success, so these values only appear when the lock machinery itself
//! fails.

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unusable lockfile path, or double release.
pub const USER_ERROR: i32 = 1;

/// Lock busy: a non-blocking acquire found a conflicting holder.
pub const LOCK_BUSY: i32 = 4;

/// Interrupted: a blocking wait was aborted by signal delivery.
pub const INTERRUPTED: i32 = 5;

/// OS failure: the descriptor or locking facility failed unexpectedly.
pub const OS_FAILURE: i32 = 6;
