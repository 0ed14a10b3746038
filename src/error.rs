//! Error types for phaselock.
//!
//! Uses thiserror for derive macros. Every failure is surfaced to the
//! caller explicitly; the core never logs, never retries silently, and
//! never reports a denied lock as granted.

use crate::exit_codes;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for lock operations.
///
/// Each variant maps to a specific exit code used by the `phaselock` CLI.
#[derive(Error, Debug)]
pub enum LockError {
    /// The lockfile path is unusable (missing parent directory, permission
    /// denied). Not retried; surfaced immediately.
    #[error("lockfile path '{path}' is unusable: {source}")]
    Path {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A non-blocking acquire found the lock held in a conflicting mode.
    /// Expected and recoverable; the caller decides whether to retry.
    #[error("lock is held in a conflicting mode")]
    WouldBlock,

    /// A blocking acquire's wait was aborted by signal delivery.
    /// Recoverable; the caller may retry the acquire.
    #[error("lock wait was interrupted")]
    Interrupted,

    /// Release was called on a handle that was already released.
    /// A programming error in the caller; the descriptor no longer exists.
    #[error("lock handle was already released")]
    DoubleRelease,

    /// Holder-count introspection is not available on this platform, or
    /// the platform self-test failed.
    #[error("lock state introspection unavailable: {0}")]
    Unsupported(String),

    /// Unexpected failure from the underlying descriptor or locking
    /// facility (e.g. descriptor exhaustion). Not retried automatically.
    #[error("lock operation failed: {0}")]
    Os(#[from] io::Error),
}

impl LockError {
    /// Returns the exit code the CLI uses for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            LockError::Path { .. } => exit_codes::USER_ERROR,
            LockError::WouldBlock => exit_codes::LOCK_BUSY,
            LockError::Interrupted => exit_codes::INTERRUPTED,
            LockError::DoubleRelease => exit_codes::USER_ERROR,
            LockError::Unsupported(_) => exit_codes::OS_FAILURE,
            LockError::Os(_) => exit_codes::OS_FAILURE,
        }
    }
}

/// Result type alias for lock operations.
pub type Result<T> = std::result::Result<T, LockError>;
