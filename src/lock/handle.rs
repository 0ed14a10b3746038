//! RAII lock handle bound to one open descriptor.

use crate::error::{LockError, Result};
use super::types::Mode;
use std::fs::File;
use std::path::{Path, PathBuf};

/// One granted lock acquisition.
///
/// Wraps the open descriptor whose flock state is the acquisition, plus
/// the mode it was granted under. Closing the descriptor is the release:
/// the kernel removes the holder from the ledger the instant the last
/// reference to the open file goes away, which is also what happens to
/// every descriptor of a process that exits or is killed. That teardown
/// path is the crash-recovery mechanism; there is no stale-lock sweep.
///
/// A handle is owned by exactly one logical holder and is deliberately
/// not `Clone`: duplicating the descriptor would make two holders look
/// like one in the ledger.
#[derive(Debug)]
pub struct LockHandle {
    /// The open descriptor; `None` once released.
    file: Option<File>,

    /// The mode this acquisition was granted under.
    mode: Mode,

    /// Path of the lockfile this handle was granted on.
    path: PathBuf,
}

impl LockHandle {
    pub(super) fn new(file: File, mode: Mode, path: PathBuf) -> Self {
        Self {
            file: Some(file),
            mode,
            path,
        }
    }

    /// The mode this acquisition was granted under.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Path of the lockfile this handle was granted on.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock by closing its descriptor.
    ///
    /// Calling this a second time returns [`LockError::DoubleRelease`]:
    /// the descriptor no longer exists to close, and pretending otherwise
    /// would hide a caller bug. The failed second call leaves every other
    /// holder's state untouched.
    ///
    /// Dropping an unreleased handle closes the descriptor as well;
    /// `release` exists for callers that want the release to be explicit
    /// in control flow.
    pub fn release(&mut self) -> Result<()> {
        match self.file.take() {
            Some(file) => {
                drop(file);
                Ok(())
            }
            None => Err(LockError::DoubleRelease),
        }
    }
}
