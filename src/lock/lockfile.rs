//! Lockfile handle: the stable identity of one locked resource.

use crate::error::Result;
use super::arbiter::{self, Decision};
use super::handle::LockHandle;
use super::ledger;
use super::operations;
use super::types::{LedgerState, Mode};
use chrono::Duration;
use std::path::{Path, PathBuf};

/// A lock resource backed by an on-disk lockfile.
///
/// The path is the resource identity: two `Lockfile`s opened on the same
/// path coordinate with each other, whether they live in one process or
/// in many. The value itself holds no descriptor — all lock state lives
/// in the kernel — so cloning it is safe and cheap.
///
/// The backing file is a durable, zero-length coordination token. It is
/// created on first open and never deleted by release or drop; see
/// [`Lockfile::clean`] for explicit removal of an idle lockfile.
#[derive(Debug, Clone)]
pub struct Lockfile {
    path: PathBuf,
}

impl Lockfile {
    /// Open a lock resource at `path`, creating the backing file if it
    /// does not exist yet.
    ///
    /// Creation is atomic: any number of processes may first-open the
    /// same missing path at once and all converge on one backing file.
    ///
    /// # Errors
    ///
    /// [`LockError::Path`](crate::LockError::Path) when the parent
    /// directory is missing or not writable.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        // The probe descriptor both creates the file and proves the path
        // usable; it claims nothing and is closed immediately.
        drop(operations::open_descriptor(&path)?);
        Ok(Self { path })
    }

    /// Path of the backing lockfile.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Acquire a lock in `mode`.
    ///
    /// With `blocking` set, the call suspends until the claim is granted
    /// or a signal aborts the wait
    /// ([`LockError::Interrupted`](crate::LockError::Interrupted)).
    /// Without it, a conflicting holder yields
    /// [`LockError::WouldBlock`](crate::LockError::WouldBlock) at once.
    ///
    /// The granted handle releases on [`LockHandle::release`] or drop;
    /// if the holding process dies first, the kernel closes its
    /// descriptors and the lock frees itself.
    ///
    /// No fairness is provided beyond the kernel's own queueing: under a
    /// steady stream of concurrent holders an exclusive waiter can starve
    /// indefinitely. Acquiring the same resource twice from one thread
    /// without releasing is not guaranteed deadlock-free.
    pub fn acquire(&self, mode: Mode, blocking: bool) -> Result<LockHandle> {
        operations::acquire(&self.path, mode, blocking)
    }

    /// Acquire an exclusive lock, waiting for every current holder.
    pub fn exclusive(&self) -> Result<LockHandle> {
        self.acquire(Mode::Exclusive, true)
    }

    /// Acquire a concurrent lock, waiting for any exclusive holder.
    pub fn concurrent(&self) -> Result<LockHandle> {
        self.acquire(Mode::Concurrent, true)
    }

    /// Non-blocking [`Lockfile::exclusive`].
    pub fn try_exclusive(&self) -> Result<LockHandle> {
        self.acquire(Mode::Exclusive, false)
    }

    /// Non-blocking [`Lockfile::concurrent`].
    pub fn try_concurrent(&self) -> Result<LockHandle> {
        self.acquire(Mode::Concurrent, false)
    }

    /// Live holder counts for this lockfile, read from kernel state.
    ///
    /// The snapshot reflects some valid instant, but holders come and go
    /// underneath it; it is diagnostic, not a reservation. Linux only —
    /// elsewhere this reports
    /// [`LockError::Unsupported`](crate::LockError::Unsupported).
    pub fn state(&self) -> Result<LedgerState> {
        ledger::read_state_at(&self.path)
    }

    /// The mode currently in force on this lockfile, if any.
    pub fn mode(&self) -> Result<Option<Mode>> {
        Ok(self.state()?.mode())
    }

    /// Whether an acquire in `mode` would be granted against the current
    /// ledger snapshot.
    ///
    /// Advisory by nature: the answer can be stale by the time the caller
    /// acts on it. [`Lockfile::acquire`] never consults this — the kernel
    /// applies the same compatibility table atomically at claim time.
    pub fn would_grant(&self, mode: Mode) -> Result<bool> {
        Ok(arbiter::decide(mode, &self.state()?) == Decision::Grant)
    }

    /// Remove the backing lockfile if it is idle and at least `min_age`
    /// old. Returns whether the file was removed.
    ///
    /// Useful for tidying long-abandoned lockfiles; locks themselves
    /// never go stale (a dead holder's claim dies with its descriptors),
    /// so this only reclaims the on-disk token.
    pub fn clean(&self, min_age: Duration) -> Result<bool> {
        operations::clean(&self.path, min_age)
    }
}
