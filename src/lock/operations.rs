//! Acquire sequencing and lockfile cleanup.
//!
//! The load-bearing step lives here: the flock call issued on a freshly
//! opened descriptor is the atomic check-and-claim. There is no
//! read-the-ledger-then-mark-held window for another process to slip
//! into — the kernel evaluates the compatibility table and records the
//! holder in one step, and a denied claim leaves no trace.

use crate::error::{LockError, Result};
use super::handle::LockHandle;
use super::types::Mode;
use chrono::{DateTime, Duration, Utc};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

/// Open a descriptor against the lockfile, creating the file if absent.
///
/// `O_CREAT` without `O_EXCL`: concurrent first-touch by any number of
/// processes converges on one backing file with no failure window. The
/// file is never truncated — it is a zero-length coordination token and
/// its contents (none) are never read or written.
pub(super) fn open_descriptor(path: &Path) -> Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => LockError::Path {
                path: path.to_path_buf(),
                source: e,
            },
            _ => LockError::Os(e),
        })
}

/// Open a fresh descriptor and claim it in `mode`.
///
/// Every acquisition gets its own descriptor, so two threads of one
/// process contend through the kernel exactly like two processes do —
/// one source of truth, no side in-process mutex.
///
/// In blocking form the flock wait can be aborted by signal delivery,
/// which surfaces as [`LockError::Interrupted`]; the non-blocking form
/// surfaces a conflicting holder as [`LockError::WouldBlock`].
pub(super) fn acquire(path: &Path, mode: Mode, blocking: bool) -> Result<LockHandle> {
    let file = open_descriptor(path)?;
    // Trait-qualified calls: std's File grew inherent lock methods with
    // different signatures in Rust 1.89.
    let claimed = match (mode, blocking) {
        (Mode::Concurrent, true) => FileExt::lock_shared(&file),
        (Mode::Concurrent, false) => FileExt::try_lock_shared(&file),
        (Mode::Exclusive, true) => FileExt::lock_exclusive(&file),
        (Mode::Exclusive, false) => FileExt::try_lock_exclusive(&file),
    };
    claimed.map_err(map_claim_error)?;
    Ok(LockHandle::new(file, mode, path.to_path_buf()))
}

fn map_claim_error(e: io::Error) -> LockError {
    match e.kind() {
        io::ErrorKind::WouldBlock => LockError::WouldBlock,
        io::ErrorKind::Interrupted => LockError::Interrupted,
        _ => LockError::Os(e),
    }
}

/// Remove the lockfile if it is idle and at least `min_age` old.
///
/// Takes a non-blocking exclusive claim first; while that claim is held
/// no other holder is live and none can be granted, so an unlink cannot
/// pull the file out from under a holder. Any contention reports
/// `Ok(false)` rather than an error — a busy lockfile is not stale.
pub(super) fn clean(path: &Path, min_age: Duration) -> Result<bool> {
    let mut claim = match acquire(path, Mode::Exclusive, false) {
        Ok(handle) => handle,
        Err(LockError::WouldBlock) => return Ok(false),
        Err(e) => return Err(e),
    };
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        // Already unlinked; nothing left to clean.
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            claim.release()?;
            return Ok(false);
        }
        Err(e) => return Err(LockError::Os(e)),
    };
    let old_enough = lockfile_age(&meta) >= min_age;
    if old_enough {
        fs::remove_file(path).map_err(LockError::Os)?;
    }
    claim.release()?;
    Ok(old_enough)
}

/// Age of the lockfile, from its inode change time.
fn lockfile_age(meta: &fs::Metadata) -> Duration {
    use std::os::unix::fs::MetadataExt;
    let changed = DateTime::from_timestamp(meta.ctime(), meta.ctime_nsec() as u32)
        .unwrap_or_else(Utc::now);
    Utc::now().signed_duration_since(changed)
}
