//! Descriptor ledger: live holder counts read from kernel lock state.
//!
//! The ledger is never a cached counter. Every query re-reads
//! `/proc/locks` and counts the flock records whose device and inode
//! match the lockfile, so the result always reflects what the kernel
//! currently enforces — including holders in other processes and holders
//! whose processes died (the kernel drops their records with their
//! descriptors). A single read of `/proc/locks` is a consistent snapshot
//! of some valid instant; concurrent opens and closes land either before
//! or after it, never as a torn count.
//!
//! Before the first real query the module runs a one-time self-test: it
//! takes a shared lock on a fresh temporary file and verifies the ledger
//! observes exactly one concurrent holder. If the kernel's lock table is
//! absent or unreadable, every query reports [`LockError::Unsupported`]
//! instead of returning counts that cannot be trusted.

use crate::error::{LockError, Result};
use super::types::LedgerState;
use std::path::Path;

#[cfg(target_os = "linux")]
pub(super) use linux::read_state_at;

#[cfg(all(test, target_os = "linux"))]
pub(super) use linux::parse_locks;

#[cfg(not(target_os = "linux"))]
pub(super) fn read_state_at(_path: &Path) -> Result<LedgerState> {
    Err(LockError::Unsupported(
        "holder counts require /proc/locks, which only Linux provides".to_string(),
    ))
}

#[cfg(target_os = "linux")]
mod linux {
    use super::*;
    use fs2::FileExt;
    use std::fs;
    use std::io;
    use std::os::unix::fs::MetadataExt;
    use std::sync::OnceLock;

    const PROC_LOCKS: &str = "/proc/locks";

    /// Read the live holder counts for the lockfile at `path`.
    pub(crate) fn read_state_at(path: &Path) -> Result<LedgerState> {
        self_test()?;
        probe(path)
    }

    /// One-shot verification that `/proc/locks` actually reports flock
    /// holders on this system. Memoized; later queries reuse the verdict.
    fn self_test() -> Result<()> {
        static VERDICT: OnceLock<std::result::Result<(), String>> = OnceLock::new();
        VERDICT
            .get_or_init(run_self_test)
            .clone()
            .map_err(LockError::Unsupported)
    }

    fn run_self_test() -> std::result::Result<(), String> {
        let probe_file = tempfile::NamedTempFile::new()
            .map_err(|e| format!("could not create self-test file: {e}"))?;
        FileExt::lock_shared(probe_file.as_file())
            .map_err(|e| format!("could not lock self-test file: {e}"))?;
        let observed = probe(probe_file.path()).map_err(|e| e.to_string())?;
        let _ = FileExt::unlock(probe_file.as_file());
        if observed.concurrent == 1 && observed.exclusive == 0 {
            Ok(())
        } else {
            Err(format!(
                "self-test poll of {PROC_LOCKS} returned unexpected counts ({observed})"
            ))
        }
    }

    fn probe(path: &Path) -> Result<LedgerState> {
        let meta = match fs::metadata(path) {
            Ok(meta) => meta,
            // A lockfile that does not exist has no descriptors against it.
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(LedgerState::idle());
            }
            Err(e) => return Err(LockError::Os(e)),
        };
        let table = fs::read_to_string(PROC_LOCKS).map_err(|e| {
            LockError::Unsupported(format!("could not read {PROC_LOCKS}: {e}"))
        })?;
        Ok(parse_locks(
            &table,
            libc::major(meta.dev()),
            libc::minor(meta.dev()),
            meta.ino(),
        ))
    }

    /// Count flock holders for one file in a `/proc/locks` table.
    ///
    /// Record format (fs/locks.c prints major and minor in hex, the inode
    /// in decimal):
    ///
    /// ```text
    /// 1: FLOCK  ADVISORY  WRITE 709 08:02:1057258 0 EOF
    /// 1: -> FLOCK  ADVISORY  WRITE 710 08:02:1057258 0 EOF
    /// 2: POSIX  ADVISORY  READ  590 08:02:1055373 128 128
    /// ```
    ///
    /// Only `FLOCK`-class records are this crate's holders; `POSIX` and
    /// `OFDLCK` records belong to other locking APIs. Continuation lines
    /// (`->`) are blocked waiters, not holders.
    pub(crate) fn parse_locks(
        table: &str,
        major: libc::c_uint,
        minor: libc::c_uint,
        ino: u64,
    ) -> LedgerState {
        let mut state = LedgerState::idle();
        for line in table.lines() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let &[_, class, _, kind, _, file_id, ..] = fields.as_slice() else {
                continue;
            };
            if class != "FLOCK" {
                continue;
            }
            let mut parts = file_id.split(':');
            let rec_major = parts.next().and_then(|s| libc::c_uint::from_str_radix(s, 16).ok());
            let rec_minor = parts.next().and_then(|s| libc::c_uint::from_str_radix(s, 16).ok());
            let rec_ino = parts.next().and_then(|s| s.parse::<u64>().ok());
            if rec_major != Some(major) || rec_minor != Some(minor) || rec_ino != Some(ino) {
                continue;
            }
            match kind {
                "READ" => state.concurrent += 1,
                "WRITE" => state.exclusive += 1,
                _ => {}
            }
        }
        state
    }
}
