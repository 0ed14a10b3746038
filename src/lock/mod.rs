//! Locking subsystem for phaselock.
//!
//! Implements two-phase (shared/exclusive) mutual exclusion between
//! independent processes over filesystem-backed lockfiles:
//! - A lockfile's open-descriptor flock state is the only record of who
//!   holds what; the file body stays empty and carries no ownership
//!   metadata.
//! - Acquisition opens a fresh descriptor and claims it with flock, so
//!   the compatibility check and the claim are one atomic kernel step.
//! - Release closes the descriptor. Process death closes it too, which
//!   is the entire crash-recovery story.
//!
//! # Components
//!
//! - [`Lockfile`]: resource identity, idempotent open/create, operations.
//! - [`LockHandle`]: RAII handle for one granted acquisition.
//! - ledger: live holder counts recomputed from `/proc/locks` per query.
//! - [`decide`]: the pure compatibility table, for introspection.

mod arbiter;
mod handle;
mod ledger;
mod lockfile;
mod operations;
mod types;


// Re-export public API
pub use arbiter::{Decision, decide};
pub use handle::LockHandle;
pub use lockfile::Lockfile;
pub use types::{LedgerState, Mode};
