//! Compatibility arbitration between lock modes.
//!
//! Implements the two-phase-locking compatibility table:
//!
//! | requested \ held | none | concurrent | exclusive |
//! |------------------|------|------------|-----------|
//! | concurrent       | Y    | Y          | N         |
//! | exclusive        | Y    | N          | N         |
//!
//! `decide` is pure and side-effect-free. The acquire path never acts on
//! a stand-alone `decide` result — ledger state can change between a
//! decision and an action, so the atomic check-and-claim is delegated to
//! the kernel's flock primitive, which enforces this same table. `decide`
//! exists for introspection ([`Lockfile::would_grant`]) and for tests.
//!
//! [`Lockfile::would_grant`]: super::Lockfile::would_grant

use super::types::{LedgerState, Mode};

/// Outcome of a compatibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The requested mode is compatible with the current holders.
    Grant,
    /// The requested mode conflicts with at least one current holder.
    Deny,
}

/// Apply the compatibility table to a requested mode and a ledger snapshot.
pub fn decide(requested: Mode, state: &LedgerState) -> Decision {
    let compatible = match requested {
        Mode::Concurrent => state.exclusive == 0,
        Mode::Exclusive => state.exclusive == 0 && state.concurrent == 0,
    };
    if compatible { Decision::Grant } else { Decision::Deny }
}
