//! Lock mode and ledger state definitions.

use serde::Serialize;
use std::fmt;

/// Mode of a lock acquisition.
///
/// A granted acquisition keeps its mode for its whole lifetime; there is
/// no upgrade or downgrade. A holder that wants the other mode must
/// release and re-acquire, and may lose its place to another waiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Shared mode: any number of concurrent holders, as long as no
    /// exclusive holder exists.
    Concurrent,
    /// Sole-holder mode: incompatible with every other holder.
    Exclusive,
}

impl Mode {
    /// Human-readable name used in CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Concurrent => "concurrent",
            Mode::Exclusive => "exclusive",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Live holder counts for one lockfile.
///
/// Derived from kernel lock state on every query, never cached; a stale
/// in-memory copy could disagree with what other processes hold. Either
/// both counts are zero, or `concurrent` is positive and `exclusive` is
/// zero, or `exclusive` is one and `concurrent` is zero — the kernel's
/// arbitration never admits any other combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedgerState {
    /// Number of live concurrent-mode holders.
    pub concurrent: usize,
    /// Number of live exclusive-mode holders (zero or one).
    pub exclusive: usize,
}

impl LedgerState {
    /// A ledger with no holders.
    pub fn idle() -> Self {
        LedgerState {
            concurrent: 0,
            exclusive: 0,
        }
    }

    /// Whether no holder of either mode is live.
    pub fn is_idle(&self) -> bool {
        self.concurrent == 0 && self.exclusive == 0
    }

    /// The mode currently in force, if any.
    pub fn mode(&self) -> Option<Mode> {
        if self.exclusive > 0 {
            Some(Mode::Exclusive)
        } else if self.concurrent > 0 {
            Some(Mode::Concurrent)
        } else {
            None
        }
    }
}

impl fmt::Display for LedgerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "concurrent: {}, exclusive: {}",
            self.concurrent, self.exclusive
        )
    }
}
