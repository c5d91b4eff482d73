//! Wall-clock budget for a restore.
//!
//! The restore loop polls a [`Deadline`] after every vertex it writes. Nothing
//! interrupts a write in progress; once the deadline passes, the next poll
//! fails and the loop stops with the vertices written so far left in place.

use crate::error::{RestoreError, RestoreResult};
use std::time::{Duration, Instant};

/// Budget used when a session is not given one.
pub const DEFAULT_RESTORE_BUDGET: Duration = Duration::from_secs(3);

/// A point in time after which a restore gives up.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    budget: Duration,
    /// `None` when `start + budget` does not fit in an `Instant`.
    expires_at: Option<Instant>,
}

impl Deadline {
    /// Start a deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        let start = Instant::now();
        Self {
            start,
            budget,
            expires_at: start.checked_add(budget),
        }
    }

    /// Configured budget.
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time since the deadline was started.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time left, zero once expired.
    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.elapsed())
    }

    /// Whether the budget is used up. A zero budget is expired immediately.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires_at| Instant::now() >= expires_at)
    }

    /// Poll the deadline with loop progress for the error report.
    pub fn check(&self, processed: usize, total: usize) -> RestoreResult<()> {
        if self.is_expired() {
            Err(RestoreError::timeout(
                self.budget,
                self.elapsed(),
                processed,
                total,
            ))
        } else {
            Ok(())
        }
    }
}
