//! # Bounded busy-waiting
//!
//! Hardware completion is observed by polling a status register. Every such
//! loop in the tiler goes through [`spin_until`] so that a stuck or faulty
//! unit surfaces as a [`PollTimeout`] instead of hanging the caller.

use core::hint::spin_loop;

/// Maximum number of polls before giving up.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PollBudget(u32);

impl PollBudget {
    /// Budget used when nothing else is configured.
    pub const DEFAULT: Self = Self(1_000_000);

    #[must_use]
    pub const fn new(iterations: u32) -> Self {
        Self(iterations)
    }

    /// Number of polls; the condition is always checked at least once.
    #[must_use]
    pub const fn iterations(self) -> u32 {
        if self.0 == 0 { 1 } else { self.0 }
    }
}

impl Default for PollBudget {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("condition not met after {polls} polls")]
pub struct PollTimeout {
    pub polls: u32,
}

/// Calls `poll` until it yields `Some`, at most `budget.iterations()` times.
///
/// ```
/// use tiler_sync::{PollBudget, spin_until};
///
/// let mut n = 0;
/// let v = spin_until(PollBudget::new(10), || { n += 1; (n == 3).then_some(n) });
/// assert_eq!(v, Ok(3));
/// ```
///
/// # Errors
/// [`PollTimeout`] once the budget is exhausted.
pub fn spin_until<T>(
    budget: PollBudget,
    mut poll: impl FnMut() -> Option<T>,
) -> Result<T, PollTimeout> {
    let polls = budget.iterations();
    for _ in 0..polls {
        if let Some(value) = poll() {
            return Ok(value);
        }
        spin_loop();
    }
    Err(PollTimeout { polls })
}
