//! Wall-clock time model.
//!
//! # Design
//!
//! The scheduler is driven by wall-clock time, not by a tick counter: every
//! mover owns its own `last_tick_time` and step interval, and `tick(now)` only
//! decides which movers have waited long enough.  Time is represented as a
//! `Timestamp` in whole milliseconds since an arbitrary origin.
//!
//! Two clocks are provided:
//!
//! - [`SystemClock`]: monotonic, backed by `std::time::Instant`.
//! - [`ManualClock`]: advanced explicitly; used by tests and replays.
//!
//! A `Clock` is only consulted where the engine must stamp time on its own:
//! mover creation, the moment a pause is released, and the tick driver.
//! `tick` itself always takes `now` from its caller.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

// ── Timestamp ─────────────────────────────────────────────────────────────────

/// Milliseconds since the clock's origin.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    /// Milliseconds elapsed from `earlier` to `self`, zero if `earlier` is later.
    #[inline]
    pub fn saturating_since(self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Timestamp {
    type Output = Timestamp;
    #[inline]
    fn add(self, rhs: u64) -> Timestamp {
        Timestamp(self.0.saturating_add(rhs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Source of the current time.
///
/// Shared across threads: pause handles stamp their resume time from
/// whichever thread releases the pause.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Timestamp;
}

/// Monotonic clock measuring from its construction.
#[derive(Clone, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.origin.elapsed().as_millis() as u64)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self { millis: AtomicU64::new(start.0) }
    }

    /// Move the clock forward by `ms` and return the new time.
    pub fn advance(&self, ms: u64) -> Timestamp {
        Timestamp(self.millis.fetch_add(ms, Ordering::AcqRel) + ms)
    }

    pub fn set(&self, at: Timestamp) {
        self.millis.store(at.0, Ordering::Release);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.millis.load(Ordering::Acquire))
    }
}
