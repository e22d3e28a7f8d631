//! Reference-counted pausing.
//!
//! Any number of independent pausers may each hold one increment on a
//! mover's pause count; the mover is frozen while the count is above zero.
//! When the last pauser releases, the resume time is stamped and a one-shot
//! "just resumed" flag is raised for the owning mover to observe.
//!
//! # Layout
//!
//! The count (low 32 bits) and the resumed flag (bit 32) share one
//! `AtomicU64`.  Dropping to zero and raising the flag is therefore a single
//! compare-exchange, and the owner can never observe a zero count whose resume
//! has not been published yet.
//!
//! # Capabilities
//!
//! [`PauseCounter`] is the owner side: it reads the count and consumes the
//! resume flag.  [`PauseHandle`] is what gets handed to outside systems such
//! as an opportunity hook: it can only increment and decrement.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::warn;

use crate::{Clock, StrideError, StrideResult, Timestamp};

const COUNT_MASK: u64 = 0xffff_ffff;
const RESUMED_FLAG: u64 = 1 << 32;

struct PauseState {
    word:       AtomicU64,
    resumed_at: AtomicU64,
    clock:      Arc<dyn Clock>,
}

impl PauseState {
    #[inline]
    fn count(&self) -> u32 {
        (self.word.load(Ordering::Acquire) & COUNT_MASK) as u32
    }

    fn increment(&self) -> StrideResult<()> {
        let mut current = self.word.load(Ordering::Acquire);
        loop {
            if current & COUNT_MASK == COUNT_MASK {
                warn!("pause count overflow");
                return Err(StrideError::PauseOverflow);
            }
            match self.word.compare_exchange_weak(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(()),
                Err(actual) => current = actual,
            }
        }
    }

    fn decrement(&self) -> StrideResult<()> {
        let mut current = self.word.load(Ordering::Acquire);
        loop {
            let count = current & COUNT_MASK;
            if count == 0 {
                warn!("pause count decremented below zero; ignoring");
                debug_assert!(count != 0, "pause count decremented below zero");
                return Err(StrideError::PauseUnderflow);
            }
            let next = if count == 1 {
                // Published by the AcqRel exchange below.
                self.resumed_at.store(self.clock.now().0, Ordering::Relaxed);
                RESUMED_FLAG
            } else {
                current - 1
            };
            match self.word.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(()),
                Err(actual) => current = actual,
            }
        }
    }
}

// ── PauseCounter ──────────────────────────────────────────────────────────────

/// Owner side of a pause count.
pub struct PauseCounter {
    inner: Arc<PauseState>,
}

impl PauseCounter {
    /// A fresh, unpaused counter.  `clock` stamps the resume time.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(PauseState {
                word: AtomicU64::new(0),
                resumed_at: AtomicU64::new(0),
                clock,
            }),
        }
    }

    /// A capability that can only increment and decrement this count.
    pub fn handle(&self) -> PauseHandle {
        PauseHandle { inner: Arc::clone(&self.inner) }
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.inner.count()
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.count() > 0
    }

    /// Consume the "just resumed" flag.
    ///
    /// Returns the resume time exactly once per transition to zero, and only
    /// while the count is still zero.  A pause re-acquired before the owner
    /// looked keeps the flag for the next release to overwrite.
    pub fn take_resume(&self) -> Option<Timestamp> {
        let word = &self.inner.word;
        let current = word.load(Ordering::Acquire);
        if current != RESUMED_FLAG {
            return None;
        }
        word.compare_exchange(current, 0, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Timestamp(self.inner.resumed_at.load(Ordering::Relaxed)))
    }
}

impl std::fmt::Debug for PauseCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PauseCounter").field("count", &self.count()).finish()
    }
}

// ── PauseHandle ───────────────────────────────────────────────────────────────

/// Increment/decrement capability over one mover's pause count.
///
/// Cheap to clone and safe to move to other threads.  Every
/// [`increment_pause`][Self::increment_pause] must be matched by exactly one
/// [`decrement_pause`][Self::decrement_pause].
#[derive(Clone)]
pub struct PauseHandle {
    inner: Arc<PauseState>,
}

impl PauseHandle {
    /// Add one pauser.
    pub fn increment_pause(&self) -> StrideResult<()> {
        self.inner.increment()
    }

    /// Release one pauser.  Releasing the last one resumes the mover.
    ///
    /// # Errors
    ///
    /// [`StrideError::PauseUnderflow`] if the count is already zero; the
    /// count is left at zero.
    ///
    /// # Panics
    ///
    /// On underflow in debug builds, after logging.  Release builds only
    /// report it.
    pub fn decrement_pause(&self) -> StrideResult<()> {
        self.inner.decrement()
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.inner.count() > 0
    }

    #[inline]
    pub fn pause_count(&self) -> u32 {
        self.inner.count()
    }
}

impl std::fmt::Debug for PauseHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PauseHandle").field("count", &self.pause_count()).finish()
    }
}
