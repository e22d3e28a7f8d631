//! `MoverHandle`: the caller's view of a running mover.
//!
//! The [`Mover`][crate::Mover] itself lives inside the scheduler and is only
//! touched by the tick thread.  Everything another thread may need to read or
//! set goes through [`MoverShared`], which the handle and the mover share.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use stride_core::{ActorId, Cell, PauseHandle, StrideResult};

use crate::{MoverError, MoverResult};

/// A completion callback.  Runs exactly once, on the thread that finishes the
/// mover.
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// State readable and writable from any thread.
pub(crate) struct MoverShared {
    pub(crate) actor:      ActorId,
    pub(crate) background: AtomicBool,
    pub(crate) provokes:   AtomicBool,
    pub(crate) finished:   AtomicBool,
    /// `None` once the callbacks have been handed to `finish`.
    callbacks:             Mutex<Option<Vec<Callback>>>,
    next_position:         Mutex<Option<Cell>>,
}

impl MoverShared {
    pub(crate) fn new(actor: ActorId, provokes: bool) -> Self {
        Self {
            actor,
            background:    AtomicBool::new(false),
            provokes:      AtomicBool::new(provokes),
            finished:      AtomicBool::new(false),
            callbacks:     Mutex::new(Some(Vec::new())),
            next_position: Mutex::new(None),
        }
    }

    fn callbacks(&self) -> MutexGuard<'_, Option<Vec<Callback>>> {
        self.callbacks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Close the callback list and hand its contents over.
    pub(crate) fn take_callbacks(&self) -> Vec<Callback> {
        self.callbacks().take().unwrap_or_default()
    }

    pub(crate) fn set_next_position(&self, next: Option<Cell>) {
        *self.next_position.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }
}

/// Caller-side handle to a mover registered with the scheduler.
///
/// Cheap to clone; every clone observes the same mover.
///
/// # Waiting
///
/// [`wait`][Self::wait] blocks until the mover has finished.  The signal is a
/// one-shot channel whose only sender lives in the mover and is dropped by
/// `finish`, so every waiter (present or future) is released exactly once.
/// Never wait on the thread that drives `tick`.
#[derive(Clone)]
pub struct MoverHandle {
    shared: Arc<MoverShared>,
    pause:  PauseHandle,
    done:   Receiver<()>,
}

impl MoverHandle {
    pub(crate) fn new(shared: Arc<MoverShared>, pause: PauseHandle, done: Receiver<()>) -> Self {
        Self { shared, pause, done }
    }

    /// The actor this mover is moving.
    pub fn actor(&self) -> ActorId {
        self.shared.actor
    }

    // ── Pausing ───────────────────────────────────────────────────────────

    /// Add one pauser.  The mover freezes while any pauser holds it.
    pub fn increment_pause(&self) -> StrideResult<()> {
        self.pause.increment_pause()
    }

    /// Release one pauser.  Reported as
    /// [`StrideError::PauseUnderflow`][stride_core::StrideError::PauseUnderflow]
    /// if nothing holds the mover.
    pub fn decrement_pause(&self) -> StrideResult<()> {
        self.pause.decrement_pause()
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    /// A capability limited to incrementing and decrementing the pause count.
    pub fn pause_handle(&self) -> PauseHandle {
        self.pause.clone()
    }

    // ── Settings ──────────────────────────────────────────────────────────

    /// Background movers never move the camera when they stop.
    pub fn set_background(&self, background: bool) {
        self.shared.background.store(background, Ordering::Release);
    }

    pub fn is_background(&self) -> bool {
        self.shared.background.load(Ordering::Acquire)
    }

    /// Whether stepping consults the opportunity hook.  Default: `true`.
    pub fn set_provokes_opportunities(&self, provoke: bool) {
        self.shared.provokes.store(provoke, Ordering::Release);
    }

    pub fn provokes_opportunities(&self) -> bool {
        self.shared.provokes.load(Ordering::Acquire)
    }

    /// Queue callbacks to run, in order, when the mover finishes.
    ///
    /// # Errors
    ///
    /// [`MoverError::AlreadyFinished`] if the mover has already run its
    /// callbacks; the new ones are dropped without running.
    pub fn add_completion_callbacks<I>(&self, callbacks: I) -> MoverResult<()>
    where
        I: IntoIterator<Item = Callback>,
    {
        match self.shared.callbacks().as_mut() {
            Some(list) => {
                list.extend(callbacks);
                Ok(())
            }
            None => Err(MoverError::AlreadyFinished(self.shared.actor)),
        }
    }

    /// Single-callback shorthand for [`add_completion_callbacks`][Self::add_completion_callbacks].
    pub fn on_complete<F>(&self, callback: F) -> MoverResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.add_completion_callbacks([Box::new(callback) as Callback])
    }

    // ── Progress ──────────────────────────────────────────────────────────

    pub fn is_finished(&self) -> bool {
        self.shared.finished.load(Ordering::Acquire)
    }

    /// The cell the actor will step onto next, `None` once no steps remain.
    pub fn next_position(&self) -> Option<Cell> {
        *self.shared.next_position.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block until the mover has finished (or was dropped unfinished).
    pub fn wait(&self) {
        let _ = self.done.recv();
    }

    /// Like [`wait`][Self::wait] with an upper bound.  Returns `true` if the
    /// mover finished in time.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        matches!(self.done.recv_timeout(timeout), Err(RecvTimeoutError::Disconnected))
            && self.is_finished()
    }
}

impl std::fmt::Debug for MoverHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoverHandle")
            .field("actor", &self.shared.actor)
            .field("paused", &self.is_paused())
            .field("finished", &self.is_finished())
            .finish()
    }
}
