//! The `Mover` state machine.
//!
//! # Path representation
//!
//! Callers hand over a path in travel order: first step first, terminus last.
//! The mover stores it reversed, so the terminus sits at index 0 and the
//! number of remaining steps doubles as the index of the next cell:
//!
//! ```text
//! travel order:  c1 c2 c3 c4          stored: [c4, c3, c2, c1]
//! remaining = 4 → next cell = stored[3] = c1
//! remaining = 1 → next cell = stored[0] = c4 (terminus)
//! remaining = 0 → exhausted; the actor stands on stored[0]
//! ```
//!
//! After a step, the actor stands on `stored[remaining]`.  Tail recovery
//! appends the initial position and scans upward from there, i.e. back along
//! the cells already walked, until it finds one no stationary actor holds.
//!
//! # Lifecycle
//!
//! ```text
//! create ──► (is_ready ─► advance)* ──► finish
//!               ▲    │
//!               └────┘ paused / not yet due
//! ```
//!
//! Every method except [`Mover::handle`] is for the tick thread only.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use crossbeam_channel::Sender;
use stride_core::{ActorId, Cell, Clock, MovementConfig, PauseCounter, Timestamp};
use stride_world::World;
use tracing::{debug, warn};

use crate::handle::MoverShared;
use crate::{MoverError, MoverHandle, MoverResult};

// ── StepReport ────────────────────────────────────────────────────────────────

/// Where a mover stands after [`Mover::advance`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepStatus {
    /// More steps to go.
    Moving,
    /// The last step was taken.  Ready to finish.
    Arrived,
    /// Stopped short (interrupt or out of action points).  Ready to finish.
    Halted,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    /// Cell the actor occupies after the step (and any tail recovery).
    pub cell:             Cell,
    pub status:           StepStatus,
    /// `true` if this step must stop every mover: the new cell triggered an
    /// interrupt, or hostile AI noticed a player-controlled actor.
    pub raised_interrupt: bool,
}

impl StepReport {
    #[inline]
    pub fn is_done(&self) -> bool {
        self.status != StepStatus::Moving
    }
}

// ── Mover ─────────────────────────────────────────────────────────────────────

/// Advances one actor along a precomputed path.
///
/// Created by the scheduler's `add_move`; never reused.
pub struct Mover {
    actor:             ActorId,
    /// Reversed path (see the module docs).
    path:              Vec<Cell>,
    remaining:         usize,
    initial_position:  Cell,

    last_tick_time:    Timestamp,
    step_interval:     u64,
    nominal_interval:  u64,
    backoff_interval:  u64,

    /// Set when a resume was observed; cleared once the pre-step animation
    /// for the next cell has been emitted.
    pending_prestep:   bool,
    /// Tail recovery appends the initial position at most once.
    recovery_anchored: bool,
    finished:          bool,

    pause:             PauseCounter,
    shared:            Arc<MoverShared>,
    /// Dropped by `finish` to release every waiter.
    done:              Option<Sender<()>>,
    done_rx:           crossbeam_channel::Receiver<()>,
}

impl Mover {
    /// Start moving `actor` along `path` (travel order).
    ///
    /// Captures the actor's current cell as the recovery anchor, marks the
    /// actor as currently moving, and runs the opportunity check for the first
    /// cell, which either queues the first step animation or hands the pause
    /// to the opportunity hook.  An empty path is legal: the mover simply has
    /// nothing to do and is finished on the next tick.
    pub fn create(
        actor:   ActorId,
        path:    &[Cell],
        provoke: bool,
        config:  &MovementConfig,
        clock:   Arc<dyn Clock>,
        world:   &World,
    ) -> MoverResult<Self> {
        let initial_position = world.actors.position(actor)?;
        let now = clock.now();
        let (done, done_rx) = crossbeam_channel::bounded(0);

        let mut stored = Vec::with_capacity(path.len() + 1);
        stored.extend(path.iter().rev().copied());

        let mut mover = Self {
            actor,
            remaining:         stored.len(),
            path:              stored,
            initial_position,
            last_tick_time:    now,
            step_interval:     config.step_interval_ms,
            nominal_interval:  config.step_interval_ms,
            backoff_interval:  config.backoff_interval_ms(),
            pending_prestep:   false,
            recovery_anchored: false,
            finished:          false,
            pause:             PauseCounter::new(clock),
            shared:            Arc::new(MoverShared::new(actor, provoke)),
            done:              Some(done),
            done_rx,
        };
        mover.publish_next();

        world.actors.set_currently_moving(actor, true);
        if let Err(e) = mover.check_opportunity(world) {
            world.actors.set_currently_moving(actor, false);
            return Err(e);
        }

        debug!(actor = %actor, steps = mover.remaining, from = %initial_position, "mover created");
        Ok(mover)
    }

    /// A new caller-side handle to this mover.
    pub fn handle(&self) -> MoverHandle {
        MoverHandle::new(Arc::clone(&self.shared), self.pause.handle(), self.done_rx.clone())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn actor(&self) -> ActorId {
        self.actor
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// `true` once every cell of the path has been stepped on.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    #[inline]
    pub fn remaining_steps(&self) -> usize {
        self.remaining
    }

    #[inline]
    pub fn initial_position(&self) -> Cell {
        self.initial_position
    }

    /// Current step interval in milliseconds, including any backoff.
    #[inline]
    pub fn step_interval(&self) -> u64 {
        self.step_interval
    }

    /// The cell the next step lands on.
    #[inline]
    pub fn next_position(&self) -> Option<Cell> {
        self.remaining.checked_sub(1).map(|i| self.path[i])
    }

    #[inline]
    pub fn pause_count(&self) -> u32 {
        self.pause.count()
    }

    // ── Tick-thread operations ────────────────────────────────────────────

    /// `true` if the mover is unpaused and its step interval has elapsed.
    ///
    /// Observes a pending resume: the resume time becomes the new reference
    /// point, and once `now` is within one nominal interval of the next step
    /// the animation toward the next cell is emitted, so the sprite is already
    /// sliding when the step lands.
    pub fn is_ready(&mut self, now: Timestamp, world: &World) -> MoverResult<bool> {
        if self.finished || self.pause.is_paused() {
            return Ok(false);
        }

        if let Some(resumed_at) = self.pause.take_resume() {
            self.last_tick_time = resumed_at;
            self.pending_prestep = true;
        }

        let elapsed = now.saturating_since(self.last_tick_time);
        if self.pending_prestep && elapsed > self.step_interval.saturating_sub(self.nominal_interval) {
            self.pending_prestep = false;
            if let Some(next) = self.next_position() {
                self.animate_toward(next, world)?;
            }
        }

        Ok(elapsed > self.step_interval)
    }

    /// Take one step.
    ///
    /// `interrupted` is the scheduler's global interrupt flag as seen by this
    /// sweep.  When the step exhausts the path, or an interrupt is pending or
    /// raised by the step itself, the mover runs tail recovery and reports
    /// itself done; otherwise it checks for opportunities on the next cell.
    ///
    /// # Errors
    ///
    /// Collaborator failures propagate.  If the step raised an interrupt and
    /// recovery then failed, the error is [`MoverError::RaisedInterrupt`], so
    /// the caller can still raise it.
    ///
    /// # Panics
    ///
    /// In debug builds, when called on a finished mover.  Release builds
    /// return [`MoverError::Finished`].
    pub fn advance(&mut self, now: Timestamp, interrupted: bool, world: &World) -> MoverResult<StepReport> {
        if self.finished {
            warn!(actor = %self.actor, "advance called on a finished mover");
            debug_assert!(!self.finished, "advance called on finished mover for {}", self.actor);
            return Err(MoverError::Finished(self.actor));
        }
        if self.remaining == 0 {
            return Err(MoverError::PathExhausted(self.actor));
        }

        if !world.timer.can_perform_step(self.actor) {
            debug!(actor = %self.actor, remaining = self.remaining, "out of action points");
            let cell = self.return_to_empty_tile(world)?;
            self.follow(world);
            return Ok(StepReport { cell, status: StepStatus::Halted, raised_interrupt: false });
        }

        // Nothing changes on our side until the registry accepts the move.
        let cell = self.path[self.remaining - 1];
        let mut raised = world.actors.relocate(self.actor, cell)?;
        self.remaining -= 1;
        self.last_tick_time = now;
        world.timer.charge_step(self.actor, cell);
        world.actors.refresh_visibility(self.actor);

        if world.actors.is_player_selectable(self.actor) && world.combat.check_activation() {
            debug!(actor = %self.actor, cell = %cell, "hostile AI activated");
            raised = true;
        }

        self.step_interval = self.nominal_interval;
        self.publish_next();
        debug!(actor = %self.actor, cell = %cell, remaining = self.remaining, "step");

        if self.remaining == 0 || interrupted || raised {
            let resting = match self.return_to_empty_tile(world) {
                Ok(cell) => cell,
                Err(source) if raised => {
                    return Err(MoverError::RaisedInterrupt { actor: self.actor, source: Box::new(source) });
                }
                Err(e) => return Err(e),
            };
            self.follow(world);
            let status = if self.remaining == 0 { StepStatus::Arrived } else { StepStatus::Halted };
            return Ok(StepReport { cell: resting, status, raised_interrupt: raised });
        }

        self.check_opportunity(world)?;
        Ok(StepReport { cell, status: StepStatus::Moving, raised_interrupt: false })
    }

    /// Move the actor to the nearest cell it may legally stop on.
    ///
    /// Appends the initial position as a last resort, then scans from the
    /// truncation point (the cell just stepped on) back along the walked cells.
    /// The first cell with no other stationary occupant wins; if that is the
    /// current cell nothing moves.  When every candidate is blocked the actor
    /// ends up on its initial position.
    pub fn return_to_empty_tile(&mut self, world: &World) -> MoverResult<Cell> {
        if !self.recovery_anchored {
            self.path.push(self.initial_position);
            self.recovery_anchored = true;
        }

        let current = world.actors.position(self.actor)?;
        let mut resting = None;
        for &candidate in &self.path[self.remaining..] {
            if world.stationary_blockers(candidate, self.actor)? == 0 {
                resting = Some(candidate);
                break;
            }
        }
        let resting = resting.unwrap_or_else(|| {
            warn!(
                actor = %self.actor,
                fallback = %self.initial_position,
                "no free cell on the walked path; returning to the initial position"
            );
            self.initial_position
        });

        if resting != current {
            world.actors.relocate(self.actor, resting)?;
            world.actors.refresh_visibility(self.actor);
            world.animation.emit_step_animation(self.actor, current.delta_to(resting));
            debug!(actor = %self.actor, from = %current, to = %resting, "tail recovery");
        }
        Ok(resting)
    }

    /// First pass of a scheduler-wide clear: the actor stops counting as
    /// moving and its offset animation is dropped.
    pub fn release(&self, world: &World) {
        world.actors.set_currently_moving(self.actor, false);
        world.animation.cancel_offset_animation(self.actor);
    }

    /// Complete the mover: clear the moving flag, run callbacks in order,
    /// mark finished and release waiters.
    ///
    /// # Errors
    ///
    /// [`MoverError::AlreadyFinished`] on a second call; nothing runs twice.
    ///
    /// # Panics
    ///
    /// On that second call in debug builds, after logging.
    pub fn finish(&mut self, world: &World) -> MoverResult<()> {
        if self.finished {
            warn!(actor = %self.actor, "finish called twice");
            debug_assert!(!self.finished, "finish called twice for {}", self.actor);
            return Err(MoverError::AlreadyFinished(self.actor));
        }

        world.actors.set_currently_moving(self.actor, false);
        for callback in self.shared.take_callbacks() {
            callback();
        }

        self.finished = true;
        self.shared.set_next_position(None);
        self.shared.finished.store(true, Ordering::Release);
        self.done.take();

        debug!(actor = %self.actor, remaining = self.remaining, "mover finished");
        Ok(())
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Before stepping onto the next cell: either the opportunity hook takes
    /// over (and the interval backs off), or the step animation is queued.
    fn check_opportunity(&mut self, world: &World) -> MoverResult<()> {
        let Some(next) = self.next_position() else {
            return Ok(());
        };

        if self.shared.provokes.load(Ordering::Acquire)
            && world.opportunity.maybe_provoke(self.actor, &self.pause.handle())?
        {
            debug!(actor = %self.actor, next = %next, "opportunity provoked");
            self.step_interval = self.backoff_interval;
            return Ok(());
        }

        self.animate_toward(next, world)
    }

    fn animate_toward(&self, next: Cell, world: &World) -> MoverResult<()> {
        let from = world.actors.position(self.actor)?;
        world.animation.emit_step_animation(self.actor, from.delta_to(next));
        Ok(())
    }

    fn follow(&self, world: &World) {
        if !self.shared.background.load(Ordering::Acquire) {
            world.animation.follow_actor(self.actor);
        }
    }

    fn publish_next(&self) {
        self.shared.set_next_position(self.next_position());
    }
}

impl std::fmt::Debug for Mover {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mover")
            .field("actor", &self.actor)
            .field("remaining", &self.remaining)
            .field("pause_count", &self.pause.count())
            .field("finished", &self.finished)
            .finish()
    }
}
