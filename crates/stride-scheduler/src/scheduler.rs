//! The `MovementScheduler` and its tick.
//!
//! # Locking
//!
//! ```text
//! gate:   Mutex<()>         held for a whole tick or clear
//! active: Mutex<Vec<Mover>> held only to take, push or put back movers
//! ```
//!
//! A tick takes every mover out of `active`, sweeps them with no lock on the
//! set, then puts the survivors back in front of anything `add_move` pushed
//! in the meantime.  Hooks and completion callbacks therefore may call
//! [`add_move`][MovementScheduler::add_move],
//! [`interrupt`][MovementScheduler::interrupt] and
//! [`is_locked`][MovementScheduler::is_locked] from inside a tick.  They must
//! not call `tick` or `clear`, which wait on the gate.

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rustc_hash::FxHashSet;
use stride_core::{ActorId, Cell, Clock, MovementConfig, MovementMode, Timestamp};
use stride_mover::{Mover, MoverHandle};
use stride_world::World;
use tracing::{debug, info, warn};

use crate::{SchedulerError, SchedulerResult};

// ── TickReport ────────────────────────────────────────────────────────────────

/// What one call to [`MovementScheduler::tick`] did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Steps taken.
    pub stepped:     usize,
    /// Movers finished and removed, including those cleared by an interrupt.
    pub finished:    usize,
    /// `true` if the global interrupt was consumed by this tick.
    pub interrupted: bool,
}

// ── MovementScheduler ─────────────────────────────────────────────────────────

/// Owns the active movers and advances them on every [`tick`][Self::tick].
///
/// Build one with [`SchedulerBuilder`][crate::SchedulerBuilder].  Share it
/// behind an `Arc`: one thread drives `tick` (see
/// [`TickDriver`][crate::TickDriver]), any thread may start moves, raise the
/// interrupt or poll `is_locked`.
pub struct MovementScheduler {
    config:    MovementConfig,
    world:     World,
    clock:     Arc<dyn Clock>,

    /// Movers in activation order.
    active:    Mutex<Vec<Mover>>,
    /// Serializes `tick` and `clear`.
    gate:      Mutex<()>,
    /// Actors with an unfinished mover.  Released just before `finish` so
    /// completion callbacks can start the actor's next move.
    busy:      Mutex<FxHashSet<ActorId>>,
    /// Movers registered and not yet finished, readable without any lock.
    live:      AtomicUsize,
    interrupt: AtomicBool,
    mode:      AtomicU8,
}

impl MovementScheduler {
    pub(crate) fn new(config: MovementConfig, world: World, clock: Arc<dyn Clock>) -> Self {
        Self {
            mode:      AtomicU8::new(config.default_mode as u8),
            config,
            world,
            clock,
            active:    Mutex::new(Vec::new()),
            gate:      Mutex::new(()),
            busy:      Mutex::new(FxHashSet::default()),
            live:      AtomicUsize::new(0),
            interrupt: AtomicBool::new(false),
        }
    }

    fn active(&self) -> MutexGuard<'_, Vec<Mover>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn gate(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn busy(&self) -> MutexGuard<'_, FxHashSet<ActorId>> {
        self.busy.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Current time on the scheduler's clock.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// `true` while any mover is active.  Callers use this to block player
    /// input until motion has settled.
    pub fn is_locked(&self) -> bool {
        self.live.load(Ordering::Acquire) > 0
    }

    /// Number of movers registered and not yet finished.
    pub fn active_count(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    pub fn movement_mode(&self) -> MovementMode {
        MovementMode::from_u8(self.mode.load(Ordering::Acquire))
    }

    pub fn set_movement_mode(&self, mode: MovementMode) {
        self.mode.store(mode as u8, Ordering::Release);
        debug!(mode = %mode, "movement mode changed");
    }

    // ── Operations ────────────────────────────────────────────────────────

    /// Start moving `actor` along `path` (travel order, current cell
    /// excluded).
    ///
    /// The actor is marked as moving and the opportunity check for the first
    /// cell runs before this returns.  An empty path is accepted; the mover
    /// finishes on the next tick.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::ActorBusy`] if `actor` already has an unfinished
    /// mover.  A completion callback of that mover may start the next one.
    pub fn add_move(&self, actor: ActorId, path: &[Cell], provoke: bool) -> SchedulerResult<MoverHandle> {
        if !self.busy().insert(actor) {
            warn!(actor = %actor, "actor already has an active mover");
            return Err(SchedulerError::ActorBusy(actor));
        }
        let mover = match Mover::create(actor, path, provoke, &self.config, Arc::clone(&self.clock), &self.world) {
            Ok(mover) => mover,
            Err(e) => {
                self.busy().remove(&actor);
                return Err(e.into());
            }
        };
        let handle = mover.handle();

        self.live.fetch_add(1, Ordering::AcqRel);
        self.active().push(mover);
        debug!(actor = %actor, steps = path.len(), "move added");
        Ok(handle)
    }

    /// Ask every active mover to stop.  Consumed by the next tick, which
    /// clears the scheduler.  Raising it again before then has no extra
    /// effect.
    pub fn interrupt(&self) {
        if !self.interrupt.swap(true, Ordering::AcqRel) {
            info!("movement interrupt raised");
        }
    }

    /// `true` if an interrupt is waiting for the next tick.
    pub fn is_interrupt_pending(&self) -> bool {
        self.interrupt.load(Ordering::Acquire)
    }

    /// [`tick`][Self::tick] at the scheduler's own clock.
    ///
    /// This is what [`TickDriver`][crate::TickDriver] calls.  Prefer it over
    /// `tick(now)` unless the caller keeps time on the same clock.
    pub fn tick_now(&self) -> SchedulerResult<TickReport> {
        self.tick(self.clock.now())
    }

    /// Advance every ready mover.
    ///
    /// `now` must come from the clock the scheduler was built with (see
    /// [`SchedulerBuilder::clock`][crate::SchedulerBuilder::clock]).  Creation
    /// and pause-release times are stamped from that clock, and readiness
    /// compares them against `now`; a `now` on another time base is not
    /// detected and stalls or rushes every mover.
    ///
    /// In activation order, each mover is:
    /// 1. finished, if its actor died and is not player-selectable or the
    ///    game is in turn mode;
    /// 2. finished, if it has no steps left;
    /// 3. otherwise stepped when ready, and finished if that step arrived or
    ///    halted it.
    ///
    /// Finished movers leave the active set before this returns.  If the
    /// global interrupt is set once the sweep is over (whether raised before
    /// the tick or by a step during it) the scheduler is cleared.
    ///
    /// # Errors
    ///
    /// The first collaborator error stops the sweep.  The mover that hit it
    /// and every mover not yet visited stay active, in order.
    pub fn tick(&self, now: Timestamp) -> SchedulerResult<TickReport> {
        let _gate = self.gate();
        let mut report = TickReport::default();

        let movers = std::mem::take(&mut *self.active());
        let mut survivors = Vec::with_capacity(movers.len());
        let mut failure = None;

        let mut pending = movers.into_iter();
        while let Some(mut mover) = pending.next() {
            match self.sweep_one(&mut mover, now, &mut report) {
                Ok(true) => {
                    self.live.fetch_sub(1, Ordering::AcqRel);
                }
                Ok(false) => survivors.push(mover),
                Err(e) => {
                    warn!(actor = %mover.actor(), error = %e, "tick aborted");
                    survivors.push(mover);
                    survivors.extend(pending);
                    failure = Some(e);
                    break;
                }
            }
        }
        self.restore(survivors);

        if let Some(e) = failure {
            return Err(e);
        }

        if self.interrupt.swap(false, Ordering::AcqRel) {
            report.interrupted = true;
            report.finished += self.clear_locked()?;
        }
        Ok(report)
    }

    /// Stop every active mover now.
    ///
    /// Two passes: first every actor stops counting as moving and loses its
    /// in-flight offset animation, then each mover runs tail recovery and
    /// finishes.  The first pass has to complete before any recovery so that
    /// the actors being cleared block each other.  Returns how many movers
    /// finished; `0` on an idle scheduler.
    ///
    /// # Errors
    ///
    /// A mover whose recovery fails stays active; the others still finish.
    /// The first such error is returned.
    pub fn clear(&self) -> SchedulerResult<usize> {
        let _gate = self.gate();
        self.clear_locked()
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// `Ok(true)` if `mover` finished and must be dropped.
    fn sweep_one(&self, mover: &mut Mover, now: Timestamp, report: &mut TickReport) -> SchedulerResult<bool> {
        if mover.is_finished() {
            return Ok(true);
        }

        let actor = mover.actor();
        let actors = &self.world.actors;
        if actors.is_dead(actor) && (!actors.is_player_selectable(actor) || self.world.combat.is_turn_mode()) {
            debug!(actor = %actor, "actor died while moving");
            self.finish(mover)?;
            report.finished += 1;
            return Ok(true);
        }

        if mover.is_exhausted() {
            self.finish(mover)?;
            report.finished += 1;
            return Ok(true);
        }

        if !mover.is_ready(now, &self.world)? {
            return Ok(false);
        }

        let step = match mover.advance(now, self.interrupt.load(Ordering::Acquire), &self.world) {
            Ok(step) => step,
            Err(e) => {
                if e.raised_interrupt() {
                    info!(actor = %actor, "failed step raised the movement interrupt");
                    self.interrupt.store(true, Ordering::Release);
                }
                return Err(e.into());
            }
        };
        report.stepped += 1;
        if step.raised_interrupt {
            info!(actor = %actor, cell = %step.cell, "step raised the movement interrupt");
            self.interrupt.store(true, Ordering::Release);
        }

        if step.is_done() {
            self.finish(mover)?;
            report.finished += 1;
            return Ok(true);
        }
        Ok(false)
    }

    /// Put `survivors` back ahead of movers added while the set was taken.
    fn restore(&self, mut survivors: Vec<Mover>) {
        let mut active = self.active();
        survivors.append(&mut active);
        *active = survivors;
    }

    fn clear_locked(&self) -> SchedulerResult<usize> {
        let movers = std::mem::take(&mut *self.active());
        if movers.is_empty() {
            return Ok(0);
        }
        info!(movers = movers.len(), "clearing all movers");

        for mover in &movers {
            mover.release(&self.world);
        }

        let mut finished = 0;
        let mut kept = Vec::new();
        let mut failure = None;
        for mut mover in movers {
            if mover.is_finished() {
                finished += 1;
                continue;
            }
            let outcome = mover
                .return_to_empty_tile(&self.world)
                .map_err(SchedulerError::from)
                .and_then(|_| self.finish(&mut mover));
            match outcome {
                Ok(()) => finished += 1,
                Err(e) => {
                    warn!(actor = %mover.actor(), error = %e, "mover could not be cleared");
                    // Still walking as far as the world is concerned.
                    self.world.actors.set_currently_moving(mover.actor(), true);
                    kept.push(mover);
                    failure.get_or_insert(e);
                }
            }
        }

        self.live.fetch_sub(finished, Ordering::AcqRel);
        if !kept.is_empty() {
            self.restore(kept);
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(finished),
        }
    }

    /// Free the actor for its next move, then finish the mover.
    fn finish(&self, mover: &mut Mover) -> SchedulerResult<()> {
        self.busy().remove(&mover.actor());
        mover.finish(&self.world)?;
        Ok(())
    }
}

impl std::fmt::Debug for MovementScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovementScheduler")
            .field("active", &self.active_count())
            .field("interrupt", &self.is_interrupt_pending())
            .field("mode", &self.movement_mode())
            .finish()
    }
}
