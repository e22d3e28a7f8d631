//! `GridWorld`: a thread-safe, in-memory actor registry and occupancy index.
//!
//! Suitable for tests, tools and small games.  Larger hosts implement the
//! collaborator traits on top of their own entity storage instead.
//!
//! # Storage
//!
//! | Map                      | Purpose                                          |
//! |--------------------------|--------------------------------------------------|
//! | `ActorId → ActorRecord`  | position and flags of every registered actor     |
//! | `Cell → Vec<ActorId>`    | reverse index answering `occupants_at` in O(1)   |
//! | `Cell` set               | armed traps; each springs once                   |
//!
//! Both maps use `FxHash`: keys are small integers and the maps are hit on
//! every step.

use std::sync::{Mutex, MutexGuard, PoisonError};

use rustc_hash::{FxHashMap, FxHashSet};
use stride_core::{ActorId, Cell};
use tracing::debug;

use crate::{ActorRegistry, ActorTimer, Occupancy, WorldError, WorldResult};

/// Action points charged per step by the built-in timer.
const STEP_COST: u32 = 1;

// ── ActorSpec / ActorRecord ───────────────────────────────────────────────────

/// Initial state for [`GridWorld::spawn`].
#[derive(Clone, Debug)]
pub struct ActorSpec {
    pub position: Cell,
    /// Player-controlled actors trigger AI activation checks while moving.
    pub selectable: bool,
    /// `None` means unlimited.
    pub action_points: Option<u32>,
}

impl ActorSpec {
    /// A non-selectable actor with unlimited action points.
    pub fn at(position: Cell) -> Self {
        Self { position, selectable: false, action_points: None }
    }

    pub fn selectable(mut self) -> Self {
        self.selectable = true;
        self
    }

    pub fn action_points(mut self, points: u32) -> Self {
        self.action_points = Some(points);
        self
    }
}

/// Snapshot of one actor's state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActorRecord {
    pub position:      Cell,
    pub moving:        bool,
    pub dead:          bool,
    pub selectable:    bool,
    pub action_points: Option<u32>,
    /// Steps charged so far.
    pub steps_taken:   u32,
}

// ── GridWorld ─────────────────────────────────────────────────────────────────

#[derive(Default)]
struct GridState {
    actors:    FxHashMap<ActorId, ActorRecord>,
    occupancy: FxHashMap<Cell, Vec<ActorId>>,
    traps:     FxHashSet<Cell>,
    bounds:    Option<(i32, i32)>,
    next_id:   u32,
}

impl GridState {
    fn record(&self, actor: ActorId) -> WorldResult<&ActorRecord> {
        self.actors.get(&actor).ok_or(WorldError::UnknownActor(actor))
    }

    fn in_bounds(&self, cell: Cell) -> bool {
        match self.bounds {
            None => true,
            Some((w, h)) => cell.x >= 0 && cell.y >= 0 && cell.x < w && cell.y < h,
        }
    }

    fn unindex(&mut self, actor: ActorId, cell: Cell) {
        if let Some(list) = self.occupancy.get_mut(&cell) {
            list.retain(|&a| a != actor);
            if list.is_empty() {
                self.occupancy.remove(&cell);
            }
        }
    }
}

/// See the [module docs][self].
#[derive(Default)]
pub struct GridWorld {
    state: Mutex<GridState>,
}

impl GridWorld {
    /// An unbounded, empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty world whose valid cells are `0..width` × `0..height`.
    pub fn with_bounds(width: i32, height: i32) -> Self {
        let world = Self::default();
        world.state().bounds = Some((width, height));
        world
    }

    fn state(&self) -> MutexGuard<'_, GridState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new actor and index it at `spec.position`.
    pub fn spawn(&self, spec: ActorSpec) -> WorldResult<ActorId> {
        let mut state = self.state();
        if !state.in_bounds(spec.position) {
            return Err(WorldError::OutOfBounds(spec.position));
        }
        let id = ActorId(state.next_id);
        state.next_id += 1;
        state.actors.insert(id, ActorRecord {
            position:      spec.position,
            moving:        false,
            dead:          false,
            selectable:    spec.selectable,
            action_points: spec.action_points,
            steps_taken:   0,
        });
        state.occupancy.entry(spec.position).or_default().push(id);
        Ok(id)
    }

    /// Copy of `actor`'s current state.
    pub fn actor(&self, actor: ActorId) -> Option<ActorRecord> {
        self.state().actors.get(&actor).cloned()
    }

    pub fn set_dead(&self, actor: ActorId, dead: bool) -> WorldResult<()> {
        let mut state = self.state();
        let record = state.actors.get_mut(&actor).ok_or(WorldError::UnknownActor(actor))?;
        record.dead = dead;
        Ok(())
    }

    /// Restore `actor`'s action points (start of a new round).
    pub fn set_action_points(&self, actor: ActorId, points: Option<u32>) -> WorldResult<()> {
        let mut state = self.state();
        let record = state.actors.get_mut(&actor).ok_or(WorldError::UnknownActor(actor))?;
        record.action_points = points;
        Ok(())
    }

    /// Arm a trap on `cell`.  The first actor relocated onto it springs it.
    pub fn add_trap(&self, cell: Cell) {
        self.state().traps.insert(cell);
    }

    /// Every registered actor with its position, sorted by ID.
    pub fn positions(&self) -> Vec<(ActorId, Cell)> {
        let state = self.state();
        let mut out: Vec<_> = state.actors.iter().map(|(&id, r)| (id, r.position)).collect();
        out.sort_unstable();
        out
    }
}

impl ActorRegistry for GridWorld {
    fn position(&self, actor: ActorId) -> WorldResult<Cell> {
        Ok(self.state().record(actor)?.position)
    }

    fn relocate(&self, actor: ActorId, cell: Cell) -> WorldResult<bool> {
        let mut state = self.state();
        if !state.in_bounds(cell) {
            return Err(WorldError::OutOfBounds(cell));
        }
        let from = state.record(actor)?.position;
        if from != cell {
            state.unindex(actor, from);
            state.occupancy.entry(cell).or_default().push(actor);
            if let Some(record) = state.actors.get_mut(&actor) {
                record.position = cell;
            }
        }
        let sprung = state.traps.remove(&cell);
        if sprung {
            debug!(actor = %actor, cell = %cell, "trap sprung");
        }
        Ok(sprung)
    }

    fn set_currently_moving(&self, actor: ActorId, moving: bool) {
        if let Some(record) = self.state().actors.get_mut(&actor) {
            record.moving = moving;
        }
    }

    fn is_currently_moving(&self, actor: ActorId) -> bool {
        self.state().actors.get(&actor).is_some_and(|r| r.moving)
    }

    fn is_dead(&self, actor: ActorId) -> bool {
        self.state().actors.get(&actor).is_some_and(|r| r.dead)
    }

    fn is_player_selectable(&self, actor: ActorId) -> bool {
        self.state().actors.get(&actor).is_some_and(|r| r.selectable)
    }
}

impl Occupancy for GridWorld {
    fn occupants_at(&self, cell: Cell) -> WorldResult<Vec<ActorId>> {
        let state = self.state();
        if !state.in_bounds(cell) {
            return Err(WorldError::OutOfBounds(cell));
        }
        Ok(state.occupancy.get(&cell).cloned().unwrap_or_default())
    }
}

impl ActorTimer for GridWorld {
    fn can_perform_step(&self, actor: ActorId) -> bool {
        self.state()
            .actors
            .get(&actor)
            .is_some_and(|r| r.action_points.is_none_or(|ap| ap >= STEP_COST))
    }

    fn charge_step(&self, actor: ActorId, _cell: Cell) {
        if let Some(record) = self.state().actors.get_mut(&actor) {
            record.steps_taken += 1;
            if let Some(ap) = record.action_points.as_mut() {
                *ap = ap.saturating_sub(STEP_COST);
            }
        }
    }
}
