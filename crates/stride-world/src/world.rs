//! The bundle of collaborators handed to every mover.

use std::sync::Arc;

use stride_core::{ActorId, Cell};

use crate::{
    ActorRegistry, ActorTimer, AnimationSink, CombatMonitor, GridWorld, NeverProvoke,
    NoopAnimationSink, Occupancy, OpportunityHook, Peaceful, UnlimitedTimer, WorldResult,
};

/// Shared references to everything the engine consumes.
///
/// Cloning is cheap (six `Arc` bumps).  Only the actor registry and the
/// occupancy query are required; the remaining collaborators default to the
/// no-op implementations in [`noop`][crate::noop].
///
/// ```rust,ignore
/// let grid = Arc::new(GridWorld::new());
/// let world = World::from_grid(grid)
///     .with_animation(Arc::new(AnimationLog::new()))
///     .with_opportunity_hook(Arc::new(my_hook));
/// ```
#[derive(Clone)]
pub struct World {
    pub actors:      Arc<dyn ActorRegistry>,
    pub occupancy:   Arc<dyn Occupancy>,
    pub timer:       Arc<dyn ActorTimer>,
    pub animation:   Arc<dyn AnimationSink>,
    pub opportunity: Arc<dyn OpportunityHook>,
    pub combat:      Arc<dyn CombatMonitor>,
}

impl World {
    pub fn new(actors: Arc<dyn ActorRegistry>, occupancy: Arc<dyn Occupancy>) -> Self {
        Self {
            actors,
            occupancy,
            timer:       Arc::new(UnlimitedTimer),
            animation:   Arc::new(NoopAnimationSink),
            opportunity: Arc::new(NeverProvoke),
            combat:      Arc::new(Peaceful),
        }
    }

    /// Use `grid` as registry, occupancy index and action-point timer.
    pub fn from_grid(grid: Arc<GridWorld>) -> Self {
        Self::new(grid.clone(), grid.clone()).with_timer(grid)
    }

    pub fn with_timer(mut self, timer: Arc<dyn ActorTimer>) -> Self {
        self.timer = timer;
        self
    }

    pub fn with_animation(mut self, animation: Arc<dyn AnimationSink>) -> Self {
        self.animation = animation;
        self
    }

    pub fn with_opportunity_hook(mut self, hook: Arc<dyn OpportunityHook>) -> Self {
        self.opportunity = hook;
        self
    }

    pub fn with_combat_monitor(mut self, combat: Arc<dyn CombatMonitor>) -> Self {
        self.combat = combat;
        self
    }

    /// Number of actors other than `actor` standing still on `cell`.
    ///
    /// Moving actors are only passing through and do not block.
    pub fn stationary_blockers(&self, cell: Cell, actor: ActorId) -> WorldResult<usize> {
        let occupants = self.occupancy.occupants_at(cell)?;
        Ok(occupants
            .into_iter()
            .filter(|&other| other != actor && !self.actors.is_currently_moving(other))
            .count())
    }
}
