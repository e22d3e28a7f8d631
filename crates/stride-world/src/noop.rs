//! Default collaborators: used wherever a [`World`][crate::World] is built
//! without an explicit implementation.

use stride_core::{ActorId, Cell, CellDelta, PauseHandle};

use crate::{ActorTimer, AnimationSink, CombatMonitor, OpportunityHook, WorldResult};

/// An [`OpportunityHook`] that never provokes anything.
pub struct NeverProvoke;

impl OpportunityHook for NeverProvoke {
    fn maybe_provoke(&self, _actor: ActorId, _pause: &PauseHandle) -> WorldResult<bool> {
        Ok(false)
    }
}

/// An [`AnimationSink`] that drops every event.
pub struct NoopAnimationSink;

impl AnimationSink for NoopAnimationSink {
    fn emit_step_animation(&self, _actor: ActorId, _delta: CellDelta) {}
}

/// A [`CombatMonitor`] for a world without hostiles: no activations,
/// real-time mode.
pub struct Peaceful;

impl CombatMonitor for Peaceful {
    fn check_activation(&self) -> bool {
        false
    }
}

/// An [`ActorTimer`] with unlimited action points.
pub struct UnlimitedTimer;

impl ActorTimer for UnlimitedTimer {
    fn can_perform_step(&self, _actor: ActorId) -> bool {
        true
    }

    fn charge_step(&self, _actor: ActorId, _cell: Cell) {}
}
