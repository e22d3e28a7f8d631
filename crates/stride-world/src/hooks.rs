//! Callbacks the engine fires while moving actors.

use stride_core::{ActorId, Cell, CellDelta, PauseHandle};

use crate::WorldResult;

/// Action-point bookkeeping.
pub trait ActorTimer: Send + Sync + 'static {
    /// `true` if `actor` can afford one more step.
    fn can_perform_step(&self, actor: ActorId) -> bool;

    /// Deduct the cost of stepping onto `cell`.
    fn charge_step(&self, actor: ActorId, cell: Cell);
}

/// Fire-and-forget visual notifications.
///
/// Never awaited: implementations should queue the event and return.
pub trait AnimationSink: Send + Sync + 'static {
    /// Animate `actor` by `delta` cells from where it is drawn now.
    fn emit_step_animation(&self, actor: ActorId, delta: CellDelta);

    /// Drop whatever offset animation `actor` is still playing.
    fn cancel_offset_animation(&self, _actor: ActorId) {}

    /// Point the camera at `actor` once its current animation settles.
    fn follow_actor(&self, _actor: ActorId) {}
}

/// Decides whether stepping on provokes a hostile reaction.
///
/// # Inversion of control
///
/// When `maybe_provoke` returns `true`, the hook has taken responsibility
/// for the pause: it must call `pause.increment_pause()` before returning and
/// `pause.decrement_pause()` once the reaction is resolved, possibly from
/// another thread and possibly much later.  The mover never pauses itself.
pub trait OpportunityHook: Send + Sync + 'static {
    fn maybe_provoke(&self, actor: ActorId, pause: &PauseHandle) -> WorldResult<bool>;
}

impl<F> OpportunityHook for F
where
    F: Fn(ActorId, &PauseHandle) -> WorldResult<bool> + Send + Sync + 'static,
{
    fn maybe_provoke(&self, actor: ActorId, pause: &PauseHandle) -> WorldResult<bool> {
        self(actor, pause)
    }
}

/// Combat state consulted during movement.
pub trait CombatMonitor: Send + Sync + 'static {
    /// Checked once per step of a player-selectable actor.  `true` means
    /// hostile AI noticed the party and all movement must stop.
    fn check_activation(&self) -> bool;

    /// `true` while the engine runs in turn-based mode.
    fn is_turn_mode(&self) -> bool {
        false
    }
}
