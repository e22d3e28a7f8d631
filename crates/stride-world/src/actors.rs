//! The actor registry: external owner of every actor the engine moves.

use stride_core::{ActorId, Cell};

use crate::WorldResult;

/// Positions and per-actor state flags.
///
/// The movement engine borrows actors by [`ActorId`] and never owns their
/// lifetime.  The "currently moving" flag is set for the whole duration of a
/// move; occupancy checks ignore actors that carry it.
pub trait ActorRegistry: Send + Sync + 'static {
    /// Current cell of `actor`.
    fn position(&self, actor: ActorId) -> WorldResult<Cell>;

    /// Place `actor` on `cell`.
    ///
    /// Returns `true` if arriving on `cell` interrupts movement (a trap
    /// springs, the actor is spotted, …).  The engine turns that into a
    /// global interrupt when it happens during a step.
    fn relocate(&self, actor: ActorId, cell: Cell) -> WorldResult<bool>;

    fn set_currently_moving(&self, actor: ActorId, moving: bool);

    fn is_currently_moving(&self, actor: ActorId) -> bool;

    fn is_dead(&self, actor: ActorId) -> bool;

    /// `true` for actors under player control.
    fn is_player_selectable(&self, actor: ActorId) -> bool;

    /// Recompute what `actor` can see after a position change.
    fn refresh_visibility(&self, _actor: ActorId) {}
}
