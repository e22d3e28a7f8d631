//! Grid occupancy queries.

use stride_core::{ActorId, Cell};

use crate::WorldResult;

/// Reports which actors stand on a cell.
///
/// Only used by tail recovery to find a cell where a stopped actor can rest.
/// The result includes moving actors; callers filter them out through
/// [`ActorRegistry::is_currently_moving`][crate::ActorRegistry::is_currently_moving].
pub trait Occupancy: Send + Sync + 'static {
    fn occupants_at(&self, cell: Cell) -> WorldResult<Vec<ActorId>>;
}
