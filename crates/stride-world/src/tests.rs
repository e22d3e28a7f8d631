//! Unit tests for stride-world.

use std::sync::Arc;

use stride_core::{ActorId, Cell, CellDelta, Clock, ManualClock, PauseCounter, Timestamp};

use crate::{
    ActorRegistry, ActorSpec, ActorTimer, AnimationEvent, AnimationLog, AnimationSink, GridWorld,
    Occupancy, OpportunityHook, World, WorldError,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn pause_counter() -> PauseCounter {
    PauseCounter::new(Arc::new(ManualClock::new(Timestamp(0))) as Arc<dyn Clock>)
}

// ── GridWorld ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod grid_world {
    use super::*;

    #[test]
    fn spawn_indexes_position() {
        let grid = GridWorld::new();
        let a = grid.spawn(ActorSpec::at(Cell::new(1, 1))).unwrap();
        let b = grid.spawn(ActorSpec::at(Cell::new(1, 1))).unwrap();
        assert_ne!(a, b);
        assert_eq!(grid.occupants_at(Cell::new(1, 1)).unwrap(), vec![a, b]);
        assert!(grid.occupants_at(Cell::new(0, 0)).unwrap().is_empty());
    }

    #[test]
    fn relocate_moves_index_entry() {
        let grid = GridWorld::new();
        let a = grid.spawn(ActorSpec::at(Cell::new(0, 0))).unwrap();
        assert!(!grid.relocate(a, Cell::new(0, 1)).unwrap());
        assert_eq!(grid.position(a).unwrap(), Cell::new(0, 1));
        assert!(grid.occupants_at(Cell::new(0, 0)).unwrap().is_empty());
        assert_eq!(grid.occupants_at(Cell::new(0, 1)).unwrap(), vec![a]);
    }

    #[test]
    fn unknown_actor_errors() {
        let grid = GridWorld::new();
        let result = grid.position(ActorId(99));
        assert!(matches!(result, Err(WorldError::UnknownActor(ActorId(99)))));
        assert!(grid.relocate(ActorId(99), Cell::new(0, 0)).is_err());
        assert!(!grid.is_currently_moving(ActorId(99)));
    }

    #[test]
    fn bounds_are_enforced() {
        let grid = GridWorld::with_bounds(4, 4);
        assert!(matches!(
            grid.spawn(ActorSpec::at(Cell::new(4, 0))),
            Err(WorldError::OutOfBounds(_))
        ));
        let a = grid.spawn(ActorSpec::at(Cell::new(3, 3))).unwrap();
        assert!(grid.relocate(a, Cell::new(-1, 3)).is_err());
        assert!(grid.occupants_at(Cell::new(9, 9)).is_err());
        assert_eq!(grid.position(a).unwrap(), Cell::new(3, 3));
    }

    #[test]
    fn trap_springs_once() {
        let grid = GridWorld::new();
        let a = grid.spawn(ActorSpec::at(Cell::new(0, 0))).unwrap();
        grid.add_trap(Cell::new(1, 0));
        assert!(grid.relocate(a, Cell::new(1, 0)).unwrap());
        grid.relocate(a, Cell::new(0, 0)).unwrap();
        assert!(!grid.relocate(a, Cell::new(1, 0)).unwrap());
    }

    #[test]
    fn flags_roundtrip() {
        let grid = GridWorld::new();
        let a = grid.spawn(ActorSpec::at(Cell::new(0, 0)).selectable()).unwrap();
        assert!(grid.is_player_selectable(a));
        grid.set_currently_moving(a, true);
        assert!(grid.is_currently_moving(a));
        grid.set_dead(a, true).unwrap();
        assert!(grid.is_dead(a));
        let record = grid.actor(a).unwrap();
        assert!(record.moving && record.dead && record.selectable);
    }

    #[test]
    fn action_points_limit_steps() {
        let grid = GridWorld::new();
        let a = grid.spawn(ActorSpec::at(Cell::new(0, 0)).action_points(2)).unwrap();
        assert!(grid.can_perform_step(a));
        grid.charge_step(a, Cell::new(0, 1));
        grid.charge_step(a, Cell::new(0, 2));
        assert!(!grid.can_perform_step(a));
        assert_eq!(grid.actor(a).unwrap().steps_taken, 2);

        grid.set_action_points(a, None).unwrap();
        assert!(grid.can_perform_step(a));
    }

    #[test]
    fn positions_sorted_by_id() {
        let grid = GridWorld::new();
        let a = grid.spawn(ActorSpec::at(Cell::new(5, 5))).unwrap();
        let b = grid.spawn(ActorSpec::at(Cell::new(1, 1))).unwrap();
        assert_eq!(grid.positions(), vec![(a, Cell::new(5, 5)), (b, Cell::new(1, 1))]);
    }
}

// ── World bundle ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod world_bundle {
    use super::*;

    #[test]
    fn stationary_blockers_ignore_self_and_movers() {
        let grid = Arc::new(GridWorld::new());
        let cell = Cell::new(2, 2);
        let me = grid.spawn(ActorSpec::at(cell)).unwrap();
        let walker = grid.spawn(ActorSpec::at(cell)).unwrap();
        let sitter = grid.spawn(ActorSpec::at(cell)).unwrap();
        grid.set_currently_moving(walker, true);

        let world = World::from_grid(grid.clone());
        assert_eq!(world.stationary_blockers(cell, me).unwrap(), 1);

        grid.set_currently_moving(sitter, true);
        assert_eq!(world.stationary_blockers(cell, me).unwrap(), 0);
    }

    #[test]
    fn defaults_are_inert() {
        let grid = Arc::new(GridWorld::new());
        let a = grid.spawn(ActorSpec::at(Cell::new(0, 0))).unwrap();
        let world = World::from_grid(grid);
        let counter = pause_counter();
        assert!(!world.opportunity.maybe_provoke(a, &counter.handle()).unwrap());
        assert!(!world.combat.check_activation());
        assert!(!world.combat.is_turn_mode());
        assert!(!counter.is_paused());
    }

    #[test]
    fn closure_hook_can_pause() {
        let grid = Arc::new(GridWorld::new());
        let a = grid.spawn(ActorSpec::at(Cell::new(0, 0))).unwrap();
        let hook = |_actor: ActorId, pause: &stride_core::PauseHandle| -> crate::WorldResult<bool> {
            pause.increment_pause()?;
            Ok(true)
        };
        let world = World::from_grid(grid).with_opportunity_hook(Arc::new(hook));
        let counter = pause_counter();
        assert!(world.opportunity.maybe_provoke(a, &counter.handle()).unwrap());
        assert_eq!(counter.count(), 1);
    }
}

// ── AnimationLog ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod animation_log {
    use super::*;

    #[test]
    fn records_in_order() {
        let log = AnimationLog::new();
        let a = ActorId(0);
        log.emit_step_animation(a, CellDelta { dx: 1, dy: 0 });
        log.cancel_offset_animation(a);
        log.follow_actor(a);
        assert_eq!(log.events(), vec![
            AnimationEvent::Step { actor: a, delta: CellDelta { dx: 1, dy: 0 } },
            AnimationEvent::Cancel { actor: a },
            AnimationEvent::Follow { actor: a },
        ]);
        assert_eq!(log.steps_for(a), vec![CellDelta { dx: 1, dy: 0 }]);
        assert!(log.steps_for(ActorId(1)).is_empty());
    }
}
