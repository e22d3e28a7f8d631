//! The guard's attack of opportunity.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use stride_core::{ActorId, PauseHandle};
use stride_world::{ActorRegistry, GridWorld, OpportunityHook, WorldResult};
use tracing::{info, warn};

/// Swings once at every actor that leaves a cell next to its post.
pub struct Guard {
    id:       ActorId,
    grid:     Arc<GridWorld>,
    swing_ms: u64,
    /// Actors already swung at; one attack each.
    struck:   Mutex<Vec<ActorId>>,
    swings:   AtomicUsize,
}

impl Guard {
    pub fn new(id: ActorId, grid: Arc<GridWorld>, swing_ms: u64) -> Self {
        Self { id, grid, swing_ms, struck: Mutex::new(Vec::new()), swings: AtomicUsize::new(0) }
    }

    pub fn swings(&self) -> usize {
        self.swings.load(Ordering::Acquire)
    }
}

impl OpportunityHook for Guard {
    fn maybe_provoke(&self, actor: ActorId, pause: &PauseHandle) -> WorldResult<bool> {
        if actor == self.id || self.grid.is_dead(self.id) {
            return Ok(false);
        }
        let post = self.grid.position(self.id)?;
        if !self.grid.position(actor)?.is_adjacent(post) {
            return Ok(false);
        }

        let mut struck = self.struck.lock().unwrap_or_else(PoisonError::into_inner);
        if struck.contains(&actor) {
            return Ok(false);
        }
        struck.push(actor);

        pause.increment_pause()?;
        self.swings.fetch_add(1, Ordering::AcqRel);
        info!(actor = %actor, guard = %self.id, "attack of opportunity");

        let release = pause.clone();
        let swing = Duration::from_millis(self.swing_ms);
        let spawned = thread::Builder::new().name("guard-swing".into()).spawn(move || {
            thread::sleep(swing);
            if let Err(e) = release.decrement_pause() {
                warn!(error = %e, "swing resolved twice");
            }
        });
        if let Err(e) = spawned {
            // Never leave the mover frozen.
            pause.decrement_pause()?;
            warn!(error = %e, "could not resolve the swing on its own thread");
        }
        Ok(true)
    }
}
