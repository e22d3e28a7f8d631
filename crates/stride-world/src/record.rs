//! An animation sink that remembers everything it was sent.

use std::sync::{Mutex, PoisonError};

use stride_core::{ActorId, CellDelta};

use crate::AnimationSink;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AnimationEvent {
    Step { actor: ActorId, delta: CellDelta },
    Cancel { actor: ActorId },
    Follow { actor: ActorId },
}

/// Collects [`AnimationEvent`]s in arrival order.
#[derive(Default)]
pub struct AnimationLog {
    events: Mutex<Vec<AnimationEvent>>,
}

impl AnimationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every event received so far.
    pub fn events(&self) -> Vec<AnimationEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Step animations emitted for `actor`, in order.
    pub fn steps_for(&self, actor: ActorId) -> Vec<CellDelta> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                AnimationEvent::Step { actor: a, delta } if a == actor => Some(delta),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, event: AnimationEvent) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event);
    }
}

impl AnimationSink for AnimationLog {
    fn emit_step_animation(&self, actor: ActorId, delta: CellDelta) {
        self.push(AnimationEvent::Step { actor, delta });
    }

    fn cancel_offset_animation(&self, actor: ActorId) {
        self.push(AnimationEvent::Cancel { actor });
    }

    fn follow_actor(&self, actor: ActorId) {
        self.push(AnimationEvent::Follow { actor });
    }
}
