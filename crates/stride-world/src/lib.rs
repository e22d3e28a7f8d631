//! `stride-world`: everything the movement engine consumes but does not own.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`actors`]    | `ActorRegistry`: positions and per-actor flags                  |
//! | [`occupancy`] | `Occupancy`: who stands on a cell                               |
//! | [`hooks`]     | `ActorTimer`, `AnimationSink`, `OpportunityHook`, `CombatMonitor` |
//! | [`world`]     | `World`: the bundle of collaborators handed to movers           |
//! | [`noop`]      | Do-nothing collaborators used as defaults                       |
//! | [`record`]    | `AnimationLog`: an animation sink that keeps what it receives   |
//! | [`grid`]      | `GridWorld`: thread-safe in-memory registry + occupancy index   |
//! | [`error`]     | `WorldError`, `WorldResult<T>`                                  |
//!
//! # Threading
//!
//! Every trait here is `Send + Sync` and takes `&self`: collaborators are
//! shared between the tick thread and whichever threads start moves, so
//! implementations use interior mutability.
//!
//! Hooks are invoked from inside `tick`.  They may start new moves, raise the
//! global interrupt and use the `PauseHandle` they are given, but must not
//! call `clear` or `tick` on the scheduler that invoked them.

pub mod actors;
pub mod error;
pub mod grid;
pub mod hooks;
pub mod noop;
pub mod occupancy;
pub mod record;
pub mod world;

#[cfg(test)]
mod tests;

pub use actors::ActorRegistry;
pub use error::{WorldError, WorldResult};
pub use grid::{ActorRecord, ActorSpec, GridWorld};
pub use hooks::{ActorTimer, AnimationSink, CombatMonitor, OpportunityHook};
pub use noop::{NeverProvoke, NoopAnimationSink, Peaceful, UnlimitedTimer};
pub use occupancy::Occupancy;
pub use record::{AnimationEvent, AnimationLog};
pub use world::World;
