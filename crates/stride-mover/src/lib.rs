//! `stride-mover`: moves one actor along one path.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`mover`]  | `Mover`: readiness, stepping, tail recovery, finish          |
//! | [`handle`] | `MoverHandle`: pause, settings, callbacks, waiting           |
//! | [`error`]  | `MoverError`, `MoverResult<T>`                               |
//!
//! A `Mover` is owned by whoever drives it (normally the scheduler's tick
//! thread) and is never shared.  Other threads talk to it through a
//! [`MoverHandle`], which only touches atomics, two small mutexes and the
//! completion channel.
//!
//! # Timing
//!
//! All timing is in milliseconds of [`Timestamp`][stride_core::Timestamp].
//! A mover steps when strictly more than `step_interval` milliseconds have
//! passed since its last step, its creation, or its most recent resume.

pub mod error;
pub mod handle;
pub mod mover;


pub use error::{MoverError, MoverResult};
pub use handle::{Callback, MoverHandle};
pub use mover::{Mover, StepReport, StepStatus};
