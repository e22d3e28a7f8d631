//! `stride-scheduler`: runs every active mover off one clock.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`scheduler`] | `MovementScheduler`, `TickReport`: the per-tick sweep      |
//! | [`builder`]   | `SchedulerBuilder`: config validation, clock selection     |
//! | [`driver`]    | `TickDriver`: a named thread calling `tick` at a cadence   |
//! | [`error`]     | `SchedulerError`, `SchedulerResult<T>`                     |
//!
//! # Quick start
//!
//! ```rust,ignore
//! let grid = Arc::new(GridWorld::new());
//! let hero = grid.spawn(ActorSpec::at(Cell::new(0, 0)))?;
//!
//! let scheduler = Arc::new(
//!     SchedulerBuilder::new(MovementConfig::default(), World::from_grid(grid)).build()?,
//! );
//! let driver = TickDriver::spawn(scheduler.clone())?;
//!
//! let handle = scheduler.add_move(hero, &[Cell::new(1, 0), Cell::new(2, 0)], true)?;
//! handle.wait();
//! driver.shutdown()?;
//! ```

pub mod builder;
pub mod driver;
pub mod error;
pub mod scheduler;


pub use builder::SchedulerBuilder;
pub use driver::TickDriver;
pub use error::{SchedulerError, SchedulerResult};
pub use scheduler::{MovementScheduler, TickReport};
