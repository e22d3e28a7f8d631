//! Fluent builder for constructing a [`MovementScheduler`].

use std::sync::Arc;

use stride_core::{Clock, MovementConfig, SystemClock};
use stride_world::World;
use tracing::info;

use crate::{MovementScheduler, SchedulerResult};

/// Fluent builder for [`MovementScheduler`].
///
/// # Required inputs
///
/// - [`MovementConfig`]: step interval, backoff factor, tick cadence, mode
/// - [`World`]: the collaborators movers read and write
///
/// # Optional inputs (have defaults)
///
/// | Method       | Default                           |
/// |--------------|-----------------------------------|
/// | `.clock(c)`  | `SystemClock` started at `build`  |
///
/// # Example
///
/// ```rust,ignore
/// let clock = Arc::new(ManualClock::new(Timestamp::ZERO));
/// let scheduler = SchedulerBuilder::new(config, World::from_grid(grid))
///     .clock(clock.clone())
///     .build()?;
/// ```
pub struct SchedulerBuilder {
    config: MovementConfig,
    world:  World,
    clock:  Option<Arc<dyn Clock>>,
}

impl SchedulerBuilder {
    pub fn new(config: MovementConfig, world: World) -> Self {
        Self { config, world, clock: None }
    }

    /// Time source for pause resumes and `now()`.  Tests pass a
    /// [`ManualClock`][stride_core::ManualClock].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Validate the configuration and return an idle scheduler.
    pub fn build(self) -> SchedulerResult<MovementScheduler> {
        self.config.validate()?;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock::new()));
        info!(
            step_interval_ms = self.config.step_interval_ms,
            backoff_factor   = self.config.provoke_backoff_factor,
            mode             = %self.config.default_mode,
            "movement scheduler ready"
        );
        Ok(MovementScheduler::new(self.config, self.world, clock))
    }
}
