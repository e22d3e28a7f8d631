//! A background thread that calls [`MovementScheduler::tick`] at a fixed
//! cadence.
//!
//! The driver sleeps for whatever is left of `tick_cadence_ms` after each
//! tick; a tick that overruns its budget is followed immediately by the next.
//! The first tick error stops the thread.  It is logged there and handed
//! back by [`TickDriver::shutdown`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use stride_core::StrideError;
use tracing::{debug, error};

use crate::{MovementScheduler, SchedulerError, SchedulerResult};

pub const THREAD_NAME: &str = "stride-tick";

/// Owns the tick thread.  Dropping the driver stops and joins it.
pub struct TickDriver {
    shutdown: Arc<AtomicBool>,
    thread:   Option<JoinHandle<SchedulerResult<u64>>>,
}

impl TickDriver {
    /// Start ticking `scheduler` every `scheduler.config().tick_cadence_ms`.
    pub fn spawn(scheduler: Arc<MovementScheduler>) -> SchedulerResult<Self> {
        let cadence = Duration::from_millis(scheduler.config().tick_cadence_ms);
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);

        let thread = thread::Builder::new()
            .name(THREAD_NAME.into())
            .spawn(move || run(&scheduler, &flag, cadence))
            .map_err(StrideError::from)?;

        debug!(cadence_ms = cadence.as_millis() as u64, "tick driver started");
        Ok(Self { shutdown, thread: Some(thread) })
    }

    /// `false` once the thread has exited, either after `shutdown` or
    /// because a tick failed.
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the thread and wait for it.  Returns the number of ticks run, or
    /// the error that stopped the thread early.
    pub fn shutdown(mut self) -> SchedulerResult<u64> {
        self.stop()
    }

    fn stop(&mut self) -> SchedulerResult<u64> {
        self.shutdown.store(true, Ordering::Release);
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| SchedulerError::DriverPanicked)?,
            None => Ok(0),
        }
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            error!(error = %e, "tick driver ended with an error");
        }
    }
}

fn run(scheduler: &MovementScheduler, shutdown: &AtomicBool, cadence: Duration) -> SchedulerResult<u64> {
    let mut ticks = 0u64;
    while !shutdown.load(Ordering::Acquire) {
        let started = Instant::now();

        if let Err(e) = scheduler.tick_now() {
            error!(error = %e, ticks, "tick failed; stopping the driver");
            return Err(e);
        }
        ticks += 1;

        if let Some(rest) = cadence.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }
    debug!(ticks, "tick driver stopped");
    Ok(ticks)
}
