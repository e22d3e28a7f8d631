use stride_core::{ActorId, StrideError};
use stride_mover::MoverError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("mover error: {0}")]
    Mover(#[from] MoverError),

    #[error("{0} already has an active mover")]
    ActorBusy(ActorId),

    #[error("the tick driver thread panicked")]
    DriverPanicked,

    #[error(transparent)]
    Core(#[from] StrideError),
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;
