use stride_core::{ActorId, StrideError};
use stride_world::WorldError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MoverError {
    #[error("mover for {0} has finished and cannot advance")]
    Finished(ActorId),

    #[error("mover for {0} was already finished")]
    AlreadyFinished(ActorId),

    #[error("mover for {0} has no steps left")]
    PathExhausted(ActorId),

    /// The step raised the global interrupt before `source` stopped it.
    #[error("step by {actor} raised the movement interrupt, then failed: {source}")]
    RaisedInterrupt {
        actor:  ActorId,
        #[source]
        source: Box<MoverError>,
    },

    #[error("world error: {0}")]
    World(#[from] WorldError),

    #[error(transparent)]
    Core(#[from] StrideError),
}

impl MoverError {
    /// `true` if the failing step still requires a global interrupt.
    pub fn raised_interrupt(&self) -> bool {
        matches!(self, MoverError::RaisedInterrupt { .. })
    }
}

pub type MoverResult<T> = Result<T, MoverError>;
