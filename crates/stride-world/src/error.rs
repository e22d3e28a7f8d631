use stride_core::{ActorId, Cell, StrideError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("actor {0} is not registered")]
    UnknownActor(ActorId),

    #[error("cell {0} is outside the world")]
    OutOfBounds(Cell),

    #[error("collaborator failure: {0}")]
    Collaborator(String),

    /// A hook misused the pause handle it was given.
    #[error("pause handle misuse: {0}")]
    Pause(#[from] StrideError),
}

pub type WorldResult<T> = Result<T, WorldError>;
