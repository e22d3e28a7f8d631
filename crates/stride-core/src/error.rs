//! Engine-wide base error type.
//!
//! Sub-crates define their own error enums and wrap `StrideError` via
//! `#[from]`, so a contract violation detected here surfaces unchanged at the
//! scheduler boundary.

use thiserror::Error;

/// Errors raised by `stride-core` primitives.
#[derive(Debug, Error)]
pub enum StrideError {
    #[error("pause count decremented below zero")]
    PauseUnderflow,

    #[error("pause count overflow")]
    PauseOverflow,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `stride-core`.
pub type StrideResult<T> = Result<T, StrideError>;
