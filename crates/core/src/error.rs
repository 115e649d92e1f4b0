//! Error type for engine operations

use thiserror::Error;

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller passed a buffer or parameter outside its contract
    InvalidArgument,
    /// The engine is not in a state that allows the operation
    InvalidState,
}

/// Errors returned by [`MiningEngine`](crate::MiningEngine).
///
/// Every error is raised before any engine state is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{field} must be at least {min} bytes, got {len}")]
    InputTooShort {
        field: &'static str,
        min: usize,
        len: usize,
    },

    #[error("header prefix must be exactly 140 bytes, got {0}")]
    HeaderPrefixLength(usize),

    #[error("rounds must be 256-2048, got {0}")]
    RoundsOutOfRange(usize),

    #[error("scratchpad not initialized")]
    NotInitialized,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotInitialized => ErrorKind::InvalidState,
            Error::InputTooShort { .. }
            | Error::HeaderPrefixLength(_)
            | Error::RoundsOutOfRange(_) => ErrorKind::InvalidArgument,
        }
    }
}
