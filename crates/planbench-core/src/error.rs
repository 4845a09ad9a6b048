//! Error types for planbench

use thiserror::Error;

/// Protocol violations raised by benchmark run records.
///
/// A failed *run* is not an error at this level: it is captured as a value
/// on the finalized record. These variants signal misuse of the record API
/// by harness code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BenchmarkError {
    /// An argument was outside its allowed domain (empty id, negative metric).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation was invalid for the record's current lifecycle state.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl BenchmarkError {
    /// Returns true for [`BenchmarkError::InvalidArgument`].
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, BenchmarkError::InvalidArgument(_))
    }

    /// Returns true for [`BenchmarkError::InvalidState`].
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, BenchmarkError::InvalidState(_))
    }
}

/// Result type alias for planbench operations
pub type Result<T> = std::result::Result<T, BenchmarkError>;
