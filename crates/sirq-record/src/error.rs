//! Error types for sirq-record.

use sirq_core::TruckId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("expected one record per generated truck ({expected}), got {got}")]
    MissingRecords { expected: usize, got: usize },

    #[error("{0} was recorded more than once")]
    DuplicateRecord(TruckId),
}

/// Alias for `Result<T, RecordError>`.
pub type RecordResult<T> = Result<T, RecordError>;
