//! Simulator error type.
//!
//! Sub-crates define their own error enums and wrap `SirqError` as one
//! variant via `#[from]`, so configuration problems surface unchanged at
//! every layer.

use thiserror::Error;

use crate::VotClassId;

/// The top-level error type for `sirq-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum SirqError {
    /// Invalid or out-of-range configuration.  Always raised before a run
    /// starts; a run never executes with parameters that failed validation.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("value-of-time class {0} not found")]
    UnknownClass(VotClassId),
}

/// Shorthand result type for all `sirq-*` crates.
pub type SirqResult<T> = Result<T, SirqError>;
