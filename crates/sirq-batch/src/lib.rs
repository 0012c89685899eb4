//! `sirq-batch` — Monte Carlo sweeps over policies, load multipliers and
//! replicates.
//!
//! # Run plan
//!
//! A batch executes `|policies| × |load_multipliers| × replicates` runs.
//! Run seeds come from the master seed and the scenario index
//! `load_index × replicates + replicate`, so both policies of one
//! (load, replicate) pair face the identical truck sequence.
//!
//! Runs share no mutable state.  Results are collected in run-plan order,
//! so a batch's output does not depend on the worker count.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the plan on a Rayon pool (`num_threads` or all cores). |
//! | `serde`    | `Serialize`/`Deserialize` for `BatchConfig`.           |
//!
//! Progress is reported through the `log` facade; this crate never installs
//! a logger.

pub mod cancel;
pub mod config;
pub mod error;
pub mod runner;

#[cfg(test)]
mod tests;

pub use cancel::CancelToken;
pub use config::{BatchConfig, RunSpec};
pub use error::{BatchError, BatchResult};
pub use runner::{BatchOutput, RunFailure, run_batch, run_batch_sequential, run_one};
