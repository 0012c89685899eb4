//! `sirq-stats` — turns a batch's run records into a [`BatchReport`].
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`metrics`]  | `MetricSummary` (mean, SD, SE, 95% CI), `median`, `gini`   |
//! | [`report`]   | `GroupSummary`, `ClassSummary`, `PolicyDelta`, `BatchReport` |
//!
//! Replicate-level metrics (mean wait, total revenue, failure rate) are
//! summarized across the runs of one (policy, load) group with a normal 95%
//! interval.  Distributional metrics (median wait, Gini) pool every truck of
//! the group.

pub mod metrics;
pub mod report;


pub use metrics::{MetricSummary, Z_95, gini, mean, median};
pub use report::{BatchReport, ClassSummary, GroupSummary, PolicyDelta, RunAccounting};
