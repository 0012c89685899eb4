//! `sirq-record` — turns one run's terminal transitions into flat records.
//!
//! [`RunRecorder`] is a [`SimObserver`][sirq_sim::SimObserver]: pass it to
//! `Station::run`, then call [`RunRecorder::finish`] with the run's generated
//! count to get a checked [`RunRecords`] (exactly one record per truck).
//!
//! Every [`RunRecord`] field is a scalar, an optional scalar or a string, so
//! the rows can be written by any tabular backend without reshaping.

pub mod error;
pub mod record;
pub mod recorder;


pub use error::{RecordError, RecordResult};
pub use record::{Outcome, RunKey, RunRecord, TimelineRow};
pub use recorder::{RunRecorder, RunRecords};
