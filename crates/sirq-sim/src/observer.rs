//! Observer hooks for recording and progress reporting.

use sirq_alloc::Selection;
use sirq_core::{BayId, Tick, VotClass};
use sirq_fleet::Truck;

use crate::RunSummary;

/// One allocation decision, as made at `tick`.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct AllocationDecision {
    pub tick:      Tick,
    pub bay:       BayId,
    pub selection: Selection,
}

/// Station occupancy after all events of one timestamp are processed.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StationSnapshot {
    pub tick:      Tick,
    pub charging:  usize,
    pub queued:    usize,
    pub free_bays: usize,
}

/// Callbacks invoked by [`Station::run`][crate::Station::run].
///
/// All methods default to no-ops; implement only what you need.
///
/// # Example — failure counter
///
/// ```rust,ignore
/// struct Failures(usize);
///
/// impl SimObserver for Failures {
///     fn on_terminal(&mut self, truck: &Truck, _class: &VotClass) {
///         if truck.state == TruckState::Failed {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// A truck has been admitted and queued.
    fn on_arrival(&mut self, _truck: &Truck) {}

    /// A bay was granted.  `truck` is already `Charging` with its price paid.
    fn on_allocation(&mut self, _decision: &AllocationDecision, _truck: &Truck) {}

    /// A truck reached `Served` or `Failed`.  Called exactly once per truck.
    fn on_terminal(&mut self, _truck: &Truck, _class: &VotClass) {}

    /// Called once per processed timestamp.
    fn on_timestamp_end(&mut self, _snapshot: &StationSnapshot) {}

    /// Called once after the event queue is exhausted and the run verified.
    fn on_run_end(&mut self, _summary: &RunSummary) {}
}

/// A [`SimObserver`] that ignores every callback.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
