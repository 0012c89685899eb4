//! Plain data row types.

use std::fmt;

use sirq_alloc::AllocationPolicy;
use sirq_core::VotClass;
use sirq_fleet::{Truck, TruckState};

/// Terminal outcome of one truck.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Served,
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Served => "served",
            Outcome::Failed => "failed",
        })
    }
}

/// Identifies one run inside a batch.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunKey {
    pub policy:          AllocationPolicy,
    pub load_multiplier: f64,
    pub replicate:       u32,
    pub seed:            u64,
}

/// One truck of one completed run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunRecord {
    pub policy:            AllocationPolicy,
    pub load_multiplier:   f64,
    pub replicate:         u32,
    pub seed:              u64,
    pub truck_id:          u32,
    pub class:             String,
    pub vot_per_hour:      f64,
    pub price_sensitivity: f64,
    pub arrival:           u64,
    pub deadline:          u64,
    pub charge_minutes:    u32,
    /// Until service start, or until failure.
    pub wait_minutes:      u64,
    pub service_start:     Option<u64>,
    pub service_end:       Option<u64>,
    pub final_bid:         f64,
    /// 0 if the truck failed.
    pub amount_paid:       f64,
    pub outcome:           Outcome,
}

impl RunRecord {
    /// Build the record of a truck in a terminal state; `None` otherwise.
    pub fn from_truck(key: &RunKey, truck: &Truck, class: &VotClass) -> Option<Self> {
        let (outcome, ended) = match truck.state {
            TruckState::Served => (Outcome::Served, truck.service_end?),
            TruckState::Failed => (Outcome::Failed, truck.failed_at?),
            _ => return None,
        };
        Some(Self {
            policy:            key.policy,
            load_multiplier:   key.load_multiplier,
            replicate:         key.replicate,
            seed:              key.seed,
            truck_id:          truck.id.0,
            class:             class.name.clone(),
            vot_per_hour:      truck.vot_per_hour,
            price_sensitivity: truck.price_sensitivity,
            arrival:           truck.arrival.0,
            deadline:          truck.deadline.0,
            charge_minutes:    truck.charge_minutes,
            wait_minutes:      truck.wait_minutes(ended),
            service_start:     truck.service_start.map(|t| t.0),
            service_end:       truck.service_end.map(|t| t.0),
            final_bid:         truck.current_bid,
            amount_paid:       truck.amount_paid,
            outcome,
        })
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        self.outcome == Outcome::Failed
    }
}

/// Station state after one processed timestamp.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimelineRow {
    pub tick:               u64,
    pub charging:           usize,
    pub queued:             usize,
    /// Revenue realized by served trucks up to and including `tick`.
    pub cumulative_revenue: f64,
}
