//! The `BidEngine`.

use sirq_core::{MINUTES_PER_HOUR, StationConfig, Tick};
use sirq_fleet::Truck;

/// Prices trucks for the auction and books the flat fee for FIFO.
///
/// Holds only immutable station parameters, so one engine can be shared by
/// every decision point of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct BidEngine {
    base_fee:             f64,
    bay_count:            f64,
    mean_service_minutes: f64,
}

impl BidEngine {
    /// Build from a validated station configuration.
    pub fn new(config: &StationConfig) -> Self {
        Self::from_parts(config.base_fee, config.bay_count, config.mean_charge_minutes())
    }

    pub fn from_parts(base_fee: f64, bay_count: u16, mean_service_minutes: f64) -> Self {
        Self {
            base_fee,
            bay_count: f64::from(bay_count.max(1)),
            mean_service_minutes,
        }
    }

    /// The entry fee every served truck pays at minimum.
    #[inline]
    pub fn base_fee(&self) -> f64 {
        self.base_fee
    }

    /// The truck's estimate of its total queueing delay at `now`, in minutes:
    /// the wait it has already measured plus the time for `queue_depth`
    /// trucks to turn over through the bay pool.
    pub fn expected_wait(&self, truck: &Truck, now: Tick, queue_depth: usize) -> f64 {
        let waited = now.since(truck.arrival) as f64;
        let backlog = queue_depth as f64 * self.mean_service_minutes / self.bay_count;
        waited + backlog
    }

    /// Monetary bid for a truck expecting to wait `expected_wait_minutes`.
    pub fn bid(&self, truck: &Truck, expected_wait_minutes: f64) -> f64 {
        let premium = truck.vot_per_hour * expected_wait_minutes.max(0.0) / MINUTES_PER_HOUR as f64;
        let damped = premium / (1.0 + truck.price_sensitivity * premium / self.base_fee);
        (self.base_fee + damped).min(truck.max_bid.max(self.base_fee))
    }

    /// Expected wait and bid in one step.
    pub fn price(&self, truck: &Truck, now: Tick, queue_depth: usize) -> f64 {
        self.bid(truck, self.expected_wait(truck, now, queue_depth))
    }

    /// Upper bound the damping alone imposes on `truck`'s bid.
    pub fn soft_ceiling(&self, truck: &Truck) -> f64 {
        if truck.price_sensitivity > 0.0 {
            self.base_fee * (1.0 + 1.0 / truck.price_sensitivity)
        } else {
            f64::INFINITY
        }
    }
}
