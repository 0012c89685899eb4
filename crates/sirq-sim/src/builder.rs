//! Fluent builder for constructing a [`Station`].

use sirq_alloc::{AllocationPolicy, BayPool, PendingQueue};
use sirq_bid::BidEngine;
use sirq_core::{SimClock, SirqError, StationConfig, Tick};
use sirq_fleet::{ArrivalGenerator, Truck};

use crate::station::ArrivalSource;
use crate::{EventQueue, SimResult, Station};

enum Source {
    Generator { load_multiplier: f64, seed: u64 },
    Scripted(ArrivalSource),
}

/// Fluent builder for [`Station`].
///
/// # Required inputs
///
/// - [`StationConfig`] — bays, demand, classes, fees
/// - [`AllocationPolicy`] — FIFO or auction
/// - one arrival source: [`generator`][Self::generator] for a seeded
///   Poisson stream, or [`arrivals`][Self::arrivals] for a scripted scenario
///
/// # Example
///
/// ```rust,ignore
/// let station = StationBuilder::new(config, AllocationPolicy::Fifo)
///     .arrivals(scripted_trucks)
///     .build()?;
/// let summary = station.run(&mut NoopObserver)?;
/// ```
pub struct StationBuilder {
    config: StationConfig,
    policy: AllocationPolicy,
    source: Option<Source>,
}

impl StationBuilder {
    pub fn new(config: StationConfig, policy: AllocationPolicy) -> Self {
        Self { config, policy, source: None }
    }

    /// Draw arrivals from an [`ArrivalGenerator`] seeded with `seed`.
    pub fn generator(mut self, load_multiplier: f64, seed: u64) -> Self {
        self.source = Some(Source::Generator { load_multiplier, seed });
        self
    }

    /// Use an explicit arrival sequence.
    ///
    /// Trucks must be in non-decreasing arrival order, carry deadlines no
    /// earlier than their arrival, and reference classes of the station
    /// config.  Their ids are reassigned in admission order;
    /// their lifecycle fields should be fresh (`Arrived`).
    pub fn arrivals<I>(mut self, trucks: I) -> Self
    where
        I: IntoIterator<Item = Truck>,
        I::IntoIter: Send + 'static,
    {
        self.source = Some(Source::Scripted(Box::new(trucks.into_iter())));
        self
    }

    /// Validate inputs and return a ready-to-run [`Station`] with its first
    /// arrival scheduled.
    pub fn build(self) -> SimResult<Station> {
        self.config.validate()?;

        let arrivals: ArrivalSource = match self.source {
            Some(Source::Generator { load_multiplier, seed }) => {
                Box::new(ArrivalGenerator::new(&self.config, load_multiplier, seed)?)
            }
            Some(Source::Scripted(source)) => source,
            None => {
                return Err(SirqError::Config("station has no arrival source".to_owned()).into());
            }
        };

        let mut station = Station {
            engine:       BidEngine::new(&self.config),
            bays:         BayPool::new(self.config.bay_count)?,
            config:       self.config,
            policy:       self.policy,
            clock:        SimClock::new(),
            trucks:       Vec::new(),
            pending:      PendingQueue::new(),
            events:       EventQueue::new(),
            arrivals,
            last_arrival: Tick::ZERO,
        };
        station.admit_next()?;
        Ok(station)
    }
}
