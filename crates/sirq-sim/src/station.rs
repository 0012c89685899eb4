//! The `Station` and its event loop.

use sirq_alloc::{AllocationPolicy, BayPool, PendingQueue};
use sirq_bid::BidEngine;
use sirq_core::{BayId, SimClock, SirqError, StationConfig, Tick, TruckId};
use sirq_fleet::{Truck, TruckState};

use crate::{
    AllocationDecision, Event, EventKind, EventQueue, SimError, SimObserver, SimResult,
    StationSnapshot,
};

/// Boxed arrival stream.  Must yield trucks in non-decreasing arrival order.
pub(crate) type ArrivalSource = Box<dyn Iterator<Item = Truck> + Send>;

/// Totals of one completed run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    pub policy:        AllocationPolicy,
    pub generated:     usize,
    pub served:        usize,
    pub failed:        usize,
    /// Sum of `amount_paid` over served trucks.
    pub revenue:       f64,
    /// Most bays ever occupied at the end of a timestamp.
    pub peak_charging: usize,
    /// Timestamp of the last processed event.
    pub end_tick:      Tick,
}

/// One charging station under one allocation policy.
///
/// Owns every truck admitted during the run (indexed by `TruckId`), the bay
/// pool, the pending queue and the event queue.  Create via
/// [`StationBuilder`][crate::StationBuilder]; [`run`][Self::run] consumes it.
pub struct Station {
    pub(crate) config:   StationConfig,
    pub(crate) policy:   AllocationPolicy,
    pub(crate) clock:    SimClock,
    pub(crate) engine:   BidEngine,
    pub(crate) trucks:   Vec<Truck>,
    pub(crate) pending:  PendingQueue,
    pub(crate) bays:     BayPool,
    pub(crate) events:   EventQueue,
    pub(crate) arrivals: ArrivalSource,
    /// Arrival tick of the most recently admitted truck.
    pub(crate) last_arrival: Tick,
}

impl Station {
    pub fn policy(&self) -> AllocationPolicy {
        self.policy
    }

    pub fn config(&self) -> &StationConfig {
        &self.config
    }

    /// Run to completion.
    ///
    /// Ends when the event queue is empty, then checks that every admitted
    /// truck reached `Served` or `Failed` and that no bay is still held.
    pub fn run<O: SimObserver>(mut self, observer: &mut O) -> SimResult<RunSummary> {
        let mut peak_charging = 0;

        while let Some(now) = self.events.next_tick() {
            self.clock.advance_to(now);
            self.process_timestamp(now, observer)?;

            let charging = self.bays.occupied_count();
            peak_charging = peak_charging.max(charging);
            observer.on_timestamp_end(&StationSnapshot {
                tick:      now,
                charging,
                queued:    self.pending.len(),
                free_bays: self.bays.len() - charging,
            });
        }

        let summary = self.verify(peak_charging)?;
        observer.on_run_end(&summary);
        Ok(summary)
    }

    // ── Timestamp processing ──────────────────────────────────────────────

    fn process_timestamp<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> SimResult<()> {
        loop {
            while let Some(events) = self.events.drain(now, EventKind::BayFree) {
                for event in events {
                    if let Event::BayFree(bay) = event {
                        self.release(bay, now, observer)?;
                    }
                }
            }

            // Handling an arrival can schedule another one at the same tick.
            while let Some(events) = self.events.drain(now, EventKind::Arrival) {
                for event in events {
                    if let Event::Arrival(truck) = event {
                        self.arrive(truck, observer)?;
                    }
                }
            }

            self.allocate(now, observer)?;

            while let Some(events) = self.events.drain(now, EventKind::DeadlineCheck) {
                for event in events {
                    if let Event::DeadlineCheck(truck) = event {
                        self.check_deadline(truck, now, observer)?;
                    }
                }
            }

            if !self.events.has_events_at(now) {
                return Ok(());
            }
        }
    }

    fn release<O: SimObserver>(&mut self, bay: BayId, now: Tick, observer: &mut O) -> SimResult<()> {
        let id = self.bays.release(bay)?;
        let truck = &mut self.trucks[id.index()];
        truck.finish(now)?;
        let class = self.config.class(truck.class)?;
        observer.on_terminal(truck, class);
        Ok(())
    }

    fn arrive<O: SimObserver>(&mut self, id: TruckId, observer: &mut O) -> SimResult<()> {
        let truck = &mut self.trucks[id.index()];
        truck.enqueue()?;
        let deadline = truck.deadline;
        self.pending.push(id);
        self.events.push(deadline, Event::DeadlineCheck(id));
        observer.on_arrival(truck);

        self.admit_next()
    }

    fn allocate<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> SimResult<()> {
        while let Some(bay) = self.bays.first_free() {
            if self.pending.is_empty() {
                break;
            }
            self.policy.refresh_bids(&self.pending, &mut self.trucks, &self.engine, now);
            let Some(selection) = self.policy.select_next(&self.pending, &self.trucks, &self.engine)
            else {
                break;
            };

            // Demand at the decision instant, before the winner leaves the queue.
            let utilization =
                (self.bays.occupied_count() + self.pending.len()) as f64 / self.bays.len() as f64;

            let id = selection.winner.truck;
            self.pending.remove(id);
            let truck = &mut self.trucks[id.index()];
            let energy = self.config.pricing.energy_charge(truck.charge_minutes, utilization);
            truck.start_charging(now, selection.price + energy)?;

            let release_at = now + u64::from(truck.charge_minutes);
            self.bays.occupy(bay, id, release_at)?;
            self.events.push(release_at, Event::BayFree(bay));

            observer.on_allocation(&AllocationDecision { tick: now, bay, selection }, truck);
        }
        Ok(())
    }

    fn check_deadline<O: SimObserver>(
        &mut self,
        id:       TruckId,
        now:      Tick,
        observer: &mut O,
    ) -> SimResult<()> {
        let truck = &mut self.trucks[id.index()];
        if !truck.is_overdue(now) {
            return Ok(());
        }
        truck.fail(now)?;
        self.pending.remove(id);
        let class = self.config.class(truck.class)?;
        observer.on_terminal(truck, class);
        Ok(())
    }

    // ── Arrival admission ─────────────────────────────────────────────────

    /// Pull the next truck from the arrival source, give it the next
    /// sequential id, and schedule its arrival.
    pub(crate) fn admit_next(&mut self) -> SimResult<()> {
        let Some(mut truck) = self.arrivals.next() else {
            return Ok(());
        };

        let id = TruckId::try_from(self.trucks.len())
            .map_err(|_| SirqError::Config("too many trucks in one run".to_owned()))?;
        truck.id = id;

        if truck.arrival < self.last_arrival {
            return Err(SimError::ArrivalOutOfOrder {
                truck:    id,
                arrival:  truck.arrival,
                previous: self.last_arrival,
            });
        }
        if truck.deadline < truck.arrival {
            return Err(SimError::DeadlineBeforeArrival {
                truck:    id,
                arrival:  truck.arrival,
                deadline: truck.deadline,
            });
        }
        if self.config.class(truck.class).is_err() {
            return Err(SimError::UnknownClass { truck: id, class: truck.class });
        }

        self.last_arrival = truck.arrival;
        self.events.push(truck.arrival, Event::Arrival(id));
        self.trucks.push(truck);
        Ok(())
    }

    // ── End-of-run checks ─────────────────────────────────────────────────

    fn verify(&self, peak_charging: usize) -> SimResult<RunSummary> {
        let mut served = 0;
        let mut failed = 0;
        let mut revenue = 0.0;
        for truck in &self.trucks {
            match truck.state {
                TruckState::Served => {
                    served += 1;
                    revenue += truck.amount_paid;
                }
                TruckState::Failed => failed += 1,
                _ => {}
            }
        }

        let generated = self.trucks.len();
        let charging = self.bays.occupied_count();
        if served + failed != generated || !self.pending.is_empty() || charging != 0 {
            return Err(SimError::Unresolved {
                generated,
                served,
                failed,
                pending: self.pending.len(),
                charging,
            });
        }

        log::debug!(
            "{} run finished at {}: {generated} trucks, {served} served, {failed} failed",
            self.policy,
            self.clock
        );

        Ok(RunSummary {
            policy: self.policy,
            generated,
            served,
            failed,
            revenue,
            peak_charging,
            end_tick: self.clock.now(),
        })
    }
}
