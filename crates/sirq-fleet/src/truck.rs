//! The `Truck` agent and its lifecycle state machine.

use std::fmt;

use sirq_core::{Tick, TruckId, VotClass, VotClassId};

use crate::{FleetError, FleetResult};

// ── TruckState ────────────────────────────────────────────────────────────────

/// Where a truck is in its lifecycle.  Exactly one state at any instant.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TruckState {
    /// Generated, not yet admitted to the pending queue.
    #[default]
    Arrived,
    /// Waiting for a bay.
    Queued,
    /// Occupying a bay.
    Charging,
    /// Charging finished.  Terminal.
    Served,
    /// Deadline passed while still waiting.  Terminal.
    Failed,
}

impl TruckState {
    /// `true` for `Served` and `Failed`.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, TruckState::Served | TruckState::Failed)
    }

    fn can_become(self, next: TruckState) -> bool {
        use TruckState::*;
        matches!(
            (self, next),
            (Arrived, Queued) | (Queued, Charging) | (Queued, Failed) | (Charging, Served)
        )
    }
}

impl fmt::Display for TruckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TruckState::Arrived  => "arrived",
            TruckState::Queued   => "queued",
            TruckState::Charging => "charging",
            TruckState::Served   => "served",
            TruckState::Failed   => "failed",
        };
        f.write_str(s)
    }
}

// ── Truck ─────────────────────────────────────────────────────────────────────

/// One electric truck looking for a charging bay.
///
/// The static attributes (arrival, duration, class coefficients, deadline) are
/// fixed at generation.  `current_bid`, `state`, and the service bookkeeping
/// are mutated only by the event engine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Truck {
    pub id:                TruckId,
    pub arrival:           Tick,
    /// Required charging time in minutes.
    pub charge_minutes:    u32,
    pub class:             VotClassId,
    /// Money lost per hour of waiting, drawn from the class range.
    pub vot_per_hour:      f64,
    /// Copied from the class: bid damping in `[0, 1]`.
    pub price_sensitivity: f64,
    /// Copied from the class: hard bid cap.
    pub max_bid:           f64,
    /// Absolute time after which a still-waiting delivery has failed.
    pub deadline:          Tick,

    /// Latest bid computed by the bid engine.  Zero until first priced.
    pub current_bid:       f64,
    pub state:             TruckState,
    pub service_start:     Option<Tick>,
    pub service_end:       Option<Tick>,
    pub failed_at:         Option<Tick>,
    /// Revenue realized from this truck; stays 0 if it fails pre-service.
    pub amount_paid:       f64,
}

impl Truck {
    /// Create a truck of `class` with the given value of time.  The deadline
    /// is `arrival + class.deadline_slack_minutes`.
    pub fn new(
        id:             TruckId,
        arrival:        Tick,
        charge_minutes: u32,
        class_id:       VotClassId,
        class:          &VotClass,
        vot_per_hour:   f64,
    ) -> Self {
        Self {
            id,
            arrival,
            charge_minutes,
            class: class_id,
            vot_per_hour,
            price_sensitivity: class.price_sensitivity,
            max_bid:           class.max_bid,
            deadline:          arrival + class.deadline_slack_minutes,
            current_bid:       0.0,
            state:             TruckState::Arrived,
            service_start:     None,
            service_end:       None,
            failed_at:         None,
            amount_paid:       0.0,
        }
    }

    /// Override the deadline (scripted scenarios).
    pub fn with_deadline(mut self, deadline: Tick) -> Self {
        self.deadline = deadline;
        self
    }

    /// Minutes spent waiting for a bay: until service start, until failure,
    /// or until `now` while still waiting.
    pub fn wait_minutes(&self, now: Tick) -> u64 {
        let until = self.service_start.or(self.failed_at).unwrap_or(now);
        until.since(self.arrival)
    }

    /// `true` if the deadline has passed at `now` and the truck is still
    /// waiting.
    #[inline]
    pub fn is_overdue(&self, now: Tick) -> bool {
        self.state == TruckState::Queued && self.deadline <= now
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Arrived → Queued.
    pub fn enqueue(&mut self) -> FleetResult<()> {
        self.transition(TruckState::Queued)
    }

    /// Queued → Charging, paying `price` up front.
    pub fn start_charging(&mut self, now: Tick, price: f64) -> FleetResult<()> {
        self.transition(TruckState::Charging)?;
        self.service_start = Some(now);
        self.amount_paid = price;
        Ok(())
    }

    /// Charging → Served.
    pub fn finish(&mut self, now: Tick) -> FleetResult<()> {
        self.transition(TruckState::Served)?;
        self.service_end = Some(now);
        Ok(())
    }

    /// Queued → Failed.  Nothing is paid.
    pub fn fail(&mut self, now: Tick) -> FleetResult<()> {
        self.transition(TruckState::Failed)?;
        self.failed_at = Some(now);
        self.amount_paid = 0.0;
        Ok(())
    }

    fn transition(&mut self, to: TruckState) -> FleetResult<()> {
        if !self.state.can_become(to) {
            return Err(FleetError::IllegalTransition { truck: self.id, from: self.state, to });
        }
        self.state = to;
        Ok(())
    }
}
