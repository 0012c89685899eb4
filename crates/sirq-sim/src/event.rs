//! `EventQueue` — timestamp-ordered pending events.
//!
//! Keys are `(Tick, EventKind)`, so a `BTreeMap` walk visits events by time
//! and, within one timestamp, by kind rank.  Events sharing a key keep their
//! insertion order.

use std::collections::BTreeMap;

use sirq_core::{BayId, Tick, TruckId};

/// Processing rank within one timestamp; declaration order is the rank.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum EventKind {
    BayFree,
    Arrival,
    DeadlineCheck,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Event {
    /// A charging session ends and the bay becomes free.
    BayFree(BayId),
    /// A truck reaches the station.
    Arrival(TruckId),
    /// A truck's deadline is due; fails it if still waiting.
    DeadlineCheck(TruckId),
}

impl Event {
    #[inline]
    pub fn kind(&self) -> EventKind {
        match self {
            Event::BayFree(_)       => EventKind::BayFree,
            Event::Arrival(_)       => EventKind::Arrival,
            Event::DeadlineCheck(_) => EventKind::DeadlineCheck,
        }
    }
}

#[derive(Default, Debug)]
pub struct EventQueue {
    inner: BTreeMap<(Tick, EventKind), Vec<Event>>,
    /// Cached total event count for O(1) `len()`.
    total: usize,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` at `tick`.
    pub fn push(&mut self, tick: Tick, event: Event) {
        self.inner.entry((tick, event.kind())).or_default().push(event);
        self.total += 1;
    }

    /// Remove and return every event of `kind` scheduled at exactly `tick`.
    ///
    /// Returns `None` when there are none, without allocating.
    pub fn drain(&mut self, tick: Tick, kind: EventKind) -> Option<Vec<Event>> {
        let events = self.inner.remove(&(tick, kind))?;
        self.total -= events.len();
        Some(events)
    }

    /// The earliest timestamp with at least one event.
    pub fn next_tick(&self) -> Option<Tick> {
        self.inner.keys().next().map(|&(tick, _)| tick)
    }

    /// `true` if any event of any kind is scheduled at `tick`.
    pub fn has_events_at(&self, tick: Tick) -> bool {
        self.inner
            .range((tick, EventKind::BayFree)..=(tick, EventKind::DeadlineCheck))
            .next()
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
