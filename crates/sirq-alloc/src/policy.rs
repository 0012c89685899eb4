//! `AllocationPolicy` — the two allocation mechanisms behind one operation.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use sirq_bid::BidEngine;
use sirq_core::{Tick, TruckId};
use sirq_fleet::Truck;

use crate::{AllocError, PendingQueue};

/// Which mechanism decides the next truck to charge.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AllocationPolicy {
    /// Strict first-in-first-served.
    Fifo,
    /// Real-time sealed-bid auction (SIRQ): highest current bid wins.
    Auction,
}

/// A pending truck as seen by the ranking.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Candidate {
    pub truck:    TruckId,
    pub bid:      f64,
    pub deadline: Tick,
    pub arrival:  Tick,
    /// Insertion rank in the pending queue.
    pub position: usize,
}

/// Outcome of one allocation decision.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Selection {
    pub winner:    Candidate,
    /// What the winner pays for access: its bid under the auction, the flat
    /// base fee under FIFO.
    pub price:     f64,
    /// Best of the remaining candidates, kept for auditing the decision.
    pub runner_up: Option<Candidate>,
}

impl AllocationPolicy {
    pub const ALL: [AllocationPolicy; 2] = [AllocationPolicy::Fifo, AllocationPolicy::Auction];

    /// Short label used in records and reports.
    pub fn label(self) -> &'static str {
        match self {
            AllocationPolicy::Fifo    => "FIFO",
            AllocationPolicy::Auction => "SIRQ",
        }
    }

    /// Bring every pending truck's `current_bid` up to date for a decision
    /// at `now`.
    ///
    /// Under the auction each truck is re-priced from its measured wait and
    /// the current queue depth.  FIFO books the flat base fee.
    pub fn refresh_bids(
        self,
        pending: &PendingQueue,
        trucks:  &mut [Truck],
        engine:  &BidEngine,
        now:     Tick,
    ) {
        let depth = pending.len();
        for &id in pending.as_slice() {
            let truck = &mut trucks[id.index()];
            truck.current_bid = match self {
                AllocationPolicy::Fifo    => engine.base_fee(),
                AllocationPolicy::Auction => engine.price(truck, now, depth),
            };
        }
    }

    /// Choose the truck that gets the next free bay.
    ///
    /// Reads `current_bid` as left by [`refresh_bids`][Self::refresh_bids].
    /// Returns `None` when nothing is pending.
    pub fn select_next(
        self,
        pending: &PendingQueue,
        trucks:  &[Truck],
        engine:  &BidEngine,
    ) -> Option<Selection> {
        let order = self.ordering();
        let mut best: Option<Candidate> = None;
        let mut second: Option<Candidate> = None;

        for (position, &id) in pending.as_slice().iter().enumerate() {
            let t = &trucks[id.index()];
            let c = Candidate {
                truck:    id,
                bid:      t.current_bid,
                deadline: t.deadline,
                arrival:  t.arrival,
                position,
            };
            match best {
                Some(b) if order(&c, &b) != Ordering::Less => {
                    if second.is_none_or(|s| order(&c, &s) == Ordering::Less) {
                        second = Some(c);
                    }
                }
                _ => {
                    second = best;
                    best = Some(c);
                }
            }
        }

        let winner = best?;
        let price = match self {
            AllocationPolicy::Fifo    => engine.base_fee(),
            AllocationPolicy::Auction => winner.bid,
        };
        Some(Selection { winner, price, runner_up: second })
    }

    /// Total order over candidates; `Less` means "served first".
    fn ordering(self) -> fn(&Candidate, &Candidate) -> Ordering {
        match self {
            AllocationPolicy::Fifo    => fifo_order,
            AllocationPolicy::Auction => auction_order,
        }
    }
}

fn fifo_order(a: &Candidate, b: &Candidate) -> Ordering {
    a.arrival.cmp(&b.arrival).then(a.position.cmp(&b.position))
}

fn auction_order(a: &Candidate, b: &Candidate) -> Ordering {
    b.bid
        .total_cmp(&a.bid)
        .then(a.deadline.cmp(&b.deadline))
        .then(a.arrival.cmp(&b.arrival))
        .then(a.position.cmp(&b.position))
}

impl fmt::Display for AllocationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AllocationPolicy {
    type Err = AllocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fifo"            => Ok(AllocationPolicy::Fifo),
            "auction" | "sirq" => Ok(AllocationPolicy::Auction),
            _                 => Err(AllocError::UnknownPolicy(s.to_owned())),
        }
    }
}
