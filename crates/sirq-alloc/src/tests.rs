//! Unit tests for sirq-alloc.

use sirq_bid::BidEngine;
use sirq_core::{BayId, Tick, TruckId, VotClass, VotClassId};
use sirq_fleet::Truck;

use crate::{AllocError, AllocationPolicy, BayPool, BayState, PendingQueue};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn engine() -> BidEngine {
    BidEngine::from_parts(10.0, 2, 60.0)
}

/// Build queued trucks from (arrival, vot, class) triples, ids in order.
fn queued(specs: &[(u64, f64, VotClass)]) -> (Vec<Truck>, PendingQueue) {
    let mut trucks = Vec::new();
    let mut pending = PendingQueue::new();
    for (i, (arrival, vot, class)) in specs.iter().enumerate() {
        let mut t = Truck::new(TruckId(i as u32), Tick(*arrival), 60, VotClassId(0), class, *vot);
        t.enqueue().unwrap();
        pending.push(t.id);
        trucks.push(t);
    }
    (trucks, pending)
}

// ── PendingQueue ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod pending_queue {
    use super::*;

    #[test]
    fn removal_keeps_order() {
        let mut q = PendingQueue::new();
        for i in 0..5 {
            q.push(TruckId(i));
        }
        assert!(q.remove(TruckId(2)));
        assert!(!q.remove(TruckId(2)));
        assert_eq!(q.as_slice(), &[TruckId(0), TruckId(1), TruckId(3), TruckId(4)]);
        assert_eq!(q.len(), 4);
        assert!(q.contains(TruckId(4)));
    }
}

// ── BayPool ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod bay_pool {
    use super::*;

    #[test]
    fn occupy_and_release() {
        let mut pool = BayPool::new(3).unwrap();
        assert_eq!(pool.free_count(), 3);
        assert_eq!(pool.first_free(), Some(BayId(0)));

        pool.occupy(BayId(0), TruckId(7), Tick(60)).unwrap();
        assert_eq!(pool.first_free(), Some(BayId(1)));
        assert_eq!(pool.occupied_count(), 1);
        assert_eq!(pool.get(BayId(0)).unwrap().occupant(), Some(TruckId(7)));
        assert_eq!(
            pool.get(BayId(0)).unwrap().state,
            BayState::Occupied { occupant: TruckId(7), release_at: Tick(60) }
        );

        assert_eq!(pool.release(BayId(0)).unwrap(), TruckId(7));
        assert!(pool.get(BayId(0)).unwrap().is_free());
        assert_eq!(pool.get(BayId(0)).unwrap().occupant(), None);
    }

    #[test]
    fn double_occupy_rejected() {
        let mut pool = BayPool::new(1).unwrap();
        pool.occupy(BayId(0), TruckId(1), Tick(10)).unwrap();
        assert!(matches!(
            pool.occupy(BayId(0), TruckId(2), Tick(10)),
            Err(AllocError::BayOccupied { occupant: TruckId(1), .. })
        ));
        assert_eq!(pool.first_free(), None);
    }

    #[test]
    fn release_free_bay_rejected() {
        let mut pool = BayPool::new(1).unwrap();
        assert!(matches!(pool.release(BayId(0)), Err(AllocError::BayNotOccupied(_))));
        assert!(matches!(pool.release(BayId(5)), Err(AllocError::UnknownBay(_))));
    }

    #[test]
    fn empty_pool_rejected() {
        assert!(matches!(BayPool::new(0), Err(AllocError::Core(_))));
    }
}

// ── FIFO ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod fifo {
    use super::*;

    #[test]
    fn earliest_arrival_wins_regardless_of_value() {
        let (mut trucks, pending) = queued(&[
            (20, 300.0, VotClass::critical()),
            (5, 15.0, VotClass::economy()),
            (10, 60.0, VotClass::standard()),
        ]);
        let e = engine();
        AllocationPolicy::Fifo.refresh_bids(&pending, &mut trucks, &e, Tick(30));
        let sel = AllocationPolicy::Fifo.select_next(&pending, &trucks, &e).unwrap();
        assert_eq!(sel.winner.truck, TruckId(1));
        assert_eq!(sel.runner_up.unwrap().truck, TruckId(2));
        assert_eq!(sel.price, 10.0);
        assert!(trucks.iter().all(|t| t.current_bid == 10.0));
    }

    #[test]
    fn same_arrival_ties_by_insertion_order() {
        let (trucks, pending) = queued(&[
            (5, 60.0, VotClass::standard()),
            (5, 300.0, VotClass::critical()),
        ]);
        let sel = AllocationPolicy::Fifo.select_next(&pending, &trucks, &engine()).unwrap();
        assert_eq!(sel.winner.truck, TruckId(0));
    }

    #[test]
    fn empty_queue_selects_nothing() {
        let pending = PendingQueue::new();
        assert!(AllocationPolicy::Fifo.select_next(&pending, &[], &engine()).is_none());
        assert!(AllocationPolicy::Auction.select_next(&pending, &[], &engine()).is_none());
    }
}

// ── Auction ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod auction {
    use super::*;

    #[test]
    fn highest_bid_wins_and_pays_its_bid() {
        let (mut trucks, pending) = queued(&[
            (0, 20.0, VotClass::standard()),
            (30, 150.0, VotClass::critical()),
        ]);
        let e = engine();
        AllocationPolicy::Auction.refresh_bids(&pending, &mut trucks, &e, Tick(60));
        let sel = AllocationPolicy::Auction.select_next(&pending, &trucks, &e).unwrap();
        assert_eq!(sel.winner.truck, TruckId(1));
        assert_eq!(sel.price, trucks[1].current_bid);
        assert!(sel.winner.bid >= sel.runner_up.unwrap().bid);
    }

    #[test]
    fn equal_bids_tie_on_deadline_then_arrival() {
        let tight = VotClass { deadline_slack_minutes: 30, ..VotClass::standard() };
        let loose = VotClass { deadline_slack_minutes: 300, ..VotClass::standard() };
        let (mut trucks, pending) = queued(&[(0, 50.0, loose.clone()), (0, 50.0, tight)]);
        for t in &mut trucks {
            t.current_bid = 42.0;
        }
        let sel = AllocationPolicy::Auction.select_next(&pending, &trucks, &engine()).unwrap();
        assert_eq!(sel.winner.truck, TruckId(1), "earlier deadline wins the tie");

        let (mut trucks, pending) = queued(&[(10, 50.0, loose.clone()), (5, 50.0, loose)]);
        for t in &mut trucks {
            t.current_bid = 42.0;
            t.deadline = Tick(500);
        }
        let sel = AllocationPolicy::Auction.select_next(&pending, &trucks, &engine()).unwrap();
        assert_eq!(sel.winner.truck, TruckId(1), "earlier arrival wins the tie");
    }

    #[test]
    fn full_tie_falls_back_to_insertion_order() {
        let (mut trucks, pending) = queued(&[
            (0, 50.0, VotClass::standard()),
            (0, 50.0, VotClass::standard()),
            (0, 50.0, VotClass::standard()),
        ]);
        let e = engine();
        AllocationPolicy::Auction.refresh_bids(&pending, &mut trucks, &e, Tick(15));
        let sel = AllocationPolicy::Auction.select_next(&pending, &trucks, &e).unwrap();
        assert_eq!(sel.winner.truck, TruckId(0));
        assert_eq!(sel.runner_up.unwrap().truck, TruckId(1));
    }
}

#[cfg(test)]
mod labels {
    use super::*;

    #[test]
    fn parse_and_display() {
        assert_eq!("fifo".parse::<AllocationPolicy>().unwrap(), AllocationPolicy::Fifo);
        assert_eq!("SIRQ".parse::<AllocationPolicy>().unwrap(), AllocationPolicy::Auction);
        assert!("lottery".parse::<AllocationPolicy>().is_err());
        assert_eq!(AllocationPolicy::Auction.to_string(), "SIRQ");
    }
}

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        /// The auction winner out-bids (or ties and out-ranks) every other
        /// pending truck.
        #[test]
        fn auction_winner_dominates(
            specs in prop::collection::vec((0u64..120, 10.0f64..300.0), 1..20),
            now in 120u64..400,
        ) {
            let specs: Vec<_> = specs.into_iter().map(|(a, v)| (a, v, VotClass::standard())).collect();
            let (mut trucks, pending) = queued(&specs);
            let e = engine();
            AllocationPolicy::Auction.refresh_bids(&pending, &mut trucks, &e, Tick(now));
            let sel = AllocationPolicy::Auction.select_next(&pending, &trucks, &e).unwrap();
            for t in &trucks {
                prop_assert!(sel.winner.bid >= t.current_bid);
            }
        }

        #[test]
        fn fifo_winner_arrived_first(
            arrivals in prop::collection::vec(0u64..500, 1..20),
        ) {
            let specs: Vec<_> = arrivals.iter().map(|&a| (a, 50.0, VotClass::standard())).collect();
            let (trucks, pending) = queued(&specs);
            let sel = AllocationPolicy::Fifo.select_next(&pending, &trucks, &engine()).unwrap();
            prop_assert_eq!(sel.winner.arrival, Tick(*arrivals.iter().min().unwrap()));
        }
    }
}
