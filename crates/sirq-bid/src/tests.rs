//! Unit tests for sirq-bid.

use sirq_core::{StationConfig, Tick, TruckId, VotClass, VotClassId};
use sirq_fleet::Truck;

use crate::BidEngine;

fn engine() -> BidEngine {
    BidEngine::from_parts(10.0, 5, 60.0)
}

fn truck(class: VotClass, vot: f64, arrival: u64) -> Truck {
    Truck::new(TruckId(0), Tick(arrival), 60, VotClassId(0), &class, vot)
}

#[cfg(test)]
mod formula {
    use super::*;

    #[test]
    fn no_wait_bids_base_fee() {
        let t = truck(VotClass::critical(), 150.0, 0);
        assert_eq!(engine().bid(&t, 0.0), 10.0);
    }

    #[test]
    fn damped_values() {
        let critical = truck(VotClass::critical(), 150.0, 0);
        let standard = truck(VotClass::standard(), 20.0, 0);
        // premium 150 → 150 / (1 + 0.1·15) = 60
        assert!((engine().bid(&critical, 60.0) - 70.0).abs() < 1e-9);
        // premium 20 → 20 / (1 + 0.5·2) = 10
        assert!((engine().bid(&standard, 60.0) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn zero_sensitivity_is_linear_until_cap() {
        let class = VotClass { price_sensitivity: 0.0, max_bid: 1_000.0, ..VotClass::standard() };
        let t = truck(class, 60.0, 0);
        assert!((engine().bid(&t, 30.0) - 40.0).abs() < 1e-9);
        assert!((engine().bid(&t, 120.0) - 130.0).abs() < 1e-9);
        assert_eq!(engine().bid(&t, 10_000.0), 1_000.0);
        assert!(engine().soft_ceiling(&t).is_infinite());
    }

    #[test]
    fn capped_at_max_bid() {
        let class = VotClass { max_bid: 25.0, ..VotClass::critical() };
        let t = truck(class, 300.0, 0);
        assert_eq!(engine().bid(&t, 600.0), 25.0);
    }

    #[test]
    fn never_exceeds_soft_ceiling() {
        let t = truck(VotClass::standard(), 80.0, 0);
        let ceiling = engine().soft_ceiling(&t);
        assert!((ceiling - 30.0).abs() < 1e-9);
        assert!(engine().bid(&t, 1e9) < ceiling);
    }

    #[test]
    fn expected_wait_adds_turnover_backlog() {
        let t = truck(VotClass::standard(), 60.0, 10);
        // 20 min measured + 10 queued × 60 min / 5 bays
        assert!((engine().expected_wait(&t, Tick(30), 10) - 140.0).abs() < 1e-9);
    }

    #[test]
    fn bids_escalate_with_measured_wait() {
        let t = truck(VotClass::standard(), 60.0, 0);
        let early = engine().price(&t, Tick(5), 3);
        let late = engine().price(&t, Tick(45), 3);
        assert!(late > early);
    }

    #[test]
    fn built_from_station_config() {
        let cfg = StationConfig::default();
        let e = BidEngine::new(&cfg);
        assert_eq!(e.base_fee(), cfg.base_fee);
        assert_eq!(e, BidEngine::from_parts(10.0, 4, 60.0));
    }
}

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn bid_monotone_and_bounded(
            vot in 0.0f64..400.0,
            s in 0.0f64..=1.0,
            w1 in 0.0f64..2_000.0,
            dw in 0.0f64..500.0,
        ) {
            let class = VotClass { price_sensitivity: s, ..VotClass::critical() };
            let t = truck(class, vot, 0);
            let e = engine();
            let a = e.bid(&t, w1);
            let b = e.bid(&t, w1 + dw);
            prop_assert!(b + 1e-9 >= a);
            prop_assert!(a >= e.base_fee());
            prop_assert!(a <= t.max_bid + 1e-9);
        }

        #[test]
        fn higher_vot_never_bids_less(
            w in 1.0f64..1_000.0,
            low in 0.0f64..200.0,
            extra in 0.0f64..200.0,
        ) {
            let e = engine();
            let a = truck(VotClass::standard(), low, 0);
            let b = truck(VotClass::standard(), low + extra, 0);
            prop_assert!(e.bid(&b, w) + 1e-9 >= e.bid(&a, w));
        }
    }
}
