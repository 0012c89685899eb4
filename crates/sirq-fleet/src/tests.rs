//! Unit tests for sirq-fleet.

use sirq_core::{StationConfig, Tick, TruckId, VotClass, VotClassId};

use crate::{ArrivalGenerator, FleetError, Truck, TruckState};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn critical_truck(arrival: u64) -> Truck {
    Truck::new(TruckId(0), Tick(arrival), 60, VotClassId(0), &VotClass::critical(), 150.0)
}

// ── Truck lifecycle ───────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use super::*;

    #[test]
    fn deadline_from_class_slack() {
        let t = critical_truck(30);
        assert_eq!(t.deadline, Tick(90));
        assert_eq!(t.state, TruckState::Arrived);
        assert_eq!(t.max_bid, 500.0);
    }

    #[test]
    fn served_path() {
        let mut t = critical_truck(10);
        t.enqueue().unwrap();
        t.start_charging(Tick(25), 42.0).unwrap();
        t.finish(Tick(85)).unwrap();
        assert_eq!(t.state, TruckState::Served);
        assert!(t.state.is_terminal());
        assert_eq!(t.wait_minutes(Tick(1_000)), 15);
        assert_eq!(t.amount_paid, 42.0);
        assert_eq!(t.service_end, Some(Tick(85)));
    }

    #[test]
    fn failed_path_pays_nothing() {
        let mut t = critical_truck(0);
        t.enqueue().unwrap();
        assert!(!t.is_overdue(Tick(59)));
        assert!(t.is_overdue(Tick(60)));
        t.fail(Tick(60)).unwrap();
        assert_eq!(t.state, TruckState::Failed);
        assert_eq!(t.amount_paid, 0.0);
        assert_eq!(t.wait_minutes(Tick(500)), 60);
    }

    #[test]
    fn waiting_truck_wait_tracks_now() {
        let mut t = critical_truck(5);
        t.enqueue().unwrap();
        assert_eq!(t.wait_minutes(Tick(20)), 15);
    }

    #[test]
    fn illegal_transitions_rejected() {
        let mut t = critical_truck(0);
        assert!(matches!(
            t.start_charging(Tick(0), 10.0),
            Err(FleetError::IllegalTransition { from: TruckState::Arrived, to: TruckState::Charging, .. })
        ));
        t.enqueue().unwrap();
        t.start_charging(Tick(1), 10.0).unwrap();
        // A charging truck can no longer miss its deadline.
        assert!(t.fail(Tick(100)).is_err());
        t.finish(Tick(61)).unwrap();
        assert!(t.finish(Tick(62)).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(TruckState::Charging.to_string(), "charging");
    }
}

// ── ArrivalGenerator ──────────────────────────────────────────────────────────

#[cfg(test)]
mod generator {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let cfg = StationConfig::default();
        let a: Vec<Truck> = ArrivalGenerator::new(&cfg, 1.2, 7).unwrap().collect();
        let b: Vec<Truck> = ArrivalGenerator::new(&cfg, 1.2, 7).unwrap().collect();
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let cfg = StationConfig::default();
        let a: Vec<Truck> = ArrivalGenerator::new(&cfg, 1.0, 1).unwrap().collect();
        let b: Vec<Truck> = ArrivalGenerator::new(&cfg, 1.0, 2).unwrap().collect();
        assert_ne!(a, b);
    }

    #[test]
    fn arrivals_sorted_within_horizon_with_sequential_ids() {
        let cfg = StationConfig::default();
        let trucks: Vec<Truck> = ArrivalGenerator::new(&cfg, 1.5, 3).unwrap().collect();
        for (i, t) in trucks.iter().enumerate() {
            assert_eq!(t.id, TruckId(i as u32));
            assert!(t.arrival.0 < cfg.horizon_minutes);
            assert!((cfg.charge_minutes_min..=cfg.charge_minutes_max).contains(&t.charge_minutes));
            let class = cfg.class(t.class).unwrap();
            assert!(t.vot_per_hour >= class.vot_per_hour_min && t.vot_per_hour <= class.vot_per_hour_max);
            assert_eq!(t.deadline, t.arrival + class.deadline_slack_minutes);
        }
        assert!(trucks.windows(2).all(|w| w[0].arrival <= w[1].arrival));
    }

    #[test]
    fn higher_load_means_more_arrivals() {
        let cfg = StationConfig { horizon_minutes: 10 * 1_440, ..StationConfig::default() };
        let light = ArrivalGenerator::new(&cfg, 0.5, 11).unwrap().count();
        let heavy = ArrivalGenerator::new(&cfg, 2.0, 11).unwrap().count();
        // Expected 420 vs 1680 arrivals over ten days.
        assert!(heavy > 3 * light, "light={light} heavy={heavy}");
    }

    #[test]
    fn peak_hours_draw_more_arrivals() {
        let cfg = StationConfig {
            horizon_minutes: 20 * 1_440,
            hourly_rate_multipliers: StationConfig::freight_day_profile(),
            ..StationConfig::default()
        };
        let trucks: Vec<Truck> = ArrivalGenerator::new(&cfg, 1.0, 21).unwrap().collect();
        let in_hours = |hours: std::ops::Range<usize>| {
            trucks.iter().filter(|t| hours.contains(&t.arrival.hour_of_day())).count()
        };
        // Four hours each: 1.6 vs 0.4 times the base rate.
        let morning_peak = in_hours(6..10);
        let night = in_hours(0..4);
        assert!(morning_peak > 2 * night, "peak={morning_peak} night={night}");
    }

    #[test]
    fn quiet_hours_are_skipped() {
        let mut hourly = vec![0.0; 24];
        hourly[12] = 4.0;
        let cfg = StationConfig {
            horizon_minutes: 3 * 1_440,
            hourly_rate_multipliers: hourly,
            ..StationConfig::default()
        };
        let trucks: Vec<Truck> = ArrivalGenerator::new(&cfg, 1.0, 8).unwrap().collect();
        assert!(!trucks.is_empty());
        assert!(trucks.iter().all(|t| t.arrival.hour_of_day() == 12));
        assert!(trucks.iter().all(|t| t.arrival.0 < cfg.horizon_minutes));
    }

    #[test]
    fn all_quiet_profile_is_empty() {
        let cfg = StationConfig { hourly_rate_multipliers: vec![0.0; 24], ..StationConfig::default() };
        assert_eq!(ArrivalGenerator::new(&cfg, 1.0, 3).unwrap().count(), 0);
    }

    #[test]
    fn class_mix_follows_weights() {
        let cfg = StationConfig {
            horizon_minutes: 30 * 1_440,
            ..StationConfig::default()
        };
        let trucks: Vec<Truck> = ArrivalGenerator::new(&cfg, 1.0, 5).unwrap().collect();
        let standard = trucks.iter().filter(|t| t.class == VotClassId(1)).count();
        let share = standard as f64 / trucks.len() as f64;
        assert!((share - 0.6).abs() < 0.05, "standard share {share}");
    }

    #[test]
    fn zero_load_is_empty() {
        let cfg = StationConfig::default();
        let mut g = ArrivalGenerator::new(&cfg, 0.0, 1).unwrap();
        assert!(g.next().is_none());
        assert_eq!(g.generated(), 0);
    }

    #[test]
    fn invalid_load_rejected() {
        let cfg = StationConfig::default();
        assert!(matches!(ArrivalGenerator::new(&cfg, -1.0, 1), Err(FleetError::Core(_))));
    }

    #[test]
    fn invalid_config_rejected() {
        let cfg = StationConfig { bay_count: 0, ..StationConfig::default() };
        assert!(ArrivalGenerator::new(&cfg, 1.0, 1).is_err());
    }
}

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn replay_is_exact(seed in any::<u64>(), load in 0.0f64..3.0) {
            let cfg = StationConfig::default();
            let a: Vec<Truck> = ArrivalGenerator::new(&cfg, load, seed).unwrap().collect();
            let b: Vec<Truck> = ArrivalGenerator::new(&cfg, load, seed).unwrap().collect();
            prop_assert_eq!(a, b);
        }
    }
}
