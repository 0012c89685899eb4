//! Unit tests for sirq-batch.

use sirq_alloc::AllocationPolicy;
use sirq_core::StationConfig;
use sirq_record::{RunKey, RunRecords};
use sirq_sim::SimError;

use crate::runner::execute;
use crate::{BatchConfig, BatchError, BatchResult, CancelToken, run_batch, run_batch_sequential, run_one};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn small_batch() -> BatchConfig {
    BatchConfig {
        station: StationConfig { horizon_minutes: 480, ..StationConfig::default() },
        load_multipliers: vec![1.0, 2.0],
        replicates: 3,
        master_seed: 7,
        num_threads: Some(2),
        ..BatchConfig::default()
    }
}

/// Simulates normally except for `doomed`, which ends unresolved.
fn failing_on(doomed: RunKey) -> impl Fn(&StationConfig, RunKey) -> BatchResult<RunRecords> + Sync {
    move |station: &StationConfig, key: RunKey| -> BatchResult<RunRecords> {
        if key == doomed {
            return Err(SimError::Unresolved { generated: 3, served: 1, failed: 0, pending: 2, charging: 0 }.into());
        }
        run_one(station, key)
    }
}

// ── Config and plan ───────────────────────────────────────────────────────────

#[cfg(test)]
mod plan {
    use super::*;

    #[test]
    fn default_is_valid() {
        BatchConfig::default().validate().unwrap();
    }

    #[test]
    fn invalid_configs_rejected() {
        let bad = [
            BatchConfig { replicates: 0, ..small_batch() },
            BatchConfig { policies: vec![], ..small_batch() },
            BatchConfig { policies: vec![AllocationPolicy::Fifo, AllocationPolicy::Fifo], ..small_batch() },
            BatchConfig { load_multipliers: vec![], ..small_batch() },
            BatchConfig { load_multipliers: vec![1.0, f64::NAN], ..small_batch() },
            BatchConfig { num_threads: Some(0), ..small_batch() },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{config:?}");
            assert!(matches!(
                run_batch(&config, &CancelToken::new()),
                Err(BatchError::Core(_))
            ));
        }
    }

    #[test]
    fn plan_covers_every_combination() {
        let config = small_batch();
        let plan = config.plan();
        assert_eq!(plan.len(), 12);
        assert_eq!(config.run_count(), 12);
        assert!(plan.iter().enumerate().all(|(i, s)| s.index == i));
    }

    #[test]
    fn policies_share_seed_per_scenario() {
        let config = small_batch();
        let plan = config.plan();
        for pair in plan.chunks(2) {
            assert_eq!(pair[0].key.seed, pair[1].key.seed);
            assert_eq!(pair[0].key.replicate, pair[1].key.replicate);
            assert_ne!(pair[0].key.policy, pair[1].key.policy);
        }
        let mut seeds: Vec<u64> = plan.iter().map(|s| s.key.seed).collect();
        seeds.sort();
        seeds.dedup();
        assert_eq!(seeds.len(), 6, "one seed per (load, replicate)");
        assert_eq!(config.run_seed(1, 0), plan[6].key.seed);
    }
}

// ── Execution ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod execution {
    use super::*;

    #[test]
    fn every_run_completes() {
        let out = run_batch(&small_batch(), &CancelToken::new()).unwrap();
        assert_eq!(out.expected, 12);
        assert_eq!(out.completed(), 12);
        assert!(out.failures.is_empty());
        assert_eq!(out.cancelled, 0);
        assert_eq!(out.records().count(), out.runs.iter().map(|r| r.records.len()).sum::<usize>());
    }

    #[test]
    fn results_in_plan_order() {
        let config = small_batch();
        let out = run_batch(&config, &CancelToken::new()).unwrap();
        let keys: Vec<RunKey> = out.runs.iter().map(|r| r.key).collect();
        let planned: Vec<RunKey> = config.plan().iter().map(|s| s.key).collect();
        assert_eq!(keys, planned);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn worker_count_does_not_change_output() {
        let config = small_batch();
        let sequential = run_batch_sequential(&config, &CancelToken::new()).unwrap();
        for threads in [1, 2, 4] {
            let config = BatchConfig { num_threads: Some(threads), ..config.clone() };
            let pooled = execute(&config, &CancelToken::new(), true, run_one).unwrap();
            assert_eq!(pooled.runs, sequential.runs, "{threads} workers");
            assert_eq!(pooled.expected, sequential.expected);
        }
    }

    #[test]
    fn failed_run_is_kept_and_counted() {
        let config = small_batch();
        let doomed = config.plan()[4].key;
        let out = execute(&config, &CancelToken::new(), false, failing_on(doomed)).unwrap();

        assert_eq!(out.failures.len(), 1);
        assert_eq!(out.failures[0].key, doomed);
        assert!(matches!(out.failures[0].error, BatchError::Sim(SimError::Unresolved { .. })));
        assert_eq!(out.completed(), 11);
        assert_eq!(out.expected, 12);
        assert!(out.runs.iter().all(|r| r.key != doomed));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn failed_run_is_kept_on_the_pool() {
        let config = small_batch();
        let doomed = config.plan()[7].key;
        let sequential = execute(&config, &CancelToken::new(), false, failing_on(doomed)).unwrap();
        let pooled = execute(&config, &CancelToken::new(), true, failing_on(doomed)).unwrap();
        assert_eq!(pooled.failures.len(), 1);
        assert_eq!(pooled.failures[0].key, doomed);
        assert_eq!(pooled.runs, sequential.runs);
    }

    #[test]
    fn policies_face_identical_arrivals() {
        let out = run_batch(&small_batch(), &CancelToken::new()).unwrap();
        for pair in out.runs.chunks(2) {
            let arrivals = |i: usize| -> Vec<(u64, String, u32)> {
                pair[i]
                    .records
                    .iter()
                    .map(|r| (r.arrival, r.class.clone(), r.charge_minutes))
                    .collect()
            };
            assert_eq!(arrivals(0), arrivals(1));
        }
    }

    #[test]
    fn cancel_before_start_runs_nothing() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let out = run_batch(&small_batch(), &cancel).unwrap();
        assert_eq!(out.completed(), 0);
        assert_eq!(out.cancelled, 12);
        assert_eq!(out.expected, 12);
    }

    #[test]
    fn cancel_token_clones_share_state() {
        let a = CancelToken::new();
        let b = a.clone();
        assert!(!b.is_cancelled());
        a.cancel();
        assert!(b.is_cancelled());
    }

    #[test]
    fn single_run_is_reproducible() {
        let config = small_batch();
        let key = config.plan()[3].key;
        let a = run_one(&config.station, key).unwrap();
        let b = run_one(&config.station, key).unwrap();
        assert_eq!(a, b);
    }
}
