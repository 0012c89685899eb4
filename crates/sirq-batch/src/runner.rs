//! Batch execution, sequential or on a Rayon pool.

use std::sync::atomic::{AtomicUsize, Ordering};

use sirq_core::StationConfig;
use sirq_record::{RunKey, RunRecord, RunRecorder, RunRecords};
use sirq_sim::StationBuilder;

use crate::{BatchConfig, BatchError, BatchResult, CancelToken, RunSpec};

/// A run that returned an error.  Kept and counted, never dropped.
#[derive(Debug)]
pub struct RunFailure {
    pub key:   RunKey,
    pub error: BatchError,
}

/// Everything a batch produced.
#[derive(Debug, Default)]
pub struct BatchOutput {
    /// Completed runs in run-plan order.
    pub runs:      Vec<RunRecords>,
    pub failures:  Vec<RunFailure>,
    /// Runs skipped because the batch was cancelled before they started.
    pub cancelled: usize,
    /// Size of the run plan.
    pub expected:  usize,
}

impl BatchOutput {
    pub fn completed(&self) -> usize {
        self.runs.len()
    }

    /// Every record of every completed run.
    pub fn records(&self) -> impl Iterator<Item = &RunRecord> {
        self.runs.iter().flat_map(|r| r.records.iter())
    }
}

enum RunOutcome {
    Done(RunRecords),
    Failed(RunFailure),
    Cancelled,
}

/// Execute one run of the plan: generate arrivals, simulate, record.
pub fn run_one(station: &StationConfig, key: RunKey) -> BatchResult<RunRecords> {
    let mut recorder = RunRecorder::new(key);
    let summary = StationBuilder::new(station.clone(), key.policy)
        .generator(key.load_multiplier, key.seed)
        .build()?
        .run(&mut recorder)?;
    Ok(recorder.finish(summary.generated)?)
}

/// Run the whole plan, on a Rayon pool with the `parallel` feature and
/// sequentially otherwise.
///
/// Fails only for an invalid configuration (before any run starts) or a
/// thread-pool error.  Per-run errors land in [`BatchOutput::failures`].
pub fn run_batch(config: &BatchConfig, cancel: &CancelToken) -> BatchResult<BatchOutput> {
    execute(config, cancel, cfg!(feature = "parallel"), run_one)
}

/// Run the whole plan on the calling thread, whatever the features.
pub fn run_batch_sequential(config: &BatchConfig, cancel: &CancelToken) -> BatchResult<BatchOutput> {
    execute(config, cancel, false, run_one)
}

/// Drive `simulate` over the plan.  `parallel` is ignored without the
/// `parallel` feature.
pub(crate) fn execute<R>(
    config:   &BatchConfig,
    cancel:   &CancelToken,
    parallel: bool,
    simulate: R,
) -> BatchResult<BatchOutput>
where
    R: Fn(&StationConfig, RunKey) -> BatchResult<RunRecords> + Sync,
{
    config.validate()?;
    let specs = config.plan();
    let expected = specs.len();
    log::info!(
        "batch start: {expected} runs ({} policies × {} loads × {} replicates), master seed {}",
        config.policies.len(),
        config.load_multipliers.len(),
        config.replicates,
        config.master_seed
    );

    let progress = Progress::new(expected);
    let run = |spec: &RunSpec| run_spec(&config.station, spec, cancel, &progress, &simulate);

    let outcomes: Vec<RunOutcome> = if parallel {
        run_parallel(&specs, config.num_threads, run)?
    } else {
        specs.iter().map(run).collect()
    };

    let mut output = BatchOutput { expected, ..BatchOutput::default() };
    for outcome in outcomes {
        match outcome {
            RunOutcome::Done(records) => output.runs.push(records),
            RunOutcome::Failed(failure) => output.failures.push(failure),
            RunOutcome::Cancelled => output.cancelled += 1,
        }
    }

    if output.cancelled > 0 {
        log::warn!("batch cancelled: {} of {expected} runs never started", output.cancelled);
    }
    log::info!(
        "batch done: {} completed, {} failed, {} cancelled",
        output.completed(),
        output.failures.len(),
        output.cancelled
    );
    Ok(output)
}

#[cfg(feature = "parallel")]
fn run_parallel<F>(specs: &[RunSpec], num_threads: Option<usize>, run: F) -> BatchResult<Vec<RunOutcome>>
where
    F: Fn(&RunSpec) -> RunOutcome + Sync + Send,
{
    use rayon::prelude::*;

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = num_threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;
    Ok(pool.install(|| specs.par_iter().map(run).collect()))
}

#[cfg(not(feature = "parallel"))]
fn run_parallel<F>(specs: &[RunSpec], _num_threads: Option<usize>, run: F) -> BatchResult<Vec<RunOutcome>>
where
    F: Fn(&RunSpec) -> RunOutcome,
{
    Ok(specs.iter().map(run).collect())
}

fn run_spec<R>(
    station:  &StationConfig,
    spec:     &RunSpec,
    cancel:   &CancelToken,
    progress: &Progress,
    simulate: &R,
) -> RunOutcome
where
    R: Fn(&StationConfig, RunKey) -> BatchResult<RunRecords>,
{
    if cancel.is_cancelled() {
        return RunOutcome::Cancelled;
    }

    let key = spec.key;
    log::debug!(
        "run {} start: {} load {} replicate {} seed {:#018x}",
        spec.index,
        key.policy,
        key.load_multiplier,
        key.replicate,
        key.seed
    );
    let outcome = match simulate(station, key) {
        Ok(records) => {
            log::debug!("run {} done: {} trucks", spec.index, records.records.len());
            RunOutcome::Done(records)
        }
        Err(error) => {
            log::warn!("run {} ({} load {}) failed: {error}", spec.index, key.policy, key.load_multiplier);
            RunOutcome::Failed(RunFailure { key, error })
        }
    };
    progress.tick();
    outcome
}

/// Logs at every 10% of the plan.
struct Progress {
    done:  AtomicUsize,
    total: usize,
}

impl Progress {
    fn new(total: usize) -> Self {
        Self { done: AtomicUsize::new(0), total }
    }

    fn tick(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        let decile = |n: usize| n * 10 / self.total;
        if decile(done) > decile(done - 1) {
            log::info!("batch progress: {done}/{} runs ({}%)", self.total, done * 100 / self.total);
        }
    }
}
