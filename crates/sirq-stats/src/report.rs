//! Group summaries, policy deltas and the batch report.

use sirq_alloc::AllocationPolicy;
use sirq_batch::BatchOutput;
use sirq_core::StationConfig;
use sirq_record::{RunRecord, RunRecords};

use crate::{MetricSummary, gini, mean, median};

// ── Row types ─────────────────────────────────────────────────────────────────

/// Pooled outcomes of one value-of-time class within a group.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassSummary {
    pub class:        String,
    pub trucks:       usize,
    pub mean_wait:    f64,
    pub failure_rate: f64,
    pub mean_paid:    f64,
}

/// Everything measured for one (policy, load multiplier) pair.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupSummary {
    pub policy:          AllocationPolicy,
    pub load_multiplier: f64,
    /// Completed runs only.
    pub n_runs:          usize,
    pub n_trucks:        usize,

    // Replicate-level metrics.
    pub mean_wait:       MetricSummary,
    pub revenue:         MetricSummary,
    pub failure_rate:    MetricSummary,

    // Pooled over every truck of the group.
    pub pooled_failure_rate: f64,
    pub median_wait:         f64,
    pub gini_wait:           f64,
    pub gini_revenue:        f64,
    pub classes:             Vec<ClassSummary>,

    /// Failure rate of the tightest-deadline class.
    pub critical_failure_rate: f64,
    pub critical_mean_wait:    f64,
    /// Mean wait of the loosest-deadline class minus that of the tightest.
    pub equity_gap:            f64,
}

/// Auction minus FIFO at one load multiplier.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolicyDelta {
    pub load_multiplier:       f64,
    pub mean_wait:             f64,
    pub revenue:               f64,
    /// `None` when FIFO earned nothing.
    pub revenue_change_pct:    Option<f64>,
    pub failure_rate:          f64,
    pub pooled_failure_rate:   f64,
    pub critical_failure_rate: f64,
    pub median_wait:           f64,
    pub gini_wait:             f64,
    pub gini_revenue:          f64,
    pub equity_gap:            f64,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunAccounting {
    pub expected:  usize,
    pub completed: usize,
    pub failed:    usize,
    pub cancelled: usize,
}

/// The batch's sole output artifact.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchReport {
    /// Ordered by load multiplier, then policy.
    pub summaries:  Vec<GroupSummary>,
    /// One per load multiplier where both policies completed runs.
    pub deltas:     Vec<PolicyDelta>,
    pub records:    Vec<RunRecord>,
    pub accounting: RunAccounting,
}

// ── Aggregation ───────────────────────────────────────────────────────────────

impl BatchReport {
    /// Aggregate a batch.  `station` names the critical (tightest slack) and
    /// flexible (loosest slack) classes used for the equity metrics.
    pub fn from_output(output: &BatchOutput, station: &StationConfig) -> Self {
        let mut report = Self::from_runs(&output.runs, station);
        report.accounting = RunAccounting {
            expected:  output.expected,
            completed: output.completed(),
            failed:    output.failures.len(),
            cancelled: output.cancelled,
        };
        report
    }

    /// Aggregate completed runs.  Accounting counts only what is given.
    pub fn from_runs(runs: &[RunRecords], station: &StationConfig) -> Self {
        let (critical, flexible) = equity_classes(station);
        let class_names: Vec<&str> = station.classes.iter().map(|c| c.name.as_str()).collect();

        let mut groups: Vec<(AllocationPolicy, f64, Vec<&RunRecords>)> = Vec::new();
        for run in runs {
            let (policy, load) = (run.key.policy, run.key.load_multiplier);
            match groups.iter_mut().find(|(p, l, _)| *p == policy && l.to_bits() == load.to_bits()) {
                Some((_, _, members)) => members.push(run),
                None => groups.push((policy, load, vec![run])),
            }
        }
        groups.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

        let summaries: Vec<GroupSummary> = groups
            .iter()
            .map(|(policy, load, members)| summarize(*policy, *load, members, &class_names, critical, flexible))
            .collect();
        let deltas = policy_deltas(&summaries);
        log::debug!("aggregated {} runs into {} groups", runs.len(), summaries.len());

        Self {
            summaries,
            deltas,
            records: runs.iter().flat_map(|r| r.records.iter().cloned()).collect(),
            accounting: RunAccounting {
                expected:  runs.len(),
                completed: runs.len(),
                failed:    0,
                cancelled: 0,
            },
        }
    }

    pub fn summary(&self, policy: AllocationPolicy, load_multiplier: f64) -> Option<&GroupSummary> {
        self.summaries
            .iter()
            .find(|s| s.policy == policy && s.load_multiplier.to_bits() == load_multiplier.to_bits())
    }
}

/// Names of the tightest- and loosest-deadline classes (first wins ties).
fn equity_classes(station: &StationConfig) -> (&str, &str) {
    let critical = station.classes.iter().min_by_key(|c| c.deadline_slack_minutes);
    let flexible = station.classes.iter().rev().max_by_key(|c| c.deadline_slack_minutes);
    match (critical, flexible) {
        (Some(c), Some(f)) => (c.name.as_str(), f.name.as_str()),
        _ => ("", ""),
    }
}

fn summarize(
    policy:      AllocationPolicy,
    load:        f64,
    runs:        &[&RunRecords],
    class_names: &[&str],
    critical:    &str,
    flexible:    &str,
) -> GroupSummary {
    let per_run = |f: fn(&RunRecords) -> f64| -> Vec<f64> { runs.iter().map(|r| f(r)).collect() };
    let mean_wait = per_run(|r| mean(&waits(r.records.iter())));
    let revenue = per_run(RunRecords::revenue);
    let failure_rate = per_run(|r| rate(r.failed(), r.records.len()));

    let pooled: Vec<&RunRecord> = runs.iter().flat_map(|r| r.records.iter()).collect();
    let pooled_waits = waits(pooled.iter().copied());
    let paid: Vec<f64> = pooled.iter().map(|r| r.amount_paid).collect();
    let failed = pooled.iter().filter(|r| r.is_failed()).count();

    let classes: Vec<ClassSummary> =
        class_names.iter().map(|name| class_summary(name, &pooled)).collect();
    let class_stat = |name: &str| classes.iter().find(|c| c.class == name);
    let critical_stats = class_stat(critical);
    let flexible_wait = class_stat(flexible).map_or(0.0, |c| c.mean_wait);

    GroupSummary {
        policy,
        load_multiplier: load,
        n_runs: runs.len(),
        n_trucks: pooled.len(),
        mean_wait: MetricSummary::from_samples(&mean_wait),
        revenue: MetricSummary::from_samples(&revenue),
        failure_rate: MetricSummary::from_samples(&failure_rate),
        pooled_failure_rate: rate(failed, pooled.len()),
        median_wait: median(&pooled_waits),
        gini_wait: gini(&pooled_waits),
        gini_revenue: gini(&paid),
        critical_failure_rate: critical_stats.map_or(0.0, |c| c.failure_rate),
        critical_mean_wait: critical_stats.map_or(0.0, |c| c.mean_wait),
        equity_gap: flexible_wait - critical_stats.map_or(0.0, |c| c.mean_wait),
        classes,
    }
}

fn class_summary(name: &str, pooled: &[&RunRecord]) -> ClassSummary {
    let members: Vec<&RunRecord> = pooled.iter().copied().filter(|r| r.class == name).collect();
    let paid: Vec<f64> = members.iter().map(|r| r.amount_paid).collect();
    ClassSummary {
        class:        name.to_owned(),
        trucks:       members.len(),
        mean_wait:    mean(&waits(members.iter().copied())),
        failure_rate: rate(members.iter().filter(|r| r.is_failed()).count(), members.len()),
        mean_paid:    mean(&paid),
    }
}

fn policy_deltas(summaries: &[GroupSummary]) -> Vec<PolicyDelta> {
    let find = |policy: AllocationPolicy, load: f64| {
        summaries.iter().find(|s| s.policy == policy && s.load_multiplier.to_bits() == load.to_bits())
    };
    let mut deltas: Vec<PolicyDelta> = Vec::new();
    for s in summaries {
        if deltas.iter().any(|d| d.load_multiplier.to_bits() == s.load_multiplier.to_bits()) {
            continue;
        }
        let (Some(fifo), Some(auction)) = (
            find(AllocationPolicy::Fifo, s.load_multiplier),
            find(AllocationPolicy::Auction, s.load_multiplier),
        ) else {
            continue;
        };
        let base_revenue = fifo.revenue.mean;
        deltas.push(PolicyDelta {
            load_multiplier:       s.load_multiplier,
            mean_wait:             auction.mean_wait.mean - fifo.mean_wait.mean,
            revenue:               auction.revenue.mean - base_revenue,
            revenue_change_pct:    (base_revenue > 0.0)
                .then(|| (auction.revenue.mean - base_revenue) / base_revenue * 100.0),
            failure_rate:          auction.failure_rate.mean - fifo.failure_rate.mean,
            pooled_failure_rate:   auction.pooled_failure_rate - fifo.pooled_failure_rate,
            critical_failure_rate: auction.critical_failure_rate - fifo.critical_failure_rate,
            median_wait:           auction.median_wait - fifo.median_wait,
            gini_wait:             auction.gini_wait - fifo.gini_wait,
            gini_revenue:          auction.gini_revenue - fifo.gini_revenue,
            equity_gap:            auction.equity_gap - fifo.equity_gap,
        });
    }
    deltas
}

fn waits<'a>(records: impl Iterator<Item = &'a RunRecord>) -> Vec<f64> {
    records.map(|r| r.wait_minutes as f64).collect()
}

fn rate(count: usize, total: usize) -> f64 {
    if total == 0 { 0.0 } else { count as f64 / total as f64 }
}
