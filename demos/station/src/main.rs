//! station — command-line driver for the SIRQ charging-bay simulator.
//!
//! ```text
//! station demo  [load] [--seed N] [--peaks]                one seeded FIFO vs SIRQ comparison
//! station batch [config.json] [records.csv] [report.json]  Monte Carlo batch
//! ```
//!
//! Without a config file the batch uses `BatchConfig::default()`
//! (4 bays, 24 h, loads 0.5–2.0, 50 replicates per policy and load).

mod output;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use sirq_alloc::AllocationPolicy;
use sirq_batch::{BatchConfig, CancelToken, run_batch};
use sirq_core::StationConfig;
use sirq_record::{RunKey, RunRecorder, RunRecords};
use sirq_sim::{RunSummary, StationBuilder};
use sirq_stats::{BatchReport, mean};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:      u64 = 42;
const DEMO_LOAD: f64 = 1.5;

// ── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "station", about = "SIRQ charging-bay simulator: FIFO vs real-time auction")]
struct Cli {
    /// Defaults to `demo`.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run one seeded day under both policies and compare them
    Demo {
        /// Traffic load multiplier
        #[arg(default_value_t = DEMO_LOAD)]
        load: f64,
        /// Arrival seed shared by both policies
        #[arg(long, default_value_t = SEED)]
        seed: u64,
        /// Use the freight-corridor time-of-day demand profile
        #[arg(long)]
        peaks: bool,
    },
    /// Run a Monte Carlo batch and print the aggregate report
    Batch {
        /// Batch configuration as JSON (defaults when omitted)
        config: Option<PathBuf>,
        /// Write every truck record as CSV
        records: Option<PathBuf>,
        /// Write the aggregate report as JSON
        report: Option<PathBuf>,
    },
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        None => demo(DEMO_LOAD, SEED, false),
        Some(Command::Demo { load, seed, peaks }) => demo(load, seed, peaks),
        Some(Command::Batch { config, records, report }) => {
            batch(config.as_deref(), records.as_deref(), report.as_deref())
        }
    }
}

// ── demo ──────────────────────────────────────────────────────────────────────

fn demo(load: f64, seed: u64, peaks: bool) -> Result<()> {
    let station = StationConfig {
        hourly_rate_multipliers: if peaks { StationConfig::freight_day_profile() } else { Vec::new() },
        ..StationConfig::default()
    };
    println!("=== station — SIRQ vs FIFO, one day ===");
    println!(
        "Bays: {}  |  Base arrivals: {}/h × {load}{}  |  Seed: {seed}",
        station.bay_count,
        station.base_arrivals_per_hour,
        if peaks { " (peaked)" } else { "" }
    );
    println!();

    let mut outcomes = Vec::new();
    for policy in AllocationPolicy::ALL {
        let key = RunKey { policy, load_multiplier: load, replicate: 0, seed };
        let mut recorder = RunRecorder::new(key).with_timeline();
        let summary = StationBuilder::new(station.clone(), policy)
            .generator(load, seed)
            .build()?
            .run(&mut recorder)?;
        let records = recorder.finish(summary.generated)?;
        outcomes.push((summary, records));
    }

    println!("{:<26} {:>12} {:>12}", "Metric", "FIFO", "SIRQ");
    println!("{}", "-".repeat(52));
    let row = |label: &str, f: &dyn Fn(&RunSummary, &RunRecords) -> String| {
        let cells: Vec<String> = outcomes.iter().map(|(s, r)| f(s, r)).collect();
        println!("{label:<26} {:>12} {:>12}", cells[0], cells[1]);
    };
    row("Trucks", &|s, _| s.generated.to_string());
    row("Served", &|s, _| s.served.to_string());
    row("Failed deliveries", &|s, _| s.failed.to_string());
    row("Revenue ($)", &|s, _| format!("{:.2}", s.revenue));
    row("Mean wait (min)", &|_, r| format!("{:.1}", mean_wait(r, None)));
    row("Peak bays in use", &|s, _| s.peak_charging.to_string());
    row("Last event", &|s, _| s.end_tick.to_string());
    println!();

    println!("{:<10} {:>14} {:>14} {:>10} {:>10}", "Class", "FIFO wait", "SIRQ wait", "FIFO fail", "SIRQ fail");
    println!("{}", "-".repeat(62));
    for class in &station.classes {
        let name = class.name.as_str();
        let (fifo, sirq) = (&outcomes[0].1, &outcomes[1].1);
        println!(
            "{:<10} {:>14.1} {:>14.1} {:>10} {:>10}",
            name,
            mean_wait(fifo, Some(name)),
            mean_wait(sirq, Some(name)),
            failures(fifo, name),
            failures(sirq, name),
        );
    }
    Ok(())
}

fn mean_wait(run: &RunRecords, class: Option<&str>) -> f64 {
    let waits: Vec<f64> = run
        .records
        .iter()
        .filter(|r| class.is_none_or(|c| r.class == c))
        .map(|r| r.wait_minutes as f64)
        .collect();
    mean(&waits)
}

fn failures(run: &RunRecords, class: &str) -> usize {
    run.records.iter().filter(|r| r.class == class && r.is_failed()).count()
}

// ── batch ─────────────────────────────────────────────────────────────────────

fn batch(config_path: Option<&Path>, records_path: Option<&Path>, report_path: Option<&Path>) -> Result<()> {
    let config: BatchConfig = match config_path {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => BatchConfig::default(),
    };
    config.validate()?;

    println!("=== station — Monte Carlo batch ===");
    println!(
        "Runs: {}  |  Loads: {:?}  |  Replicates: {}  |  Master seed: {}",
        config.run_count(),
        config.load_multipliers,
        config.replicates,
        config.master_seed
    );
    println!();

    let t0 = Instant::now();
    let output = run_batch(&config, &CancelToken::new())?;
    let elapsed = t0.elapsed();
    for failure in &output.failures {
        eprintln!("run {:?} failed: {}", failure.key, failure.error);
    }
    let report = BatchReport::from_output(&output, &config.station);
    println!(
        "Batch complete in {:.3} s: {} of {} runs",
        elapsed.as_secs_f64(),
        report.accounting.completed,
        report.accounting.expected
    );
    println!();

    println!(
        "{:<6} {:<6} {:>5} {:>18} {:>22} {:>10} {:>10} {:>10}",
        "Load", "Policy", "Runs", "Mean wait (95% CI)", "Revenue $ (95% CI)", "Fail rate", "Crit fail", "Gini wait"
    );
    println!("{}", "-".repeat(94));
    for s in &report.summaries {
        println!(
            "{:<6} {:<6} {:>5} {:>7.1} ±{:>9.1} {:>9.0} ±{:>11.0} {:>10.3} {:>10.3} {:>10.3}",
            s.load_multiplier,
            s.policy,
            s.n_runs,
            s.mean_wait.mean,
            s.mean_wait.ci_half_width(),
            s.revenue.mean,
            s.revenue.ci_half_width(),
            s.failure_rate.mean,
            s.critical_failure_rate,
            s.gini_wait,
        );
    }
    println!();

    println!(
        "{:<6} {:>10} {:>10} {:>11} {:>9} {:>11} {:>12} {:>10} {:>10}",
        "Load", "Δ wait", "Δ median", "Δ revenue", "Δ rev %", "Δ crit fail", "Δ equity gap", "Δ Gini w", "Δ Gini $"
    );
    println!("{}", "-".repeat(98));
    for d in &report.deltas {
        let pct = d.revenue_change_pct.map_or_else(|| "n/a".to_owned(), |p| format!("{p:+.1}"));
        println!(
            "{:<6} {:>+10.1} {:>+10.1} {:>+11.0} {:>9} {:>+11.3} {:>+12.1} {:>+10.3} {:>+10.3}",
            d.load_multiplier,
            d.mean_wait,
            d.median_wait,
            d.revenue,
            pct,
            d.critical_failure_rate,
            d.equity_gap,
            d.gini_wait,
            d.gini_revenue,
        );
    }

    if let Some(path) = records_path {
        let rows = output::write_records_csv(path, &report.records)?;
        println!();
        println!("  {} : {rows} rows", path.display());
    }
    if let Some(path) = report_path {
        output::write_report_json(path, &report)?;
        println!("  {} : report", path.display());
    }
    if report.accounting.completed != report.accounting.expected {
        bail!(
            "{} runs failed, {} cancelled",
            report.accounting.failed,
            report.accounting.cancelled
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn demo_defaults_and_flags() {
        let cli = Cli::try_parse_from(["station"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["station", "demo", "2.5", "--seed", "9", "--peaks"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Demo { load, seed: 9, peaks: true }) if load == 2.5));

        let cli = Cli::try_parse_from(["station", "demo"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Demo { load, seed: SEED, peaks: false }) if load == DEMO_LOAD));
    }

    #[test]
    fn batch_positional_paths() {
        let cli = Cli::try_parse_from(["station", "batch", "cfg.json", "out.csv"]).unwrap();
        let Some(Command::Batch { config, records, report }) = cli.command else {
            panic!("expected batch");
        };
        assert_eq!(config, Some(PathBuf::from("cfg.json")));
        assert_eq!(records, Some(PathBuf::from("out.csv")));
        assert_eq!(report, None);
    }

    #[test]
    fn bad_input_rejected() {
        assert!(Cli::try_parse_from(["station", "lottery"]).is_err());
        assert!(Cli::try_parse_from(["station", "demo", "heavy"]).is_err());
    }
}
