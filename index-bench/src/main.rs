//! Standalone benchmark runner that prints the formatted report.
//!
//! Runs every registered scenario, or only the ones named on the command
//! line. Each scenario uses its own defaults (database file, row and query
//! counts), which the `INDEX_BENCH_*` environment variables can override.
//!
//! Usage:
//!   cargo run --release
//!   cargo run --release -- like-pattern partial-index
//!   cargo run --release -- --list
//!   INDEX_BENCH_ROWS=100000 INDEX_BENCH_DB=:memory: cargo run --release

use anyhow::{anyhow, Context};
use index_bench::config::ENV_LOG_FILE;
use index_bench::report::print_report;
use index_bench::scenarios::{self, run_scenario, Scenario};
use std::path::PathBuf;
use std::{env, process};

fn select_scenarios(args: &[String]) -> anyhow::Result<Vec<Box<dyn Scenario>>> {
    if args.is_empty() {
        return Ok(scenarios::registry());
    }

    args.iter()
        .map(|name| {
            scenarios::find(name).ok_or_else(|| {
                anyhow!(
                    "unknown scenario '{name}' (available: {})",
                    scenarios::names().join(", ")
                )
            })
        })
        .collect()
}

fn run(args: &[String]) -> anyhow::Result<()> {
    if args.iter().any(|a| a == "--list") {
        for scenario in scenarios::registry() {
            println!("{:24} {}", scenario.name(), scenario.description());
        }
        return Ok(());
    }

    let selected = select_scenarios(args)?;

    println!("Running SQLite index benchmarks...");
    let mut reports = Vec::new();
    for scenario in &selected {
        let config = scenario
            .default_config()
            .apply_env_overrides()
            .with_context(|| format!("configuring {}", scenario.name()))?;

        eprint!(
            "  Benchmarking {} ({} rows, {} queries)...",
            scenario.name(),
            config.row_count,
            config.query_count
        );
        let report = run_scenario(scenario.as_ref(), &config)
            .with_context(|| format!("running {}", scenario.name()))?;
        eprintln!(" done");
        reports.push(report);
    }

    print_report(&reports);
    Ok(())
}

fn main() {
    let log_file = env::var(ENV_LOG_FILE).ok().map(PathBuf::from);
    bench_core::initialize_logger(log::LevelFilter::Info, log_file.as_deref()).unwrap_or_else(
        |e| {
            eprintln!("Failed to initialize logger: {e}. Exiting.");
            process::exit(1);
        },
    );

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        log::error!("{e:#}");
        process::exit(1);
    }
}
