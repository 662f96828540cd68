//! CLI for running the combine ladder benchmarks.
//!
//! Usage:
//!   combine-ladder                      # Run all algorithms
//!   combine-ladder --list               # List available algorithms
//!   combine-ladder combine_sum_i64      # Run specific algorithm
//!   combine-ladder --verify             # Check that every rung agrees
//!   combine-ladder --help               # Show help

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use combine_ladder::registry::{build_registry, AlgorithmRunner};
use combine_ladder::tui;
use combine_ladder::utils::runner::{export_csv, run_all_algorithms};
use combine_ladder::utils::timer::{time_seed, PinStrategy, TimingConfig};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Pin {
    /// Pin once for the whole run
    Global,
    /// Pin around every measured execution
    PerExecution,
    /// Do not pin
    Off,
}

impl From<Pin> for PinStrategy {
    fn from(pin: Pin) -> Self {
        match pin {
            Pin::Global => PinStrategy::Global,
            Pin::PerExecution => PinStrategy::PerExecution,
            Pin::Off => PinStrategy::Disabled,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "combine-ladder", version)]
#[command(about = "Benchmark a ladder of hand-optimized sequential reductions")]
struct Cli {
    /// Name of a specific algorithm to run (omit for all)
    algorithm: Option<String>,

    /// List all available algorithms
    #[arg(short, long)]
    list: bool,

    /// Only check that every variant matches the reference rung
    #[arg(long)]
    verify: bool,

    /// Comma-separated vector sizes
    #[arg(long, value_delimiter = ',', default_values_t = [64, 256, 1024, 4096, 16384])]
    sizes: Vec<usize>,

    /// Number of measured runs per variant
    #[arg(short = 'r', long, default_value_t = 30)]
    runs: usize,

    /// Number of warmup executions per variant
    #[arg(long, default_value_t = 10)]
    warmup: usize,

    /// CPU pinning strategy while measuring
    #[arg(long, value_enum, default_value_t = Pin::PerExecution)]
    pin: Pin,

    /// Random seed for reproducible inputs and schedule (default: time-based)
    #[arg(long)]
    seed: Option<u64>,

    /// Export raw timings to a CSV file
    #[arg(long)]
    csv: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let registry = build_registry();

    if cli.list {
        tui::print_available_algorithms(&registry);
        return Ok(());
    }

    let selected: Vec<&dyn AlgorithmRunner> = match cli.algorithm.as_deref() {
        Some(name) => match registry.find(name) {
            Some(algo) => vec![algo],
            None => bail!(
                "algorithm '{}' not found; available: {}",
                name,
                registry.list_names().join(", ")
            ),
        },
        None => registry.all().iter().map(|a| a.as_ref()).collect(),
    };

    if cli.verify {
        let mut failures = 0;
        for algo in &selected {
            let outcome = algo.verify();
            tui::print_verification(*algo, &outcome);
            failures += usize::from(outcome.is_err());
        }
        if failures > 0 {
            bail!("{} algorithm(s) failed verification", failures);
        }
        return Ok(());
    }

    let seed = cli.seed.unwrap_or_else(time_seed);
    let config = TimingConfig {
        runs_per_variant: cli.runs.max(1),
        warmup_iterations: cli.warmup,
        pin_strategy: cli.pin.into(),
        schedule_seed: Some(seed),
    };
    tracing::debug!(seed, ?config, sizes = ?cli.sizes, "starting benchmark run");

    tui::print_header();

    let grouped = run_all_algorithms(&selected, &cli.sizes, &config, seed);

    if let Some(path) = cli.csv.as_deref() {
        export_csv(path, &grouped.raw_data)
            .with_context(|| format!("failed to export CSV to {}", path))?;
        println!("  Raw data exported to: {}", path);
        println!();
    }

    for (algo, per_size) in selected.iter().zip(grouped.results) {
        tui::print_algo_info_box(*algo);

        for (&size, mut variant_results) in cli.sizes.iter().zip(per_size) {
            tui::sort_variants(&mut variant_results);
            tui::print_results_table(&variant_results, size, config.runs_per_variant);
        }
    }

    println!("Seed: {} (pass --seed {} to reproduce)", seed, seed);
    println!("Note: Speedup is relative to the 'original' rung.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["combine-ladder"]).unwrap();
        assert_eq!(cli.sizes, vec![64, 256, 1024, 4096, 16384]);
        assert_eq!(cli.runs, 30);
        assert!(cli.algorithm.is_none());
        assert!(matches!(cli.pin, Pin::PerExecution));
    }

    #[test]
    fn test_sizes_and_algorithm() {
        let cli = Cli::try_parse_from([
            "combine-ladder",
            "combine_sum_i64",
            "--sizes",
            "7,128",
            "--pin",
            "off",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.algorithm.as_deref(), Some("combine_sum_i64"));
        assert_eq!(cli.sizes, vec![7, 128]);
        assert!(matches!(PinStrategy::from(cli.pin), PinStrategy::Disabled));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["combine-ladder", "--bogus"]).is_err());
    }
}
