//! Timing system for the micro-benchmarks.
//!
//! - Support for both CPU cycles and wall-clock time (via features)
//! - CPU core pinning for stable measurements
//! - Randomized variant execution to avoid ordering bias
//! - Median, spread and result sample kept per variant

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::hint::black_box;
use std::time::Duration;

use super::bench::{to_nanos, Measurement};
use super::cpu_affinity::CpuPinGuard;

// ============================================================================
// Configuration
// ============================================================================

/// CPU pinning strategy during measurements
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PinStrategy {
    /// Pin once before all measurements (minimal overhead)
    Global,
    /// Pin/unpin around each execution
    #[default]
    PerExecution,
    /// Never pin
    Disabled,
}

/// Configuration for timing measurements
#[derive(Clone, Debug)]
pub struct TimingConfig {
    /// Number of samples to collect per variant (default: 30)
    pub runs_per_variant: usize,
    /// Number of warmup executions per variant before measurement (default: 10)
    pub warmup_iterations: usize,
    /// CPU pinning strategy (default: PerExecution)
    pub pin_strategy: PinStrategy,
    /// Seed for the execution schedule; `None` picks one from the clock
    pub schedule_seed: Option<u64>,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            runs_per_variant: 30,
            warmup_iterations: 10,
            pin_strategy: PinStrategy::default(),
            schedule_seed: None,
        }
    }
}

/// A variant to be measured
pub struct Variant<'a> {
    /// Unique name of the variant
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Runs the variant once - returns (measurement, optional result value).
    /// Timing happens inside the closure to eliminate Fn trait overhead.
    pub run: Box<dyn FnMut() -> (Measurement, Option<f64>) + 'a>,
}

/// Result from measuring a single variant
#[derive(Clone, Debug)]
pub struct VariantResult {
    pub name: String,
    pub description: String,
    /// Statistics are stored as `Duration`; in cycle mode the nanosecond
    /// count holds cycles.
    pub avg_time: Duration,
    /// Precise average in nanoseconds/cycles as f64
    pub avg_nanos_f64: f64,
    pub median_time: Duration,
    pub min_time: Duration,
    pub max_time: Duration,
    pub std_dev: Duration,
    /// Number of measured executions
    pub runs: usize,
    /// Result of the last execution, for cross-variant comparison
    pub result_sample: Option<f64>,
}

/// Seed derived from the clock, for runs without `--seed`
pub fn time_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x12345678)
}

/// Measure multiple variants with randomized execution order.
///
/// 1. Warms up all variants
/// 2. Shuffles the (variant, sample) schedule
/// 3. Measures each scheduled execution under the configured pinning
/// 4. Returns one result per variant, in input order
pub fn measure_variants(mut variants: Vec<Variant>, config: &TimingConfig) -> Vec<VariantResult> {
    if variants.is_empty() {
        return Vec::new();
    }

    let samples = config.runs_per_variant;

    for variant in &mut variants {
        for _ in 0..config.warmup_iterations {
            black_box((variant.run)());
        }
    }

    let mut schedule: Vec<usize> = (0..variants.len())
        .flat_map(|v| std::iter::repeat(v).take(samples))
        .collect();
    let mut rng = StdRng::seed_from_u64(config.schedule_seed.unwrap_or_else(time_seed));
    schedule.shuffle(&mut rng);

    let mut measurements: Vec<Vec<Measurement>> = (0..variants.len())
        .map(|_| Vec::with_capacity(samples))
        .collect();
    let mut result_samples: Vec<Option<f64>> = vec![None; variants.len()];

    let _global_pin = (config.pin_strategy == PinStrategy::Global).then(CpuPinGuard::new);

    for variant_idx in schedule {
        let variant = &mut variants[variant_idx];
        let _per_exec_pin =
            (config.pin_strategy == PinStrategy::PerExecution).then(CpuPinGuard::new);
        let (elapsed, result) = (variant.run)();

        measurements[variant_idx].push(elapsed);
        result_samples[variant_idx] = result;
    }

    variants
        .into_iter()
        .zip(measurements)
        .zip(result_samples)
        .map(|((variant, times), result_sample)| {
            compute_variant_result(variant.name, variant.description, &times, result_sample)
        })
        .collect()
}

/// Compute statistics from raw measurements
fn compute_variant_result(
    name: &'static str,
    description: &'static str,
    measurements: &[Measurement],
    result_sample: Option<f64>,
) -> VariantResult {
    let mut sorted: Vec<u64> = measurements.iter().map(|m| to_nanos(*m)).collect();
    sorted.sort_unstable();

    let (Some(&min_ns), Some(&max_ns)) = (sorted.first(), sorted.last()) else {
        return VariantResult {
            name: name.to_string(),
            description: description.to_string(),
            avg_time: Duration::ZERO,
            avg_nanos_f64: 0.0,
            median_time: Duration::ZERO,
            min_time: Duration::ZERO,
            max_time: Duration::ZERO,
            std_dev: Duration::ZERO,
            runs: 0,
            result_sample,
        };
    };

    let n = sorted.len();
    let avg = sorted.iter().sum::<u64>() as f64 / n as f64;
    let variance = sorted
        .iter()
        .map(|&x| {
            let diff = x as f64 - avg;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1).max(1) as f64;

    VariantResult {
        name: name.to_string(),
        description: description.to_string(),
        avg_time: Duration::from_nanos(avg as u64),
        avg_nanos_f64: avg,
        median_time: Duration::from_nanos(sorted[n / 2]),
        min_time: Duration::from_nanos(min_ns),
        max_time: Duration::from_nanos(max_ns),
        std_dev: Duration::from_nanos(variance.sqrt() as u64),
        runs: n,
        result_sample,
    }
}
