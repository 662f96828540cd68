//! Runs registered algorithms across input sizes and exports raw timings.

use std::io::Write;
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::bench::unit_name;
use super::timer::{measure_variants, TimingConfig, VariantResult};
use crate::registry::AlgorithmRunner;

/// Raw timing data for a single variant (used for CSV export)
pub struct RawTimingData {
    pub algo_name: String,
    pub variant_name: String,
    pub input_size: usize,
    pub avg: f64,
    pub result_sample: Option<f64>,
}

/// Results of a full run, indexed as `results[algorithm][size]`.
pub struct GroupedResults {
    pub results: Vec<Vec<Vec<VariantResult>>>,
    pub raw_data: Vec<RawTimingData>,
}

/// Measure every algorithm at every size.
///
/// The (algorithm, size) pairs run in a shuffled order so that slow drift
/// (thermal, frequency scaling) does not always penalize the same pair.
/// Inputs are generated from `seed`, so two runs with the same seed time
/// the same data.
pub fn run_all_algorithms(
    algorithms: &[&dyn AlgorithmRunner],
    sizes: &[usize],
    config: &TimingConfig,
    seed: u64,
) -> GroupedResults {
    let mut results: Vec<Vec<Vec<VariantResult>>> = algorithms
        .iter()
        .map(|_| vec![Vec::new(); sizes.len()])
        .collect();

    let mut order: Vec<(usize, usize)> = (0..algorithms.len())
        .flat_map(|a| (0..sizes.len()).map(move |s| (a, s)))
        .collect();
    order.shuffle(&mut StdRng::seed_from_u64(seed));

    for (algo_idx, size_idx) in order {
        let algo = algorithms[algo_idx];
        let size = sizes[size_idx];
        tracing::debug!(algorithm = algo.name(), size, "measuring");

        let closures = algo.get_variant_closures(size, seed);
        results[algo_idx][size_idx] = measure_variants(closures, config);
    }

    let mut raw_data = Vec::new();
    for (algo, per_size) in algorithms.iter().zip(&results) {
        for (&size, variants) in sizes.iter().zip(per_size) {
            raw_data.extend(variants.iter().map(|r| RawTimingData {
                algo_name: algo.name().to_string(),
                variant_name: r.name.clone(),
                input_size: size,
                avg: r.avg_nanos_f64,
                result_sample: r.result_sample,
            }));
        }
    }

    GroupedResults { results, raw_data }
}

/// Export timing data to CSV file
pub fn export_csv(path: impl AsRef<Path>, data: &[RawTimingData]) -> std::io::Result<()> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_csv(&mut file, data)?;
    file.flush()
}

fn write_csv<W: Write>(out: &mut W, data: &[RawTimingData]) -> std::io::Result<()> {
    writeln!(out, "algorithm,variant,compiler,input_size,avg,unit,result")?;

    for entry in data {
        let compiler = if entry.variant_name.starts_with("c-") {
            crate::utils::C_COMPILER_NAME.unwrap_or("Unknown")
        } else {
            "rustc"
        };

        writeln!(
            out,
            "{},{},{},{},{:.2},{},{}",
            entry.algo_name,
            entry.variant_name,
            compiler,
            entry.input_size,
            entry.avg,
            unit_name(),
            entry.result_sample.map(|v| v.to_string()).unwrap_or_default()
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::build_registry;
    use crate::utils::timer::PinStrategy;

    #[test]
    fn test_write_csv() {
        let data = vec![
            RawTimingData {
                algo_name: "combine_sum_i64".into(),
                variant_name: "original".into(),
                input_size: 64,
                avg: 120.0,
                result_sample: Some(31.0),
            },
            RawTimingData {
                algo_name: "combine_sum_i64".into(),
                variant_name: "accumulator".into(),
                input_size: 64,
                avg: 40.5,
                result_sample: None,
            },
        ];

        let mut out = Vec::new();
        write_csv(&mut out, &data).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "algorithm,variant,compiler,input_size,avg,unit,result");
        assert_eq!(
            lines[1],
            format!("combine_sum_i64,original,rustc,64,120.00,{},31", unit_name())
        );
        assert!(lines[2].ends_with(&format!("40.50,{},", unit_name())));
    }

    #[test]
    fn test_run_all_algorithms_shape() {
        let registry = build_registry();
        let algos: Vec<&dyn AlgorithmRunner> = registry.all().iter().map(|a| a.as_ref()).collect();
        let sizes = [5, 16];
        let config = TimingConfig {
            runs_per_variant: 2,
            warmup_iterations: 1,
            pin_strategy: PinStrategy::Disabled,
            schedule_seed: Some(7),
        };

        let grouped = run_all_algorithms(&algos, &sizes, &config, 7);

        assert_eq!(grouped.results.len(), algos.len());
        for (algo, per_size) in algos.iter().zip(&grouped.results) {
            assert_eq!(per_size.len(), sizes.len());
            for variants in per_size {
                assert_eq!(variants.len(), algo.available_variants().len());
            }
        }
        let expected_rows: usize = algos
            .iter()
            .map(|a| a.available_variants().len() * sizes.len())
            .sum();
        assert_eq!(grouped.raw_data.len(), expected_rows);
    }
}
