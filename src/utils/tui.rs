//! Text User Interface (TUI) utilities.
//!
//! Handles formatted output for the CLI.

use crate::registry::{AlgorithmRegistry, AlgorithmRunner, BenchmarkResult, VerifyError};
use crate::utils::bench::format_measurement;
use terminal_size::{terminal_size, Width};

/// Get the current terminal width, constrained to a reasonable range
fn get_term_width() -> usize {
    if let Some((Width(w), _)) = terminal_size() {
        (w as usize).clamp(40, 200)
    } else {
        80
    }
}

/// Sorting group of a variant: Rust rungs (0) before C rungs (1).
fn variant_group(result: &BenchmarkResult) -> u8 {
    u8::from(result.name.starts_with("c-"))
}

/// Sort variants: Rust rungs first in ladder order, then C rungs.
///
/// The sort is stable, so the ladder order produced by the runner survives
/// within each group.
pub fn sort_variants(results: &mut [BenchmarkResult]) {
    results.sort_by_key(variant_group);
}

/// Truncate string with ellipsis if it exceeds width (character-wise)
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut result: String = s.chars().take(width.saturating_sub(3)).collect();
        result.push_str("...");
        result
    }
}

fn boxed_line(text: &str, width: usize) {
    println!("│ {:<width$} │", truncate(text, width), width = width);
}

/// Print algorithm info box
pub fn print_algo_info_box(algo: &dyn AlgorithmRunner) {
    let max_content_width = get_term_width().saturating_sub(4).max(40);

    let name_line = format!("Algorithm: {}", algo.name());
    let cat_line = format!("Category:  {}", algo.category());
    let desc_line = algo.description();
    let var_line = format!("Variants:  {}", algo.available_variants().join(", "));

    let content_width = [name_line.as_str(), cat_line.as_str(), desc_line, var_line.as_str()]
        .iter()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(60)
        .min(max_content_width);

    let border = "─".repeat(content_width + 2);

    println!("┌{}┐", border);
    boxed_line(&name_line, content_width);
    boxed_line(&cat_line, content_width);
    boxed_line(desc_line, content_width);
    println!("├{}┤", border);
    boxed_line(&var_line, content_width);
    println!("└{}┘", border);
    println!();
}

/// Relative difference between a result and the baseline result.
fn relative_error(result: Option<f64>, baseline: Option<f64>) -> f64 {
    match (result, baseline) {
        (Some(res), Some(base)) => {
            let diff = (res - base).abs();
            if base.abs() > 1e-9 {
                diff / base.abs()
            } else {
                diff
            }
        }
        _ => 0.0,
    }
}

/// Print results table for a single size.
///
/// Speedup and relative error are computed against the first row, which is
/// the `original` rung after [`sort_variants`].
pub fn print_results_table(results: &[BenchmarkResult], size: usize, runs: usize) {
    let Some(baseline) = results.first() else {
        return;
    };

    let fixed_width = 72;
    let variant_col_width = get_term_width().saturating_sub(fixed_width).max(20);
    let table_width = variant_col_width + 64 + 6;

    let baseline_time = baseline.avg_nanos_f64.max(f64::MIN_POSITIVE);

    println!("  Size: {} ({} runs)", size, runs);
    println!("  {}", "─".repeat(table_width));
    println!(
        "  {:<v_width$} {:>12} {:>12} {:>12} {:>9} {:>9} {:>10}",
        "Variant",
        "Median",
        "Min",
        "Max",
        "Speedup",
        "CV",
        "Rel. Error",
        v_width = variant_col_width
    );
    println!("  {}", "─".repeat(table_width));

    for result in results {
        let speedup = if result.avg_nanos_f64 > 0.0 {
            baseline_time / result.avg_nanos_f64
        } else {
            0.0
        };

        let cv = if result.avg_nanos_f64 > 0.0 {
            result.std_dev.as_nanos() as f64 / result.avg_nanos_f64
        } else {
            0.0
        };

        let display_name = match (result.name.starts_with("c-"), crate::utils::C_COMPILER_NAME) {
            (true, Some(c)) => format!("{} ({})", result.name, c),
            _ => result.name.clone(),
        };

        println!(
            "  {:<v_width$} {:>12} {:>12} {:>12} {:>8.2}x {:>8.2}% {:>10.2e}",
            truncate(&display_name, variant_col_width),
            format_measurement(result.median_time),
            format_measurement(result.min_time),
            format_measurement(result.max_time),
            speedup,
            cv * 100.0,
            relative_error(result.result_sample, baseline.result_sample),
            v_width = variant_col_width
        );
    }
    println!();
}

/// Print the application header
pub fn print_header() {
    let term_width = get_term_width().min(80);
    let title = " Combine Ladder Benchmarks ";
    let padding = term_width.saturating_sub(title.len()) / 2;
    let right_padding = term_width.saturating_sub(padding + title.len());

    let border = "═".repeat(term_width);

    println!("╔{}╗", border);
    println!(
        "║{}{}{}║",
        " ".repeat(padding),
        title,
        " ".repeat(right_padding)
    );
    println!("╚{}╝", border);
    println!();
}

/// Print the list of available algorithms
pub fn print_available_algorithms(registry: &AlgorithmRegistry) {
    println!("Available algorithms:");
    println!();
    for algo in registry.all() {
        println!(
            "  {:<22} [{}] - {}",
            algo.name(),
            algo.category(),
            algo.description()
        );
        println!("  {:<22}   variants: {}", "", algo.available_variants().join(", "));
    }
}

/// Print the outcome of `verify()` for one algorithm
pub fn print_verification(algo: &dyn AlgorithmRunner, outcome: &Result<(), VerifyError>) {
    match outcome {
        Ok(()) => println!("  ✅ {:<22} all variants agree", algo.name()),
        Err(e) => println!("  ❌ {:<22} {}", algo.name(), e),
    }
}
