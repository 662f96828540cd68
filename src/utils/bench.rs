//! Measurement abstraction shared by the timer and the runners.
//!
//! By default (`cpu_cycles` feature), measurements use CPU cycle counters
//! for precise micro-benchmarking. Use `--features use_time` or
//! `--no-default-features` to use wall-clock time instead.

use std::time::Duration;

// ============================================================================
// Measurement abstraction: cycles or time depending on feature flags
// ============================================================================
//
// Use CPU cycles if: cpu_cycles is enabled AND use_time is NOT enabled
// Use wall-clock time if: use_time is enabled OR cpu_cycles is disabled

/// Measurement value type - cycles (u64) or Duration depending on feature
#[cfg(all(feature = "cpu_cycles", not(feature = "use_time")))]
pub type Measurement = u64;

#[cfg(any(not(feature = "cpu_cycles"), feature = "use_time"))]
pub type Measurement = Duration;

/// Start marker returned by [`now`]
#[cfg(all(feature = "cpu_cycles", not(feature = "use_time")))]
pub type Start = u64;

#[cfg(any(not(feature = "cpu_cycles"), feature = "use_time"))]
pub type Start = std::time::Instant;

/// Read current measurement (cycles or time)
#[inline(always)]
pub fn now() -> Start {
    #[cfg(all(feature = "cpu_cycles", not(feature = "use_time")))]
    {
        crate::utils::cycles::read_cycles()
    }
    #[cfg(any(not(feature = "cpu_cycles"), feature = "use_time"))]
    {
        std::time::Instant::now()
    }
}

/// Measurement elapsed since `start`
#[inline(always)]
pub fn elapsed(start: Start) -> Measurement {
    #[cfg(all(feature = "cpu_cycles", not(feature = "use_time")))]
    {
        crate::utils::cycles::read_cycles().saturating_sub(start)
    }
    #[cfg(any(not(feature = "cpu_cycles"), feature = "use_time"))]
    {
        start.elapsed()
    }
}

/// Raw measurement as an integer: cycles, or nanoseconds
pub fn to_nanos(m: Measurement) -> u64 {
    #[cfg(all(feature = "cpu_cycles", not(feature = "use_time")))]
    {
        m
    }
    #[cfg(any(not(feature = "cpu_cycles"), feature = "use_time"))]
    {
        m.as_nanos() as u64
    }
}

/// Get the measurement unit name
pub const fn unit_name() -> &'static str {
    if cfg!(any(not(feature = "cpu_cycles"), feature = "use_time")) {
        "ns"
    } else if cfg!(target_arch = "aarch64") {
        "ticks"
    } else {
        "cycles"
    }
}

/// Format a statistic for the results table.
///
/// Statistics are stored as `Duration`s whose nanosecond count holds the raw
/// measurement, so in cycle mode the count is printed with the cycle unit.
pub fn format_measurement(value: Duration) -> String {
    if cfg!(any(not(feature = "cpu_cycles"), feature = "use_time")) {
        format!("{:?}", value)
    } else {
        format!("{} {}", value.as_nanos(), unit_name())
    }
}

/// Time one expression.
///
/// Evaluates to `(Measurement, value)`; the value goes through `black_box`
/// so the expression cannot be optimized away.
#[macro_export]
macro_rules! measure {
    ($e:expr) => {{
        let start = $crate::utils::bench::now();
        let value = ::std::hint::black_box($e);
        ($crate::utils::bench::elapsed(start), value)
    }};
}
