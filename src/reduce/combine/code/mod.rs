//! Combine ladder implementations.
//!
//! Every rung has the same signature and the same result; only the shape of
//! the loop changes from one rung to the next.

mod accumulator;
pub mod c_impl;
mod code_motion;
mod direct_access;
mod original;
mod parallel;
mod unroll;

pub use accumulator::combine_accumulator;
pub use c_impl::C_IMPL_AVAILABLE;
pub use code_motion::combine_code_motion;
pub use direct_access::combine_direct_access;
pub use original::combine_original;
pub use parallel::combine_unroll_x2_parallel;
pub use unroll::{combine_unroll_x2, combine_unroll_x3};

use crate::reduce::config::{Reduction, Sum};
use crate::utils::VariantInfo;
use crate::vector::Vector;

/// Signature shared by every rung: fold `vector` under `config` into `dest`.
pub type CombineFn<R> = fn(&R, &Vector<<R as Reduction>::Elem>, &mut <R as Reduction>::Elem);

/// The rungs of the ladder, in increasing optimization order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Technique {
    Original,
    CodeMotion,
    DirectAccess,
    Accumulator,
    UnrollX2,
    UnrollX3,
    UnrollX2Parallel,
}

impl Technique {
    pub const ALL: [Technique; 7] = [
        Technique::Original,
        Technique::CodeMotion,
        Technique::DirectAccess,
        Technique::Accumulator,
        Technique::UnrollX2,
        Technique::UnrollX3,
        Technique::UnrollX2Parallel,
    ];

    /// Variant identifier used by the registry and the CLI.
    pub const fn name(self) -> &'static str {
        match self {
            Technique::Original => "original",
            Technique::CodeMotion => "code_motion",
            Technique::DirectAccess => "direct_access",
            Technique::Accumulator => "accumulator",
            Technique::UnrollX2 => "unroll_x2",
            Technique::UnrollX3 => "unroll_x3",
            Technique::UnrollX2Parallel => "unroll_x2_parallel",
        }
    }

    /// Optimization added by this rung.
    pub const fn description(self) -> &'static str {
        match self {
            Technique::Original => "No code-level optimizations",
            Technique::CodeMotion => "Code motion (length hoisted out of the loop)",
            Technique::DirectAccess => "Reduced procedure calls (direct buffer access)",
            Technique::Accumulator => "Eliminated unneeded memory accesses (local accumulator)",
            Technique::UnrollX2 => "Loop unrolling x2",
            Technique::UnrollX3 => "Loop unrolling x3",
            Technique::UnrollX2Parallel => "Loop unrolling x2, parallelism x2",
        }
    }

    /// Unroll factor of the main loop (1 for the non-unrolled rungs).
    pub const fn unroll_factor(self) -> usize {
        match self {
            Technique::UnrollX2 | Technique::UnrollX2Parallel => 2,
            Technique::UnrollX3 => 3,
            _ => 1,
        }
    }

    /// The rung's implementation for configuration `R`.
    pub fn function<R: Reduction>(self) -> CombineFn<R> {
        match self {
            Technique::Original => combine_original::<R>,
            Technique::CodeMotion => combine_code_motion::<R>,
            Technique::DirectAccess => combine_direct_access::<R>,
            Technique::Accumulator => combine_accumulator::<R>,
            Technique::UnrollX2 => combine_unroll_x2::<R>,
            Technique::UnrollX3 => combine_unroll_x3::<R>,
            Technique::UnrollX2Parallel => combine_unroll_x2_parallel::<R>,
        }
    }

    pub fn from_name(name: &str) -> Option<Technique> {
        Technique::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl std::fmt::Display for Technique {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// All Rust rungs for configuration `R`, in ladder order.
pub fn available_variants<R: Reduction>() -> Vec<VariantInfo<CombineFn<R>>> {
    Technique::ALL
        .into_iter()
        .map(|t| VariantInfo {
            name: t.name(),
            description: t.description(),
            function: t.function::<R>(),
        })
        .collect()
}

/// C rungs, available for the `i64` sum only. Empty when the build script
/// did not compile the C sources.
pub fn c_variants() -> Vec<VariantInfo<CombineFn<Sum<i64>>>> {
    if !C_IMPL_AVAILABLE {
        return Vec::new();
    }

    let variants: Vec<VariantInfo<CombineFn<Sum<i64>>>> = vec![
        VariantInfo {
            name: "c-original",
            description: "C baseline (helper calls per element)",
            function: c_impl::combine_c_original,
        },
        VariantInfo {
            name: "c-accumulator",
            description: "C local accumulator",
            function: c_impl::combine_c_accumulator,
        },
        VariantInfo {
            name: "c-unroll_x2_parallel",
            description: "C loop unrolling x2, parallelism x2",
            function: c_impl::combine_c_unroll_x2_parallel,
        },
    ];

    variants
}
