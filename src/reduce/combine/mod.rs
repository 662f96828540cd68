//! # Combine Ladder
//!
//! A fold `dest = IDENT OP v[0] OP v[1] OP ... OP v[n-1]` implemented seven
//! times, each rung removing one concrete cost from the previous one:
//!
//! | Rung                 | Added optimization                          |
//! |----------------------|---------------------------------------------|
//! | `original`           | none                                        |
//! | `code_motion`        | length query hoisted out of the loop        |
//! | `direct_access`      | safe accessor replaced by buffer indexing   |
//! | `accumulator`        | running result kept in a local              |
//! | `unroll_x2`          | two elements per iteration                  |
//! | `unroll_x3`          | three elements per iteration                |
//! | `unroll_x2_parallel` | two elements per iteration, two accumulators|
//!
//! Every rung writes the same result for the same input (up to rounding for
//! floating-point operators) and none of them mutates the input.

pub mod code;
pub mod ladder;
#[cfg(test)]
mod test;

pub use code::*;
pub use ladder::{Ladder, Observer, Silent, Traced};

use crate::reduce::config::{magnitude, results_agree, Element, Product, Reduction, Sum};
use crate::registry::{AlgorithmRunner, VerifyError};
use crate::utils::timer::Variant;
use crate::utils::VariantInfo;
use crate::vector::Vector;
use num_traits::AsPrimitive;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// Lengths checked by [`CombineRunner::verify`]: every tail length of the
/// unrolled rungs, plus a long non-aligned input.
pub const VERIFY_SIZES: [usize; 9] = [0, 1, 2, 3, 4, 5, 6, 7, 1023];

/// Seed for the data used by [`CombineRunner::verify`].
const VERIFY_SEED: u64 = 0xC0FFEE;

/// Runner for one configuration of the combine ladder.
pub struct CombineRunner<R: Reduction> {
    name: &'static str,
    description: &'static str,
    ladder: Ladder<R, Traced>,
    generate: fn(&mut StdRng) -> R::Elem,
    extra_variants: fn() -> Vec<VariantInfo<CombineFn<R>>>,
}

impl<R> CombineRunner<R>
where
    R: Reduction + Send + Sync + 'static,
    R::Elem: Element,
{
    pub fn new(
        name: &'static str,
        description: &'static str,
        config: R,
        generate: fn(&mut StdRng) -> R::Elem,
    ) -> Self {
        Self {
            name,
            description,
            ladder: Ladder::new(config).with_observer(Traced),
            generate,
            extra_variants: Vec::new,
        }
    }

    /// Append variants beyond the Rust rungs (e.g. the C rungs).
    pub fn with_extra_variants(mut self, extra: fn() -> Vec<VariantInfo<CombineFn<R>>>) -> Self {
        self.extra_variants = extra;
        self
    }

    /// Rust rungs in ladder order followed by the extra variants.
    pub fn variants(&self) -> Vec<VariantInfo<CombineFn<R>>> {
        let mut variants = code::available_variants::<R>();
        variants.extend((self.extra_variants)());
        variants
    }

    /// Reproducible input of `size` elements.
    pub fn generate_input(&self, size: usize, seed: u64) -> Vector<R::Elem> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..size).map(|_| (self.generate)(&mut rng)).collect()
    }
}

impl<R> AlgorithmRunner for CombineRunner<R>
where
    R: Reduction + Send + Sync + 'static,
    R::Elem: Element,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn category(&self) -> &'static str {
        "reduce"
    }

    fn available_variants(&self) -> Vec<&'static str> {
        self.variants().iter().map(|v| v.name).collect()
    }

    fn get_variant_closures<'a>(&'a self, size: usize, seed: u64) -> Vec<Variant<'a>> {
        let input = Arc::new(self.generate_input(size, seed));
        let config = self.ladder.config();

        self.variants()
            .into_iter()
            .map(|v| {
                let input = Arc::clone(&input);
                let func = v.function;

                Variant {
                    name: v.name,
                    description: v.description,
                    run: Box::new(move || {
                        let mut dest = config.identity();
                        let (elapsed, _) = crate::measure!(func(config, &input, &mut dest));
                        let sample: f64 = std::hint::black_box(dest).as_();
                        (elapsed, Some(sample))
                    }),
                }
            })
            .collect()
    }

    fn verify(&self) -> Result<(), VerifyError> {
        let variants = self.variants();
        if !variants.iter().any(|v| v.name == Technique::Original.name()) {
            return Err(VerifyError::MissingReference {
                algorithm: self.name,
            });
        }
        let config = self.ladder.config();

        for size in VERIFY_SIZES {
            let input = self.generate_input(size, VERIFY_SEED);
            let scale = magnitude(input.start());

            let mut expected = config.identity();
            self.ladder.reduce(Technique::Original, &input, &mut expected);

            for variant in variants.iter().filter(|v| v.name != Technique::Original.name()) {
                let mut actual = config.identity();
                // C rungs have no technique and bypass the ladder.
                match Technique::from_name(variant.name) {
                    Some(technique) => self.ladder.reduce(technique, &input, &mut actual),
                    None => (variant.function)(config, &input, &mut actual),
                }

                if !results_agree(expected, actual, scale) {
                    tracing::warn!(
                        algorithm = self.name,
                        variant = variant.name,
                        size,
                        "verification failed"
                    );
                    return Err(VerifyError::Mismatch {
                        variant: variant.name,
                        size,
                        expected: format!("{:?}", expected),
                        actual: format!("{:?}", actual),
                    });
                }
            }
        }

        Ok(())
    }
}

/// `i64` sum: integer configuration, every rung bit-exact. Carries the C rungs.
pub fn sum_i64_runner() -> CombineRunner<Sum<i64>> {
    CombineRunner::new(
        "combine_sum_i64",
        "Sum of i64 elements (exact arithmetic)",
        Sum::new(),
        |rng: &mut StdRng| rng.random_range(-1000i64..1000),
    )
    .with_extra_variants(code::c_variants)
}

/// `f32` sum: rungs agree up to rounding.
pub fn sum_f32_runner() -> CombineRunner<Sum<f32>> {
    CombineRunner::new(
        "combine_sum_f32",
        "Sum of f32 elements (rounding may differ between rungs)",
        Sum::new(),
        |rng: &mut StdRng| rng.random_range(-1.0f32..1.0),
    )
}

/// `f64` product over values close to one, so long inputs stay finite.
pub fn product_f64_runner() -> CombineRunner<Product<f64>> {
    CombineRunner::new(
        "combine_product_f64",
        "Product of f64 elements close to 1.0",
        Product::new(),
        |rng: &mut StdRng| rng.random_range(0.999f64..1.001),
    )
}
