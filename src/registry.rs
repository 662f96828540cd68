//! Algorithm registry for dynamic algorithm discovery and execution.
//!
//! Each configured combine ladder is registered as one algorithm; the CLI and
//! the runner only ever see the [`AlgorithmRunner`] trait.

use crate::utils::timer::{Variant, VariantResult};

/// Result from running a variant benchmark (alias for VariantResult)
pub type BenchmarkResult = VariantResult;

/// Error returned when a variant disagrees with the reference rung.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("algorithm '{algorithm}' has no 'original' variant to verify against")]
    MissingReference { algorithm: &'static str },

    #[error("variant '{variant}' failed verification at size {size}: expected {expected}, got {actual}")]
    Mismatch {
        variant: &'static str,
        size: usize,
        expected: String,
        actual: String,
    },
}

/// Trait that all algorithm benchmarkers must implement
pub trait AlgorithmRunner: Send + Sync {
    /// Name of the algorithm (e.g., "combine_sum_i64")
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Category (e.g., "reduce")
    fn category(&self) -> &'static str;

    /// Get list of available variant names
    fn available_variants(&self) -> Vec<&'static str>;

    /// Get closures for each variant, ready to be measured.
    /// Each closure does ONE execution over an input of `size` elements
    /// generated from `seed`, and returns its measurement and result.
    fn get_variant_closures<'a>(&'a self, size: usize, seed: u64) -> Vec<Variant<'a>>;

    /// Verify correctness of all variants against the reference
    fn verify(&self) -> Result<(), VerifyError>;
}

/// Global registry of all algorithms
pub struct AlgorithmRegistry {
    algorithms: Vec<Box<dyn AlgorithmRunner>>,
}

impl AlgorithmRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            algorithms: Vec::new(),
        }
    }

    /// Register an algorithm
    pub fn register<A: AlgorithmRunner + 'static>(&mut self, algo: A) {
        self.algorithms.push(Box::new(algo));
    }

    /// Get all registered algorithms
    pub fn all(&self) -> &[Box<dyn AlgorithmRunner>] {
        &self.algorithms
    }

    /// Find algorithm by name
    pub fn find(&self, name: &str) -> Option<&dyn AlgorithmRunner> {
        self.algorithms
            .iter()
            .find(|a| a.name() == name)
            .map(|a| a.as_ref())
    }

    /// List algorithm names
    pub fn list_names(&self) -> Vec<&'static str> {
        self.algorithms.iter().map(|a| a.name()).collect()
    }

    /// List algorithms by category
    pub fn by_category(&self, category: &str) -> Vec<&dyn AlgorithmRunner> {
        self.algorithms
            .iter()
            .filter(|a| a.category() == category)
            .map(|a| a.as_ref())
            .collect()
    }
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the default registry with all algorithms
pub fn build_registry() -> AlgorithmRegistry {
    use crate::reduce::combine;

    let mut registry = AlgorithmRegistry::new();

    registry.register(combine::sum_i64_runner());
    registry.register(combine::sum_f32_runner());
    registry.register(combine::product_f64_runner());

    registry
}
