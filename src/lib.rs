//! # Combine Ladder
//!
//! One sequential reduction written seven times, each rung removing one
//! layer of abstraction or one source of overhead, plus the harness that
//! times the rungs against each other and checks that they agree.

pub mod reduce;
pub mod registry;
pub mod utils;
pub mod vector;

/// Re-export tui from utils
pub use utils::tui;

/// Re-export commonly used items
pub mod prelude {
    pub use crate::reduce::combine::{self, Ladder, Observer, Technique};
    pub use crate::reduce::config::{Product, Reduction, Sum};
    pub use crate::registry::{build_registry, AlgorithmRegistry, AlgorithmRunner};
    pub use crate::vector::Vector;
}
