//! Reduction configurations: the (element type, identity, operator) triple.
//!
//! Every rung of the ladder is generic over a [`Reduction`], so each
//! configuration is monomorphized separately and several can coexist in one
//! build.

use num_traits::{AsPrimitive, One, WrappingAdd, WrappingMul, Zero};
use std::fmt::Debug;
use std::marker::PhantomData;

/// An associative operator together with its two-sided identity.
pub trait Reduction {
    type Elem: Copy;

    /// Identity element: `combine(identity(), x) == x`.
    fn identity(&self) -> Self::Elem;

    /// The fold operator.
    fn combine(&self, a: Self::Elem, b: Self::Elem) -> Self::Elem;
}

/// Addition, starting from zero.
pub struct Sum<T>(PhantomData<T>);

/// Multiplication, starting from one.
pub struct Product<T>(PhantomData<T>);

impl<T> Sum<T> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Product<T> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

// Manual impls: derives would put the bounds on `T`.
impl<T> Clone for Sum<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Sum<T> {}
impl<T> Default for Sum<T> {
    fn default() -> Self {
        Self::new()
    }
}
impl<T> Debug for Sum<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sum<{}>", std::any::type_name::<T>())
    }
}

impl<T> Clone for Product<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Product<T> {}
impl<T> Default for Product<T> {
    fn default() -> Self {
        Self::new()
    }
}
impl<T> Debug for Product<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Product<{}>", std::any::type_name::<T>())
    }
}

/// Element arithmetic used by [`Sum`] and [`Product`].
///
/// Integers wrap, which keeps the operators associative modulo 2^n: a
/// regrouped fold may overflow in a partial result and still land on the
/// same value as the sequential fold. Floats use the IEEE operators.
pub trait Arith: Copy + Zero + One {
    fn plus(self, rhs: Self) -> Self;
    fn times(self, rhs: Self) -> Self;
}

macro_rules! wrapping_arith {
    ($($t:ty),*) => {$(
        impl Arith for $t {
            #[inline(always)]
            fn plus(self, rhs: Self) -> Self {
                WrappingAdd::wrapping_add(&self, &rhs)
            }

            #[inline(always)]
            fn times(self, rhs: Self) -> Self {
                WrappingMul::wrapping_mul(&self, &rhs)
            }
        }
    )*};
}

macro_rules! float_arith {
    ($($t:ty),*) => {$(
        impl Arith for $t {
            #[inline(always)]
            fn plus(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline(always)]
            fn times(self, rhs: Self) -> Self {
                self * rhs
            }
        }
    )*};
}

wrapping_arith!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
float_arith!(f32, f64);

impl<T: Arith> Reduction for Sum<T> {
    type Elem = T;

    #[inline(always)]
    fn identity(&self) -> T {
        T::zero()
    }

    #[inline(always)]
    fn combine(&self, a: T, b: T) -> T {
        a.plus(b)
    }
}

impl<T: Arith> Reduction for Product<T> {
    type Elem = T;

    #[inline(always)]
    fn identity(&self) -> T {
        T::one()
    }

    #[inline(always)]
    fn combine(&self, a: T, b: T) -> T {
        a.times(b)
    }
}

/// Numeric element the harness knows how to compare and report.
pub trait Element: Copy + Debug + PartialEq + AsPrimitive<f64> + Send + Sync + 'static {
    /// Allowed relative difference between rungs. Zero means bit-exact.
    const TOLERANCE: f64;
}

impl Element for i32 {
    const TOLERANCE: f64 = 0.0;
}
impl Element for i64 {
    const TOLERANCE: f64 = 0.0;
}
impl Element for u32 {
    const TOLERANCE: f64 = 0.0;
}
impl Element for u64 {
    const TOLERANCE: f64 = 0.0;
}
impl Element for f32 {
    const TOLERANCE: f64 = 1e-4;
}
impl Element for f64 {
    const TOLERANCE: f64 = 1e-9;
}

/// Whether `actual` is an acceptable result when `expected` is the reference.
///
/// Exact types compare with `==`. Floating types allow a difference of
/// `TOLERANCE` relative to the largest of `scale`, `|expected|` and 1, where
/// `scale` is typically the [`magnitude`] of the folded data.
pub fn results_agree<T: Element>(expected: T, actual: T, scale: f64) -> bool {
    if T::TOLERANCE == 0.0 {
        return expected == actual;
    }
    let (e, a): (f64, f64) = (expected.as_(), actual.as_());
    (e - a).abs() <= T::TOLERANCE * scale.max(e.abs()).max(1.0)
}

/// Sum of absolute values, the scale of the rounding error of a fold.
pub fn magnitude<T: Element>(data: &[T]) -> f64 {
    data.iter()
        .map(|&x| {
            let x: f64 = x.as_();
            x.abs()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_identity() {
        let sum = Sum::<i64>::new();
        assert_eq!(sum.identity(), 0);
        assert_eq!(sum.combine(sum.identity(), 42), 42);
        assert_eq!(sum.combine(42, sum.identity()), 42);
    }

    #[test]
    fn test_product_identity() {
        let product = Product::<f64>::new();
        assert_eq!(product.identity(), 1.0);
        assert_eq!(product.combine(product.identity(), 2.5), 2.5);
        assert_eq!(product.combine(3.0, 4.0), 12.0);
    }

    #[test]
    fn test_integer_combine_wraps() {
        let sum = Sum::<i64>::new();
        assert_eq!(sum.combine(i64::MAX, 1), i64::MIN);
        assert_eq!(sum.combine(sum.combine(i64::MAX, 1), -1), i64::MAX);

        let product = Product::<u8>::new();
        assert_eq!(product.combine(16, 16), 0);
    }

    #[test]
    fn test_results_agree_exact() {
        assert!(results_agree(31i64, 31, 0.0));
        assert!(!results_agree(31i64, 32, 1e12));
    }

    #[test]
    fn test_results_agree_tolerance() {
        assert!(results_agree(1.0f32, 1.0 + 1e-6, 0.0));
        assert!(!results_agree(1.0f32, 1.01, 0.0));
        assert!(results_agree(1000.0f64, 1000.0 + 1e-8, 0.0));
        assert!(!results_agree(0.0f64, 1e-6, 0.0));
        // A large scale widens the window even when the result is near zero.
        assert!(results_agree(0.0f32, 0.01, 1000.0));
    }

    #[test]
    fn test_magnitude() {
        assert_eq!(magnitude(&[3i64, -4, 5]), 12.0);
        assert_eq!(magnitude::<f32>(&[]), 0.0);
    }
}
