//! Loop unrolling by 2 and by 3 with a single accumulator.
//!
//! The unrolled body folds its elements left to right into the accumulator,
//! so the combination order is the same as the baseline's. Lengths shorter
//! than the unroll factor skip the body and go straight to the tail.

use crate::reduce::config::Reduction;
use crate::vector::Vector;

/// Two elements per iteration, 0 or 1 trailing element.
#[inline(never)]
pub fn combine_unroll_x2<R: Reduction>(cfg: &R, v: &Vector<R::Elem>, dest: &mut R::Elem) {
    let mut chunks = v.start().chunks_exact(2);

    let mut acc = cfg.identity();
    for pair in chunks.by_ref() {
        acc = cfg.combine(cfg.combine(acc, pair[0]), pair[1]);
    }

    for &x in chunks.remainder() {
        acc = cfg.combine(acc, x);
    }

    *dest = acc;
}

/// Three elements per iteration, 0 to 2 trailing elements.
#[inline(never)]
pub fn combine_unroll_x3<R: Reduction>(cfg: &R, v: &Vector<R::Elem>, dest: &mut R::Elem) {
    let mut chunks = v.start().chunks_exact(3);

    let mut acc = cfg.identity();
    for triple in chunks.by_ref() {
        acc = cfg.combine(cfg.combine(cfg.combine(acc, triple[0]), triple[1]), triple[2]);
    }

    for &x in chunks.remainder() {
        acc = cfg.combine(acc, x);
    }

    *dest = acc;
}
