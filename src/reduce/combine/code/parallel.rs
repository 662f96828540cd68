//! Loop unrolling by 2 with two independent accumulators.
//!
//! Even-indexed elements fold into `acc0` and odd-indexed ones into `acc1`.
//! Neither accumulator reads the other inside the loop, so the two dependency
//! chains can retire in parallel. The odd trailing element joins `acc0`.
//!
//! For floating-point operators the regrouping changes rounding, so results
//! may differ from the baseline by a few ulps.

use crate::reduce::config::Reduction;
use crate::vector::Vector;

#[inline(never)]
pub fn combine_unroll_x2_parallel<R: Reduction>(
    cfg: &R,
    v: &Vector<R::Elem>,
    dest: &mut R::Elem,
) {
    let mut chunks = v.start().chunks_exact(2);

    let mut acc0 = cfg.identity();
    let mut acc1 = cfg.identity();
    for pair in chunks.by_ref() {
        acc0 = cfg.combine(acc0, pair[0]);
        acc1 = cfg.combine(acc1, pair[1]);
    }

    if let Some(&last) = chunks.remainder().first() {
        acc0 = cfg.combine(acc0, last);
    }

    *dest = cfg.combine(acc0, acc1);
}
