//! Eliminated memory round-trips: the running result stays in a local and the
//! destination is written exactly once.

use crate::reduce::config::Reduction;
use crate::vector::Vector;

#[inline(never)]
pub fn combine_accumulator<R: Reduction>(cfg: &R, v: &Vector<R::Elem>, dest: &mut R::Elem) {
    let data = v.start();
    let len = v.len();

    let mut acc = cfg.identity();
    for i in 0..len {
        acc = cfg.combine(acc, data[i]);
    }

    *dest = acc;
}
