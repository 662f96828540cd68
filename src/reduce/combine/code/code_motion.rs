//! Code motion: the length query is hoisted out of the loop.

use crate::reduce::config::Reduction;
use crate::vector::Vector;

/// Same as the baseline, with `len()` evaluated once.
#[inline(never)]
pub fn combine_code_motion<R: Reduction>(cfg: &R, v: &Vector<R::Elem>, dest: &mut R::Elem) {
    *dest = cfg.identity();

    let len = v.len();
    for i in 0..len {
        let mut val = cfg.identity();
        v.get_element(i, &mut val);
        *dest = cfg.combine(*dest, val);
    }
}
