//! Reduced procedure calls: the per-element accessor is replaced by indexing
//! into the buffer view obtained once from [`Vector::start`].

use crate::reduce::config::Reduction;
use crate::vector::Vector;

#[inline(never)]
pub fn combine_direct_access<R: Reduction>(cfg: &R, v: &Vector<R::Elem>, dest: &mut R::Elem) {
    *dest = cfg.identity();

    let data = v.start();
    let len = v.len();
    for i in 0..len {
        *dest = cfg.combine(*dest, data[i]);
    }
}
