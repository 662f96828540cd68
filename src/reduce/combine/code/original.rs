//! Baseline rung: no code-level optimizations.
//!
//! The length is re-queried and every element is fetched through the
//! bounds-checked accessor on each iteration, and the running result lives in
//! the destination rather than in a local.

use crate::reduce::config::Reduction;
use crate::vector::Vector;

/// Fold `v` into `dest` using only the vector's safe accessors.
///
/// # Example
/// ```
/// use combine_ladder::reduce::combine::combine_original;
/// use combine_ladder::reduce::config::Sum;
/// use combine_ladder::vector::Vector;
///
/// let v = Vector::from_vec(vec![3, 1, 4, 1, 5, 9, 2, 6]);
/// let mut dest = 0;
/// combine_original(&Sum::new(), &v, &mut dest);
/// assert_eq!(dest, 31);
/// ```
#[inline(never)]
pub fn combine_original<R: Reduction>(cfg: &R, v: &Vector<R::Elem>, dest: &mut R::Elem) {
    *dest = cfg.identity();

    let mut i = 0;
    while i < v.len() {
        let mut val = cfg.identity();
        v.get_element(i, &mut val);
        *dest = cfg.combine(*dest, val);
        i += 1;
    }
}
