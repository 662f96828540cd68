//! FFI bindings for the C rungs (`int64_t` sum only).

use crate::reduce::config::Sum;
use crate::vector::Vector;

#[cfg(c_implementation_active)]
mod ffi {
    use libc::size_t;

    extern "C" {
        pub fn combine_c_original(data: *const i64, len: size_t, dest: *mut i64);
        pub fn combine_c_accumulator(data: *const i64, len: size_t, dest: *mut i64);
        pub fn combine_c_unroll_x2_parallel(data: *const i64, len: size_t, dest: *mut i64);
    }
}

/// Check if C implementations are available
#[cfg(c_implementation_active)]
pub const C_IMPL_AVAILABLE: bool = true;

#[cfg(not(c_implementation_active))]
pub const C_IMPL_AVAILABLE: bool = false;

macro_rules! c_rung {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[cfg(c_implementation_active)]
        pub fn $name(_cfg: &Sum<i64>, v: &Vector<i64>, dest: &mut i64) {
            let data = v.start();
            // SAFETY: `data` is valid for `data.len()` reads and `dest` is a
            // live exclusive borrow; the C side keeps neither pointer.
            unsafe { ffi::$name(data.as_ptr(), data.len(), dest) }
        }

        #[cfg(not(c_implementation_active))]
        pub fn $name(_cfg: &Sum<i64>, _v: &Vector<i64>, _dest: &mut i64) {
            panic!("C implementation not compiled (requires GCC, MSVC, or Apple Clang)")
        }
    };
}

c_rung!(
    /// C baseline: length and element fetched through helper calls.
    combine_c_original
);
c_rung!(
    /// C local-accumulator rung.
    combine_c_accumulator
);
c_rung!(
    /// C two-accumulator rung.
    combine_c_unroll_x2_parallel
);
