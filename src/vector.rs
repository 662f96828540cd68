//! # Vector
//!
//! Owned, fixed-length, contiguous buffer that every rung of the ladder reads.
//!
//! Three levels of access are exposed, from most to least abstract:
//!
//! - [`Vector::len`]: element count, fixed at construction
//! - [`Vector::get_element`]: bounds-checked copy of a single element
//! - [`Vector::start`]: read-only view over the whole buffer

use num_traits::Zero;

// Calls to `get_element` on this thread, for tests that count accessor use.
#[cfg(test)]
thread_local! {
    pub(crate) static ELEMENT_READS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Fixed-length vector of `T`.
///
/// The buffer is a boxed slice, so its length cannot change once built and it
/// is freed exactly once when the vector is dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct Vector<T> {
    data: Box<[T]>,
}

impl<T: Copy> Vector<T> {
    /// Build a vector that takes ownership of `data`.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            data: data.into_boxed_slice(),
        }
    }

    /// Build a vector by copying `data`.
    pub fn from_slice(data: &[T]) -> Self {
        Self { data: data.into() }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Copy the element at `index` into `out`.
    ///
    /// Returns `false` and leaves `out` untouched when `index` is out of range.
    ///
    /// # Example
    /// ```
    /// use combine_ladder::vector::Vector;
    ///
    /// let v = Vector::from_vec(vec![10, 20]);
    /// let mut out = -1;
    /// assert!(v.get_element(1, &mut out));
    /// assert_eq!(out, 20);
    /// assert!(!v.get_element(2, &mut out));
    /// assert_eq!(out, 20);
    /// ```
    #[inline]
    pub fn get_element(&self, index: usize, out: &mut T) -> bool {
        #[cfg(test)]
        ELEMENT_READS.with(|reads| reads.set(reads.get() + 1));

        match self.data.get(index) {
            Some(&value) => {
                *out = value;
                true
            }
            None => false,
        }
    }

    /// Read-only view of the whole buffer, starting at the first element.
    #[inline]
    pub fn start(&self) -> &[T] {
        &self.data
    }
}

impl<T: Copy + Zero> Vector<T> {
    /// Build a vector of `len` zeros.
    pub fn zeroed(len: usize) -> Self {
        Self {
            data: vec![T::zero(); len].into_boxed_slice(),
        }
    }
}

impl<T: Copy> From<Vec<T>> for Vector<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

impl<T: Copy> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}
