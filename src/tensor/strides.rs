//! Strides type: element offsets for tensor memory layout

use super::shape::STACK_DIMS;
use smallvec::SmallVec;
use std::fmt;
use std::ops::Deref;

/// Strides type: element offsets between consecutive elements along each dimension
///
/// Strides are derived from a shape, never supplied by callers, so the only
/// constructors compute them. Signed so views with negative steps stay expressible.
/// NOTE: Strides are in ELEMENTS, not bytes
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Strides(SmallVec<[isize; STACK_DIMS]>);

impl Strides {
    /// Compute contiguous strides for a given shape (row-major order)
    ///
    /// The last dimension gets stride 1; every earlier stride is the next
    /// stride times the next dimension. An empty shape yields empty strides.
    pub fn contiguous(shape: &[usize]) -> Self {
        let mut strides: SmallVec<[isize; STACK_DIMS]> = SmallVec::with_capacity(shape.len());
        let mut stride = 1isize;

        for &dim in shape.iter().rev() {
            strides.push(stride);
            stride *= dim as isize;
        }

        strides.reverse();
        Self(strides)
    }

    /// View strides as a slice.
    pub fn as_slice(&self) -> &[isize] {
        self.0.as_slice()
    }

    /// Number of stride entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this stride vector is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Deref for Strides {
    type Target = [isize];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl fmt::Debug for Strides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<[isize]> for Strides {
    fn as_ref(&self) -> &[isize] {
        self.0.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contiguous_strides() {
        assert_eq!(Strides::contiguous(&[2, 3, 4]).as_slice(), &[12, 4, 1]);
        assert_eq!(Strides::contiguous(&[5]).as_slice(), &[1]);
        assert_eq!(Strides::contiguous(&[3, 1, 2]).as_slice(), &[2, 2, 1]);
    }

    #[test]
    fn test_empty_shape_has_empty_strides() {
        let strides = Strides::contiguous(&[]);
        assert!(strides.is_empty());
        assert_eq!(strides.len(), 0);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(Strides::contiguous(&[4, 5]), Strides::contiguous(&[4, 5]));
    }
}
