//! Layout: shape and strides for tensor memory layout

use super::{Shape, Strides};
use std::fmt;

/// Layout describes the memory layout of a tensor
///
/// Shape and strides are only ever built together: every constructor derives
/// the strides from the shape it installs, so the two cannot diverge.
///
/// Address of element at indices [i0, i1, ..., in]:
///   i0 * strides[0] + i1 * strides[1] + ... + in * strides[n]
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Layout {
    /// Shape: size along each dimension
    shape: Shape,
    /// Strides: offset (in elements) between consecutive elements along each dimension
    strides: Strides,
}

impl Layout {
    /// Create a new contiguous (row-major/C-order) layout from a shape
    ///
    /// # Example
    /// ```
    /// use tensr::tensor::Layout;
    /// let layout = Layout::contiguous(&[2, 3, 4]);
    /// assert_eq!(layout.shape(), &[2, 3, 4]);
    /// assert_eq!(layout.strides(), &[12, 4, 1]);
    /// ```
    pub fn contiguous(shape: &[usize]) -> Self {
        Self {
            shape: Shape::from(shape),
            strides: Strides::contiguous(shape),
        }
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Get the shape as its owning type
    #[inline]
    pub fn dims(&self) -> &Shape {
        &self.shape
    }

    /// Get the strides
    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Number of dimensions (rank)
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    /// Total number of elements (0 for the empty sentinel shape)
    #[inline]
    pub fn elem_count(&self) -> usize {
        self.shape.numel()
    }

    /// Check if memory is contiguous (row-major order)
    pub fn is_contiguous(&self) -> bool {
        self.strides == Strides::contiguous(&self.shape)
    }

    /// Get size along a specific dimension
    ///
    /// Supports negative indexing: -1 is the last dimension
    pub fn dim(&self, d: isize) -> Option<usize> {
        let idx = self.normalize_dim(d)?;
        Some(self.shape[idx])
    }

    /// Get stride along a specific dimension
    pub fn stride(&self, d: isize) -> Option<isize> {
        let idx = self.normalize_dim(d)?;
        Some(self.strides[idx])
    }

    /// Normalize a dimension index (handle negative indices)
    pub fn normalize_dim(&self, d: isize) -> Option<usize> {
        let ndim = self.ndim() as isize;
        let idx = if d < 0 { ndim + d } else { d };
        if idx >= 0 && idx < ndim {
            Some(idx as usize)
        } else {
            None
        }
    }

    /// Compute the linear index (element offset) for given indices
    ///
    /// Returns `None` on a rank mismatch or an out-of-bounds index.
    pub fn index(&self, indices: &[usize]) -> Option<usize> {
        if indices.len() != self.ndim() {
            return None;
        }

        if indices.iter().zip(self.shape.iter()).any(|(&i, &dim)| i >= dim) {
            return None;
        }

        let linear: isize = indices
            .iter()
            .zip(self.strides.iter())
            .map(|(&idx, &stride)| idx as isize * stride)
            .sum();

        Some(linear as usize)
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Layout {{ shape: {:?}, strides: {:?} }}",
            self.shape.as_slice(),
            self.strides.as_slice(),
        )
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contiguous_layout() {
        let layout = Layout::contiguous(&[2, 3, 4]);
        assert_eq!(layout.shape(), &[2, 3, 4]);
        assert_eq!(layout.strides(), &[12, 4, 1]);
        assert_eq!(layout.elem_count(), 24);
        assert!(layout.is_contiguous());
    }

    #[test]
    fn test_empty_layout() {
        let layout = Layout::contiguous(&[]);
        assert_eq!(layout.ndim(), 0);
        assert!(layout.strides().is_empty());
        assert_eq!(layout.elem_count(), 0);
    }

    #[test]
    fn test_dim_and_stride() {
        let layout = Layout::contiguous(&[2, 3, 4]);
        assert_eq!(layout.dim(0), Some(2));
        assert_eq!(layout.dim(-1), Some(4));
        assert_eq!(layout.dim(3), None);
        assert_eq!(layout.stride(-2), Some(4));
        assert_eq!(layout.stride(-4), None);
    }

    #[test]
    fn test_index() {
        let layout = Layout::contiguous(&[2, 3]);
        assert_eq!(layout.index(&[0, 0]), Some(0));
        assert_eq!(layout.index(&[0, 2]), Some(2));
        assert_eq!(layout.index(&[1, 0]), Some(3));
        assert_eq!(layout.index(&[1, 2]), Some(5));
        assert_eq!(layout.index(&[2, 0]), None); // Out of bounds
        assert_eq!(layout.index(&[1]), None); // Rank mismatch
    }

    #[test]
    fn test_debug() {
        let layout = Layout::contiguous(&[2, 3]);
        assert_eq!(
            format!("{layout:?}"),
            "Layout { shape: [2, 3], strides: [3, 1] }"
        );
        assert_eq!(layout.to_string(), "(2, 3)");
    }
}
