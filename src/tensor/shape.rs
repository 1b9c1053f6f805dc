//! Shape type: dimensions of a tensor

use crate::error::{Error, Result};
use smallvec::SmallVec;
use std::fmt;
use std::iter::FromIterator;
use std::ops::Deref;

/// Stack allocation threshold for dimensions
/// Most tensors have 4 or fewer dimensions, so we stack-allocate up to 4
pub(crate) const STACK_DIMS: usize = 4;

/// Shape type: dimensions of a tensor
///
/// An empty shape is the "not yet shaped" sentinel: its element count is 0 and
/// it never describes an allocatable tensor.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape(SmallVec<[usize; STACK_DIMS]>);

impl Shape {
    /// Create an empty shape.
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Create an empty shape with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(SmallVec::with_capacity(capacity))
    }

    /// Push a dimension.
    pub fn push(&mut self, dim: usize) {
        self.0.push(dim);
    }

    /// View shape as a slice.
    pub fn as_slice(&self) -> &[usize] {
        self.0.as_slice()
    }

    /// Number of dimensions in this shape.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// Total number of elements: the product of all dimensions, or 0 for an
    /// empty shape.
    #[inline]
    pub fn numel(&self) -> usize {
        numel(&self.0)
    }

    /// Reject shapes that cannot back an allocated tensor
    ///
    /// # Errors
    ///
    /// `InvalidShape` if the shape is empty or any dimension is zero.
    pub fn validate(&self) -> Result<()> {
        validate(&self.0)
    }
}

/// Element count of `dims`, with the empty shape counting as 0
#[inline]
pub fn numel(dims: &[usize]) -> usize {
    if dims.is_empty() {
        return 0;
    }
    dims.iter().product()
}

/// Element count of `dims`, or `None` if the product overflows `usize`
#[inline]
pub fn checked_numel(dims: &[usize]) -> Option<usize> {
    if dims.is_empty() {
        return Some(0);
    }
    dims.iter().try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
}

/// Check that `dims` is non-empty with every dimension positive
///
/// # Errors
///
/// `InvalidShape` describing the first violation.
pub fn validate(dims: &[usize]) -> Result<()> {
    if dims.is_empty() {
        return Err(Error::invalid_shape(dims, "shape cannot be empty"));
    }
    if dims.contains(&0) {
        return Err(Error::invalid_shape(dims, "dimensions must be positive"));
    }
    Ok(())
}

impl Deref for Shape {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, dim) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{dim}")?;
        }
        write!(f, ")")
    }
}

impl AsRef<[usize]> for Shape {
    fn as_ref(&self) -> &[usize] {
        self.0.as_slice()
    }
}

impl From<Vec<usize>> for Shape {
    fn from(value: Vec<usize>) -> Self {
        Self(value.into_iter().collect())
    }
}

impl From<&[usize]> for Shape {
    fn from(value: &[usize]) -> Self {
        Self(value.iter().copied().collect())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(value: [usize; N]) -> Self {
        Self(value.into_iter().collect())
    }
}

impl FromIterator<usize> for Shape {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numel() {
        assert_eq!(Shape::from([2, 3, 4]).numel(), 24);
        assert_eq!(Shape::from([7]).numel(), 7);
        assert_eq!(Shape::from([2, 0, 4]).numel(), 0);
        assert_eq!(Shape::new().numel(), 0);
    }

    #[test]
    fn test_checked_numel() {
        assert_eq!(checked_numel(&[2, 3, 4]), Some(24));
        assert_eq!(checked_numel(&[]), Some(0));
        assert_eq!(checked_numel(&[usize::MAX, 2]), None);
    }

    #[test]
    fn test_validate() {
        assert!(Shape::from([2, 3]).validate().is_ok());
        assert_eq!(
            Shape::new().validate(),
            Err(Error::invalid_shape(&[], "shape cannot be empty"))
        );
        assert_eq!(
            Shape::from([0, 0, 0]).validate(),
            Err(Error::invalid_shape(&[0, 0, 0], "dimensions must be positive"))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Shape::from([2, 3]).to_string(), "(2, 3)");
        assert_eq!(format!("{:?}", Shape::from([5])), "[5]");
    }

    #[test]
    fn test_spills_past_stack_dims() {
        let shape: Shape = (1..=6).collect();
        assert_eq!(shape.ndim(), 6);
        assert_eq!(shape.numel(), 720);
    }
}
