//! Shape inference and flattening for nested literal data
//!
//! `vec![vec![1.0f32, 2.0], vec![3.0, 4.0]]` and `[[1, 2], [3, 4]]` both describe a
//! `[2, 2]` tensor. Inference reads the first element at every level; the
//! regularity check then walks all siblings so ragged input fails instead of
//! being flattened into a buffer of the wrong size.

use super::Shape;
use crate::dtype::Element;
use crate::error::{Error, Result};

/// Arbitrarily nested sequence-of-sequences data with scalar leaves
pub trait NestedData {
    /// Scalar type at the leaves
    type Elem: Element;

    /// Infer the shape from the first element at every nesting level
    ///
    /// Scalars have an empty shape. An empty sequence infers `[0]` and stops.
    fn infer_shape(&self) -> Shape {
        let mut shape = Shape::new();
        self.collect_dims(&mut shape);
        shape
    }

    /// Append this level's dimension and those below it to `shape`
    fn collect_dims(&self, shape: &mut Shape);

    /// Verify every sibling at every level matches `shape[depth..]`
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` at the first irregular sibling: `expected` is `shape`,
    /// `got` is `shape` with the offending dimension replaced by its actual length.
    fn check_shape(&self, shape: &Shape, depth: usize) -> Result<()>;

    /// Append all leaves depth-first (row-major order)
    fn flatten_into(&self, out: &mut Vec<Self::Elem>);

    /// Collect all leaves in row-major order
    fn flatten(&self) -> Vec<Self::Elem> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }
}

macro_rules! impl_nested_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl NestedData for $ty {
                type Elem = $ty;

                #[inline]
                fn collect_dims(&self, _shape: &mut Shape) {}

                #[inline]
                fn check_shape(&self, _shape: &Shape, _depth: usize) -> Result<()> {
                    Ok(())
                }

                #[inline]
                fn flatten_into(&self, out: &mut Vec<Self::Elem>) {
                    out.push(*self);
                }
            }
        )*
    };
}

impl_nested_scalar!(f64, f32, i64, i32, i16);

#[cfg(feature = "f16")]
impl_nested_scalar!(half::f16, half::bf16);

fn check_items<N: NestedData>(items: &[N], shape: &Shape, depth: usize) -> Result<()> {
    // An empty sequence stops inference, so nothing below it was recorded.
    let expected = shape.get(depth).copied();
    if expected != Some(items.len()) {
        let mut got: Vec<usize> = shape.to_vec();
        match got.get_mut(depth) {
            Some(dim) => *dim = items.len(),
            None => got.push(items.len()),
        }
        return Err(Error::shape_mismatch(shape, &got));
    }

    items
        .iter()
        .try_for_each(|item| item.check_shape(shape, depth + 1))
}

fn collect_items<N: NestedData>(items: &[N], shape: &mut Shape) {
    shape.push(items.len());
    if let Some(first) = items.first() {
        first.collect_dims(shape);
    }
}

impl<N: NestedData> NestedData for Vec<N> {
    type Elem = N::Elem;

    fn collect_dims(&self, shape: &mut Shape) {
        collect_items(self, shape);
    }

    fn check_shape(&self, shape: &Shape, depth: usize) -> Result<()> {
        check_items(self, shape, depth)
    }

    fn flatten_into(&self, out: &mut Vec<Self::Elem>) {
        for item in self {
            item.flatten_into(out);
        }
    }
}

impl<N: NestedData, const K: usize> NestedData for [N; K] {
    type Elem = N::Elem;

    fn collect_dims(&self, shape: &mut Shape) {
        collect_items(self, shape);
    }

    fn check_shape(&self, shape: &Shape, depth: usize) -> Result<()> {
        check_items(self, shape, depth)
    }

    fn flatten_into(&self, out: &mut Vec<Self::Elem>) {
        for item in self {
            item.flatten_into(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_matrix() {
        let data = vec![vec![1.0f32, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        assert_eq!(data.infer_shape().as_slice(), &[2, 3]);
        assert!(data.check_shape(&data.infer_shape(), 0).is_ok());
        assert_eq!(data.flatten(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_infer_arrays() {
        let data = [[[1i32, 2], [3, 4]], [[5, 6], [7, 8]], [[9, 10], [11, 12]]];
        assert_eq!(data.infer_shape().as_slice(), &[3, 2, 2]);
        assert_eq!(data.flatten(), (1..=12).collect::<Vec<i32>>());
    }

    #[test]
    fn test_scalar_has_empty_shape() {
        assert!(7i64.infer_shape().is_empty());
        assert_eq!(7i64.flatten(), [7]);
    }

    #[test]
    fn test_empty_outer_sequence() {
        let data: Vec<Vec<f64>> = Vec::new();
        assert_eq!(data.infer_shape().as_slice(), &[0]);
        assert!(data.check_shape(&data.infer_shape(), 0).is_ok());
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let data = vec![vec![1i32, 2, 3], vec![4, 5], vec![6, 7, 8]];
        let shape = data.infer_shape();
        assert_eq!(shape.as_slice(), &[3, 3]);
        assert_eq!(
            data.check_shape(&shape, 0),
            Err(Error::shape_mismatch(&[3, 3], &[3, 2]))
        );
    }

    #[test]
    fn test_ragged_deep_level_rejected() {
        let data = vec![vec![vec![1i16, 2]], vec![vec![3, 4, 5]]];
        let shape = data.infer_shape();
        assert_eq!(shape.as_slice(), &[2, 1, 2]);
        assert_eq!(
            data.check_shape(&shape, 0),
            Err(Error::shape_mismatch(&[2, 1, 2], &[2, 1, 3]))
        );
    }

    #[test]
    fn test_empty_first_row_then_longer_row() {
        let data = vec![vec![], vec![1.0f64]];
        let shape = data.infer_shape();
        assert_eq!(shape.as_slice(), &[2, 0]);
        assert_eq!(
            data.check_shape(&shape, 0),
            Err(Error::shape_mismatch(&[2, 0], &[2, 1]))
        );
    }
}
