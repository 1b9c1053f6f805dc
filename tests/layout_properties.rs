//! Property tests for the shape and stride laws

mod common;

use common::{arange_f32, offset};
use proptest::prelude::*;
use tensr::prelude::*;
use tensr::tensor::{Strides, shape};

proptest! {
    #[test]
    fn prop_numel_matches_shape_product(dims in prop::collection::vec(1usize..=6, 1..=5)) {
        let expected: usize = dims.iter().product();
        prop_assert_eq!(shape::numel(&dims), expected);
        prop_assert_eq!(Shape::from(dims.as_slice()).numel(), expected);
        prop_assert!(shape::validate(&dims).is_ok());
    }

    #[test]
    fn prop_contiguous_stride_contract(dims in prop::collection::vec(1usize..=6, 1..=5)) {
        let strides = Strides::contiguous(&dims);
        prop_assert_eq!(strides.len(), dims.len());
        prop_assert_eq!(strides.last().copied(), Some(1));
        for i in 0..dims.len() - 1 {
            prop_assert_eq!(strides[i], strides[i + 1] * dims[i + 1] as isize);
        }
    }

    #[test]
    fn prop_zero_dimension_is_invalid(
        mut dims in prop::collection::vec(1usize..=6, 1..=4),
        at in 0usize..4,
    ) {
        let at = at % dims.len();
        dims[at] = 0;
        prop_assert_eq!(shape::numel(&dims), 0);
        let is_invalid_shape = matches!(
            Tensor::zeros(&dims, DType::F32, &Device::cpu()),
            Err(Error::InvalidShape { .. })
        );
        prop_assert!(is_invalid_shape);
    }

    #[test]
    fn prop_layout_index_matches_strides(dims in prop::collection::vec(1usize..=4, 1..=4)) {
        let t = arange_f32(&dims);
        prop_assert_eq!(t.nbytes(), t.numel() * 4);

        let last: Vec<usize> = dims.iter().map(|d| d - 1).collect();
        let expected = offset(&last, t.strides());
        prop_assert_eq!(expected, t.numel() - 1);
        prop_assert_eq!(t.layout().index(&last), Some(expected));
        prop_assert_eq!(t.get::<f32>(&last).unwrap(), expected as f32);
    }
}
