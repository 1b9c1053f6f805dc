//! Common test utilities
#![allow(dead_code)]

use tensr::prelude::*;

/// The CPU device every test allocates on
pub fn cpu() -> Device {
    Device::cpu()
}

/// Build an f32 tensor holding `0, 1, 2, ...` in row-major order
pub fn arange_f32(shape: &[usize]) -> Tensor {
    let numel: usize = shape.iter().product();
    let data: Vec<f32> = (0..numel).map(|i| i as f32).collect();
    Tensor::from_slice(&data, shape, &cpu()).expect("arange tensor")
}

/// Row-major offset computed by hand from contiguous strides
pub fn offset(indices: &[usize], strides: &[isize]) -> usize {
    indices
        .iter()
        .zip(strides)
        .map(|(&i, &s)| i * s as usize)
        .sum()
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}
