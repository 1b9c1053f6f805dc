//! Integration tests for shared storage and typed access

mod common;

use common::{arange_f32, cpu};
use tensr::prelude::*;
use tensr::runtime::Allocator;
use tensr::runtime::cpu::{CPU_ALIGN, CpuAllocator};

#[test]
fn test_clone_observes_writes() {
    let a = arange_f32(&[2, 3]);
    let b = a.clone();

    b.set(&[0, 1], 100.0f32).unwrap();
    assert_eq!(a.get::<f32>(&[0, 1]).unwrap(), 100.0);

    a.set_flat(5, -1.0f32).unwrap();
    assert_eq!(b.get::<f32>(&[1, 2]).unwrap(), -1.0);
}

#[test]
fn test_buffer_freed_with_last_clone() {
    let alloc = CpuAllocator::new();
    let baseline = alloc.allocated_bytes();

    let a = Tensor::zeros(&[4, 4], DType::F64, &cpu()).unwrap();
    let b = a.clone();
    let c = b.clone();
    assert_eq!(a.storage().ref_count(), 3);
    assert_eq!(alloc.allocated_bytes(), baseline + 128);

    drop(a);
    drop(b);
    assert_eq!(alloc.allocated_bytes(), baseline + 128);
    assert!(c.storage().is_unique());

    drop(c);
    assert_eq!(alloc.allocated_bytes(), baseline);
}

#[test]
fn test_buffer_alignment() {
    let t = Tensor::ones(&[3], DType::I16, &cpu()).unwrap();
    assert_eq!(t.as_ptr::<i16>() as usize % CPU_ALIGN, 0);
}

#[test]
fn test_checked_access_rejects_wrong_type() {
    let t = Tensor::ones(&[2, 2], DType::I32, &cpu()).unwrap();
    assert_eq!(
        t.get::<f32>(&[0, 0]).unwrap_err(),
        Error::DTypeMismatch {
            lhs: DType::I32,
            rhs: DType::F32,
        }
    );
    assert!(t.set(&[0, 0], 1i64).is_err());
    assert_eq!(t.to_vec::<i32>().unwrap(), vec![1; 4]);
}

#[test]
fn test_unchecked_escape_hatch() {
    let mut t = arange_f32(&[2, 2]);

    // Same-size reinterpretation is permitted through the unchecked path.
    let bits = unsafe { t.data_unchecked::<u32>().to_vec() };
    assert_eq!(bits[1], 1.0f32.to_bits());

    unsafe { t.data_unchecked_mut::<f32>()[3] = 42.0 };
    assert_eq!(t.get::<f32>(&[1, 1]).unwrap(), 42.0);

    let raw = t.as_mut_ptr::<f32>();
    unsafe { raw.write(7.0) };
    assert_eq!(t.get_flat::<f32>(0).unwrap(), 7.0);
}

#[test]
fn test_out_of_bounds() {
    let t = arange_f32(&[2, 3]);
    assert_eq!(
        t.get::<f32>(&[0, 3]).unwrap_err(),
        Error::IndexOutOfBounds { index: 3, size: 3 }
    );
    assert!(matches!(
        t.set(&[0, 0, 0], 1.0f32),
        Err(Error::InvalidArgument { .. })
    ));
}
