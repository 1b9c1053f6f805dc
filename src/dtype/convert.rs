//! Host-side encoding of typed values into the byte layout of a dtype

use super::{DType, Element};
use crate::error::Result;

// Allocates with correct alignment for T, then copies out the bytes.
#[inline]
fn typed_to_bytes<T: bytemuck::NoUninit>(v: Vec<T>) -> Vec<u8> {
    bytemuck::cast_slice::<T, u8>(&v).to_vec()
}

#[inline]
fn convert<S: Element, D: Element>(values: &[S]) -> Vec<u8> {
    typed_to_bytes(
        values
            .iter()
            .map(|v| D::from_f64(v.to_f64()))
            .collect::<Vec<D>>(),
    )
}

/// Encode `values` as `dtype` elements
///
/// When `T` already is `dtype` the bytes are copied as-is; otherwise every
/// value goes through `f64` and is converted to the target type.
///
/// # Errors
///
/// `UnsupportedDType` for F16/BF16 targets when the `f16` feature is off.
pub fn encode_elements<T: Element>(values: &[T], dtype: DType) -> Result<Vec<u8>> {
    if T::DTYPE == dtype {
        return Ok(bytemuck::cast_slice::<T, u8>(values).to_vec());
    }

    let bytes = match dtype {
        DType::F64 => convert::<T, f64>(values),
        DType::F32 => convert::<T, f32>(values),
        DType::I64 => convert::<T, i64>(values),
        DType::I32 => convert::<T, i32>(values),
        DType::I16 => convert::<T, i16>(values),
        #[cfg(feature = "f16")]
        DType::F16 => convert::<T, half::f16>(values),
        #[cfg(feature = "f16")]
        DType::BF16 => convert::<T, half::bf16>(values),
        #[cfg(not(feature = "f16"))]
        DType::F16 | DType::BF16 => {
            return Err(crate::error::Error::unsupported_dtype(dtype, "convert"));
        }
    };
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode<T: bytemuck::Pod>(bytes: &[u8]) -> Vec<T> {
        bytes
            .chunks_exact(std::mem::size_of::<T>())
            .map(bytemuck::pod_read_unaligned)
            .collect()
    }

    #[test]
    fn test_same_dtype_is_byte_copy() {
        let values = [1.5f32, -2.0];
        let bytes = encode_elements(&values, DType::F32).unwrap();
        assert_eq!(bytes, bytemuck::cast_slice::<f32, u8>(&values));
    }

    #[test]
    fn test_int_to_float_conversion() {
        let bytes = encode_elements(&[1i32, 2, 3], DType::F64).unwrap();
        let back: Vec<f64> = decode(&bytes);
        assert_eq!(back, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_float_to_int_truncates() {
        let bytes = encode_elements(&[1.9f64, -2.7], DType::I16).unwrap();
        let back: Vec<i16> = decode(&bytes);
        assert_eq!(back, [1, -2]);
    }

    #[cfg(not(feature = "f16"))]
    #[test]
    fn test_half_requires_feature() {
        assert!(matches!(
            encode_elements(&[1.0f32], DType::F16),
            Err(crate::error::Error::UnsupportedDType {
                dtype: DType::F16,
                op: "convert"
            })
        ));
    }

    #[cfg(feature = "f16")]
    #[test]
    fn test_half_encoding() {
        let bytes = encode_elements(&[1i32, 1], DType::BF16).unwrap();
        let back: Vec<half::bf16> = decode(&bytes);
        assert_eq!(back, [half::bf16::ONE, half::bf16::ONE]);
    }
}
