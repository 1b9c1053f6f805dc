//! Data type system for tensr tensors
//!
//! This module provides the `DType` enum representing all supported element types,
//! the `Element` trait mapping Rust types onto it, and conversion helpers used by
//! the fill and nested-literal constructors.

mod convert;
mod element;

pub use convert::encode_elements;
pub use element::Element;

/// Run `$body` with `$T` bound to the Rust element type of `$dtype`
///
/// Half-precision dtypes return `UnsupportedDType { op: $error_op }` from the
/// enclosing function when the `f16` feature is off.
macro_rules! dispatch_dtype {
    ($dtype:expr, $T:ident => $body:block, $error_op:expr) => {
        match $dtype {
            $crate::dtype::DType::F64 => {
                type $T = f64;
                $body
            }
            $crate::dtype::DType::F32 => {
                type $T = f32;
                $body
            }
            $crate::dtype::DType::F16 => {
                #[cfg(feature = "f16")]
                {
                    type $T = half::f16;
                    $body
                }
                #[cfg(not(feature = "f16"))]
                {
                    return Err($crate::error::Error::unsupported_dtype($dtype, $error_op));
                }
            }
            $crate::dtype::DType::BF16 => {
                #[cfg(feature = "f16")]
                {
                    type $T = half::bf16;
                    $body
                }
                #[cfg(not(feature = "f16"))]
                {
                    return Err($crate::error::Error::unsupported_dtype($dtype, $error_op));
                }
            }
            $crate::dtype::DType::I64 => {
                type $T = i64;
                $body
            }
            $crate::dtype::DType::I32 => {
                type $T = i32;
                $body
            }
            $crate::dtype::DType::I16 => {
                type $T = i16;
                $body
            }
        }
    };
}

pub(crate) use dispatch_dtype;

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// DType Enum
// ============================================================================

/// Data types supported by tensr tensors
///
/// This enum represents the element type of a tensor at runtime. The set is
/// closed: every variant has a fixed width, so [`DType::size_in_bytes`] is total.
///
/// # Discriminant Values (Serialization Stability)
///
/// - Floats: 0-9 (F64=0, F32=1, F16=2, BF16=3)
/// - Signed ints: 10-19 (I64=10, I32=11, I16=12)
///
/// Existing values are never changed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DType {
    // Floating point types (0-9)
    /// 64-bit floating point
    F64 = 0,
    /// 32-bit floating point (most common)
    F32 = 1,
    /// 16-bit floating point (IEEE 754)
    F16 = 2,
    /// 16-bit brain floating point
    BF16 = 3,

    // Integer types
    /// 64-bit signed integer
    I64 = 10,
    /// 32-bit signed integer
    I32 = 11,
    /// 16-bit signed integer
    I16 = 12,
}

impl DType {
    /// Every dtype, in discriminant order
    pub const ALL: [DType; 7] = [
        Self::F64,
        Self::F32,
        Self::F16,
        Self::BF16,
        Self::I64,
        Self::I32,
        Self::I16,
    ];

    /// Size of one element in bytes
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::F64 | Self::I64 => 8,
            Self::F32 | Self::I32 => 4,
            Self::F16 | Self::BF16 | Self::I16 => 2,
        }
    }

    /// Returns true if this is a floating point type
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F64 | Self::F32 | Self::F16 | Self::BF16)
    }

    /// Returns true if this is a signed integer type
    #[inline]
    pub const fn is_int(self) -> bool {
        matches!(self, Self::I64 | Self::I32 | Self::I16)
    }

    /// Returns true if this is a 16-bit float, which needs the `f16` feature
    /// to be filled or converted into
    #[inline]
    pub const fn is_half(self) -> bool {
        matches!(self, Self::F16 | Self::BF16)
    }

    /// Get the default dtype for floating point data
    #[inline]
    pub const fn default_float() -> Self {
        Self::F32
    }

    /// Get the default dtype for integer data
    #[inline]
    pub const fn default_int() -> Self {
        Self::I64
    }

    /// Short name for display (e.g., "f32", "i64")
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::F64 => "f64",
            Self::F32 => "f32",
            Self::F16 => "f16",
            Self::BF16 => "bf16",
            Self::I64 => "i64",
            Self::I32 => "i32",
            Self::I16 => "i16",
        }
    }

    /// Long name used in diagnostic dumps (e.g., "Float32")
    pub const fn long_name(self) -> &'static str {
        match self {
            Self::F64 => "Float64",
            Self::F32 => "Float32",
            Self::F16 => "Float16",
            Self::BF16 => "BFloat16",
            Self::I64 => "Int64",
            Self::I32 => "Int32",
            Self::I16 => "Int16",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

impl TryFrom<u8> for DType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|dtype| *dtype as u8 == value)
            .ok_or_else(|| Error::UnknownDType {
                value: value.to_string(),
            })
    }
}

impl FromStr for DType {
    type Err = Error;

    /// Parses either the short name ("f32") or the long name ("Float32"),
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|dtype| {
                dtype.short_name().eq_ignore_ascii_case(s)
                    || dtype.long_name().eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| Error::UnknownDType {
                value: s.to_string(),
            })
    }
}
