//! Error types for tensr

use crate::dtype::DType;
use crate::runtime::Device;
use thiserror::Error;

/// Result type alias using tensr's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or accessing tensors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Shape cannot describe an allocated tensor (empty, or a zero dimension)
    #[error("Invalid shape {shape:?}: {reason}")]
    InvalidShape {
        /// The rejected shape
        shape: Vec<usize>,
        /// Reason for rejection
        reason: &'static str,
    },

    /// Invalid argument provided to a constructor or accessor
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Nested literal data is not rectangular
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Shape inferred from the first element at every level
        expected: Vec<usize>,
        /// Shape observed at the first irregular sibling
        got: Vec<usize>,
    },

    /// Memory could not be obtained
    #[error("Allocation of {size} bytes failed: {reason}")]
    AllocationError {
        /// Requested size in bytes
        size: usize,
        /// Reason for failure
        reason: &'static str,
    },

    /// Device is recognized but has no allocator
    #[error("Unsupported device {device}")]
    UnsupportedDevice {
        /// The requested device
        device: Device,
    },

    /// Unsupported dtype for an operation
    #[error("Unsupported dtype {dtype:?} for operation '{op}'")]
    UnsupportedDType {
        /// The unsupported dtype
        dtype: DType,
        /// The operation name
        op: &'static str,
    },

    /// Value does not name any dtype
    #[error("Unknown dtype '{value}'")]
    UnknownDType {
        /// The unrecognized name or discriminant
        value: String,
    },

    /// Requested element type disagrees with the stored dtype
    #[error("DType mismatch: {lhs:?} vs {rhs:?}")]
    DTypeMismatch {
        /// Stored dtype
        lhs: DType,
        /// Requested dtype
        rhs: DType,
    },

    /// Index out of bounds
    #[error("Index {index} out of bounds for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index
        index: usize,
        /// Size of the dimension
        size: usize,
    },
}

impl Error {
    /// Create an invalid shape error
    pub fn invalid_shape(shape: &[usize], reason: &'static str) -> Self {
        Self::InvalidShape {
            shape: shape.to_vec(),
            reason,
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }

    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create an unsupported dtype error
    pub fn unsupported_dtype(dtype: DType, op: &'static str) -> Self {
        Self::UnsupportedDType { dtype, op }
    }
}
