//! # tensr
//!
//! **A minimal N-dimensional tensor: shape engine, allocator and typed buffer access.**
//!
//! tensr provides the foundation a numerical library is built on: a tensor
//! value that knows its shape, row-major strides, element type and device, and
//! owns a reference-counted, 64-byte-aligned buffer.
//!
//! ## Features
//!
//! - **Construction**: from nested literals (shape inferred), from flat slices
//!   with an explicit shape, allocate-only, and `zeros`/`ones`/`full`
//! - **Shape engine**: validated shapes, contiguous strides derived from the shape
//! - **Shared storage**: clones share one buffer, freed when the last clone drops
//! - **Typed access**: dtype-checked `get`/`set`/`to_vec`, plus an `unsafe`
//!   unchecked escape hatch
//! - **Dtypes**: f64, f32, i64, i32, i16, and f16/bf16 behind a feature
//!
//! ## Quick Start
//!
//! ```rust
//! use tensr::prelude::*;
//!
//! let a = Tensor::new(vec![vec![1.0f32, 2.0, 3.0], vec![4.0, 5.0, 6.0]])?;
//! assert_eq!(a.shape(), &[2, 3]);
//! assert_eq!(a.get::<f32>(&[1, 2])?, 6.0);
//!
//! let z = Tensor::zeros(&[2, 3], DType::I32, &Device::cpu())?;
//! assert_eq!(z.to_vec::<i32>()?, vec![0; 6]);
//! # Ok::<(), tensr::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `f16`: Half-precision floats (F16, BF16) as element and fill types
//!
//! ## Threading
//!
//! Storage is reference counted with `Rc`, so tensors are `!Send` and `!Sync`
//! and stay on the thread that created them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dtype;
pub mod error;
pub mod runtime;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{DType, Element};
    pub use crate::error::{Error, Result};
    pub use crate::runtime::{Device, DeviceType};
    pub use crate::tensor::{Layout, NestedData, Shape, Tensor};
}
