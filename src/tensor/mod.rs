//! Tensor types
//!
//! This module provides the core `Tensor` type, an n-dimensional array stored
//! in a reference-counted device buffer, together with the shape, stride and
//! layout machinery it is built from.

mod core;
mod layout;
mod nested;
pub mod shape;
mod storage;
mod strides;

pub use self::core::Tensor;
pub use layout::Layout;
pub use nested::NestedData;
pub use shape::Shape;
pub use storage::Storage;
pub use strides::Strides;
