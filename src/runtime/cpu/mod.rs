//! CPU runtime implementation
//!
//! The CPU runtime uses the system heap and is the only device with a working
//! allocator.

mod allocator;

pub use allocator::{CPU_ALIGN, CpuAllocator};
