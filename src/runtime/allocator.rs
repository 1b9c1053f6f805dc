//! Memory allocator trait
//!
//! Every tensor buffer is obtained through an [`Allocator`]. There is no pooling:
//! each call is an independent allocation, released when its storage drops.

use crate::error::Result;
use std::ptr::NonNull;

/// Memory allocator trait for device backends
pub trait Allocator: Clone {
    /// Allocate `size_bytes` of zero-initialized memory
    ///
    /// # Errors
    ///
    /// `AllocationError` when `size_bytes` is zero or the memory cannot be obtained.
    fn allocate(&self, size_bytes: usize) -> Result<NonNull<u8>>;

    /// Release memory obtained from [`Allocator::allocate`]
    ///
    /// # Safety
    ///
    /// - `ptr` must come from `allocate` on an allocator of the same type.
    /// - `size_bytes` must equal the size passed to that `allocate` call.
    /// - `ptr` must not be used afterwards.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, size_bytes: usize);

    /// Bytes currently held by live allocations
    fn allocated_bytes(&self) -> usize {
        0 // Default: tracking not supported
    }
}
