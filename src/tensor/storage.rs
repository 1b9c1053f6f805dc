//! Storage: device memory management with Rc-based sharing

use super::shape;
use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::runtime::cpu::CpuAllocator;
use crate::runtime::{Allocator, Device, allocator_for};
use std::ptr::NonNull;
use std::rc::Rc;

/// Storage for tensor data on a device
///
/// Storage wraps one allocation with reference counting: cloning a `Storage`
/// (and therefore a `Tensor`) shares the bytes instead of copying them.
///
/// Memory is automatically deallocated when the last reference is dropped.
/// The count is not atomic, so storage cannot leave the thread that created it.
pub struct Storage {
    inner: Rc<StorageInner>,
}

struct StorageInner {
    /// Start of the allocation
    ptr: NonNull<u8>,
    /// Number of elements (not bytes)
    len: usize,
    /// Element type
    dtype: DType,
    /// Device where memory is allocated
    device: Device,
    /// Allocator that owns `ptr`
    allocator: CpuAllocator,
}

impl Storage {
    /// Allocate zero-initialized storage for a tensor of `shape`
    ///
    /// The byte size is `numel(shape) * dtype.size_in_bytes()`. Every call is an
    /// independent allocation; nothing is pooled or retried.
    ///
    /// # Errors
    ///
    /// - `UnsupportedDevice` for any non-CPU device, whatever the shape.
    /// - `AllocationError` when the size is zero, overflows, or cannot be obtained.
    pub fn allocate(dtype: DType, shape: &[usize], device: &Device) -> Result<Self> {
        let allocator = allocator_for(device)?;

        let (len, size_bytes) = shape::checked_numel(shape)
            .and_then(|len| Some((len, len.checked_mul(dtype.size_in_bytes())?)))
            .ok_or(Error::AllocationError {
                size: usize::MAX,
                reason: "byte size overflows usize",
            })?;

        let ptr = allocator.allocate(size_bytes)?;

        Ok(Self {
            inner: Rc::new(StorageInner {
                ptr,
                len,
                dtype,
                device: *device,
                allocator,
            }),
        })
    }

    /// Allocate storage for `shape` and copy `bytes` into it
    ///
    /// # Errors
    ///
    /// Everything [`Storage::allocate`] returns, plus `InvalidArgument` when
    /// `bytes` is not exactly the allocation size.
    pub fn from_bytes(bytes: &[u8], dtype: DType, shape: &[usize], device: &Device) -> Result<Self> {
        let storage = Self::allocate(dtype, shape, device)?;
        if bytes.len() != storage.size_in_bytes() {
            return Err(Error::invalid_argument(
                "data",
                format!(
                    "{} bytes do not fill a {}-byte buffer",
                    bytes.len(),
                    storage.size_in_bytes()
                ),
            ));
        }

        // SAFETY: the destination holds exactly `bytes.len()` bytes and was just
        // allocated, so the regions cannot overlap.
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), storage.ptr().as_ptr(), bytes.len());
        }
        Ok(storage)
    }

    /// Get the start of the allocation
    #[inline]
    pub fn ptr(&self) -> NonNull<u8> {
        self.inner.ptr
    }

    /// Get the number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len
    }

    /// Check if storage is empty (never true for allocated storage)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.len == 0
    }

    /// Get the element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.inner.dtype
    }

    /// Get the device
    #[inline]
    pub fn device(&self) -> &Device {
        &self.inner.device
    }

    /// Get size in bytes
    #[inline]
    pub fn size_in_bytes(&self) -> usize {
        self.inner.len * self.inner.dtype.size_in_bytes()
    }

    /// Get the reference count
    #[inline]
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    /// Check if this is the only reference
    #[inline]
    pub fn is_unique(&self) -> bool {
        Rc::strong_count(&self.inner) == 1
    }

    /// Check whether two handles share one allocation
    #[inline]
    pub fn same_buffer(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Clone for Storage {
    /// Clone increments the reference count (zero-copy)
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl Drop for StorageInner {
    fn drop(&mut self) {
        let size_bytes = self.len * self.dtype.size_in_bytes();
        // SAFETY: `ptr` came from `allocator.allocate(size_bytes)` in
        // `Storage::allocate` and this is the last reference to it.
        unsafe { self.allocator.deallocate(self.ptr, size_bytes) };
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("ptr", &self.inner.ptr)
            .field("len", &self.inner.len)
            .field("dtype", &self.inner.dtype)
            .field("device", &self.inner.device)
            .field("refs", &Rc::strong_count(&self.inner))
            .finish()
    }
}
