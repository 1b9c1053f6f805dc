//! CPU allocator implementation

use crate::error::{Error, Result};
use crate::runtime::Allocator;
use std::alloc::{Layout as AllocLayout, alloc_zeroed, dealloc};
use std::cell::Cell;
use std::ptr::NonNull;
use tracing::debug;

/// Buffer alignment in bytes (AVX-512 friendly)
pub const CPU_ALIGN: usize = 64;

thread_local! {
    // Tensors are !Send, so a buffer is always freed on the thread that allocated it.
    static LIVE_BYTES: Cell<usize> = const { Cell::new(0) };
}

/// Heap allocator for host memory
///
/// Returns zeroed, [`CPU_ALIGN`]-aligned blocks from the system allocator and
/// keeps a per-thread count of live bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuAllocator;

impl CpuAllocator {
    /// Create a new CPU allocator
    pub const fn new() -> Self {
        Self
    }

    fn layout(size_bytes: usize) -> Result<AllocLayout> {
        AllocLayout::from_size_align(size_bytes, CPU_ALIGN).map_err(|_| Error::AllocationError {
            size: size_bytes,
            reason: "size exceeds the maximum allocation",
        })
    }
}

impl Allocator for CpuAllocator {
    fn allocate(&self, size_bytes: usize) -> Result<NonNull<u8>> {
        if size_bytes == 0 {
            return Err(Error::AllocationError {
                size: 0,
                reason: "empty tensor",
            });
        }

        let layout = Self::layout(size_bytes)?;

        // SAFETY: `layout` has a non-zero size, checked above.
        let ptr = unsafe { alloc_zeroed(layout) };
        let ptr = NonNull::new(ptr).ok_or(Error::AllocationError {
            size: size_bytes,
            reason: "out of memory",
        })?;

        LIVE_BYTES.with(|live| live.set(live.get() + size_bytes));
        debug!(size_bytes, ptr = ?ptr, "cpu allocate");
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, size_bytes: usize) {
        let Ok(layout) = Self::layout(size_bytes) else {
            return;
        };

        // SAFETY: caller guarantees `ptr` came from `allocate(size_bytes)`, which
        // used this exact layout.
        unsafe { dealloc(ptr.as_ptr(), layout) };

        LIVE_BYTES.with(|live| live.set(live.get().saturating_sub(size_bytes)));
        debug!(size_bytes, ptr = ?ptr, "cpu deallocate");
    }

    fn allocated_bytes(&self) -> usize {
        LIVE_BYTES.with(Cell::get)
    }
}
