//! Runtime backends for tensor memory
//!
//! This module defines device descriptors and the allocator seam.
//!
//! # Architecture
//!
//! ```text
//! Device (device type + index, parsed from "cpu" / "cuda:N")
//! └── Allocator (zeroed byte blocks, one per tensor, no pooling)
//!     └── CpuAllocator (system heap, 64-byte aligned)
//! ```
//!
//! CUDA is a recognized device type but has no allocator; requesting memory on
//! it fails with [`Error::UnsupportedDevice`] instead of falling back to the CPU.

mod allocator;
pub mod cpu;
mod device;

pub use allocator::Allocator;
pub use device::{Device, DeviceType};

use crate::error::{Error, Result};
use cpu::CpuAllocator;
use tracing::warn;

/// Select the allocator serving `device`
///
/// # Errors
///
/// `UnsupportedDevice` for any non-CPU device.
pub fn allocator_for(device: &Device) -> Result<CpuAllocator> {
    match device.kind() {
        DeviceType::Cpu => Ok(CpuAllocator::new()),
        DeviceType::Cuda => {
            warn!(%device, "allocation requested on a device without an allocator");
            Err(Error::UnsupportedDevice { device: *device })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_allocator_selected() {
        assert!(allocator_for(&Device::cpu()).is_ok());
        assert!(allocator_for(&Device::new(DeviceType::Cpu, 1)).is_ok());
    }

    #[test]
    fn test_cuda_unsupported() {
        for index in 0..3 {
            assert_eq!(
                allocator_for(&Device::cuda(index)).unwrap_err(),
                Error::UnsupportedDevice {
                    device: Device::cuda(index)
                }
            );
        }
    }
}
