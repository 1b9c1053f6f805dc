//! Device identification

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Kind of compute unit a tensor lives on
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DeviceType {
    /// Host memory
    #[default]
    Cpu,
    /// NVIDIA GPU (recognized, no allocator yet)
    Cuda,
}

impl DeviceType {
    /// Short name used in device strings ("cpu", "cuda")
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Cuda => "cuda",
        }
    }
}

/// A specific compute unit: device type plus an index for multi-device hosts
///
/// Parses from and displays as `"cpu"`, `"cuda"` or `"cuda:N"`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Device {
    kind: DeviceType,
    index: usize,
}

impl Device {
    /// Create a device descriptor
    pub const fn new(kind: DeviceType, index: usize) -> Self {
        Self { kind, index }
    }

    /// The host CPU
    pub const fn cpu() -> Self {
        Self::new(DeviceType::Cpu, 0)
    }

    /// CUDA device `index`
    pub const fn cuda(index: usize) -> Self {
        Self::new(DeviceType::Cuda, index)
    }

    /// Device type
    #[inline]
    pub const fn kind(&self) -> DeviceType {
        self.kind
    }

    /// Device index
    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Whether this is host memory
    #[inline]
    pub const fn is_cpu(&self) -> bool {
        matches!(self.kind, DeviceType::Cpu)
    }

    /// Check if two descriptors name the same unit
    pub fn is_same(&self, other: &Self) -> bool {
        self == other
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.index) {
            (DeviceType::Cpu, 0) => write!(f, "cpu"),
            (kind, index) => write!(f, "{}:{}", kind.name(), index),
        }
    }
}

impl FromStr for Device {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::invalid_argument("device", format!("cannot parse '{s}'"));

        let (kind, index) = match s.split_once(':') {
            Some((kind, index)) => (kind, index.parse::<usize>().map_err(|_| invalid())?),
            None => (s, 0),
        };

        let kind = match kind.to_ascii_lowercase().as_str() {
            "cpu" => DeviceType::Cpu,
            "cuda" => DeviceType::Cuda,
            _ => return Err(invalid()),
        };

        Ok(Self::new(kind, index))
    }
}
