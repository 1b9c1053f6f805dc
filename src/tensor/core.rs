//! Core Tensor type

use super::nested::NestedData;
use super::{Layout, Storage, shape};
use crate::dtype::{DType, Element, dispatch_dtype, encode_elements};
use crate::error::{Error, Result};
use crate::runtime::Device;
use std::fmt;
use tracing::debug;

/// N-dimensional array stored on a compute device
///
/// `Tensor` is the fundamental data structure in tensr. It consists of:
/// - **Storage**: Reference-counted device memory
/// - **Layout**: Shape and row-major strides
/// - **DType**: Element type (determined at runtime)
///
/// # Sharing
///
/// Cloning a tensor copies its metadata and bumps the storage reference count;
/// the elements are not copied. A write through any clone is visible through
/// all of them, and the buffer is freed when the last clone drops.
///
/// # Example
///
/// ```
/// use tensr::prelude::*;
///
/// let a = Tensor::from_slice(&[1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3], &Device::cpu())?;
/// assert_eq!(a.strides(), &[3, 1]);
/// assert_eq!(a.nbytes(), 24);
///
/// let b = a.clone(); // shares storage with a
/// b.set(&[1, 2], 60.0f32)?;
/// assert_eq!(a.get::<f32>(&[1, 2])?, 60.0);
/// # Ok::<(), tensr::error::Error>(())
/// ```
pub struct Tensor {
    /// Device memory
    storage: Storage,
    /// Shape and strides
    layout: Layout,
    /// Gradient tracking flag (inert metadata)
    requires_grad: bool,
    /// Whether this tensor performed (and co-owns) the allocation
    is_owner: bool,
}

impl Tensor {
    fn from_parts(storage: Storage, layout: Layout) -> Self {
        debug!(
            shape = ?layout.shape(),
            dtype = %storage.dtype(),
            device = %storage.device(),
            "tensor created"
        );
        Self {
            storage,
            layout,
            requires_grad: false,
            is_owner: true,
        }
    }

    // ===== Construction =====

    /// Create a tensor from nested literal data on the CPU
    ///
    /// The dtype is the leaf element's dtype.
    ///
    /// # Example
    ///
    /// ```
    /// use tensr::prelude::*;
    ///
    /// let t = Tensor::new(vec![vec![1i32, 2, 3], vec![4, 5, 6]])?;
    /// assert_eq!(t.shape(), &[2, 3]);
    /// assert_eq!(t.dtype(), DType::I32);
    /// # Ok::<(), tensr::error::Error>(())
    /// ```
    pub fn new<D: NestedData>(data: D) -> Result<Self> {
        Self::from_nested(&data, <D::Elem as Element>::DTYPE, &Device::cpu())
    }

    /// Create a tensor from nested literal data
    ///
    /// The shape is inferred from the first element at every nesting level and
    /// then checked against every sibling. Leaves are converted to `dtype` when
    /// it differs from their own type.
    ///
    /// # Errors
    ///
    /// - `ShapeMismatch` for ragged data.
    /// - `InvalidArgument` if the flattened element count differs from the allocation.
    /// - `AllocationError` for empty data, `UnsupportedDevice` for non-CPU devices.
    /// - `UnsupportedDType` when converting to a half type without the `f16` feature.
    pub fn from_nested<D: NestedData + ?Sized>(
        data: &D,
        dtype: DType,
        device: &Device,
    ) -> Result<Self> {
        let shape = data.infer_shape();
        data.check_shape(&shape, 0)?;

        let storage = Storage::allocate(dtype, &shape, device)?;

        let flat = data.flatten();
        if flat.len() != storage.len() {
            return Err(Error::invalid_argument(
                "data",
                format!(
                    "flattened {} elements into a buffer of {}",
                    flat.len(),
                    storage.len()
                ),
            ));
        }

        let bytes = encode_elements(&flat, dtype)?;
        // SAFETY: `bytes` holds `flat.len() == storage.len()` elements of `dtype`,
        // exactly the allocation size; the buffer is fresh so nothing overlaps.
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), storage.ptr().as_ptr(), bytes.len());
        }

        Ok(Self::from_parts(storage, Layout::contiguous(&shape)))
    }

    /// Create a tensor from a flat slice and an explicit shape
    ///
    /// The dtype is `T`'s dtype.
    ///
    /// # Errors
    ///
    /// - `InvalidShape` if `shape` is empty or has a zero dimension.
    /// - `InvalidArgument` if `data.len()` is not exactly the product of `shape`.
    /// - `UnsupportedDevice` for non-CPU devices.
    pub fn from_slice<T: Element>(data: &[T], shape: &[usize], device: &Device) -> Result<Self> {
        Self::from_slice_as(data, shape, T::DTYPE, device)
    }

    /// Create a tensor from a flat slice, converting elements to `dtype`
    ///
    /// # Errors
    ///
    /// Same as [`Tensor::from_slice`], plus `UnsupportedDType` when converting to a
    /// half type without the `f16` feature.
    pub fn from_slice_as<T: Element>(
        data: &[T],
        shape: &[usize],
        dtype: DType,
        device: &Device,
    ) -> Result<Self> {
        shape::validate(shape)?;

        // An overflowing element count can never match a real slice.
        if shape::checked_numel(shape) != Some(data.len()) {
            return Err(Error::invalid_argument(
                "data",
                format!("{} elements do not match shape {:?}", data.len(), shape),
            ));
        }

        let bytes = encode_elements(data, dtype)?;
        let storage = Storage::from_bytes(&bytes, dtype, shape, device)?;

        Ok(Self::from_parts(storage, Layout::contiguous(shape)))
    }

    /// Allocate a tensor without supplying data
    ///
    /// Memory is zero-initialized, so every element reads as zero.
    ///
    /// # Errors
    ///
    /// - `InvalidShape` if `shape` is empty or has a zero dimension.
    /// - `UnsupportedDevice` for non-CPU devices, `AllocationError` on allocation failure.
    pub fn empty(shape: &[usize], dtype: DType, device: &Device) -> Result<Self> {
        shape::validate(shape)?;
        let storage = Storage::allocate(dtype, shape, device)?;
        Ok(Self::from_parts(storage, Layout::contiguous(shape)))
    }

    /// Create a tensor filled with zeros
    ///
    /// # Errors
    ///
    /// Same as [`Tensor::full`].
    pub fn zeros(shape: &[usize], dtype: DType, device: &Device) -> Result<Self> {
        let tensor = Self::empty(shape, dtype, device)?;
        dispatch_dtype!(dtype, T => { tensor.fill(T::zero())?; }, "fill");
        Ok(tensor)
    }

    /// Create a tensor filled with ones
    ///
    /// # Errors
    ///
    /// Same as [`Tensor::full`].
    pub fn ones(shape: &[usize], dtype: DType, device: &Device) -> Result<Self> {
        let tensor = Self::empty(shape, dtype, device)?;
        dispatch_dtype!(dtype, T => { tensor.fill(T::one())?; }, "fill");
        Ok(tensor)
    }

    /// Create a tensor filled with a scalar value
    ///
    /// The buffer is allocated first and then filled in place with `value`
    /// converted to the target dtype.
    ///
    /// # Errors
    ///
    /// - `InvalidShape` if `shape` is empty or has a zero dimension.
    /// - `UnsupportedDevice` for non-CPU devices.
    /// - `AllocationError` if the byte size overflows or memory cannot be obtained.
    /// - `UnsupportedDType` for F16/BF16 without the `f16` feature.
    pub fn full(shape: &[usize], dtype: DType, value: f64, device: &Device) -> Result<Self> {
        let tensor = Self::empty(shape, dtype, device)?;
        dispatch_dtype!(dtype, T => { tensor.fill(T::from_f64(value))?; }, "fill");
        Ok(tensor)
    }

    /// Set the gradient tracking flag (builder style)
    #[must_use]
    pub fn with_requires_grad(mut self, requires_grad: bool) -> Self {
        self.requires_grad = requires_grad;
        self
    }

    /// Set the gradient tracking flag
    pub fn set_requires_grad(&mut self, requires_grad: bool) {
        self.requires_grad = requires_grad;
    }

    // ===== Accessors =====

    /// Get the storage
    #[inline]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Get the layout
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    /// Get the strides
    #[inline]
    pub fn strides(&self) -> &[isize] {
        self.layout.strides()
    }

    /// Get the strides (alias of [`Tensor::strides`])
    #[inline]
    pub fn stride(&self) -> &[isize] {
        self.strides()
    }

    /// Get the number of dimensions (rank)
    #[inline]
    pub fn ndim(&self) -> usize {
        self.layout.ndim()
    }

    /// Get the total number of elements
    #[inline]
    pub fn numel(&self) -> usize {
        self.layout.elem_count()
    }

    /// Get the total size of the elements in bytes
    #[inline]
    pub fn nbytes(&self) -> usize {
        self.numel() * self.dtype().size_in_bytes()
    }

    /// Get the element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    /// Get the device
    #[inline]
    pub fn device(&self) -> &Device {
        self.storage.device()
    }

    /// Whether gradients would be tracked (no autograd is attached)
    #[inline]
    pub fn requires_grad(&self) -> bool {
        self.requires_grad
    }

    /// Whether this tensor co-owns its buffer
    ///
    /// Every tensor built by a constructor, and every clone of one, is an owner.
    #[inline]
    pub fn is_owner(&self) -> bool {
        self.is_owner
    }

    /// Check if the tensor is contiguous in memory
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.layout.is_contiguous()
    }

    /// Get size along a dimension (supports negative indexing)
    pub fn size(&self, dim: isize) -> Option<usize> {
        self.layout.dim(dim)
    }

    // ===== Data Access =====

    fn check_element<T: Element>(&self) -> Result<()> {
        if T::DTYPE != self.dtype() {
            return Err(Error::DTypeMismatch {
                lhs: self.dtype(),
                rhs: T::DTYPE,
            });
        }
        Ok(())
    }

    fn check_offset(&self, offset: usize) -> Result<()> {
        if offset >= self.numel() {
            return Err(Error::IndexOutOfBounds {
                index: offset,
                size: self.numel(),
            });
        }
        Ok(())
    }

    fn offset_of(&self, indices: &[usize]) -> Result<usize> {
        if indices.len() != self.ndim() {
            return Err(Error::invalid_argument(
                "indices",
                format!(
                    "{} indices for a tensor with {} dimensions",
                    indices.len(),
                    self.ndim()
                ),
            ));
        }
        if let Some((&index, &size)) = indices
            .iter()
            .zip(self.shape())
            .find(|(i, dim)| i >= dim)
        {
            return Err(Error::IndexOutOfBounds { index, size });
        }
        self.layout.index(indices).ok_or(Error::IndexOutOfBounds {
            index: 0,
            size: self.numel(),
        })
    }

    /// Raw pointer to the first element, reinterpreted as `T`
    ///
    /// This is the unchecked escape hatch: nothing verifies that `T` matches the
    /// dtype. Dereferencing is `unsafe`; the caller must ensure `T` has the dtype's
    /// layout and stay within `numel()` elements.
    #[inline]
    pub fn as_ptr<T>(&self) -> *const T {
        self.storage.ptr().as_ptr().cast::<T>().cast_const()
    }

    /// Mutable raw pointer to the first element, reinterpreted as `T`
    ///
    /// Unchecked like [`Tensor::as_ptr`]. Writes are visible through every tensor
    /// sharing this storage.
    #[inline]
    pub fn as_mut_ptr<T>(&self) -> *mut T {
        self.storage.ptr().as_ptr().cast::<T>()
    }

    /// View the elements as a `T` slice without any dtype check
    ///
    /// # Safety
    ///
    /// - `T` must have the size and bit validity of the tensor's dtype.
    /// - No clone of this tensor may write to the buffer while the slice is alive.
    pub unsafe fn data_unchecked<T>(&self) -> &[T] {
        debug_assert_eq!(std::mem::size_of::<T>(), self.dtype().size_in_bytes());
        // SAFETY: the buffer holds `numel()` elements of the dtype and is 64-byte
        // aligned; the caller vouches for `T` and for the absence of writers.
        unsafe { std::slice::from_raw_parts(self.as_ptr::<T>(), self.numel()) }
    }

    /// View the elements as a mutable `T` slice without any dtype check
    ///
    /// # Safety
    ///
    /// - `T` must have the size and bit validity of the tensor's dtype.
    /// - No clone of this tensor may read or write the buffer while the slice is alive.
    pub unsafe fn data_unchecked_mut<T>(&mut self) -> &mut [T] {
        debug_assert_eq!(std::mem::size_of::<T>(), self.dtype().size_in_bytes());
        // SAFETY: as in `data_unchecked`, with the caller guaranteeing exclusive
        // access across clones.
        unsafe { std::slice::from_raw_parts_mut(self.as_mut_ptr::<T>(), self.numel()) }
    }

    /// Copy the elements out in row-major order
    ///
    /// # Errors
    ///
    /// `DTypeMismatch` if `T` is not the tensor's element type.
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
        self.check_element::<T>()?;
        // SAFETY: dtype checked above; the copy ends before any other access.
        Ok(unsafe { self.data_unchecked::<T>() }.to_vec())
    }

    /// Read the element at `offset` in linear (storage) order
    ///
    /// # Errors
    ///
    /// `DTypeMismatch` for the wrong `T`, `IndexOutOfBounds` past `numel()`.
    pub fn get_flat<T: Element>(&self, offset: usize) -> Result<T> {
        self.check_element::<T>()?;
        self.check_offset(offset)?;
        // SAFETY: dtype and bounds checked above; aligned because the buffer is
        // 64-byte aligned and `offset` counts whole elements.
        Ok(unsafe { self.as_ptr::<T>().add(offset).read() })
    }

    /// Read the element at multi-dimensional `indices`
    ///
    /// # Errors
    ///
    /// `DTypeMismatch` for the wrong `T`, `InvalidArgument` for the wrong number of
    /// indices, `IndexOutOfBounds` for an index past its dimension.
    pub fn get<T: Element>(&self, indices: &[usize]) -> Result<T> {
        let offset = self.offset_of(indices)?;
        self.get_flat(offset)
    }

    /// Write the element at `offset` in linear (storage) order
    ///
    /// The write is visible through every tensor sharing this storage.
    ///
    /// # Errors
    ///
    /// `DTypeMismatch` for the wrong `T`, `IndexOutOfBounds` past `numel()`.
    pub fn set_flat<T: Element>(&self, offset: usize, value: T) -> Result<()> {
        self.check_element::<T>()?;
        self.check_offset(offset)?;
        // SAFETY: dtype and bounds checked above; no references into the buffer
        // are handed out by safe code, so this write cannot alias one.
        unsafe { self.as_mut_ptr::<T>().add(offset).write(value) };
        Ok(())
    }

    /// Write the element at multi-dimensional `indices`
    ///
    /// # Errors
    ///
    /// Same as [`Tensor::get`].
    pub fn set<T: Element>(&self, indices: &[usize], value: T) -> Result<()> {
        let offset = self.offset_of(indices)?;
        self.set_flat(offset, value)
    }

    /// Overwrite every element with `value`
    ///
    /// # Errors
    ///
    /// `DTypeMismatch` if `T` is not the tensor's element type.
    pub fn fill<T: Element>(&self, value: T) -> Result<()> {
        self.check_element::<T>()?;
        let ptr = self.as_mut_ptr::<T>();
        for offset in 0..self.numel() {
            // SAFETY: `offset < numel()` and the dtype matches `T`.
            unsafe { ptr.add(offset).write(value) };
        }
        Ok(())
    }

    /// Overwrite all elements from a slice in row-major order
    ///
    /// # Errors
    ///
    /// `DTypeMismatch` for the wrong `T`, `InvalidArgument` if `src.len() != numel()`.
    pub fn copy_from_slice<T: Element>(&self, src: &[T]) -> Result<()> {
        self.check_element::<T>()?;
        if src.len() != self.numel() {
            return Err(Error::invalid_argument(
                "src",
                format!("{} elements into a tensor of {}", src.len(), self.numel()),
            ));
        }
        // SAFETY: lengths match and `src` is a host slice that cannot overlap the
        // tensor's own allocation.
        unsafe {
            std::ptr::copy_nonoverlapping(src.as_ptr(), self.as_mut_ptr::<T>(), src.len());
        }
        Ok(())
    }

    // ===== Diagnostics =====

    /// One-line metadata summary, e.g. `Tensor(2,3) dtype=Float32 device=cpu`
    pub fn info(&self) -> String {
        let dims: Vec<String> = self.shape().iter().map(ToString::to_string).collect();
        format!(
            "Tensor({}) dtype={} device={}",
            dims.join(","),
            self.dtype().long_name(),
            self.device()
        )
    }

    /// Print [`Tensor::info`] to stdout
    pub fn print_info(&self) {
        println!("{}", self.info());
    }

    /// Space-separated elements in storage order
    ///
    /// # Errors
    ///
    /// `DTypeMismatch` if `T` is not the tensor's element type.
    pub fn format_data<T: Element>(&self) -> Result<String> {
        let values = self.to_vec::<T>()?;
        let parts: Vec<String> = values.iter().map(ToString::to_string).collect();
        Ok(parts.join(" "))
    }

    /// Print [`Tensor::format_data`] to stdout
    ///
    /// # Errors
    ///
    /// `DTypeMismatch` if `T` is not the tensor's element type.
    pub fn print_data<T: Element>(&self) -> Result<()> {
        println!("{}", self.format_data::<T>()?);
        Ok(())
    }
}

impl Clone for Tensor {
    /// Clone creates a new tensor sharing the same storage (zero-copy)
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            layout: self.layout.clone(),
            requires_grad: self.requires_grad,
            is_owner: self.is_owner,
        }
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape())
            .field("strides", &self.strides())
            .field("dtype", &self.dtype())
            .field("device", self.device())
            .field("requires_grad", &self.requires_grad)
            .field("is_owner", &self.is_owner)
            .finish()
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor({:?}, dtype={})", self.shape(), self.dtype())
    }
}
