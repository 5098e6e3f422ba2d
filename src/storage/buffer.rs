use core::alloc::Layout;
use core::fmt;
use core::mem::{self, MaybeUninit};
use core::ptr::NonNull;
use core::slice;

use const_default::ConstDefault;

use crate::alloc::{Allocator, AllocatorDefault};
use crate::error::StorageError;

#[cfg(feature = "zeroize")]
use crate::alloc::AllocatorZeroizes;

/// An owned block of uninitialized storage for `capacity` values of `T`.
///
/// A `Buffer` only manages memory: it never constructs or drops the values
/// placed in its slots. Dropping or releasing a buffer which still holds
/// live values leaks those values.
pub struct Buffer<T, A: Allocator> {
    data: NonNull<T>,
    capacity: usize,
    alloc: A,
}

impl<T, A: Allocator> Buffer<T, A> {
    /// Create an empty buffer which owns no allocation.
    #[inline]
    pub const fn dangling(alloc: A) -> Self {
        Self {
            data: NonNull::dangling(),
            capacity: 0,
            alloc,
        }
    }

    /// Allocate a buffer with room for exactly `capacity` values. A zero
    /// capacity produces an empty buffer without calling the allocator.
    pub fn allocate_in(capacity: usize, alloc: A) -> Result<Self, StorageError> {
        if capacity == 0 {
            return Ok(Self::dangling(alloc));
        }
        let layout = Layout::array::<T>(capacity)?;
        match alloc.allocate(layout) {
            Ok(ptr) => {
                log::trace!("allocated buffer: {} slots, {} bytes", capacity, layout.size());
                Ok(Self {
                    data: ptr.cast(),
                    capacity,
                    alloc,
                })
            }
            Err(_) => {
                log::debug!("allocation of {} bytes failed", layout.size());
                Err(StorageError::AllocError(layout))
            }
        }
    }

    /// The number of slots in this buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Determine whether this buffer owns any slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.capacity == 0
    }

    /// Get a reference to the allocator instance.
    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Access the buffer as a readonly pointer. This may be a dangling
    /// pointer if `T` is zero sized or the capacity is zero.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    /// Access the buffer as a mutable pointer. This may be a dangling
    /// pointer if `T` is zero sized or the capacity is zero.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_ptr()
    }

    /// Access every slot of the buffer, initialized or not.
    #[inline]
    pub fn as_uninit_slice(&mut self) -> &mut [MaybeUninit<T>] {
        // SAFETY: the pointer is valid and aligned for `capacity` slots, and
        // `MaybeUninit` places no requirement on the slot contents.
        unsafe { slice::from_raw_parts_mut(self.data.as_ptr().cast(), self.capacity) }
    }

    /// Release the allocation, leaving an empty buffer. Calling this on an
    /// empty buffer has no effect.
    pub fn release(&mut self) {
        if self.capacity == 0 {
            return;
        }
        let capacity = mem::replace(&mut self.capacity, 0);
        let data = mem::replace(&mut self.data, NonNull::dangling());
        // SAFETY: the layout was validated when the buffer was allocated.
        let layout = unsafe { Layout::array::<T>(capacity).unwrap_unchecked() };
        if layout.size() > 0 {
            unsafe { self.alloc.deallocate(data.cast(), layout) };
        }
    }
}

impl<T, A: AllocatorDefault> ConstDefault for Buffer<T, A> {
    const DEFAULT: Self = Self::dangling(A::DEFAULT);
}

impl<T, A: AllocatorDefault> Default for Buffer<T, A> {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl<T, A: Allocator + fmt::Debug> fmt::Debug for Buffer<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("data", &self.data)
            .field("capacity", &self.capacity)
            .field("alloc", &self.alloc)
            .finish()
    }
}

impl<T, A: Allocator> Drop for Buffer<T, A> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(feature = "zeroize")]
impl<T, A: AllocatorZeroizes> zeroize::ZeroizeOnDrop for Buffer<T, A> {}
