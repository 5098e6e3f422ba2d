//! A growable, contiguous array type.

use core::cmp::Ordering;
use core::fmt;
use core::mem::{self, ManuallyDrop};
use core::ops::{Index, IndexMut};
use core::ptr;
use core::slice;

use crate::alloc::{AllocatorDefault, Global};
use crate::error::{OutOfRange, StorageError, UpdateError};
use crate::storage::init::{destroy_range, initialize_range, Init};
use crate::storage::Buffer;

use self::config::VecConfig;

pub mod config;

#[macro_use]
mod macros;

#[cfg(feature = "zeroize")]
/// A `Vec` which automatically zeroizes its buffer when it is released.
pub type ZeroizingVec<T> = Vec<T, crate::alloc::ZeroizingAlloc<Global>>;

/// A marker for element types whose `Clone::clone_from` can never panic.
///
/// [`Vec::assign_from`] relies on this to overwrite existing elements in
/// place. Every `Copy` type qualifies; other types may opt in when their
/// `clone_from` performs no allocation and no fallible work.
pub trait InfallibleClone: Clone {}

impl<T: Copy> InfallibleClone for T {}

/// A contiguous growable array.
///
/// Capacities are chosen by the growth policy of the configuration `C`,
/// which rounds to powers of two unless a [`Custom`](config::Custom)
/// configuration says otherwise. Slots beyond `len()` are never exposed.
pub struct Vec<T, C: VecConfig = Global> {
    buffer: Buffer<T, C::Alloc>,
    len: usize,
}

impl<T, C: VecConfig> Vec<T, C> {
    /// Constructs a new, empty `Vec<T, C>`.
    ///
    /// The vector will not allocate until elements are pushed onto it.
    ///
    /// # Examples
    ///
    /// ```
    /// # #![allow(unused_mut)]
    /// let mut vec: grow_vec::Vec<i32> = grow_vec::Vec::new();
    /// assert_eq!(vec.capacity(), 0);
    /// ```
    pub const fn new() -> Self {
        Self {
            buffer: Buffer::dangling(<C::Alloc as AllocatorDefault>::DEFAULT),
            len: 0,
        }
    }

    /// Try to construct an empty vector with room for at least `capacity` values.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, StorageError> {
        Ok(Self {
            buffer: C::buffer_try_new(capacity)?,
            len: 0,
        })
    }

    /// Construct an empty vector with room for at least `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(res) => res,
            Err(error) => error.panic(),
        }
    }

    /// Try to construct a vector of `len` default values.
    pub fn try_from_default(len: usize) -> Result<Self, StorageError>
    where
        T: Default,
    {
        let mut vec = Self::try_with_capacity(len)?;
        vec.insert_back(&mut Init::fill_default(), len);
        Ok(vec)
    }

    /// Construct a vector of `len` default values.
    pub fn from_default(len: usize) -> Self
    where
        T: Default,
    {
        match Self::try_from_default(len) {
            Ok(res) => res,
            Err(error) => error.panic(),
        }
    }

    /// Try to construct a vector of `len` clones of `value`.
    pub fn try_from_elem(value: &T, len: usize) -> Result<Self, StorageError>
    where
        T: Clone,
    {
        let mut vec = Self::try_with_capacity(len)?;
        vec.insert_back(&mut Init::fill_copy(value), len);
        Ok(vec)
    }

    /// Construct a vector of `len` clones of `value`.
    pub fn from_elem(value: &T, len: usize) -> Self
    where
        T: Clone,
    {
        match Self::try_from_elem(value, len) {
            Ok(res) => res,
            Err(error) => error.panic(),
        }
    }

    /// Try to construct a vector containing clones of each item in `data`.
    pub fn try_from_slice(data: &[T]) -> Result<Self, StorageError>
    where
        T: Clone,
    {
        let mut vec = Self::try_with_capacity(data.len())?;
        vec.insert_back(&mut Init::copy_from(data), data.len());
        Ok(vec)
    }

    /// Construct a vector containing clones of each item in `data`.
    pub fn from_slice(data: &[T]) -> Self
    where
        T: Clone,
    {
        match Self::try_from_slice(data) {
            Ok(res) => res,
            Err(error) => error.panic(),
        }
    }

    /// Try to create an independent copy of this vector.
    #[inline]
    pub fn try_clone(&self) -> Result<Self, StorageError>
    where
        T: Clone,
    {
        Self::try_from_slice(self.as_slice())
    }

    /// Move the contents out of this vector, leaving it empty and without
    /// an allocation.
    #[inline]
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::new())
    }
}

impl<T, C: VecConfig> Vec<T, C> {
    /// Get a reference to the allocator instance.
    #[inline]
    pub fn allocator(&self) -> &C::Alloc {
        self.buffer.allocator()
    }

    /// Access the buffer as a readonly pointer. The pointer is dangling
    /// when the capacity is zero.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.buffer.as_ptr()
    }

    /// Access the contained values as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots 0..len are always initialized.
        unsafe { slice::from_raw_parts(self.buffer.as_ptr(), self.len) }
    }

    /// Access the contained values as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: slots 0..len are always initialized.
        unsafe { slice::from_raw_parts_mut(self.buffer.as_mut_ptr(), self.len) }
    }

    /// The number of values the vector can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// The number of values in the vector.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Determine whether the vector holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get a reference to the value at `index`, or an error if `index` is
    /// not less than the length.
    #[inline]
    pub fn at(&self, index: usize) -> Result<&T, OutOfRange> {
        if index < self.len {
            // SAFETY: the index was checked above.
            Ok(unsafe { self.get_unchecked(index) })
        } else {
            Err(OutOfRange {
                index,
                len: self.len,
            })
        }
    }

    /// Get a mutable reference to the value at `index`, or an error if
    /// `index` is not less than the length.
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, OutOfRange> {
        if index < self.len {
            // SAFETY: the index was checked above.
            Ok(unsafe { self.get_unchecked_mut(index) })
        } else {
            Err(OutOfRange {
                index,
                len: self.len,
            })
        }
    }

    /// Get a reference to the value at `index` without a bounds check.
    ///
    /// # Safety
    /// `index` must be less than `self.len()`.
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        &*self.buffer.as_ptr().add(index)
    }

    /// Get a mutable reference to the value at `index` without a bounds check.
    ///
    /// # Safety
    /// `index` must be less than `self.len()`.
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        &mut *self.buffer.as_mut_ptr().add(index)
    }

    /// Try to ensure the capacity is at least `min_capacity`. Existing
    /// values are moved to a new buffer when the capacity grows.
    pub fn try_reserve(&mut self, min_capacity: usize) -> Result<(), StorageError> {
        if min_capacity <= self.capacity() {
            return Ok(());
        }
        let buffer = C::buffer_try_new(min_capacity)?;
        self.relocate(buffer);
        Ok(())
    }

    /// Ensure the capacity is at least `min_capacity`.
    #[inline]
    pub fn reserve(&mut self, min_capacity: usize) {
        match self.try_reserve(min_capacity) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Try to resize the vector to `new_len`, cloning `value` into any new slots.
    #[inline]
    pub fn try_resize(&mut self, new_len: usize, value: T) -> Result<(), StorageError>
    where
        T: Clone,
    {
        self.resize_with_init(new_len, Init::fill_copy(&value))
    }

    /// Resize the vector to `new_len`, cloning `value` into any new slots.
    #[inline]
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        match self.try_resize(new_len, value) {
            Ok(_) => (),
            Err(err) => err.panic(),
        }
    }

    /// Try to resize the vector to `new_len`, filling any new slots with
    /// the default value.
    #[inline]
    pub fn try_resize_default(&mut self, new_len: usize) -> Result<(), StorageError>
    where
        T: Default,
    {
        self.resize_with_init(new_len, Init::fill_default())
    }

    /// Resize the vector to `new_len`, filling any new slots with the
    /// default value.
    #[inline]
    pub fn resize_default(&mut self, new_len: usize)
    where
        T: Default,
    {
        match self.try_resize_default(new_len) {
            Ok(_) => (),
            Err(err) => err.panic(),
        }
    }

    fn resize_with_init(&mut self, new_len: usize, mut init: Init<'_, T>) -> Result<(), StorageError> {
        let len = self.len;
        match new_len.cmp(&len) {
            Ordering::Greater if new_len <= self.capacity() => {
                self.insert_back(&mut init, new_len - len);
            }
            Ordering::Greater => {
                // The new tail is built before any value is relocated, so a
                // panic here releases the new buffer and leaves `self` intact.
                let mut buffer = C::buffer_try_new(new_len)?;
                initialize_range(buffer.as_uninit_slice(), &mut init, len..new_len);
                self.relocate(buffer);
                self.len = new_len;
            }
            Ordering::Less => {
                self.truncate(new_len);
            }
            Ordering::Equal => {}
        }
        Ok(())
    }

    /// Shorten the vector to `len` values, dropping the rest. Has no effect
    /// if `len` is not less than the current length. The capacity is kept.
    pub fn truncate(&mut self, len: usize) {
        let old_len = self.len;
        if len < old_len {
            self.len = len;
            // SAFETY: slots len..old_len were live and are no longer counted.
            unsafe { destroy_range(self.buffer.as_uninit_slice(), len..old_len) };
        }
    }

    /// Drop every value in the vector. The capacity is kept.
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Try to append a value to the end of the vector. On failure the value
    /// is returned inside the error.
    pub fn try_push(&mut self, value: T) -> Result<(), UpdateError<T>> {
        let reserved = match self.len.checked_add(1) {
            Some(min_capacity) => self.try_reserve(min_capacity),
            None => Err(StorageError::CapacityLimit),
        };
        if let Err(error) = reserved {
            return Err(UpdateError::new(error, value));
        }
        self.insert_back(&mut Init::fill_move(value), 1);
        Ok(())
    }

    /// Append a value to the end of the vector.
    #[inline]
    pub fn push(&mut self, value: T) {
        match self.try_push(value) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Try to append a clone of `value` to the end of the vector. If the
    /// clone panics, the vector is left unchanged.
    pub fn try_push_clone(&mut self, value: &T) -> Result<(), StorageError>
    where
        T: Clone,
    {
        let Some(new_len) = self.len.checked_add(1) else {
            return Err(StorageError::CapacityLimit);
        };
        self.resize_with_init(new_len, Init::fill_copy(value))
    }

    /// Append a clone of `value` to the end of the vector.
    #[inline]
    pub fn push_clone(&mut self, value: &T)
    where
        T: Clone,
    {
        match self.try_push_clone(value) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Remove the last value from the vector and return it, or `None` if
    /// the vector is empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot was live and is no longer counted.
        Some(unsafe { self.buffer.as_ptr().add(self.len).read() })
    }

    /// Try to replace the contents of this vector with clones of the values
    /// in `source`.
    ///
    /// Existing values are never overwritten in place: unless the vector is
    /// empty with enough capacity, a complete copy is built first and then
    /// moved in, so a panicking `clone` leaves `self` unchanged.
    pub fn try_clone_from(&mut self, source: &Self) -> Result<(), StorageError>
    where
        T: Clone,
    {
        if ptr::eq(self, source) {
            return Ok(());
        }
        if source.is_empty() {
            self.clear();
        } else if self.is_empty() && self.capacity() >= source.len {
            self.insert_back(&mut Init::copy_from(source.as_slice()), source.len);
        } else {
            *self = source.try_clone()?;
        }
        Ok(())
    }

    /// Try to replace the contents of this vector with clones of the values
    /// in `source`, reusing the current buffer when it is large enough.
    ///
    /// Values beyond the current length are cloned into place first. The
    /// overlapping prefix is then overwritten with `clone_from`, which
    /// [`InfallibleClone`] guarantees cannot panic, and any excess values
    /// are dropped.
    pub fn try_assign_from(&mut self, source: &Self) -> Result<(), StorageError>
    where
        T: InfallibleClone,
    {
        if ptr::eq(self, source) {
            return Ok(());
        }
        if source.is_empty() {
            self.clear();
            return Ok(());
        }
        if self.capacity() < source.len {
            *self = source.try_clone()?;
            return Ok(());
        }
        let old_len = self.len;
        if old_len < source.len {
            self.insert_back(&mut Init::copy_from(source.as_slice()), source.len - old_len);
        }
        let shared = old_len.min(source.len);
        for (dst, src) in self.as_mut_slice()[..shared]
            .iter_mut()
            .zip(source.as_slice())
        {
            dst.clone_from(src);
        }
        self.truncate(source.len);
        Ok(())
    }

    /// Replace the contents of this vector with clones of the values in
    /// `source`, reusing the current buffer when it is large enough.
    #[inline]
    pub fn assign_from(&mut self, source: &Self)
    where
        T: InfallibleClone,
    {
        match self.try_assign_from(source) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Drop the current values and take ownership of the values in `other`.
    ///
    /// The buffers are exchanged, so `other` is left empty but may keep the
    /// allocation previously held by `self`. Use [`Vec::take`] when the
    /// source should release its storage.
    pub fn move_assign(&mut self, other: &mut Self) {
        self.clear();
        mem::swap(&mut self.buffer, &mut other.buffer);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Construct `count` values after the current length. The caller must
    /// have reserved the capacity.
    #[inline]
    fn insert_back(&mut self, init: &mut Init<'_, T>, count: usize) {
        let start = self.len;
        let end = start + count;
        initialize_range(self.buffer.as_uninit_slice(), init, start..end);
        self.len = end;
    }

    /// Move the current values into the front of `buffer`, then replace the
    /// current buffer with it.
    fn relocate(&mut self, mut buffer: Buffer<T, C::Alloc>) {
        let len = self.len;
        log::trace!(
            "relocating {} values: capacity {} -> {}",
            len,
            self.buffer.capacity(),
            buffer.capacity()
        );
        // SAFETY: each live value is read exactly once, and the previous
        // buffer is released below without dropping its contents.
        let mut init = unsafe { Init::move_from(self.buffer.as_ptr()) };
        initialize_range(buffer.as_uninit_slice(), &mut init, 0..len);
        self.buffer = buffer;
    }
}

impl<T, C: VecConfig> AsRef<[T]> for Vec<T, C> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, C: VecConfig> AsMut<[T]> for Vec<T, C> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Clone, C: VecConfig> Clone for Vec<T, C> {
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(res) => res,
            Err(error) => error.panic(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        match self.try_clone_from(source) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }
}

impl<T: fmt::Debug, C: VecConfig> fmt::Debug for Vec<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_slice().fmt(f)
    }
}

impl<T, C: VecConfig> Default for Vec<T, C> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: VecConfig> Drop for Vec<T, C> {
    fn drop(&mut self) {
        // The buffer releases its allocation when it is dropped in turn.
        self.clear();
    }
}

impl<T, C: VecConfig> Index<usize> for Vec<T, C> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        match self.at(index) {
            Ok(item) => item,
            Err(error) => error.panic(),
        }
    }
}

impl<T, C: VecConfig> IndexMut<usize> for Vec<T, C> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.at_mut(index) {
            Ok(item) => item,
            Err(error) => error.panic(),
        }
    }
}

impl<T: Clone, C: VecConfig> From<&[T]> for Vec<T, C> {
    #[inline]
    fn from(data: &[T]) -> Self {
        Self::from_slice(data)
    }
}

impl<T: Clone, C: VecConfig, const N: usize> From<&[T; N]> for Vec<T, C> {
    #[inline]
    fn from(data: &[T; N]) -> Self {
        Self::from_slice(data)
    }
}

impl<T, C: VecConfig, const N: usize> From<[T; N]> for Vec<T, C> {
    fn from(data: [T; N]) -> Self {
        let mut vec = Self::with_capacity(N);
        let data = ManuallyDrop::new(data);
        // SAFETY: each array item is read exactly once and the array itself
        // is never dropped.
        let mut init = unsafe { Init::move_from(data.as_ptr()) };
        vec.insert_back(&mut init, N);
        vec
    }
}

impl<T1, C1, T2, C2> PartialEq<Vec<T2, C2>> for Vec<T1, C1>
where
    C1: VecConfig,
    C2: VecConfig,
    T1: PartialEq<T2>,
{
    #[inline]
    fn eq(&self, other: &Vec<T2, C2>) -> bool {
        self.as_slice().eq(other.as_slice())
    }
}

impl<T: Eq, C: VecConfig> Eq for Vec<T, C> {}

impl<T1, C1, T2> PartialEq<[T2]> for Vec<T1, C1>
where
    T1: PartialEq<T2>,
    C1: VecConfig,
{
    #[inline]
    fn eq(&self, other: &[T2]) -> bool {
        self.as_slice().eq(other)
    }
}

impl<T1, C1, T2> PartialEq<&[T2]> for Vec<T1, C1>
where
    T1: PartialEq<T2>,
    C1: VecConfig,
{
    #[inline]
    fn eq(&self, other: &&[T2]) -> bool {
        self.as_slice().eq(*other)
    }
}

impl<T1, C1, T2, const N: usize> PartialEq<[T2; N]> for Vec<T1, C1>
where
    T1: PartialEq<T2>,
    C1: VecConfig,
{
    #[inline]
    fn eq(&self, other: &[T2; N]) -> bool {
        self.as_slice().eq(&other[..])
    }
}

impl<T1, C1, T2, const N: usize> PartialEq<&[T2; N]> for Vec<T1, C1>
where
    T1: PartialEq<T2>,
    C1: VecConfig,
{
    #[inline]
    fn eq(&self, other: &&[T2; N]) -> bool {
        self.as_slice().eq(&other[..])
    }
}

// The buffer is exclusively owned, so thread safety follows the item type.
unsafe impl<T: Send, C: VecConfig> Send for Vec<T, C> where C::Alloc: Send {}

unsafe impl<T: Sync, C: VecConfig> Sync for Vec<T, C> where C::Alloc: Sync {}

#[cfg(feature = "zeroize")]
impl<T, A: AllocatorDefault> zeroize::Zeroize for Vec<T, crate::alloc::ZeroizingAlloc<A>> {
    #[inline]
    fn zeroize(&mut self) {
        self.clear();
        self.buffer.release();
    }
}

#[cfg(feature = "zeroize")]
impl<T, A: AllocatorDefault> zeroize::ZeroizeOnDrop for Vec<T, crate::alloc::ZeroizingAlloc<A>> {}

/// ```compile_fail,E0502
/// let mut v = grow_vec::Vec::<u32>::from_slice(&[1, 2, 3]);
/// v.clone_from(&v);
/// ```
///
/// ```compile_fail,E0499
/// let mut v = grow_vec::Vec::<u32>::from_slice(&[1, 2, 3]);
/// v.move_assign(&mut v);
/// ```
#[cfg(doctest)]
fn _self_assign_check() {}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::Vec;
    use crate::capacity::GrowExact;
    use crate::vec::config::Custom;
    use crate::alloc::Global;

    #[test]
    fn new_does_not_allocate() {
        let v = Vec::<u64>::new();
        assert_eq!(v.len(), 0);
        assert_eq!(v.capacity(), 0);
        assert!(v.is_empty());
    }

    #[test]
    fn sized_construction_rounds_capacity() {
        let v = Vec::<u8>::from_default(5);
        assert_eq!(v, [0u8; 5]);
        assert_eq!(v.capacity(), 8);
        let v = Vec::<u8>::from_default(0);
        assert_eq!(v.capacity(), 0);
    }

    #[test]
    fn exact_growth_config() {
        let mut v = Vec::<u32, Custom<Global, GrowExact>>::from_elem(&7, 3);
        assert_eq!(v.capacity(), 3);
        v.push(8);
        assert_eq!(v.capacity(), 4);
        v.push(9);
        assert_eq!(v.capacity(), 5);
        assert_eq!(v, [7, 7, 7, 8, 9]);
    }

    #[test]
    fn relocate_preserves_values() {
        let mut v = Vec::<std::string::String>::new();
        for i in 0..20 {
            v.push(format!("item {i}"));
        }
        assert_eq!(v.capacity(), 32);
        for i in 0..20 {
            assert_eq!(v[i], format!("item {i}"));
        }
    }

    #[test]
    fn pop_returns_last() {
        let mut v = Vec::<u32>::from([1, 2]);
        assert_eq!(v.pop(), Some(2));
        assert_eq!(v.pop(), Some(1));
        assert_eq!(v.pop(), None);
        assert_eq!(v.capacity(), 2);
    }
}
