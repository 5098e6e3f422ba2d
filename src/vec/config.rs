//! `Vec` configuration types and trait definitions.

use core::fmt;
use core::marker::PhantomData;

use const_default::ConstDefault;

use crate::alloc::AllocatorDefault;
use crate::capacity::{Grow, GrowPowerOfTwo};
use crate::error::StorageError;
use crate::storage::Buffer;

/// Define the associated types for `Vec` instances.
pub trait VecConfig {
    /// The allocation strategy used for the backing buffer.
    type Alloc: AllocatorDefault;

    /// The growth strategy.
    type Grow: Grow;

    /// Try to allocate a buffer with room for at least `min_capacity` values,
    /// rounded up according to the growth strategy.
    #[inline]
    fn buffer_try_new<T>(min_capacity: usize) -> Result<Buffer<T, Self::Alloc>, StorageError> {
        let capacity = Self::Grow::next_capacity(min_capacity)?;
        Buffer::allocate_in(capacity, <Self::Alloc as AllocatorDefault>::DEFAULT)
    }
}

impl<A: AllocatorDefault> VecConfig for A {
    type Alloc = A;
    type Grow = GrowPowerOfTwo;
}

/// Parameterize `Vec` with a custom allocator and growth behavior.
pub struct Custom<A: AllocatorDefault, G: Grow = GrowPowerOfTwo> {
    _pd: PhantomData<(A, G)>,
}

impl<A: AllocatorDefault, G: Grow> ConstDefault for Custom<A, G> {
    const DEFAULT: Self = Self { _pd: PhantomData };
}

impl<A: AllocatorDefault, G: Grow> Default for Custom<A, G> {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl<A: AllocatorDefault, G: Grow> fmt::Debug for Custom<A, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Custom").finish_non_exhaustive()
    }
}

impl<A: AllocatorDefault, G: Grow> VecConfig for Custom<A, G> {
    type Alloc = A;
    type Grow = G;
}
