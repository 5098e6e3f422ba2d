//! Growth policies used to select a new capacity for a collection.

use core::fmt::Debug;

use crate::error::StorageError;

/// Growth behavior for collections which have exceeded their available storage.
pub trait Grow: Debug {
    /// Calculate the capacity to request from the allocator in order to
    /// hold at least `requested` items.
    fn next_capacity(requested: usize) -> Result<usize, StorageError>;
}

/// Growth behavior which rounds every request up to the next power of two.
///
/// Doubling capacities keep the amortized cost of an append constant, and
/// a zero request never allocates.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct GrowPowerOfTwo;

impl Grow for GrowPowerOfTwo {
    #[inline]
    fn next_capacity(requested: usize) -> Result<usize, StorageError> {
        if requested == 0 {
            Ok(0)
        } else {
            requested
                .checked_next_power_of_two()
                .ok_or(StorageError::CapacityLimit)
        }
    }
}

/// Growth behavior which never requests extra capacity.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct GrowExact;

impl Grow for GrowExact {
    #[inline]
    fn next_capacity(requested: usize) -> Result<usize, StorageError> {
        Ok(requested)
    }
}
