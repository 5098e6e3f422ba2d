//! A growable array with power-of-two capacities and strong panic safety.
//!
//! [`Vec`] keeps its raw storage ([`storage::Buffer`]) separate from the
//! lifetime of the elements it holds. Every operation which constructs
//! elements does so through a single range initializer which drops any
//! partially constructed prefix if a `Clone` implementation panics, so a
//! failed operation leaves the vector exactly as it was.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(feature = "nightly", feature(allocator_api))]
#![warn(missing_docs)]

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
struct _ReadmeDoctests;

#[cfg(test)]
#[macro_use]
extern crate std;

#[cfg(feature = "alloc")]
extern crate alloc as alloc_crate;

pub mod alloc;

pub mod capacity;

pub(crate) mod error;

pub mod storage;

pub mod vec;

pub use self::error::{OutOfRange, StorageError, UpdateError};
pub use self::vec::{InfallibleClone, Vec};
