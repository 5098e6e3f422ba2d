//! Backing storage for collections.
//!
//! [`Buffer`] owns raw, uninitialized memory. The crate-internal `init`
//! module populates and drops ranges of its slots.

mod buffer;
pub(crate) mod init;

pub use self::buffer::Buffer;
