use core::mem::{self, MaybeUninit};
use core::ops::Range;
use core::ptr;

/// The ways a slot may be populated. Indexed variants read the source at
/// the same offset as the destination slot.
pub(crate) enum Init<'a, T> {
    /// Construct the default value.
    Default(fn() -> T),
    /// Clone a single value into every slot.
    ScalarCopy(&'a T, fn(&T) -> T),
    /// Move a single value into one slot.
    ScalarMove(Option<T>),
    /// Clone `source[i]` into slot `i`.
    IndexedCopy(&'a [T], fn(&T) -> T),
    /// Move `source[i]` into slot `i`.
    IndexedMove(*const T),
}

impl<'a, T> Init<'a, T> {
    #[inline]
    pub fn fill_default() -> Self
    where
        T: Default,
    {
        Self::Default(T::default)
    }

    #[inline]
    pub fn fill_copy(value: &'a T) -> Self
    where
        T: Clone,
    {
        Self::ScalarCopy(value, T::clone)
    }

    #[inline]
    pub fn fill_move(value: T) -> Self {
        Self::ScalarMove(Some(value))
    }

    #[inline]
    pub fn copy_from(source: &'a [T]) -> Self
    where
        T: Clone,
    {
        Self::IndexedCopy(source, T::clone)
    }

    /// # Safety
    /// Every slot this initializer is applied to must correspond to a live
    /// value in `source`, and those values must not be used or dropped again
    /// once they have been moved.
    #[inline]
    pub unsafe fn move_from(source: *const T) -> Self {
        Self::IndexedMove(source)
    }

    /// Produce the value for slot `index`. May panic for the copying
    /// variants, in which case no value has been produced.
    #[inline]
    fn produce(&mut self, index: usize) -> T {
        match self {
            Self::Default(f) => f(),
            Self::ScalarCopy(value, f) => f(*value),
            Self::ScalarMove(value) => match value.take() {
                Some(value) => value,
                None => unreachable!("scalar move applied to more than one slot"),
            },
            Self::IndexedCopy(source, f) => f(&source[index]),
            // SAFETY: guaranteed by the contract of `move_from`.
            Self::IndexedMove(source) => unsafe { source.add(index).read() },
        }
    }
}

/// Tracks the slots constructed so far by `initialize_range`. If dropped
/// before completion, the constructed slots are dropped in turn.
struct RangeGuard<'s, T> {
    slots: &'s mut [MaybeUninit<T>],
    start: usize,
    pos: usize,
}

impl<T> Drop for RangeGuard<'_, T> {
    #[inline]
    fn drop(&mut self) {
        if self.pos != self.start {
            // SAFETY: slots in start..pos were written by `initialize_range`.
            unsafe { destroy_range(self.slots, self.start..self.pos) };
        }
    }
}

/// Populate `slots[range]` in increasing order. If the initializer panics at
/// slot `k`, the slots constructed during this call are dropped before the
/// panic continues, and slots from `k` onward are left untouched.
///
/// On return every slot in `range` holds a live value owned by the caller.
pub(crate) fn initialize_range<T>(
    slots: &mut [MaybeUninit<T>],
    init: &mut Init<'_, T>,
    range: Range<usize>,
) {
    let Range { start, end } = range;
    assert!(start <= end && end <= slots.len(), "invalid slot range");
    let mut guard = RangeGuard {
        slots,
        start,
        pos: start,
    };
    while guard.pos < end {
        let value = init.produce(guard.pos);
        guard.slots[guard.pos].write(value);
        guard.pos += 1;
    }
    mem::forget(guard);
}

/// Drop the values in `slots[range]`.
///
/// # Safety
/// Every slot in `range` must hold a live value, which must not be used
/// again afterward.
#[inline]
pub(crate) unsafe fn destroy_range<T>(slots: &mut [MaybeUninit<T>], range: Range<usize>) {
    let live = &mut slots[range] as *mut [MaybeUninit<T>] as *mut [T];
    ptr::drop_in_place(live);
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;
    use core::mem::MaybeUninit;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use super::{destroy_range, initialize_range, Init};

    struct Tracked<'a> {
        value: usize,
        drops: &'a Cell<usize>,
        clones_left: &'a Cell<usize>,
    }

    impl Clone for Tracked<'_> {
        fn clone(&self) -> Self {
            let left = self.clones_left.get();
            if left == 0 {
                panic!("clone failed");
            }
            self.clones_left.set(left - 1);
            Self {
                value: self.value,
                drops: self.drops,
                clones_left: self.clones_left,
            }
        }
    }

    impl Drop for Tracked<'_> {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    fn uninit_slots<T, const N: usize>() -> [MaybeUninit<T>; N] {
        unsafe { MaybeUninit::uninit().assume_init() }
    }

    #[test]
    fn fill_default_range() {
        let mut slots = uninit_slots::<u32, 6>();
        initialize_range(&mut slots, &mut Init::fill_default(), 2..5);
        for slot in &slots[2..5] {
            assert_eq!(unsafe { slot.assume_init_read() }, 0);
        }
    }

    #[test]
    fn indexed_copy_same_offset() {
        let source = [10u32, 11, 12, 13];
        let mut slots = uninit_slots::<u32, 4>();
        initialize_range(&mut slots, &mut Init::copy_from(&source), 1..4);
        let copied: std::vec::Vec<u32> = slots[1..4]
            .iter()
            .map(|s| unsafe { s.assume_init_read() })
            .collect();
        assert_eq!(copied, [11, 12, 13]);
    }

    #[test]
    fn rollback_on_failed_copy() {
        let drops = Cell::new(0);
        let clones_left = Cell::new(3);
        let source: std::vec::Vec<Tracked<'_>> = (0..5)
            .map(|value| Tracked {
                value,
                drops: &drops,
                clones_left: &clones_left,
            })
            .collect();
        let mut slots = uninit_slots::<Tracked<'_>, 8>();
        let res = catch_unwind(AssertUnwindSafe(|| {
            initialize_range(&mut slots, &mut Init::copy_from(&source), 0..5);
        }));
        assert!(res.is_err());
        // the three completed clones were dropped during unwinding
        assert_eq!(drops.get(), 3);
        drop(source);
        assert_eq!(drops.get(), 8);
    }

    #[test]
    fn destroy_drops_each_slot() {
        let drops = Cell::new(0);
        let clones_left = Cell::new(usize::MAX);
        let proto = Tracked {
            value: 1,
            drops: &drops,
            clones_left: &clones_left,
        };
        let mut slots = uninit_slots::<Tracked<'_>, 4>();
        initialize_range(&mut slots, &mut Init::fill_copy(&proto), 0..4);
        unsafe { destroy_range(&mut slots, 1..4) };
        assert_eq!(drops.get(), 3);
        unsafe { destroy_range(&mut slots, 0..1) };
        assert_eq!(drops.get(), 4);
    }

    #[test]
    fn scalar_move_single_slot() {
        let mut slots = uninit_slots::<std::string::String, 2>();
        initialize_range(&mut slots, &mut Init::fill_move("moved".into()), 1..2);
        assert_eq!(unsafe { slots[1].assume_init_read() }, "moved");
    }
}
