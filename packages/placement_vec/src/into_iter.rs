use std::fmt;
use std::iter::FusedIterator;
use std::{ptr, slice};

use crate::RawStorage;

/// An owning iterator over the elements of a [`PlacementVec`][crate::PlacementVec].
///
/// Takes over the container's storage block: elements are moved out one at a time from
/// either end, and whatever has not been yielded when the iterator is dropped is dropped
/// in place before the block is released.
pub struct IntoIter<T> {
    /// The block taken from the container. Slots `[start, end)` still hold live
    /// elements; everything outside that window has been moved out or never existed.
    storage: RawStorage<T>,

    /// First slot not yet yielded from the front.
    start: usize,

    /// One past the last slot not yet yielded from the back.
    end: usize,
}

impl<T> IntoIter<T> {
    /// Adopts a block whose slots `[0, len)` are initialized.
    pub(crate) fn new(storage: RawStorage<T>, len: usize) -> Self {
        debug_assert!(len <= storage.capacity());

        Self {
            storage,
            start: 0,
            end: len,
        }
    }

    /// The elements not yet yielded, as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // Cannot underflow: start <= end is an invariant of the type.
        let remaining = self.end.wrapping_sub(self.start);

        // SAFETY: Slots [start, end) are initialized, and start <= capacity.
        let first = unsafe { self.storage.ptr_at(self.start) };

        // SAFETY: The range is initialized and within the allocation.
        unsafe { slice::from_raw_parts(first, remaining) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }

        // SAFETY: start < end <= capacity, so the slot is within the block.
        let slot = unsafe { self.storage.ptr_at(self.start) };

        // The slot leaves the live window before the value escapes, so it cannot be
        // dropped again by the iterator's own drop.
        // Cannot overflow: bounded by end.
        self.start = self.start.wrapping_add(1);

        // SAFETY: The slot was initialized; reading moves the element out.
        Some(unsafe { slot.read() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // Cannot underflow: start <= end is an invariant of the type.
        let remaining = self.end.wrapping_sub(self.start);
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }

        // Cannot underflow: start < end was just established.
        self.end = self.end.wrapping_sub(1);

        // SAFETY: end < original end <= capacity.
        let slot = unsafe { self.storage.ptr_at(self.end) };

        // SAFETY: The slot was initialized and has left the live window.
        Some(unsafe { slot.read() })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // Cannot underflow: start <= end is an invariant of the type.
        let remaining = self.end.wrapping_sub(self.start);

        // SAFETY: start <= capacity.
        let first = unsafe { self.storage.ptr_at(self.start) };

        let live = ptr::slice_from_raw_parts_mut(first, remaining);

        // SAFETY: Slots [start, end) hold the elements never yielded; each is dropped
        // exactly once here, after which the storage's own drop releases the bytes.
        unsafe {
            ptr::drop_in_place(live);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::PlacementVec;

    /// Test helper whose instances count their own drops through a shared counter.
    struct DropCounted {
        value: u32,
        drops: Rc<Cell<usize>>,
    }

    impl DropCounted {
        fn new(value: u32, drops: &Rc<Cell<usize>>) -> Self {
            Self {
                value,
                drops: Rc::clone(drops),
            }
        }
    }

    impl Drop for DropCounted {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    #[test]
    fn yields_every_element_in_order() {
        let items: PlacementVec<i32> = [1, 2, 3, 4].into_iter().collect();

        let collected: Vec<i32> = items.into_iter().collect();

        assert_eq!(collected, vec![1, 2, 3, 4]);
    }

    #[test]
    fn yields_from_both_ends() {
        let items: PlacementVec<i32> = [1, 2, 3, 4, 5].into_iter().collect();
        let mut iter = items.into_iter();

        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.next_back(), Some(5));
        assert_eq!(iter.next(), Some(2));
        assert_eq!(iter.next_back(), Some(4));
        assert_eq!(iter.next(), Some(3));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn reports_exact_size() {
        let items: PlacementVec<i32> = [1, 2, 3].into_iter().collect();
        let mut iter = items.into_iter();

        assert_eq!(iter.len(), 3);
        _ = iter.next();
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.size_hint(), (2, Some(2)));
    }

    #[test]
    fn as_slice_tracks_the_unyielded_window() {
        let items: PlacementVec<i32> = [1, 2, 3, 4].into_iter().collect();
        let mut iter = items.into_iter();

        _ = iter.next();
        _ = iter.next_back();

        assert_eq!(iter.as_slice(), &[2, 3]);
    }

    #[test]
    fn drops_unyielded_elements_exactly_once() {
        let drops = Rc::new(Cell::new(0));
        let mut items = PlacementVec::new();

        for value in 0..5 {
            items.push(DropCounted::new(value, &drops));
        }

        let mut iter = items.into_iter();

        let first = iter.next().expect("five elements were inserted");
        assert_eq!(first.value, 0);
        drop(first);
        assert_eq!(drops.get(), 1);

        // The four unyielded elements are dropped with the iterator, once each.
        drop(iter);
        assert_eq!(drops.get(), 5);
    }

    #[test]
    fn empty_container_yields_nothing() {
        let items = PlacementVec::<String>::new();

        assert_eq!(items.into_iter().next(), None);
    }
}
