use std::fmt;
use std::mem::{self, ManuallyDrop};
use std::ops::{Deref, DerefMut};
use std::ptr;
use std::slice;

use crate::{IntoIter, RawStorage};

/// A contiguous growable array that manages its backing storage by hand.
///
/// `PlacementVec<T>` pairs a raw storage block with a live-element count. Slots `[0, len)`
/// hold initialized values; slots `[len, capacity)` are raw bytes. Every operation
/// maintains that split, including when element code (a clone, a default constructor, a
/// caller-supplied closure) panics partway through.
///
/// # Key features
///
/// - **Amortized O(1) append**: capacity doubles when exhausted, starting from 1
/// - **Placement construction**: [`push_with()`][Self::push_with] and
///   [`insert_with()`][Self::insert_with] build the element directly in its target slot
/// - **Exact reserve**: [`reserve()`][Self::reserve] allocates precisely what was asked for
/// - **Transactional reallocation**: operations that relocate into a fresh block leave the
///   container untouched if they fail partway
/// - **Slice access**: derefs to `[T]`, so all slice queries and iteration come for free
///
/// # Element type contract
///
/// `T` needs nothing beyond being droppable for the core operations. `Clone` is required
/// only for whole-container cloning, `Default` only for [`resize()`][Self::resize] and
/// [`with_len()`][Self::with_len]. Zero-sized element types are not supported; any
/// operation that needs to allocate for one panics.
///
/// # Failure model
///
/// Out-of-bounds indexes and positions are contract violations and panic. Allocation
/// failure panics (it is not treated as a recoverable condition). Panics from element
/// code never leak elements or drop one twice; operations that work in a side buffer
/// additionally guarantee the container is left exactly as it was.
///
/// # Examples
///
/// ```rust
/// use placement_vec::PlacementVec;
///
/// let mut items = PlacementVec::new();
///
/// items.push(1);
/// items.push(2);
/// items.push(3);
///
/// items.insert(1, 99);
/// assert_eq!(items.as_slice(), &[1, 99, 2, 3]);
///
/// assert_eq!(items.remove(0), 1);
/// assert_eq!(items.pop(), Some(3));
/// assert_eq!(items.as_slice(), &[99, 2]);
/// ```
///
/// # Thread safety
///
/// The container has no internal synchronization; it is `Send`/`Sync` exactly when `T`
/// is, and a single owner mediates all access to the backing block.
pub struct PlacementVec<T> {
    /// The backing block. Slot lifetimes are tracked here, not in the storage,
    /// which only knows about bytes.
    storage: RawStorage<T>,

    /// Number of initialized elements, occupying slots `[0, len)` of the block.
    /// Invariant: `len <= storage.capacity()`.
    len: usize,
}

impl<T> PlacementVec<T> {
    /// Creates an empty container without allocating.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use placement_vec::PlacementVec;
    ///
    /// let items = PlacementVec::<String>::new();
    ///
    /// assert_eq!(items.len(), 0);
    /// assert_eq!(items.capacity(), 0);
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self {
            storage: RawStorage::empty(),
            len: 0,
        }
    }

    /// Creates an empty container with a block sized for exactly `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized or allocation fails.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: RawStorage::with_capacity(capacity),
            len: 0,
        }
    }

    /// Creates a container holding `len` default-constructed elements, with capacity
    /// exactly `len`.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized or allocation fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use placement_vec::PlacementVec;
    ///
    /// let items = PlacementVec::<u32>::with_len(4);
    ///
    /// assert_eq!(items.as_slice(), &[0, 0, 0, 0]);
    /// assert_eq!(items.capacity(), 4);
    /// ```
    #[must_use]
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        let mut items = Self::with_capacity(len);
        items.resize(len);
        items
    }

    /// Number of live elements.
    #[must_use]
    #[cfg_attr(test, mutants::skip)] // Can be mutated to infinitely growing memory use and/or infinite loop.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the container holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the current block can hold without reallocating.
    #[must_use]
    #[cfg_attr(test, mutants::skip)] // Can be mutated to infinitely growing memory use.
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// The live range as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: Slots [0, len) are initialized per the type invariant, and the pointer
        // is well-aligned and non-null even in the unallocated state.
        unsafe { slice::from_raw_parts(self.storage.as_ptr(), self.len) }
    }

    /// The live range as a mutable slice.
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: Slots [0, len) are initialized per the type invariant, and we hold an
        // exclusive reference, so no other access to the block exists.
        unsafe { slice::from_raw_parts_mut(self.storage.as_ptr(), self.len) }
    }

    /// Reference to the element at `index`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Mutable reference to the element at `index`, or `None` when out of bounds.
    #[must_use]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// Grows the block to hold exactly `new_capacity` elements. Does nothing when the
    /// current capacity is already sufficient - in that case elements keep their
    /// addresses.
    ///
    /// Live elements are relocated into the new block as a bitwise move: ownership
    /// transfers wholesale, the old block is released without running element drops,
    /// and no element code executes at all. Rust moves cannot fail, so the relocation
    /// has no partially-transferred state to unwind.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized or allocation fails. On allocation failure the
    /// container is untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use placement_vec::PlacementVec;
    ///
    /// let mut items = PlacementVec::new();
    /// items.push("a".to_string());
    ///
    /// items.reserve(16);
    ///
    /// assert_eq!(items.capacity(), 16);
    /// assert_eq!(items.len(), 1);
    /// ```
    pub fn reserve(&mut self, new_capacity: usize) {
        if new_capacity <= self.storage.capacity() {
            return;
        }

        let mut new_storage = RawStorage::with_capacity(new_capacity);

        // SAFETY: The live range holds len initialized elements, the fresh block has at
        // least that many slots, and separate allocations cannot overlap.
        unsafe {
            ptr::copy_nonoverlapping(self.storage.as_ptr(), new_storage.as_ptr(), self.len);
        }

        self.storage.swap(&mut new_storage);

        // new_storage now owns the old block. Its elements were moved out above, so
        // dropping it releases the bytes only.
    }

    /// Sets the length to `new_len`, default-constructing new trailing elements when
    /// growing and dropping surplus trailing elements in place when shrinking.
    /// Shrinking never reallocates.
    ///
    /// If a default constructor panics partway through growth, the elements constructed
    /// so far remain live and the container stays valid.
    ///
    /// # Panics
    ///
    /// Panics if growth requires allocation and `T` is zero-sized or allocation fails.
    pub fn resize(&mut self, new_len: usize)
    where
        T: Default,
    {
        if new_len == self.len {
            return;
        }

        if new_len < self.len {
            self.truncate(new_len);
            return;
        }

        self.reserve(new_len);

        while self.len < new_len {
            let value = T::default();

            // SAFETY: len < new_len <= capacity after the reserve above, so slot len is
            // raw memory within the block.
            let slot = unsafe { self.storage.ptr_at(self.len) };

            // SAFETY: The slot is uninitialized; writing takes ownership of the value.
            unsafe {
                slot.write(value);
            }

            // Advancing per element keeps the live-range invariant if the next
            // default constructor panics.
            // Cannot overflow: bounded by new_len.
            self.len = self.len.wrapping_add(1);
        }
    }

    /// Drops every element past the first `new_len` in place. Does nothing when
    /// `new_len >= len`. Never reallocates.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }

        // Cannot underflow: guarded above.
        let tail_len = self.len.wrapping_sub(new_len);

        // The tail leaves the live range before its drops run, so a panicking element
        // drop cannot lead to a second drop of the same slot.
        self.len = new_len;

        // SAFETY: new_len <= old len <= capacity.
        let tail_start = unsafe { self.storage.ptr_at(new_len) };

        let tail = ptr::slice_from_raw_parts_mut(tail_start, tail_len);

        // SAFETY: The tail slots were initialized and are no longer reachable through
        // the live range.
        unsafe {
            ptr::drop_in_place(tail);
        }
    }

    /// Drops every element. Capacity is retained.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Appends a value to the end of the live range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use placement_vec::PlacementVec;
    ///
    /// let mut items = PlacementVec::new();
    ///
    /// items.push(10);
    /// items.push(20);
    ///
    /// assert_eq!(items.as_slice(), &[10, 20]);
    /// ```
    pub fn push(&mut self, value: T) {
        _ = self.insert_with(self.len, move || value);
    }

    /// Appends an element constructed in place in the next free slot and returns a
    /// reference to it.
    ///
    /// When spare capacity exists, the closure's result is written directly into the
    /// target slot without an intermediate location.
    #[must_use]
    pub fn push_with<F>(&mut self, make: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        self.insert_with(self.len, make)
    }

    /// Inserts a value at `index`, shifting everything at and after it one slot toward
    /// the end. `index == len` appends.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`, if growth is needed and allocation fails, or if `T` is
    /// zero-sized.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use placement_vec::PlacementVec;
    ///
    /// let mut items: PlacementVec<i32> = [1, 2, 3].into_iter().collect();
    ///
    /// items.insert(0, 99);
    ///
    /// assert_eq!(items.as_slice(), &[99, 1, 2, 3]);
    /// ```
    pub fn insert(&mut self, index: usize, value: T) {
        _ = self.insert_with(index, move || value);
    }

    /// The universal insertion primitive: constructs an element at `index` via `make`,
    /// shifting the suffix toward the end, and returns a reference to the new element.
    /// `index == len` appends. Every other insertion operation forwards here.
    ///
    /// With spare capacity the insert happens in place: the suffix `[index, len)` moves
    /// up one slot bitwise and the new element is written into the gap. The closure runs
    /// before any shifting, so a panic inside it leaves the container untouched.
    ///
    /// Without spare capacity a block of twice the current capacity (minimum 1) is
    /// allocated, the new element is constructed directly at its target slot there, and
    /// the prefix and suffix are relocated around it bitwise. A panic inside the closure
    /// discards only the fresh block; the container is untouched.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`, if growth is needed and allocation fails, or if `T` is
    /// zero-sized.
    #[must_use]
    pub fn insert_with<F>(&mut self, index: usize, make: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        assert!(
            index <= self.len,
            "insert index {index} out of bounds for length {}",
            self.len
        );

        if self.len < self.storage.capacity() {
            if index == self.len {
                let value = make();

                // SAFETY: len < capacity, so slot len is raw memory within the block.
                let slot = unsafe { self.storage.ptr_at(self.len) };

                // SAFETY: The slot is uninitialized; writing takes ownership.
                unsafe {
                    slot.write(value);
                }
            } else {
                // Construct before shifting so a panicking constructor leaves the
                // container untouched.
                let value = make();

                // SAFETY: index < len <= capacity.
                let gap = unsafe { self.storage.ptr_at(index) };

                // SAFETY: index + 1 <= len < capacity, still within the block.
                let gap_one_up = unsafe { gap.add(1) };

                // SAFETY: Moves [index, len) up one slot; the destination ends at
                // len + 1 <= capacity. Overlap is fine for ptr::copy.
                unsafe {
                    ptr::copy(gap, gap_one_up, self.len.wrapping_sub(index));
                }

                // SAFETY: The old occupant of this slot now lives one slot up; its
                // stale bytes here must be overwritten without a drop.
                unsafe {
                    gap.write(value);
                }
            }
        } else {
            self.insert_into_grown(index, make);
        }

        // Cannot overflow: a block for len + 1 elements was just proven allocatable.
        self.len = self.len.wrapping_add(1);

        // SAFETY: index < len <= capacity after the increment above.
        let slot = unsafe { self.storage.ptr_at(index) };

        // SAFETY: Slot index was initialized above; we hold an exclusive reference to
        // the container, so no other reference to the element exists.
        unsafe { &mut *slot }
    }

    /// The no-spare-capacity insert path: relocate everything into a doubled block with
    /// the new element already in position.
    fn insert_into_grown<F>(&mut self, index: usize, make: F)
    where
        F: FnOnce() -> T,
    {
        let mut new_storage: RawStorage<T> = RawStorage::with_capacity(self.grown_capacity());

        // The new element is constructed first, directly at its final slot. If `make`
        // panics here, only the fresh block exists and it is released as raw bytes -
        // the container has not been touched.
        // SAFETY: index <= len < new capacity.
        let target = unsafe { new_storage.ptr_at(index) };

        let value = make();

        // SAFETY: The slot is uninitialized memory in the fresh block.
        unsafe {
            target.write(value);
        }

        // Relocate prefix and suffix around the new element. Both are bitwise moves of
        // element ownership; nothing below can fail.
        // SAFETY: The prefix [0, index) is initialized and fits below slot index in the
        // fresh block; separate allocations cannot overlap.
        unsafe {
            ptr::copy_nonoverlapping(self.storage.as_ptr(), new_storage.as_ptr(), index);
        }

        // SAFETY: index <= len <= capacity.
        let suffix_src = unsafe { self.storage.ptr_at(index) };

        // SAFETY: index + 1 <= len + 1 <= new capacity.
        let suffix_dst = unsafe { new_storage.ptr_at(index.wrapping_add(1)) };

        // SAFETY: The suffix [index, len) is initialized and its destination range ends
        // at len + 1 <= new capacity.
        unsafe {
            ptr::copy_nonoverlapping(suffix_src, suffix_dst, self.len.wrapping_sub(index));
        }

        self.storage.swap(&mut new_storage);

        // new_storage now owns the old block, whose elements were all moved out;
        // dropping it releases the bytes only.
    }

    /// Capacity to jump to when the current block is exhausted: doubling, with a floor
    /// of one for the unallocated state. This amortizes relocation cost to O(1) per
    /// append across a sequence of appends.
    fn grown_capacity(&self) -> usize {
        self.storage
            .capacity()
            .checked_mul(2)
            .expect("capacity overflow: doubled capacity exceeds usize::MAX")
            .max(1)
    }

    /// Removes and returns the element at `index`, shifting everything after it one
    /// slot toward the beginning. Never reallocates.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use placement_vec::PlacementVec;
    ///
    /// let mut items: PlacementVec<i32> = [1, 2, 3].into_iter().collect();
    ///
    /// assert_eq!(items.remove(1), 2);
    /// assert_eq!(items.as_slice(), &[1, 3]);
    /// ```
    pub fn remove(&mut self, index: usize) -> T {
        assert!(
            index < self.len,
            "remove index {index} out of bounds for length {}",
            self.len
        );

        // SAFETY: index < len <= capacity.
        let slot = unsafe { self.storage.ptr_at(index) };

        // SAFETY: The slot is initialized; reading moves the element out, and the stale
        // bytes are overwritten by the shift or fall outside the live range below.
        let value = unsafe { slot.read() };

        // SAFETY: index + 1 <= len <= capacity (one-past-end allowed when removing the
        // last element).
        let suffix = unsafe { slot.add(1) };

        // SAFETY: Moves [index + 1, len) down one slot; both ranges are within the
        // block. Overlap is fine for ptr::copy.
        unsafe {
            ptr::copy(
                suffix,
                slot,
                self.len.wrapping_sub(index).wrapping_sub(1),
            );
        }

        // Cannot underflow: index < len implies len >= 1.
        self.len = self.len.wrapping_sub(1);

        value
    }

    /// Removes and returns the last element, or `None` when empty. Removing from an
    /// empty container is not an error.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        // The slot leaves the live range before the read, so the element cannot be
        // dropped twice even if the caller's code panics while holding the value.
        // Cannot underflow: guarded above.
        self.len = self.len.wrapping_sub(1);

        // SAFETY: len <= capacity.
        let slot = unsafe { self.storage.ptr_at(self.len) };

        // SAFETY: Slot len held the last live element; reading moves it out.
        Some(unsafe { slot.read() })
    }

    /// Exchanges contents with `other` by swapping blocks and lengths. No element
    /// effects, cannot fail.
    ///
    /// (Named `swap_with` so that `[T]::swap`, reachable through deref, keeps its
    /// element-swapping meaning.)
    pub fn swap_with(&mut self, other: &mut Self) {
        self.storage.swap(&mut other.storage);
        mem::swap(&mut self.len, &mut other.len);
    }
}

impl<T> Drop for PlacementVec<T> {
    fn drop(&mut self) {
        // Drop the live range; the storage then releases the bytes via its own drop.
        self.clear();
    }
}

impl<T> Default for PlacementVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for PlacementVec<T> {
    /// Clones into a fresh, exactly-sized container. If an element clone panics, the
    /// partially built copy unwinds and cleans itself up; the source is untouched.
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity(self.len);

        for item in self.as_slice() {
            // Capacity is exact, so these appends never relocate.
            copy.push(item.clone());
        }

        copy
    }

    /// The whole-container assignment operator.
    ///
    /// When the source does not fit in the current block, a complete copy is built on
    /// the side and adopted by swap - a panicking element clone then leaves this
    /// container exactly as it was. Otherwise assignment happens in place: the shared
    /// prefix is overwritten element-wise, then the extra source elements are
    /// clone-constructed (source longer) or the surplus is truncated (source shorter).
    /// A panic mid-prefix leaves a valid container with partially updated values; that
    /// trade-off buys the in-place path its performance.
    fn clone_from(&mut self, source: &Self) {
        if self.storage.capacity() < source.len {
            let mut copy = source.clone();
            self.swap_with(&mut copy);
            return;
        }

        // Overwrite the shared prefix; zip stops at the shorter side.
        for (dst, src) in self.as_mut_slice().iter_mut().zip(source.as_slice()) {
            dst.clone_from(src);
        }

        if source.len > self.len {
            for item in source.as_slice().iter().skip(self.len) {
                let value = item.clone();

                // SAFETY: Capacity suffices for source.len, verified at entry, and
                // len < source.len inside this loop.
                let slot = unsafe { self.storage.ptr_at(self.len) };

                // SAFETY: The slot is raw memory beyond the live range.
                unsafe {
                    slot.write(value);
                }

                // Advancing per element keeps the container valid if a clone panics.
                // Cannot overflow: bounded by source.len.
                self.len = self.len.wrapping_add(1);
            }
        } else {
            self.truncate(source.len);
        }
    }
}

impl<T> Deref for PlacementVec<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for PlacementVec<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for PlacementVec<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for PlacementVec<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug> fmt::Debug for PlacementVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: PartialEq> PartialEq for PlacementVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for PlacementVec<T> {}

impl<T> Extend<T> for PlacementVec<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();

        let (lower, _) = iter.size_hint();
        if lower > 0 {
            let required = self
                .len
                .checked_add(lower)
                .expect("capacity overflow: requested length exceeds usize::MAX");

            // Jump at least to the doubled capacity so that repeated small extends
            // stay amortized O(1) per element, like plain appends.
            if required > self.storage.capacity() {
                self.reserve(required.max(self.grown_capacity()));
            }
        }

        for item in iter {
            self.push(item);
        }
    }
}

impl<T> FromIterator<T> for PlacementVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut items = Self::new();
        items.extend(iter);
        items
    }
}

impl<T> IntoIterator for PlacementVec<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Converts into an owning iterator over the elements, front to back.
    fn into_iter(self) -> IntoIter<T> {
        // The iterator takes over both the block and responsibility for the live range,
        // so this container's drop must not run.
        let mut items = ManuallyDrop::new(self);
        let len = items.len;
        let storage = mem::replace(&mut items.storage, RawStorage::empty());

        IntoIter::new(storage, len)
    }
}

impl<'a, T> IntoIterator for &'a PlacementVec<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> slice::Iter<'a, T> {
        self.as_slice().iter()
    }
}

impl<'a, T> IntoIterator for &'a mut PlacementVec<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> slice::IterMut<'a, T> {
        self.as_mut_slice().iter_mut()
    }
}

#[cfg(test)]
#[allow(
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    reason = "test code doesn't need the same safety rigor as production code"
)]
mod tests {
    use std::cell::Cell;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::rc::Rc;

    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;

    assert_impl_all!(PlacementVec<u32>: Send, Sync);
    assert_not_impl_any!(PlacementVec<Rc<u32>>: Send, Sync);

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

    /// Test helper whose clone panics once armed, for exercising panic safety.
    #[derive(Debug, PartialEq)]
    struct FussyClone {
        value: u32,
        panic_on_clone: bool,
    }

    impl FussyClone {
        fn calm(value: u32) -> Self {
            Self {
                value,
                panic_on_clone: false,
            }
        }
    }

    impl Clone for FussyClone {
        fn clone(&self) -> Self {
            assert!(!self.panic_on_clone, "clone panicked as requested");
            Self {
                value: self.value,
                panic_on_clone: self.panic_on_clone,
            }
        }
    }

    #[test]
    fn smoke_test() {
        let mut items = PlacementVec::new();

        items.push(1);
        items.push(2);
        items.push(3);

        assert_eq!(items.len(), 3);
        assert_eq!(items.as_slice(), &[1, 2, 3]);
        assert_eq!(items[1], 2);
        assert_eq!(items.get(2), Some(&3));
        assert_eq!(items.get(3), None);
    }

    #[test]
    fn new_is_empty_without_allocation() {
        let items = PlacementVec::<String>::new();

        assert!(items.is_empty());
        assert_eq!(items.capacity(), 0);
    }

    #[test]
    fn append_follows_doubling_capacity_sequence() {
        let mut items = PlacementVec::new();
        let mut observed = Vec::new();

        for value in 1..=5 {
            items.push(value);
            observed.push(items.capacity());
        }

        assert_eq!(observed, vec![1, 2, 4, 4, 8]);
        assert_eq!(items.as_slice(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn with_len_default_constructs_every_slot() {
        let items = PlacementVec::<u64>::with_len(6);

        assert_eq!(items.len(), 6);
        assert_eq!(items.capacity(), 6);
        assert!(items.iter().all(|value| *value == 0));
    }

    #[test]
    fn with_len_zero_is_empty() {
        let items = PlacementVec::<u64>::with_len(0);

        assert!(items.is_empty());
        assert_eq!(items.capacity(), 0);
    }

    #[test]
    fn insert_at_end_behaves_like_push() {
        let mut pushed = PlacementVec::new();
        let mut inserted = PlacementVec::new();

        for value in 1..=4 {
            pushed.push(value);
            inserted.insert(inserted.len(), value);
        }

        assert_eq!(pushed, inserted);
        assert_eq!(pushed.capacity(), inserted.capacity());
    }

    #[test]
    fn insert_at_front_shifts_everything() {
        let mut items: PlacementVec<char> = ['a', 'b', 'c'].into_iter().collect();

        items.insert(0, 'x');

        assert_eq!(items.as_slice(), &['x', 'a', 'b', 'c']);
    }

    #[test]
    fn insert_in_middle_with_spare_capacity() {
        let mut items = PlacementVec::with_capacity(8);
        items.extend([1, 2, 3, 4, 5]);

        let base = items.as_slice().as_ptr();
        items.insert(2, 99);

        // Spare capacity existed, so the insert shifted in place.
        assert_eq!(items.as_slice().as_ptr(), base);
        assert_eq!(items.as_slice(), &[1, 2, 99, 3, 4, 5]);
    }

    #[test]
    fn insert_in_middle_when_full_relocates() {
        let mut items: PlacementVec<i32> = [1, 2, 3, 4].into_iter().collect();
        assert_eq!(items.capacity(), 4);

        items.insert(2, 99);

        assert_eq!(items.as_slice(), &[1, 2, 99, 3, 4]);
        assert_eq!(items.capacity(), 8);
    }

    #[test]
    fn insert_with_returns_the_new_element() {
        let mut items: PlacementVec<i32> = [1, 2, 3].into_iter().collect();

        let inserted = items.insert_with(1, || 42);
        *inserted += 1;

        assert_eq!(items.as_slice(), &[1, 43, 2, 3]);
    }

    #[test]
    fn push_with_constructs_in_place() {
        let mut items = PlacementVec::with_capacity(2);

        let first = items.push_with(|| "one".to_string());
        assert_eq!(first, "one");

        _ = items.push_with(|| "two".to_string());
        assert_eq!(items.as_slice(), &["one".to_string(), "two".to_string()]);
    }

    #[test]
    #[should_panic]
    fn insert_past_end_panics() {
        let mut items: PlacementVec<i32> = [1, 2].into_iter().collect();

        items.insert(3, 99);
    }

    #[test]
    fn remove_preserves_relative_order() {
        let mut items: PlacementVec<i32> = [10, 20, 30, 40].into_iter().collect();

        assert_eq!(items.remove(1), 20);
        assert_eq!(items.as_slice(), &[10, 30, 40]);

        assert_eq!(items.remove(2), 40);
        assert_eq!(items.as_slice(), &[10, 30]);
    }

    #[test]
    fn remove_only_element_leaves_empty() {
        let mut items: PlacementVec<i32> = [7].into_iter().collect();

        assert_eq!(items.remove(0), 7);
        assert!(items.is_empty());
    }

    #[test]
    fn remove_never_reallocates() {
        let mut items: PlacementVec<i32> = (0..8).collect();
        let capacity = items.capacity();
        let base = items.as_slice().as_ptr();

        _ = items.remove(3);

        assert_eq!(items.capacity(), capacity);
        assert_eq!(items.as_slice().as_ptr(), base);
    }

    #[test]
    #[should_panic]
    fn remove_at_end_panics() {
        let mut items: PlacementVec<i32> = [1, 2].into_iter().collect();

        _ = items.remove(2);
    }

    #[test]
    fn pop_returns_last_and_none_on_empty() {
        let mut items: PlacementVec<i32> = [1, 2].into_iter().collect();

        assert_eq!(items.pop(), Some(2));
        assert_eq!(items.pop(), Some(1));
        assert_eq!(items.pop(), None);
        assert_eq!(items.pop(), None);
    }

    #[test]
    fn reserve_within_capacity_is_a_no_op() {
        let mut items = PlacementVec::with_capacity(8);
        items.extend([1, 2, 3]);

        let base = items.as_slice().as_ptr();

        items.reserve(4);
        items.reserve(8);

        assert_eq!(items.capacity(), 8);
        assert_eq!(items.len(), 3);
        assert_eq!(items.as_slice(), &[1, 2, 3]);
        // Element addresses are unchanged when no relocation happens.
        assert_eq!(items.as_slice().as_ptr(), base);
    }

    #[test]
    fn reserve_allocates_exactly_what_was_asked() {
        let mut items = PlacementVec::<u32>::new();

        items.reserve(13);

        assert_eq!(items.capacity(), 13);
    }

    #[test]
    fn reserve_preserves_elements() {
        let mut items: PlacementVec<String> = ["a", "b", "c"]
            .into_iter()
            .map(str::to_string)
            .collect();

        items.reserve(100);

        assert_eq!(
            items.as_slice(),
            &["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn truncate_drops_exactly_the_tail() {
        let drops = Rc::new(Cell::new(0));
        let mut items = PlacementVec::new();

        for value in 0..5 {
            items.push(DropCounted::new(value, &drops));
        }

        items.truncate(2);

        assert_eq!(drops.get(), 3);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].value, 0);
        assert_eq!(items[1].value, 1);
    }

    #[test]
    fn resize_shrinking_preserves_the_prefix() {
        let mut items: PlacementVec<u32> = [1, 2, 3, 4, 5].into_iter().collect();
        let capacity = items.capacity();

        items.resize(2);

        assert_eq!(items.as_slice(), &[1, 2]);
        // Shrinking never reallocates.
        assert_eq!(items.capacity(), capacity);
    }

    #[test]
    fn resize_growing_default_constructs_the_tail() {
        let mut items: PlacementVec<u32> = [5, 6].into_iter().collect();

        items.resize(5);

        assert_eq!(items.as_slice(), &[5, 6, 0, 0, 0]);
    }

    #[test]
    fn resize_to_same_length_is_a_no_op() {
        let mut items: PlacementVec<u32> = [1, 2, 3].into_iter().collect();
        let capacity = items.capacity();

        items.resize(3);

        assert_eq!(items.as_slice(), &[1, 2, 3]);
        assert_eq!(items.capacity(), capacity);
    }

    #[test]
    fn clear_drops_everything_and_keeps_capacity() {
        let drops = Rc::new(Cell::new(0));
        let mut items = PlacementVec::new();

        for value in 0..4 {
            items.push(DropCounted::new(value, &drops));
        }

        let capacity = items.capacity();
        items.clear();

        assert_eq!(drops.get(), 4);
        assert!(items.is_empty());
        assert_eq!(items.capacity(), capacity);
    }

    #[test]
    fn drop_releases_every_live_element_once() {
        let drops = Rc::new(Cell::new(0));

        {
            let mut items = PlacementVec::new();
            for value in 0..7 {
                items.push(DropCounted::new(value, &drops));
            }
        }

        assert_eq!(drops.get(), 7);
    }

    #[test]
    fn remove_does_not_double_drop() {
        let drops = Rc::new(Cell::new(0));
        let mut items = PlacementVec::new();

        for value in 0..3 {
            items.push(DropCounted::new(value, &drops));
        }

        let removed = items.remove(1);
        assert_eq!(removed.value, 1);
        assert_eq!(drops.get(), 0);

        drop(removed);
        assert_eq!(drops.get(), 1);

        drop(items);
        assert_eq!(drops.get(), 3);
    }

    #[test]
    fn clone_is_independent_of_the_original() {
        let mut original: PlacementVec<i32> = [1, 2, 3].into_iter().collect();
        let mut copy = original.clone();

        copy.push(4);
        original[0] = 100;

        assert_eq!(original.as_slice(), &[100, 2, 3]);
        assert_eq!(copy.as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn clone_capacity_is_exact() {
        let mut original = PlacementVec::with_capacity(32);
        original.extend([1, 2, 3]);

        let copy = original.clone();

        assert_eq!(copy.capacity(), 3);
    }

    #[test]
    fn clone_from_reuses_capacity_when_source_fits() {
        let mut target = PlacementVec::with_capacity(8);
        target.extend([1, 2, 3, 4, 5]);

        let base = target.as_slice().as_ptr();
        let source: PlacementVec<i32> = [9, 8].into_iter().collect();

        target.clone_from(&source);

        assert_eq!(target.as_slice(), &[9, 8]);
        assert_eq!(target.capacity(), 8);
        assert_eq!(target.as_slice().as_ptr(), base);
    }

    #[test]
    fn clone_from_grows_the_shorter_target() {
        let mut target: PlacementVec<i32> = [1].into_iter().collect();
        let source: PlacementVec<i32> = [7, 8, 9].into_iter().collect();

        target.clone_from(&source);

        assert_eq!(target.as_slice(), &[7, 8, 9]);
    }

    #[test]
    fn clone_from_extends_within_existing_capacity() {
        let mut target = PlacementVec::with_capacity(4);
        target.extend([1, 2]);

        let source: PlacementVec<i32> = [5, 6, 7, 8].into_iter().collect();
        target.clone_from(&source);

        assert_eq!(target.as_slice(), &[5, 6, 7, 8]);
        assert_eq!(target.capacity(), 4);
    }

    #[test]
    fn clone_from_is_transactional_when_relocating() {
        // The source exceeds the target's capacity, forcing the side-buffer branch.
        // A panicking element clone must leave the target exactly as it was.
        let mut target: PlacementVec<FussyClone> = PlacementVec::new();
        target.push(FussyClone::calm(1));

        let mut source = PlacementVec::new();
        source.push(FussyClone::calm(10));
        source.push(FussyClone {
            value: 11,
            panic_on_clone: true,
        });
        source.push(FussyClone::calm(12));

        let result = catch_unwind(AssertUnwindSafe(|| {
            target.clone_from(&source);
        }));

        assert!(result.is_err());
        assert_eq!(target.len(), 1);
        assert_eq!(target[0], FussyClone::calm(1));
    }

    #[test]
    fn clone_unwinds_cleanly_when_an_element_clone_panics() {
        let mut source = PlacementVec::new();
        source.push(FussyClone::calm(1));
        source.push(FussyClone {
            value: 2,
            panic_on_clone: true,
        });

        let result = catch_unwind(AssertUnwindSafe(|| source.clone()));

        assert!(result.is_err());
        // The source must be fully intact afterwards.
        assert_eq!(source.len(), 2);
        assert_eq!(source[0].value, 1);
        assert_eq!(source[1].value, 2);
    }

    #[test]
    fn swap_with_exchanges_contents() {
        let mut a: PlacementVec<i32> = [1, 2].into_iter().collect();
        let mut b: PlacementVec<i32> = [9, 8, 7].into_iter().collect();

        a.swap_with(&mut b);

        assert_eq!(a.as_slice(), &[9, 8, 7]);
        assert_eq!(b.as_slice(), &[1, 2]);
    }

    #[test]
    fn take_via_default_leaves_source_empty() {
        let mut items: PlacementVec<i32> = [1, 2, 3].into_iter().collect();

        let taken = mem::take(&mut items);

        assert_eq!(taken.as_slice(), &[1, 2, 3]);
        assert!(items.is_empty());
        assert_eq!(items.capacity(), 0);
    }

    #[test]
    fn iteration_covers_the_live_range_in_order() {
        let items: PlacementVec<i32> = (0..5).collect();

        let collected: Vec<i32> = items.iter().copied().collect();
        assert_eq!(collected, vec![0, 1, 2, 3, 4]);

        // Iteration is restartable.
        let again: Vec<i32> = items.iter().copied().collect();
        assert_eq!(again, collected);
    }

    #[test]
    fn mutable_iteration_reaches_every_element() {
        let mut items: PlacementVec<i32> = (0..4).collect();

        for value in &mut items {
            *value *= 10;
        }

        assert_eq!(items.as_slice(), &[0, 10, 20, 30]);
    }

    #[test]
    fn slice_queries_work_through_deref() {
        let items: PlacementVec<i32> = [3, 1, 2].into_iter().collect();

        assert_eq!(items.first(), Some(&3));
        assert_eq!(items.last(), Some(&2));
        assert!(items.contains(&1));
    }

    #[test]
    fn debug_formats_like_a_list() {
        let items: PlacementVec<i32> = [1, 2, 3].into_iter().collect();

        assert_eq!(format!("{items:?}"), "[1, 2, 3]");
    }

    #[test]
    fn extend_appends_in_order() {
        let mut items: PlacementVec<i32> = [1].into_iter().collect();

        items.extend([2, 3, 4]);

        assert_eq!(items.as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn end_to_end_scenario() {
        let mut items = PlacementVec::new();
        let mut capacities = Vec::new();

        for value in [1, 2, 3, 4, 5] {
            items.push(value);
            capacities.push(items.capacity());
        }

        assert_eq!(items.len(), 5);
        assert_eq!(capacities, vec![1, 2, 4, 4, 8]);

        items.insert(2, 99);
        assert_eq!(items.as_slice(), &[1, 2, 99, 3, 4, 5]);

        assert_eq!(items.remove(0), 1);
        assert_eq!(items.as_slice(), &[2, 99, 3, 4, 5]);

        items.resize(2);
        assert_eq!(items.as_slice(), &[2, 99]);
    }

    #[test]
    #[should_panic]
    fn zero_sized_elements_are_rejected_on_allocation() {
        let mut items = PlacementVec::new();

        items.push(());
    }
}
