use std::alloc::{Layout, alloc, dealloc};
use std::mem;
use std::ptr::NonNull;

/// The backing storage of a [`PlacementVec`][crate::PlacementVec]: a heap block sized for
/// `capacity` elements of `T`, with no knowledge of which slots hold live values.
///
/// This layer deals strictly in raw bytes. It never constructs or drops a `T` - element
/// lifetimes are the exclusive responsibility of the caller, which must have dropped every
/// value it constructed inside the block before the storage itself is dropped. The storage
/// cannot verify this contract; violating it is a bug in the caller, not a reportable error.
///
/// Ownership of the block is unique: the type is not `Clone` and transfers only by move.
#[derive(Debug)]
pub(crate) struct RawStorage<T> {
    /// Start of the allocated block, or a dangling (but well-aligned) pointer
    /// when `capacity` is zero and no allocation exists.
    ptr: NonNull<T>,

    /// Number of element slots the block can hold.
    capacity: usize,
}

impl<T> RawStorage<T> {
    /// Creates storage with no allocation and zero capacity.
    #[must_use]
    pub(crate) const fn empty() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
        }
    }

    /// Allocates a block sized for exactly `capacity` elements. No element is constructed -
    /// every slot starts as raw bytes.
    ///
    /// Requesting zero capacity yields the empty state without touching the allocator.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized (this container does not support zero-sized element
    /// types) or if allocation fails.
    #[must_use]
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        assert!(
            size_of::<T>() > 0,
            "RawStorage cannot allocate for zero-sized element types"
        );

        if capacity == 0 {
            return Self::empty();
        }

        let layout = Self::layout(capacity);

        // SAFETY: The layout has nonzero size because both the element size and the
        // capacity are nonzero, guarded above.
        let ptr = NonNull::new(unsafe { alloc(layout).cast::<T>() }).expect(
            "we do not intend to handle allocation failure as a real possibility - OOM results in panic",
        );

        Self { ptr, capacity }
    }

    #[must_use]
    fn layout(capacity: usize) -> Layout {
        Layout::array::<T>(capacity).expect("simple flat array layout must be calculable")
    }

    /// Number of element slots the block can hold.
    #[must_use]
    #[cfg_attr(test, mutants::skip)] // Can be mutated to infinitely growing memory use.
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Start of the block. Dangling (but well-aligned) when capacity is zero.
    #[must_use]
    pub(crate) fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Pointer to the slot at `offset`. The one-past-end address (`offset == capacity`)
    /// is a valid result; it may be used for range arithmetic but not dereferenced.
    ///
    /// # Safety
    ///
    /// The caller must ensure `offset <= capacity`. Checked by a debug assertion only;
    /// callers have already established the bound via the live-range invariant.
    #[must_use]
    pub(crate) unsafe fn ptr_at(&self, offset: usize) -> *mut T {
        debug_assert!(
            offset <= self.capacity,
            "offset {offset} out of bounds for storage of capacity {}",
            self.capacity
        );

        // SAFETY: The caller guarantees offset <= capacity, which keeps the result
        // within the allocation (the one-past-end address is explicitly allowed).
        unsafe { self.ptr.as_ptr().add(offset) }
    }

    /// Exchanges the block and capacity with `other`. No element effects, cannot fail.
    pub(crate) fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }
}

impl<T> Drop for RawStorage<T> {
    fn drop(&mut self) {
        if self.capacity == 0 {
            return;
        }

        // SAFETY: The block was allocated in with_capacity() with this same layout and
        // has not been deallocated. Any elements constructed inside it were already
        // dropped by the caller per the type's contract, so releasing the bytes is all
        // that remains.
        unsafe {
            dealloc(self.ptr.as_ptr().cast(), Self::layout(self.capacity));
        }
    }
}

// SAFETY: The storage owns its block exclusively and holds no thread-affine state; the
// raw pointer is merely the address of the owned allocation. Sending the storage to
// another thread sends the (raw, caller-managed) contents with it, which is sound
// exactly when T itself may be sent.
unsafe impl<T: Send> Send for RawStorage<T> {}

// SAFETY: The storage exposes no interior mutability; shared references only permit
// reading the pointer and capacity. Element access through shared references is gated
// by T: Sync at the owning container's level.
unsafe impl<T: Sync> Sync for RawStorage<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_no_capacity() {
        let storage = RawStorage::<u64>::empty();

        assert_eq!(storage.capacity(), 0);
    }

    #[test]
    fn zero_capacity_does_not_allocate() {
        let storage = RawStorage::<u64>::with_capacity(0);

        assert_eq!(storage.capacity(), 0);
        // The empty state uses a dangling pointer, which is aligned but never null.
        assert!(!storage.as_ptr().is_null());
    }

    #[test]
    fn with_capacity_reports_exact_capacity() {
        let storage = RawStorage::<u64>::with_capacity(7);

        assert_eq!(storage.capacity(), 7);
    }

    #[test]
    fn slots_hold_written_values() {
        let storage = RawStorage::<u32>::with_capacity(3);

        for index in 0..3 {
            // SAFETY: index < capacity, so the slot is within the allocation.
            let slot = unsafe { storage.ptr_at(index) };

            // SAFETY: The slot is raw memory we own; writing initializes it.
            unsafe {
                slot.write(u32::try_from(index).unwrap() + 10);
            }
        }

        for index in 0..3 {
            // SAFETY: index < capacity and the slot was initialized above.
            let value = unsafe { storage.ptr_at(index).read() };

            assert_eq!(value, u32::try_from(index).unwrap() + 10);
        }

        // u32 needs no drop, so handing the block back without further work is fine.
    }

    #[test]
    fn one_past_end_pointer_is_allowed() {
        let storage = RawStorage::<u32>::with_capacity(4);

        // SAFETY: offset == capacity is the documented one-past-end case.
        let past_end = unsafe { storage.ptr_at(4) };

        // SAFETY: Both pointers derive from the same allocation.
        let distance = unsafe { past_end.offset_from(storage.as_ptr()) };

        assert_eq!(distance, 4);
    }

    #[test]
    fn swap_exchanges_blocks() {
        let mut a = RawStorage::<u32>::with_capacity(2);
        let mut b = RawStorage::<u32>::empty();

        let a_ptr = a.as_ptr();

        a.swap(&mut b);

        assert_eq!(a.capacity(), 0);
        assert_eq!(b.capacity(), 2);
        assert_eq!(b.as_ptr(), a_ptr);
    }

    #[test]
    #[should_panic]
    fn zero_sized_types_are_rejected() {
        drop(RawStorage::<()>::with_capacity(3));
    }
}
