//! A contiguous growable array with an explicit raw-storage layer.
//!
//! This crate provides [`PlacementVec`], a dynamic array that manages its backing memory
//! by hand: a raw storage block that holds bytes, not objects, and a live-element count
//! that says which slots currently contain constructed values. Elements are built directly
//! in their target slots (placement construction) and moved between blocks bitwise, with
//! the construct/destroy discipline tracked independently of the block's own lifetime.
//!
//! # Key features
//!
//! - **Amortized O(1) append**: capacity doubles when exhausted, starting from 1
//! - **Random access**: indexed access and the full slice API via deref to `[T]`
//! - **Positional insert and remove**: with a fast in-place path when spare capacity exists
//! - **Exact reserve**: [`PlacementVec::reserve()`] allocates precisely the requested capacity
//! - **In-place construction**: [`PlacementVec::push_with()`] and
//!   [`PlacementVec::insert_with()`] build the element in its final slot
//! - **Well-defined failure states**: side-buffer operations leave the container untouched
//!   when element code panics; in-place operations never leak or double-drop
//!
//! # Examples
//!
//! ```rust
//! use placement_vec::PlacementVec;
//!
//! let mut items = PlacementVec::new();
//!
//! // Appending grows the block by doubling.
//! for value in [1, 2, 3, 4, 5] {
//!     items.push(value);
//! }
//! assert_eq!(items.capacity(), 8);
//!
//! // Positional insert and remove shift neighbors, preserving order.
//! items.insert(2, 99);
//! assert_eq!(items.as_slice(), &[1, 2, 99, 3, 4, 5]);
//!
//! assert_eq!(items.remove(0), 1);
//! assert_eq!(items.as_slice(), &[2, 99, 3, 4, 5]);
//!
//! // The whole slice API is available through deref.
//! assert_eq!(items.iter().sum::<i32>(), 113);
//! ```
//!
//! In-place construction at an arbitrary position:
//!
//! ```rust
//! use placement_vec::PlacementVec;
//!
//! let mut words: PlacementVec<String> = ["alpha", "gamma"]
//!     .into_iter()
//!     .map(str::to_string)
//!     .collect();
//!
//! let inserted = words.insert_with(1, || "beta".to_string());
//! assert_eq!(inserted, "beta");
//! assert_eq!(words.len(), 3);
//! ```
//!
//! # Limitations
//!
//! Zero-sized element types are not supported; operations that allocate for one panic.
//! The container is single-owner with no internal synchronization (`Send`/`Sync` follow
//! from `T`).

mod into_iter;
mod placement_vec;
mod raw_storage;

pub use into_iter::IntoIter;
pub use placement_vec::PlacementVec;
pub(crate) use raw_storage::RawStorage;
