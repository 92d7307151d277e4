//! Capacity management example for `PlacementVec`.
//!
//! Demonstrates the doubling growth policy, exact reserve, and how resize
//! interacts with capacity.

use placement_vec::PlacementVec;

fn main() {
    let mut items = PlacementVec::new();

    println!("Appending ten elements to a fresh container:");

    for value in 0..10 {
        items.push(value);
        println!(
            "  len {:2} -> capacity {:2}",
            items.len(),
            items.capacity()
        );
    }

    // Reserve allocates exactly what was asked for, once.
    items.reserve(64);
    println!("After reserve(64): capacity {}", items.capacity());

    // Reserving less than the current capacity does nothing.
    items.reserve(32);
    println!("After reserve(32): capacity {}", items.capacity());

    // Shrinking drops the tail in place without reallocating.
    items.resize(3);
    println!(
        "After resize(3): {items:?} (capacity still {})",
        items.capacity()
    );

    // Growing default-constructs the new tail slots.
    items.resize(6);
    println!("After resize(6): {items:?}");
}
