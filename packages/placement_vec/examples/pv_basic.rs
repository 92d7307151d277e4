//! Basic usage example for `PlacementVec`.
//!
//! This example walks through appending, positional insertion and removal, and
//! iteration over the live range.

use placement_vec::PlacementVec;

fn main() {
    let mut items = PlacementVec::new();

    println!(
        "Created PlacementVec with capacity: {}",
        items.capacity()
    );

    for value in [1, 2, 3, 4, 5] {
        items.push(value);
        println!(
            "Pushed {value}; len is now {}, capacity {}",
            items.len(),
            items.capacity()
        );
    }

    // Insert in the middle; neighbors shift toward the end.
    items.insert(2, 99);
    println!("After insert(2, 99): {items:?}");

    // Remove from the front; neighbors shift toward the beginning.
    let removed = items.remove(0);
    println!("Removed {removed}; remaining: {items:?}");

    // The full slice API is available through deref.
    let total: i32 = items.iter().sum();
    println!("Sum of elements: {total}");

    // Consume the container, taking ownership of every element.
    let doubled: Vec<i32> = items.into_iter().map(|value| value * 2).collect();
    println!("Doubled into a Vec: {doubled:?}");
}
