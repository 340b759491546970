//! Value Cells Example
//!
//! Demonstrates watchable cells and derived formulas.
//! Shows practical patterns including:
//! - Equality-gated writes and ordered watcher notification
//! - Deriving values with formula cells
//! - Deduplicated downstream notification
//! - Why reentrant writes are rejected
//! - Sharing a cell across threads

use headwater::{FormulaCell, ValueCell};

// ==================== Watching Changes ====================

/// Example 1: Equality-gated writes
///
/// Watchers fire once per real transition, never for equal writes.
fn example_watching() {
    println!("\n=== Example 1: Watching Changes ===");

    let phase = ValueCell::new("boot");
    phase.watch(|old, new| println!("  phase: {} -> {}", old, new));

    for next in ["boot", "ready", "ready", "serving"] {
        let changed = phase.set(next).unwrap();
        println!("set({:?}) changed = {}", next, changed);
    }
}

// ==================== Formula Cells ====================

/// Example 2: Deriving a smoothed reading
///
/// The formula recomputes on every upstream change; its own watchers only
/// hear about derived changes.
fn example_formula() {
    println!("\n=== Example 2: Formula Cells ===");

    let latency_ms = ValueCell::new(12u64);
    let smoothed = FormulaCell::new(&latency_ms, |old, new| (old + new) / 2);
    smoothed.watch(|old, new| println!("  smoothed: {} -> {}", old, new));

    for sample in [48, 30, 30, 60] {
        // The repeated 30 never reaches the formula at all.
        latency_ms.set(sample).unwrap();
    }

    println!("last sample: {}ms", latency_ms.get());
    println!("smoothed:    {}ms", smoothed.get());
}

// ==================== Reentrancy ====================

/// Example 3: Reentrant writes are rejected
///
/// A watcher that writes back into its own cell would deadlock on the
/// cell's lock; instead the nested write fails fast.
fn example_reentrancy() {
    println!("\n=== Example 3: Reentrancy ===");

    let counter = ValueCell::new(0);
    let inner = counter.clone();
    counter.watch(move |_, new| {
        // Trying to "fix up" the value from inside the notification.
        match inner.set(new + 1) {
            Ok(_) => println!("  nested write landed (unexpected)"),
            Err(e) => println!("  nested write rejected: {}", e),
        }
    });

    counter.set(10).unwrap();
    println!("value stays at the outer write: {}", counter.get());
}

// ==================== Threads ====================

/// Example 4: One cell, many threads
///
/// Clones are handles onto the same state; writers on other threads block
/// during a fan-out instead of being rejected.
fn example_threads() {
    println!("\n=== Example 4: Cells Across Threads ===");

    let progress = ValueCell::new(0u32);
    progress.watch(|_, new| {
        if new % 50 == 0 {
            println!("  progress: {}%", new / 2);
        }
    });

    std::thread::scope(|scope| {
        for worker in 0..2 {
            let progress = progress.clone();
            scope.spawn(move || {
                for step in 0..100u32 {
                    let _ = progress.set(worker * 100 + step);
                }
            });
        }
    });

    println!("final value: {}", progress.get());
}

fn main() {
    println!("======================================");
    println!("        Value Cells Example           ");
    println!("======================================");

    example_watching();
    example_formula();
    example_reentrancy();
    example_threads();

    println!("\n======================================");
    println!("           Examples Complete          ");
    println!("======================================");
}
