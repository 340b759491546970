//! Behavior tests for value and formula cells.

use super::*;
use parking_lot::Mutex;
use std::sync::Arc;

#[test]
fn equal_writes_are_reported_no_ops() {
    let cell = ValueCell::new(5);

    let fires = Arc::new(Mutex::new(0));
    let count = Arc::clone(&fires);
    cell.watch(move |_, _| *count.lock() += 1);

    assert_eq!(cell.set(5), Ok(false));
    assert_eq!(cell.get(), 5);
    assert_eq!(*fires.lock(), 0);
}

#[test]
fn watchers_run_in_registration_order() {
    let cell = ValueCell::new(0);
    let order = Arc::new(Mutex::new(Vec::new()));

    for tag in ["first", "second", "third"] {
        let order = Arc::clone(&order);
        cell.watch(move |_, _| order.lock().push(tag));
    }

    assert_eq!(cell.set(1), Ok(true));
    assert_eq!(order.lock().as_slice(), ["first", "second", "third"]);
}

#[test]
fn watchers_receive_old_and_new_values() {
    let cell = ValueCell::new(String::from("a"));
    let transitions = Arc::new(Mutex::new(Vec::new()));

    let log = Arc::clone(&transitions);
    cell.watch(move |old, new| log.lock().push((old.clone(), new.clone())));

    cell.set(String::from("b")).unwrap();
    cell.set(String::from("c")).unwrap();

    assert_eq!(
        transitions.lock().as_slice(),
        [
            (String::from("a"), String::from("b")),
            (String::from("b"), String::from("c")),
        ]
    );
}

#[test]
fn set_reports_whether_anything_changed() {
    let cell = ValueCell::new(1);

    assert_eq!(cell.set(2), Ok(true));
    assert_eq!(cell.set(2), Ok(false));
    assert_eq!(cell.set(3), Ok(true));
}

#[test]
fn nested_set_from_a_watcher_is_rejected() {
    let cell = ValueCell::new(0);
    let outcomes = Arc::new(Mutex::new(Vec::new()));
    let fanout = Arc::new(Mutex::new(Vec::new()));

    let inner = cell.clone();
    let log = Arc::clone(&outcomes);
    cell.watch(move |_, _| log.lock().push(inner.set(99)));
    let reached = Arc::clone(&fanout);
    cell.watch(move |old, new| reached.lock().push((*old, *new)));

    assert_eq!(cell.set(1), Ok(true));
    assert_eq!(cell.get(), 1);
    assert_eq!(outcomes.lock().as_slice(), [Err(ReentrantSet)]);
    // The rejected write does not disturb the rest of the fan-out.
    assert_eq!(fanout.lock().as_slice(), [(0, 1)]);
}

#[test]
fn rejection_clears_once_the_fanout_finishes() {
    let cell = ValueCell::new(0);

    let inner = cell.clone();
    cell.watch(move |_, new| {
        if *new == 1 {
            assert_eq!(inner.set(50), Err(ReentrantSet));
        }
    });

    cell.set(1).unwrap();
    // Outside any fan-out the same thread may write again.
    assert_eq!(cell.set(2), Ok(true));
    assert_eq!(cell.get(), 2);
}

#[test]
fn cross_thread_writers_block_and_are_never_rejected() {
    let cell = ValueCell::new(0u32);

    let transitions = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&transitions);
    cell.watch(move |old, new| log.lock().push((*old, *new)));

    std::thread::scope(|scope| {
        for range in [1..=100u32, 101..=200] {
            let cell = cell.clone();
            scope.spawn(move || {
                for v in range {
                    cell.set(v).unwrap();
                }
            });
        }
    });

    // Every write changed the value (the two ranges are disjoint and fresh),
    // each fan-out ran under the lock, and the observed transitions form one
    // unbroken chain: writes serialized, none rejected.
    let transitions = transitions.lock();
    assert_eq!(transitions.len(), 200);
    for pair in transitions.windows(2) {
        assert_eq!(pair[0].1, pair[1].0);
    }
}

#[test]
fn watcher_panic_propagates_and_leaves_the_cell_usable() {
    let cell = ValueCell::new(0);
    cell.watch(|_, new| {
        if *new == 13 {
            panic!("unlucky number");
        }
    });

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| cell.set(13)));
    assert!(outcome.is_err());

    // The write landed before the fan-out and the lock was released on
    // unwind.
    assert_eq!(cell.get(), 13);
    assert_eq!(cell.set(14), Ok(true));
}

#[test]
fn formula_seeds_by_combining_the_initial_value_with_itself() {
    let source = ValueCell::new(3);
    let sum = FormulaCell::new(&source, |old, new| old + new);

    assert_eq!(sum.get(), 6);
}

#[test]
fn formula_recomputes_on_every_upstream_change() {
    let source = ValueCell::new(2);
    let doubled = FormulaCell::new(&source, |_, new| new * 2);
    assert_eq!(doubled.get(), 4);

    source.set(5).unwrap();
    assert_eq!(doubled.get(), 10);

    source.set(7).unwrap();
    assert_eq!(doubled.get(), 14);
}

#[test]
fn formula_dedup_suppresses_equal_recomputations() {
    let source = ValueCell::new(10);
    let capped = FormulaCell::new(&source, |_, new| (*new).min(50));

    let fires = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&fires);
    capped.watch(move |old, new| log.lock().push((*old, *new)));

    source.set(60).unwrap(); // derived 10 -> 50
    source.set(70).unwrap(); // derived stays 50
    source.set(80).unwrap(); // derived stays 50
    source.set(20).unwrap(); // derived 50 -> 20

    assert_eq!(capped.get(), 20);
    assert_eq!(fires.lock().as_slice(), [(10, 50), (50, 20)]);
}

#[test]
fn formula_watcher_writing_upstream_is_rejected_not_deadlocked() {
    let source = ValueCell::new(1);
    let doubled = FormulaCell::new(&source, |_, new| new * 2);

    let back = source.clone();
    doubled.watch(move |_, _| {
        assert_eq!(back.set(1000), Err(ReentrantSet));
    });

    assert_eq!(source.set(2), Ok(true));
    assert_eq!(source.get(), 2);
    assert_eq!(doubled.get(), 4);
}

#[test]
fn formulas_chain_through_derive() {
    let source: ValueCell<i32> = ValueCell::new(10);
    let delta = FormulaCell::new(&source, |old, new| new - old);
    let magnitude = delta.derive(|_, new| new.abs());

    source.set(4).unwrap(); // delta -6, magnitude 6
    source.set(9).unwrap(); // delta 5, magnitude 5

    assert_eq!(delta.get(), 5);
    assert_eq!(magnitude.get(), 5);
}

#[test]
fn combine_receives_the_seed_pair_then_upstream_transitions() {
    let source = ValueCell::new(1);
    let pairs = Arc::new(Mutex::new(Vec::new()));

    let seen = Arc::clone(&pairs);
    let _tracked = FormulaCell::new(&source, move |old, new| {
        seen.lock().push((*old, *new));
        *new
    });

    source.set(5).unwrap();
    source.set(8).unwrap();

    assert_eq!(pairs.lock().as_slice(), [(1, 1), (1, 5), (5, 8)]);
}

#[test]
fn formula_keeps_tracking_after_its_handle_is_cloned() {
    let source = ValueCell::new(1);
    let tracker = FormulaCell::new(&source, |_, new| *new);
    let clone = tracker.clone();

    source.set(8).unwrap();

    assert_eq!(tracker.get(), 8);
    assert_eq!(clone.get(), 8);
}
