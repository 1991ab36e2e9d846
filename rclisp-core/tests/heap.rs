use pretty_assertions::assert_eq;

use rclisp_core::{Heap, LispError, Object};

#[test]
fn objects_start_unowned() {
    let mut heap = Heap::new();

    let number = heap.number(42);

    assert_eq!(heap.refcount(number), Some(0));
    assert_eq!(heap.len(), 1);
    assert_eq!(heap.get(number), &Object::Number(42));
}

#[test]
fn grab_release_balance() {
    let mut heap = Heap::new();

    let string = heap.string("hello");
    heap.grab(Some(string));
    heap.grab(Some(string));
    assert_eq!(heap.refcount(string), Some(2));

    heap.grab(Some(string));
    heap.release(Some(string));
    assert_eq!(heap.refcount(string), Some(2));
    assert!(heap.is_alive(string));

    heap.release(Some(string));
    assert!(heap.is_alive(string), "another owner still holds the string");

    heap.release(Some(string));
    assert!(!heap.is_alive(string));
    assert!(heap.is_empty());
}

#[test]
fn nil_is_ignored() {
    let mut heap = Heap::new();

    assert_eq!(heap.grab(None), None);
    heap.release(None);
    assert!(heap.is_empty());
}

#[test]
fn symbols_are_interned() {
    let mut heap = Heap::new();

    let first = heap.symbol("FOO");
    heap.grab(Some(first));
    let second = heap.symbol("FOO");
    let third = heap.create(Object::Symbol(String::from("FOO")));
    let other = heap.symbol("BAR");

    assert_eq!(first, second);
    assert_eq!(first, third);
    assert_ne!(first, other);
    assert_eq!(heap.refcount(first), Some(1), "interning must not grab");
    assert_eq!(heap.symbol_count(), 2);
}

#[test]
fn released_symbols_leave_the_intern_table() {
    let mut heap = Heap::new();

    let symbol = heap.symbol("TEMPORARY");
    heap.grab(Some(symbol));
    assert_eq!(heap.lookup_symbol("TEMPORARY"), Some(symbol));

    heap.release(Some(symbol));
    assert_eq!(heap.lookup_symbol("TEMPORARY"), None);

    let fresh = heap.symbol("TEMPORARY");
    assert_ne!(fresh, symbol, "handles are never reused");
}

#[test]
fn cons_cells_own_their_children() {
    let mut heap = Heap::new();

    let one = heap.number(1);
    let two = heap.number(2);
    heap.grab(Some(two));
    let list = heap.list(&[Some(one), Some(two)]);
    heap.grab(list);

    assert_eq!(heap.refcount(one), Some(1));
    assert_eq!(heap.refcount(two), Some(2));
    assert_eq!(heap.length(list), 2);
    assert_eq!(heap.to_vec(list), vec![Some(one), Some(two)]);

    heap.release(list);

    assert!(!heap.is_alive(one));
    assert!(heap.is_alive(two), "the number is still held outside the list");
    assert_eq!(heap.refcount(two), Some(1));
    assert_eq!(heap.len(), 1);
}

#[test]
fn releasing_a_long_list_does_not_recurse() {
    let mut heap = Heap::new();

    let numbers: Vec<_> = (0..200_000).map(|n| Some(heap.number(n))).collect();
    let list = heap.list(&numbers);
    heap.grab(list);
    assert_eq!(heap.len(), 400_000);

    heap.release(list);
    assert!(heap.is_empty());
}

#[test]
fn registry_removal_swaps_with_last() {
    let mut heap = Heap::new();

    let a = heap.number(1);
    let b = heap.number(2);
    let c = heap.number(3);
    heap.grab(Some(b));
    heap.grab(Some(c));

    heap.release(Some(a));

    let order: Vec<_> = heap.objects().map(|(handle, _, _)| handle).collect();
    assert_eq!(order, vec![c, b]);
}

#[test]
fn slots_can_be_replaced() {
    let mut heap = Heap::new();

    let old = heap.number(1);
    let new = heap.number(2);
    let cell = heap.cons(Some(old), None);
    heap.grab(Some(cell));

    heap.set_head(cell, Some(new)).unwrap();
    assert!(!heap.is_alive(old));
    assert_eq!(heap.head(Some(cell)), Some(new));

    heap.set_tail(cell, Some(new)).unwrap();
    assert_eq!(heap.refcount(new), Some(2));

    let number = heap.number(3);
    assert_eq!(
        heap.set_head(number, None),
        Err(LispError::TypeMismatch("Argument is not a CONS type."))
    );
}

#[test]
fn accessors_on_non_cons_values() {
    let mut heap = Heap::new();

    let number = heap.number(7);

    assert_eq!(heap.head(Some(number)), None);
    assert_eq!(heap.tail(None), None);
    assert_eq!(heap.length(Some(number)), 0);
    assert_eq!(heap.as_number(Some(number)), Some(7));
    assert_eq!(heap.symbol_name(Some(number)), None);
}

#[test]
fn clean_reclaims_cycles() {
    let mut heap = Heap::new();

    let a = heap.cons(None, None);
    let b = heap.cons(Some(a), None);
    heap.set_tail(a, Some(b)).unwrap();
    heap.grab(Some(a));
    heap.release(Some(a));

    assert_eq!(heap.len(), 2, "cycles are never collected by reference counting");

    heap.symbol("SYMBOL");
    assert_eq!(heap.clean(), 3);
    assert!(heap.is_empty());
    assert_eq!(heap.symbol_count(), 0);
}

#[test]
fn stats_track_allocations() {
    let mut heap = Heap::new();

    let a = heap.number(1);
    let b = heap.number(2);
    heap.release(Some(a));
    heap.release(Some(b));

    let stats = heap.stats();
    assert_eq!(stats.allocated, 2);
    assert_eq!(stats.freed, 2);
    assert_eq!(stats.peak, 2);
}
