use std::collections::HashMap;

use indexmap::IndexMap;

use crate::error::LispError;
use crate::object::{Closure, Cons, ObjRef, Object, PrimitiveId, Value};

/// The initial capacity of the object registry.
pub const HEAP_SIZE: usize = 2 << 10;

/// Allocation counters for a heap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeapStats {
    /// Number of objects ever allocated.
    pub allocated: usize,
    /// Number of objects freed so far.
    pub freed: usize,
    /// Highest number of simultaneously live objects.
    pub peak: usize,
}

/// An object, as it is stored within the heap.
#[derive(Debug)]
struct HeapCell {
    refs: u32,
    object: Object,
}

/// The object store itself, which is the storage for all Lisp objects.
///
/// Every object is tracked in a registry until its reference count drops back to zero.
/// Symbols are interned: creating a symbol whose name is already known yields the existing object.
#[derive(Debug)]
pub struct Heap {
    objects: IndexMap<ObjRef, HeapCell>,
    symbols: HashMap<String, ObjRef>,
    next_id: u64,
    stats: HeapStats,
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heap {
    /// Creates a new empty heap.
    pub fn new() -> Self {
        Self::with_capacity(HEAP_SIZE)
    }

    /// Creates a new empty heap, with room for `capacity` objects before growing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            objects: IndexMap::with_capacity(capacity),
            symbols: HashMap::new(),
            next_id: 1,
            stats: HeapStats::default(),
        }
    }

    /// Returns a reference to the heap's allocation counters.
    pub fn stats(&self) -> &HeapStats {
        &self.stats
    }

    /// Returns the number of live objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns whether the heap holds no objects at all.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Returns the number of symbols in the intern table.
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// Allocates an object on the heap, returning its handle.
    ///
    /// The new object starts with a reference count of zero, and holds one reference to each of its children.
    /// Symbols are interned: if a symbol with the same name already exists, it is returned as-is.
    pub fn create(&mut self, object: Object) -> ObjRef {
        if let Object::Symbol(name) = &object {
            if let Some(&symbol) = self.symbols.get(name.as_str()) {
                return symbol;
            }
        }

        for child in object.children() {
            self.grab(Some(child));
        }

        let handle = ObjRef(self.next_id);
        self.next_id += 1;

        if let Object::Symbol(name) = &object {
            self.symbols.insert(name.clone(), handle);
        }

        tracing::trace!(object = %handle, kind = object.kind(), "allocate");
        self.objects.insert(handle, HeapCell { refs: 0, object });
        self.stats.allocated += 1;
        self.stats.peak = self.stats.peak.max(self.objects.len());

        handle
    }

    /// Allocates an integer.
    pub fn number(&mut self, value: i64) -> ObjRef {
        self.create(Object::Number(value))
    }

    /// Allocates a string.
    pub fn string(&mut self, value: impl Into<String>) -> ObjRef {
        self.create(Object::String(value.into()))
    }

    /// Interns a symbol.
    pub fn symbol(&mut self, name: impl AsRef<str>) -> ObjRef {
        let name = name.as_ref();
        match self.symbols.get(name) {
            Some(&symbol) => symbol,
            None => self.create(Object::Symbol(name.to_string())),
        }
    }

    /// Allocates an error value.
    pub fn error(&mut self, error: LispError) -> ObjRef {
        self.create(Object::Error(error))
    }

    /// Allocates a cons cell.
    pub fn cons(&mut self, head: Value, tail: Value) -> ObjRef {
        self.create(Object::Cons(Cons { head, tail }))
    }

    /// Allocates a closure.
    pub fn closure(&mut self, params: Value, body: Value, env: Value) -> ObjRef {
        self.create(Object::Closure(Closure { params, body, env }))
    }

    /// Allocates a primitive procedure handle.
    pub fn primitive(&mut self, id: PrimitiveId) -> ObjRef {
        self.create(Object::Primitive(id))
    }

    /// Builds a proper list out of the given values.
    pub fn list(&mut self, values: &[Value]) -> Value {
        values
            .iter()
            .rev()
            .fold(None, |tail, &head| Some(self.cons(head, tail)))
    }

    /// Increments the reference count of a value (does nothing for `NIL`).
    pub fn grab(&mut self, value: Value) -> Value {
        if let Some(object) = value {
            self.cell_mut(object).refs += 1;
        }
        value
    }

    /// Decrements the reference count of a value (does nothing for `NIL`).
    ///
    /// Objects whose count drops to zero are freed, and release their children in turn.
    pub fn release(&mut self, value: Value) {
        let mut pending: Vec<ObjRef> = value.into_iter().collect();
        while let Some(object) = pending.pop() {
            let cell = self.cell_mut(object);
            cell.refs = cell.refs.saturating_sub(1);
            if cell.refs == 0 {
                let freed = self.free(object);
                pending.extend(freed.children());
            }
        }
    }

    /// Deregisters an object (swapping the last registered object into its slot).
    fn free(&mut self, object: ObjRef) -> Object {
        let cell = match self.objects.swap_remove(&object) {
            Some(cell) => cell,
            None => panic!("attempted to free an already freed object ({})", object),
        };
        if let Object::Symbol(name) = &cell.object {
            self.symbols.remove(name.as_str());
        }
        tracing::trace!(object = %object, kind = cell.object.kind(), "free");
        self.stats.freed += 1;
        cell.object
    }

    /// Frees every object still on the heap, regardless of reference counts.
    ///
    /// This also reclaims reference cycles, which are otherwise never collected.
    /// Returns the number of objects that were freed.
    pub fn clean(&mut self) -> usize {
        let count = self.objects.len();
        self.objects.clear();
        self.symbols.clear();
        self.stats.freed += count;
        tracing::debug!(
            freed = count,
            allocated = self.stats.allocated,
            peak = self.stats.peak,
            "heap cleaned"
        );
        count
    }

    fn cell(&self, object: ObjRef) -> &HeapCell {
        match self.objects.get(&object) {
            Some(cell) => cell,
            None => panic!("access to a freed heap object ({})", object),
        }
    }

    fn cell_mut(&mut self, object: ObjRef) -> &mut HeapCell {
        match self.objects.get_mut(&object) {
            Some(cell) => cell,
            None => panic!("access to a freed heap object ({})", object),
        }
    }

    /// Get the object behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if the object has already been freed.
    pub fn get(&self, object: ObjRef) -> &Object {
        &self.cell(object).object
    }

    /// Get the object behind a value, or `None` for `NIL`.
    pub fn object(&self, value: Value) -> Option<&Object> {
        value.map(|object| self.get(object))
    }

    /// Returns whether a handle still designates a live object.
    pub fn is_alive(&self, object: ObjRef) -> bool {
        self.objects.contains_key(&object)
    }

    /// Get the reference count of an object, if it is still alive.
    pub fn refcount(&self, object: ObjRef) -> Option<u32> {
        self.objects.get(&object).map(|cell| cell.refs)
    }

    /// Search the intern table for a symbol, without creating it.
    pub fn lookup_symbol(&self, name: &str) -> Option<ObjRef> {
        self.symbols.get(name).copied()
    }

    /// Iterate over every live object, in registry order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjRef, &Object, u32)> + '_ {
        self.objects
            .iter()
            .map(|(&handle, cell)| (handle, &cell.object, cell.refs))
    }

    /// Get the first slot of a cons cell (`NIL` for anything else).
    pub fn head(&self, value: Value) -> Value {
        match self.object(value) {
            Some(Object::Cons(cons)) => cons.head,
            _ => None,
        }
    }

    /// Get the second slot of a cons cell (`NIL` for anything else).
    pub fn tail(&self, value: Value) -> Value {
        match self.object(value) {
            Some(Object::Cons(cons)) => cons.tail,
            _ => None,
        }
    }

    /// Replaces the first slot of a cons cell.
    pub fn set_head(&mut self, cell: ObjRef, value: Value) -> Result<(), LispError> {
        self.replace_slot(cell, value, |cons| &mut cons.head)
    }

    /// Replaces the second slot of a cons cell.
    pub fn set_tail(&mut self, cell: ObjRef, value: Value) -> Result<(), LispError> {
        self.replace_slot(cell, value, |cons| &mut cons.tail)
    }

    fn replace_slot(
        &mut self,
        cell: ObjRef,
        value: Value,
        slot: impl FnOnce(&mut Cons) -> &mut Value,
    ) -> Result<(), LispError> {
        let old = match &mut self.cell_mut(cell).object {
            Object::Cons(cons) => std::mem::replace(slot(cons), value),
            _ => return Err(LispError::TypeMismatch("Argument is not a CONS type.")),
        };
        self.grab(value);
        self.release(old);
        Ok(())
    }

    /// Get the `n`-th element of a list (`NIL` past its end).
    pub fn nth(&self, value: Value, n: usize) -> Value {
        self.head(self.nth_tail(value, n))
    }

    /// Skip the first `n` cons cells of a list.
    pub fn nth_tail(&self, mut value: Value, n: usize) -> Value {
        for _ in 0..n {
            value = self.tail(value);
        }
        value
    }

    /// Counts the cons cells along the tail chain of a value.
    pub fn length(&self, mut value: Value) -> usize {
        let mut count = 0;
        while let Some(Object::Cons(cons)) = self.object(value) {
            count += 1;
            value = cons.tail;
        }
        count
    }

    /// Collects the heads of the cons cells along the tail chain of a value.
    pub fn to_vec(&self, mut value: Value) -> Vec<Value> {
        let mut values = Vec::new();
        while let Some(Object::Cons(cons)) = self.object(value) {
            values.push(cons.head);
            value = cons.tail;
        }
        values
    }

    /// Returns whether a value is a cons cell.
    pub fn is_cons(&self, value: Value) -> bool {
        matches!(self.object(value), Some(Object::Cons(_)))
    }

    /// Returns whether a value is an error.
    pub fn is_error(&self, value: Value) -> bool {
        matches!(self.object(value), Some(Object::Error(_)))
    }

    /// Returns whether a value is a symbol.
    pub fn is_symbol(&self, value: Value) -> bool {
        matches!(self.object(value), Some(Object::Symbol(_)))
    }

    /// Get the integer behind a value, if it is a number.
    pub fn as_number(&self, value: Value) -> Option<i64> {
        match self.object(value) {
            Some(Object::Number(number)) => Some(*number),
            _ => None,
        }
    }

    /// Get the contents of a value, if it is a string.
    pub fn as_str(&self, value: Value) -> Option<&str> {
        match self.object(value) {
            Some(Object::String(string)) => Some(string.as_str()),
            _ => None,
        }
    }

    /// Get the name of a value, if it is a symbol.
    pub fn symbol_name(&self, value: Value) -> Option<&str> {
        match self.object(value) {
            Some(Object::Symbol(name)) => Some(name.as_str()),
            _ => None,
        }
    }
}
