use rclisp_core::{Heap, LispError, ObjRef, Object, Value};

/// An environment: a chain of frames, innermost first.
///
/// It is stored on the heap as a cons list whose elements are the frames.
/// Each frame is itself a list of bindings (`(symbol . value)` cons cells), newest first.
///
/// This type is a plain handle: it does not own a reference to the underlying list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Environment(ObjRef);

impl Environment {
    /// Allocates a fresh environment, made of a single empty frame.
    ///
    /// Like every new heap object, the environment starts unowned.
    pub fn new(heap: &mut Heap) -> Self {
        Self(heap.cons(None, None))
    }

    /// Wraps an existing list of frames.
    ///
    /// Returns `None` if the value isn't a cons cell.
    pub fn from_value(heap: &Heap, value: Value) -> Option<Self> {
        match heap.object(value) {
            Some(Object::Cons(_)) => value.map(Self),
            _ => None,
        }
    }

    /// Get the heap value representing this environment.
    pub fn value(self) -> Value {
        Some(self.0)
    }

    /// Allocates a new environment, whose innermost frame binds `params` to `args` pairwise,
    /// and whose outer frames are those of `parent`.
    pub fn extend(heap: &mut Heap, params: Value, args: Value, parent: Environment) -> Self {
        let frame = extend_frame(heap, params, args);
        Self(heap.cons(frame, parent.value()))
    }

    /// Search for the binding of a symbol, innermost frame first.
    ///
    /// On success, the binding cell is returned: its head is the symbol, its tail is the bound value.
    pub fn lookup(self, heap: &Heap, symbol: ObjRef) -> Result<ObjRef, LispError> {
        let mut frames = self.value();
        while let Some(Object::Cons(frame)) = heap.object(frames) {
            let mut bindings = frame.head;
            while let Some(Object::Cons(binding)) = heap.object(bindings) {
                if let Some(cell) = binding.head {
                    if heap.head(Some(cell)) == Some(symbol) {
                        return Ok(cell);
                    }
                }
                bindings = binding.tail;
            }
            frames = frame.tail;
        }

        let name = heap.symbol_name(Some(symbol)).unwrap_or_default();
        Err(LispError::UnboundVariable(name.to_string()))
    }

    /// Adds a new binding to the innermost frame.
    ///
    /// Fails if the symbol is already bound anywhere along the chain, shadowing included.
    pub fn define(self, heap: &mut Heap, symbol: Value, value: Value) -> Result<Value, LispError> {
        let symbol = expect_symbol(heap, symbol)?;
        if self.lookup(heap, symbol).is_ok() {
            let name = heap.symbol_name(Some(symbol)).unwrap_or_default();
            return Err(LispError::AlreadyDefined(name.to_string()));
        }

        let binding = heap.cons(Some(symbol), value);
        let bindings = heap.head(self.value());
        let frame = heap.cons(Some(binding), bindings);
        heap.set_head(self.0, Some(frame))?;

        tracing::trace!(
            symbol = heap.symbol_name(Some(symbol)).unwrap_or_default(),
            "define"
        );
        Ok(value)
    }

    /// Replaces the value of the nearest existing binding of a symbol.
    pub fn assign(self, heap: &mut Heap, symbol: Value, value: Value) -> Result<Value, LispError> {
        let symbol = expect_symbol(heap, symbol)?;
        let cell = self.lookup(heap, symbol)?;
        heap.set_tail(cell, value)?;
        Ok(value)
    }

    /// Get the frames of this environment, innermost first.
    pub fn frames(self, heap: &Heap) -> Vec<Value> {
        heap.to_vec(self.value())
    }

    /// Get the bindings of the innermost frame, newest first.
    pub fn bindings(self, heap: &Heap) -> Vec<(ObjRef, Value)> {
        heap.to_vec(heap.head(self.value()))
            .into_iter()
            .filter_map(|binding| match heap.object(binding) {
                Some(Object::Cons(cell)) => cell.head.map(|symbol| (symbol, cell.tail)),
                _ => None,
            })
            .collect()
    }
}

/// Builds a frame binding each parameter to the argument in the same position.
///
/// Extra parameters or extra arguments are ignored (arity is checked before application).
pub fn extend_frame(heap: &mut Heap, params: Value, args: Value) -> Value {
    let params = heap.to_vec(params);
    let args = heap.to_vec(args);
    let bindings: Vec<Value> = params
        .into_iter()
        .zip(args)
        .map(|(param, arg)| Some(heap.cons(param, arg)))
        .collect();
    heap.list(&bindings)
}

fn expect_symbol(heap: &Heap, value: Value) -> Result<ObjRef, LispError> {
    match (value, heap.object(value)) {
        (Some(symbol), Some(Object::Symbol(_))) => Ok(symbol),
        _ => Err(LispError::TypeMismatch("Variable name is not a symbol.")),
    }
}
