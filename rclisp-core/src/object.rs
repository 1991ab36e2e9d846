use std::fmt;

use crate::error::LispError;

/// A handle to an object stored in a [`Heap`](crate::Heap).
///
/// Handles are never reused during the lifetime of a heap, so comparing two handles
/// compares the identity of the objects they designate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjRef(pub(crate) u64);

impl ObjRef {
    /// Get the raw identifier behind this handle.
    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A Lisp value: either the null value (`NIL`, the empty list) or a heap object.
pub type Value = Option<ObjRef>;

/// Identifies an entry in the interpreter's primitive table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrimitiveId(pub usize);

/// A pair of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cons {
    /// The first slot (`CAR`).
    pub head: Value,
    /// The second slot (`CDR`).
    pub tail: Value,
}

/// A user-defined procedure, as produced by `LAMBDA` (or `LET`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Closure {
    /// The list of parameter symbols.
    pub params: Value,
    /// The list of body expressions.
    pub body: Value,
    /// The captured environment (a list of frames).
    pub env: Value,
}

/// Represents a heap object.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// A cons cell.
    Cons(Cons),
    /// An integer.
    Number(i64),
    /// An interned symbol.
    Symbol(String),
    /// A string.
    String(String),
    /// An error value.
    Error(LispError),
    /// A user-defined procedure.
    Closure(Closure),
    /// A built-in procedure.
    Primitive(PrimitiveId),
}

impl Object {
    /// Get a short name for the kind of this object.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Cons(_) => "cons",
            Self::Number(_) => "number",
            Self::Symbol(_) => "symbol",
            Self::String(_) => "string",
            Self::Error(_) => "error",
            Self::Closure(_) => "closure",
            Self::Primitive(_) => "primitive",
        }
    }

    /// Iterate over the objects this object holds a reference to.
    pub fn children(&self) -> impl Iterator<Item = ObjRef> {
        let slots = match self {
            Self::Cons(cons) => [cons.head, cons.tail, None],
            Self::Closure(closure) => [closure.params, closure.body, closure.env],
            _ => [None, None, None],
        };
        slots.into_iter().flatten()
    }
}
