//!
//! This crate contains the object store shared by every part of the rclisp interpreter.
//!
//! All Lisp data lives in a [`Heap`]: objects are allocated at a reference count of zero,
//! become live on their first [`Heap::grab`] and are freed as soon as the matching
//! [`Heap::release`] brings the count back to zero.
//!

/// The Lisp-level error taxonomy.
pub mod error;
/// The object store (registry, reference counts and symbol interning).
pub mod heap;
/// The heap object definitions.
pub mod object;

pub use crate::error::LispError;
pub use crate::heap::{Heap, HeapStats};
pub use crate::object::{Closure, Cons, ObjRef, Object, PrimitiveId, Value};
