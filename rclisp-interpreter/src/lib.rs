//!
//! This is the interpreter for rclisp, a small Lisp whose objects are reference-counted by hand.
//!

/// Facilities for manipulating environments (chains of binding frames).
pub mod environment;
/// Facilities for evaluating expressions.
pub mod evaluate;
/// The interpreter's main data structure.
pub mod interpreter;
/// Facilities for applying procedures to arguments.
pub mod invokable;
/// Definitions for all supported primitives.
pub mod primitives;
/// Facilities for rendering values as text.
pub mod printer;
/// Facilities for turning source text into values.
pub mod reader;
