/// Primitives for integer arithmetic and comparisons.
pub mod integer;
/// Primitives for building and taking apart lists.
pub mod list;
/// Type predicates and logical connectives.
pub mod predicate;
/// Primitives interacting with the interpreter itself (evaluation, I/O, debugging).
pub mod system;

use rclisp_core::{Heap, LispError, PrimitiveId, Value};

use crate::interpreter::Interpreter;

/// A interpreter primitive (just a bare function pointer).
///
/// It receives the (evaluated) argument list, which it does not own.
/// The value it returns is owned by the caller.
pub type PrimitiveFn = fn(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError>;

/// Macro for checking the number of arguments passed to a primitive, and binding each of them to a name.
#[macro_export]
macro_rules! expect_args {
    ($signature:expr, $interpreter:expr, $args:expr, [ $( $name:ident ),* $(,)? ]) => {
        #[allow(unused_variables, unused_mut)]
        let mut iter = $crate::primitives::arguments(
            $signature,
            &$interpreter.heap,
            $args,
            <[&str]>::len(&[$(stringify!($name)),*]),
        )?
        .into_iter();
        $(let $name = iter.next().flatten();)*
    };
}

/// Collects the arguments of a primitive, checking that there are exactly `expected` of them.
pub fn arguments(
    signature: &str,
    heap: &Heap,
    args: Value,
    expected: usize,
) -> Result<Vec<Value>, LispError> {
    let values = heap.to_vec(args);
    if values.len() == expected {
        Ok(values)
    } else {
        Err(LispError::WrongArgumentCount(signature.to_string()))
    }
}

/// Get the integer behind a value, or fail with a type error.
pub fn number(heap: &Heap, value: Value) -> Result<i64, LispError> {
    heap.as_number(value)
        .ok_or(LispError::TypeMismatch("Argument is not a number."))
}

/// Get the integers behind every element of an argument list.
pub fn numbers(heap: &Heap, args: Value) -> Result<Vec<i64>, LispError> {
    heap.to_vec(args)
        .into_iter()
        .map(|value| number(heap, value))
        .collect()
}

/// Iterates over every built-in primitive, with the name it is installed under.
pub fn all() -> impl Iterator<Item = &'static (&'static str, PrimitiveFn)> {
    self::list::PRIMITIVES
        .iter()
        .chain(self::predicate::PRIMITIVES)
        .chain(self::integer::PRIMITIVES)
        .chain(self::system::PRIMITIVES)
}

/// Adds an entry to a primitive table, returning its identifier.
pub(crate) fn register(
    table: &mut Vec<(String, PrimitiveFn)>,
    name: &str,
    function: PrimitiveFn,
) -> PrimitiveId {
    table.push((name.to_string(), function));
    PrimitiveId(table.len() - 1)
}
