use rclisp_core::{Heap, LispError, Object, Value};

use crate::expect_args;
use crate::interpreter::Interpreter;
use crate::primitives::PrimitiveFn;

pub static PRIMITIVES: &[(&str, PrimitiveFn)] = &[
    ("PAIR", self::pair),
    ("ATOM", self::atom),
    ("NULL", self::null),
    ("NOT", self::null),
    ("STRING", self::string),
    ("NUMBER", self::number),
    ("SYMBOL", self::symbol),
    ("EQ", self::eq),
    ("EQL", self::eql),
    ("EQUAL", self::equal),
    ("AND", self::and),
    ("OR", self::or),
];

fn pair(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "PAIR";

    expect_args!(SIGNATURE, interpreter, args, [value]);

    let is_pair = interpreter.heap.is_cons(value);
    Ok(interpreter.truth(is_pair))
}

fn atom(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "ATOM";

    expect_args!(SIGNATURE, interpreter, args, [value]);

    let is_atom = !interpreter.heap.is_cons(value);
    Ok(interpreter.truth(is_atom))
}

fn null(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "NULL";

    expect_args!(SIGNATURE, interpreter, args, [value]);

    Ok(interpreter.truth(value.is_none()))
}

fn string(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "STRING";

    expect_args!(SIGNATURE, interpreter, args, [value]);

    let is_string = interpreter.heap.as_str(value).is_some();
    Ok(interpreter.truth(is_string))
}

fn number(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "NUMBER";

    expect_args!(SIGNATURE, interpreter, args, [value]);

    let is_number = interpreter.heap.as_number(value).is_some();
    Ok(interpreter.truth(is_number))
}

fn symbol(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "SYMBOL";

    expect_args!(SIGNATURE, interpreter, args, [value]);

    let is_symbol = interpreter.heap.is_symbol(value);
    Ok(interpreter.truth(is_symbol))
}

fn eq(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "EQ";

    expect_args!(SIGNATURE, interpreter, args, [a, b]);

    Ok(interpreter.truth(a == b))
}

/// Identity, or numeric equality between two numbers.
fn eql_values(heap: &Heap, a: Value, b: Value) -> bool {
    if a == b {
        return true;
    }
    match (heap.as_number(a), heap.as_number(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn eql(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "EQL";

    expect_args!(SIGNATURE, interpreter, args, [a, b]);

    let result = eql_values(&interpreter.heap, a, b);
    Ok(interpreter.truth(result))
}

/// Structural equality: conses are compared element-wise, strings by contents, other atoms with `EQL`.
fn equal_values(heap: &Heap, mut a: Value, mut b: Value) -> bool {
    loop {
        match (heap.object(a), heap.object(b)) {
            (Some(Object::Cons(x)), Some(Object::Cons(y))) => {
                if !equal_values(heap, x.head, y.head) {
                    return false;
                }
                a = x.tail;
                b = y.tail;
            }
            (Some(Object::String(x)), Some(Object::String(y))) => return x == y,
            _ => return eql_values(heap, a, b),
        }
    }
}

fn equal(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "EQUAL";

    expect_args!(SIGNATURE, interpreter, args, [a, b]);

    let result = equal_values(&interpreter.heap, a, b);
    Ok(interpreter.truth(result))
}

fn and(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    let values = interpreter.heap.to_vec(args);
    match values.last() {
        None => Ok(interpreter.truth(true)),
        Some(_) if values.iter().any(Option::is_none) => Ok(None),
        Some(&last) => Ok(interpreter.heap.grab(last)),
    }
}

fn or(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    let values = interpreter.heap.to_vec(args);
    let first = values.into_iter().find(Option::is_some).flatten();
    Ok(interpreter.heap.grab(first))
}
