use rclisp_core::{LispError, ObjRef, Value};

use crate::expect_args;
use crate::interpreter::Interpreter;
use crate::primitives::PrimitiveFn;

pub static PRIMITIVES: &[(&str, PrimitiveFn)] = &[
    ("CAR", self::car),
    ("CDR", self::cdr),
    ("CONS", self::cons),
    ("LIST", self::list),
    ("RPLACA", self::rplaca),
    ("RPLACD", self::rplacd),
];

fn expect_cons(interpreter: &Interpreter, value: Value) -> Result<ObjRef, LispError> {
    match value {
        Some(cell) if interpreter.heap.is_cons(value) => Ok(cell),
        _ => Err(LispError::TypeMismatch("Argument is not a CONS type.")),
    }
}

fn car(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "CAR";

    expect_args!(SIGNATURE, interpreter, args, [list]);

    let cell = expect_cons(interpreter, list)?;
    let head = interpreter.heap.head(Some(cell));
    Ok(interpreter.heap.grab(head))
}

fn cdr(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "CDR";

    expect_args!(SIGNATURE, interpreter, args, [list]);

    let cell = expect_cons(interpreter, list)?;
    let tail = interpreter.heap.tail(Some(cell));
    Ok(interpreter.heap.grab(tail))
}

fn cons(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "CONS";

    expect_args!(SIGNATURE, interpreter, args, [head, tail]);

    let cell = interpreter.heap.cons(head, tail);
    Ok(interpreter.heap.grab(Some(cell)))
}

fn list(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    let values = interpreter.heap.to_vec(args);
    let list = interpreter.heap.list(&values);
    Ok(interpreter.heap.grab(list))
}

fn rplaca(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "RPLACA";

    expect_args!(SIGNATURE, interpreter, args, [place, value]);

    let cell = expect_cons(interpreter, place)?;
    interpreter.heap.set_head(cell, value)?;
    Ok(interpreter.heap.grab(place))
}

fn rplacd(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "RPLACD";

    expect_args!(SIGNATURE, interpreter, args, [place, value]);

    let cell = expect_cons(interpreter, place)?;
    interpreter.heap.set_tail(cell, value)?;
    Ok(interpreter.heap.grab(place))
}
