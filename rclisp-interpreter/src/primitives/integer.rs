use rclisp_core::{LispError, Value};

use crate::expect_args;
use crate::interpreter::Interpreter;
use crate::primitives::{self, PrimitiveFn};

pub static PRIMITIVES: &[(&str, PrimitiveFn)] = &[
    ("+", self::plus),
    ("*", self::times),
    ("-", self::minus),
    ("/", self::divide),
    ("MOD", self::modulo),
    ("=", self::eq),
    ("<", self::lt),
    (">", self::gt),
];

fn integer(interpreter: &mut Interpreter, value: i64) -> Result<Value, LispError> {
    let number = interpreter.heap.number(value);
    Ok(interpreter.heap.grab(Some(number)))
}

fn plus(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    let sum = primitives::numbers(&interpreter.heap, args)?
        .into_iter()
        .try_fold(0i64, i64::checked_add)
        .ok_or(LispError::Overflow)?;
    integer(interpreter, sum)
}

fn times(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    let product = primitives::numbers(&interpreter.heap, args)?
        .into_iter()
        .try_fold(1i64, i64::checked_mul)
        .ok_or(LispError::Overflow)?;
    integer(interpreter, product)
}

fn minus(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "-";

    let values = primitives::numbers(&interpreter.heap, args)?;
    let result = match values.split_first() {
        None => return Err(LispError::WrongArgumentCount(SIGNATURE.to_string())),
        Some((first, [])) => first.checked_neg(),
        Some((first, rest)) => rest
            .iter()
            .try_fold(*first, |acc, value| acc.checked_sub(*value)),
    };
    integer(interpreter, result.ok_or(LispError::Overflow)?)
}

fn divide(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "/";

    let values = primitives::numbers(&interpreter.heap, args)?;
    let (first, rest) = match values.split_first() {
        Some((first, rest)) if !rest.is_empty() => (*first, rest),
        _ => return Err(LispError::WrongArgumentCount(SIGNATURE.to_string())),
    };

    let mut quotient = first;
    for &divisor in rest {
        if divisor == 0 {
            return Err(LispError::DivisionByZero);
        }
        quotient = quotient.checked_div(divisor).ok_or(LispError::Overflow)?;
    }
    integer(interpreter, quotient)
}

fn modulo(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "MOD";

    expect_args!(SIGNATURE, interpreter, args, [a, b]);

    let a = primitives::number(&interpreter.heap, a)?;
    let b = primitives::number(&interpreter.heap, b)?;
    if b == 0 {
        return Err(LispError::DivisionByZero);
    }
    integer(interpreter, a.checked_rem(b).ok_or(LispError::Overflow)?)
}

fn compare(
    signature: &str,
    interpreter: &mut Interpreter,
    args: Value,
    predicate: fn(&i64, &i64) -> bool,
) -> Result<Value, LispError> {
    expect_args!(signature, interpreter, args, [a, b]);

    let a = primitives::number(&interpreter.heap, a)?;
    let b = primitives::number(&interpreter.heap, b)?;
    Ok(interpreter.truth(predicate(&a, &b)))
}

fn eq(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    compare("=", interpreter, args, i64::eq)
}

fn lt(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    compare("<", interpreter, args, i64::lt)
}

fn gt(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    compare(">", interpreter, args, i64::gt)
}
