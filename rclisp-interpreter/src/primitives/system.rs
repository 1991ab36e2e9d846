use rclisp_core::{LispError, Value};

use crate::expect_args;
use crate::interpreter::Interpreter;
use crate::primitives::PrimitiveFn;

pub static PRIMITIVES: &[(&str, PrimitiveFn)] = &[
    ("EVAL", self::eval),
    ("APPLY", self::apply),
    ("ERROR", self::error),
    ("DISPLAY", self::display),
    ("NEWLINE", self::newline),
    ("READ", self::read),
    ("LOAD", self::load),
    ("HEAP", self::heap),
    ("HEAP-OBJECT", self::heap_object),
];

fn eval(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "EVAL";

    expect_args!(SIGNATURE, interpreter, args, [expr]);

    let env = interpreter.environment;
    Ok(interpreter.evaluate(expr, env))
}

fn apply(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "APPLY";

    expect_args!(SIGNATURE, interpreter, args, [procedure, arguments]);

    if arguments.is_some() && !interpreter.heap.is_cons(arguments) {
        return Err(LispError::TypeMismatch("Wrong arguments type."));
    }
    Ok(interpreter.apply(procedure, arguments))
}

fn error(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "ERROR";

    expect_args!(SIGNATURE, interpreter, args, [message]);

    match interpreter.heap.as_str(message) {
        Some(message) => Err(LispError::User(message.to_string())),
        None => Err(LispError::TypeMismatch("Argument is not a string.")),
    }
}

fn display(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "DISPLAY";

    expect_args!(SIGNATURE, interpreter, args, [value]);

    let text = match interpreter.heap.as_str(value) {
        Some(text) => text.to_string(),
        None => interpreter.display(value).to_string(),
    };
    interpreter.write_output(&text)?;
    interpreter.flush_output()?;
    Ok(interpreter.truth(true))
}

fn newline(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "NEWLINE";

    expect_args!(SIGNATURE, interpreter, args, []);

    interpreter.write_output("\n")?;
    interpreter.flush_output()?;
    Ok(interpreter.truth(true))
}

fn read(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "READ";

    expect_args!(SIGNATURE, interpreter, args, []);

    interpreter.read_input()
}

fn load(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "LOAD";

    expect_args!(SIGNATURE, interpreter, args, [path]);

    let path = match interpreter.heap.as_str(path) {
        Some(path) => path.to_string(),
        None => return Err(LispError::TypeMismatch("Argument is not a string.")),
    };

    match interpreter.load_file(&path) {
        Ok(()) => Ok(interpreter.truth(true)),
        Err(LispError::Io(err)) => {
            eprintln!("{}: {}", path, err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn heap(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "HEAP";

    expect_args!(SIGNATURE, interpreter, args, []);

    let mut report = String::new();
    for (object, _, _) in interpreter.heap.objects() {
        report.push_str(&interpreter.describe(object));
        report.push('\n');
    }
    let stats = interpreter.heap.stats();
    report.push_str(&format!(
        "Total: {} objects ({} symbols; {} allocated, {} freed, peak {}).\n",
        interpreter.heap.len(),
        interpreter.heap.symbol_count(),
        stats.allocated,
        stats.freed,
        stats.peak,
    ));

    interpreter.write_output(&report)?;
    interpreter.flush_output()?;
    Ok(None)
}

fn heap_object(interpreter: &mut Interpreter, args: Value) -> Result<Value, LispError> {
    const SIGNATURE: &str = "HEAP-OBJECT";

    expect_args!(SIGNATURE, interpreter, args, [object]);

    let line = match object {
        Some(object) => format!("Debug object: {}\n", interpreter.describe(object)),
        None => String::from("Debug object: NIL\n"),
    };
    interpreter.write_output(&line)?;
    interpreter.flush_output()?;
    Ok(None)
}
