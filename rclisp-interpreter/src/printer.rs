use std::collections::HashSet;
use std::fmt;

use rclisp_core::{ObjRef, Object, Value};

use crate::interpreter::Interpreter;

/// Renders a value as text (see [`Interpreter::display`]).
pub struct Printer<'a> {
    interpreter: &'a Interpreter,
    value: Value,
}

impl Interpreter {
    /// Get a displayable rendering of a value.
    pub fn display(&self, value: Value) -> Printer<'_> {
        Printer {
            interpreter: self,
            value,
        }
    }

    /// Get the one-line debugging description of an object, as printed by `HEAP` and `HEAP-OBJECT`.
    pub fn describe(&self, object: ObjRef) -> String {
        let refs = self.heap.refcount(object).unwrap_or_default();
        let contents = match self.heap.get(object) {
            Object::Cons(_) => String::from("cons"),
            Object::Number(value) => format!("number {}", value),
            Object::Symbol(name) => format!("symbol {}", name),
            Object::String(value) => format!("string {:?}", value),
            Object::Error(error) => format!("error {}", error),
            Object::Closure(_) => String::from("closure"),
            Object::Primitive(id) => format!(
                "primitive {}",
                self.primitive_name(*id).unwrap_or("?")
            ),
        };
        format!("[{} ({}) refs: {}]", object, contents, refs)
    }
}

impl Printer<'_> {
    /// `path` holds the cons cells of the lists being printed, so that cycles are cut short with `...`.
    fn write_value(
        &self,
        f: &mut fmt::Formatter<'_>,
        value: Value,
        path: &mut HashSet<ObjRef>,
    ) -> fmt::Result {
        let object = match value {
            Some(object) => object,
            None => return f.write_str("NIL"),
        };
        match self.interpreter.heap.get(object) {
            Object::Cons(_) => self.write_list(f, object, path),
            Object::Number(value) => write!(f, "{}", value),
            Object::Symbol(name) => f.write_str(name),
            Object::String(value) => {
                f.write_str("\"")?;
                for ch in value.chars() {
                    match ch {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        ch => write!(f, "{}", ch)?,
                    }
                }
                f.write_str("\"")
            }
            Object::Error(error) => write!(f, "Error: {}", error),
            Object::Closure(closure) => {
                f.write_str("<procedure ")?;
                match closure.params {
                    None => f.write_str("()")?,
                    params => self.write_value(f, params, path)?,
                }
                write!(f, " {}>", object)
            }
            Object::Primitive(id) => write!(
                f,
                "<primitive-procedure {}>",
                self.interpreter.primitive_name(*id).unwrap_or("?")
            ),
        }
    }

    fn write_list(
        &self,
        f: &mut fmt::Formatter<'_>,
        list: ObjRef,
        path: &mut HashSet<ObjRef>,
    ) -> fmt::Result {
        f.write_str("(")?;
        let mut spine = Vec::new();
        let result = self.write_elements(f, list, path, &mut spine);
        for cell in spine {
            path.remove(&cell);
        }
        result?;
        f.write_str(")")
    }

    fn write_elements(
        &self,
        f: &mut fmt::Formatter<'_>,
        list: ObjRef,
        path: &mut HashSet<ObjRef>,
        spine: &mut Vec<ObjRef>,
    ) -> fmt::Result {
        let mut value = Some(list);
        let mut first = true;
        loop {
            match (value, self.interpreter.heap.object(value)) {
                (Some(cell), Some(Object::Cons(cons))) => {
                    if !first {
                        f.write_str(" ")?;
                    }
                    first = false;
                    if !path.insert(cell) {
                        return f.write_str("...");
                    }
                    spine.push(cell);
                    self.write_value(f, cons.head, path)?;
                    value = cons.tail;
                }
                (_, None) => return Ok(()),
                _ => {
                    f.write_str(" . ")?;
                    return self.write_value(f, value, path);
                }
            }
        }
    }
}

impl fmt::Display for Printer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_value(f, self.value, &mut HashSet::new())
    }
}
