use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use rclisp_core::{Heap, LispError, ObjRef, PrimitiveId, Value};

use crate::environment::Environment;
use crate::primitives::{self, PrimitiveFn};
use crate::reader::{needs_more_input, Reader};

/// The special forms recognized by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialForm {
    /// `(QUOTE x)`
    Quote,
    /// `(SETQ name expr)`
    Setq,
    /// `(LABEL name expr)`
    Label,
    /// `(IF test then else)`
    If,
    /// `(COND (test expr?)...)`
    Cond,
    /// `(LET ((name init)...) body...)`
    Let,
    /// `(PROGN expr...)`
    Progn,
    /// `(LAMBDA params body...)`
    Lambda,
}

impl SpecialForm {
    /// Every special form, paired with its keyword.
    pub const ALL: [(&'static str, SpecialForm); 8] = [
        ("QUOTE", SpecialForm::Quote),
        ("SETQ", SpecialForm::Setq),
        ("LABEL", SpecialForm::Label),
        ("IF", SpecialForm::If),
        ("COND", SpecialForm::Cond),
        ("LET", SpecialForm::Let),
        ("PROGN", SpecialForm::Progn),
        ("LAMBDA", SpecialForm::Lambda),
    ];

    /// Get the keyword introducing this form.
    pub fn name(self) -> &'static str {
        Self::ALL
            .iter()
            .find(|(_, form)| *form == self)
            .map_or("?", |(name, _)| name)
    }
}

/// The symbols the evaluator needs to recognize, interned (and held) once and for all.
#[derive(Debug, Clone)]
pub(crate) struct Keywords {
    pub(crate) forms: Vec<(ObjRef, SpecialForm)>,
    pub(crate) t: ObjRef,
}

impl Keywords {
    fn intern(heap: &mut Heap) -> Self {
        let forms = SpecialForm::ALL
            .iter()
            .map(|&(name, form)| {
                let symbol = heap.symbol(name);
                heap.grab(Some(symbol));
                (symbol, form)
            })
            .collect();
        let t = heap.symbol("T");
        heap.grab(Some(t));
        Self { forms, t }
    }

    /// Find out which special form (if any) a list head designates.
    pub(crate) fn classify(&self, head: Value) -> Option<SpecialForm> {
        let head = head?;
        self.forms
            .iter()
            .find(|(symbol, _)| *symbol == head)
            .map(|(_, form)| *form)
    }

    fn symbols(&self) -> impl Iterator<Item = ObjRef> + '_ {
        self.forms
            .iter()
            .map(|(symbol, _)| *symbol)
            .chain(std::iter::once(self.t))
    }
}

/// The central data structure for the interpreter.
///
/// It owns the object store, the global environment, the primitive table and the I/O channels.
pub struct Interpreter {
    /// The object store.
    pub heap: Heap,
    /// The global environment.
    pub environment: Environment,
    pub(crate) keywords: Keywords,
    pub(crate) primitives: Vec<(String, PrimitiveFn)>,
    pub(crate) output: Box<dyn Write>,
    pub(crate) input: Box<dyn BufRead>,
}

impl Interpreter {
    /// Initialize the interpreter, reading from the standard input and printing to the standard output.
    pub fn new() -> Self {
        Self::with_io(io::BufReader::new(io::stdin()), io::stdout())
    }

    /// Initialize the interpreter with the given input and output channels (used by `READ`, `DISPLAY` and `NEWLINE`).
    pub fn with_io(input: impl BufRead + 'static, output: impl Write + 'static) -> Self {
        let mut heap = Heap::new();
        let keywords = Keywords::intern(&mut heap);
        let environment = Environment::new(&mut heap);
        heap.grab(environment.value());

        let mut interpreter = Self {
            heap,
            environment,
            keywords,
            primitives: Vec::new(),
            output: Box::new(output),
            input: Box::new(input),
        };

        for &(name, function) in primitives::all() {
            if let Err(err) = interpreter.define_primitive(name, function) {
                tracing::warn!(primitive = name, %err, "could not install primitive");
            }
        }

        let t = Some(interpreter.keywords.t);
        if let Err(err) = interpreter.environment.define(&mut interpreter.heap, t, t) {
            tracing::warn!(%err, "could not bind T");
        }
        let nil = interpreter.heap.symbol("NIL");
        if let Err(err) = interpreter
            .environment
            .define(&mut interpreter.heap, Some(nil), None)
        {
            tracing::warn!(%err, "could not bind NIL");
        }

        tracing::debug!(
            objects = interpreter.heap.len(),
            primitives = interpreter.primitives.len(),
            "interpreter initialized"
        );
        interpreter
    }

    /// Registers a primitive procedure, and binds it to `name` in the global environment.
    pub fn define_primitive(&mut self, name: &str, function: PrimitiveFn) -> Result<(), LispError> {
        let symbol = self.heap.symbol(name);
        self.heap.grab(Some(symbol));
        if self.environment.lookup(&self.heap, symbol).is_ok() {
            self.heap.release(Some(symbol));
            return Err(LispError::AlreadyDefined(name.to_string()));
        }

        let id = primitives::register(&mut self.primitives, name, function);
        let procedure = self.heap.primitive(id);
        self.heap.grab(Some(procedure));

        let result = self
            .environment
            .define(&mut self.heap, Some(symbol), Some(procedure));

        self.heap.release(Some(procedure));
        self.heap.release(Some(symbol));
        result.map(|_| ())
    }

    /// Get the name a primitive was registered under.
    pub fn primitive_name(&self, id: PrimitiveId) -> Option<&str> {
        self.primitives.get(id.0).map(|(name, _)| name.as_str())
    }

    /// Get an owned boolean value (`T` or `NIL`).
    pub fn truth(&mut self, value: bool) -> Value {
        if value {
            self.heap.grab(Some(self.keywords.t))
        } else {
            None
        }
    }

    /// Allocates an owned error value.
    pub fn fail(&mut self, error: LispError) -> Value {
        tracing::debug!(%error, "raise");
        let error = self.heap.error(error);
        self.heap.grab(Some(error))
    }

    /// Turns the outcome of a fallible operation into an owned value.
    ///
    /// The `Ok` value is assumed to be owned already.
    pub(crate) fn settle(&mut self, result: Result<Value, LispError>) -> Value {
        match result {
            Ok(value) => value,
            Err(error) => self.fail(error),
        }
    }

    /// Reads and evaluates every form of a piece of source text, in the global environment.
    ///
    /// Evaluation stops at the first error.
    /// Returns the (owned) value of the last form evaluated, or `NIL` for an empty input.
    pub fn evaluate_source(&mut self, source: &str) -> Value {
        let mut reader = Reader::new(source);
        let mut result = None;
        while let Some(expr) = reader.read(&mut self.heap) {
            self.heap.release(result);
            result = self.evaluate(expr, self.environment);
            self.heap.release(expr);
            if self.heap.is_error(result) {
                break;
            }
        }
        result
    }

    /// Loads a source file, evaluating every form it contains in the global environment.
    ///
    /// The value of each form is printed if it is an error, or if it isn't the last one.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), LispError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading file");

        let mut reader = Reader::new(source);
        let mut next = reader.read(&mut self.heap);
        while let Some(expr) = next {
            let result = self.evaluate(expr, self.environment);
            self.heap.release(expr);
            next = reader.read(&mut self.heap);
            if next.is_some() || self.heap.is_error(result) {
                let text = self.display(result).to_string();
                if let Err(err) = writeln!(self.output, "{}", text) {
                    self.heap.release(result);
                    self.heap.release(next.flatten());
                    return Err(err.into());
                }
            }
            self.heap.release(result);
        }

        self.output.flush()?;
        Ok(())
    }

    /// Reads one form from the input channel, and returns it (owned).
    ///
    /// Lines are accumulated until they make up a complete form.
    /// Anything after that form on its last line is discarded.
    /// Returns `NIL` once the input is exhausted.
    pub fn read_input(&mut self) -> Result<Value, LispError> {
        let mut buffer = String::new();
        loop {
            let count = self.input.read_line(&mut buffer)?;
            if count != 0 && needs_more_input(&buffer) {
                continue;
            }
            let mut reader = Reader::new(buffer.as_str());
            if let Some(value) = reader.read(&mut self.heap) {
                return Ok(value);
            }
            if count == 0 {
                return Ok(None);
            }
            buffer.clear();
        }
    }

    /// Writes text to the output channel.
    pub fn write_output(&mut self, text: &str) -> Result<(), LispError> {
        self.output.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Flushes the output channel.
    pub fn flush_output(&mut self) -> Result<(), LispError> {
        self.output.flush()?;
        Ok(())
    }

    /// Tears the interpreter down, releasing the global environment and freeing every object left.
    ///
    /// Returns the number of objects that were still on the heap (cycles included) before the final sweep.
    pub fn teardown(mut self) -> usize {
        if let Err(err) = self.output.flush() {
            tracing::warn!(%err, "could not flush output");
        }

        self.heap.release(self.environment.value());
        let symbols: Vec<ObjRef> = self.keywords.symbols().collect();
        for symbol in symbols {
            self.heap.release(Some(symbol));
        }

        let freed = self.heap.clean();
        tracing::debug!(freed, "interpreter torn down");
        freed
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
