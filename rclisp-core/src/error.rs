use thiserror::Error;

/// An error raised while reading or evaluating Lisp code.
///
/// Inside the evaluator these are carried around as ordinary heap values
/// (see [`Object::Error`](crate::Object::Error)), so a Lisp program can hold onto one like any other datum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LispError {
    /// A symbol was evaluated but is bound nowhere in the environment chain.
    #[error("Unbound variable: {0}.")]
    UnboundVariable(String),
    /// `LABEL` was used on a name that is already bound somewhere in the chain.
    #[error("Variable already exists: {0}.")]
    AlreadyDefined(String),
    /// A closure was applied to the wrong number of arguments (the count received).
    #[error("Has received wrong number of parameters: {0}.")]
    ArityMismatch(usize),
    /// An operand had the wrong kind.
    #[error("{0}")]
    TypeMismatch(&'static str),
    /// The head of an application is neither a closure nor a primitive.
    #[error("Unknown procedure.")]
    UnknownProcedure,
    /// An error raised explicitly by user code, through the `ERROR` primitive.
    #[error("{0}")]
    User(String),
    /// A special form or a primitive was given the wrong number of arguments.
    #[error("{0}: received wrong number of arguments.")]
    WrongArgumentCount(String),
    /// A `COND` clause that is not a list.
    #[error("Bad cond clause.")]
    BadCondClause,
    /// A `LET` without any binding.
    #[error("Empty bindings in the let exp.")]
    EmptyLetBindings,
    /// A `LET` binding that is not exactly `(name init)`.
    #[error("Bad binding in the let exp.")]
    BadLetBinding,
    /// An integer division (or modulo) by zero.
    #[error("Division by zero.")]
    DivisionByZero,
    /// An integer operation whose result does not fit in 64 bits.
    #[error("Integer overflow.")]
    Overflow,
    /// Malformed source text.
    #[error("{0}")]
    Syntax(String),
    /// Source text that ended in the middle of a form.
    #[error("{0}")]
    Incomplete(&'static str),
    /// A failure from the host system (files, standard input).
    #[error("{0}")]
    Io(String),
}

impl From<std::io::Error> for LispError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
