/// Represents a token from the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// An opening parenthesis (`(`).
    NewList,
    /// A closing parenthesis (`)`).
    EndList,
    /// A single quote, the quotation shorthand (`'`).
    Quote,
    /// A lone period, the dotted-pair separator (`.`).
    Dot,
    /// An integer literal (`-10`).
    LitInteger(i64),
    /// A string literal (`"hello, world"`).
    LitString(String),
    /// A symbol, already upper-cased (`FOO`).
    Symbol(String),
    /// A comment (`; what a beautiful and majestic piece of code`).
    Comment(String),
    /// Some whitespace (` `).
    Whitespace,
    /// A string literal that was not closed before the end of the input.
    UnterminatedString(String),
    /// An integer literal too large to be represented (`99999999999999999999`).
    BadInteger(String),
    /// A character that cannot start any token.
    Illegal(char),
}
