//!
//! The rclisp Lexical Analyser
//! ===========================
//!
//! This crate serves as the lexical analyser for rclisp.
//! Symbol names are case-folded (upper-cased) here, so every later stage sees canonical names.
//!

mod lexer;
mod token;

pub use crate::lexer::Lexer;
pub use crate::token::Token;
