use rclisp_core::{Heap, LispError, Value};
use rclisp_lexer::{Lexer, Token};

/// Turns source text into values, one top-level form at a time.
pub struct Reader {
    tokens: Lexer,
    /// How many lists are open in the form being read.
    depth: usize,
}

impl Reader {
    /// Creates a reader over the given source text.
    pub fn new<T: AsRef<str>>(source: T) -> Self {
        let tokens = Lexer::new(source)
            .skip_comments(true)
            .skip_whitespace(true);
        Self { tokens, depth: 0 }
    }

    /// Reads the next form.
    ///
    /// Returns `None` once the input is exhausted, or else an owned value.
    /// Malformed input yields an error value rather than a failure.
    /// Reading resumes after the malformed form, unless the input ended in the middle of it.
    pub fn read(&mut self, heap: &mut Heap) -> Option<Value> {
        let token = self.tokens.next()?;
        self.depth = 0;
        let value = match self.read_datum(heap, token) {
            Ok(value) => value,
            Err(error) => {
                self.recover(&error);
                Some(heap.error(error))
            }
        };
        Some(heap.grab(value))
    }

    /// Skips the rest of a malformed form, up to the parenthesis closing it.
    fn recover(&mut self, error: &LispError) {
        if let LispError::Incomplete(_) = error {
            for _ in self.tokens.by_ref() {}
            return;
        }
        while self.depth > 0 {
            match self.tokens.next() {
                Some(token) => self.track(&token),
                None => break,
            }
        }
    }

    fn track(&mut self, token: &Token) {
        match token {
            Token::NewList => self.depth += 1,
            Token::EndList => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
    }

    fn read_next(&mut self, heap: &mut Heap) -> Result<Value, LispError> {
        match self.tokens.next() {
            Some(token) => self.read_datum(heap, token),
            None => Err(LispError::Incomplete("Unexpected end of input.")),
        }
    }

    fn read_datum(&mut self, heap: &mut Heap, token: Token) -> Result<Value, LispError> {
        match token {
            Token::NewList => {
                self.depth += 1;
                self.read_list(heap)
            }
            Token::EndList => {
                self.track(&token);
                Err(LispError::Syntax(String::from("Unmatched parenthesis.")))
            }
            Token::Quote => {
                let quoted = self.read_next(heap)?;
                let quote = heap.symbol("QUOTE");
                let rest = heap.cons(quoted, None);
                Ok(Some(heap.cons(Some(quote), Some(rest))))
            }
            Token::Dot => Err(LispError::Syntax(String::from("Unexpected dot."))),
            Token::LitInteger(value) => Ok(Some(heap.number(value))),
            Token::LitString(value) => Ok(Some(heap.string(value))),
            Token::Symbol(name) => Ok(Some(heap.symbol(name))),
            Token::UnterminatedString(_) => Err(LispError::Incomplete("Unmatched quotes.")),
            Token::BadInteger(literal) => Err(LispError::Syntax(format!(
                "Integer literal out of range: {}.",
                literal
            ))),
            Token::Illegal(ch) => Err(LispError::Syntax(format!("Illegal character: {}.", ch))),
            Token::Comment(_) | Token::Whitespace => {
                unreachable!("comments and whitespace are skipped by the lexer")
            }
        }
    }

    fn read_list(&mut self, heap: &mut Heap) -> Result<Value, LispError> {
        // Elements are held while the list is being read, so that they can be
        // released if the list turns out to be malformed.
        let mut items: Vec<Value> = Vec::new();
        let mut tail: Value = None;

        let outcome = loop {
            let token = match self.tokens.next() {
                Some(token) => token,
                None => break Err(LispError::Incomplete("Unmatched parenthesis.")),
            };
            match token {
                Token::EndList => {
                    self.track(&token);
                    break Ok(());
                }
                Token::Dot if !items.is_empty() => {
                    match self.read_next(heap) {
                        Ok(value) => tail = heap.grab(value),
                        Err(error) => break Err(error),
                    }
                    match self.tokens.next() {
                        Some(Token::EndList) => {
                            self.track(&Token::EndList);
                            break Ok(());
                        }
                        Some(token) => {
                            self.track(&token);
                            break Err(LispError::Syntax(String::from("Bad dotted list.")));
                        }
                        None => break Err(LispError::Incomplete("Unmatched parenthesis.")),
                    }
                }
                token => match self.read_datum(heap, token) {
                    Ok(value) => items.push(heap.grab(value)),
                    Err(error) => break Err(error),
                },
            }
        };

        let list = outcome.map(|()| {
            items
                .iter()
                .rev()
                .fold(tail, |tail, &head| Some(heap.cons(head, tail)))
        });
        for item in items {
            heap.release(item);
        }
        heap.release(tail);
        list
    }
}

/// Returns whether a piece of source text ends in the middle of a form
/// (inside a list, a string, or right after a quote).
pub fn needs_more_input(source: &str) -> bool {
    let mut depth: usize = 0;
    let mut pending_quote = false;
    for token in Lexer::new(source).skip_comments(true).skip_whitespace(true) {
        pending_quote = false;
        match token {
            Token::NewList => depth += 1,
            Token::EndList => depth = depth.saturating_sub(1),
            Token::Quote => pending_quote = true,
            Token::UnterminatedString(_) => return true,
            _ => {}
        }
    }
    depth > 0 || pending_quote
}
