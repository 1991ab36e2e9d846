use crate::token::Token;

/// The lexer for rclisp.
pub struct Lexer {
    pub(crate) chars: Vec<char>,
    pub(crate) skip_comments: bool,
    pub(crate) skip_whitespace: bool,
}

impl Lexer {
    pub fn new<T: AsRef<str>>(input: T) -> Lexer {
        Lexer {
            chars: input.as_ref().chars().rev().collect(),
            skip_comments: false,
            skip_whitespace: false,
        }
    }

    pub fn skip_whitespace(mut self, value: bool) -> Lexer {
        self.skip_whitespace = value;
        self
    }

    pub fn skip_comments(mut self, value: bool) -> Lexer {
        self.skip_comments = value;
        self
    }

    /// Get the input that has not been consumed yet.
    pub fn text(self) -> String {
        self.chars.into_iter().rev().collect()
    }

    fn lex_string(&mut self) -> Token {
        let mut output = String::new();
        self.chars.pop();
        loop {
            let ch = match self.chars.pop() {
                Some(ch) => ch,
                None => break Token::UnterminatedString(output),
            };
            match ch {
                '"' => break Token::LitString(output),
                '\\' => match self.chars.pop() {
                    Some('n') => output.push('\n'),
                    Some('t') => output.push('\t'),
                    Some(ch) => output.push(ch),
                    None => break Token::UnterminatedString(output),
                },
                ch => output.push(ch),
            }
        }
    }

    fn lex_comment(&mut self) -> Option<Token> {
        let mut output = String::new();
        self.chars.pop()?;
        while let Some(ch) = self.chars.pop() {
            if ch == '\n' {
                break;
            }
            output.push(ch);
        }
        if self.skip_comments {
            self.next()
        } else {
            Some(Token::Comment(output))
        }
    }

    fn lex_atom(&mut self) -> Token {
        let mut atom = String::new();
        while let Some(ch) = self.chars.last().copied() {
            if !Lexer::is_constituent(ch) {
                break;
            }
            atom.push(ch);
            self.chars.pop();
        }

        if atom == "." {
            return Token::Dot;
        }

        let digits = atom.strip_prefix(|ch: char| ch == '+' || ch == '-').unwrap_or(&atom);
        if !digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_digit()) {
            return match atom.parse() {
                Ok(number) => Token::LitInteger(number),
                Err(_) => Token::BadInteger(atom),
            };
        }

        Token::Symbol(atom.to_uppercase())
    }

    fn is_delimiter(ch: char) -> bool {
        ch.is_whitespace() || matches!(ch, '(' | ')' | '\'' | '"' | ';')
    }

    fn is_constituent(ch: char) -> bool {
        !Lexer::is_delimiter(ch)
            && !ch.is_control()
            && !matches!(ch, '[' | ']' | '{' | '}' | '`' | ',')
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let peeked = self.chars.last().copied()?;
        match peeked {
            _ if peeked.is_whitespace() => {
                while matches!(self.chars.last(), Some(ch) if ch.is_whitespace()) {
                    self.chars.pop();
                }
                if self.skip_whitespace {
                    self.next()
                } else {
                    Some(Token::Whitespace)
                }
            }
            '(' => {
                self.chars.pop()?;
                Some(Token::NewList)
            }
            ')' => {
                self.chars.pop()?;
                Some(Token::EndList)
            }
            '\'' => {
                self.chars.pop()?;
                Some(Token::Quote)
            }
            '"' => Some(self.lex_string()),
            ';' => self.lex_comment(),
            _ if Lexer::is_constituent(peeked) => Some(self.lex_atom()),
            _ => {
                self.chars.pop()?;
                Some(Token::Illegal(peeked))
            }
        }
    }
}
