//! Tokenizer for `${ ... }` interpolations.

use crate::{Result, RuleError};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    // Literals
    Str(String),
    Number(f64),
    True,
    False,
    Ident(String),

    // Operators
    Plus,
    Bang,
    EqEq,      // ==
    EqEqEq,    // ===
    BangEq,    // !=
    BangEqEq,  // !==
    AmpAmp,    // &&
    PipePipe,  // ||
    Question,  // ?
    Colon,     // :
    Dot,

    // Grouping
    LParen,
    RParen,
    LBracket,
    RBracket,
    RBrace,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Byte offset into the format string.
    pub pos: usize,
}

/// Tokenize the interpolation starting at byte `start` (just after `${`).
///
/// Returns the tokens up to, but excluding, the closing `}` and the byte
/// offset immediately after it.
pub(crate) fn lex_interpolation(src: &str, start: usize) -> Result<(Vec<Token>, usize)> {
    let mut lexer = Lexer { src, pos: start };
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token().map_err(|e| match e {
            RuleError::Format { position, message } if position >= src.len() => {
                RuleError::Format {
                    position: start.saturating_sub(2),
                    message: format!("unterminated interpolation ({})", message),
                }
            }
            other => other,
        })?;

        if token.kind == TokenKind::RBrace {
            return Ok((tokens, lexer.pos));
        }
        tokens.push(token);
    }
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(offset)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, pos: usize, message: impl Into<String>) -> RuleError {
        RuleError::Format {
            position: pos,
            message: message.into(),
        }
    }

    fn next_token(&mut self) -> Result<Token> {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }

        let pos = self.pos;
        let Some(c) = self.bump() else {
            return Err(self.error(pos, "unexpected end of format string"));
        };

        let kind = match c {
            '}' => TokenKind::RBrace,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '+' => TokenKind::Plus,
            '?' => TokenKind::Question,
            ':' => TokenKind::Colon,
            '.' if !self.peek().is_some_and(|d| d.is_ascii_digit()) => TokenKind::Dot,
            '=' => {
                if self.peek() != Some('=') {
                    return Err(self.error(pos, "assignment is not allowed, use '=='"));
                }
                self.bump();
                if self.peek() == Some('=') {
                    self.bump();
                    TokenKind::EqEqEq
                } else {
                    TokenKind::EqEq
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.bump();
                    if self.peek() == Some('=') {
                        self.bump();
                        TokenKind::BangEqEq
                    } else {
                        TokenKind::BangEq
                    }
                } else {
                    TokenKind::Bang
                }
            }
            '&' if self.peek() == Some('&') => {
                self.bump();
                TokenKind::AmpAmp
            }
            '|' if self.peek() == Some('|') => {
                self.bump();
                TokenKind::PipePipe
            }
            '\'' | '"' => TokenKind::Str(self.string(c, pos)?),
            c if c.is_ascii_digit() || c == '.' => TokenKind::Number(self.number(pos)?),
            c if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
                let ident = self.identifier(pos);
                match ident.as_str() {
                    "true" => TokenKind::True,
                    "false" => TokenKind::False,
                    _ => TokenKind::Ident(ident),
                }
            }
            other => return Err(self.error(pos, format!("unexpected character '{}'", other))),
        };

        Ok(Token { kind, pos })
    }

    fn string(&mut self, quote: char, start: usize) -> Result<String> {
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error(self.src.len(), "unterminated string literal")),
                Some(c) if c == quote => return Ok(value),
                Some('\\') => match self.bump() {
                    Some(escaped) => value.push(unescape(escaped)),
                    None => {
                        return Err(self.error(start, "unterminated string literal"));
                    }
                },
                Some(c) => value.push(c),
            }
        }
    }

    fn number(&mut self, start: usize) -> Result<f64> {
        let mut seen_dot = self.src[start..].starts_with('.');
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.bump();
            } else if c == '.' && !seen_dot && self.peek_at(1).is_some_and(|d| d.is_ascii_digit()) {
                seen_dot = true;
                self.bump();
            } else {
                break;
            }
        }

        self.src[start..self.pos]
            .parse::<f64>()
            .map_err(|e| self.error(start, format!("invalid number: {}", e)))
    }

    fn identifier(&mut self, start: usize) -> String {
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        {
            self.bump();
        }
        self.src[start..self.pos].to_string()
    }
}

/// Character produced by `\c`: `n`, `t` and `r` are control characters,
/// anything else stands for itself.
pub(crate) fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        other => other,
    }
}
