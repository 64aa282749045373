//! Pratt parser for format expressions.

use super::lexer::{lex_interpolation, unescape, Token, TokenKind};
use crate::constants::MAX_EXPRESSION_DEPTH;
use crate::{Result, RuleError};

/// The three values a format expression can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Match groups of the rule's name pattern.
    Name,
    /// Match groups of the rule's type pattern.
    Type,
    /// The parameter's raw value.
    Value,
}

impl Binding {
    fn from_ident(ident: &str) -> Option<Self> {
        match ident {
            "name" => Some(Binding::Name),
            "type" => Some(Binding::Type),
            "value" => Some(Binding::Value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Concat,
    LooseEq,
    LooseNotEq,
    StrictEq,
    StrictNotEq,
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    StringLiteral(String),
    NumberLiteral(f64),
    BooleanLiteral(bool),
    Variable(Binding),
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    Length(Box<Expr>),
    Not(Box<Expr>),
    Binary {
        operator: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
}

/// A piece of a parsed format string.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Literal(String),
    Interpolation(Expr),
}

/// Split a format string into literal text and `${ expr }` interpolations.
///
/// A backslash in literal text escapes the following character, so `\${`
/// produces a literal `${`; `\n`, `\t` and `\r` are a newline, a tab and a
/// carriage return.
pub(crate) fn parse_segments(src: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = src.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, escaped)) => literal.push(unescape(escaped)),
                None => literal.push('\\'),
            },
            '$' if chars.peek().map(|(_, next)| *next) == Some('{') => {
                let (tokens, end) = lex_interpolation(src, pos + 2)?;
                let mut parser = ExprParser::new(tokens, pos);
                let expr = parser.parse_complete()?;

                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Interpolation(expr));

                while chars.peek().is_some_and(|(i, _)| *i < end) {
                    chars.next();
                }
            }
            other => literal.push(other),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

// Binding powers (higher binds tighter)
const BP_CONDITIONAL: u8 = 2; // ? :
const BP_OR: u8 = 4; // ||
const BP_AND: u8 = 6; // &&
const BP_EQUALITY: u8 = 8; // == != === !==
const BP_ADDITIVE: u8 = 12; // +
const BP_UNARY: u8 = 16; // !

struct ExprParser {
    tokens: Vec<Token>,
    pos: usize,
    /// Offset of the `${` that opened this interpolation.
    start: usize,
    depth: usize,
}

impl ExprParser {
    fn new(tokens: Vec<Token>, start: usize) -> Self {
        ExprParser {
            tokens,
            pos: 0,
            start,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn current_pos(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.start, |t| t.pos)
    }

    fn error(&self, message: impl Into<String>) -> RuleError {
        RuleError::Format {
            position: self.current_pos(),
            message: message.into(),
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<()> {
        match self.peek() {
            Some(k) if *k == kind => {
                self.advance();
                Ok(())
            }
            _ => Err(self.error(format!("expected {}", what))),
        }
    }

    fn parse_complete(&mut self) -> Result<Expr> {
        if self.tokens.is_empty() {
            return Err(self.error("empty interpolation"));
        }
        let expr = self.parse_expr(0)?;
        if self.pos < self.tokens.len() {
            return Err(self.error("unexpected token after expression"));
        }
        Ok(expr)
    }

    fn parse_expr(&mut self, min_bp: u8) -> Result<Expr> {
        self.depth += 1;
        if self.depth > MAX_EXPRESSION_DEPTH {
            return Err(self.error(format!(
                "expression nested deeper than {} levels",
                MAX_EXPRESSION_DEPTH
            )));
        }

        let mut left = self.parse_prefix()?;

        loop {
            let Some(kind) = self.peek() else { break };
            let Some(l_bp) = infix_bp(kind) else { break };
            if l_bp < min_bp {
                break;
            }

            if *kind == TokenKind::Question {
                self.advance();
                let then_branch = self.parse_expr(0)?;
                self.expect(TokenKind::Colon, "':' in conditional expression")?;
                let else_branch = self.parse_expr(BP_CONDITIONAL)?;
                left = Expr::Conditional {
                    condition: Box::new(left),
                    then_branch: Box::new(then_branch),
                    else_branch: Box::new(else_branch),
                };
                continue;
            }

            let operator = match kind {
                TokenKind::Plus => BinaryOperator::Concat,
                TokenKind::EqEq => BinaryOperator::LooseEq,
                TokenKind::BangEq => BinaryOperator::LooseNotEq,
                TokenKind::EqEqEq => BinaryOperator::StrictEq,
                TokenKind::BangEqEq => BinaryOperator::StrictNotEq,
                TokenKind::AmpAmp => BinaryOperator::And,
                TokenKind::PipePipe => BinaryOperator::Or,
                _ => return Err(self.error("unexpected infix operator")),
            };
            self.advance();

            let right = self.parse_expr(l_bp + 1)?;
            left = Expr::Binary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        self.depth -= 1;
        Ok(left)
    }

    fn parse_prefix(&mut self) -> Result<Expr> {
        let token = self
            .advance()
            .ok_or_else(|| self.error("unexpected end of expression"))?;

        let expr = match token.kind {
            TokenKind::Str(s) => Expr::StringLiteral(s),
            TokenKind::Number(n) => Expr::NumberLiteral(n),
            TokenKind::True => Expr::BooleanLiteral(true),
            TokenKind::False => Expr::BooleanLiteral(false),
            TokenKind::Ident(ident) => match Binding::from_ident(&ident) {
                Some(binding) => Expr::Variable(binding),
                None => {
                    return Err(RuleError::Format {
                        position: token.pos,
                        message: format!(
                            "unknown identifier '{}' (only name, type and value are available)",
                            ident
                        ),
                    })
                }
            },
            TokenKind::Bang => {
                let operand = self.parse_expr(BP_UNARY)?;
                return Ok(Expr::Not(Box::new(operand)));
            }
            TokenKind::LParen => {
                let inner = self.parse_expr(0)?;
                self.expect(TokenKind::RParen, "')'")?;
                inner
            }
            other => {
                return Err(RuleError::Format {
                    position: token.pos,
                    message: format!("unexpected token {:?}", other),
                })
            }
        };

        self.parse_postfix(expr)
    }

    /// Indexing (`x[i]`) and `.length`, which bind tighter than any operator.
    fn parse_postfix(&mut self, mut expr: Expr) -> Result<Expr> {
        loop {
            match self.peek() {
                Some(TokenKind::LBracket) => {
                    self.advance();
                    let index = self.parse_expr(0)?;
                    self.expect(TokenKind::RBracket, "']'")?;
                    expr = Expr::Index {
                        target: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                Some(TokenKind::Dot) => {
                    self.advance();
                    match self.advance() {
                        Some(Token {
                            kind: TokenKind::Ident(property),
                            ..
                        }) if property == "length" => {
                            expr = Expr::Length(Box::new(expr));
                        }
                        Some(token) => {
                            return Err(RuleError::Format {
                                position: token.pos,
                                message: "only '.length' is supported after '.'".to_string(),
                            })
                        }
                        None => return Err(self.error("expected property name after '.'")),
                    }
                }
                _ => return Ok(expr),
            }
        }
    }
}

/// Left binding power of an infix operator, or None if not infix.
fn infix_bp(kind: &TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Question => Some(BP_CONDITIONAL),
        TokenKind::PipePipe => Some(BP_OR),
        TokenKind::AmpAmp => Some(BP_AND),
        TokenKind::EqEq | TokenKind::BangEq | TokenKind::EqEqEq | TokenKind::BangEqEq => {
            Some(BP_EQUALITY)
        }
        TokenKind::Plus => Some(BP_ADDITIVE),
        _ => None,
    }
}
