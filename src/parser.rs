use miette::SourceSpan;

use crate::error::EvalError;
use crate::lexer::Lexer;
use crate::math::{self, infix_binding_power, BinaryOperator, Function};
use crate::token::{Span, Token, TokenKind};

pub const DEFAULT_MAX_DEPTH: usize = 256;

/// How forgiving the parser is about malformed input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Unknown characters are dropped, a missing `)` is assumed and anything
    /// after the first complete expression is ignored.
    #[default]
    Lenient,
    /// Each of those situations is reported as an error instead.
    Strict,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EvalOptions {
    pub strictness: Strictness,
    /// Maximum nesting of parentheses, function calls, unary minus and
    /// exponent chains.
    pub max_depth: usize,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            strictness: Strictness::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Evaluates an expression while parsing it; no syntax tree is built.
///
/// A parser is good for a single expression. The cursor only ever moves
/// forward and never past the trailing `Eof` token.
pub struct Parser<'source> {
    source: &'source str,
    tokens: Vec<Token<'source>>,
    skipped: Vec<Span>,
    position: usize,
    depth: usize,
    options: EvalOptions,
}

impl<'source> Parser<'source> {
    pub fn new(source: &'source str, options: EvalOptions) -> Self {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.by_ref().collect();
        let skipped = lexer.skipped().to_vec();

        Self {
            source,
            tokens,
            skipped,
            position: 0,
            depth: 0,
            options,
        }
    }

    pub fn parse(&mut self) -> Result<f64, EvalError> {
        let strict = self.options.strictness == Strictness::Strict;

        if strict {
            if let Some(span) = self.skipped.first() {
                return Err(EvalError::UnexpectedCharacter {
                    character: self.source[span.start..span.end].to_string(),
                    span: (*span).into(),
                });
            }
        }

        let value = self.parse_expression_within(0)?;

        // Ensure we've consumed all tokens
        let rest = self.peek();
        if strict && rest.kind != TokenKind::Eof {
            return Err(EvalError::TrailingInput {
                span: Span::new(rest.span.start, self.source.len()).into(),
            });
        }

        if value.is_nan() {
            return Err(EvalError::NotANumber {
                span: self.whole_expression(),
            });
        }

        Ok(value)
    }

    fn whole_expression(&self) -> SourceSpan {
        Span::new(0, self.source.len()).into()
    }

    fn peek(&self) -> Token<'source> {
        self.tokens[self.position]
    }

    fn next(&mut self) -> Token<'source> {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }

        token
    }

    pub fn parse_expression_within(&mut self, min_bp: u8) -> Result<f64, EvalError> {
        self.descend(|parser| parser.parse_binary(min_bp))
    }

    fn parse_binary(&mut self, min_bp: u8) -> Result<f64, EvalError> {
        let mut lhs = self.parse_primary()?;

        loop {
            let op = match self.peek() {
                token if token.kind.is_operator() => token,
                _ => break,
            };
            let Some((l_bp, r_bp)) = infix_binding_power(&op.kind) else {
                break;
            };
            if l_bp <= min_bp {
                break;
            }

            self.next();
            let rhs = self.parse_expression_within(r_bp)?;
            lhs = BinaryOperator::from(&op.kind).apply(lhs, rhs);
        }

        Ok(lhs)
    }

    /// Runs `f` one nesting level deeper, failing once `max_depth` is reached.
    fn descend<F>(&mut self, f: F) -> Result<f64, EvalError>
    where
        F: FnOnce(&mut Self) -> Result<f64, EvalError>,
    {
        if self.depth >= self.options.max_depth {
            return Err(EvalError::TooDeep {
                limit: self.options.max_depth,
                span: self.peek().span.into(),
            });
        }

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;

        result
    }

    pub fn parse_primary(&mut self) -> Result<f64, EvalError> {
        let token = self.next();
        match token.kind {
            TokenKind::Number => token
                .text
                .parse::<f64>()
                .map_err(|_| EvalError::InvalidNumber {
                    literal: token.text.to_string(),
                    span: token.span.into(),
                }),
            TokenKind::Minus => Ok(-self.descend(Self::parse_primary)?),
            TokenKind::OpenParen => {
                let value = self.parse_expression_within(0)?;
                self.expect_close_paren()?;
                Ok(value)
            }
            TokenKind::Identifier => self.parse_identifier(token),
            TokenKind::Eof => Err(EvalError::UnexpectedEndOfInput {
                span: token.span.into(),
            }),
            _ => Err(EvalError::UnexpectedToken {
                found: token.text.to_string(),
                span: token.span.into(),
            }),
        }
    }

    fn parse_identifier(&mut self, token: Token<'source>) -> Result<f64, EvalError> {
        let name = token.text.to_ascii_lowercase();
        if let Some(value) = math::constant(&name) {
            return Ok(value);
        }

        if self.peek().kind != TokenKind::OpenParen {
            return Err(EvalError::UnknownIdentifier {
                name: token.text.to_string(),
                span: token.span.into(),
            });
        }

        let Some(function) = Function::from_name(&name) else {
            return Err(EvalError::UnknownFunction {
                name: token.text.to_string(),
                span: token.span.into(),
            });
        };

        self.next();
        let argument = self.parse_expression_within(0)?;
        self.expect_close_paren()?;

        Ok(function.apply(argument))
    }

    fn expect_close_paren(&mut self) -> Result<(), EvalError> {
        let token = self.peek();
        if token.kind == TokenKind::CloseParen {
            self.next();
            return Ok(());
        }

        match self.options.strictness {
            Strictness::Strict => Err(EvalError::UnclosedParen {
                span: token.span.into(),
            }),
            Strictness::Lenient => {
                tracing::trace!(position = token.span.start, "assuming missing `)`");
                Ok(())
            }
        }
    }
}
