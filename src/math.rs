use std::f64::consts;

use crate::token::TokenKind;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOperator {
    pub(crate) fn from(op: &TokenKind) -> Self {
        match op {
            TokenKind::Plus => Self::Add,
            TokenKind::Minus => Self::Sub,
            TokenKind::Star => Self::Mul,
            TokenKind::Slash => Self::Div,
            TokenKind::StarStar | TokenKind::Caret => Self::Pow,

            _ => unreachable!("BinaryOperator::from called with {op:?}"),
        }
    }

    /// Plain IEEE 754 arithmetic. Division by zero gives an infinity or NaN.
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Sub => lhs - rhs,
            Self::Mul => lhs * rhs,
            Self::Div => lhs / rhs,
            Self::Pow => lhs.powf(rhs),
        }
    }
}

impl TokenKind {
    // For easier matching
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::StarStar
                | TokenKind::Slash
                | TokenKind::Caret
        )
    }
}

/// Returns `(left, right)` binding powers of an infix operator.
///
/// An operator keeps extending the current expression while its left power is
/// strictly greater than the caller's minimum; its right operand is parsed with
/// the right power as the new minimum. Exponentiation has a right power below its
/// left power, which makes it right associative.
pub fn infix_binding_power(kind: &TokenKind) -> Option<(u8, u8)> {
    Some(match kind {
        TokenKind::Plus | TokenKind::Minus => (1, 1),
        TokenKind::Star | TokenKind::Slash => (2, 2),
        TokenKind::StarStar | TokenKind::Caret => (3, 2), // Right associative

        _ => return None,
    })
}

const CONSTANTS: &[(&str, f64)] = &[("pi", consts::PI), ("e", consts::E)];

/// Looks up a named constant. `name` must already be lowercase.
pub fn constant(name: &str) -> Option<f64> {
    CONSTANTS
        .iter()
        .find(|(constant, _)| *constant == name)
        .map(|(_, value)| *value)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Function {
    Sqrt,
    /// Natural logarithm
    Log,
    Sin,
    Cos,
    Tan,
    Abs,
}

impl Function {
    /// Looks up a unary function. `name` must already be lowercase.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sqrt" => Self::Sqrt,
            "log" => Self::Log,
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "abs" => Self::Abs,

            _ => return None,
        })
    }

    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Sqrt => x.sqrt(),
            Self::Log => x.ln(),
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Tan => x.tan(),
            Self::Abs => x.abs(),
        }
    }
}
