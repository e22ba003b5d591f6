//! The calculator as a tool the chat model can call.
//!
//! The model sends `{"expression": "..."}` and gets back a line of text it can
//! quote to the user: `<expression> = <value>` on success, or
//! `Could not evaluate expression: <expression>` otherwise.

use miette::Diagnostic;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::error::EvalError;
use crate::parser::EvalOptions;
use crate::token::Span;

pub const TOOL_NAME: &str = "calculate";
pub const TOOL_DESCRIPTION: &str = "Evaluate an arithmetic expression. Supports + - * / ** ^, \
parentheses, the constants pi and e, and the functions sqrt, log, sin, cos, tan and abs.";

pub const DEFAULT_MAX_EXPRESSION_LEN: usize = 1000;

/// What the tool reports back: `{"value": 42.0}` or `{"invalid": true}`.
///
/// Infinite values are written as the strings `"Infinity"` and `"-Infinity"`,
/// since JSON has no number for them.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Value(f64),
    Invalid,
}

impl Outcome {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(value) => Some(*value),
            Self::Invalid => None,
        }
    }
}

impl Serialize for Outcome {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Value(value) if value.is_finite() => map.serialize_entry("value", value)?,
            Self::Value(value) => map.serialize_entry("value", &format_value(*value))?,
            Self::Invalid => map.serialize_entry("invalid", &true)?,
        }
        map.end()
    }
}

impl From<Result<f64, EvalError>> for Outcome {
    fn from(result: Result<f64, EvalError>) -> Self {
        match result {
            Ok(value) => Self::Value(value),
            Err(_) => Self::Invalid,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CalculateArgs {
    pub expression: String,
}

#[derive(Debug, Diagnostic, Error)]
pub enum ToolError {
    #[error("invalid arguments for the `calculate` tool")]
    #[diagnostic(
        code(calc::tool::invalid_arguments),
        help("expected an object with an `expression` string field")
    )]
    InvalidArguments(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct CalculatorTool {
    pub options: EvalOptions,
    /// Longer expressions are rejected before they reach the lexer.
    pub max_expression_len: usize,
}

impl Default for CalculatorTool {
    fn default() -> Self {
        Self {
            options: EvalOptions::default(),
            max_expression_len: DEFAULT_MAX_EXPRESSION_LEN,
        }
    }
}

impl CalculatorTool {
    pub fn new(options: EvalOptions, max_expression_len: usize) -> Self {
        Self {
            options,
            max_expression_len,
        }
    }

    pub fn evaluate(&self, expression: &str) -> Result<f64, EvalError> {
        let len = expression.len();
        if len > self.max_expression_len {
            tracing::warn!(len, limit = self.max_expression_len, "rejecting oversized expression");

            let cut = (0..=self.max_expression_len)
                .rev()
                .find(|&i| expression.is_char_boundary(i))
                .unwrap_or(0);
            return Err(EvalError::TooLong {
                len,
                limit: self.max_expression_len,
                span: Span::new(cut, len).into(),
            });
        }

        let result = crate::evaluate_with(expression, &self.options);
        match &result {
            Ok(value) => tracing::debug!(expression, value, "evaluated expression"),
            Err(e) => tracing::debug!(expression, error = %e, "could not evaluate expression"),
        }

        result
    }

    pub fn outcome(&self, expression: &str) -> Outcome {
        self.evaluate(expression).into()
    }

    /// The text handed back to the model.
    pub fn call(&self, expression: &str) -> String {
        reply(expression, &self.evaluate(expression))
    }

    /// Like [`CalculatorTool::call`], taking the raw JSON arguments of a tool call.
    pub fn call_json(&self, arguments: &str) -> Result<String, ToolError> {
        let args: CalculateArgs = serde_json::from_str(arguments).inspect_err(|e| {
            tracing::warn!(tool = TOOL_NAME, error = %e, "malformed tool arguments");
        })?;

        Ok(self.call(&args.expression))
    }
}

pub fn reply(expression: &str, result: &Result<f64, EvalError>) -> String {
    match result {
        Ok(value) => format!("{expression} = {}", format_value(*value)),
        Err(_) => format!("Could not evaluate expression: {expression}"),
    }
}

/// Formats a result the way the chat transcript shows numbers: whole numbers
/// without a fraction, infinities spelled out, and exponent notation with an
/// explicit sign (`1e+21`, `1e-7`) outside `1e-6 <= |value| < 1e21`.
pub fn format_value(value: f64) -> String {
    if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if value == 0.0 {
        // Also covers negative zero
        "0".to_string()
    } else if value.abs() >= 1e21 || value.abs() < 1e-6 {
        let formatted = format!("{value:e}");
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => formatted,
        }
    } else {
        value.to_string()
    }
}
