pub mod error;
pub mod lexer;
pub mod math;
pub mod parser;
pub mod token;
pub mod tool;

pub use error::EvalError;
pub use parser::{EvalOptions, Strictness};
pub use tool::{CalculatorTool, Outcome};

/// Evaluate an arithmetic expression with the default, lenient options.
pub fn evaluate(expression: &str) -> Result<f64, EvalError> {
    evaluate_with(expression, &EvalOptions::default())
}

pub fn evaluate_with(expression: &str, options: &EvalOptions) -> Result<f64, EvalError> {
    parser::Parser::new(expression, *options).parse()
}
