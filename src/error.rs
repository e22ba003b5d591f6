use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Why an expression could not be evaluated.
///
/// Every variant points at the part of the expression that caused it, so a
/// [`miette::Report`] built with the expression as source code renders a
/// labeled snippet.
#[derive(Debug, Clone, PartialEq, Diagnostic, Error)]
pub enum EvalError {
    #[error("invalid number literal `{literal}`")]
    #[diagnostic(code(calc::invalid_number))]
    InvalidNumber {
        literal: String,
        #[label("not a number")]
        span: SourceSpan,
    },

    #[error("unknown identifier `{name}`")]
    #[diagnostic(code(calc::unknown_identifier), help("known constants are `pi` and `e`"))]
    UnknownIdentifier {
        name: String,
        #[label("not a constant")]
        span: SourceSpan,
    },

    #[error("unknown function `{name}`")]
    #[diagnostic(
        code(calc::unknown_function),
        help("known functions are sqrt, log, sin, cos, tan and abs")
    )]
    UnknownFunction {
        name: String,
        #[label("not a function")]
        span: SourceSpan,
    },

    #[error("unexpected token `{found}`")]
    #[diagnostic(code(calc::unexpected_token))]
    UnexpectedToken {
        found: String,
        #[label("expected a number, identifier, `-` or `(`")]
        span: SourceSpan,
    },

    #[error("unexpected end of input")]
    #[diagnostic(code(calc::unexpected_end_of_input))]
    UnexpectedEndOfInput {
        #[label("expected an operand")]
        span: SourceSpan,
    },

    #[error("expression does not evaluate to a number")]
    #[diagnostic(code(calc::not_a_number))]
    NotANumber {
        #[label("evaluates to NaN")]
        span: SourceSpan,
    },

    #[error("expression is nested more than {limit} levels deep")]
    #[diagnostic(code(calc::too_deep))]
    TooDeep {
        limit: usize,
        #[label("nesting limit reached here")]
        span: SourceSpan,
    },

    #[error("expression is {len} bytes long, the limit is {limit}")]
    #[diagnostic(code(calc::too_long))]
    TooLong {
        len: usize,
        limit: usize,
        #[label("cut off here")]
        span: SourceSpan,
    },

    #[error("unexpected character `{character}`")]
    #[diagnostic(code(calc::unexpected_character))]
    UnexpectedCharacter {
        character: String,
        #[label("not part of any token")]
        span: SourceSpan,
    },

    #[error("unclosed parenthesis")]
    #[diagnostic(code(calc::unclosed_paren))]
    UnclosedParen {
        #[label("expected `)` here")]
        span: SourceSpan,
    },

    #[error("unexpected input after the expression")]
    #[diagnostic(code(calc::trailing_input))]
    TrailingInput {
        #[label("expected an operator or end of input")]
        span: SourceSpan,
    },
}

impl EvalError {
    /// The part of the expression this error points at.
    pub fn span(&self) -> SourceSpan {
        match self {
            Self::InvalidNumber { span, .. }
            | Self::UnknownIdentifier { span, .. }
            | Self::UnknownFunction { span, .. }
            | Self::UnexpectedToken { span, .. }
            | Self::UnexpectedEndOfInput { span }
            | Self::NotANumber { span }
            | Self::TooDeep { span, .. }
            | Self::TooLong { span, .. }
            | Self::UnexpectedCharacter { span, .. }
            | Self::UnclosedParen { span }
            | Self::TrailingInput { span } => *span,
        }
    }
}
