use miette::SourceSpan;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.end - span.start).into()
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Token<'source> {
    pub kind: TokenKind,
    /// The slice of the expression this token was lexed from. Empty for `Eof`.
    pub text: &'source str,
    pub span: Span,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    Number,

    // Identifiers
    Identifier,

    // Operators
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Caret,

    // Punctuation
    OpenParen,
    CloseParen,

    Eof,
}
