use crate::token::{Span, Token, TokenKind};

/// Splits an expression into tokens.
///
/// The lexer never fails: characters it does not recognise are dropped and
/// remembered in [`Lexer::skipped`]. The last token produced is always a
/// single `Eof`, after which the iterator is exhausted.
pub struct Lexer<'source> {
    source: &'source str,
    rest: &'source str,
    position: usize,
    skipped: Vec<Span>,
    finished: bool,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            rest: source,
            position: 0,
            skipped: Vec::new(),
            finished: false,
        }
    }

    /// Spans of the characters dropped so far because they start no token.
    pub fn skipped(&self) -> &[Span] {
        &self.skipped
    }
}

/// Lex a whole expression. The returned vector always ends in exactly one `Eof`.
pub fn tokenize(expression: &str) -> Vec<Token<'_>> {
    Lexer::new(expression).collect()
}

enum State {
    Number,
    Ident,
}

macro_rules! token {
    ($kind:ident, $start:ident, $self:ident) => {
        return Some(Token {
            kind: TokenKind::$kind,
            text: &$self.source[$start..$self.position],
            span: Span {
                start: $start,
                end: $self.position,
            },
        })
    };
}

impl<'source> Iterator for Lexer<'source> {
    type Item = Token<'source>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let mut chars = self.rest.chars();
            let c_start = self.position;
            let Some(c) = chars.next() else {
                self.finished = true;
                return Some(Token {
                    kind: TokenKind::Eof,
                    text: &self.source[c_start..],
                    span: Span::new(c_start, c_start),
                });
            };

            self.rest = chars.as_str();
            self.position += c.len_utf8();

            let state = match c {
                '+' => token!(Plus, c_start, self),
                '-' => token!(Minus, c_start, self),
                '*' => {
                    if self.rest.starts_with('*') {
                        self.position += 1;
                        self.rest = &self.rest[1..];
                        token!(StarStar, c_start, self)
                    }

                    token!(Star, c_start, self)
                }
                '/' => token!(Slash, c_start, self),
                '^' => token!(Caret, c_start, self),
                '(' => token!(OpenParen, c_start, self),
                ')' => token!(CloseParen, c_start, self),

                '0'..='9' | '.' => State::Number,
                'a'..='z' | 'A'..='Z' | '_' => State::Ident,

                c if c.is_whitespace() => continue,

                _ => {
                    self.skipped.push(Span::new(c_start, self.position));
                    continue;
                }
            };

            break Some(match state {
                // Any number of dots is accepted here; the parser decides whether
                // the literal is a valid float.
                State::Number => {
                    self.eat_while(c_start, TokenKind::Number, |c| c.is_ascii_digit() || c == '.')
                }
                State::Ident => self.eat_while(c_start, TokenKind::Identifier, |c| {
                    c.is_ascii_alphanumeric() || c == '_'
                }),
            });
        }
    }
}

impl<'source> Lexer<'source> {
    fn eat_while<F>(&mut self, start: usize, kind: TokenKind, matcher: F) -> Token<'source>
    where
        F: Fn(char) -> bool,
    {
        let len = self
            .rest
            .find(|c: char| !matcher(c))
            .unwrap_or(self.rest.len());
        self.position += len;
        self.rest = &self.rest[len..];

        Token {
            kind,
            text: &self.source[start..self.position],
            span: Span::new(start, self.position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    fn texts(input: &str) -> Vec<&str> {
        tokenize(input).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_operators() {
        use TokenKind::*;

        assert_eq!(
            kinds("+ - * / ^ ** ( )"),
            vec![Plus, Minus, Star, Slash, Caret, StarStar, OpenParen, CloseParen, Eof]
        );

        // `***` is a power operator followed by a multiplication
        assert_eq!(kinds("2***3"), vec![Number, StarStar, Star, Number, Eof]);
    }

    #[test]
    fn test_numbers() {
        for (input, expected) in [
            ("3", "3"),
            ("345", "345"),
            ("3.25", "3.25"),
            (".5", ".5"),
            ("7.", "7."),
            ("1.2.3", "1.2.3"),
        ] {
            let tokens = tokenize(input);
            assert_eq!(tokens.len(), 2, "when lexing '{input}'");
            assert_eq!(tokens[0].kind, TokenKind::Number, "when lexing '{input}'");
            assert_eq!(tokens[0].text, expected, "when lexing '{input}'");
        }
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(texts("sqrt(x_1)"), vec!["sqrt", "(", "x_1", ")", ""]);
        assert_eq!(texts("_Pi2"), vec!["_Pi2", ""]);

        // Digits followed by letters are a number and an identifier
        assert_eq!(
            kinds("2pi"),
            vec![TokenKind::Number, TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn test_skips_unknown_characters() {
        let mut lexer = Lexer::new("  2 $ + 3 ");
        let tokens: Vec<_> = lexer.by_ref().collect();
        assert_eq!(
            tokens.iter().map(|t| t.text).collect::<Vec<_>>(),
            vec!["2", "+", "3", ""]
        );
        assert_eq!(lexer.skipped(), &[Span::new(4, 5)]);

        // Multi-byte characters are skipped whole
        let mut lexer = Lexer::new("2×3");
        let tokens: Vec<_> = lexer.by_ref().collect();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].span, Span::new(3, 4));
        assert_eq!(lexer.skipped(), &[Span::new(1, 3)]);
    }

    #[test]
    fn test_always_ends_in_single_eof() {
        for input in ["", "   ", "$$$", "1 + 2", "((("] {
            let tokens = tokenize(input);
            let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
            assert_eq!(eofs, 1, "when lexing '{input}'");
            assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        }

        let mut lexer = Lexer::new("1");
        assert!(lexer.next().is_some());
        assert!(lexer.next().is_some());
        assert!(lexer.next().is_none());
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_spans() {
        let tokens = tokenize("12 ** x");
        assert_eq!(tokens[0].span, Span::new(0, 2));
        assert_eq!(tokens[1].span, Span::new(3, 5));
        assert_eq!(tokens[2].span, Span::new(6, 7));
        assert_eq!(tokens[3].span, Span::new(7, 7));
    }
}
