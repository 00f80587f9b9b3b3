use std::fmt::Display;

use miette::{NamedSource, SourceSpan};

use crate::{decimal::Decimal, error::EvalError};

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'de> {
    pub kind: TokenKind,
    pub literal: &'de str,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    LeftParen,
    RightParen,
    Minus,
    Plus,
    Star,
    Slash,
    Number(Decimal),
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lit = self.literal;
        match &self.kind {
            TokenKind::LeftParen => write!(f, "LEFT_PAREN {lit} null"),
            TokenKind::RightParen => write!(f, "RIGHT_PAREN {lit} null"),
            TokenKind::Minus => write!(f, "MINUS {lit} null"),
            TokenKind::Plus => write!(f, "PLUS {lit} null"),
            TokenKind::Star => write!(f, "STAR {lit} null"),
            TokenKind::Slash => write!(f, "SLASH {lit} null"),
            TokenKind::Number(n) => write!(f, "NUMBER {lit} {}", n.clone().normalized()),
        }
    }
}

pub struct Lexer<'de> {
    filename: Option<&'de str>,
    whole: &'de str,
    rest: &'de str,
    pub byte: usize,
}

impl<'de> Lexer<'de> {
    pub fn new(filename: Option<&'de str>, input: &'de str) -> Self {
        Lexer {
            filename,
            whole: input,
            rest: input,
            byte: 0,
        }
    }

    pub(crate) fn source(&self) -> NamedSource<String> {
        NamedSource::new(self.filename.unwrap_or("<input>"), self.whole.to_string())
    }
}

impl<'de> Iterator for Lexer<'de> {
    type Item = Result<Token<'de>, EvalError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut chars = self.rest.chars();
            let c = chars.next()?;
            let literal = &self.rest[..c.len_utf8()];
            let offset = self.byte;
            let cur = self.rest;
            self.rest = chars.as_str();
            self.byte += c.len_utf8();

            let process = |kind: TokenKind| Some(Ok(Token { kind, literal, offset }));

            match c {
                '(' => return process(TokenKind::LeftParen),
                ')' => return process(TokenKind::RightParen),
                '-' => return process(TokenKind::Minus),
                '+' => return process(TokenKind::Plus),
                '*' => return process(TokenKind::Star),
                '/' => return process(TokenKind::Slash),
                '0'..='9' | '.' => {}
                ' ' => continue,
                c => {
                    return Some(Err(EvalError::InvalidCharacter {
                        src: self.source(),
                        bad_bit: SourceSpan::from(offset..self.byte),
                        token: c,
                    }));
                }
            }

            let first_non_digit = cur
                .find(|c| !matches!(c, '0'..='9' | '.'))
                .unwrap_or(cur.len());

            let literal = &cur[..first_non_digit];

            let extra_bytes = literal.len() - c.len_utf8();
            self.byte += extra_bytes;
            self.rest = &self.rest[extra_bytes..];

            return Some(match literal.parse() {
                Ok(n) => Ok(Token {
                    kind: TokenKind::Number(n),
                    literal,
                    offset,
                }),
                Err(reason) => Err(EvalError::MalformedLiteral {
                    src: self.source(),
                    bad_bit: SourceSpan::from(offset..self.byte),
                    literal: literal.to_string(),
                    reason,
                }),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(None, input)
            .map(|token| token.expect("valid token").kind)
            .collect()
    }

    #[test]
    fn scans_operators_parens_and_numbers() {
        assert_eq!(
            kinds("4+2*(5-2)/1"),
            vec![
                TokenKind::Number(Decimal::from(4)),
                TokenKind::Plus,
                TokenKind::Number(Decimal::from(2)),
                TokenKind::Star,
                TokenKind::LeftParen,
                TokenKind::Number(Decimal::from(5)),
                TokenKind::Minus,
                TokenKind::Number(Decimal::from(2)),
                TokenKind::RightParen,
                TokenKind::Slash,
                TokenKind::Number(Decimal::from(1)),
            ]
        );
    }

    #[test]
    fn skips_spaces_and_keeps_offsets() {
        let tokens: Vec<_> = Lexer::new(None, "  12.50 *  3")
            .collect::<Result<_, _>>()
            .expect("valid input");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].literal, "12.50");
        assert_eq!(tokens[0].offset, 2);
        assert_eq!(tokens[1].offset, 8);
        assert_eq!(tokens[2].literal, "3");
        assert_eq!(tokens[2].offset, 11);
    }

    #[test]
    fn number_token_display_is_normalized() {
        let token = Lexer::new(None, "3.50")
            .next()
            .expect("one token")
            .expect("valid token");
        assert_eq!(token.to_string(), "NUMBER 3.50 3.5");
    }

    #[test]
    fn rejects_unknown_characters() {
        let mut lexer = Lexer::new(None, " 3 + a");
        assert!(lexer.next().expect("number").is_ok());
        assert!(lexer.next().expect("plus").is_ok());
        let err = lexer.next().expect("error").expect_err("invalid character");
        assert_eq!(err.kind(), ErrorKind::InvalidCharacter);
        assert_eq!(err.span().offset(), 5);
        assert!(matches!(err, EvalError::InvalidCharacter { token: 'a', .. }));
    }

    #[test]
    fn rejects_tabs_and_non_ascii_digits() {
        for input in ["1\t+ 2", "\u{0661} + \u{0662}"] {
            let err = Lexer::new(None, input)
                .find_map(Result::err)
                .expect("lexing fails");
            assert_eq!(err.kind(), ErrorKind::InvalidCharacter, "{input:?}");
        }
    }

    #[test]
    fn rejects_malformed_literals() {
        for input in ["1.2.3", ".", "2 + .."] {
            let err = Lexer::new(None, input)
                .find_map(Result::err)
                .expect("lexing fails");
            assert_eq!(err.kind(), ErrorKind::MalformedLiteral, "{input:?}");
        }
    }
}
