use std::{fmt::Display, str::FromStr};

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::decimal::ParseDecimalError;

/// Which side of a parenthesis pair is missing its partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paren {
    Open,
    Close,
}

impl Display for Paren {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Paren::Open => write!(f, "opening"),
            Paren::Close => write!(f, "closing"),
        }
    }
}

#[derive(Error, Debug, Diagnostic)]
pub enum EvalError {
    #[error("Unexpected character '{token}'")]
    #[diagnostic(
        code(decimal_eval::invalid_character),
        help("only digits, '.', '+', '-', '*', '/', parentheses and spaces are allowed")
    )]
    InvalidCharacter {
        #[source_code]
        src: NamedSource<String>,

        #[label("this character")]
        bad_bit: SourceSpan,

        token: char,
    },

    #[error("Malformed numeric literal `{literal}`: {reason}")]
    #[diagnostic(
        code(decimal_eval::malformed_literal),
        help("a number is a run of digits with at most one decimal point")
    )]
    MalformedLiteral {
        #[source_code]
        src: NamedSource<String>,

        #[label("this numeric literal")]
        bad_bit: SourceSpan,

        literal: String,
        reason: ParseDecimalError,
    },

    #[error("Unmatched {paren} parenthesis")]
    #[diagnostic(code(decimal_eval::unmatched_paren))]
    UnmatchedParen {
        #[source_code]
        src: NamedSource<String>,

        #[label("this parenthesis has no partner")]
        bad_bit: SourceSpan,

        paren: Paren,
    },

    #[error("Missing operand for '{op}'")]
    #[diagnostic(
        code(decimal_eval::missing_operand),
        help("every operator needs a value on both sides")
    )]
    MissingOperand {
        #[source_code]
        src: NamedSource<String>,

        #[label("this operator")]
        bad_bit: SourceSpan,

        op: char,
    },

    #[error("Value is not joined to the rest of the expression")]
    #[diagnostic(
        code(decimal_eval::dangling_operand),
        help("put an operator between adjacent values")
    )]
    DanglingOperand {
        #[source_code]
        src: NamedSource<String>,

        #[label("this value")]
        bad_bit: SourceSpan,
    },

    #[error("Nothing to evaluate")]
    #[diagnostic(code(decimal_eval::empty_expression))]
    EmptyExpression {
        #[source_code]
        src: NamedSource<String>,

        #[label("expected a number here")]
        bad_bit: SourceSpan,
    },

    #[error("Division by zero")]
    #[diagnostic(code(decimal_eval::division_by_zero))]
    DivisionByZero {
        #[source_code]
        src: NamedSource<String>,

        #[label("this evaluates to zero")]
        bad_bit: SourceSpan,
    },
}

/// The failure category of an [`EvalError`], without its diagnostic payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidCharacter,
    MalformedLiteral,
    UnmatchedParen,
    MissingOperand,
    DanglingOperand,
    EmptyExpression,
    DivisionByZero,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 7] = [
        ErrorKind::InvalidCharacter,
        ErrorKind::MalformedLiteral,
        ErrorKind::UnmatchedParen,
        ErrorKind::MissingOperand,
        ErrorKind::DanglingOperand,
        ErrorKind::EmptyExpression,
        ErrorKind::DivisionByZero,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidCharacter => "invalid-character",
            ErrorKind::MalformedLiteral => "malformed-literal",
            ErrorKind::UnmatchedParen => "unmatched-paren",
            ErrorKind::MissingOperand => "missing-operand",
            ErrorKind::DanglingOperand => "dangling-operand",
            ErrorKind::EmptyExpression => "empty-expression",
            ErrorKind::DivisionByZero => "division-by-zero",
        }
    }

    /// Arithmetic failures, as opposed to input that is not a well-formed expression.
    pub fn is_arithmetic(self) -> bool {
        matches!(self, ErrorKind::DivisionByZero)
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown error kind `{0}`")]
pub struct UnknownErrorKind(pub String);

impl FromStr for ErrorKind {
    type Err = UnknownErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownErrorKind(s.to_string()))
    }
}

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::InvalidCharacter { .. } => ErrorKind::InvalidCharacter,
            EvalError::MalformedLiteral { .. } => ErrorKind::MalformedLiteral,
            EvalError::UnmatchedParen { .. } => ErrorKind::UnmatchedParen,
            EvalError::MissingOperand { .. } => ErrorKind::MissingOperand,
            EvalError::DanglingOperand { .. } => ErrorKind::DanglingOperand,
            EvalError::EmptyExpression { .. } => ErrorKind::EmptyExpression,
            EvalError::DivisionByZero { .. } => ErrorKind::DivisionByZero,
        }
    }

    fn parts(&self) -> (&NamedSource<String>, SourceSpan) {
        match self {
            EvalError::InvalidCharacter { src, bad_bit, .. }
            | EvalError::MalformedLiteral { src, bad_bit, .. }
            | EvalError::UnmatchedParen { src, bad_bit, .. }
            | EvalError::MissingOperand { src, bad_bit, .. }
            | EvalError::DanglingOperand { src, bad_bit }
            | EvalError::EmptyExpression { src, bad_bit }
            | EvalError::DivisionByZero { src, bad_bit } => (src, *bad_bit),
        }
    }

    /// Byte range of the input the error points at.
    pub fn span(&self) -> SourceSpan {
        self.parts().1
    }

    /// 1-based line of the offending input.
    pub fn line(&self) -> usize {
        let (src, span) = self.parts();
        src.inner()[..span.offset()].matches('\n').count() + 1
    }
}
