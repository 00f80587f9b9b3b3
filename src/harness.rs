//! Case-file runner used by the `check` command.
//!
//! A case file has one `expression,expected` pair per line, split at the last comma. Blank
//! lines and lines starting with `#` are skipped. `expected` is either a decimal literal,
//! optionally negative, compared numerically with the result, or `!` followed by an error
//! kind name such as `!division-by-zero`.

use std::fmt::Display;

use thiserror::Error;

use crate::{
    decimal::{Decimal, ParseDecimalError},
    error::{ErrorKind, EvalError, UnknownErrorKind},
    evaluate,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Expected {
    Value(Decimal),
    Error(ErrorKind),
}

impl Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Value(value) => write!(f, "{value}"),
            Expected::Error(kind) => write!(f, "!{kind}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Case<'a> {
    pub line: usize,
    pub expression: &'a str,
    pub expected: Expected,
}

#[derive(Error, Debug, PartialEq)]
pub enum CaseFileError {
    #[error("line {line}: expected `expression,expected`")]
    MissingSeparator { line: usize },
    #[error("line {line}: bad expected value `{text}`: {reason}")]
    BadValue {
        line: usize,
        text: String,
        reason: ParseDecimalError,
    },
    #[error("line {line}: {reason}")]
    BadErrorKind {
        line: usize,
        reason: UnknownErrorKind,
    },
}

/// Expected results may be negative, unlike the literals of an expression.
fn parse_value(text: &str) -> Result<Decimal, ParseDecimalError> {
    match text.strip_prefix('-') {
        Some(magnitude) => magnitude.parse().map(|value: Decimal| -value),
        None => text.parse(),
    }
}

pub fn parse_cases(src: &str) -> Result<Vec<Case<'_>>, CaseFileError> {
    let mut cases = Vec::new();
    for (index, text) in src.lines().enumerate() {
        let line = index + 1;
        if text.trim().is_empty() || text.trim_start().starts_with('#') {
            continue;
        }

        let (expression, expected) = text
            .rsplit_once(',')
            .ok_or(CaseFileError::MissingSeparator { line })?;
        let expected = expected.trim();

        let expected = match expected.strip_prefix('!') {
            Some(kind) => Expected::Error(
                kind.parse()
                    .map_err(|reason| CaseFileError::BadErrorKind { line, reason })?,
            ),
            None => Expected::Value(parse_value(expected).map_err(|reason| {
                CaseFileError::BadValue {
                    line,
                    text: expected.to_string(),
                    reason,
                }
            })?),
        };

        cases.push(Case {
            line,
            expression,
            expected,
        });
    }
    Ok(cases)
}

#[derive(Debug)]
pub enum Outcome<'a> {
    Correct,
    WrongValue { case: &'a Case<'a>, got: Decimal },
    UnexpectedError { case: &'a Case<'a>, error: EvalError },
    MissingError { case: &'a Case<'a>, got: Decimal },
    WrongError { case: &'a Case<'a>, got: EvalError },
}

impl Outcome<'_> {
    pub fn is_correct(&self) -> bool {
        matches!(self, Outcome::Correct)
    }
}

impl<'a> Case<'a> {
    pub fn check(&'a self) -> Outcome<'a> {
        match (evaluate(self.expression), &self.expected) {
            (Ok(got), Expected::Value(want)) if got == *want => Outcome::Correct,
            (Ok(got), Expected::Value(_)) => Outcome::WrongValue { case: self, got },
            (Ok(got), Expected::Error(_)) => Outcome::MissingError { case: self, got },
            (Err(error), Expected::Error(kind)) if error.kind() == *kind => Outcome::Correct,
            (Err(got), Expected::Error(_)) => Outcome::WrongError { case: self, got },
            (Err(error), Expected::Value(_)) => Outcome::UnexpectedError { case: self, error },
        }
    }
}

impl Display for Outcome<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Correct => write!(f, "CORRECT!"),
            Outcome::WrongValue { case, got } | Outcome::MissingError { case, got } => write!(
                f,
                "{} should be evaluated to {}, but was {got}",
                case.expression, case.expected
            ),
            Outcome::UnexpectedError { case, error: got } | Outcome::WrongError { case, got } => {
                write!(
                    f,
                    "{} should be evaluated to {}, but failed with !{}: {got}",
                    case.expression,
                    case.expected,
                    got.kind()
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASES: &str = "\
# arithmetic
 3 + 4,7
 222 * ( 2 + 5 ) / 14,111.0

3 / 0,!division-by-zero
";

    #[test]
    fn parses_values_errors_and_skips_comments() {
        let cases = parse_cases(CASES).expect("valid case file");
        assert_eq!(cases.len(), 3);
        assert_eq!(cases[0].line, 2);
        assert_eq!(cases[0].expression, " 3 + 4");
        assert_eq!(cases[0].expected, Expected::Value(Decimal::from(7)));
        assert_eq!(cases[2].line, 5);
        assert_eq!(cases[2].expected, Expected::Error(ErrorKind::DivisionByZero));
    }

    #[test]
    fn every_case_passes() {
        let cases = parse_cases(CASES).expect("valid case file");
        for case in &cases {
            let outcome = case.check();
            assert!(outcome.is_correct(), "{outcome}");
        }
    }

    #[test]
    fn reports_mismatches() {
        let cases = parse_cases("1 + 1,3\n1 / 0,2\n1 + 1,!division-by-zero\n1 +,!unmatched-paren")
            .expect("valid case file");
        let lines: Vec<_> = cases.iter().map(|case| case.check().to_string()).collect();
        assert_eq!(lines[0], "1 + 1 should be evaluated to 3, but was 2");
        assert_eq!(
            lines[1],
            "1 / 0 should be evaluated to 2, but failed with !division-by-zero: Division by zero"
        );
        assert_eq!(
            lines[2],
            "1 + 1 should be evaluated to !division-by-zero, but was 2"
        );
        assert_eq!(
            lines[3],
            "1 + should be evaluated to !unmatched-paren, but failed with !missing-operand: Missing operand for '+'"
        );
    }

    #[test]
    fn negative_expected_values() {
        let cases = parse_cases("1 - 3,-2\n(0 - 3) / 32,-0.0938\n3 - 1,-2")
            .expect("valid case file");
        assert_eq!(cases[0].expected, Expected::Value(Decimal::from(-2)));
        assert_eq!(cases[0].expected.to_string(), "-2");
        assert!(cases[0].check().is_correct());
        assert!(cases[1].check().is_correct());
        assert_eq!(
            cases[2].check().to_string(),
            "3 - 1 should be evaluated to -2, but was 2"
        );
        assert!(matches!(
            parse_cases("1 - 3,--2"),
            Err(CaseFileError::BadValue { line: 1, .. })
        ));
    }

    #[test]
    fn rejects_malformed_case_lines() {
        assert_eq!(
            parse_cases("3 + 4"),
            Err(CaseFileError::MissingSeparator { line: 1 })
        );
        assert!(matches!(
            parse_cases("\n3 + 4,seven"),
            Err(CaseFileError::BadValue { line: 2, .. })
        ));
        assert!(matches!(
            parse_cases("3 / 0,!oops"),
            Err(CaseFileError::BadErrorKind { line: 1, .. })
        ));
    }
}
