use std::fmt::Display;

use thiserror::Error;

use crate::decimal::{DIVISION_SCALE, Decimal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Plus,
    Minus,
    Star,
    Slash,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("Cannot divide by zero")]
    DivisionByZero,
}

impl Op {
    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            Op::Plus | Op::Minus => 1,
            Op::Star | Op::Slash => 2,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Op::Plus => '+',
            Op::Minus => '-',
            Op::Star => '*',
            Op::Slash => '/',
        }
    }
}

impl Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Applies `op` to the left operand `a` and the right operand `b`.
///
/// Everything but division is exact. Division keeps [`DIVISION_SCALE`] fractional digits,
/// rounding half to even.
pub fn apply(op: Op, a: Decimal, b: Decimal) -> Result<Decimal, ArithmeticError> {
    Ok(match op {
        Op::Plus => a + b,
        Op::Minus => a - b,
        Op::Star => a * b,
        Op::Slash => a
            .div_rounded(&b, DIVISION_SCALE)
            .ok_or(ArithmeticError::DivisionByZero)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("valid literal")
    }

    #[test]
    fn operand_order_is_left_then_right() {
        assert_eq!(apply(Op::Minus, dec("10"), dec("2")), Ok(dec("8")));
        assert_eq!(apply(Op::Slash, dec("10"), dec("4")), Ok(dec("2.5")));
    }

    #[test]
    fn exact_operations() {
        assert_eq!(apply(Op::Plus, dec("0.1"), dec("0.2")), Ok(dec("0.3")));
        assert_eq!(apply(Op::Star, dec("1.1"), dec("1.1")), Ok(dec("1.21")));
    }

    #[test]
    fn division_keeps_four_digits() {
        let q = apply(Op::Slash, dec("1"), dec("7")).expect("non-zero divisor");
        assert_eq!(q.scale(), DIVISION_SCALE);
        assert_eq!(q.to_string(), "0.1429");
    }

    #[test]
    fn division_by_zero_fails() {
        assert_eq!(
            apply(Op::Slash, dec("3"), dec("0")),
            Err(ArithmeticError::DivisionByZero)
        );
        assert_eq!(
            apply(Op::Slash, dec("0"), dec("0.0")),
            Err(ArithmeticError::DivisionByZero)
        );
    }

    #[test]
    fn multiplicative_operators_bind_tighter() {
        assert!(Op::Star.precedence() > Op::Plus.precedence());
        assert_eq!(Op::Star.precedence(), Op::Slash.precedence());
        assert_eq!(Op::Plus.precedence(), Op::Minus.precedence());
    }
}
