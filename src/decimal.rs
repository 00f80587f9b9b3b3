use std::{
    cmp::Ordering,
    fmt::Display,
    ops::{Add, Mul, Neg, Sub},
    str::FromStr,
};

use num_bigint::{BigInt, Sign};
use num_traits::{Signed, Zero};
use thiserror::Error;

/// Number of fractional digits kept by division.
pub const DIVISION_SCALE: u32 = 4;

/// An arbitrary-precision decimal number, `mantissa * 10^-scale`.
///
/// Equality and ordering are numeric, so `7.0 == 7` even though the two values carry
/// different scales.
#[derive(Debug, Clone)]
pub struct Decimal {
    mantissa: BigInt,
    scale: u32,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseDecimalError {
    #[error("literal has no digits")]
    NoDigits,
    #[error("literal has more than one decimal point")]
    MultiplePoints,
    #[error("unexpected character '{0}' in literal")]
    InvalidDigit(char),
}

fn pow10(exp: u32) -> BigInt {
    num_traits::pow(BigInt::from(10), exp as usize)
}

impl Decimal {
    pub fn new(mantissa: BigInt, scale: u32) -> Self {
        Decimal { mantissa, scale }
    }

    pub fn zero() -> Self {
        Decimal::new(BigInt::zero(), 0)
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    /// Rescales to `scale` fractional digits. Only ever widens, so no digits are lost.
    fn widen(&self, scale: u32) -> BigInt {
        debug_assert!(scale >= self.scale);
        &self.mantissa * pow10(scale - self.scale)
    }

    /// Both mantissas brought to the larger of the two scales.
    fn aligned(&self, other: &Decimal) -> (BigInt, BigInt, u32) {
        let scale = self.scale.max(other.scale);
        (self.widen(scale), other.widen(scale), scale)
    }

    /// Divides by `rhs`, keeping `scale` fractional digits and rounding half to even.
    ///
    /// Returns `None` when `rhs` is zero.
    pub fn div_rounded(&self, rhs: &Decimal, scale: u32) -> Option<Decimal> {
        if rhs.is_zero() {
            return None;
        }

        // self / rhs * 10^scale == (m1 * 10^(s2 + scale)) / (m2 * 10^s1)
        let numerator = &self.mantissa * pow10(rhs.scale + scale);
        let denominator = &rhs.mantissa * pow10(self.scale);

        let negative = numerator.is_negative() != denominator.is_negative();
        let numerator = numerator.abs();
        let denominator = denominator.abs();

        let mut quotient = &numerator / &denominator;
        let remainder = &numerator % &denominator;

        let twice: BigInt = remainder * 2u32;
        let round_up = match twice.cmp(&denominator) {
            Ordering::Greater => true,
            Ordering::Equal => !(&quotient % 2u32).is_zero(),
            Ordering::Less => false,
        };
        if round_up {
            quotient += 1u32;
        }
        if negative {
            quotient = -quotient;
        }

        Some(Decimal::new(quotient, scale))
    }

    /// Strips trailing fractional zeros: `7.0` becomes `7`, `0.1250` becomes `0.125`.
    pub fn normalized(mut self) -> Self {
        if self.mantissa.is_zero() {
            self.scale = 0;
            return self;
        }
        let digits = self.mantissa.magnitude().to_string();
        let zeros = digits.bytes().rev().take_while(|&b| b == b'0').count();
        let zeros = zeros.min(self.scale as usize) as u32;
        if zeros > 0 {
            self.mantissa /= pow10(zeros);
            self.scale -= zeros;
        }
        self
    }
}

impl From<i32> for Decimal {
    fn from(value: i32) -> Self {
        Decimal::new(BigInt::from(value), 0)
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    /// Parses an unsigned literal made of ASCII digits and at most one `.`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut digits = Vec::with_capacity(s.len());
        let mut scale = None;

        for c in s.chars() {
            match c {
                '0'..='9' => {
                    digits.push(c as u8);
                    if let Some(scale) = scale.as_mut() {
                        *scale += 1;
                    }
                }
                '.' if scale.is_none() => scale = Some(0u32),
                '.' => return Err(ParseDecimalError::MultiplePoints),
                c => return Err(ParseDecimalError::InvalidDigit(c)),
            }
        }

        if digits.is_empty() {
            return Err(ParseDecimalError::NoDigits);
        }

        let mantissa =
            BigInt::parse_bytes(&digits, 10).ok_or(ParseDecimalError::NoDigits)?;
        Ok(Decimal::new(mantissa, scale.unwrap_or(0)))
    }
}

impl Display for Decimal {
    /// Plain notation, never exponential.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.mantissa.sign() == Sign::Minus {
            write!(f, "-")?;
        }
        let digits = self.mantissa.magnitude().to_string();
        let scale = self.scale as usize;
        if scale == 0 {
            write!(f, "{digits}")
        } else if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{int}.{frac}")
        } else {
            write!(f, "0.{}{digits}", "0".repeat(scale - digits.len()))
        }
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (lhs, rhs, _) = self.aligned(other);
        lhs.cmp(&rhs)
    }
}

impl Add for Decimal {
    type Output = Decimal;

    fn add(self, rhs: Self) -> Self::Output {
        let (lhs, rhs, scale) = self.aligned(&rhs);
        Decimal::new(lhs + rhs, scale)
    }
}

impl Sub for Decimal {
    type Output = Decimal;

    fn sub(self, rhs: Self) -> Self::Output {
        let (lhs, rhs, scale) = self.aligned(&rhs);
        Decimal::new(lhs - rhs, scale)
    }
}

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Self::Output {
        Decimal::new(-self.mantissa, self.scale)
    }
}

impl Mul for Decimal {
    type Output = Decimal;

    fn mul(self, rhs: Self) -> Self::Output {
        Decimal::new(self.mantissa * rhs.mantissa, self.scale + rhs.scale)
    }
}
