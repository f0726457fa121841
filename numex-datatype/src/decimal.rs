//! Fixed-point decimal bounded to 65 significant digits and 30 digits
//! after the point.
//!
//! Arithmetic never fails: each operation returns the computed value
//! together with a [`DecimalStatus`]. Callers decide which status is fatal.
use crate::{DECIMAL_MAX_PRECISION, DECIMAL_MAX_SCALE};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Outcome of a decimal operation, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DecimalStatus {
    Ok,
    /// Digits were dropped but the value is still meaningful.
    Truncated,
    Overflow,
    DivisionByZero,
    BadNumber,
}

impl DecimalStatus {
    /// Returns the more severe one of two statuses.
    #[inline]
    pub fn merge(self, other: DecimalStatus) -> DecimalStatus {
        self.max(other)
    }

    /// Whether the value must not be used.
    #[inline]
    pub fn is_fatal(self) -> bool {
        self >= DecimalStatus::Overflow
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundMode {
    /// Round half away from zero.
    HalfUp,
    /// Round toward zero.
    Truncate,
    Ceiling,
    Floor,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid decimal literal '{0}'")]
pub struct ParseDecimalError(pub String);

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Decimal(BigDecimal);

impl Default for Decimal {
    fn default() -> Self {
        Decimal::zero()
    }
}

impl Decimal {
    #[inline]
    pub fn zero() -> Self {
        Decimal(BigDecimal::zero())
    }

    /// Builds a decimal from unscaled digits and scale.
    #[inline]
    pub fn from_parts(digits: BigInt, scale: u8) -> Self {
        Decimal(BigDecimal::new(digits, scale as i64))
    }

    #[inline]
    pub fn from_i64(v: i64) -> Self {
        Decimal::from_parts(BigInt::from(v), 0)
    }

    #[inline]
    pub fn from_u64(v: u64) -> Self {
        Decimal::from_parts(BigInt::from(v), 0)
    }

    /// Converts a double using its shortest round-trip representation.
    pub fn from_f64(v: f64) -> (Self, DecimalStatus) {
        if !v.is_finite() {
            return (Decimal::zero(), DecimalStatus::Overflow);
        }
        match BigDecimal::from_str(&format!("{}", v)) {
            Ok(bd) => {
                let (digits, exp) = bd.as_bigint_and_exponent();
                Decimal::checked(digits, exp)
            }
            Err(_) => (Decimal::zero(), DecimalStatus::BadNumber),
        }
    }

    /// Parses a complete decimal literal, e.g. "-12.50" or "1.5e3".
    pub fn parse(s: &str) -> (Self, DecimalStatus) {
        let s = s.trim();
        match BigDecimal::from_str(s) {
            Ok(bd) => {
                let (digits, exp) = bd.as_bigint_and_exponent();
                if exp < -(DECIMAL_MAX_PRECISION as i64) {
                    // too many integer digits, avoid materializing the power
                    let v = if digits.is_zero() {
                        Decimal::zero()
                    } else {
                        Decimal::max_value(DECIMAL_MAX_PRECISION, 0).with_sign(digits.is_negative())
                    };
                    let status = if digits.is_zero() {
                        DecimalStatus::Ok
                    } else {
                        DecimalStatus::Overflow
                    };
                    return (v, status);
                }
                if exp > DECIMAL_MAX_PRECISION as i64 * 4
                    && (digit_count(&digits) as i64) < exp - DECIMAL_MAX_SCALE as i64
                {
                    return (Decimal::zero(), DecimalStatus::Truncated);
                }
                Decimal::checked(digits, exp)
            }
            Err(_) => (Decimal::zero(), DecimalStatus::BadNumber),
        }
    }

    /// Largest decimal with given precision and scale.
    pub fn max_value(precision: u8, scale: u8) -> Self {
        let digits = pow10(precision as usize) - BigInt::one();
        Decimal::from_parts(digits, scale)
    }

    /// Validates digits and scale against decimal bounds.
    ///
    /// Extra fractional digits are rounded off and reported as truncation,
    /// extra integral digits saturate and report overflow.
    pub fn checked(digits: BigInt, scale: i64) -> (Self, DecimalStatus) {
        let mut status = DecimalStatus::Ok;
        let (mut digits, mut scale) = if scale < 0 {
            (digits * pow10((-scale) as usize), 0i64)
        } else {
            (digits, scale)
        };
        if scale > DECIMAL_MAX_SCALE as i64 {
            let drop = (scale - DECIMAL_MAX_SCALE as i64) as usize;
            let (q, exact) = shift_round(&digits, drop, RoundMode::HalfUp);
            if !exact {
                status = DecimalStatus::Truncated;
            }
            digits = q;
            scale = DECIMAL_MAX_SCALE as i64;
        }
        let total = digit_count(&digits) as i64;
        if total - scale > DECIMAL_MAX_PRECISION as i64 {
            let v = Decimal::max_value(DECIMAL_MAX_PRECISION, 0).with_sign(digits.is_negative());
            return (v, DecimalStatus::Overflow);
        }
        if total > DECIMAL_MAX_PRECISION as i64 {
            let drop = (total - DECIMAL_MAX_PRECISION as i64) as usize;
            let (q, exact) = shift_round(&digits, drop, RoundMode::HalfUp);
            if !exact {
                status = status.merge(DecimalStatus::Truncated);
            }
            digits = q;
            scale -= drop as i64;
            if digit_count(&digits) as i64 - scale > DECIMAL_MAX_PRECISION as i64 {
                let v =
                    Decimal::max_value(DECIMAL_MAX_PRECISION, 0).with_sign(digits.is_negative());
                return (v, DecimalStatus::Overflow);
            }
        }
        (Decimal::from_parts(digits, scale as u8), status)
    }

    #[inline]
    fn parts(&self) -> (BigInt, i64) {
        self.0.as_bigint_and_exponent()
    }

    #[inline]
    fn with_sign(self, negative: bool) -> Self {
        if negative {
            self.neg()
        } else {
            self
        }
    }

    /// Digits after the point.
    #[inline]
    pub fn scale(&self) -> u8 {
        self.parts().1.max(0) as u8
    }

    /// Digits before the point, zero for pure fractions.
    #[inline]
    pub fn intg(&self) -> u8 {
        let (digits, scale) = self.parts();
        (digit_count(&digits) as i64 - scale).max(0) as u8
    }

    /// Number of significant digits, at least one before the point.
    #[inline]
    pub fn precision(&self) -> u8 {
        self.intg().max(1) + self.scale()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    #[inline]
    pub fn neg(&self) -> Self {
        Decimal(-self.0.clone())
    }

    #[inline]
    pub fn abs(&self) -> Self {
        Decimal(self.0.abs())
    }

    #[inline]
    pub fn add(&self, rhs: &Decimal) -> (Self, DecimalStatus) {
        let (digits, scale) = (&self.0 + &rhs.0).as_bigint_and_exponent();
        Decimal::checked(digits, scale)
    }

    #[inline]
    pub fn sub(&self, rhs: &Decimal) -> (Self, DecimalStatus) {
        let (digits, scale) = (&self.0 - &rhs.0).as_bigint_and_exponent();
        Decimal::checked(digits, scale)
    }

    #[inline]
    pub fn mul(&self, rhs: &Decimal) -> (Self, DecimalStatus) {
        let (d1, s1) = self.parts();
        let (d2, s2) = rhs.parts();
        Decimal::checked(d1 * d2, s1 + s2)
    }

    /// Divides and rounds the quotient half up at `scale` digits.
    pub fn div(&self, rhs: &Decimal, scale: u8) -> (Self, DecimalStatus) {
        if rhs.is_zero() {
            return (Decimal::zero(), DecimalStatus::DivisionByZero);
        }
        let (d1, s1) = self.parts();
        let (d2, s2) = rhs.parts();
        // one extra digit decides the rounding
        let num = d1 * pow10((s2 + scale as i64 + 1) as usize);
        let den = d2 * pow10(s1 as usize);
        let q = num / den;
        let last = (&q % BigInt::from(10)).abs();
        let mut q = q / BigInt::from(10);
        if last >= BigInt::from(5) {
            if self.is_negative() != rhs.is_negative() {
                q -= 1;
            } else {
                q += 1;
            }
        }
        Decimal::checked(q, scale as i64)
    }

    /// Integral quotient truncated toward zero.
    pub fn div_trunc(&self, rhs: &Decimal) -> (Self, DecimalStatus) {
        if rhs.is_zero() {
            return (Decimal::zero(), DecimalStatus::DivisionByZero);
        }
        let (d1, s1) = self.parts();
        let (d2, s2) = rhs.parts();
        let num = d1 * pow10(s2 as usize);
        let den = d2 * pow10(s1 as usize);
        Decimal::checked(num / den, 0)
    }

    /// Remainder with the sign of the dividend.
    pub fn rem(&self, rhs: &Decimal) -> (Self, DecimalStatus) {
        if rhs.is_zero() {
            return (Decimal::zero(), DecimalStatus::DivisionByZero);
        }
        let (d1, s1) = self.parts();
        let (d2, s2) = rhs.parts();
        let scale = s1.max(s2);
        let a = d1 * pow10((scale - s1) as usize);
        let b = d2 * pow10((scale - s2) as usize);
        Decimal::checked(a % b, scale)
    }

    /// Rounds to `frac` digits after the point. Negative `frac` rounds
    /// to tens, hundreds and so on. The result has exactly `max(frac, 0)`
    /// fractional digits, capped at 30.
    pub fn round(&self, frac: i64, mode: RoundMode) -> (Self, DecimalStatus) {
        let frac = frac.clamp(-(DECIMAL_MAX_PRECISION as i64), DECIMAL_MAX_SCALE as i64);
        let (digits, scale) = self.parts();
        if frac >= scale {
            let digits = digits * pow10((frac - scale) as usize);
            return Decimal::checked(digits, frac);
        }
        let drop = (scale - frac) as usize;
        let (q, _) = shift_round(&digits, drop, mode);
        if frac >= 0 {
            Decimal::checked(q, frac)
        } else {
            Decimal::checked(q * pow10((-frac) as usize), 0)
        }
    }

    #[inline]
    pub fn ceil(&self) -> (Self, DecimalStatus) {
        self.round(0, RoundMode::Ceiling)
    }

    #[inline]
    pub fn floor(&self) -> (Self, DecimalStatus) {
        self.round(0, RoundMode::Floor)
    }

    /// Converts to signed integer, rounding half up.
    /// Out of range values saturate and report overflow.
    pub fn to_i64(&self) -> (i64, DecimalStatus) {
        let (v, status) = self.round(0, RoundMode::HalfUp);
        let (digits, _) = v.parts();
        match digits.to_i64() {
            Some(n) => (n, status),
            None if digits.is_negative() => (i64::MIN, DecimalStatus::Overflow),
            None => (i64::MAX, DecimalStatus::Overflow),
        }
    }

    /// Converts to unsigned integer, rounding half up.
    /// Negative values become zero and report overflow.
    pub fn to_u64(&self) -> (u64, DecimalStatus) {
        let (v, status) = self.round(0, RoundMode::HalfUp);
        let (digits, _) = v.parts();
        if digits.is_negative() {
            return (0, DecimalStatus::Overflow);
        }
        match digits.to_u64() {
            Some(n) => (n, status),
            None => (u64::MAX, DecimalStatus::Overflow),
        }
    }

    #[inline]
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(0.0)
    }
}

impl From<i64> for Decimal {
    #[inline]
    fn from(v: i64) -> Self {
        Decimal::from_i64(v)
    }
}

impl From<u64> for Decimal {
    #[inline]
    fn from(v: u64) -> Self {
        Decimal::from_u64(v)
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Decimal::parse(s) {
            (d, DecimalStatus::Ok) | (d, DecimalStatus::Truncated) => Ok(d),
            _ => Err(ParseDecimalError(s.to_string())),
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (digits, scale) = self.parts();
        let mut s = digits.magnitude().to_string();
        if scale < 0 {
            s.extend(std::iter::repeat('0').take((-scale) as usize));
        } else if scale > 0 {
            let scale = scale as usize;
            if s.len() <= scale {
                let pad = scale + 1 - s.len();
                s.insert_str(0, &"0".repeat(pad));
            }
            s.insert(s.len() - scale, '.');
        }
        if digits.is_negative() {
            f.write_str("-")?;
        }
        f.write_str(&s)
    }
}

impl fmt::Debug for Decimal {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal({})", self)
    }
}

#[inline]
fn pow10(n: usize) -> BigInt {
    num_traits::pow(BigInt::from(10), n)
}

#[inline]
fn digit_count(v: &BigInt) -> usize {
    if v.is_zero() {
        0
    } else {
        v.magnitude().to_string().len()
    }
}

/// Drops `n` trailing digits under given rounding mode.
/// The flag is true if no non-zero digit was dropped.
fn shift_round(v: &BigInt, n: usize, mode: RoundMode) -> (BigInt, bool) {
    if n == 0 {
        return (v.clone(), true);
    }
    let divisor = pow10(n);
    let q = v / &divisor;
    let r = v % &divisor;
    if r.is_zero() {
        return (q, true);
    }
    let q = match mode {
        RoundMode::Truncate => q,
        RoundMode::HalfUp => {
            let twice: BigInt = r.abs() * 2;
            if twice.cmp(&divisor) != Ordering::Less {
                if v.is_negative() {
                    q - 1
                } else {
                    q + 1
                }
            } else {
                q
            }
        }
        RoundMode::Ceiling => {
            if r.is_positive() {
                q + 1
            } else {
                q
            }
        }
        RoundMode::Floor => {
            if r.is_negative() {
                q - 1
            } else {
                q
            }
        }
    };
    (q, false)
}
