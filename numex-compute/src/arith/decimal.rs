use super::{ArithError, ArithResult, OverflowKind};
use numex_datatype::{Decimal, DecimalStatus};

/// Maps decimal status to arithmetic result.
/// Truncation of fractional digits is accepted silently.
#[inline]
pub fn check_decimal(d: Decimal, status: DecimalStatus) -> ArithResult<Decimal> {
    match status {
        DecimalStatus::Ok | DecimalStatus::Truncated => Ok(d),
        DecimalStatus::Overflow => Err(ArithError::Overflow(OverflowKind::Decimal)),
        DecimalStatus::DivisionByZero => Err(ArithError::DivisionByZero),
        DecimalStatus::BadNumber => Err(ArithError::BadNumber),
    }
}

#[inline]
pub fn decimal_add(lhs: &Decimal, rhs: &Decimal, _scale: u8) -> ArithResult<Decimal> {
    let (d, status) = lhs.add(rhs);
    check_decimal(d, status)
}

#[inline]
pub fn decimal_sub(lhs: &Decimal, rhs: &Decimal, _scale: u8) -> ArithResult<Decimal> {
    let (d, status) = lhs.sub(rhs);
    check_decimal(d, status)
}

#[inline]
pub fn decimal_mul(lhs: &Decimal, rhs: &Decimal, _scale: u8) -> ArithResult<Decimal> {
    let (d, status) = lhs.mul(rhs);
    check_decimal(d, status)
}

/// Quotient rounded half away from zero at given scale.
#[inline]
pub fn decimal_div(lhs: &Decimal, rhs: &Decimal, scale: u8) -> ArithResult<Decimal> {
    let (d, status) = lhs.div(rhs, scale);
    check_decimal(d, status)
}

#[inline]
pub fn decimal_mod(lhs: &Decimal, rhs: &Decimal, _scale: u8) -> ArithResult<Decimal> {
    let (d, status) = lhs.rem(rhs);
    check_decimal(d, status)
}

/// Integral quotient truncated toward zero, used by `DIV` on
/// non-integer operands.
#[inline]
pub fn decimal_int_div(lhs: &Decimal, rhs: &Decimal) -> ArithResult<Decimal> {
    let (d, status) = lhs.div_trunc(rhs);
    check_decimal(d, status)
}

#[inline]
pub fn decimal_ceil(arg: &Decimal) -> ArithResult<Decimal> {
    let (d, status) = arg.ceil();
    check_decimal(d, status)
}

#[inline]
pub fn decimal_floor(arg: &Decimal) -> ArithResult<Decimal> {
    let (d, status) = arg.floor();
    check_decimal(d, status)
}

/// Converts an integral decimal to 64-bit integer of given signedness.
#[inline]
pub fn decimal_to_int(arg: &Decimal, unsigned: bool) -> ArithResult<i64> {
    let (v, status) = if unsigned {
        let (v, status) = arg.to_u64();
        (v as i64, status)
    } else {
        arg.to_i64()
    };
    if status.is_fatal() {
        Err(ArithError::Overflow(OverflowKind::int(unsigned)))
    } else {
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_decimal_arith() {
        assert_eq!(Ok(dec("3.75")), decimal_add(&dec("1.25"), &dec("2.5"), 2));
        assert_eq!(Ok(dec("-1.25")), decimal_sub(&dec("1.25"), &dec("2.5"), 2));
        assert_eq!(Ok(dec("3.125")), decimal_mul(&dec("1.25"), &dec("2.5"), 3));
        assert_eq!(
            Ok(dec("360.714286")),
            decimal_div(&dec("5.05"), &dec("0.014"), 6)
        );
        assert_eq!(
            Err(ArithError::DivisionByZero),
            decimal_div(&dec("5"), &dec("0.00"), 4)
        );
        assert_eq!(Ok(dec("-1.5")), decimal_mod(&dec("-7.5"), &dec("2"), 1));
        assert_eq!(
            Err(ArithError::DivisionByZero),
            decimal_mod(&dec("1"), &dec("0"), 0)
        );
        let max = Decimal::max_value(65, 0);
        assert_eq!(
            Err(ArithError::Overflow(OverflowKind::Decimal)),
            decimal_add(&max, &dec("1"), 0)
        );
    }

    #[test]
    fn test_decimal_int_ops() {
        assert_eq!(Ok(dec("-3")), decimal_int_div(&dec("-7.5"), &dec("2")));
        assert_eq!(Ok(dec("2")), decimal_ceil(&dec("1.2")));
        assert_eq!(Ok(dec("-2")), decimal_floor(&dec("-1.2")));
        assert_eq!(Ok(-3), decimal_to_int(&dec("-3"), false));
        assert_eq!(
            Err(ArithError::Overflow(OverflowKind::BigIntUnsigned)),
            decimal_to_int(&dec("-3"), true)
        );
        assert_eq!(
            Err(ArithError::Overflow(OverflowKind::BigInt)),
            decimal_to_int(&dec("9223372036854775808"), false)
        );
        assert_eq!(
            Ok(u64::MAX as i64),
            decimal_to_int(&dec("18446744073709551615"), true)
        );
    }
}
