use super::{ArithError, ArithResult, OverflowKind};
use std::f64::consts::PI;

/// Non-finite results are reported as overflow.
#[inline]
pub fn check_float_overflow(v: f64) -> ArithResult<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ArithError::Overflow(OverflowKind::Double))
    }
}

#[inline]
pub fn real_add(lhs: f64, rhs: f64) -> ArithResult<f64> {
    check_float_overflow(lhs + rhs)
}

#[inline]
pub fn real_sub(lhs: f64, rhs: f64) -> ArithResult<f64> {
    check_float_overflow(lhs - rhs)
}

#[inline]
pub fn real_mul(lhs: f64, rhs: f64) -> ArithResult<f64> {
    check_float_overflow(lhs * rhs)
}

#[inline]
pub fn real_div(lhs: f64, rhs: f64) -> ArithResult<f64> {
    if rhs == 0.0 {
        return Err(ArithError::DivisionByZero);
    }
    check_float_overflow(lhs / rhs)
}

/// Remainder with the sign of the dividend, as C fmod.
#[inline]
pub fn real_mod(lhs: f64, rhs: f64) -> ArithResult<f64> {
    if rhs == 0.0 {
        return Err(ArithError::DivisionByZero);
    }
    Ok(lhs % rhs)
}

#[inline]
pub fn real_neg(arg: f64) -> f64 {
    -arg
}

#[inline]
pub fn real_abs(arg: f64) -> f64 {
    arg.abs()
}

/// Natural logarithm. Non-positive argument is handled as division by zero.
#[inline]
pub fn real_ln(arg: f64) -> ArithResult<f64> {
    if arg <= 0.0 {
        return Err(ArithError::DivisionByZero);
    }
    Ok(arg.ln())
}

/// Logarithm of `arg` to `base`.
#[inline]
pub fn real_log(base: f64, arg: f64) -> ArithResult<f64> {
    if base <= 0.0 || arg <= 0.0 {
        return Err(ArithError::DivisionByZero);
    }
    let d = base.ln();
    if d == 0.0 {
        return Err(ArithError::DivisionByZero);
    }
    Ok(arg.ln() / d)
}

#[inline]
pub fn real_log2(arg: f64) -> ArithResult<f64> {
    if arg <= 0.0 {
        return Err(ArithError::DivisionByZero);
    }
    Ok(arg.log2())
}

#[inline]
pub fn real_log10(arg: f64) -> ArithResult<f64> {
    if arg <= 0.0 {
        return Err(ArithError::DivisionByZero);
    }
    Ok(arg.log10())
}

#[inline]
pub fn real_exp(arg: f64) -> ArithResult<f64> {
    check_float_overflow(arg.exp())
}

#[inline]
pub fn real_sqrt(arg: f64) -> ArithResult<f64> {
    if arg < 0.0 {
        return Err(ArithError::DomainError("sqrt"));
    }
    Ok(arg.sqrt())
}

#[inline]
pub fn real_pow(base: f64, exp: f64) -> ArithResult<f64> {
    check_float_overflow(base.powf(exp))
}

#[inline]
pub fn real_acos(arg: f64) -> ArithResult<f64> {
    if !(-1.0..=1.0).contains(&arg) {
        return Err(ArithError::DomainError("acos"));
    }
    Ok(arg.acos())
}

#[inline]
pub fn real_asin(arg: f64) -> ArithResult<f64> {
    if !(-1.0..=1.0).contains(&arg) {
        return Err(ArithError::DomainError("asin"));
    }
    Ok(arg.asin())
}

#[inline]
pub fn real_atan(arg: f64) -> ArithResult<f64> {
    check_float_overflow(arg.atan())
}

#[inline]
pub fn real_atan2(y: f64, x: f64) -> ArithResult<f64> {
    check_float_overflow(y.atan2(x))
}

#[inline]
pub fn real_cos(arg: f64) -> f64 {
    arg.cos()
}

#[inline]
pub fn real_sin(arg: f64) -> f64 {
    arg.sin()
}

#[inline]
pub fn real_tan(arg: f64) -> ArithResult<f64> {
    check_float_overflow(arg.tan())
}

/// Cotangent. Zero argument overflows.
#[inline]
pub fn real_cot(arg: f64) -> ArithResult<f64> {
    check_float_overflow(1.0 / arg.tan())
}

#[inline]
pub fn real_degrees(arg: f64) -> ArithResult<f64> {
    check_float_overflow(arg * (180.0 / PI))
}

#[inline]
pub fn real_radians(arg: f64) -> ArithResult<f64> {
    check_float_overflow(arg * (PI / 180.0))
}

/// Sign of the value, -1, 0 or 1.
#[inline]
pub fn real_sign(arg: f64) -> i64 {
    if arg < 0.0 {
        -1
    } else if arg > 0.0 {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OF: ArithError = ArithError::Overflow(OverflowKind::Double);

    #[test]
    fn test_real_arith() {
        assert_eq!(Ok(3.5), real_add(1.5, 2.0));
        assert_eq!(Err(OF), real_mul(f64::MAX, 2.0));
        assert_eq!(Err(OF), real_sub(f64::MIN, f64::MAX));
        assert_eq!(Err(ArithError::DivisionByZero), real_div(5.0, 0.0));
        assert_eq!(Err(ArithError::DivisionByZero), real_div(5.0, -0.0));
        assert_eq!(Ok(-1.5), real_mod(-7.5, 2.0));
        assert_eq!(Ok(1.5), real_mod(7.5, -2.0));
        assert_eq!(Err(ArithError::DivisionByZero), real_mod(1.0, 0.0));
    }

    #[test]
    fn test_real_math() {
        assert_eq!(Err(ArithError::DivisionByZero), real_ln(0.0));
        assert_eq!(Err(ArithError::DivisionByZero), real_ln(-1.0));
        assert_eq!(Ok(0.0), real_ln(1.0));
        assert!((real_log(2.0, 8.0).unwrap() - 3.0).abs() < 1e-12);
        assert_eq!(Err(ArithError::DivisionByZero), real_log(1.0, 8.0));
        assert_eq!(Ok(10.0), real_log2(1024.0));
        assert_eq!(Ok(2.0), real_log10(100.0));
        assert_eq!(Err(ArithError::DomainError("sqrt")), real_sqrt(-1.0));
        assert_eq!(Ok(3.0), real_sqrt(9.0));
        assert_eq!(Err(ArithError::DomainError("acos")), real_acos(2.0));
        assert_eq!(Err(ArithError::DomainError("asin")), real_asin(-1.5));
        assert_eq!(Err(OF), real_exp(1000.0));
        assert_eq!(Err(OF), real_pow(10.0, 400.0));
        assert_eq!(Err(OF), real_cot(0.0));
        assert!((real_degrees(PI).unwrap() - 180.0).abs() < 1e-9);
        assert_eq!(Err(OF), real_degrees(f64::MAX));
        assert_eq!(-1, real_sign(-0.5));
        assert_eq!(0, real_sign(0.0));
    }
}
