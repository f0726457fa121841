use super::{ArithError, ArithResult, IntArg, OverflowKind};

const I64_MIN_MAGNITUDE: u64 = 1 << 63;

#[inline]
fn overflow(unsigned: bool) -> ArithError {
    ArithError::Overflow(OverflowKind::int(unsigned))
}

/// Checks the computed value against signedness of the result node.
///
/// `val_unsigned` tells how to read the bits of `value`.
#[inline]
pub fn check_integer_overflow(
    value: i64,
    val_unsigned: bool,
    node_unsigned: bool,
) -> ArithResult<i64> {
    if node_unsigned {
        if !val_unsigned && value < 0 {
            return Err(overflow(true));
        }
    } else if val_unsigned && (value as u64) > i64::MAX as u64 {
        return Err(overflow(false));
    }
    Ok(value)
}

/// Negative of an unsigned magnitude, if it fits.
#[inline]
fn neg_magnitude(m: u64) -> Option<i64> {
    if m <= I64_MIN_MAGNITUDE {
        Some((m as i64).wrapping_neg())
    } else {
        None
    }
}

/// `a - b` on magnitudes. Returns value and whether it is unsigned.
#[inline]
fn sub_magnitude(a: u64, b: u64) -> Option<(i64, bool)> {
    if a >= b {
        Some(((a - b) as i64, true))
    } else {
        neg_magnitude(b - a).map(|v| (v, false))
    }
}

pub fn int_add(lhs: IntArg, rhs: IntArg, unsigned: bool) -> ArithResult<i64> {
    let (v0, v1) = (lhs.value, rhs.value);
    let (res, res_unsigned) = match (lhs.unsigned, rhs.unsigned) {
        (true, true) => {
            let res = (v0 as u64).checked_add(v1 as u64).ok_or(overflow(unsigned))?;
            (res as i64, true)
        }
        (false, false) => (v0.checked_add(v1).ok_or(overflow(unsigned))?, false),
        _ => {
            let (u, s) = if lhs.unsigned { (v0, v1) } else { (v1, v0) };
            let u = u as u64;
            if s >= 0 {
                let res = u.checked_add(s as u64).ok_or(overflow(unsigned))?;
                (res as i64, true)
            } else {
                sub_magnitude(u, s.unsigned_abs()).ok_or(overflow(unsigned))?
            }
        }
    };
    check_integer_overflow(res, res_unsigned, unsigned)
}

pub fn int_sub(lhs: IntArg, rhs: IntArg, unsigned: bool) -> ArithResult<i64> {
    let (v0, v1) = (lhs.value, rhs.value);
    let (res, res_unsigned) = match (lhs.unsigned, rhs.unsigned) {
        (false, false) => (v0.checked_sub(v1).ok_or(overflow(unsigned))?, false),
        (true, false) if v1 < 0 => {
            let res = (v0 as u64)
                .checked_add(v1.unsigned_abs())
                .ok_or(overflow(unsigned))?;
            (res as i64, true)
        }
        (false, true) if v0 < 0 => {
            let m = v0
                .unsigned_abs()
                .checked_add(v1 as u64)
                .ok_or(overflow(unsigned))?;
            (neg_magnitude(m).ok_or(overflow(unsigned))?, false)
        }
        // both operands are non-negative here
        _ => sub_magnitude(v0 as u64, v1 as u64).ok_or(overflow(unsigned))?,
    };
    check_integer_overflow(res, res_unsigned, unsigned)
}

/// Multiplies magnitudes in 32-bit halves, so overflow is detected
/// before the product is formed.
#[inline]
fn mul_magnitude(a: u64, b: u64) -> Option<u64> {
    let (a0, a1) = (a & 0xFFFF_FFFF, a >> 32);
    let (b0, b1) = (b & 0xFFFF_FFFF, b >> 32);
    if a1 != 0 && b1 != 0 {
        return None;
    }
    let p0 = (a1 * b0).checked_add(a0 * b1)?;
    if p0 > 0xFFFF_FFFF {
        return None;
    }
    (a0 * b0).checked_add(p0 << 32)
}

pub fn int_mul(lhs: IntArg, rhs: IntArg, unsigned: bool) -> ArithResult<i64> {
    if lhs.value == 0 || rhs.value == 0 {
        return Ok(0);
    }
    let m = mul_magnitude(lhs.magnitude(), rhs.magnitude()).ok_or(overflow(unsigned))?;
    if lhs.is_negative() == rhs.is_negative() {
        check_integer_overflow(m as i64, true, unsigned)
    } else {
        let res = neg_magnitude(m).ok_or(overflow(unsigned))?;
        check_integer_overflow(res, false, unsigned)
    }
}

/// Integer division `DIV`, truncating toward zero.
pub fn int_div(lhs: IntArg, rhs: IntArg, unsigned: bool) -> ArithResult<i64> {
    if rhs.value == 0 {
        return Err(ArithError::DivisionByZero);
    }
    let m = lhs.magnitude() / rhs.magnitude();
    if lhs.is_negative() != rhs.is_negative() {
        let res = neg_magnitude(m).ok_or(overflow(unsigned))?;
        check_integer_overflow(res, false, unsigned)
    } else {
        check_integer_overflow(m as i64, true, unsigned)
    }
}

/// Remainder with the sign of the dividend.
pub fn int_mod(lhs: IntArg, rhs: IntArg, unsigned: bool) -> ArithResult<i64> {
    if rhs.value == 0 {
        return Err(ArithError::DivisionByZero);
    }
    let m = lhs.magnitude() % rhs.magnitude();
    if lhs.is_negative() {
        // remainder is smaller than the dividend magnitude
        check_integer_overflow((m as i64).wrapping_neg(), false, unsigned)
    } else {
        check_integer_overflow(m as i64, true, unsigned)
    }
}

/// Negation. The result node is always signed.
pub fn int_neg(arg: IntArg) -> ArithResult<i64> {
    if arg.unsigned {
        neg_magnitude(arg.value as u64).ok_or(overflow(false))
    } else {
        arg.value.checked_neg().ok_or(overflow(false))
    }
}

/// Absolute value. The result node keeps the sign of the operand.
pub fn int_abs(arg: IntArg) -> ArithResult<i64> {
    if arg.unsigned {
        return Ok(arg.value);
    }
    arg.value.checked_abs().ok_or(overflow(false))
}

#[inline]
pub fn bit_and(lhs: u64, rhs: u64) -> u64 {
    lhs & rhs
}

#[inline]
pub fn bit_or(lhs: u64, rhs: u64) -> u64 {
    lhs | rhs
}

#[inline]
pub fn bit_xor(lhs: u64, rhs: u64) -> u64 {
    lhs ^ rhs
}

/// Shifts of 64 bits or more yield zero.
#[inline]
pub fn bit_shl(lhs: u64, rhs: u64) -> u64 {
    if rhs < 64 {
        lhs << rhs
    } else {
        0
    }
}

#[inline]
pub fn bit_shr(lhs: u64, rhs: u64) -> u64 {
    if rhs < 64 {
        lhs >> rhs
    } else {
        0
    }
}

#[inline]
pub fn bit_inv(arg: u64) -> u64 {
    !arg
}

#[inline]
pub fn bit_count(arg: u64) -> i64 {
    arg.count_ones() as i64
}
