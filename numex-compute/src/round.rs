use crate::arith::{check_decimal, ArithError, ArithResult, OverflowKind};
use numex_datatype::{Decimal, RoundMode};
use static_init::dynamic;

/// Powers of ten that are exactly representable as double literals.
#[dynamic]
static LOG_10: Vec<f64> = (0..=308)
    .map(|i| format!("1e{}", i).parse::<f64>().unwrap())
    .collect();

/// Number of powers of ten fitting in u64.
const LOG_10_INT_LEN: u64 = 20;

#[inline]
fn pow10_f64(n: u64) -> f64 {
    if (n as usize) < LOG_10.len() {
        LOG_10[n as usize]
    } else {
        10f64.powf(n as f64)
    }
}

/// Rounds a double to `dec` digits after the point.
///
/// Negative `dec` rounds to tens, hundreds and so on, unless it is
/// flagged unsigned. Rounding is half to even, as the default IEEE
/// mode. `truncate` rounds toward zero.
pub fn double_round(value: f64, dec: i64, dec_unsigned: bool, truncate: bool) -> f64 {
    let dec_negative = dec < 0 && !dec_unsigned;
    let abs_dec = if dec_negative {
        dec.unsigned_abs()
    } else {
        dec as u64
    };
    let tmp = pow10_f64(abs_dec);
    // materialize both to keep the result stable on repeated rounding
    let value_div_tmp = value / tmp;
    let value_mul_tmp = value * tmp;
    if tmp.is_infinite() {
        return if dec_negative { 0.0 } else { value };
    }
    if !dec_negative && value_mul_tmp.is_infinite() {
        return value;
    }
    if truncate {
        if value >= 0.0 {
            if dec_negative {
                value_div_tmp.floor() * tmp
            } else {
                value_mul_tmp.floor() / tmp
            }
        } else if dec_negative {
            value_div_tmp.ceil() * tmp
        } else {
            value_mul_tmp.ceil() / tmp
        }
    } else if dec_negative {
        value_div_tmp.round_ties_even() * tmp
    } else {
        value_mul_tmp.round_ties_even() / tmp
    }
}

#[inline]
fn unsigned_round(value: u64, to: u64) -> Option<u64> {
    let tmp = value / to * to;
    if value - tmp < (to >> 1) {
        Some(tmp)
    } else {
        tmp.checked_add(to)
    }
}

/// Rounds an integer to `dec` digits. Non-negative `dec` keeps the
/// value as is. Rounding is half away from zero.
pub fn int_round(
    value: i64,
    unsigned: bool,
    dec: i64,
    dec_unsigned: bool,
    truncate: bool,
) -> ArithResult<i64> {
    if dec >= 0 || dec_unsigned {
        return Ok(value);
    }
    let abs_dec = dec.unsigned_abs();
    if abs_dec >= LOG_10_INT_LEN {
        return Ok(0);
    }
    let tmp = 10u64.pow(abs_dec as u32);
    let overflow = ArithError::Overflow(OverflowKind::int(unsigned));
    if unsigned || value >= 0 {
        let v = value as u64;
        let res = if truncate {
            v / tmp * tmp
        } else {
            unsigned_round(v, tmp).ok_or(overflow)?
        };
        if !unsigned && res > i64::MAX as u64 {
            return Err(overflow);
        }
        Ok(res as i64)
    } else {
        let m = value.unsigned_abs();
        let res = if truncate {
            m / tmp * tmp
        } else {
            unsigned_round(m, tmp).ok_or(overflow)?
        };
        if res > 1 << 63 {
            return Err(overflow);
        }
        Ok((res as i64).wrapping_neg())
    }
}

/// Rounds a decimal half away from zero, or toward zero if truncate.
/// Non-negative `dec` is limited to the scale of the result node.
pub fn decimal_round(
    value: &Decimal,
    dec: i64,
    dec_unsigned: bool,
    truncate: bool,
    scale: u8,
) -> ArithResult<Decimal> {
    let frac = if dec >= 0 || dec_unsigned {
        (dec as u64).min(scale as u64) as i64
    } else {
        dec.max(i32::MIN as i64)
    };
    let mode = if truncate {
        RoundMode::Truncate
    } else {
        RoundMode::HalfUp
    };
    let (d, status) = value.round(frac, mode);
    check_decimal(d, status)
}
