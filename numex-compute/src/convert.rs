use numex_datatype::{Decimal, RoundMode, Value};

/// Fits a decimal into `DECIMAL(precision, scale)`.
///
/// Extra fractional digits are rounded half up. Values whose integral
/// part does not fit saturate to the largest value of the type, and
/// the flag is set.
pub fn cast_decimal(d: &Decimal, precision: u8, scale: u8) -> (Decimal, bool) {
    let (r, _) = d.round(scale as i64, RoundMode::HalfUp);
    if r.intg() > precision.saturating_sub(scale) {
        let max = Decimal::max_value(precision, scale);
        let max = if d.is_negative() { max.neg() } else { max };
        return (max, true);
    }
    (r, false)
}

/// Whether casting the value to unsigned reinterprets a negative
/// integer as its two's complement.
#[inline]
pub fn negative_to_unsigned(v: &Value, res: i64) -> bool {
    match v {
        Value::I64(n) => *n < 0,
        Value::Str(..) => res < 0,
        _ => false,
    }
}

/// Converts an integer result to value of given signedness.
#[inline]
pub fn int_value(v: i64, unsigned: bool) -> Value {
    if unsigned {
        Value::U64(v as u64)
    } else {
        Value::I64(v)
    }
}
