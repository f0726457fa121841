use crate::decimal::{Decimal, DecimalStatus, RoundMode};
use crate::temporal::{Temporal, TemporalKind};
use crate::{digits_of, Collation, TypeAttr, NOT_FIXED_DEC};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Nullable scalar exchanged with the evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    I64(i64),
    U64(u64),
    F64(ValidF64),
    Decimal(Decimal),
    /// Character or byte string tagged with its collation.
    Str(Arc<[u8]>, Collation),
    Temporal(Temporal),
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

/// Text that was only partially usable as a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncation {
    /// Name of the target type, e.g. "DOUBLE".
    pub target: &'static str,
    pub text: String,
}

impl Truncation {
    #[inline]
    fn new(target: &'static str, text: &[u8]) -> Self {
        Truncation {
            target,
            text: String::from_utf8_lossy(text).into_owned(),
        }
    }
}

/// Converted value with optional truncation report.
pub type Converted<T> = (T, Option<Truncation>);

impl Value {
    #[inline]
    pub fn new_f64(v: f64) -> Option<Self> {
        ValidF64::new(v).map(Value::F64)
    }

    /// String value, ascii collation if possible.
    #[inline]
    pub fn str(s: &str) -> Self {
        let collation = if s.is_ascii() {
            Collation::Ascii
        } else {
            Collation::Utf8mb4
        };
        Value::Str(Arc::from(s.as_bytes()), collation)
    }

    #[inline]
    pub fn bytes(b: &[u8]) -> Self {
        Value::Str(Arc::from(b), Collation::Binary)
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Type attributes of this value as a constant.
    pub fn attr(&self) -> TypeAttr {
        match self {
            Value::Null => TypeAttr::null(),
            Value::I64(v) => TypeAttr::integer(digits_of(v.unsigned_abs()), false),
            Value::U64(v) => TypeAttr::integer(digits_of(*v), true),
            Value::F64(_) => TypeAttr::real(NOT_FIXED_DEC),
            Value::Decimal(d) => TypeAttr::decimal(d.precision(), d.scale(), false),
            Value::Str(s, collation) => {
                let len = match collation {
                    Collation::Binary | Collation::Ascii => s.len(),
                    Collation::Utf8mb4 => String::from_utf8_lossy(s).chars().count(),
                };
                TypeAttr::string(len as u32, *collation)
            }
            Value::Temporal(t) => TypeAttr::temporal(t.kind, t.frac),
        }
    }

    /// Converts to double. Text is parsed in best effort.
    pub fn to_f64(&self) -> Option<Converted<f64>> {
        let res = match self {
            Value::Null => return None,
            Value::I64(v) => *v as f64,
            Value::U64(v) => *v as f64,
            Value::F64(v) => v.value(),
            Value::Decimal(v) => v.to_f64(),
            Value::Str(s, _) => return Some(str_to_f64(s)),
            Value::Temporal(t) => t.to_f64(),
        };
        Some((res, None))
    }

    /// Converts to 64-bit integer. The result is the raw bit pattern,
    /// to be read as unsigned if `unsigned` is set.
    ///
    /// Real values out of range saturate silently, with no truncation
    /// reported. Decimal values out of range report a truncation.
    pub fn to_i64(&self, unsigned: bool) -> Option<Converted<i64>> {
        let res = match self {
            Value::Null => return None,
            Value::I64(v) => *v,
            Value::U64(v) => *v as i64,
            Value::F64(v) => double_to_i64(v.value(), unsigned).0,
            Value::Decimal(v) => {
                let (n, status) = if unsigned {
                    let (n, status) = v.to_u64();
                    (n as i64, status)
                } else {
                    v.to_i64()
                };
                if status.is_fatal() {
                    let text = v.to_string();
                    return Some((n, Some(Truncation::new("INTEGER", text.as_bytes()))));
                }
                n
            }
            Value::Str(s, _) => return Some(str_to_i64(s, unsigned)),
            Value::Temporal(t) => t.to_i64(),
        };
        Some((res, None))
    }

    /// Converts to decimal. Text is parsed in best effort.
    pub fn to_decimal(&self) -> Option<Converted<Decimal>> {
        let res = match self {
            Value::Null => return None,
            Value::I64(v) => Decimal::from_i64(*v),
            Value::U64(v) => Decimal::from_u64(*v),
            Value::F64(v) => {
                let (d, status) = Decimal::from_f64(v.value());
                if status.is_fatal() {
                    let text = v.value().to_string();
                    return Some((d, Some(Truncation::new("DECIMAL", text.as_bytes()))));
                }
                d
            }
            Value::Decimal(v) => v.clone(),
            Value::Str(s, _) => return Some(str_to_decimal(s)),
            Value::Temporal(t) => t.to_decimal(),
        };
        Some((res, None))
    }

    /// Renders as string.
    pub fn to_bytes(&self) -> Option<(Arc<[u8]>, Collation)> {
        let res: Arc<[u8]> = match self {
            Value::Null => return None,
            Value::Str(s, collation) => return Some((Arc::clone(s), *collation)),
            other => Arc::from(other.to_string().into_bytes()),
        };
        Some((res, Collation::Ascii))
    }

    /// Converts to temporal value of given kind.
    /// Returns error if the value is not a valid temporal.
    pub fn to_temporal(&self, kind: TemporalKind) -> Result<Option<Temporal>, Truncation> {
        let res = match self {
            Value::Null => return Ok(None),
            Value::Temporal(t) => Some(t.with_kind(kind)),
            Value::I64(v) => Temporal::from_number(*v, 0, kind),
            Value::U64(v) => i64::try_from(*v)
                .ok()
                .and_then(|n| Temporal::from_number(n, 0, kind)),
            Value::F64(v) => {
                let f = v.value();
                let micros = (f.fract().abs() * 1_000_000.0).round() as u32;
                Temporal::from_number(f.trunc() as i64, micros.min(999_999), kind)
            }
            Value::Decimal(d) => {
                let (int, _) = d.round(0, RoundMode::Truncate);
                let (frac, _) = d.sub(&int);
                let (micros, _) = frac.abs().mul(&Decimal::from_i64(1_000_000)).0.to_i64();
                Temporal::from_number(int.to_i64().0, micros.clamp(0, 999_999) as u32, kind)
            }
            Value::Str(s, _) => {
                let text = String::from_utf8_lossy(s);
                Temporal::parse(&text).map(|t| t.with_kind(kind))
            }
        };
        match res {
            Some(t) => Ok(Some(t)),
            None => Err(Truncation::new(kind.to_lower(), self.to_string().as_bytes())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::I64(v) => write!(f, "{}", v),
            Value::U64(v) => write!(f, "{}", v),
            Value::F64(v) => {
                let v = v.value();
                let abs = v.abs();
                if abs != 0.0 && !(1e-4..1e15).contains(&abs) {
                    write!(f, "{:e}", v)
                } else {
                    write!(f, "{}", v)
                }
            }
            Value::Decimal(v) => write!(f, "{}", v),
            Value::Str(s, _) => f.write_str(&String::from_utf8_lossy(s)),
            Value::Temporal(t) => write!(f, "{}", t),
        }
    }
}

/// Converts a double to integer, rounding to nearest even first.
/// Out of range values saturate and set the flag.
pub fn double_to_i64(v: f64, unsigned: bool) -> (i64, bool) {
    let v = v.round_ties_even();
    if unsigned {
        if v < 0.0 {
            (0, true)
        } else if v >= u64::MAX as f64 {
            (u64::MAX as i64, true)
        } else {
            ((v as u64) as i64, false)
        }
    } else if v <= i64::MIN as f64 {
        (i64::MIN, v < i64::MIN as f64)
    } else if v >= i64::MAX as f64 {
        (i64::MAX, true)
    } else {
        (v as i64, false)
    }
}

/// Scans the longest numeric prefix of text.
///
/// Returns the end of the prefix and whether it contains a digit.
fn numeric_prefix(s: &[u8], allow_frac: bool) -> (usize, bool) {
    let mut i = 0;
    while i < s.len() && s[i].is_ascii_whitespace() {
        i += 1;
    }
    if i < s.len() && (s[i] == b'+' || s[i] == b'-') {
        i += 1;
    }
    let mut digits = false;
    while i < s.len() && s[i].is_ascii_digit() {
        i += 1;
        digits = true;
    }
    if !allow_frac {
        return (i, digits);
    }
    if i < s.len() && s[i] == b'.' {
        i += 1;
        while i < s.len() && s[i].is_ascii_digit() {
            i += 1;
            digits = true;
        }
    }
    if digits && i < s.len() && (s[i] == b'e' || s[i] == b'E') {
        let mut j = i + 1;
        if j < s.len() && (s[j] == b'+' || s[j] == b'-') {
            j += 1;
        }
        let start = j;
        while j < s.len() && s[j].is_ascii_digit() {
            j += 1;
        }
        if j > start {
            i = j;
        }
    }
    (i, digits)
}

#[inline]
fn only_spaces(s: &[u8]) -> bool {
    s.iter().all(|b| b.is_ascii_whitespace())
}

/// Parses text as double in best effort.
pub fn str_to_f64(s: &[u8]) -> Converted<f64> {
    let (end, digits) = numeric_prefix(s, true);
    let complete = digits && only_spaces(&s[end..]);
    let v = if digits {
        std::str::from_utf8(&s[..end])
            .ok()
            .and_then(|t| t.trim().parse::<f64>().ok())
            .unwrap_or(0.0)
    } else {
        0.0
    };
    if v.is_infinite() {
        let v = if v > 0.0 { f64::MAX } else { f64::MIN };
        return (v, Some(Truncation::new("DOUBLE", s)));
    }
    if complete {
        (v, None)
    } else {
        (v, Some(Truncation::new("DOUBLE", s)))
    }
}

/// Parses text as integer in best effort. Out of range values saturate.
pub fn str_to_i64(s: &[u8], unsigned: bool) -> Converted<i64> {
    let (end, digits) = numeric_prefix(s, false);
    let text = std::str::from_utf8(&s[..end]).unwrap_or("").trim();
    let negative = text.starts_with('-');
    let magnitude = text.trim_start_matches(['+', '-']).trim_start_matches('0');
    let mut overflow = magnitude.len() > 20;
    let v: i128 = if overflow {
        if negative {
            i128::MIN
        } else {
            i128::MAX
        }
    } else {
        let m: i128 = magnitude.parse().unwrap_or(0);
        if negative {
            -m
        } else {
            m
        }
    };
    let (min, max) = if unsigned && !negative {
        (0, u64::MAX as i128)
    } else {
        (i64::MIN as i128, i64::MAX as i128)
    };
    let clamped = v.clamp(min, max);
    overflow |= clamped != v;
    let res = if clamped > i64::MAX as i128 {
        (clamped as u64) as i64
    } else {
        clamped as i64
    };
    if overflow || !digits || !only_spaces(&s[end..]) {
        (res, Some(Truncation::new("INTEGER", s)))
    } else {
        (res, None)
    }
}

/// Parses text as decimal in best effort.
pub fn str_to_decimal(s: &[u8]) -> Converted<Decimal> {
    let (end, digits) = numeric_prefix(s, true);
    if !digits {
        return (Decimal::zero(), Some(Truncation::new("DECIMAL", s)));
    }
    let text = std::str::from_utf8(&s[..end]).unwrap_or("0");
    let (d, status) = Decimal::parse(text);
    match status {
        DecimalStatus::Ok | DecimalStatus::Truncated if only_spaces(&s[end..]) => (d, None),
        _ => (d, Some(Truncation::new("DECIMAL", s))),
    }
}

pub const F64_ZERO: ValidF64 = ValidF64(0.0);

/// Finite double, comparable and hashable.
#[derive(Debug, Clone, Copy)]
pub struct ValidF64(f64);

impl ValidF64 {
    #[inline]
    pub fn new(value: f64) -> Option<Self> {
        if value.is_infinite() || value.is_nan() {
            None
        } else {
            Some(ValidF64(value))
        }
    }

    #[inline]
    pub const fn value(&self) -> f64 {
        self.0
    }
}

impl PartialEq for ValidF64 {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

// we must ensure f64 is valid for equality check
impl Eq for ValidF64 {}

impl PartialOrd for ValidF64 {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ValidF64 {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for ValidF64 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.to_bits())
    }
}

impl Deref for ValidF64 {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResultType;

    #[test]
    fn test_value_attr() {
        let attr = Value::I64(-123).attr();
        assert_eq!(ResultType::Integer, attr.result_type);
        assert_eq!(3, attr.precision);
        assert!(!attr.unsigned);
        let attr = Value::U64(u64::MAX).attr();
        assert!(attr.unsigned);
        assert_eq!(20, attr.precision);
        let attr = Value::new_f64(2.5).unwrap().attr();
        assert_eq!(NOT_FIXED_DEC, attr.scale);
        let attr = Value::Decimal("12.345".parse().unwrap()).attr();
        assert_eq!((5, 3), (attr.precision, attr.scale));
        let attr = Value::str("héllo").attr();
        assert_eq!(5, attr.display_length);
        assert_eq!(Collation::Utf8mb4, attr.collation);
        assert!(Value::Null.attr().nullable);
    }

    #[test]
    fn test_to_i64_saturation() {
        let (n, trunc) = Value::new_f64(1e30).unwrap().to_i64(false).unwrap();
        assert_eq!(i64::MAX, n);
        assert!(trunc.is_none());
        let (n, trunc) = Value::new_f64(-1.0).unwrap().to_i64(true).unwrap();
        assert_eq!(0, n);
        assert!(trunc.is_none());
        let dec = Value::Decimal("1000000000000000000000000000000".parse().unwrap());
        let (n, trunc) = dec.to_i64(false).unwrap();
        assert_eq!(i64::MAX, n);
        assert_eq!("INTEGER", trunc.unwrap().target);
    }

    #[test]
    fn test_str_to_f64() {
        assert_eq!((1.5, None), str_to_f64(b" 1.5 "));
        assert_eq!((-0.5, None), str_to_f64(b"-.5"));
        assert_eq!((1000.0, None), str_to_f64(b"1e3"));
        let (v, trunc) = str_to_f64(b"12abc");
        assert_eq!(12.0, v);
        assert_eq!("DOUBLE", trunc.unwrap().target);
        let (v, trunc) = str_to_f64(b"1e");
        assert_eq!(1.0, v);
        assert!(trunc.is_some());
        let (v, trunc) = str_to_f64(b"");
        assert_eq!(0.0, v);
        assert!(trunc.is_some());
        assert_eq!(f64::MAX, str_to_f64(b"1e400").0);
    }

    #[test]
    fn test_str_to_i64() {
        assert_eq!((42, None), str_to_i64(b"42", false));
        assert_eq!((-42, None), str_to_i64(b" -42 ", false));
        let (v, trunc) = str_to_i64(b"2.5", false);
        assert_eq!(2, v);
        assert!(trunc.is_some());
        let (v, trunc) = str_to_i64(b"18446744073709551615", true);
        assert_eq!(u64::MAX, v as u64);
        assert!(trunc.is_none());
        let (v, trunc) = str_to_i64(b"18446744073709551615", false);
        assert_eq!(i64::MAX, v);
        assert!(trunc.is_some());
        let (v, trunc) = str_to_i64(b"-99999999999999999999999", false);
        assert_eq!(i64::MIN, v);
        assert!(trunc.is_some());
    }

    #[test]
    fn test_str_to_decimal() {
        let (d, trunc) = str_to_decimal(b"12.50");
        assert_eq!("12.50", d.to_string());
        assert!(trunc.is_none());
        let (d, trunc) = str_to_decimal(b"3.5kg");
        assert_eq!("3.5", d.to_string());
        assert!(trunc.is_some());
        let (d, trunc) = str_to_decimal(b"abc");
        assert!(d.is_zero());
        assert!(trunc.is_some());
    }

    #[test]
    fn test_double_to_i64() {
        assert_eq!((2, false), double_to_i64(2.5, false));
        assert_eq!((4, false), double_to_i64(3.5, false));
        assert_eq!((i64::MAX, true), double_to_i64(1e19, false));
        assert_eq!((0, true), double_to_i64(-1.0, true));
        assert_eq!((i64::MIN, false), double_to_i64(i64::MIN as f64, false));
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Some((2.5, None)), Value::Decimal("2.5".parse().unwrap()).to_f64());
        assert_eq!(Some((3, None)), Value::Decimal("2.5".parse().unwrap()).to_i64(false));
        let t = Temporal::parse("2011-11-21").unwrap();
        assert_eq!(Some((20111121, None)), Value::Temporal(t).to_i64(false));
        let (b, c) = Value::I64(-7).to_bytes().unwrap();
        assert_eq!(b"-7", &b[..]);
        assert_eq!(Collation::Ascii, c);
        assert_eq!("1e20", Value::new_f64(1e20).unwrap().to_string());
        assert_eq!("2.5", Value::new_f64(2.5).unwrap().to_string());
        assert!(Value::Null.to_f64().is_none());
    }

    #[test]
    fn test_value_to_temporal() {
        let v = Value::str("2011-11-21 10:00:00");
        let t = v.to_temporal(TemporalKind::Date).unwrap().unwrap();
        assert_eq!("2011-11-21", t.to_string());
        let t = Value::I64(20111121).to_temporal(TemporalKind::Datetime).unwrap().unwrap();
        assert_eq!("2011-11-21 00:00:00", t.to_string());
        assert!(Value::str("abc").to_temporal(TemporalKind::Date).is_err());
        assert_eq!(Ok(None), Value::Null.to_temporal(TemporalKind::Date));
    }
}
