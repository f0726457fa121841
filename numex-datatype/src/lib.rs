pub mod align;
pub mod decimal;
pub mod temporal;
pub mod value;

pub use align::*;
pub use decimal::{Decimal, DecimalStatus, RoundMode};
pub use temporal::{Temporal, TemporalKind};
pub use value::*;

pub use time::format_description::{self, FormatItem};
pub use time::PrimitiveDateTime as Datetime;
pub use time::{Date, Time};

use std::borrow::Cow;
use std::cmp::Ordering;

/// Maximum number of significant digits of a decimal.
pub const DECIMAL_MAX_PRECISION: u8 = 65;
/// Maximum number of digits after the point of a decimal.
pub const DECIMAL_MAX_SCALE: u8 = 30;
/// Scale sentinel of a value whose fractional digits are not fixed.
pub const NOT_FIXED_DEC: u8 = 39;
/// Scales at or above this value are handled as floating.
pub const FLOATING_POINT_DECIMALS: u8 = 31;
/// Digits needed to hold any 64-bit integer, with sign and one spare digit.
pub const DECIMAL_LONGLONG_DIGITS: u8 = 22;
/// Max display width of a 64-bit integer.
pub const INT64_DISPLAY_LENGTH: u32 = 21;
/// Digits of a double that survive a round trip.
pub const DBL_DIG: u32 = 15;
pub const MAX_DISPLAY_LENGTH: u32 = u32::MAX;

/// Evaluation domain of an expression.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResultType {
    Integer,
    Real,
    Decimal,
    StringLike,
    Temporal,
    /// Multi-valued row, never evaluated as a scalar.
    Row,
}

impl ResultType {
    #[inline]
    pub fn to_lower(&self) -> &'static str {
        match self {
            ResultType::Integer => "integer",
            ResultType::Real => "real",
            ResultType::Decimal => "decimal",
            ResultType::StringLike => "string",
            ResultType::Temporal => "temporal",
            ResultType::Row => "row",
        }
    }

    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ResultType::Integer | ResultType::Real | ResultType::Decimal
        )
    }
}

/// Type attributes of a resolved expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeAttr {
    pub result_type: ResultType,
    /// Digits after the point, or [`NOT_FIXED_DEC`].
    pub scale: u8,
    /// Significant digits, at most [`DECIMAL_MAX_PRECISION`].
    pub precision: u8,
    /// Maximum rendered width in characters.
    pub display_length: u32,
    pub unsigned: bool,
    pub nullable: bool,
    /// Only meaningful for string results.
    pub collation: Collation,
    /// Only set for temporal results.
    pub temporal: Option<TemporalKind>,
}

impl Default for TypeAttr {
    fn default() -> Self {
        TypeAttr::null()
    }
}

impl TypeAttr {
    /// Attributes of the constant NULL.
    #[inline]
    pub fn null() -> Self {
        TypeAttr {
            result_type: ResultType::StringLike,
            scale: NOT_FIXED_DEC,
            precision: 0,
            display_length: 0,
            unsigned: false,
            nullable: true,
            collation: Collation::Binary,
            temporal: None,
        }
    }

    #[inline]
    pub fn integer(precision: u8, unsigned: bool) -> Self {
        TypeAttr {
            result_type: ResultType::Integer,
            scale: 0,
            precision,
            display_length: precision_to_length(precision, 0, unsigned),
            unsigned,
            nullable: false,
            collation: Collation::Binary,
            temporal: None,
        }
    }

    #[inline]
    pub fn decimal(precision: u8, scale: u8, unsigned: bool) -> Self {
        let precision = precision.min(DECIMAL_MAX_PRECISION);
        let scale = scale.min(DECIMAL_MAX_SCALE);
        TypeAttr {
            result_type: ResultType::Decimal,
            scale,
            precision,
            display_length: precision_to_length(precision, scale, unsigned),
            unsigned,
            nullable: false,
            collation: Collation::Binary,
            temporal: None,
        }
    }

    #[inline]
    pub fn real(scale: u8) -> Self {
        TypeAttr {
            result_type: ResultType::Real,
            scale,
            precision: DBL_DIG as u8 + 2,
            display_length: float_length(scale),
            unsigned: false,
            nullable: false,
            collation: Collation::Binary,
            temporal: None,
        }
    }

    #[inline]
    pub fn string(len: u32, collation: Collation) -> Self {
        TypeAttr {
            result_type: ResultType::StringLike,
            scale: NOT_FIXED_DEC,
            precision: len.min(DECIMAL_MAX_PRECISION as u32) as u8,
            display_length: len,
            unsigned: false,
            nullable: false,
            collation,
            temporal: None,
        }
    }

    #[inline]
    pub fn temporal(kind: TemporalKind, frac: u8) -> Self {
        let frac = frac.min(6);
        TypeAttr {
            result_type: ResultType::Temporal,
            scale: frac,
            precision: kind.int_digits() + frac,
            display_length: kind.display_length(frac),
            unsigned: false,
            nullable: false,
            collation: Collation::Binary,
            temporal: Some(kind),
        }
    }

    #[inline]
    pub fn row(len: u32) -> Self {
        TypeAttr {
            result_type: ResultType::Row,
            scale: 0,
            precision: 0,
            display_length: len,
            unsigned: false,
            nullable: false,
            collation: Collation::Binary,
            temporal: None,
        }
    }

    #[inline]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    #[inline]
    pub fn is_scale_fixed(&self) -> bool {
        self.scale < FLOATING_POINT_DECIMALS
    }

    /// Scale usable for decimal computation.
    #[inline]
    pub fn decimal_scale(&self) -> u8 {
        self.scale.min(DECIMAL_MAX_SCALE)
    }

    /// Precision usable for decimal computation.
    #[inline]
    pub fn decimal_precision(&self) -> u8 {
        match self.result_type {
            ResultType::Integer | ResultType::Decimal | ResultType::Temporal => {
                self.precision.clamp(1, DECIMAL_MAX_PRECISION)
            }
            _ => {
                // floating and string values are treated as wide as possible
                let len = self.display_length.min(DECIMAL_MAX_PRECISION as u32) as u8;
                len.max(self.decimal_scale()).max(1)
            }
        }
    }

    /// Digits before the point.
    #[inline]
    pub fn decimal_int_part(&self) -> u8 {
        self.decimal_precision().saturating_sub(self.decimal_scale())
    }

    /// Length of the part before the point, sign included.
    #[inline]
    pub fn int_part_length(&self) -> u32 {
        if self.is_scale_fixed() && self.scale > 0 {
            self.display_length.saturating_sub(self.scale as u32 + 1)
        } else {
            self.display_length
        }
    }
}

/// Display length of a number with given precision and scale.
#[inline]
pub fn precision_to_length(precision: u8, scale: u8, unsigned: bool) -> u32 {
    precision as u32 + (scale > 0) as u32 + (!unsigned) as u32
}

/// Display length of a double with given scale.
#[inline]
pub fn float_length(scale: u8) -> u32 {
    if scale < FLOATING_POINT_DECIMALS {
        DBL_DIG + 2 + scale as u32
    } else {
        DBL_DIG + 8
    }
}

/// Number of decimal digits of an unsigned integer.
#[inline]
pub fn digits_of(mut v: u64) -> u8 {
    let mut n = 1;
    while v >= 10 {
        v /= 10;
        n += 1;
    }
    n
}

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreciseType {
    /// Only constant null will have null type.
    Null,
    /// Integer type.
    /// First argument is byte number.
    /// Second argument is unsigned flag.
    Int(u8, bool),
    Decimal(u8, u8),
    Float(u8),
    Bool,
    Date,
    Time(u8),
    Datetime(u8),
    /// Note: Char and Varchar length is not same as bytes.
    /// It depends on collation, e.g. commonly used utf8mb4
    /// uses at most 4 bytes to store single character.
    Char(u16, Collation),
    Varchar(u16, Collation),
}

impl PreciseType {
    #[inline]
    pub fn int(bytes: u8, unsigned: bool) -> Self {
        PreciseType::Int(bytes, unsigned)
    }

    #[inline]
    pub fn i32() -> Self {
        PreciseType::Int(4, false)
    }

    #[inline]
    pub fn i64() -> Self {
        PreciseType::Int(8, false)
    }

    #[inline]
    pub fn u64() -> Self {
        PreciseType::Int(8, true)
    }

    #[inline]
    pub fn f64() -> Self {
        PreciseType::Float(8)
    }

    #[inline]
    pub fn decimal(max_prec: u8, max_frac: u8) -> Self {
        PreciseType::Decimal(max_prec, max_frac)
    }

    #[inline]
    pub fn utf8(len: u16) -> Self {
        PreciseType::Char(len, Collation::Utf8mb4)
    }

    #[inline]
    pub fn var_utf8(max_len: u16) -> Self {
        PreciseType::Varchar(max_len, Collation::Utf8mb4)
    }

    #[inline]
    pub fn var_bytes(max_len: u16) -> Self {
        PreciseType::Varchar(max_len, Collation::Binary)
    }

    #[inline]
    pub fn date() -> Self {
        PreciseType::Date
    }

    #[inline]
    pub fn datetime(frac: u8) -> Self {
        PreciseType::Datetime(frac)
    }

    /// Type attributes of a value of this type.
    pub fn attr(&self) -> TypeAttr {
        match *self {
            PreciseType::Null => TypeAttr::null(),
            PreciseType::Int(bytes, unsigned) => {
                let precision = match bytes {
                    1 => 3,
                    2 => 5,
                    3 => 8,
                    4 => 10,
                    _ => {
                        if unsigned {
                            20
                        } else {
                            19
                        }
                    }
                };
                TypeAttr::integer(precision, unsigned)
            }
            PreciseType::Bool => TypeAttr::integer(1, false),
            PreciseType::Decimal(prec, frac) => TypeAttr::decimal(prec, frac, false),
            PreciseType::Float(4) => {
                let mut attr = TypeAttr::real(NOT_FIXED_DEC);
                attr.precision = 7;
                attr.display_length = 12;
                attr
            }
            PreciseType::Float(_) => TypeAttr::real(NOT_FIXED_DEC),
            PreciseType::Date => TypeAttr::temporal(TemporalKind::Date, 0),
            PreciseType::Time(frac) => TypeAttr::temporal(TemporalKind::Time, frac),
            PreciseType::Datetime(frac) => TypeAttr::temporal(TemporalKind::Datetime, frac),
            PreciseType::Char(len, collation) | PreciseType::Varchar(len, collation) => {
                TypeAttr::string(len as u32, collation)
            }
        }
    }

    #[inline]
    pub fn to_lower(&self) -> Cow<'_, str> {
        match self {
            PreciseType::Null => Cow::Borrowed("null"),
            PreciseType::Int(bytes, unsigned) => {
                if *unsigned {
                    Cow::Owned(format!("uint({})", bytes))
                } else {
                    Cow::Owned(format!("int({})", bytes))
                }
            }
            PreciseType::Decimal(max_prec, max_frac) => {
                Cow::Owned(format!("decimal({}, {})", max_prec, max_frac))
            }
            PreciseType::Float(bytes) => Cow::Owned(format!("float({})", bytes)),
            PreciseType::Bool => Cow::Borrowed("bool"),
            PreciseType::Date => Cow::Borrowed("date"),
            PreciseType::Time(frac) => Cow::Owned(format!("time({})", frac)),
            PreciseType::Datetime(frac) => Cow::Owned(format!("datetime({})", frac)),
            PreciseType::Char(n, c) => Cow::Owned(format!("char({}, {:?})", n, c)),
            PreciseType::Varchar(n, c) => Cow::Owned(format!("varchar({}, {:?})", n, c)),
        }
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collation {
    Ascii,
    Utf8mb4,
    Binary,
}

impl Collation {
    /// Collation used when comparing two strings of different collations.
    #[inline]
    pub fn merge(self, other: Collation) -> Collation {
        self.max(other)
    }

    /// Compares two strings under this collation.
    ///
    /// Binary collation compares bytes. The others ignore case and
    /// trailing spaces.
    pub fn compare(&self, lhs: &[u8], rhs: &[u8]) -> Ordering {
        match self {
            Collation::Binary => lhs.cmp(rhs),
            Collation::Ascii => {
                let lhs = trim_end_spaces(lhs);
                let rhs = trim_end_spaces(rhs);
                lhs.iter()
                    .map(u8::to_ascii_lowercase)
                    .cmp(rhs.iter().map(u8::to_ascii_lowercase))
            }
            Collation::Utf8mb4 => {
                let lhs = String::from_utf8_lossy(trim_end_spaces(lhs));
                let rhs = String::from_utf8_lossy(trim_end_spaces(rhs));
                lhs.chars()
                    .flat_map(char::to_lowercase)
                    .cmp(rhs.chars().flat_map(char::to_lowercase))
            }
        }
    }

    #[inline]
    pub fn equal(&self, lhs: &[u8], rhs: &[u8]) -> bool {
        self.compare(lhs, rhs) == Ordering::Equal
    }
}

#[inline]
fn trim_end_spaces(s: &[u8]) -> &[u8] {
    let mut end = s.len();
    while end > 0 && s[end - 1] == b' ' {
        end -= 1;
    }
    &s[..end]
}
