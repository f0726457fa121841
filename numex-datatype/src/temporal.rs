use crate::decimal::{Decimal, DecimalStatus};
use crate::{Date, Datetime, Time};
use num_bigint::BigInt;
use static_init::dynamic;
use std::fmt;
use time::format_description::{self, FormatItem};
use time::Month;

#[dynamic]
pub static DEFAULT_DATE_FORMAT: Vec<FormatItem<'static>> =
    format_description::parse("[year]-[month]-[day]").unwrap();

#[dynamic]
static DATETIME_FORMAT: Vec<FormatItem<'static>> =
    format_description::parse("[year]-[month]-[day] [hour]:[minute]:[second]").unwrap();

#[dynamic]
static DATETIME_FRAC_FORMAT: Vec<FormatItem<'static>> =
    format_description::parse("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]")
        .unwrap();

#[dynamic]
static TIME_FORMAT: Vec<FormatItem<'static>> =
    format_description::parse("[hour]:[minute]:[second]").unwrap();

#[dynamic]
static TIME_FRAC_FORMAT: Vec<FormatItem<'static>> =
    format_description::parse("[hour]:[minute]:[second].[subsecond]").unwrap();

const MAX_TIME_HOUR: u16 = 838;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TemporalKind {
    Date,
    Time,
    Datetime,
}

impl TemporalKind {
    #[inline]
    pub fn to_lower(&self) -> &'static str {
        match self {
            TemporalKind::Date => "date",
            TemporalKind::Time => "time",
            TemporalKind::Datetime => "datetime",
        }
    }

    /// Digits of the numeric form before the point.
    #[inline]
    pub fn int_digits(&self) -> u8 {
        match self {
            TemporalKind::Date => 8,
            TemporalKind::Time => 7,
            TemporalKind::Datetime => 14,
        }
    }

    #[inline]
    pub fn display_length(&self, frac: u8) -> u32 {
        let base = match self {
            TemporalKind::Date => 10,
            TemporalKind::Time => 10,
            TemporalKind::Datetime => 19,
        };
        if frac > 0 {
            base + 1 + frac as u32
        } else {
            base
        }
    }

    /// Common kind of two temporal values.
    #[inline]
    pub fn merge(self, other: TemporalKind) -> TemporalKind {
        if self == other {
            self
        } else {
            TemporalKind::Datetime
        }
    }
}

/// Fixed-width temporal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Temporal {
    pub kind: TemporalKind,
    pub neg: bool,
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u16,
    pub minute: u8,
    pub second: u8,
    pub micros: u32,
    /// Fractional digits to render.
    pub frac: u8,
}

impl Temporal {
    #[inline]
    pub fn from_date(date: Date) -> Self {
        Temporal {
            kind: TemporalKind::Date,
            neg: false,
            year: date.year() as u16,
            month: date.month() as u8,
            day: date.day(),
            hour: 0,
            minute: 0,
            second: 0,
            micros: 0,
            frac: 0,
        }
    }

    #[inline]
    pub fn from_datetime(dt: Datetime, frac: u8) -> Self {
        Temporal {
            kind: TemporalKind::Datetime,
            neg: false,
            year: dt.year() as u16,
            month: dt.month() as u8,
            day: dt.day(),
            hour: dt.hour() as u16,
            minute: dt.minute(),
            second: dt.second(),
            micros: dt.microsecond(),
            frac: frac.min(6),
        }
    }

    #[inline]
    pub fn from_time(tm: Time, frac: u8) -> Self {
        Temporal {
            kind: TemporalKind::Time,
            neg: false,
            year: 0,
            month: 0,
            day: 0,
            hour: tm.hour() as u16,
            minute: tm.minute(),
            second: tm.second(),
            micros: tm.microsecond(),
            frac: frac.min(6),
        }
    }

    /// Parses text in one of the default formats.
    /// The kind of the result follows the text.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let frac = s
            .rsplit_once('.')
            .map(|(_, f)| f.len().min(6) as u8)
            .unwrap_or(0);
        if let Ok(dt) = Datetime::parse(s, &DATETIME_FRAC_FORMAT[..]) {
            return Some(Temporal::from_datetime(dt, frac));
        }
        if let Ok(dt) = Datetime::parse(s, &DATETIME_FORMAT[..]) {
            return Some(Temporal::from_datetime(dt, 0));
        }
        if let Ok(d) = Date::parse(s, &DEFAULT_DATE_FORMAT[..]) {
            return Some(Temporal::from_date(d));
        }
        if let Ok(tm) = Time::parse(s, &TIME_FRAC_FORMAT[..]) {
            return Some(Temporal::from_time(tm, frac));
        }
        if let Ok(tm) = Time::parse(s, &TIME_FORMAT[..]) {
            return Some(Temporal::from_time(tm, 0));
        }
        None
    }

    /// Interprets a number as YYYYMMDD, YYYYMMDDhhmmss or hhmmss.
    pub fn from_number(n: i64, micros: u32, kind: TemporalKind) -> Option<Self> {
        if kind == TemporalKind::Time {
            let neg = n < 0;
            let n = n.unsigned_abs();
            let (hour, minute, second) = (n / 10000, (n / 100 % 100) as u8, (n % 100) as u8);
            if hour > MAX_TIME_HOUR as u64 || minute > 59 || second > 59 {
                return None;
            }
            return Some(Temporal {
                kind,
                neg,
                year: 0,
                month: 0,
                day: 0,
                hour: hour as u16,
                minute,
                second,
                micros,
                frac: if micros > 0 { 6 } else { 0 },
            });
        }
        let (ymd, hms) = match n {
            10000101..=99991231 => (n, None),
            10000101000000..=99991231235959 => (n / 1_000_000, Some(n % 1_000_000)),
            _ => return None,
        };
        let month = Month::try_from((ymd / 100 % 100) as u8).ok()?;
        let date = Date::from_calendar_date((ymd / 10000) as i32, month, (ymd % 100) as u8).ok()?;
        match hms {
            None if micros == 0 && kind == TemporalKind::Date => Some(Temporal::from_date(date)),
            None => {
                let dt = Datetime::new(date, Time::from_hms_micro(0, 0, 0, micros).ok()?);
                let frac = if micros > 0 { 6 } else { 0 };
                Some(Temporal::from_datetime(dt, frac).with_kind(kind))
            }
            Some(hms) => {
                let tm = Time::from_hms_micro(
                    (hms / 10000) as u8,
                    (hms / 100 % 100) as u8,
                    (hms % 100) as u8,
                    micros,
                )
                .ok()?;
                let frac = if micros > 0 { 6 } else { 0 };
                Some(Temporal::from_datetime(Datetime::new(date, tm), frac).with_kind(kind))
            }
        }
    }

    /// Converts to another kind, dropping or zero-filling fields.
    pub fn with_kind(mut self, kind: TemporalKind) -> Self {
        match (self.kind, kind) {
            (TemporalKind::Datetime, TemporalKind::Date) => {
                self.hour = 0;
                self.minute = 0;
                self.second = 0;
                self.micros = 0;
                self.frac = 0;
            }
            (TemporalKind::Date, TemporalKind::Time) | (TemporalKind::Datetime, TemporalKind::Time) => {
                self.year = 0;
                self.month = 0;
                self.day = 0;
            }
            _ => (),
        }
        self.kind = kind;
        self
    }

    /// Packs into an integer whose order is the temporal order.
    pub fn pack(&self) -> i64 {
        let hms = ((self.hour as i64) << 12) | ((self.minute as i64) << 6) | self.second as i64;
        let packed = match self.kind {
            TemporalKind::Time => (hms << 24) + self.micros as i64,
            _ => {
                let ym = self.year as i64 * 13 + self.month as i64;
                let ymd = (ym << 5) | self.day as i64;
                (((ymd << 17) | hms) << 24) + self.micros as i64
            }
        };
        if self.neg {
            -packed
        } else {
            packed
        }
    }

    /// Numeric form without fractional part.
    pub fn to_i64(&self) -> i64 {
        let ymd = self.year as i64 * 10000 + self.month as i64 * 100 + self.day as i64;
        let hms = self.hour as i64 * 10000 + self.minute as i64 * 100 + self.second as i64;
        let n = match self.kind {
            TemporalKind::Date => ymd,
            TemporalKind::Time => hms,
            TemporalKind::Datetime => ymd * 1_000_000 + hms,
        };
        if self.neg {
            -n
        } else {
            n
        }
    }

    /// Numeric form with `frac` fractional digits.
    pub fn to_decimal(&self) -> Decimal {
        let scale = self.frac.min(6) as u32;
        let n = self.to_i64().unsigned_abs() as i128;
        let digits = n * 10i128.pow(scale) + (self.micros / 10u32.pow(6 - scale)) as i128;
        let digits = if self.neg { -digits } else { digits };
        let (dec, status) = Decimal::checked(BigInt::from(digits), scale as i64);
        debug_assert_eq!(DecimalStatus::Ok, status);
        dec
    }

    #[inline]
    pub fn to_f64(&self) -> f64 {
        let v = self.to_i64().unsigned_abs() as f64 + self.micros as f64 / 1_000_000.0;
        if self.neg {
            -v
        } else {
            v
        }
    }
}

impl fmt::Display for Temporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TemporalKind::Date => {
                return write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day);
            }
            TemporalKind::Time => {
                if self.neg {
                    f.write_str("-")?;
                }
                write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
            }
            TemporalKind::Datetime => write!(
                f,
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                self.year, self.month, self.day, self.hour, self.minute, self.second
            )?,
        }
        if self.frac > 0 {
            let frac = self.frac.min(6) as u32;
            let v = self.micros / 10u32.pow(6 - frac);
            write!(f, ".{:0width$}", v, width = frac as usize)?;
        }
        Ok(())
    }
}
