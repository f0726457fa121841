use crate::arith::IntArg;
use numex_datatype::{Collation, Decimal, Temporal};
use std::cmp::Ordering;

/// Which extreme `LEAST` or `GREATEST` keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Least,
    Greatest,
}

impl Extreme {
    /// Whether `new` replaces `cur`. Ties keep the earlier value.
    #[inline]
    pub fn replaces(&self, ord: Ordering) -> bool {
        match self {
            Extreme::Least => ord == Ordering::Less,
            Extreme::Greatest => ord == Ordering::Greater,
        }
    }
}

/// Folds `n` values from left to right, keeping the extreme one.
///
/// Values are produced lazily by `next`. The first NULL stops the fold
/// and makes the result NULL.
pub fn fold_extreme<T, E, F, C>(n: usize, ext: Extreme, mut next: F, cmp: C) -> Result<Option<T>, E>
where
    F: FnMut(usize) -> Result<Option<T>, E>,
    C: Fn(&T, &T) -> Ordering,
{
    let mut res: Option<T> = None;
    for i in 0..n {
        let v = match next(i)? {
            Some(v) => v,
            None => {
                log::trace!("null operand {} stops {:?}", i, ext);
                return Ok(None);
            }
        };
        res = match res {
            Some(cur) if !ext.replaces(cmp(&v, &cur)) => Some(cur),
            _ => Some(v),
        };
    }
    Ok(res)
}

/// Compares integers of possibly different signedness.
#[inline]
pub fn cmp_int(lhs: &IntArg, rhs: &IntArg) -> Ordering {
    lhs.to_i128().cmp(&rhs.to_i128())
}

#[inline]
pub fn cmp_real(lhs: &f64, rhs: &f64) -> Ordering {
    lhs.total_cmp(rhs)
}

#[inline]
pub fn cmp_decimal(lhs: &Decimal, rhs: &Decimal) -> Ordering {
    lhs.cmp(rhs)
}

#[inline]
pub fn cmp_temporal(lhs: &Temporal, rhs: &Temporal) -> Ordering {
    lhs.pack().cmp(&rhs.pack())
}

/// Index of the first haystack value equal to needle, starting from 1.
/// NULL haystack values are skipped, NULL needle never matches.
pub fn field<T, E, F, Q>(needle: Option<T>, n: usize, mut next: F, eq: Q) -> Result<i64, E>
where
    F: FnMut(usize) -> Result<Option<T>, E>,
    Q: Fn(&T, &T) -> bool,
{
    let needle = match needle {
        Some(needle) => needle,
        None => return Ok(0),
    };
    for i in 0..n {
        if let Some(v) = next(i)? {
            if eq(&needle, &v) {
                return Ok(i as i64 + 1);
            }
        }
    }
    Ok(0)
}

/// Position of needle in comma separated list, starting from 1.
///
/// Returns 0 if not found, if the list is empty or shorter than the
/// needle. An empty needle matches an empty item.
pub fn find_in_set(needle: &[u8], list: &[u8], collation: Collation) -> i64 {
    if list.is_empty() || list.len() < needle.len() {
        return 0;
    }
    list.split(|b| *b == b',')
        .position(|item| collation.equal(item, needle))
        .map(|pos| pos as i64 + 1)
        .unwrap_or_default()
}
