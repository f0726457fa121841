use crate::temporal::TemporalKind;
use crate::{Collation, ResultType, TypeAttr};

/// Align two result types to single type for comparison.
///
/// Strings are compared as strings only against strings, integers
/// mixed with decimals are compared as decimals, temporals dominate
/// everything else. All other combinations fall back to double, which
/// is the behavior of MySQL and we choose to follow it.
#[inline]
pub fn cmp_type(this: ResultType, that: ResultType) -> ResultType {
    use ResultType::*;
    match (this, that) {
        (StringLike, StringLike) => StringLike,
        (Integer, Integer) => Integer,
        (Row, _) | (_, Row) => Row,
        (Temporal, _) | (_, Temporal) => Temporal,
        (Integer | Decimal, Integer | Decimal) => Decimal,
        _ => Real,
    }
}

/// Folds result types of all operands into one comparison type.
#[inline]
pub fn agg_cmp_type<I>(types: I) -> Option<ResultType>
where
    I: IntoIterator<Item = ResultType>,
{
    types.into_iter().reduce(cmp_type)
}

/// Same as [`agg_cmp_type`] but temporal operands take part as strings.
#[inline]
pub fn agg_cmp_type_untimed<I>(types: I) -> Option<ResultType>
where
    I: IntoIterator<Item = ResultType>,
{
    agg_cmp_type(types.into_iter().map(|ty| match ty {
        ResultType::Temporal => ResultType::StringLike,
        other => other,
    }))
}

/// Collation used to compare strings of given attributes.
#[inline]
pub fn agg_collation<'a, I>(attrs: I) -> Collation
where
    I: IntoIterator<Item = &'a TypeAttr>,
{
    attrs
        .into_iter()
        .filter(|a| a.result_type == ResultType::StringLike)
        .map(|a| a.collation)
        .reduce(Collation::merge)
        .unwrap_or(Collation::Binary)
}

/// Common temporal kind of operands. Non-temporal operands are
/// converted to datetime.
#[inline]
pub fn agg_temporal_kind<'a, I>(attrs: I) -> TemporalKind
where
    I: IntoIterator<Item = &'a TypeAttr>,
{
    attrs
        .into_iter()
        .map(|a| a.temporal.unwrap_or(TemporalKind::Datetime))
        .reduce(TemporalKind::merge)
        .unwrap_or(TemporalKind::Datetime)
}
