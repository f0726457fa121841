use crate::{CastType, Expr, ExprKind, FuncKind};
use numex_datatype::{str_to_i64, Value};

/// Integer value of a constant expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstInt {
    Null,
    /// Bit pattern and unsigned flag.
    Value(i64, bool),
}

impl ConstInt {
    #[inline]
    fn from_i128(v: i128) -> Option<Self> {
        if let Ok(v) = i64::try_from(v) {
            Some(ConstInt::Value(v, false))
        } else if let Ok(v) = u64::try_from(v) {
            Some(ConstInt::Value(v as i64, true))
        } else {
            None
        }
    }

    #[inline]
    pub fn to_i128(&self) -> Option<i128> {
        match self {
            ConstInt::Null => None,
            ConstInt::Value(v, true) => Some(*v as u64 as i128),
            ConstInt::Value(v, false) => Some(*v as i128),
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, ConstInt::Null)
    }
}

/// Evaluates a constant expression as integer.
///
/// Returns None if the expression depends on columns, or is
/// too complex to be folded here, or the value does not fit in
/// 64 bits.
pub fn const_int(e: &Expr) -> Option<ConstInt> {
    match &e.kind {
        ExprKind::Const(v) => const_value_int(v),
        ExprKind::Func { kind, args } => match (kind, args.as_slice()) {
            (FuncKind::Neg, [arg]) => fold_unary(arg, |v| -v),
            (FuncKind::Abs, [arg]) => fold_unary(arg, i128::abs),
            (FuncKind::Add, [lhs, rhs]) => fold_binary(lhs, rhs, |a, b| a.checked_add(b)),
            (FuncKind::Sub, [lhs, rhs]) => fold_binary(lhs, rhs, |a, b| a.checked_sub(b)),
            (FuncKind::Mul, [lhs, rhs]) => fold_binary(lhs, rhs, |a, b| a.checked_mul(b)),
            _ => None,
        },
        ExprKind::Cast { arg, ty } => {
            let c = const_int(arg)?;
            match (ty, c) {
                (_, ConstInt::Null) => Some(ConstInt::Null),
                (CastType::Signed, ConstInt::Value(v, _)) => Some(ConstInt::Value(v, false)),
                (CastType::Unsigned, ConstInt::Value(v, _)) => Some(ConstInt::Value(v, true)),
                _ => None,
            }
        }
        ExprKind::Col(_) | ExprKind::Row(_) => None,
    }
}

#[inline]
fn const_value_int(v: &Value) -> Option<ConstInt> {
    let res = match v {
        Value::Null => ConstInt::Null,
        Value::I64(v) => ConstInt::Value(*v, false),
        Value::U64(v) => ConstInt::Value(*v as i64, true),
        Value::F64(_) | Value::Decimal(_) => {
            let (n, trunc) = v.to_i64(false)?;
            if trunc.is_some() {
                return None;
            }
            ConstInt::Value(n, false)
        }
        Value::Str(s, _) => ConstInt::Value(str_to_i64(s, false).0, false),
        Value::Temporal(_) => return None,
    };
    Some(res)
}

#[inline]
fn fold_unary<F: Fn(i128) -> i128>(arg: &Expr, f: F) -> Option<ConstInt> {
    match const_int(arg)? {
        ConstInt::Null => Some(ConstInt::Null),
        c => ConstInt::from_i128(f(c.to_i128()?)),
    }
}

#[inline]
fn fold_binary<F: Fn(i128, i128) -> Option<i128>>(
    lhs: &Expr,
    rhs: &Expr,
    f: F,
) -> Option<ConstInt> {
    let lhs = const_int(lhs)?;
    let rhs = const_int(rhs)?;
    match (lhs.to_i128(), rhs.to_i128()) {
        (Some(a), Some(b)) => ConstInt::from_i128(f(a, b)?),
        _ => Some(ConstInt::Null),
    }
}
