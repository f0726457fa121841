use crate::error::{Error, Result};
use crate::fold::{const_int, ConstInt};
use crate::session::Session;
use crate::{CastType, Expr, ExprKind, ExprMutVisitor, FuncKind};
use numex_datatype::{
    agg_cmp_type, agg_collation, agg_temporal_kind, precision_to_length,
    ResultType, TemporalKind, TypeAttr, DECIMAL_LONGLONG_DIGITS, DECIMAL_MAX_PRECISION,
    DECIMAL_MAX_SCALE, FLOATING_POINT_DECIMALS, INT64_DISPLAY_LENGTH, NOT_FIXED_DEC,
};
use std::ops::ControlFlow;

/// Resolve type attributes of the whole expression tree, in post order.
///
/// Inner nodes that are already resolved are kept as is, but the root
/// must not be resolved twice.
#[inline]
pub fn resolve(e: &mut Expr, session: &Session) -> Result<()> {
    if e.is_fixed() {
        return Err(Error::AlreadyResolved);
    }
    match e.walk_mut(&mut ResolveRec(session)) {
        ControlFlow::Break(err) => Err(err),
        ControlFlow::Continue(_) => Ok(()),
    }
}

struct ResolveRec<'a>(&'a Session);

impl ExprMutVisitor for ResolveRec<'_> {
    type Cont = ();
    type Break = Error;
    #[inline]
    fn leave(&mut self, e: &mut Expr) -> ControlFlow<Error> {
        if e.is_fixed() {
            return ControlFlow::Continue(());
        }
        match resolve_node(e, self.0) {
            Ok(_) => ControlFlow::Continue(()),
            Err(err) => ControlFlow::Break(err),
        }
    }
}

/// Resolve type attributes of given expression, with the assumption that
/// all its arguments have been already resolved.
pub fn resolve_node(e: &mut Expr, session: &Session) -> Result<()> {
    if e.is_fixed() {
        return Err(Error::AlreadyResolved);
    }
    let attr = match &e.kind {
        ExprKind::Const(v) => v.attr(),
        ExprKind::Col(c) => c.pty.attr().with_nullable(c.nullable),
        ExprKind::Row(es) => {
            if es.iter().any(|e| !e.is_fixed()) {
                return Err(Error::UnresolvedArgument("row"));
            }
            TypeAttr::row(es.len() as u32)
        }
        ExprKind::Cast { arg, ty } => {
            if !arg.is_fixed() {
                return Err(Error::UnresolvedArgument("cast"));
            }
            cast_attr(&arg.attr, *ty)?
        }
        ExprKind::Func { kind, args } => {
            let (min, max) = kind.n_args();
            if args.len() < min || max.map(|max| args.len() > max).unwrap_or_default() {
                return Err(Error::InvalidArgCount(kind.to_lower(), args.len()));
            }
            if args.iter().any(|a| !a.is_fixed()) {
                return Err(Error::UnresolvedArgument(kind.to_lower()));
            }
            if args.iter().any(|a| a.attr.result_type == ResultType::Row) {
                return Err(Error::RowOperand);
            }
            func_attr(*kind, args, session)?
        }
    };
    log::debug!(
        "resolved {} as {}(precision={}, scale={}, unsigned={}, nullable={})",
        e,
        attr.result_type.to_lower(),
        attr.precision,
        attr.scale,
        attr.unsigned,
        attr.nullable
    );
    e.set_fixed(attr);
    Ok(())
}

#[inline]
fn func_attr(kind: FuncKind, args: &[Expr], session: &Session) -> Result<TypeAttr> {
    use FuncKind::*;
    let nullable = args.iter().any(|a| a.attr.nullable);
    let attr = match kind {
        Add | Sub | Mul | Div | Mod => num_op_attr(kind, &args[0], &args[1], session),
        Neg | Abs => num1_attr(kind, &args[0]),
        Ceiling | Floor => int_val_attr(&args[0].attr),
        Round | Truncate => round_attr(kind == Truncate, args),
        IntDiv => int_div_attr(&args[0].attr, &args[1].attr),
        Sign => {
            let mut attr = TypeAttr::integer(1, false);
            attr.display_length = 2;
            attr.with_nullable(nullable)
        }
        BitCount => {
            let mut attr = TypeAttr::integer(2, false);
            attr.display_length = 2;
            attr.with_nullable(nullable)
        }
        BitInv | BitAnd | BitOr | BitXor | BitShl | BitShr => {
            let mut attr = TypeAttr::integer(DECIMAL_LONGLONG_DIGITS - 2, true);
            attr.display_length = INT64_DISPLAY_LENGTH;
            attr.with_nullable(nullable)
        }
        Ln | Log | Log2 | Log10 | Exp | Sqrt | Pow | Acos | Asin | Atan | Cos | Sin | Tan
        | Cot | Degrees | Radians => TypeAttr::real(NOT_FIXED_DEC).with_nullable(true),
        Least | Greatest => min_max_attr(args)?,
        Field => {
            let mut attr = TypeAttr::integer(3, false);
            attr.display_length = 3;
            attr
        }
        FindInSet => {
            let mut attr = TypeAttr::integer(3, false);
            attr.display_length = 3;
            attr.with_nullable(nullable)
        }
    };
    Ok(attr)
}

/// Binary arithmetic `+ - * / %`.
///
/// Domain is real if any operand is real or string, decimal if any
/// is decimal or temporal, otherwise integer. With a temporal operand
/// and no fractional digits on either side, integers are used.
fn num_op_attr(kind: FuncKind, lhs: &Expr, rhs: &Expr, session: &Session) -> TypeAttr {
    use ResultType::*;
    let (a0, a1) = (&lhs.attr, &rhs.attr);
    let (r0, r1) = (a0.result_type, a1.result_type);
    let mut domain = match (r0, r1) {
        (Real | StringLike, _) | (_, Real | StringLike) => Real,
        (Decimal | Temporal, _) | (_, Decimal | Temporal) => Decimal,
        _ => Integer,
    };
    if domain == Decimal
        && (r0 == Temporal || r1 == Temporal)
        && a0.decimal_scale().max(a1.decimal_scale()) == 0
    {
        domain = Integer;
    }
    if kind == FuncKind::Div && domain == Integer {
        domain = Decimal;
    }
    let (s0, s1) = (a0.decimal_scale(), a1.decimal_scale());
    let (p0, p1) = (a0.decimal_precision(), a1.decimal_precision());
    let (i0, i1) = (a0.decimal_int_part(), a1.decimal_int_part());
    let incr = session.precision_increment();
    let mut attr = match domain {
        Real => {
            let mut scale = a0.scale.max(a1.scale);
            if kind == FuncKind::Div {
                scale = scale.saturating_add(incr);
            }
            if scale >= FLOATING_POINT_DECIMALS {
                scale = NOT_FIXED_DEC;
            }
            let mut attr = TypeAttr::real(scale);
            if kind == FuncKind::Mod {
                attr.unsigned = a0.unsigned;
            }
            attr
        }
        Integer => {
            let (precision, unsigned) = match kind {
                FuncKind::Add | FuncKind::Sub => (i0.max(i1) + 1, a0.unsigned || a1.unsigned),
                FuncKind::Mul => (p0 + p1, a0.unsigned || a1.unsigned),
                _ => (p0.max(p1), a0.unsigned),
            };
            TypeAttr::integer(precision.min(DECIMAL_MAX_PRECISION), unsigned)
        }
        _ => {
            let (precision, scale, unsigned) = match kind {
                FuncKind::Add | FuncKind::Sub => {
                    let scale = s0.max(s1);
                    (i0.max(i1) + 1 + scale, scale, a0.unsigned && a1.unsigned)
                }
                FuncKind::Mul => (
                    p0 + p1,
                    (s0 + s1).min(DECIMAL_MAX_SCALE),
                    a0.unsigned && a1.unsigned,
                ),
                FuncKind::Div => (
                    p0 + s1 + incr,
                    (s0 + incr).min(DECIMAL_MAX_SCALE),
                    a0.unsigned && a1.unsigned,
                ),
                _ => (p0.max(p1), s0.max(s1), a0.unsigned),
            };
            TypeAttr::decimal(precision, scale, unsigned)
        }
    };
    if kind == FuncKind::Sub && attr.unsigned && session.unsigned_subtraction_mode() {
        attr.unsigned = false;
        attr.display_length += 1;
    }
    // overflow and division by zero both produce null
    attr.nullable = true;
    attr
}

/// `NEG` and `ABS`.
fn num1_attr(kind: FuncKind, arg: &Expr) -> TypeAttr {
    let a0 = &arg.attr;
    let neg = kind == FuncKind::Neg;
    let mut attr = match a0.result_type {
        ResultType::Integer => {
            if neg && !neg_representable(arg) {
                TypeAttr::decimal(a0.decimal_precision(), 0, false)
            } else {
                let mut attr = TypeAttr::integer(a0.precision, a0.unsigned && !neg);
                attr.display_length = a0.display_length;
                attr
            }
        }
        ResultType::Real | ResultType::StringLike => {
            let scale = if a0.is_scale_fixed() {
                a0.scale
            } else {
                NOT_FIXED_DEC
            };
            TypeAttr::real(scale)
        }
        _ => TypeAttr::decimal(
            a0.decimal_precision(),
            a0.decimal_scale(),
            a0.unsigned && !neg,
        ),
    };
    if neg {
        attr.display_length += 1;
    }
    attr.nullable = true;
    attr
}

/// Whether negation of the integer operand fits in signed 64 bits.
/// Only constants are checked, other values are checked at runtime.
#[inline]
fn neg_representable(arg: &Expr) -> bool {
    match const_int(arg) {
        Some(ConstInt::Value(v, false)) => v != i64::MIN,
        Some(ConstInt::Value(v, true)) => (v as u64) <= 1u64 << 63,
        _ => true,
    }
}

/// `CEILING` and `FLOOR`.
fn int_val_attr(a0: &TypeAttr) -> TypeAttr {
    let attr = match a0.result_type {
        ResultType::Real | ResultType::StringLike => TypeAttr::real(0),
        _ => {
            let frac = a0.decimal_scale();
            let precision = (a0.decimal_int_part() + (frac > 0) as u8).max(1);
            if a0.display_length.saturating_sub(frac as u32)
                >= (DECIMAL_LONGLONG_DIGITS - 2) as u32
            {
                TypeAttr::decimal(precision, 0, a0.unsigned)
            } else {
                TypeAttr::integer(precision, a0.unsigned)
            }
        }
    };
    attr.with_nullable(true)
}

/// `ROUND` and `TRUNCATE`.
fn round_attr(truncate: bool, args: &[Expr]) -> TypeAttr {
    let a0 = &args[0].attr;
    let unsigned = a0.unsigned;
    let digits = match args.get(1) {
        None => Some(ConstInt::Value(0, false)),
        Some(d) if d.is_const() || const_int(d).is_some() => const_int(d),
        Some(_) => None,
    };
    let digits = match digits {
        Some(digits) => digits,
        None => {
            // digits unknown until evaluation
            let attr = if a0.result_type == ResultType::Decimal {
                TypeAttr::decimal(a0.precision + 1, a0.scale, unsigned)
            } else {
                TypeAttr::real(a0.scale)
            };
            return attr.with_nullable(true);
        }
    };
    let (n, n_unsigned) = match digits {
        ConstInt::Null => (0i128, false),
        ConstInt::Value(v, true) => (v as u64 as i128, true),
        ConstInt::Value(v, false) => (v as i128, false),
    };
    let digits_to_set: i128 = if n < 0 {
        0
    } else {
        n.min(i32::MAX as i128)
    };
    if !a0.is_scale_fixed()
        || matches!(a0.result_type, ResultType::Real | ResultType::StringLike)
    {
        let scale = digits_to_set.min(NOT_FIXED_DEC as i128) as u8;
        let scale = if scale >= FLOATING_POINT_DECIMALS {
            NOT_FIXED_DEC
        } else {
            scale
        };
        let mut attr = TypeAttr::real(scale).with_nullable(true);
        attr.unsigned = unsigned;
        return attr;
    }
    if a0.result_type == ResultType::Integer
        && ((digits_to_set == 0 && truncate) || a0.decimal_precision() < DECIMAL_LONGLONG_DIGITS)
    {
        let length_can_increase = !truncate && n < 0 && !n_unsigned;
        let mut attr = TypeAttr::integer(a0.precision + length_can_increase as u8, unsigned);
        attr.display_length = a0.display_length + length_can_increase as u32;
        return attr.with_nullable(true);
    }
    let scale = digits_to_set.min(DECIMAL_MAX_SCALE as i128) as i32;
    let delta = a0.decimal_scale() as i32 - scale;
    let length_increase = if delta <= 0 || truncate { 0 } else { 1 };
    let precision = (a0.decimal_precision() as i32 - delta + length_increase)
        .clamp(1, DECIMAL_MAX_PRECISION as i32);
    TypeAttr::decimal(precision as u8, scale as u8, unsigned).with_nullable(true)
}

/// Integer division `DIV`.
fn int_div_attr(a0: &TypeAttr, a1: &TypeAttr) -> TypeAttr {
    let display = a0.int_part_length().min(INT64_DISPLAY_LENGTH);
    let precision = a0
        .decimal_int_part()
        .clamp(1, DECIMAL_LONGLONG_DIGITS - 2);
    let mut attr = TypeAttr::integer(precision, a0.unsigned || a1.unsigned);
    attr.display_length = display.max(1);
    attr.with_nullable(true)
}

/// `LEAST` and `GREATEST`.
fn min_max_attr(args: &[Expr]) -> Result<TypeAttr> {
    let attrs: Vec<&TypeAttr> = args.iter().map(|a| &a.attr).collect();
    let nullable = attrs.iter().any(|a| a.nullable);
    let unsigned = attrs.iter().all(|a| a.unsigned);
    let cmp = agg_cmp_type(attrs.iter().map(|a| a.result_type)).ok_or(Error::RowOperand)?;
    let attr = match cmp {
        ResultType::Row => return Err(Error::RowOperand),
        ResultType::Temporal => {
            let kind: TemporalKind = agg_temporal_kind(attrs.iter().copied());
            let frac = attrs
                .iter()
                .filter(|a| a.result_type == ResultType::Temporal)
                .map(|a| a.scale)
                .max()
                .unwrap_or_default();
            let all_temporal = attrs.iter().all(|a| a.temporal.is_some());
            // non-temporal operands may fail to convert
            TypeAttr::temporal(kind, frac).with_nullable(nullable || !all_temporal)
        }
        ResultType::StringLike => {
            let len = attrs.iter().map(|a| a.display_length).max().unwrap_or_default();
            TypeAttr::string(len, agg_collation(attrs.iter().copied())).with_nullable(nullable)
        }
        ResultType::Integer => {
            let precision = attrs.iter().map(|a| a.precision).max().unwrap_or(1);
            let any_unsigned = attrs.iter().any(|a| a.unsigned);
            if any_unsigned && !unsigned {
                // mixed signedness can not be kept in 64 bits
                TypeAttr::decimal(precision, 0, false).with_nullable(nullable)
            } else {
                TypeAttr::integer(precision, unsigned).with_nullable(nullable)
            }
        }
        ResultType::Decimal => {
            let scale = attrs.iter().map(|a| a.decimal_scale()).max().unwrap_or_default();
            let intg = attrs.iter().map(|a| a.decimal_int_part()).max().unwrap_or(1);
            TypeAttr::decimal(intg + scale, scale, unsigned).with_nullable(nullable)
        }
        ResultType::Real => {
            let scale = attrs.iter().map(|a| a.scale).max().unwrap_or(NOT_FIXED_DEC);
            let scale = if scale >= FLOATING_POINT_DECIMALS {
                NOT_FIXED_DEC
            } else {
                scale
            };
            TypeAttr::real(scale).with_nullable(nullable)
        }
    };
    Ok(attr)
}

fn cast_attr(a0: &TypeAttr, ty: CastType) -> Result<TypeAttr> {
    if a0.result_type == ResultType::Row {
        return Err(Error::RowOperand);
    }
    let attr = match ty {
        CastType::Signed => TypeAttr::integer(DECIMAL_LONGLONG_DIGITS - 3, false),
        CastType::Unsigned => TypeAttr::integer(DECIMAL_LONGLONG_DIGITS - 2, true),
        CastType::Decimal(precision, scale) => {
            if precision == 0
                || precision > DECIMAL_MAX_PRECISION
                || scale > precision.min(DECIMAL_MAX_SCALE)
            {
                return Err(Error::InvalidCast(ty.to_lower()));
            }
            let mut attr = TypeAttr::decimal(precision, scale, false);
            attr.display_length = precision_to_length(precision, scale, false);
            attr
        }
        CastType::Double => TypeAttr::real(NOT_FIXED_DEC),
    };
    Ok(attr.with_nullable(a0.nullable))
}
