use crate::arith::*;
use crate::convert::{cast_decimal, int_value, negative_to_unsigned};
use crate::error::{Error, Result};
use crate::minmax::{
    cmp_decimal, cmp_int, cmp_real, cmp_temporal, field, find_in_set, fold_extreme, Extreme,
};
use crate::round::{decimal_round, double_round, int_round};
use numex_datatype::{
    agg_cmp_type_untimed, agg_collation, double_to_i64, Collation, Decimal, ResultType, Temporal,
    TemporalKind, Truncation, Value,
};
use numex_expr::{CastType, Diagnostic, DiagnosticSink, Expr, ExprKind, FuncKind, Session};
use std::sync::Arc;

type Bytes = (Arc<[u8]>, Collation);

/// Evaluator of resolved expressions on single row.
///
/// Exactly one of integer, real and decimal computation runs for an
/// arithmetic node, selected by its resolved result type. Conditions
/// like overflow and division by zero make the node NULL and are
/// reported to the diagnostic sink.
pub struct Evaluator<'a> {
    session: &'a Session,
    sink: &'a mut dyn DiagnosticSink,
}

impl<'a> Evaluator<'a> {
    #[inline]
    pub fn new(session: &'a Session, sink: &'a mut dyn DiagnosticSink) -> Self {
        Evaluator { session, sink }
    }

    /// Evaluates expression in the domain of its resolved type.
    pub fn eval(&mut self, e: &Expr, row: &[Value]) -> Result<Value> {
        if !e.is_fixed() {
            return Err(Error::Unresolved);
        }
        match &e.kind {
            ExprKind::Const(v) => Ok(v.clone()),
            ExprKind::Col(c) => {
                let idx = c.idx.value() as usize;
                row.get(idx).cloned().ok_or(Error::ColumnOutOfRange(idx))
            }
            ExprKind::Row(_) => Err(Error::RowNotSupported),
            _ => {
                let res = match e.attr().result_type {
                    ResultType::Integer => self
                        .val_int(e, row)?
                        .map(|v| int_value(v, e.attr().unsigned)),
                    ResultType::Real => self.val_real(e, row)?.and_then(Value::new_f64),
                    ResultType::Decimal => self.val_decimal(e, row)?.map(Value::Decimal),
                    ResultType::StringLike => {
                        self.val_str(e, row)?.map(|(s, c)| Value::Str(s, c))
                    }
                    ResultType::Temporal => {
                        let kind = e.attr().temporal.unwrap_or(TemporalKind::Datetime);
                        self.val_temporal(e, row, kind)?.map(Value::Temporal)
                    }
                    ResultType::Row => return Err(Error::RowNotSupported),
                };
                Ok(res.unwrap_or_default())
            }
        }
    }

    /// Evaluates expression as integer. The result is the bit pattern,
    /// read as unsigned if the expression is unsigned.
    pub fn val_int(&mut self, e: &Expr, row: &[Value]) -> Result<Option<i64>> {
        match (&e.kind, e.attr().result_type) {
            (ExprKind::Func { kind, args }, ResultType::Integer) => {
                self.func_int(e, *kind, args, row)
            }
            (ExprKind::Cast { arg, ty }, ResultType::Integer) => self.cast_int(arg, *ty, row),
            _ => {
                let v = self.eval(e, row)?;
                Ok(v.to_i64(e.attr().unsigned).map(|c| self.converted(c)))
            }
        }
    }

    pub fn val_real(&mut self, e: &Expr, row: &[Value]) -> Result<Option<f64>> {
        match (&e.kind, e.attr().result_type) {
            (ExprKind::Func { kind, args }, ResultType::Real) => {
                self.func_real(e, *kind, args, row)
            }
            (ExprKind::Cast { arg, .. }, ResultType::Real) => self.val_real(arg, row),
            _ => {
                let v = self.eval(e, row)?;
                Ok(v.to_f64().map(|c| self.converted(c)))
            }
        }
    }

    pub fn val_decimal(&mut self, e: &Expr, row: &[Value]) -> Result<Option<Decimal>> {
        match (&e.kind, e.attr().result_type) {
            (ExprKind::Func { kind, args }, ResultType::Decimal) => {
                self.func_decimal(e, *kind, args, row)
            }
            (
                ExprKind::Cast {
                    arg,
                    ty: CastType::Decimal(precision, scale),
                },
                ResultType::Decimal,
            ) => {
                let d = match self.val_decimal(arg, row)? {
                    Some(d) => d,
                    None => return Ok(None),
                };
                let (res, out_of_range) = cast_decimal(&d, *precision, *scale);
                if out_of_range {
                    self.sink
                        .push(Diagnostic::cast_out_of_range(&e.to_string()));
                }
                Ok(Some(res))
            }
            _ => {
                let v = self.eval(e, row)?;
                Ok(v.to_decimal().map(|c| self.converted(c)))
            }
        }
    }

    pub fn val_str(&mut self, e: &Expr, row: &[Value]) -> Result<Option<Bytes>> {
        match (&e.kind, e.attr().result_type) {
            (ExprKind::Func { kind, args }, ResultType::StringLike) => {
                self.func_str(e, *kind, args, row)
            }
            _ => Ok(self.eval(e, row)?.to_bytes()),
        }
    }

    pub fn val_temporal(
        &mut self,
        e: &Expr,
        row: &[Value],
        kind: TemporalKind,
    ) -> Result<Option<Temporal>> {
        match (&e.kind, e.attr().result_type) {
            (ExprKind::Func { kind: fk, args }, ResultType::Temporal) => {
                let res = self.func_temporal(e, *fk, args, row)?;
                Ok(res.map(|t| t.with_kind(kind)))
            }
            _ => match self.eval(e, row)?.to_temporal(kind) {
                Ok(t) => Ok(t),
                Err(trunc) => {
                    self.truncated(trunc);
                    Ok(None)
                }
            },
        }
    }

    #[inline]
    fn converted<T>(&mut self, (v, trunc): (T, Option<Truncation>)) -> T {
        if let Some(trunc) = trunc {
            self.truncated(trunc);
        }
        v
    }

    #[inline]
    fn truncated(&mut self, trunc: Truncation) {
        self.sink
            .push(Diagnostic::truncated(trunc.target, &trunc.text));
    }

    /// Turns arithmetic condition into NULL and diagnostic.
    #[inline]
    fn checked<T>(&mut self, e: &Expr, res: ArithResult<T>) -> Option<T> {
        match res {
            Ok(v) => Some(v),
            Err(err) => {
                log::debug!("{} evaluates to null: {}", e, err);
                if let Some(diag) = err.to_diagnostic(e, self.session) {
                    self.sink.push(diag);
                }
                None
            }
        }
    }

    #[inline]
    fn int_arg(&mut self, e: &Expr, row: &[Value]) -> Result<Option<IntArg>> {
        Ok(self
            .val_int(e, row)?
            .map(|v| IntArg::new(v, e.attr().unsigned)))
    }

    #[inline]
    fn int_args(&mut self, args: &[Expr], row: &[Value]) -> Result<Option<(IntArg, IntArg)>> {
        let lhs = match self.int_arg(&args[0], row)? {
            Some(lhs) => lhs,
            None => return Ok(None),
        };
        Ok(self.int_arg(&args[1], row)?.map(|rhs| (lhs, rhs)))
    }

    #[inline]
    fn real_args(&mut self, args: &[Expr], row: &[Value]) -> Result<Option<(f64, f64)>> {
        let lhs = match self.val_real(&args[0], row)? {
            Some(lhs) => lhs,
            None => return Ok(None),
        };
        Ok(self.val_real(&args[1], row)?.map(|rhs| (lhs, rhs)))
    }

    #[inline]
    fn decimal_args(
        &mut self,
        args: &[Expr],
        row: &[Value],
    ) -> Result<Option<(Decimal, Decimal)>> {
        let lhs = match self.val_decimal(&args[0], row)? {
            Some(lhs) => lhs,
            None => return Ok(None),
        };
        Ok(self.val_decimal(&args[1], row)?.map(|rhs| (lhs, rhs)))
    }

    /// Digits argument of ROUND and TRUNCATE, zero if omitted.
    #[inline]
    fn round_digits(&mut self, args: &[Expr], row: &[Value]) -> Result<Option<(i64, bool)>> {
        match args.get(1) {
            None => Ok(Some((0, false))),
            Some(d) => Ok(self.val_int(d, row)?.map(|v| (v, d.attr().unsigned))),
        }
    }

    fn func_int(
        &mut self,
        e: &Expr,
        kind: FuncKind,
        args: &[Expr],
        row: &[Value],
    ) -> Result<Option<i64>> {
        use FuncKind::*;
        let unsigned = e.attr().unsigned;
        let res = match kind {
            Add | Sub | Mul | Mod => {
                let op = ArithKind::from_func(kind)
                    .and_then(|k| k.ops().int)
                    .ok_or(Error::UnsupportedEval(kind.to_lower()))?;
                match self.int_args(args, row)? {
                    Some((lhs, rhs)) => op(lhs, rhs, unsigned),
                    None => return Ok(None),
                }
            }
            IntDiv => return self.eval_int_div(e, args, row),
            Neg | Abs => match self.int_arg(&args[0], row)? {
                Some(arg) if kind == Neg => int_neg(arg),
                Some(arg) => int_abs(arg),
                None => return Ok(None),
            },
            Ceiling | Floor => return self.eval_int_val(e, kind == Ceiling, &args[0], row),
            Round | Truncate => {
                let value = match self.val_int(&args[0], row)? {
                    Some(v) => v,
                    None => return Ok(None),
                };
                match self.round_digits(args, row)? {
                    Some((dec, dec_unsigned)) => {
                        int_round(value, unsigned, dec, dec_unsigned, kind == Truncate)
                    }
                    None => return Ok(None),
                }
            }
            Sign => return Ok(self.val_real(&args[0], row)?.map(real_sign)),
            BitCount => return Ok(self.val_int(&args[0], row)?.map(|v| bit_count(v as u64))),
            BitInv => {
                return Ok(self
                    .val_int(&args[0], row)?
                    .map(|v| bit_inv(v as u64) as i64))
            }
            BitAnd | BitOr | BitXor | BitShl | BitShr => {
                let f = match kind {
                    BitAnd => bit_and,
                    BitOr => bit_or,
                    BitXor => bit_xor,
                    BitShl => bit_shl,
                    _ => bit_shr,
                };
                let lhs = match self.val_int(&args[0], row)? {
                    Some(v) => v,
                    None => return Ok(None),
                };
                return Ok(self
                    .val_int(&args[1], row)?
                    .map(|rhs| f(lhs as u64, rhs as u64) as i64));
            }
            Field => return self.eval_field(args, row).map(Some),
            FindInSet => return self.eval_find_in_set(args, row),
            Least | Greatest => {
                let ext = extreme(kind);
                let res = fold_extreme(
                    args.len(),
                    ext,
                    |i| self.int_arg(&args[i], row),
                    cmp_int,
                )?;
                return Ok(res.map(|a| a.value));
            }
            _ => return Err(Error::UnsupportedEval(kind.to_lower())),
        };
        Ok(self.checked(e, res))
    }

    /// `DIV` computes in integer if both operands are integers,
    /// otherwise in decimal truncating toward zero.
    fn eval_int_div(&mut self, e: &Expr, args: &[Expr], row: &[Value]) -> Result<Option<i64>> {
        let unsigned = e.attr().unsigned;
        let res = if args
            .iter()
            .all(|a| a.attr().result_type == ResultType::Integer)
        {
            match self.int_args(args, row)? {
                Some((lhs, rhs)) => int_div(lhs, rhs, unsigned),
                None => return Ok(None),
            }
        } else {
            match self.decimal_args(args, row)? {
                Some((lhs, rhs)) => decimal_int_div(&lhs, &rhs)
                    .and_then(|d| decimal_to_int(&d, unsigned)),
                None => return Ok(None),
            }
        };
        Ok(self.checked(e, res))
    }

    /// `CEILING` and `FLOOR` of integer type, dispatched on the natural
    /// type of the operand.
    fn eval_int_val(
        &mut self,
        e: &Expr,
        ceil: bool,
        arg: &Expr,
        row: &[Value],
    ) -> Result<Option<i64>> {
        let unsigned = e.attr().unsigned;
        match arg.attr().result_type {
            ResultType::Integer => self.val_int(arg, row),
            ResultType::Decimal => {
                let d = match self.val_decimal(arg, row)? {
                    Some(d) => d,
                    None => return Ok(None),
                };
                let res = if ceil {
                    decimal_ceil(&d)
                } else {
                    decimal_floor(&d)
                };
                let res = res.and_then(|d| decimal_to_int(&d, unsigned));
                Ok(self.checked(e, res))
            }
            _ => Ok(self.val_real(arg, row)?.map(|v| {
                let v = if ceil { v.ceil() } else { v.floor() };
                double_to_i64(v, unsigned).0
            })),
        }
    }

    fn func_real(
        &mut self,
        e: &Expr,
        kind: FuncKind,
        args: &[Expr],
        row: &[Value],
    ) -> Result<Option<f64>> {
        use FuncKind::*;
        let res = match kind {
            Add | Sub | Mul | Div | Mod => {
                let op = ArithKind::from_func(kind)
                    .map(|k| k.ops().real)
                    .ok_or(Error::UnsupportedEval(kind.to_lower()))?;
                match self.real_args(args, row)? {
                    Some((lhs, rhs)) => op(lhs, rhs),
                    None => return Ok(None),
                }
            }
            Neg => return Ok(self.val_real(&args[0], row)?.map(real_neg)),
            Abs => return Ok(self.val_real(&args[0], row)?.map(real_abs)),
            Ceiling => return Ok(self.val_real(&args[0], row)?.map(f64::ceil)),
            Floor => return Ok(self.val_real(&args[0], row)?.map(f64::floor)),
            Round | Truncate => {
                let value = match self.val_real(&args[0], row)? {
                    Some(v) => v,
                    None => return Ok(None),
                };
                return Ok(self
                    .round_digits(args, row)?
                    .map(|(dec, dec_unsigned)| {
                        double_round(value, dec, dec_unsigned, kind == Truncate)
                    }));
            }
            Ln => return self.real_unary(e, &args[0], row, real_ln),
            Log if args.len() == 1 => return self.real_unary(e, &args[0], row, real_ln),
            Log2 => return self.real_unary(e, &args[0], row, real_log2),
            Log10 => return self.real_unary(e, &args[0], row, real_log10),
            Exp => return self.real_unary(e, &args[0], row, real_exp),
            Sqrt => return self.real_unary(e, &args[0], row, real_sqrt),
            Acos => return self.real_unary(e, &args[0], row, real_acos),
            Asin => return self.real_unary(e, &args[0], row, real_asin),
            Atan if args.len() == 1 => return self.real_unary(e, &args[0], row, real_atan),
            Cos => return Ok(self.val_real(&args[0], row)?.map(real_cos)),
            Sin => return Ok(self.val_real(&args[0], row)?.map(real_sin)),
            Tan => return self.real_unary(e, &args[0], row, real_tan),
            Cot => return self.real_unary(e, &args[0], row, real_cot),
            Degrees => return self.real_unary(e, &args[0], row, real_degrees),
            Radians => return self.real_unary(e, &args[0], row, real_radians),
            Log | Atan | Pow => {
                let f = match kind {
                    Log => real_log,
                    Atan => real_atan2,
                    _ => real_pow,
                };
                match self.real_args(args, row)? {
                    Some((lhs, rhs)) => f(lhs, rhs),
                    None => return Ok(None),
                }
            }
            Least | Greatest => {
                return fold_extreme(
                    args.len(),
                    extreme(kind),
                    |i| self.val_real(&args[i], row),
                    cmp_real,
                )
            }
            _ => return Err(Error::UnsupportedEval(kind.to_lower())),
        };
        Ok(self.checked(e, res))
    }

    #[inline]
    fn real_unary(
        &mut self,
        e: &Expr,
        arg: &Expr,
        row: &[Value],
        f: fn(f64) -> ArithResult<f64>,
    ) -> Result<Option<f64>> {
        match self.val_real(arg, row)? {
            Some(v) => Ok(self.checked(e, f(v))),
            None => Ok(None),
        }
    }

    fn func_decimal(
        &mut self,
        e: &Expr,
        kind: FuncKind,
        args: &[Expr],
        row: &[Value],
    ) -> Result<Option<Decimal>> {
        use FuncKind::*;
        let res = match kind {
            Add | Sub | Mul | Div | Mod => {
                let op = ArithKind::from_func(kind)
                    .map(|k| k.ops().decimal)
                    .ok_or(Error::UnsupportedEval(kind.to_lower()))?;
                match self.decimal_args(args, row)? {
                    Some((lhs, rhs)) => op(&lhs, &rhs, e.attr().scale),
                    None => return Ok(None),
                }
            }
            Neg => return Ok(self.val_decimal(&args[0], row)?.map(|d| d.neg())),
            Abs => return Ok(self.val_decimal(&args[0], row)?.map(|d| d.abs())),
            Ceiling | Floor => match self.val_decimal(&args[0], row)? {
                Some(d) if kind == Ceiling => decimal_ceil(&d),
                Some(d) => decimal_floor(&d),
                None => return Ok(None),
            },
            Round | Truncate => {
                let value = match self.val_decimal(&args[0], row)? {
                    Some(v) => v,
                    None => return Ok(None),
                };
                match self.round_digits(args, row)? {
                    Some((dec, dec_unsigned)) => decimal_round(
                        &value,
                        dec,
                        dec_unsigned,
                        kind == Truncate,
                        e.attr().scale,
                    ),
                    None => return Ok(None),
                }
            }
            Least | Greatest => {
                return fold_extreme(
                    args.len(),
                    extreme(kind),
                    |i| self.val_decimal(&args[i], row),
                    cmp_decimal,
                )
            }
            _ => return Err(Error::UnsupportedEval(kind.to_lower())),
        };
        Ok(self.checked(e, res))
    }

    fn func_str(
        &mut self,
        e: &Expr,
        kind: FuncKind,
        args: &[Expr],
        row: &[Value],
    ) -> Result<Option<Bytes>> {
        match kind {
            FuncKind::Least | FuncKind::Greatest => {
                let collation = e.attr().collation;
                let res = fold_extreme(
                    args.len(),
                    extreme(kind),
                    |i| self.val_str(&args[i], row),
                    |a: &Bytes, b: &Bytes| collation.compare(&a.0, &b.0),
                )?;
                Ok(res.map(|(s, _)| (s, collation)))
            }
            _ => Err(Error::UnsupportedEval(kind.to_lower())),
        }
    }

    fn func_temporal(
        &mut self,
        e: &Expr,
        kind: FuncKind,
        args: &[Expr],
        row: &[Value],
    ) -> Result<Option<Temporal>> {
        match kind {
            FuncKind::Least | FuncKind::Greatest => {
                let tk = e.attr().temporal.unwrap_or(TemporalKind::Datetime);
                fold_extreme(
                    args.len(),
                    extreme(kind),
                    |i| self.val_temporal(&args[i], row, tk),
                    cmp_temporal,
                )
            }
            _ => Err(Error::UnsupportedEval(kind.to_lower())),
        }
    }

    /// `FIELD` compares in the common type of all operands, with
    /// temporal operands compared as strings.
    fn eval_field(&mut self, args: &[Expr], row: &[Value]) -> Result<i64> {
        let (needle, haystack) = (&args[0], &args[1..]);
        let cmp = agg_cmp_type_untimed(args.iter().map(|a| a.attr().result_type))
            .unwrap_or(ResultType::StringLike);
        match cmp {
            ResultType::StringLike => {
                let collation = agg_collation(args.iter().map(|a| a.attr()));
                let needle = self.val_str(needle, row)?;
                field(
                    needle,
                    haystack.len(),
                    |i| self.val_str(&haystack[i], row),
                    |a, b| collation.equal(&a.0, &b.0),
                )
            }
            ResultType::Integer => {
                let needle = self.int_arg(needle, row)?;
                field(
                    needle,
                    haystack.len(),
                    |i| self.int_arg(&haystack[i], row),
                    |a, b| cmp_int(a, b).is_eq(),
                )
            }
            ResultType::Decimal => {
                let needle = self.val_decimal(needle, row)?;
                field(
                    needle,
                    haystack.len(),
                    |i| self.val_decimal(&haystack[i], row),
                    |a, b| a == b,
                )
            }
            _ => {
                let needle = self.val_real(needle, row)?;
                field(
                    needle,
                    haystack.len(),
                    |i| self.val_real(&haystack[i], row),
                    |a, b| a == b,
                )
            }
        }
    }

    fn eval_find_in_set(&mut self, args: &[Expr], row: &[Value]) -> Result<Option<i64>> {
        let collation = agg_collation(args.iter().map(|a| a.attr()));
        let needle = match self.val_str(&args[0], row)? {
            Some((s, _)) => s,
            None => return Ok(None),
        };
        let list = match self.val_str(&args[1], row)? {
            Some((s, _)) => s,
            None => return Ok(None),
        };
        Ok(Some(find_in_set(&needle, &list, collation)))
    }

    fn cast_int(&mut self, arg: &Expr, ty: CastType, row: &[Value]) -> Result<Option<i64>> {
        let v = self.eval(arg, row)?;
        let unsigned = match ty {
            CastType::Signed => false,
            CastType::Unsigned => true,
            _ => return Err(Error::UnsupportedEval("cast")),
        };
        let res = match v.to_i64(unsigned) {
            Some(c) => self.converted(c),
            None => return Ok(None),
        };
        if unsigned && negative_to_unsigned(&v, res) {
            self.sink.push(Diagnostic::cast_to_unsigned());
        }
        Ok(Some(res))
    }
}

#[inline]
fn extreme(kind: FuncKind) -> Extreme {
    if kind == FuncKind::Greatest {
        Extreme::Greatest
    } else {
        Extreme::Least
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numex_datatype::PreciseType;
    use numex_expr::{resolve, DiagCode, SqlMode};

    fn eval_with(mut e: Expr, session: &Session, row: &[Value]) -> (Value, Vec<Diagnostic>) {
        resolve(&mut e, session).unwrap();
        let mut diags: Vec<Diagnostic> = vec![];
        let res = Evaluator::new(session, &mut diags).eval(&e, row).unwrap();
        (res, diags)
    }

    fn eval1(e: Expr) -> (Value, Vec<Diagnostic>) {
        eval_with(e, &Session::default(), &[])
    }

    fn dec(s: &str) -> Expr {
        Expr::const_decimal(s.parse().unwrap())
    }

    fn dec_value(s: &str) -> Value {
        Value::Decimal(s.parse().unwrap())
    }

    #[test]
    fn test_eval_int_arith() {
        let (res, diags) = eval1(Expr::add(Expr::const_i64(1), Expr::const_i64(2)));
        assert_eq!(Value::I64(3), res);
        assert!(diags.is_empty());
        let (res, diags) = eval1(Expr::add(Expr::const_i64(i64::MAX), Expr::const_i64(1)));
        assert_eq!(Value::Null, res);
        assert_eq!(DiagCode::DataOutOfRange, diags[0].code);
        assert_eq!(
            "BIGINT value is out of range in '(9223372036854775807 + 1)'",
            diags[0].message
        );
        let (res, _) = eval1(Expr::sub(Expr::const_u64(1), Expr::const_u64(2)));
        assert_eq!(Value::Null, res);
        let (res, _) = eval1(Expr::mul(Expr::const_i64(-3), Expr::const_i64(4)));
        assert_eq!(Value::I64(-12), res);
        let (res, _) = eval1(Expr::int_div(Expr::const_i64(-7), Expr::const_i64(2)));
        assert_eq!(Value::I64(-3), res);
        let (res, _) = eval1(Expr::modulo(Expr::const_i64(-7), Expr::const_i64(2)));
        assert_eq!(Value::I64(-1), res);
    }

    #[test]
    fn test_eval_division_by_zero() {
        let (res, diags) = eval1(Expr::div(Expr::const_i64(5), Expr::const_i64(0)));
        assert_eq!(Value::Null, res);
        assert_eq!(DiagCode::DivisionByZero, diags[0].code);
        let (res, diags) = eval1(Expr::modulo(Expr::const_i64(5), Expr::const_i64(0)));
        assert_eq!(Value::Null, res);
        assert_eq!(1, diags.len());
        let (res, _) = eval1(Expr::div(Expr::const_f64(5.0), Expr::const_f64(0.0)));
        assert_eq!(Value::Null, res);
        let session = Session::default().with_sql_mode(SqlMode::empty());
        let (res, diags) = eval_with(
            Expr::int_div(Expr::const_i64(5), Expr::const_i64(0)),
            &session,
            &[],
        );
        assert_eq!(Value::Null, res);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_eval_null_short_circuit() {
        let (res, diags) = eval1(Expr::add(
            Expr::const_null(),
            Expr::add(Expr::const_i64(i64::MAX), Expr::const_i64(1)),
        ));
        assert_eq!(Value::Null, res);
        assert!(diags.is_empty());
        let (res, _) = eval1(Expr::neg(Expr::const_null()));
        assert_eq!(Value::Null, res);
    }

    #[test]
    fn test_eval_decimal() {
        let (res, _) = eval1(Expr::div(dec("5.05"), dec("0.014")));
        assert_eq!(dec_value("360.714286"), res);
        let (res, _) = eval1(Expr::div(Expr::const_i64(1), Expr::const_i64(3)));
        assert_eq!(dec_value("0.3333"), res);
        let (res, _) = eval1(Expr::neg(Expr::const_u64(9223372036854775809)));
        assert_eq!(dec_value("-9223372036854775809"), res);
        let (res, _) = eval1(Expr::int_div(dec("7.5"), dec("2")));
        assert_eq!(Value::I64(3), res);
    }

    #[test]
    fn test_eval_columns() {
        let e = Expr::add(
            Expr::col(0, "a", PreciseType::i64(), true),
            Expr::col(1, "b", PreciseType::decimal(10, 2), true),
        );
        let row = [Value::I64(1), dec_value("2.25")];
        let (res, _) = eval_with(e.clone(), &Session::default(), &row);
        assert_eq!(dec_value("3.25"), res);
        let row = [Value::Null, dec_value("2.25")];
        let (res, _) = eval_with(e.clone(), &Session::default(), &row);
        assert_eq!(Value::Null, res);

        let mut e = e;
        resolve(&mut e, &Session::default()).unwrap();
        let mut diags: Vec<Diagnostic> = vec![];
        let res = Evaluator::new(&Session::default(), &mut diags).eval(&e, &[Value::I64(1)]);
        assert_eq!(Err(Error::ColumnOutOfRange(1)), res);
    }

    #[test]
    fn test_eval_string_operand() {
        let (res, diags) = eval1(Expr::add(Expr::const_str("1a"), Expr::const_i64(1)));
        assert_eq!(Value::new_f64(2.0).unwrap(), res);
        assert_eq!(DiagCode::TruncatedWrongValue, diags[0].code);
        assert_eq!("Truncated incorrect DOUBLE value: '1a'", diags[0].message);
    }

    #[test]
    fn test_eval_unresolved() {
        let e = Expr::add(Expr::const_i64(1), Expr::const_i64(2));
        let mut diags: Vec<Diagnostic> = vec![];
        let res = Evaluator::new(&Session::default(), &mut diags).eval(&e, &[]);
        assert_eq!(Err(Error::Unresolved), res);
    }

    #[test]
    fn test_eval_cast() {
        let (res, diags) = eval1(Expr::cast(Expr::const_i64(-1), CastType::Unsigned));
        assert_eq!(Value::U64(u64::MAX), res);
        assert_eq!(DiagCode::UnknownError, diags[0].code);
        let (res, diags) = eval1(Expr::cast(Expr::const_i64(1000), CastType::Decimal(2, 0)));
        assert_eq!(dec_value("99"), res);
        assert_eq!(DiagCode::WarnDataOutOfRange, diags[0].code);
        let (res, _) = eval1(Expr::cast(Expr::const_str("2.5"), CastType::Double));
        assert_eq!(Value::new_f64(2.5).unwrap(), res);
        let (res, _) = eval1(Expr::cast(dec("2.5"), CastType::Signed));
        assert_eq!(Value::I64(3), res);
    }
}
